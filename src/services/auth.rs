//! Admin authentication capability

use crate::config::AuthConfig;

/// Credential check the library facade depends on. Implementations can back
/// admin login with anything; the default compares against configuration.
#[cfg_attr(test, mockall::automock)]
pub trait AdminAuthenticator {
    /// Check a username and password pair
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Plain comparison against the configured admin credentials
#[derive(Debug, Clone)]
pub struct ConfigCredentials {
    username: String,
    password: String,
}

impl ConfigCredentials {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
        }
    }
}

impl AdminAuthenticator for ConfigCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_credentials_verify() {
        let auth = ConfigCredentials::new(&AuthConfig::default());
        assert!(auth.verify("admin", "1234"));
        assert!(!auth.verify("admin", "wrong"));
        assert!(!auth.verify("root", "1234"));
    }
}
