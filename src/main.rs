//! Alcove - Book Lending Record Store
//!
//! An interactive terminal front end over the library facade.

use std::io::{self, Write};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alcove::{
    config::AppConfig,
    error::AppError,
    models::{
        book::SortKey,
        requests::{
            AddBookRequest, BorrowRequest, DeleteBookRequest, HistoryRequest, ListRequest,
            ReturnRequest, SearchQuery, UpdateBookRequest,
        },
    },
    services::library::LibraryService,
};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("alcove={}", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Alcove v{}", env!("CARGO_PKG_VERSION"));

    let mut library = LibraryService::open(&config)?;
    tracing::info!(
        "Catalog loaded from {}",
        config.storage.books_path().display()
    );

    run_menu(&mut library)?;

    Ok(())
}

fn run_menu(library: &mut LibraryService) -> io::Result<()> {
    loop {
        print_menu();
        let choice = prompt("Choose an option: ")?;
        match choice.trim() {
            "1" => add_book(library)?,
            "2" => update_book(library)?,
            "3" => delete_book(library)?,
            "4" => search_books(library)?,
            "5" => borrow_book(library)?,
            "6" => return_book(library)?,
            "7" => list_books(library)?,
            "8" => show_history(library)?,
            "9" => show_details(library)?,
            "0" => {
                println!("Goodbye.");
                return Ok(());
            }
            other => println!("Unknown option '{}'", other),
        }
    }
}

fn print_menu() {
    println!();
    println!("===== Alcove Library =====");
    println!("1. Add a book (admin)");
    println!("2. Update a book (admin)");
    println!("3. Delete a book (admin)");
    println!("4. Search the catalog");
    println!("5. Borrow a book");
    println!("6. Return a book");
    println!("7. List all books");
    println!("8. Lending history");
    println!("9. Book details");
    println!("0. Exit");
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt_year(label: &str) -> io::Result<i32> {
    loop {
        let raw = prompt(label)?;
        match raw.trim().parse() {
            Ok(year) => return Ok(year),
            Err(_) => println!("Enter a whole number."),
        }
    }
}

/// Admin check before management operations, three attempts
fn ensure_admin(library: &LibraryService) -> io::Result<bool> {
    for attempt in 1..=3 {
        let username = prompt("Admin username: ")?;
        let password = prompt("Admin password: ")?;
        match library.authenticate_admin(username.trim(), password.trim()) {
            Ok(()) => return Ok(true),
            Err(e) => println!("{} (attempt {}/3)", e, attempt),
        }
    }
    println!("Too many failed attempts.");
    Ok(false)
}

fn add_book(library: &mut LibraryService) -> io::Result<()> {
    if !ensure_admin(library)? {
        return Ok(());
    }
    let title = prompt("Title: ")?;
    let author = prompt("Author: ")?;
    let year = prompt_year("Year: ")?;
    match library.add_book(AddBookRequest {
        title,
        author,
        year,
    }) {
        Ok(book) => println!("Added {} '{}'", book.id, book.title),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn update_book(library: &mut LibraryService) -> io::Result<()> {
    if !ensure_admin(library)? {
        return Ok(());
    }
    let id = prompt("Book ID: ")?;
    let title = prompt("New title (blank keeps current): ")?;
    let author = prompt("New author (blank keeps current): ")?;
    let year_raw = prompt("New year (blank keeps current): ")?;
    let year = year_raw.trim().parse().ok();
    match library.update_book(UpdateBookRequest {
        id: id.trim().to_string(),
        title: Some(title),
        author: Some(author),
        year,
    }) {
        Ok(book) => println!("Updated {}", book.id),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn delete_book(library: &mut LibraryService) -> io::Result<()> {
    if !ensure_admin(library)? {
        return Ok(());
    }
    let id = prompt("Book ID: ")?;
    let id = id.trim().to_string();
    match library.get_book(&id) {
        Ok(book) => print!("{}", LibraryService::render_book_details(&book)),
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    }
    let answer = prompt("Delete this book? (y/N): ")?;
    let confirmed = answer.trim().eq_ignore_ascii_case("y");
    match library.delete_book(DeleteBookRequest { id, confirmed }) {
        Ok(Some(book)) => println!("Deleted {} '{}'", book.id, book.title),
        Ok(None) => println!("Deletion cancelled."),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn search_books(library: &LibraryService) -> io::Result<()> {
    println!("1. By title  2. By author  3. By year  4. By title or author");
    let mode = prompt("Search mode: ")?;
    let query = match mode.trim() {
        "1" => SearchQuery::Title(prompt("Title contains: ")?),
        "2" => SearchQuery::Author(prompt("Author contains: ")?),
        "3" => SearchQuery::Year(prompt_year("Year: ")?),
        "4" => SearchQuery::TitleOrAuthor(prompt("Text: ")?),
        other => {
            println!("Unknown mode '{}'", other);
            return Ok(());
        }
    };
    let hits = library.search_books(&query);
    if hits.is_empty() {
        println!("No matches.");
    } else {
        print!("{}", LibraryService::render_book_table(&hits));
    }
    Ok(())
}

fn borrow_book(library: &mut LibraryService) -> io::Result<()> {
    let query = prompt("Book ID or title: ")?;
    let borrower = prompt("Your name: ")?;
    match library.borrow_book(BorrowRequest { query, borrower }) {
        Ok(book) => println!("Borrowed {} '{}'", book.id, book.title),
        Err(AppError::AmbiguousMatch { candidates, .. }) => {
            println!("Several books match:");
            print!("{}", LibraryService::render_book_table(&candidates));
            println!("Run the borrow again with an exact ID.");
        }
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn return_book(library: &mut LibraryService) -> io::Result<()> {
    let id = prompt("Book ID: ")?;
    let borrower = prompt("Your name: ")?;
    match library.return_book(ReturnRequest {
        id: id.trim().to_string(),
        borrower,
    }) {
        Ok(book) => println!("Returned {} '{}'", book.id, book.title),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn list_books(library: &LibraryService) -> io::Result<()> {
    println!("0. Unsorted  1. By title  2. By year  3. By availability");
    let sort = match prompt("Sort order: ")?.trim() {
        "1" => SortKey::Title,
        "2" => SortKey::Year,
        "3" => SortKey::Availability,
        _ => SortKey::Unsorted,
    };
    let books = library.list_books(ListRequest { sort });
    if books.is_empty() {
        println!("The catalog is empty.");
    } else {
        print!("{}", LibraryService::render_book_table(&books));
        let stats = library.stats();
        println!(
            "{} book(s) in {} order, {} borrowed, {} available",
            stats.total_books, sort, stats.borrowed, stats.available
        );
    }
    Ok(())
}

fn show_history(library: &LibraryService) -> io::Result<()> {
    let raw = prompt("How many entries? (0 for all): ")?;
    let count = raw.trim().parse().unwrap_or(0);
    let entries = library.recent_history(HistoryRequest { count });
    if entries.is_empty() {
        println!("No history yet.");
    } else {
        print!("{}", LibraryService::render_history(entries));
    }
    Ok(())
}

fn show_details(library: &LibraryService) -> io::Result<()> {
    let id = prompt("Book ID: ")?;
    match library.get_book(id.trim()) {
        Ok(book) => print!("{}", LibraryService::render_book_details(&book)),
        Err(e) => println!("{}", e),
    }
    Ok(())
}
