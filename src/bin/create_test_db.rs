use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    CategoryName, NewCategory, NewExpense, create_category, create_expense, create_user,
    initialize_db,
};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of expenses to create.
    #[arg(long, short, default_value_t = 20)]
    num_expenses: u32,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    let user = create_user("test", &conn)?;

    println!("Creating categories...");
    let categories = ["Groceries", "Rent", "Transport", "Entertainment"]
        .into_iter()
        .map(|name| {
            create_category(
                NewCategory {
                    name: CategoryName::new(name)?,
                    user_id: Some(user.id),
                },
                &conn,
            )
            .map_err(Box::<dyn Error>::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    println!("Creating {} expenses...", args.num_expenses);
    let today = OffsetDateTime::now_utc().date();

    for i in 0..args.num_expenses {
        let category = &categories[i as usize % categories.len()];

        create_expense(
            NewExpense {
                amount: 5.0 + f64::from(i % 7) * 12.5,
                date: today - Duration::days(i64::from(i)),
                description: Some(format!("{} #{}", category.name, i + 1)),
                category_id: category.id,
                user_id: user.id,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
