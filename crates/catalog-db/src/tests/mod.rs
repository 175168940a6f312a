use crate::Database;

fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to create test DB")
}

mod core;
mod created_codes;
mod maintenance;
mod scanned_codes;
