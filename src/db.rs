//! This module defines traits for mapping the domain models to the
//! application's SQLite database, and the function that sets up the schema.

use rusqlite::{Connection, Error, Row};

use crate::stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore};

/// The category labels a fresh database starts with.
///
/// Categories are global and there is no endpoint for creating them, so an
/// empty table would leave nothing to attach transactions to.
const DEFAULT_CATEGORIES: [&str; 12] = [
    "Groceries",
    "Dining Out",
    "Rent",
    "Utilities",
    "Transport",
    "Health",
    "Education",
    "Leisure",
    "Clothing",
    "Salary",
    "Sales",
    "Other",
];

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a
/// concrete rust type.
pub trait MapRow {
    /// The type that the implementation maps rows to.
    type ReturnType;

    /// Convert a row into a concrete type, assuming the row's columns start
    /// at the first SELECTed column.
    ///
    /// # Errors
    /// Returns an error if the row does not contain the expected column types
    /// in the expected order.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, with the row's columns starting at
    /// `offset`.
    ///
    /// # Errors
    /// Returns an error if the row does not contain the expected column types
    /// in the expected order.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for the domain models and seed the default categories.
///
/// Foreign keys are switched on for `connection` so that transactions keep
/// pointing at valid categories and users.
///
/// # Errors
/// Returns an error if the tables could not be created or seeded.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    SQLiteUserStore::create_table(connection)?;
    SQLiteCategoryStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    seed_default_categories(connection)?;

    Ok(())
}

fn seed_default_categories(connection: &Connection) -> Result<(), Error> {
    let category_count: i64 =
        connection.query_row("SELECT COUNT(id) FROM category;", [], |row| row.get(0))?;

    if category_count > 0 {
        return Ok(());
    }

    let mut statement = connection.prepare("INSERT INTO category (description) VALUES (?1);")?;

    for description in DEFAULT_CATEGORIES {
        statement.execute((description,))?;
    }

    Ok(())
}
