//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, UserID},
    stores::CategoryStore,
};

/// Retrieves the global transaction categories from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Retrieve the category with `category_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category, or
    /// [Error::SqlError] if there is an SQL error.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, description FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], SQLiteCategoryStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all categories in the database.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, description FROM category;")?
            .query_map([], SQLiteCategoryStore::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Retrieve the labels of the categories `user_id` has transactions in.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if there is an SQL error.
    fn get_labels_by_user(&self, user_id: UserID) -> Result<Vec<String>, Error> {
        let labels = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT c.description
                 FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id
                 WHERE t.user_id = :user_id
                 GROUP BY c.description;",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], |row| {
                row.get::<_, Option<String>>(0)
            })?
            .collect::<Result<Vec<Option<String>>, _>>()?;

        Ok(labels.into_iter().flatten().collect())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL UNIQUE
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_description: String = row.get(offset + 1)?;
        let description = CategoryName::new_unchecked(&raw_description);

        Ok(Self::ReturnType { id, description })
    }
}
