//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{CategorySummary, DatabaseID, Transaction, TransactionData, UserID},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the
/// [User](crate::models::User) and [Category](crate::models::Category)
/// models, these models must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

/// Selects a transaction joined with its category label.
const SELECT_JOINED: &str = "SELECT t.id, t.transaction_type, t.description, t.amount, t.date, \
     t.user_id, t.category_id, c.description AS category_name \
     FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id";

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn get_joined(
        connection: &Connection,
        id: DatabaseID,
        user_id: UserID,
    ) -> Result<Transaction, Error> {
        let transaction = connection
            .prepare(&format!(
                "{SELECT_JOINED} WHERE t.id = :id AND t.user_id = :user_id"
            ))?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )?;

        Ok(transaction)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction for `user_id` in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if `data.category_id` does not refer to a
    ///   valid category,
    /// - [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, user_id: UserID, data: TransactionData) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO \"transaction\" \
                 (transaction_type, description, amount, date, user_id, category_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    data.transaction_type,
                    &data.description,
                    data.amount,
                    data.date,
                    user_id.as_i64(),
                    data.category_id,
                ),
            )
            .map_err(|error| match error {
                // Code 787 occurs when a FOREIGN KEY constraint failed.
                // The client tried to add a transaction for a non-existent
                // category.
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                    Error::InvalidCategory
                }
                error => error.into(),
            })?;

        let id = connection.last_insert_rowid();

        Self::get_joined(&connection, id, user_id)
    }

    /// Retrieve the transaction with `id` belonging to `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by
    ///   `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        Self::get_joined(&connection, id, user_id)
    }

    /// Retrieve `user_id`'s transactions, each joined with its category
    /// label.
    ///
    /// An empty vector is returned if the specified user has no transactions.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL
    /// error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "{SELECT_JOINED} WHERE t.user_id = :user_id ORDER BY t.id"
            ))?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Replace the fields of the transaction with `id` belonging to
    /// `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by
    ///   `user_id`,
    /// - [Error::InvalidCategory] if `data.category_id` does not refer to a
    ///   valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &mut self,
        id: DatabaseID,
        user_id: UserID,
        data: TransactionData,
    ) -> Result<(), Error> {
        let rows_changed = self
            .connection
            .lock()
            .unwrap()
            .execute(
                "UPDATE \"transaction\" SET \
                 transaction_type = ?1, description = ?2, amount = ?3, date = ?4, \
                 category_id = ?5 \
                 WHERE id = ?6 AND user_id = ?7",
                (
                    data.transaction_type,
                    &data.description,
                    data.amount,
                    data.date,
                    data.category_id,
                    id,
                    user_id.as_i64(),
                ),
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                    Error::InvalidCategory
                }
                error => error.into(),
            })?;

        if rows_changed == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }

    /// Delete the transaction with `id` belonging to `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by
    ///   `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )?;

        if rows_changed == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }

    /// Sum `user_id`'s transaction amounts per (category label, type) pair.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL
    /// error.
    fn summarize(&self, user_id: UserID) -> Result<Vec<CategorySummary>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT c.description, t.transaction_type, SUM(t.amount) AS total \
                 FROM \"transaction\" t LEFT JOIN category c ON c.id = t.category_id \
                 WHERE t.user_id = :user_id \
                 GROUP BY c.description, t.transaction_type",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], |row| {
                Ok(CategorySummary {
                    category: row.get(0)?,
                    transaction_type: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .map(|maybe_summary| maybe_summary.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    transaction_type TEXT NOT NULL,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    category_id INTEGER,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            transaction_type: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
            date: row.get(offset + 4)?,
            user_id: UserID::new(row.get(offset + 5)?),
            category_id: row.get(offset + 6)?,
            category_name: row.get(offset + 7)?,
        })
    }
}
