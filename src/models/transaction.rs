//! This file defines the `Transaction` type, the core type of the budgeting
//! part of the application, along with its type tag and the per-category
//! summary row produced for the extract endpoint.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{DatabaseID, UserID};

/// Whether a transaction brings money in or takes money out.
///
/// Serialized on the wire and in the database as the strings `"entrada"`
/// (inflow) and `"saida"` (outflow), the values the original service and its
/// clients exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    #[serde(rename = "entrada")]
    Income,
    /// Money going out, e.g. paying rent.
    #[serde(rename = "saida")]
    Expense,
}

impl TransactionType {
    /// The wire/database representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "entrada",
            TransactionType::Expense => "saida",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when parsing a string that is neither `"entrada"` nor
/// `"saida"`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0:?} is not a valid transaction type, expected \"entrada\" or \"saida\"")]
pub struct ParseTransactionTypeError(String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(TransactionType::Income),
            "saida" => Ok(TransactionType::Expense),
            other => Err(ParseTransactionTypeError(other.to_string())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// `category_name` is the label of the category the transaction belongs to,
/// filled in from the category table when the row is fetched; it is `None`
/// for transactions whose category has been removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// Whether the transaction is an inflow or an outflow.
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The ID of the user that created this transaction.
    pub user_id: UserID,
    /// The category the transaction belongs to, if any.
    pub category_id: Option<DatabaseID>,
    /// The label of the category the transaction belongs to, if any.
    pub category_name: Option<String>,
}

/// The fields a client supplies to create or update a [Transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionData {
    /// Whether the transaction is an inflow or an outflow.
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to.
    pub category_id: DatabaseID,
}

/// The total amount of a user's transactions for one (category, type) pair.
///
/// Produced by a storage query that groups the user's transactions by
/// category label and type and sums the amounts per group; `category` is
/// `None` for uncategorized transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// The category label the totals belong to, if any.
    pub category: Option<String>,
    /// Whether the summed transactions are inflows or outflows.
    pub transaction_type: TransactionType,
    /// The sum of the amounts of the matching transactions.
    pub total: f64,
}
