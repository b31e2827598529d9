use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::error::Result;

/// Repository for persisting and querying expense records
pub struct ExpenseRepository {
    pool: SqlitePool,
}

/// One recorded transaction.
///
/// `date` is stored and compared as TEXT; lexicographic order matches
/// chronological order only for well-formed YYYY-MM-DD values, which is a
/// caller contract rather than an enforced constraint. `subcategory` and
/// `note` are never NULL; omitted values are stored as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// One aggregation row: the summed amount for a category within a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one expense row and return its storage-assigned id.
    ///
    /// Optional fields resolve to empty strings here, before the values
    /// reach the storage layer. No semantic validation is performed on
    /// dates, amounts, or categories.
    pub async fn add(
        &self,
        date: &str,
        amount: f64,
        category: &str,
        subcategory: Option<&str>,
        note: Option<&str>,
    ) -> Result<i64> {
        let subcategory = subcategory.unwrap_or("");
        let note = note.unwrap_or("");

        debug!(
            "Adding expense: date={}, amount={}, category={}",
            date, amount, category
        );

        if category.is_empty() {
            // Persisted as given, but it will group under "" in summaries.
            warn!("Adding expense with empty category");
        }

        let result = sqlx::query(
            r#"
            INSERT INTO expenses (date, amount, category, subcategory, note)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(date)
        .bind(amount)
        .bind(category)
        .bind(subcategory)
        .bind(note)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Added expense with id {}", id);
        Ok(id)
    }

    /// List expenses whose date lies within the inclusive range, ordered by
    /// ascending id (insertion order).
    ///
    /// The range is a pure string comparison: an inverted range returns an
    /// empty list rather than an error.
    pub async fn list_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<Expense>> {
        debug!("Listing expenses in range {}..={}", start_date, end_date);

        let rows = sqlx::query(
            r#"
            SELECT id, date, amount, category, subcategory, note
            FROM expenses
            WHERE date BETWEEN ? AND ?
            ORDER BY id ASC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        let expenses = rows
            .into_iter()
            .map(|row| Expense {
                id: row.get("id"),
                date: row.get("date"),
                amount: row.get("amount"),
                category: row.get("category"),
                subcategory: row.get("subcategory"),
                note: row.get("note"),
            })
            .collect::<Vec<_>>();

        debug!("Retrieved {} expenses", expenses.len());
        Ok(expenses)
    }

    /// Sum amounts per category within the inclusive date range, ordered by
    /// category ascending.
    ///
    /// When `category` is given the aggregation is restricted to rows whose
    /// category matches it exactly (case-sensitive, including the empty
    /// string). Categories with no matching rows never appear; sums are
    /// plain floating-point addition over the stored REAL values.
    pub async fn summarize(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
    ) -> Result<Vec<CategoryTotal>> {
        debug!(
            "Summarizing expenses in range {}..={} (category filter: {:?})",
            start_date, end_date, category
        );

        let mut query = String::from(
            r#"
            SELECT category, SUM(amount) AS total_amount
            FROM expenses
            WHERE date BETWEEN ? AND ?
            "#,
        );

        if category.is_some() {
            query.push_str(" AND category = ?");
        }

        query.push_str(" GROUP BY category ORDER BY category ASC");

        let mut query_builder = sqlx::query(&query).bind(start_date).bind(end_date);

        if let Some(cat) = category {
            query_builder = query_builder.bind(cat);
        }

        let rows = query_builder.fetch_all(&self.pool).await?;

        let totals = rows
            .into_iter()
            .map(|row| CategoryTotal {
                category: row.get("category"),
                total_amount: row.get("total_amount"),
            })
            .collect::<Vec<_>>();

        debug!("Summarized {} categories", totals.len());
        Ok(totals)
    }
}
