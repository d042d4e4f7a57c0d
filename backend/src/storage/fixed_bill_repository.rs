use anyhow::Result;
use async_trait::async_trait;
use shared::FixedBill;
use sqlx::{sqlite::SqliteRow, Row};
use tracing::debug;

use crate::storage::db::DbConnection;
use crate::storage::traits::FixedBillStorage;

/// SQLite-backed fixed bill repository
#[derive(Clone)]
pub struct FixedBillRepository {
    db: DbConnection,
}

impl FixedBillRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_bill(row: &SqliteRow) -> FixedBill {
        FixedBill {
            id: row.get("id"),
            name: row.get("name"),
            category: row.get("category"),
            amount: row.get("amount"),
            due_day: row.get::<i64, _>("due_day") as u32,
            month: row.get::<i64, _>("month") as u32,
            year: row.get::<i64, _>("year") as i32,
            is_paid: row.get("is_paid"),
            is_recurring: row.get("is_recurring"),
        }
    }
}

#[async_trait]
impl FixedBillStorage for FixedBillRepository {
    async fn find_fixed_bills(&self, month: u32, year: i32) -> Result<Vec<FixedBill>> {
        let rows = sqlx::query(
            "SELECT id, name, category, amount, due_day, month, year, is_paid, is_recurring
             FROM fixed_bills
             WHERE month = ? AND year = ?
             ORDER BY due_day ASC, name ASC",
        )
        .bind(month as i64)
        .bind(year as i64)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::row_to_bill).collect())
    }

    async fn store_fixed_bill(&self, bill: &FixedBill) -> Result<bool> {
        // INSERT OR IGNORE against the unique (year, month, name) index:
        // zero rows affected means the month already holds this bill.
        let result = sqlx::query(
            "INSERT OR IGNORE INTO fixed_bills
                 (id, name, category, amount, due_day, month, year, is_paid, is_recurring)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&bill.id)
        .bind(&bill.name)
        .bind(&bill.category)
        .bind(bill.amount)
        .bind(bill.due_day as i64)
        .bind(bill.month as i64)
        .bind(bill.year as i64)
        .bind(bill.is_paid)
        .bind(bill.is_recurring)
        .execute(self.db.pool())
        .await?;

        let stored = result.rows_affected() > 0;
        if !stored {
            debug!(
                "Fixed bill {:?} already present for {}/{}, insert ignored",
                bill.name, bill.month, bill.year
            );
        }
        Ok(stored)
    }

    async fn get_fixed_bill(&self, bill_id: &str) -> Result<Option<FixedBill>> {
        let row = sqlx::query(
            "SELECT id, name, category, amount, due_day, month, year, is_paid, is_recurring
             FROM fixed_bills WHERE id = ?",
        )
        .bind(bill_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_bill))
    }

    async fn update_fixed_bill(&self, bill: &FixedBill) -> Result<()> {
        sqlx::query(
            "UPDATE fixed_bills
             SET name = ?, category = ?, amount = ?, due_day = ?,
                 month = ?, year = ?, is_paid = ?, is_recurring = ?
             WHERE id = ?",
        )
        .bind(&bill.name)
        .bind(&bill.category)
        .bind(bill.amount)
        .bind(bill.due_day as i64)
        .bind(bill.month as i64)
        .bind(bill.year as i64)
        .bind(bill.is_paid)
        .bind(bill.is_recurring)
        .bind(&bill.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn delete_fixed_bill(&self, bill_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM fixed_bills WHERE id = ?")
            .bind(bill_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_paid(&self, bill_id: &str, is_paid: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE fixed_bills SET is_paid = ? WHERE id = ?")
            .bind(is_paid)
            .bind(bill_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
