use anyhow::Result;
use async_trait::async_trait;
use shared::FixedBill;
use std::sync::{Arc, Mutex};

use crate::storage::traits::FixedBillStorage;

/// In-memory fixed bill store backed by a plain `Vec`.
///
/// Useful for tests and prototyping. Unlike the SQLite repository it does
/// NOT enforce uniqueness on `(year, month, name)`: `store_fixed_bill`
/// always appends and returns `true`. That models a backing store without
/// the duplicate guard, which is exactly what the recurring-rollover race
/// tests need to exercise.
#[derive(Clone, Default)]
pub struct MemoryFixedBillRepository {
    bills: Arc<Mutex<Vec<FixedBill>>>,
}

impl MemoryFixedBillRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored bills across all months
    pub fn len(&self) -> usize {
        self.bills.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FixedBillStorage for MemoryFixedBillRepository {
    async fn find_fixed_bills(&self, month: u32, year: i32) -> Result<Vec<FixedBill>> {
        let mut bills: Vec<FixedBill> = self
            .bills
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.month == month && b.year == year)
            .cloned()
            .collect();
        bills.sort_by(|a, b| (a.due_day, &a.name).cmp(&(b.due_day, &b.name)));
        Ok(bills)
    }

    async fn store_fixed_bill(&self, bill: &FixedBill) -> Result<bool> {
        self.bills.lock().unwrap().push(bill.clone());
        Ok(true)
    }

    async fn get_fixed_bill(&self, bill_id: &str) -> Result<Option<FixedBill>> {
        Ok(self
            .bills
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == bill_id)
            .cloned())
    }

    async fn update_fixed_bill(&self, bill: &FixedBill) -> Result<()> {
        let mut bills = self.bills.lock().unwrap();
        if let Some(existing) = bills.iter_mut().find(|b| b.id == bill.id) {
            *existing = bill.clone();
        }
        Ok(())
    }

    async fn delete_fixed_bill(&self, bill_id: &str) -> Result<bool> {
        let mut bills = self.bills.lock().unwrap();
        let before = bills.len();
        bills.retain(|b| b.id != bill_id);
        Ok(bills.len() < before)
    }

    async fn set_paid(&self, bill_id: &str, is_paid: bool) -> Result<bool> {
        let mut bills = self.bills.lock().unwrap();
        match bills.iter_mut().find(|b| b.id == bill_id) {
            Some(bill) => {
                bill.is_paid = is_paid;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
