//! Fixed monthly bills and the recurring rollover.
//!
//! When the user navigates to a month with no fixed bills yet, the previous
//! month's recurring bills are copied forward with their paid flag reset.
//! The check-then-create sequence is serialized behind a service-level lock,
//! and the SQLite backend's unique `(year, month, name)` index absorbs
//! whatever still slips through as a skipped insert.

use anyhow::{Context, Result};
use shared::{CreateFixedBillRequest, FixedBill, FixedBillMonthTotals};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::calendar;
use crate::storage::FixedBillStorage;

/// Typed failures from the fixed bill service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixedBillError {
    /// The month already holds a bill with this name. Expected when a
    /// rollover raced another writer; the caller can treat it as benign.
    #[error("a fixed bill named {name:?} already exists for {month}/{year}")]
    DuplicateRecurringBill {
        name: String,
        month: u32,
        year: i32,
    },
}

/// Service for managing fixed bills and their recurring rollover
#[derive(Clone)]
pub struct FixedBillService {
    repository: Arc<dyn FixedBillStorage>,
    /// Serializes the rollover's read-then-write sequence. Without it, two
    /// concurrent views of the same empty month both observe "no bills" and
    /// both copy the previous month forward.
    rollover_lock: Arc<Mutex<()>>,
}

impl FixedBillService {
    /// Create a new FixedBillService
    pub fn new(repository: Arc<dyn FixedBillStorage>) -> Self {
        Self {
            repository,
            rollover_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Make sure a viewed month has its fixed bills materialized.
    ///
    /// If the month (0-based) already has bills this is an idempotent no-op.
    /// Otherwise the previous month's recurring bills are copied forward with
    /// `is_paid` reset to false. Only one month back is ever consulted: a
    /// previous month with no bills leaves the viewed month empty too.
    ///
    /// Each copy is an independent write. A failing write surfaces to the
    /// caller with the bills created so far left in place; there is no
    /// transaction boundary to roll back.
    ///
    /// Returns the newly created bills.
    pub async fn ensure_month_populated(&self, month: u32, year: i32) -> Result<Vec<FixedBill>> {
        if !FixedBill::is_valid_month(month) {
            return Err(anyhow::anyhow!(
                "Invalid month: {}. Must be 0-11 (January-December)",
                month
            ));
        }

        let _guard = self.rollover_lock.lock().await;

        let existing = self
            .repository
            .find_fixed_bills(month, year)
            .await
            .context("failed to look up fixed bills for viewed month")?;
        if !existing.is_empty() {
            return Ok(Vec::new());
        }

        let (prev_month, prev_year) = calendar::previous_month(month, year);
        let recurring: Vec<FixedBill> = self
            .repository
            .find_fixed_bills(prev_month, prev_year)
            .await
            .context("failed to look up previous month's fixed bills")?
            .into_iter()
            .filter(|b| b.is_recurring)
            .collect();

        if recurring.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Rolling {} recurring bills forward into {} {}",
            recurring.len(),
            calendar::month_name(month),
            year
        );

        let mut created = Vec::new();
        for bill in recurring {
            let forwarded = FixedBill {
                id: FixedBill::generate_id(),
                name: bill.name,
                category: bill.category,
                amount: bill.amount,
                due_day: bill.due_day,
                month,
                year,
                is_paid: false,
                is_recurring: bill.is_recurring,
            };

            let stored = self
                .repository
                .store_fixed_bill(&forwarded)
                .await
                .with_context(|| {
                    format!(
                        "failed to forward fixed bill {:?} into {}/{}",
                        forwarded.name, month, year
                    )
                })?;

            if stored {
                created.push(forwarded);
            } else {
                warn!(
                    "Fixed bill {:?} already present in {}/{}, skipping",
                    forwarded.name, month, year
                );
            }
        }

        Ok(created)
    }

    /// Create a fixed bill for a specific month
    pub async fn create_fixed_bill(&self, request: CreateFixedBillRequest) -> Result<FixedBill> {
        if request.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Fixed bill name cannot be empty"));
        }

        if request.amount <= 0.0 {
            return Err(anyhow::anyhow!("Fixed bill amount must be positive"));
        }

        if !FixedBill::is_valid_month(request.month) {
            return Err(anyhow::anyhow!(
                "Invalid month: {}. Must be 0-11 (January-December)",
                request.month
            ));
        }

        let days = calendar::days_in_month(request.month, request.year);
        if request.due_day < 1 || request.due_day > days {
            return Err(anyhow::anyhow!(
                "Invalid due day {} for {} {}: month has {} days",
                request.due_day,
                calendar::month_name(request.month),
                request.year,
                days
            ));
        }

        let bill = FixedBill {
            id: FixedBill::generate_id(),
            name: request.name,
            category: request.category,
            amount: request.amount,
            due_day: request.due_day,
            month: request.month,
            year: request.year,
            is_paid: request.is_paid,
            is_recurring: request.is_recurring,
        };

        let stored = self.repository.store_fixed_bill(&bill).await?;
        if !stored {
            return Err(FixedBillError::DuplicateRecurringBill {
                name: bill.name,
                month: bill.month,
                year: bill.year,
            }
            .into());
        }

        info!(
            "Created fixed bill {:?} for {} {}: ${:.2} due on day {}",
            bill.name,
            calendar::month_name(bill.month),
            bill.year,
            bill.amount,
            bill.due_day
        );

        Ok(bill)
    }

    /// List a month's fixed bills, ordered ascending by due day
    pub async fn list_month(&self, month: u32, year: i32) -> Result<Vec<FixedBill>> {
        self.repository.find_fixed_bills(month, year).await
    }

    /// Paid and pending totals for a month's fixed bills
    pub async fn month_totals(&self, month: u32, year: i32) -> Result<FixedBillMonthTotals> {
        let bills = self.repository.find_fixed_bills(month, year).await?;

        Ok(FixedBillMonthTotals {
            paid: bills.iter().filter(|b| b.is_paid).map(|b| b.amount).sum(),
            pending: bills.iter().filter(|b| !b.is_paid).map(|b| b.amount).sum(),
        })
    }

    /// Toggle a bill's paid flag. Returns false if the bill does not exist
    pub async fn set_paid(&self, bill_id: &str, is_paid: bool) -> Result<bool> {
        let found = self.repository.set_paid(bill_id, is_paid).await?;
        if !found {
            warn!("No fixed bill found with id {}", bill_id);
        }
        Ok(found)
    }
}
