//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::FixedBill;

/// Trait defining the interface for fixed bill storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to work with different storage backends
/// (SQL databases, in-memory stores, remote APIs) without modification.
#[async_trait]
pub trait FixedBillStorage: Send + Sync {
    /// List the fixed bills for a month (0-based) and year, ordered
    /// ascending by due day
    async fn find_fixed_bills(&self, month: u32, year: i32) -> Result<Vec<FixedBill>>;

    /// Store a new fixed bill
    ///
    /// Returns `false` when a bill with the same `(year, month, name)` is
    /// already present and nothing was written. Backends without a
    /// uniqueness guarantee always write and return `true`.
    async fn store_fixed_bill(&self, bill: &FixedBill) -> Result<bool>;

    /// Retrieve a specific fixed bill by ID
    async fn get_fixed_bill(&self, bill_id: &str) -> Result<Option<FixedBill>>;

    /// Update an existing fixed bill
    async fn update_fixed_bill(&self, bill: &FixedBill) -> Result<()>;

    /// Delete a fixed bill by ID
    /// Returns true if the bill was found and deleted, false otherwise
    async fn delete_fixed_bill(&self, bill_id: &str) -> Result<bool>;

    /// Set the paid flag on a bill
    /// Returns true if the bill was found, false otherwise
    async fn set_paid(&self, bill_id: &str, is_paid: bool) -> Result<bool>;
}
