//! # Storage Module
//!
//! Handles all data persistence for the Billfold application.
//!
//! This module abstracts away the specific storage implementation details and
//! provides a consistent interface for persisting and retrieving fixed bills.
//! The implementation can be swapped out (SQLite, in-memory, a remote API)
//! without affecting the domain logic.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: Saving fixed bills to disk
//! - **Data Retrieval**: Loading stored bills back into memory
//! - **Duplicate Absorption**: A unique index on `(year, month, name)` turns
//!   a lost recurring-rollover race into a skipped insert instead of a
//!   duplicated bill
//! - **Connection Management**: Handling database connections and schema setup
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: Clean separation between domain and data access
//! - **Dependency Inversion**: The domain depends on [`FixedBillStorage`],
//!   not on a concrete backend
//! - **Testability**: Unique in-memory databases per test

pub mod db;
pub mod fixed_bill_repository;
pub mod memory;
pub mod traits;

pub use db::DbConnection;
pub use fixed_bill_repository::FixedBillRepository;
pub use memory::MemoryFixedBillRepository;
pub use traits::FixedBillStorage;
