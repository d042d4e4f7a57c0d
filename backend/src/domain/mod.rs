//! # Domain Module
//!
//! Contains all business logic for the Billfold application.
//!
//! This module encapsulates the core business rules for projecting financial
//! obligations across calendar months. It operates independently of any
//! specific UI framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **billing**: Credit card billing cycle engine and cross-card projection
//! - **calendar**: Month arithmetic shared by the domain services
//! - **fixed_bill_service**: Fixed monthly bills and recurring rollover
//!
//! ## Core Concepts
//!
//! - **Closing day**: the day of the month after which new purchases are
//!   deferred to the next billing cycle
//! - **Due day**: the day a cycle's invoice is payable; display context only
//! - **Anchor month**: the first calendar month in which a purchase's first
//!   installment is billed
//! - **Recurring rollover**: copying the previous month's recurring fixed
//!   bills into a month the user navigates to for the first time
//!
//! ## Design Principles
//!
//! - **Pure where possible**: the billing engine has no I/O and no state
//! - **Storage Agnostic**: the fixed bill service works against a storage
//!   trait, not a concrete backend
//! - **Explicit month math**: month/year normalization is spelled out with
//!   floored division rather than delegated to date constructors

pub mod billing;
pub mod calendar;
pub mod fixed_bill_service;

pub use billing::*;
pub use fixed_bill_service::*;
