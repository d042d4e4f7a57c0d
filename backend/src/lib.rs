//! # Billfold Backend
//!
//! Contains all non-UI logic for the Billfold personal finance application.
//!
//! This crate brings together:
//! - **Domain**: Business logic for credit card billing cycles and fixed bills
//! - **Storage**: Data persistence mechanisms (SQLite, in-memory)
//!
//! The backend is UI-agnostic: a REST layer, a desktop shell, or a CLI can
//! all sit on top of it without modification.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! Presentation layer (statement view, projection chart)
//!     ↓
//! Domain layer (billing engine, fixed bill service)
//!     ↓
//! Storage layer (repositories, SQLite)
//! ```
//!
//! The billing engine is a pure function over purchases and card
//! configuration; only the fixed bill side touches storage.

pub mod domain;
pub mod storage;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::FixedBillService;
use crate::storage::{DbConnection, FixedBillRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub fixed_bill_service: FixedBillService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::init().await?;

    info!("Setting up domain services");
    let repository = Arc::new(FixedBillRepository::new(db));
    let fixed_bill_service = FixedBillService::new(repository);

    Ok(AppState { fixed_bill_service })
}
