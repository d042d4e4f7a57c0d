use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of installments a purchase can be split into.
pub const MAX_INSTALLMENTS: u32 = 24;

/// A credit card purchase, possibly split into monthly installments.
///
/// The purchase date is a plain calendar date with no time-of-day or
/// timezone semantics; it is interpreted as a local date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    /// ID of the credit card this purchase belongs to
    pub card_id: String,
    /// Description of the purchase (e.g. "Groceries")
    pub description: String,
    /// Category label used for grouping (e.g. "Food")
    pub category: String,
    /// Calendar date the purchase was made
    pub date: NaiveDate,
    /// Total purchase amount, non-negative
    pub total_amount: f64,
    /// Number of monthly installments (1-24)
    pub installment_count: u32,
}

impl Purchase {
    /// Check whether an installment count is within the accepted range (1-24)
    pub fn is_valid_installment_count(count: u32) -> bool {
        (1..=MAX_INSTALLMENTS).contains(&count)
    }
}

/// Billing cycle configuration for a credit card.
///
/// `closing_day` and `due_day` are day-of-month values with no guaranteed
/// relationship to each other or to the length of any given month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: String,
    /// Display name of the card (e.g. "Visa Platinum")
    pub name: String,
    /// Day of the month the cycle's invoice is payable (1-31).
    /// Display context only; it never affects month assignment.
    pub due_day: u32,
    /// Day of the month after which new purchases roll to the next cycle (1-31)
    pub closing_day: u32,
}

impl CreditCard {
    /// Check whether a closing/due day is within the accepted range (1-31)
    pub fn is_valid_cycle_day(day: u32) -> bool {
        (1..=31).contains(&day)
    }
}

/// One installment of a purchase as it appears on a monthly invoice.
///
/// Derived by the billing engine, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLineItem {
    /// ID of the purchase this installment came from
    pub purchase_id: String,
    pub description: String,
    pub category: String,
    /// 1-based position of this installment within the purchase
    pub installment_number: u32,
    /// Total number of installments for the purchase
    pub installment_count: u32,
    /// Per-installment share of the purchase total
    pub amount: f64,
    /// Date of the originating purchase, for display only
    pub source_date: NaiveDate,
}

/// An aggregated credit card invoice for a single calendar month.
///
/// Months are 0-based throughout the public API (0 = January, 11 = December),
/// matching how fixed bills are keyed. `total` is always the arithmetic sum
/// of its own line items' amounts; it is never assigned independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBill {
    /// 0-based month (0 = January)
    pub month: u32,
    pub year: i32,
    /// Sum of the line items' amounts
    pub total: f64,
    /// Line items in the order they were produced
    pub items: Vec<BillLineItem>,
}

/// A single month's combined invoice total across every card, used for the
/// dashboard's forward-looking projection chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedInvoice {
    /// 0-based month (0 = January)
    pub month: u32,
    pub year: i32,
    /// Combined invoice total across all cards for this month
    pub total: f64,
}

/// A recurring or one-off fixed monthly bill (rent, subscriptions, ...).
///
/// Created explicitly by the user, or implicitly when the previous month's
/// recurring bills are rolled forward into a month the user navigates to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedBill {
    pub id: String,
    /// Name of the bill (e.g. "Rent")
    pub name: String,
    /// Category label used for grouping
    pub category: String,
    /// Amount due, positive
    pub amount: f64,
    /// Day of the month the bill is due (1-31, bounded by the month's length)
    pub due_day: u32,
    /// 0-based month this bill belongs to (0 = January)
    pub month: u32,
    pub year: i32,
    /// Whether the bill has been paid for its month
    pub is_paid: bool,
    /// Whether the bill is copied forward into months with no bills yet
    pub is_recurring: bool,
}

impl FixedBill {
    /// Check whether a 0-based month value is within range (0 = January)
    pub fn is_valid_month(month: u32) -> bool {
        month <= 11
    }

    /// Generate a unique ID for a new fixed bill
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Request to create a fixed bill for a specific month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFixedBillRequest {
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub due_day: u32,
    /// 0-based month (0 = January)
    pub month: u32,
    pub year: i32,
    pub is_paid: bool,
    pub is_recurring: bool,
}

/// Paid/pending amounts for one month of fixed bills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedBillMonthTotals {
    /// Sum of the month's paid bills
    pub paid: f64,
    /// Sum of the month's unpaid bills
    pub pending: f64,
}
