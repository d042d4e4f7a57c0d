//! Credit card billing cycle engine.
//!
//! Turns a card's purchases into month-ordered invoices, projecting every
//! installment onto the calendar month whose statement it lands on. Pure
//! functions over their inputs; no I/O, no state.

use chrono::Datelike;
use shared::{BillLineItem, CreditCard, MonthlyBill, ProjectedInvoice, Purchase};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Contract violations surfaced by the billing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BillingError {
    /// A purchase carried an installment count below 1. Dividing by it would
    /// silently corrupt every invoice the purchase touches, so the whole
    /// computation is rejected instead.
    #[error("purchase {purchase_id} has invalid installment count {count}; must be at least 1")]
    InvalidInstallmentCount { purchase_id: String, count: u32 },
}

/// Compute the monthly invoices for a single card.
///
/// Purchases belonging to other cards are ignored; cross-card aggregation is
/// the caller's concern (see [`forward_projection`]). Returns one
/// [`MonthlyBill`] per calendar month that receives at least one installment,
/// sorted ascending by `(year, month)`.
///
/// A purchase made after the card's closing day cannot appear on the cycle
/// that already closed, so its first installment anchors in the following
/// month; on or before the closing day it anchors in the purchase's own
/// month. The card's due day never influences month assignment.
///
/// Each installment's amount is `total_amount / installment_count`, with no
/// remainder-cent redistribution: when the total does not divide evenly the
/// installments can sum to slightly more or less than the total. Downstream
/// totals depend on this exact division, so it is kept as is.
pub fn calculate_bills(
    purchases: &[Purchase],
    card: &CreditCard,
) -> Result<Vec<MonthlyBill>, BillingError> {
    let card_purchases: Vec<&Purchase> = purchases
        .iter()
        .filter(|p| p.card_id == card.id)
        .collect();

    // Reject up front so an invalid purchase never yields a partial result.
    for purchase in &card_purchases {
        if purchase.installment_count < 1 {
            return Err(BillingError::InvalidInstallmentCount {
                purchase_id: purchase.id.clone(),
                count: purchase.installment_count,
            });
        }
    }

    let mut bills: BTreeMap<(i32, u32), MonthlyBill> = BTreeMap::new();

    for purchase in card_purchases {
        let year = purchase.date.year();
        let month0 = purchase.date.month0() as i32;
        let day = purchase.date.day();

        // Purchase day 10 against closing day 5 -> the statement already
        // closed, first installment lands one month later.
        let offset = if day > card.closing_day { 1 } else { 0 };
        let anchor = month0 + offset;

        let amount_per_installment = purchase.total_amount / purchase.installment_count as f64;

        debug!(
            purchase_id = %purchase.id,
            anchor,
            installments = purchase.installment_count,
            "assigning installments"
        );

        for i in 0..purchase.installment_count {
            // Normalize the unbounded month index with floored division so
            // indexes past December (or, defensively, below January) land in
            // the right year.
            let unnormalized = anchor + i as i32;
            let target_year = year + unnormalized.div_euclid(12);
            let target_month = unnormalized.rem_euclid(12) as u32;

            let bill = bills
                .entry((target_year, target_month))
                .or_insert_with(|| MonthlyBill {
                    month: target_month,
                    year: target_year,
                    total: 0.0,
                    items: Vec::new(),
                });

            bill.total += amount_per_installment;
            bill.items.push(BillLineItem {
                purchase_id: purchase.id.clone(),
                description: purchase.description.clone(),
                category: purchase.category.clone(),
                installment_number: i + 1,
                installment_count: purchase.installment_count,
                amount: amount_per_installment,
                source_date: purchase.date,
            });
        }
    }

    Ok(bills.into_values().collect())
}

/// Merge every card's invoices into a forward-looking projection.
///
/// Invoice totals are combined by `(year, month)`, months before
/// `(from_year, from_month)` are dropped, and at most `months` entries are
/// returned in ascending month order. This backs the dashboard's upcoming
/// invoices chart.
pub fn forward_projection(
    purchases: &[Purchase],
    cards: &[CreditCard],
    from_month: u32,
    from_year: i32,
    months: usize,
) -> Result<Vec<ProjectedInvoice>, BillingError> {
    let mut totals: BTreeMap<i64, ProjectedInvoice> = BTreeMap::new();

    for card in cards {
        for bill in calculate_bills(purchases, card)? {
            let key = bill.year as i64 * 12 + bill.month as i64;
            let entry = totals.entry(key).or_insert_with(|| ProjectedInvoice {
                month: bill.month,
                year: bill.year,
                total: 0.0,
            });
            entry.total += bill.total;
        }
    }

    let horizon = from_year as i64 * 12 + from_month as i64;
    Ok(totals
        .into_iter()
        .filter(|(key, _)| *key >= horizon)
        .map(|(_, invoice)| invoice)
        .take(months)
        .collect())
}

/// The best day to make a purchase on a card: the day right after the
/// statement closes, giving the longest run until the invoice is due.
pub fn best_purchase_day(closing_day: u32) -> u32 {
    let best = closing_day + 1;
    if best > 31 {
        1
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_card(closing_day: u32, due_day: u32) -> CreditCard {
        CreditCard {
            id: "card_1".to_string(),
            name: "Test Card".to_string(),
            due_day,
            closing_day,
        }
    }

    fn test_purchase(
        id: &str,
        card_id: &str,
        date: (i32, u32, u32),
        total_amount: f64,
        installment_count: u32,
    ) -> Purchase {
        Purchase {
            id: id.to_string(),
            card_id: card_id.to_string(),
            description: format!("Purchase {}", id),
            category: "General".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            total_amount,
            installment_count,
        }
    }

    #[test]
    fn test_worked_example_closing_5_due_15() {
        // 2024-03-10 is past closing day 5, so the purchase anchors in April.
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 3, 10), 300.0, 3)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        assert_eq!(bills.len(), 3);
        // April, May, June 2024 (0-based months 3, 4, 5)
        assert_eq!((bills[0].year, bills[0].month), (2024, 3));
        assert_eq!((bills[1].year, bills[1].month), (2024, 4));
        assert_eq!((bills[2].year, bills[2].month), (2024, 5));

        for (i, bill) in bills.iter().enumerate() {
            assert_eq!(bill.items.len(), 1);
            assert_eq!(bill.items[0].amount, 100.0);
            assert_eq!(bill.items[0].installment_number, (i + 1) as u32);
            assert_eq!(bill.items[0].installment_count, 3);
            assert_eq!(bill.total, 100.0);
        }
    }

    #[test]
    fn test_purchase_on_closing_day_stays_in_current_cycle() {
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 3, 5), 50.0, 1)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        assert_eq!(bills.len(), 1);
        // Day 5 <= closing day 5: March (month 2, 0-based)
        assert_eq!((bills[0].year, bills[0].month), (2024, 2));
    }

    #[test]
    fn test_purchase_after_closing_day_rolls_forward() {
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 3, 6), 50.0, 1)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        assert_eq!(bills.len(), 1);
        assert_eq!((bills[0].year, bills[0].month), (2024, 3));
    }

    #[test]
    fn test_due_day_does_not_affect_month_assignment() {
        let purchases = vec![test_purchase("p1", "card_1", (2024, 3, 10), 50.0, 1)];

        let early_due = calculate_bills(&purchases, &test_card(5, 1)).unwrap();
        let late_due = calculate_bills(&purchases, &test_card(5, 28)).unwrap();

        assert_eq!(early_due[0].month, late_due[0].month);
        assert_eq!(early_due[0].year, late_due[0].year);
    }

    #[test]
    fn test_installments_span_year_rollover() {
        // December purchase before closing anchors in December and the
        // remaining installments continue into the next year.
        let card = test_card(20, 10);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 12, 15), 90.0, 3)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        assert_eq!(bills.len(), 3);
        assert_eq!((bills[0].year, bills[0].month), (2024, 11)); // December
        assert_eq!((bills[1].year, bills[1].month), (2025, 0)); // January
        assert_eq!((bills[2].year, bills[2].month), (2025, 1)); // February
        assert_eq!(bills[0].items[0].installment_number, 1);
        assert_eq!(bills[1].items[0].installment_number, 2);
        assert_eq!(bills[2].items[0].installment_number, 3);
    }

    #[test]
    fn test_december_purchase_after_closing_anchors_in_january() {
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 12, 28), 100.0, 1)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        assert_eq!(bills.len(), 1);
        assert_eq!((bills[0].year, bills[0].month), (2025, 0));
    }

    #[test]
    fn test_every_installment_lands_in_a_distinct_month() {
        let card = test_card(10, 20);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 7, 3), 2400.0, 24)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        let line_items: Vec<_> = bills
            .iter()
            .flat_map(|b| b.items.iter())
            .filter(|i| i.purchase_id == "p1")
            .collect();
        assert_eq!(line_items.len(), 24);

        let mut months: Vec<(i32, u32)> = bills
            .iter()
            .filter(|b| !b.items.is_empty())
            .map(|b| (b.year, b.month))
            .collect();
        let before = months.len();
        months.dedup();
        assert_eq!(months.len(), before);
        assert_eq!(months.len(), 24);
    }

    #[test]
    fn test_purchases_for_other_cards_are_ignored() {
        let card = test_card(5, 15);
        let purchases = vec![
            test_purchase("mine", "card_1", (2024, 3, 10), 300.0, 3),
            test_purchase("other", "card_2", (2024, 3, 10), 999.0, 2),
        ];

        let bills = calculate_bills(&purchases, &card).unwrap();

        assert!(bills
            .iter()
            .flat_map(|b| b.items.iter())
            .all(|i| i.purchase_id == "mine"));
    }

    #[test]
    fn test_invalid_installment_count_rejects_whole_computation() {
        let card = test_card(5, 15);
        let purchases = vec![
            test_purchase("good", "card_1", (2024, 3, 10), 300.0, 3),
            test_purchase("bad", "card_1", (2024, 4, 2), 100.0, 0),
        ];

        let err = calculate_bills(&purchases, &card).unwrap_err();
        assert_eq!(
            err,
            BillingError::InvalidInstallmentCount {
                purchase_id: "bad".to_string(),
                count: 0,
            }
        );
    }

    #[test]
    fn test_zero_installments_on_other_card_is_filtered_not_rejected() {
        let card = test_card(5, 15);
        let purchases = vec![
            test_purchase("good", "card_1", (2024, 3, 10), 300.0, 3),
            test_purchase("bad", "card_2", (2024, 4, 2), 100.0, 0),
        ];

        assert!(calculate_bills(&purchases, &card).is_ok());
    }

    #[test]
    fn test_empty_purchases_produce_no_bills() {
        let card = test_card(5, 15);
        assert!(calculate_bills(&[], &card).unwrap().is_empty());
    }

    #[test]
    fn test_installment_amounts_use_exact_division() {
        // 100 over 3 does not divide evenly; every installment carries the
        // same exact quotient and no cent is redistributed.
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 3, 10), 100.0, 3)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        let expected = 100.0 / 3.0;
        for bill in &bills {
            assert_eq!(bill.items[0].amount, expected);
        }
    }

    #[test]
    fn test_unredistributed_split_can_drift_from_the_total() {
        // 1.0 over 10 installments: each share is the f64 nearest to 0.1,
        // and adding ten of them gives 0.9999999999999999 rather than the
        // purchase total. Kept as is; downstream totals assume this exact
        // division.
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 3, 10), 1.0, 10)];

        let bills = calculate_bills(&purchases, &card).unwrap();

        let sum: f64 = bills
            .iter()
            .flat_map(|b| b.items.iter())
            .map(|i| i.amount)
            .sum();
        assert_ne!(sum, 1.0);
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bills_sorted_ascending_and_items_keep_insertion_order() {
        let card = test_card(15, 10);
        let purchases = vec![
            // November 20 is past closing day 15, anchors December 2024
            test_purchase("first", "card_1", (2024, 11, 20), 60.0, 2),
            // December 1 is before closing, also lands in December 2024
            test_purchase("second", "card_1", (2024, 12, 1), 30.0, 1),
        ];

        let bills = calculate_bills(&purchases, &card).unwrap();

        let keys: Vec<(i32, u32)> = bills.iter().map(|b| (b.year, b.month)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        // Both purchases share December 2024 (month 11); items keep the
        // order the purchases were processed in.
        let december = bills
            .iter()
            .find(|b| b.year == 2024 && b.month == 11)
            .unwrap();
        assert_eq!(december.items.len(), 2);
        assert_eq!(december.items[0].purchase_id, "first");
        assert_eq!(december.items[1].purchase_id, "second");
    }

    #[test]
    fn test_bill_total_is_sum_of_its_items() {
        let card = test_card(5, 15);
        let purchases = vec![
            test_purchase("p1", "card_1", (2024, 3, 10), 300.0, 3),
            test_purchase("p2", "card_1", (2024, 4, 1), 45.0, 1),
        ];

        let bills = calculate_bills(&purchases, &card).unwrap();

        for bill in bills {
            let item_sum: f64 = bill.items.iter().map(|i| i.amount).sum();
            assert_eq!(bill.total, item_sum);
        }
    }

    #[test]
    fn test_forward_projection_merges_cards_by_month() {
        let card_a = test_card(5, 15);
        let mut card_b = test_card(20, 25);
        card_b.id = "card_2".to_string();

        let purchases = vec![
            // Anchors April 2024 on card A
            test_purchase("a1", "card_1", (2024, 3, 10), 300.0, 3),
            // Anchors April 2024 on card B (day 2 <= closing 20)
            test_purchase("b1", "card_2", (2024, 4, 2), 50.0, 1),
        ];

        let projection =
            forward_projection(&purchases, &[card_a, card_b], 0, 2024, 12).unwrap();

        let april = projection
            .iter()
            .find(|p| p.year == 2024 && p.month == 3)
            .unwrap();
        assert_eq!(april.total, 150.0);
        assert_eq!(projection.len(), 3); // April, May, June
    }

    #[test]
    fn test_forward_projection_window() {
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("p1", "card_1", (2024, 1, 2), 120.0, 12)];

        // Anchored January 2024, 12 installments through December 2024.
        // Window starts in June (month 5) and keeps at most 3 entries.
        let projection = forward_projection(&purchases, &[card], 5, 2024, 3).unwrap();

        assert_eq!(projection.len(), 3);
        assert_eq!((projection[0].year, projection[0].month), (2024, 5));
        assert_eq!((projection[2].year, projection[2].month), (2024, 7));
    }

    #[test]
    fn test_forward_projection_propagates_engine_errors() {
        let card = test_card(5, 15);
        let purchases = vec![test_purchase("bad", "card_1", (2024, 3, 10), 100.0, 0)];

        assert!(forward_projection(&purchases, &[card], 0, 2024, 6).is_err());
    }

    #[test]
    fn test_best_purchase_day() {
        assert_eq!(best_purchase_day(5), 6);
        assert_eq!(best_purchase_day(30), 31);
        assert_eq!(best_purchase_day(31), 1);
    }
}
