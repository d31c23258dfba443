//! Notification sink and the fire-and-forget receipt path
//!
//! SMS delivery is an external collaborator; the engine sees it as the
//! [`NotificationSink`] port. This module also owns the message texts (the
//! receipt and the daily report) and the [`ReceiptDispatcher`], which
//! decouples receipt sending from entry creation: the request path pushes a
//! job onto a channel and returns immediately, a background worker drains
//! the channel and calls the sink. Worker-side failures are logged and
//! discarded; they are observable in logs only, never in the original
//! response.

use crate::core::aggregation::DailyStats;
use crate::core::clock::Clock;
use crate::types::{ParkingError, PaymentMethod};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Outbound notification port
///
/// Implementations deliver a text message to a phone number. The engine
/// never retries; failure policy is the caller's concern.
pub trait NotificationSink: Send + Sync {
    /// Deliver `message` to `to`
    ///
    /// # Errors
    ///
    /// Returns a Delivery error when the underlying gateway rejects or fails
    /// the message.
    fn send(&self, to: &str, message: &str) -> Result<(), ParkingError>;
}

/// Sink that writes outbound messages to the log
///
/// Stands in for the SMS gateway in the CLI and in development setups.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send(&self, to: &str, message: &str) -> Result<(), ParkingError> {
        info!(to = %to, len = message.len(), "SMS sent");
        Ok(())
    }
}

/// A receipt job queued at entry creation
#[derive(Debug, Clone)]
pub struct Receipt {
    pub phone: String,
    pub plate: String,
    pub amount: i64,
    pub method: PaymentMethod,
    pub building: String,
    pub ref_code: String,
}

/// Render an amount with comma thousands separators: `1234567` -> `"1,234,567"`
pub fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Render the SMS receipt text for a logged entry
pub fn format_receipt(receipt: &Receipt, now: DateTime<Utc>) -> String {
    [
        "ParkaSmart \u{2713}".to_string(),
        format!("Plate: {}", receipt.plate),
        format!("Location: {}", receipt.building),
        format!(
            "Amount: Ksh {} ({})",
            group_thousands(receipt.amount),
            receipt.method.label()
        ),
        format!("Time: {} | {}", now.format("%H:%M"), now.format("%d/%m/%y")),
        format!("Ref: {}", receipt.ref_code),
        "Thank you for parking with us!".to_string(),
    ]
    .join("\n")
}

/// Render the daily report SMS text
///
/// The reduced statistics set: counts, per-type counts, payment totals,
/// grand total, paid/unpaid. The building breakdown stays out of the SMS.
pub fn format_daily_report(stats: &DailyStats) -> String {
    let short_date = match stats.date.split('-').collect::<Vec<_>>()[..] {
        [y, m, d] if y.len() == 4 => format!("{}/{}/{}", d, m, &y[2..]),
        _ => stats.date.clone(),
    };

    [
        "ParkaSmart Report".to_string(),
        short_date,
        String::new(),
        format!("Vehicles: {}", stats.total_vehicles),
        format!(
            "Tenants: {} | Non: {} | Boda: {}",
            stats.tenant_count, stats.non_tenant_count, stats.motorcycle_count
        ),
        String::new(),
        format!("Cash: Ksh {}", group_thousands(stats.cash_total)),
        format!("M-Pesa: Ksh {}", group_thousands(stats.mpesa_total)),
        format!("Total: Ksh {}", group_thousands(stats.grand_total)),
        String::new(),
        format!(
            "Paid: {} | Unpaid: {}",
            stats.paid_count, stats.unpaid_count
        ),
    ]
    .join("\n")
}

/// Handle for queueing receipts from the entry-creation path
///
/// Cloneable; all clones feed the same worker. Dropping every clone closes
/// the channel and lets the worker task finish.
#[derive(Clone)]
pub struct ReceiptDispatcher {
    tx: mpsc::UnboundedSender<Receipt>,
}

impl ReceiptDispatcher {
    /// Spawn the background worker on the current tokio runtime and return
    /// the dispatch handle
    ///
    /// The worker formats and sends each queued receipt through the sink.
    /// Delivery failures are logged at warn level and dropped; nothing is
    /// retried and nothing reaches the entry-creation caller.
    pub fn spawn(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Receipt>();

        tokio::spawn(async move {
            while let Some(receipt) = rx.recv().await {
                let message = format_receipt(&receipt, clock.now());
                match sink.send(&receipt.phone, &message) {
                    Ok(()) => info!(plate = %receipt.plate, ref_code = %receipt.ref_code, "receipt sent"),
                    Err(e) => warn!(plate = %receipt.plate, error = %e, "receipt delivery failed"),
                }
            }
        });

        ReceiptDispatcher { tx }
    }

    /// Queue a receipt without waiting for delivery
    ///
    /// Never fails from the caller's perspective; a closed worker channel is
    /// logged and the receipt dropped.
    pub fn dispatch(&self, receipt: Receipt) {
        if let Err(e) = self.tx.send(receipt) {
            warn!(plate = %e.0.plate, "receipt worker gone, receipt dropped");
        }
    }
}
