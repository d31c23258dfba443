//! Daily report computation and delivery
//!
//! Wraps the aggregation engine for the read-only "today" statistics and
//! delivers the reduced daily summary over the notification sink. Unlike the
//! receipt path, report delivery is an explicit user-triggered action: both
//! a missing destination and a sink failure are surfaced to the caller, and
//! neither is retried automatically.

use crate::core::aggregation::{aggregate_for_date, DailyStats};
use crate::core::clock::Clock;
use crate::core::notify::{format_daily_report, group_thousands, NotificationSink};
use crate::core::traits::EntryStore;
use crate::types::ParkingError;
use std::sync::Arc;
use tracing::info;

/// Configuration key expected to hold the report destination phone
pub const MANAGER_PHONE_KEY: &str = "MANAGER_PHONE";

/// Computes and delivers daily summaries
pub struct ReportService<E, N, C>
where
    E: EntryStore,
    N: NotificationSink,
    C: Clock,
{
    entries: Arc<E>,
    sink: Arc<N>,
    clock: Arc<C>,
    manager_phone: Option<String>,
}

impl<E, N, C> ReportService<E, N, C>
where
    E: EntryStore,
    N: NotificationSink,
    C: Clock,
{
    /// Create a report service
    ///
    /// `manager_phone` is the configured report destination; `None` makes
    /// [`send_daily_report`](Self::send_daily_report) fail with a
    /// Configuration error.
    pub fn new(
        entries: Arc<E>,
        sink: Arc<N>,
        clock: Arc<C>,
        manager_phone: Option<String>,
    ) -> Self {
        ReportService {
            entries,
            sink,
            clock,
            manager_phone,
        }
    }

    /// Full statistics for today, including the building breakdown
    pub fn compute_today(&self) -> DailyStats {
        let today = self.clock.today();
        aggregate_for_date(&self.entries.entries_on(&today), &today)
    }

    /// Compute today's summary and deliver it to the configured destination
    ///
    /// The SMS carries the reduced statistics set (no building breakdown).
    ///
    /// # Errors
    ///
    /// - Configuration error when no destination phone is configured
    /// - Delivery error when the sink rejects the message
    pub fn send_daily_report(&self) -> Result<(), ParkingError> {
        let phone = self
            .manager_phone
            .as_deref()
            .ok_or_else(|| ParkingError::not_configured(MANAGER_PHONE_KEY))?;

        let stats = self.compute_today();
        let message = format_daily_report(&stats);
        self.sink.send(phone, &message)?;

        info!(date = %stats.date, vehicles = stats.total_vehicles, "daily report sent");
        Ok(())
    }
}

/// Render the full daily statistics as a text block for the CLI
///
/// Extends the SMS summary with per-type revenue and the building breakdown.
pub fn render_full_report(stats: &DailyStats) -> String {
    let mut lines = vec![
        format!("ParkaSmart Report {}", stats.date),
        format!(
            "Vehicles: {} (paid {}, unpaid {})",
            stats.total_vehicles, stats.paid_count, stats.unpaid_count
        ),
        format!(
            "Tenants: {} (Ksh {})",
            stats.tenant_count,
            group_thousands(stats.tenant_revenue)
        ),
        format!(
            "Non-tenants: {} (Ksh {})",
            stats.non_tenant_count,
            group_thousands(stats.non_tenant_revenue)
        ),
        format!(
            "Motorcycles: {} (Ksh {})",
            stats.motorcycle_count,
            group_thousands(stats.motorcycle_revenue)
        ),
        format!("Cash: Ksh {}", group_thousands(stats.cash_total)),
        format!("M-Pesa: Ksh {}", group_thousands(stats.mpesa_total)),
        format!("Total: Ksh {}", group_thousands(stats.grand_total)),
    ];

    if !stats.building_breakdown.is_empty() {
        lines.push("Buildings:".to_string());
        for building in &stats.building_breakdown {
            lines.push(format!(
                "  {}: {} (Ksh {})",
                building.building,
                building.count,
                group_thousands(building.total)
            ));
        }
    }

    lines.join("\n")
}
