//! USSD menu state machine
//!
//! The feature-phone entry path. USSD sessions are stateless on our side:
//! the gateway sends the cumulative menu path ("1*KDA456B*2") on every
//! request, and the current state is inferred entirely from the shape of
//! that string. Each response is either `CON` (session continues, more input
//! expected) or `END` (terminal, gateway closes the session).
//!
//! Menu tree:
//!
//! ```text
//! ""            CON main menu (log entry / today's total / mark paid)
//! 1             CON prompt for plate
//! 1*PLATE       CON tenant-rate or default-rate confirmation (cash/mpesa/cancel)
//! 1*PLATE*N     END cancelled, or entry logged with reference code
//! 2             END today's vehicle count and revenue
//! 3             CON prompt for plate
//! 3*PLATE       END first unpaid entry marked paid, or not-found
//! other         END invalid option
//! ```

use crate::core::clock::Clock;
use crate::core::entry_service::EntryService;
use crate::core::traits::{EntryStore, TenantStore};
use crate::types::{EntryInput, PaymentMethod, Tenant, TenantType, DEFAULT_MONTHLY_RATE};
use std::fmt;
use tracing::warn;

/// Separator between accumulated menu choices in the request text
const PATH_SEPARATOR: char = '*';

/// One inbound USSD request from the gateway
#[derive(Debug, Clone)]
pub struct UssdRequest {
    /// Gateway session identifier (opaque; sessions are stateless here)
    pub session_id: String,

    /// Caller's phone number, used as the receipt phone for walk-ins
    pub phone_number: String,

    /// Cumulative menu path, segments separated by `*`
    pub text: String,
}

/// A USSD response payload
///
/// `Continue` keeps the session open for more input, `End` terminates it.
/// The gateway protocol encodes this as a `CON `/`END ` prefix on the text,
/// which [`fmt::Display`] produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UssdResponse {
    Continue(String),
    End(String),
}

impl UssdResponse {
    /// Whether this response terminates the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, UssdResponse::End(_))
    }

    /// The message text without the protocol prefix
    pub fn text(&self) -> &str {
        match self {
            UssdResponse::Continue(text) | UssdResponse::End(text) => text,
        }
    }
}

impl fmt::Display for UssdResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UssdResponse::Continue(text) => write!(f, "CON {}", text),
            UssdResponse::End(text) => write!(f, "END {}", text),
        }
    }
}

/// Routes USSD requests through the entry service
pub struct UssdRouter<T, E, C>
where
    T: TenantStore,
    E: EntryStore,
    C: Clock,
{
    service: EntryService<T, E, C>,
}

impl<T, E, C> UssdRouter<T, E, C>
where
    T: TenantStore,
    E: EntryStore,
    C: Clock,
{
    pub fn new(service: EntryService<T, E, C>) -> Self {
        UssdRouter { service }
    }

    /// Handle one request, deriving the state from the cumulative path
    pub fn handle(&self, request: &UssdRequest) -> UssdResponse {
        let text = request.text.trim();
        let parts: Vec<&str> = text
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();

        if text.is_empty() {
            return UssdResponse::Continue(
                "Welcome to ParkaSmart\n\
                 1. Log Vehicle Entry\n\
                 2. Check Today's Total\n\
                 3. Mark Vehicle as Paid"
                    .to_string(),
            );
        }

        // Non-empty text can still filter down to nothing (e.g. "*")
        let Some(first) = parts.first() else {
            return UssdResponse::End("Invalid option. Please try again.".to_string());
        };

        match (*first, parts.len()) {
            ("1", 1) => UssdResponse::Continue("Enter vehicle plate number:".to_string()),
            ("1", 2) => self.confirm_entry_menu(parts[1]),
            ("1", 3) => self.log_entry(parts[1], parts[2], &request.phone_number),
            ("2", _) => self.today_summary(),
            ("3", 1) => {
                UssdResponse::Continue("Enter plate number to mark as paid:".to_string())
            }
            ("3", 2) => self.settle_by_plate(parts[1]),
            _ => UssdResponse::End("Invalid option. Please try again.".to_string()),
        }
    }

    /// Second step of the entry flow: rate confirmation for the given plate
    fn confirm_entry_menu(&self, raw_plate: &str) -> UssdResponse {
        let plate = raw_plate.to_uppercase();
        match self.service.find_tenant(&plate) {
            Some(tenant) => UssdResponse::Continue(format!(
                "{} - {}\n\
                 Amount: Ksh {}\n\
                 1. Confirm (Cash)\n\
                 2. Confirm (M-Pesa)\n\
                 0. Cancel",
                tenant.name, tenant.building, tenant.monthly_rate
            )),
            None => UssdResponse::Continue(format!(
                "Non-tenant vehicle: {}\n\
                 Amount: Ksh {}\n\
                 1. Confirm (Cash)\n\
                 2. Confirm (M-Pesa)\n\
                 0. Cancel",
                plate, DEFAULT_MONTHLY_RATE
            )),
        }
    }

    /// Terminal step of the entry flow: cancel or create the entry
    fn log_entry(&self, raw_plate: &str, choice: &str, caller_phone: &str) -> UssdResponse {
        if choice == "0" {
            return UssdResponse::End("Entry cancelled.".to_string());
        }

        let plate = raw_plate.to_uppercase();
        let tenant = self.service.find_tenant(&plate);
        let method = if choice == "2" {
            PaymentMethod::Mpesa
        } else {
            PaymentMethod::Cash
        };

        let input = match &tenant {
            Some(Tenant {
                name,
                phone,
                shop_number,
                building,
                monthly_rate,
                ..
            }) => EntryInput {
                plate_number: plate.clone(),
                driver_name: Some(name.clone()),
                phone: phone.clone().or_else(|| Some(caller_phone.to_string())),
                shop_number: shop_number.clone(),
                building: Some(building.clone()),
                tenant_type: Some(TenantType::Tenant),
                payment_method: Some(method),
                amount_paid: Some(*monthly_rate),
                is_paid: Some(true),
            },
            None => EntryInput {
                plate_number: plate.clone(),
                driver_name: Some("Walk-in".to_string()),
                phone: Some(caller_phone.to_string()),
                shop_number: None,
                building: Some("N/A".to_string()),
                tenant_type: Some(TenantType::NonTenant),
                payment_method: Some(method),
                amount_paid: Some(DEFAULT_MONTHLY_RATE),
                is_paid: Some(true),
            },
        };

        match self.service.create_entry(input) {
            Ok(entry) => UssdResponse::End(format!(
                "Vehicle {} logged.\n\
                 Ref: {}\n\
                 Method: {}",
                entry.plate_number,
                entry.reference_code,
                entry.payment_method.label()
            )),
            Err(e) => {
                // All fields are supplied above, so this is unexpected
                warn!(plate = %plate, error = %e, "USSD entry creation failed");
                UssdResponse::End("Entry could not be logged. Please try again.".to_string())
            }
        }
    }

    /// Terminal: today's vehicle count and revenue
    fn today_summary(&self) -> UssdResponse {
        let entries = self.service.entries_today();
        let total: i64 = entries.iter().map(|e| e.amount_paid).sum();
        UssdResponse::End(format!(
            "Today's Summary:\n\
             Vehicles: {}\n\
             Revenue: Ksh {}",
            entries.len(),
            total
        ))
    }

    /// Terminal: mark the first unpaid entry for the plate paid
    fn settle_by_plate(&self, raw_plate: &str) -> UssdResponse {
        let plate = raw_plate.to_uppercase();
        match self.service.first_unpaid_today(&plate) {
            Some(entry) => {
                // The entry was just found today; a concurrent settle makes
                // this a harmless no-op
                let _ = self.service.mark_paid(entry.id, None, None);
                UssdResponse::End(format!(
                    "{} marked as PAID.\nRef: {}",
                    plate, entry.reference_code
                ))
            }
            None => UssdResponse::End(format!("No unpaid entry found for {} today.", plate)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::store::{MemoryEntryStore, MemoryTenantStore};
    use crate::types::{EntryFilter, NewTenant};
    use std::sync::Arc;

    struct Fixture {
        router: UssdRouter<MemoryTenantStore, MemoryEntryStore, FixedClock>,
        tenants: Arc<MemoryTenantStore>,
        entries: Arc<MemoryEntryStore>,
        clock: Arc<FixedClock>,
    }

    fn fixture() -> Fixture {
        let tenants = Arc::new(MemoryTenantStore::new());
        let entries = Arc::new(MemoryEntryStore::new());
        let clock = Arc::new(FixedClock::at("2026-08-29T10:15:00Z"));
        let service = EntryService::new(tenants.clone(), entries.clone(), clock.clone());
        Fixture {
            router: UssdRouter::new(service),
            tenants,
            entries,
            clock,
        }
    }

    fn request(text: &str) -> UssdRequest {
        UssdRequest {
            session_id: "ATUid_1".to_string(),
            phone_number: "+254711000111".to_string(),
            text: text.to_string(),
        }
    }

    fn service_for(
        fixture: &Fixture,
    ) -> EntryService<MemoryTenantStore, MemoryEntryStore, FixedClock> {
        EntryService::new(
            fixture.tenants.clone(),
            fixture.entries.clone(),
            fixture.clock.clone(),
        )
    }

    fn register_tenant(fixture: &Fixture) {
        fixture
            .tenants
            .insert(NewTenant {
                plate_number: "KDA 456B".to_string(),
                name: "Mary Shop".to_string(),
                phone: Some("+254700000001".to_string()),
                shop_number: Some("S12".to_string()),
                floor_code: None,
                building: "Sunrise Mall".to_string(),
                monthly_rate: Some(500),
            })
            .unwrap();
    }

    #[test]
    fn test_root_shows_main_menu() {
        let fixture = fixture();
        let response = fixture.router.handle(&request(""));

        assert!(!response.is_terminal());
        let rendered = response.to_string();
        assert!(rendered.starts_with("CON "));
        assert!(rendered.contains("1. Log Vehicle Entry"));
        assert!(rendered.contains("2. Check Today's Total"));
        assert!(rendered.contains("3. Mark Vehicle as Paid"));
    }

    #[test]
    fn test_option_one_prompts_for_plate() {
        let fixture = fixture();
        let response = fixture.router.handle(&request("1"));
        assert_eq!(
            response,
            UssdResponse::Continue("Enter vehicle plate number:".to_string())
        );
    }

    #[test]
    fn test_tenant_plate_offers_tenant_rate() {
        let fixture = fixture();
        register_tenant(&fixture);

        let response = fixture.router.handle(&request("1*kda 456b"));
        assert!(!response.is_terminal());
        assert!(response.text().contains("Mary Shop - Sunrise Mall"));
        assert!(response.text().contains("Amount: Ksh 500"));
        assert!(response.text().contains("0. Cancel"));
    }

    #[test]
    fn test_unknown_plate_offers_default_rate() {
        let fixture = fixture();
        let response = fixture.router.handle(&request("1*KZZ 999Z"));
        assert!(!response.is_terminal());
        assert!(response.text().contains("Non-tenant vehicle: KZZ 999Z"));
        assert!(response.text().contains("Amount: Ksh 300"));
    }

    #[test]
    fn test_cancel_is_terminal_and_creates_nothing() {
        let fixture = fixture();
        let response = fixture.router.handle(&request("1*KZZ 999Z*0"));
        assert_eq!(response, UssdResponse::End("Entry cancelled.".to_string()));
        assert!(service_for(&fixture).entries_today().is_empty());
    }

    #[test]
    fn test_confirm_creates_tenant_entry_with_tenant_details() {
        let fixture = fixture();
        register_tenant(&fixture);

        let response = fixture.router.handle(&request("1*kda 456b*2"));
        assert!(response.is_terminal());
        assert!(response.text().contains("Vehicle KDA 456B logged."));
        assert!(response.text().contains("Ref: PS-"));
        assert!(response.text().contains("Method: M-Pesa"));

        let entries = service_for(&fixture).entries_today();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.tenant_type, TenantType::Tenant);
        assert_eq!(entry.payment_method, PaymentMethod::Mpesa);
        assert_eq!(entry.amount_paid, 500);
        assert_eq!(entry.driver_name.as_deref(), Some("Mary Shop"));
        assert_eq!(entry.phone.as_deref(), Some("+254700000001"));
        assert_eq!(entry.building.as_deref(), Some("Sunrise Mall"));
        assert!(entry.is_paid);
    }

    #[test]
    fn test_confirm_creates_walk_in_entry_with_caller_phone() {
        let fixture = fixture();
        let response = fixture.router.handle(&request("1*KZZ 999Z*1"));
        assert!(response.is_terminal());
        assert!(response.text().contains("Method: Cash"));

        let entries = service_for(&fixture).entries_today();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.tenant_type, TenantType::NonTenant);
        assert_eq!(entry.amount_paid, 300);
        assert_eq!(entry.driver_name.as_deref(), Some("Walk-in"));
        assert_eq!(entry.phone.as_deref(), Some("+254711000111"));
        assert_eq!(entry.building.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_today_summary() {
        let fixture = fixture();
        let service = service_for(&fixture);
        for amount in [300, 100] {
            service
                .create_entry(EntryInput {
                    plate_number: "KDA 456B".to_string(),
                    tenant_type: Some(TenantType::NonTenant),
                    payment_method: Some(PaymentMethod::Cash),
                    amount_paid: Some(amount),
                    ..EntryInput::default()
                })
                .unwrap();
        }

        let response = fixture.router.handle(&request("2"));
        let rendered = response.to_string();
        assert!(rendered.starts_with("END "));
        assert!(rendered.contains("Vehicles: 2"));
        assert!(rendered.contains("Revenue: Ksh 400"));
    }

    #[test]
    fn test_mark_paid_flow() {
        let fixture = fixture();
        let service = service_for(&fixture);
        let created = service
            .create_entry(EntryInput {
                plate_number: "KDA 456B".to_string(),
                tenant_type: Some(TenantType::NonTenant),
                payment_method: Some(PaymentMethod::Cash),
                amount_paid: Some(300),
                is_paid: Some(false),
                ..EntryInput::default()
            })
            .unwrap();

        let prompt = fixture.router.handle(&request("3"));
        assert_eq!(
            prompt,
            UssdResponse::Continue("Enter plate number to mark as paid:".to_string())
        );

        let response = fixture.router.handle(&request("3*kda 456b"));
        assert!(response.is_terminal());
        assert!(response.text().contains("KDA 456B marked as PAID."));
        assert!(response
            .text()
            .contains(&format!("Ref: {}", created.reference_code)));

        let listing = service.list_today(&EntryFilter::default());
        assert!(listing.entries[0].is_paid);
    }

    #[test]
    fn test_mark_paid_not_found() {
        let fixture = fixture();
        let response = fixture.router.handle(&request("3*KZZ 999Z"));
        assert_eq!(
            response,
            UssdResponse::End("No unpaid entry found for KZZ 999Z today.".to_string())
        );
    }

    #[rstest::rstest]
    #[case::unknown_option("9")]
    #[case::deep_garbage("1*2*3*4")]
    #[case::non_numeric("menu")]
    #[case::separators_only("*")]
    fn test_unrecognized_paths_are_invalid(#[case] text: &str) {
        let fixture = fixture();
        let response = fixture.router.handle(&request(text));
        assert_eq!(
            response,
            UssdResponse::End("Invalid option. Please try again.".to_string())
        );
    }
}
