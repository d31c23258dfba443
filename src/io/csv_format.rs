//! CSV format handling for the parking entry log
//!
//! Centralizes the CSV format concerns:
//! - EntryCsvRecord structure for deserialization
//! - Conversion from CSV records to domain entries
//! - Entry log serialization for exports
//!
//! All functions are pure (no I/O) for easy testing.

use crate::plate::is_valid_plate_number;
use crate::types::{ParkingEntry, ParkingError, PaymentMethod, TenantType};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the entry-log export format. The optional columns
/// (driver, phone, shop, building) may be empty in the file; everything
/// else is validated during conversion.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EntryCsvRecord {
    pub plate_number: String,
    pub driver_name: Option<String>,
    pub phone: Option<String>,
    pub shop_number: Option<String>,
    pub building: Option<String>,
    pub tenant_type: String,
    pub payment_method: String,
    pub amount_paid: String,
    pub is_paid: String,
    pub entry_time: String,
    pub reference_code: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Convert an EntryCsvRecord to a ParkingEntry
///
/// Validates the plate format and parses the enum and numeric columns.
/// The entry time is kept as-is: rows whose timestamp later turns out to
/// be unparseable are excluded by the aggregation engine, not here.
///
/// # Errors
///
/// Parse error naming the offending column when the plate, tenant type,
/// payment method, amount, or paid flag is invalid.
pub fn convert_entry_record(record: EntryCsvRecord) -> Result<ParkingEntry, ParkingError> {
    let plate_number = record.plate_number.trim().to_uppercase();
    if !is_valid_plate_number(&plate_number) {
        return Err(ParkingError::Parse {
            line: None,
            message: format!("invalid plate number '{}'", record.plate_number),
        });
    }

    let tenant_type = match record.tenant_type.trim().to_lowercase().as_str() {
        "tenant" => TenantType::Tenant,
        "non-tenant" => TenantType::NonTenant,
        "motorcycle" => TenantType::Motorcycle,
        other => {
            return Err(ParkingError::Parse {
                line: None,
                message: format!("invalid tenant type '{}' for plate {}", other, plate_number),
            })
        }
    };

    let payment_method = match record.payment_method.trim().to_lowercase().as_str() {
        "cash" => PaymentMethod::Cash,
        "mpesa" => PaymentMethod::Mpesa,
        other => {
            return Err(ParkingError::Parse {
                line: None,
                message: format!(
                    "invalid payment method '{}' for plate {}",
                    other, plate_number
                ),
            })
        }
    };

    let amount_paid: i64 = record.amount_paid.trim().parse().map_err(|_| {
        ParkingError::Parse {
            line: None,
            message: format!(
                "invalid amount '{}' for plate {}",
                record.amount_paid, plate_number
            ),
        }
    })?;
    if amount_paid < 0 {
        return Err(ParkingError::Parse {
            line: None,
            message: format!("negative amount for plate {}", plate_number),
        });
    }

    let is_paid = match record.is_paid.trim().to_lowercase().as_str() {
        "true" | "1" => true,
        "false" | "0" => false,
        other => {
            return Err(ParkingError::Parse {
                line: None,
                message: format!("invalid paid flag '{}' for plate {}", other, plate_number),
            })
        }
    };

    Ok(ParkingEntry {
        // File rows carry no id; stores assign one on insert
        id: 0,
        plate_number,
        driver_name: non_empty(record.driver_name),
        phone: non_empty(record.phone),
        shop_number: non_empty(record.shop_number),
        building: non_empty(record.building),
        tenant_type,
        payment_method,
        amount_paid,
        is_paid,
        entry_time: record.entry_time.trim().to_string(),
        reference_code: record.reference_code.trim().to_string(),
    })
}

/// Column order of the entry-log CSV format
const ENTRY_CSV_HEADER: [&str; 11] = [
    "plate_number",
    "driver_name",
    "phone",
    "shop_number",
    "building",
    "tenant_type",
    "payment_method",
    "amount_paid",
    "is_paid",
    "entry_time",
    "reference_code",
];

/// Write parking entries in the entry-log CSV format
///
/// Entries are written in the order given; callers sort first when a
/// deterministic export matters.
///
/// # Errors
///
/// I/O error when the underlying writer fails.
pub fn write_entries_csv(
    entries: &[ParkingEntry],
    output: &mut dyn Write,
) -> Result<(), ParkingError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(ENTRY_CSV_HEADER)?;

    for entry in entries {
        writer.write_record(&[
            entry.plate_number.clone(),
            entry.driver_name.clone().unwrap_or_default(),
            entry.phone.clone().unwrap_or_default(),
            entry.shop_number.clone().unwrap_or_default(),
            entry.building.clone().unwrap_or_default(),
            entry.tenant_type.to_string(),
            entry.payment_method.to_string(),
            entry.amount_paid.to_string(),
            entry.is_paid.to_string(),
            entry.entry_time.clone(),
            entry.reference_code.clone(),
        ])?;
    }

    writer.flush().map_err(|e| ParkingError::Io {
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(plate: &str, tenant_type: &str, method: &str, amount: &str) -> EntryCsvRecord {
        EntryCsvRecord {
            plate_number: plate.to_string(),
            driver_name: Some("Mary".to_string()),
            phone: Some("+254700000001".to_string()),
            shop_number: None,
            building: Some("Sunrise Mall".to_string()),
            tenant_type: tenant_type.to_string(),
            payment_method: method.to_string(),
            amount_paid: amount.to_string(),
            is_paid: "true".to_string(),
            entry_time: "2026-08-29T08:00:00.000Z".to_string(),
            reference_code: "PS-TEST-0001".to_string(),
        }
    }

    #[rstest]
    #[case::tenant("tenant", TenantType::Tenant)]
    #[case::non_tenant("non-tenant", TenantType::NonTenant)]
    #[case::motorcycle("motorcycle", TenantType::Motorcycle)]
    #[case::case_insensitive("TENANT", TenantType::Tenant)]
    fn test_convert_tenant_types(#[case] raw: &str, #[case] expected: TenantType) {
        let entry = convert_entry_record(record("KDA 456B", raw, "cash", "300")).unwrap();
        assert_eq!(entry.tenant_type, expected);
        assert_eq!(entry.payment_method, PaymentMethod::Cash);
        assert_eq!(entry.amount_paid, 300);
        assert!(entry.is_paid);
    }

    #[test]
    fn test_convert_normalizes_plate_and_blanks() {
        let mut raw = record("kda 456b", "tenant", "mpesa", "500");
        raw.driver_name = Some("   ".to_string());
        raw.phone = None;

        let entry = convert_entry_record(raw).unwrap();
        assert_eq!(entry.plate_number, "KDA 456B");
        assert_eq!(entry.payment_method, PaymentMethod::Mpesa);
        assert_eq!(entry.driver_name, None);
        assert_eq!(entry.phone, None);
        assert_eq!(entry.building.as_deref(), Some("Sunrise Mall"));
    }

    #[rstest]
    #[case::bad_plate("ABC 123", "tenant", "cash", "300", "invalid plate number")]
    #[case::bad_type("KDA 456B", "visitor", "cash", "300", "invalid tenant type")]
    #[case::bad_method("KDA 456B", "tenant", "cheque", "300", "invalid payment method")]
    #[case::bad_amount("KDA 456B", "tenant", "cash", "lots", "invalid amount")]
    #[case::negative_amount("KDA 456B", "tenant", "cash", "-10", "negative amount")]
    fn test_convert_errors(
        #[case] plate: &str,
        #[case] tenant_type: &str,
        #[case] method: &str,
        #[case] amount: &str,
        #[case] expected: &str,
    ) {
        let err = convert_entry_record(record(plate, tenant_type, method, amount)).unwrap_err();
        assert!(err.to_string().contains(expected), "got: {}", err);
    }

    #[test]
    fn test_convert_rejects_bad_paid_flag() {
        let mut raw = record("KDA 456B", "tenant", "cash", "300");
        raw.is_paid = "maybe".to_string();
        let err = convert_entry_record(raw).unwrap_err();
        assert!(err.to_string().contains("invalid paid flag"));
    }

    #[test]
    fn test_convert_keeps_unparsed_entry_time() {
        let mut raw = record("KDA 456B", "tenant", "cash", "300");
        raw.entry_time = "not-a-timestamp".to_string();
        let entry = convert_entry_record(raw).unwrap();
        assert_eq!(entry.entry_time, "not-a-timestamp");
    }

    #[test]
    fn test_write_entries_csv_round_trips_header_and_row() {
        let entry = convert_entry_record(record("KDA 456B", "tenant", "cash", "300")).unwrap();
        let mut output = Vec::new();
        write_entries_csv(&[entry], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), ENTRY_CSV_HEADER.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("KDA 456B,Mary,"));
        assert!(row.contains(",tenant,cash,300,true,"));
        assert!(row.ends_with(",PS-TEST-0001"));
    }

    #[test]
    fn test_write_entries_csv_empty() {
        let mut output = Vec::new();
        write_entries_csv(&[], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, format!("{}\n", ENTRY_CSV_HEADER.join(",")));
    }
}
