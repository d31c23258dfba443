//! Plate number parsing and validation
//!
//! Two cooperating pieces:
//!
//! - [`validator`] - full and prefix-consistent (partial) matching against
//!   the national plate format, plus paste normalization
//! - [`slots`] - the 7-slot incremental input model used by character-at-a-
//!   time entry

pub mod slots;
pub mod validator;

pub use slots::{PlateSlots, SlotClass, PLATE_SLOT_COUNT, SLOT_CLASSES};
pub use validator::{format_plate_number, is_partially_valid_plate, is_valid_plate_number};
