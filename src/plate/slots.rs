//! Incremental 7-slot plate input model
//!
//! Front-desk plate entry happens one character at a time across seven
//! independently addressable slots with fixed character classes:
//! `[letter, letter, letter, digit, digit, digit, letter]`. Each slot accepts
//! only characters of its class; invalid characters are rejected at input
//! time and never stored. Composing the filled slots with the canonical
//! separator yields the display/storage string (`"KDA 456B"`).
//!
//! Note the slot classes constrain character kinds only. Whether the whole
//! string is an acceptable plate is decided by the complete-format check in
//! [`crate::plate::validator`], which also enforces the leading "K".

/// Number of character slots on a plate
pub const PLATE_SLOT_COUNT: usize = 7;

/// Character class a slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClass {
    Letter,
    Digit,
}

impl SlotClass {
    /// Whether `c` (after uppercasing) belongs to this class
    pub fn accepts(&self, c: char) -> bool {
        match self {
            SlotClass::Letter => c.is_ascii_alphabetic(),
            SlotClass::Digit => c.is_ascii_digit(),
        }
    }
}

/// Fixed per-slot classes: three letters, three digits, one trailing letter
///
/// The optional second suffix letter is typed into the free-text tail after
/// the slots are full; the slot model covers the common single-suffix form.
pub const SLOT_CLASSES: [SlotClass; PLATE_SLOT_COUNT] = [
    SlotClass::Letter,
    SlotClass::Letter,
    SlotClass::Letter,
    SlotClass::Digit,
    SlotClass::Digit,
    SlotClass::Digit,
    SlotClass::Letter,
];

/// The seven plate input slots
///
/// Slots are independently settable and clearable; empty slots are allowed
/// anywhere, so a partially filled plate composes to a partial string that
/// the partial validator can judge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlateSlots {
    chars: [Option<char>; PLATE_SLOT_COUNT],
}

impl PlateSlots {
    /// Create an empty slot set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single slot from keyboard input
    ///
    /// The character is uppercased first. Returns false (leaving the slot
    /// untouched) when the index is out of range or the character does not
    /// match the slot's class.
    pub fn set(&mut self, index: usize, c: char) -> bool {
        if index >= PLATE_SLOT_COUNT {
            return false;
        }
        let upper = c.to_ascii_uppercase();
        if !SLOT_CLASSES[index].accepts(upper) {
            return false;
        }
        self.chars[index] = Some(upper);
        true
    }

    /// Clear a single slot (backspace)
    pub fn clear(&mut self, index: usize) {
        if index < PLATE_SLOT_COUNT {
            self.chars[index] = None;
        }
    }

    /// Replace the slots from pasted input
    ///
    /// Strips non-alphanumeric characters, uppercases, then greedily assigns
    /// characters left to right: a character that does not match the current
    /// slot's class is skipped, and assignment stops when all seven slots are
    /// filled or the input is exhausted.
    pub fn paste(&mut self, input: &str) {
        let mut next = [None; PLATE_SLOT_COUNT];
        let mut slot = 0;

        for c in input.chars() {
            if slot >= PLATE_SLOT_COUNT {
                break;
            }
            if !c.is_ascii_alphanumeric() {
                continue;
            }
            let upper = c.to_ascii_uppercase();
            if SLOT_CLASSES[slot].accepts(upper) {
                next[slot] = Some(upper);
                slot += 1;
            }
        }

        self.chars = next;
    }

    /// Index of the first empty slot, if any
    pub fn first_empty(&self) -> Option<usize> {
        self.chars.iter().position(|c| c.is_none())
    }

    /// Whether every slot is filled
    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    /// Compose the canonical display/storage string
    ///
    /// The separator goes after the three-letter prefix, before the digit
    /// group: `"XXX DDDL"`. While only prefix letters are present the string
    /// has no separator yet; an entirely empty slot set composes to `""`.
    pub fn compose(&self) -> String {
        let join = |range: std::ops::Range<usize>| -> String {
            self.chars[range].iter().flatten().collect()
        };

        let prefix = join(0..3);
        let digits = join(3..6);
        let suffix = join(6..7);

        if digits.is_empty() && suffix.is_empty() {
            return prefix;
        }
        format!("{} {}{}", prefix, digits, suffix)
    }
}
