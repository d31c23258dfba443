//! Reference code generation
//!
//! Every parking entry is issued a short, human-typeable transaction code at
//! creation time: `PS-<base36 millisecond timestamp>-<4 random base36
//! characters>`, all uppercase (e.g. `PS-MBCX41K2-7QH3`). The code is
//! generated exactly once per transaction and never regenerated.
//!
//! # Known limitation
//!
//! Uniqueness is probabilistic: there is no collision check against storage.
//! A collision requires two codes generated in the same millisecond to also
//! draw the same 4-character random suffix (1 in 36^4, about 1.7 million),
//! which is acceptable at front-desk transaction volumes.

use crate::core::clock::Clock;
use rand::Rng;

/// Prefix on every generated reference code
const REF_PREFIX: &str = "PS";

/// Length of the random suffix
const SUFFIX_LEN: usize = 4;

/// Base36 digit alphabet, uppercase
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode a non-negative integer in uppercase base36
fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    // Alphabet bytes are ASCII
    String::from_utf8(digits).expect("base36 digits are ASCII")
}

/// Generate a reference code for a new transaction
///
/// The timestamp half comes from the injected clock so tests can pin it; the
/// suffix half comes from the thread-local RNG.
pub fn generate_ref_code(clock: &dyn Clock) -> String {
    let millis = clock.now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}-{}-{}", REF_PREFIX, to_base36(millis), suffix)
}
