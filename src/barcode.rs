//! Barcode generation for new inspection forms

use chrono::Utc;
use rand::Rng;

pub const PREFIX: &str = "EQ";

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `EQ` + last 8 digits of the Unix time in milliseconds + 4 random
/// base-36 characters, e.g. `EQ31520847K9QZ`.
pub fn generate() -> String {
    let millis = Utc::now().timestamp_millis().unsigned_abs() % 100_000_000;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}{:08}{}", PREFIX, millis, suffix)
}
