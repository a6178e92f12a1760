use rand::{rngs::OsRng, Rng};

/// Draws `digits` independent uniform decimal digits, so leading zeros are kept.
pub fn generate(digits: u32) -> String {
    (0..digits)
        .map(|_| char::from(b'0' + OsRng.gen_range(0..10u8)))
        .collect()
}
