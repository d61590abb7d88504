//! A1-style cell addresses.

use crate::error::{Error, Result};

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode a zero-based (row, column) pair as an address like "AB12".
///
/// Column letters are bijective base 26: there is no zero digit, so after
/// taking the remainder the quotient is shifted back by one (26 -> "AA").
pub fn encode(row: i64, column: i64) -> Result<String> {
    if row < 0 || column < 0 {
        return Err(Error::InvalidAddress { row, column });
    }

    let mut letters = Vec::new();
    let mut col = column;
    while col >= 0 {
        letters.push(ALPHABET[(col % 26) as usize]);
        col = col / 26 - 1;
    }
    letters.reverse();

    let mut address = String::from_utf8_lossy(&letters).into_owned();
    address.push_str(&(row + 1).to_string());
    Ok(address)
}
