//! Wallet address format validation.
//!
//! Wallet addresses are base-58 strings between 32 and 44 characters,
//! the textual form of a 32-byte public key. The check here is purely
//! syntactic — it does not verify that the address is a real on-curve
//! public key, only that it could plausibly be one.

/// The 58-symbol base-58 alphabet: alphanumerics minus the four visually
/// ambiguous characters `0`, `O`, `I` and `l`.
const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Minimum accepted address length in characters.
const MIN_LEN: usize = 32;

/// Maximum accepted address length in characters.
const MAX_LEN: usize = 44;

/// Returns `true` if `address` is a syntactically plausible wallet address.
///
/// Rejects empty input, lengths outside `[32, 44]`, and any character
/// outside the base-58 alphabet. No side effects.
#[must_use]
pub fn is_valid(address: &str) -> bool {
    let len = address.len();
    if len < MIN_LEN || len > MAX_LEN {
        return false;
    }
    address.bytes().all(|b| BASE58_ALPHABET.contains(&b))
}
