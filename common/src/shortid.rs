//! Short public identifiers for proposal links.
//!
//! 8 characters from a 64-symbol URL-safe alphabet gives 64^8 ≈ 2.8e14
//! combinations, plenty for an unauthenticated short-link namespace.
//! Generation is pure random draw; uniqueness is enforced by the store's
//! primary key, and the caller retries on collision.

use rand::Rng;

/// URL-safe alphabet, same symbol set nanoid uses.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of every proposal id.
pub const ID_LEN: usize = 8;

/// Generate a fresh candidate id.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
