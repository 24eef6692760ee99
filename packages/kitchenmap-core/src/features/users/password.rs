//! Salted, iterated password hashing
//!
//! Stored form: `sha256$<rounds>$<salt>$<hex digest>`. The digest is
//! SHA-256 over salt and password, re-hashed with the password `rounds` times.

use sha2::{Digest, Sha256};
use uuid::Uuid;

const SCHEME: &str = "sha256";

/// Stretch applied to new hashes
pub const HASH_ROUNDS: u32 = 100_000;

/// Upper bound accepted when verifying a stored hash
const MAX_ROUNDS: u32 = 10_000_000;

/// Hash `password` with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!(
        "{}${}${}${}",
        SCHEME,
        HASH_ROUNDS,
        salt,
        digest(&salt, password, HASH_ROUNDS)
    )
}

/// Recompute the digest for `password` and compare with `stored`
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(4, '$');
    let (Some(scheme), Some(rounds), Some(salt), Some(expected)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    if rounds == 0 || rounds > MAX_ROUNDS {
        return false;
    }
    constant_time_eq(digest(salt, password, rounds).as_bytes(), expected.as_bytes())
}

fn digest(salt: &str, password: &str, rounds: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let mut block = hasher.finalize();
    for _ in 1..rounds {
        let mut hasher = Sha256::new();
        hasher.update(block);
        hasher.update(password.as_bytes());
        block = hasher.finalize();
    }
    format!("{:x}", block)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
