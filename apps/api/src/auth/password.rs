//! Password storage as `salt$hex(sha256(salt || password))`.

use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

const SALT_LENGTH: usize = 16;

pub fn hash_password(password: &str) -> String {
    let salt: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();
    format!("{salt}${}", digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) => digest(salt, password) == hash,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let hash = Sha256::digest(format!("{salt}{password}").as_bytes());
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
