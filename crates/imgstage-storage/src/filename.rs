//! Random filename generation for staged masters.
//!
//! Masters carry no extension; variants append `.<suffix>.<output>`.
//! Collisions inside one date bucket are structurally possible but
//! astronomically unlikely at the default length of 50 characters.

use rand::distr::{Alphanumeric, SampleString};

/// Generate a random alphanumeric filename of `len` characters.
pub fn random_filename(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_alphabet() {
        let name = random_filename(50);
        assert_eq!(name.len(), 50);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_successive_names_differ() {
        assert_ne!(random_filename(32), random_filename(32));
    }
}
