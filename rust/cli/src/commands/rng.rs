//! `rng`: prints the first values of the seeded ChaCha20 stream, the same
//! generator the engine shuffles with.

use crate::error::CliError;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::io::Write;

const SAMPLE_LEN: usize = 5;

pub fn handle_rng_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let s = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(s);
    let vals: Vec<u64> = (0..SAMPLE_LEN).map(|_| rng.next_u64()).collect();
    writeln!(out, "RNG sample: {:?}", vals)?;
    writeln!(out, "seed={}", s)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_command_is_deterministic() {
        let mut out1 = Vec::new();
        let mut out2 = Vec::new();
        handle_rng_command(Some(42), &mut out1).unwrap();
        handle_rng_command(Some(42), &mut out2).unwrap();
        assert_eq!(out1, out2);
        let text = String::from_utf8(out1).unwrap();
        assert!(text.contains("seed=42"));
        assert_eq!(text.lines().next().unwrap().matches(',').count(), SAMPLE_LEN - 1);
    }

    #[test]
    fn test_rng_command_without_seed_reports_one() {
        let mut out = Vec::new();
        handle_rng_command(None, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("seed="));
    }
}
