//! Raffle-code generation and CSPRNG sampling.
//!
//! Both the shareable `RF-XXXX` codes and the draw winner selection must come
//! from a cryptographically strong generator, so everything here goes through
//! `OsRng`.

use rand::rngs::OsRng;
use rand::Rng;

/// Alphabet for raffle codes. Excludes visually confusable characters
/// (0/O, 1/I) so codes survive being read over the phone.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Prefix carried by every raffle code.
pub const CODE_PREFIX: &str = "RF-";

/// Length of the random portion of a raffle code.
pub const CODE_LEN: usize = 4;

/// Returns a uniformly distributed integer in `0..max`, drawn from the OS
/// CSPRNG. Panics if `max` is zero; callers sample from non-empty sets.
pub fn secure_random(max: usize) -> usize {
    OsRng.gen_range(0..max)
}

/// Generates a single shareable raffle code such as `RF-A3K7`.
///
/// Uniqueness is not guaranteed here; use [`generate_unique_code`] against
/// the current raffle set.
pub fn generate_code() -> String {
    let mut code = String::with_capacity(CODE_PREFIX.len() + CODE_LEN);
    code.push_str(CODE_PREFIX);
    for _ in 0..CODE_LEN {
        code.push(CODE_ALPHABET[secure_random(CODE_ALPHABET.len())] as char);
    }
    code
}

/// Generates a raffle code that does not collide with any existing code,
/// retrying until one is free. With 32^4 possible codes the loop terminates
/// quickly for any realistic raffle count.
pub fn generate_unique_code<F>(mut is_taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    loop {
        let code = generate_code();
        if !is_taken(&code) {
            return code;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_format() {
        let code = generate_code();
        assert_eq!(code.len(), 7);
        assert!(code.starts_with("RF-"));
        for c in code[3..].chars() {
            assert!(CODE_ALPHABET.contains(&(c as u8)), "unexpected char {c}");
        }
    }

    #[test]
    fn test_code_excludes_confusable_characters() {
        for _ in 0..200 {
            let code = generate_code();
            assert!(!code[3..].contains(['0', 'O', '1', 'I']));
        }
    }

    #[test]
    fn test_generate_unique_code_skips_taken() {
        // Force a collision on the first two attempts.
        let mut attempts = 0;
        let code = generate_unique_code(|_| {
            attempts += 1;
            attempts <= 2
        });
        assert_eq!(attempts, 3);
        assert!(code.starts_with("RF-"));
    }

    #[test]
    fn test_generate_unique_code_against_set() {
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let code = generate_unique_code(|c| seen.contains(c));
            assert!(seen.insert(code));
        }
        assert_eq!(seen.len(), 50);
    }

    #[test]
    fn test_secure_random_bounds() {
        for _ in 0..1000 {
            assert!(secure_random(7) < 7);
        }
        // max = 1 only ever yields 0
        assert_eq!(secure_random(1), 0);
    }
}
