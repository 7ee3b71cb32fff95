use rand::{rngs::OsRng, Rng};

/// Generates a six-digit decimal join code from the OS entropy source.
/// Uniqueness is enforced by the quiz store; callers retry on collision.
pub fn generate_join_code() -> String {
    (0..6)
        .map(|_| char::from(b'0' + OsRng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_code_is_six_decimal_digits() {
        for _ in 0..100 {
            let code = generate_join_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()), "bad code {code}");
        }
    }
}
