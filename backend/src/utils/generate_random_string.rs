use rand::{Rng, distributions::Alphanumeric};

/// Generates a random alphanumeric string of the specified length.
///
/// Drawn from a CSPRNG, so the output is suitable for email verification
/// and password reset tokens.
pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_string_has_requested_length() {
        assert_eq!(generate_random_string(64).len(), 64);
        assert_eq!(generate_random_string(0).len(), 0);
    }

    #[test]
    fn generated_string_is_alphanumeric() {
        let token = generate_random_string(128);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_tokens_differ() {
        assert_ne!(generate_random_string(32), generate_random_string(32));
    }
}
