use rand::{Rng, distributions::Alphanumeric};

/// Generates a random alphanumeric string of the specified length.
///
/// The generated string contains uppercase letters (A-Z), lowercase letters
/// (a-z), and digits (0-9), sampled from the thread-local CSPRNG. Suitable
/// for opaque refresh tokens and batch join codes.
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
    fn produces_requested_length() {
        assert_eq!(generate_random_string(48).len(), 48);
        assert_eq!(generate_random_string(8).len(), 8);
    }

    #[test]
    fn is_alphanumeric() {
        assert!(
            generate_random_string(64)
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        );
    }

    #[test]
    fn consecutive_tokens_differ() {
        assert_ne!(generate_random_string(48), generate_random_string(48));
    }
}
