use rand::Rng;
use rand::distributions::Alphanumeric;

/// Opaque bearer token for a database-backed session.
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Human-readable transaction code, e.g. `SPP042913`.
pub fn generate_transaction_code(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    format!("{}{:06}", prefix, rng.gen_range(0..=999_999))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token() {
        let token = generate_session_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_session_tokens_differ() {
        // Collisions are theoretically possible but vanishingly unlikely.
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_generate_transaction_code() {
        let kode = generate_transaction_code("SPP");
        assert!(kode.starts_with("SPP"));
        assert_eq!(kode.len(), 9);
        assert!(kode[3..].chars().all(|c| c.is_ascii_digit()));
    }
}
