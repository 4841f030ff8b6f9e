use crate::error::{AppError, AppResult};
use regex::Regex;

pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    if !email_regex.is_match(email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ahmad@pondok.com").is_ok());
        assert!(validate_email("bendahara.smk@pondok.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@pondok.com").is_err());
        assert!(validate_email("spaces in@pondok.com").is_err());
        assert!(validate_email("nodomain@").is_err());
    }
}
