use crate::errors::PasswordError;

const MIN_LENGTH: usize = 8;

/// Registration password rule: minimum length plus mixed character classes.
pub fn validate_password_complexity(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(PasswordError::TooShort(MIN_LENGTH));
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(PasswordError::InsufficientComplexity)
    }
}
