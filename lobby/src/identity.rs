//! Nickname-gate validation. The store persists whatever it is given, so
//! every entry point that accepts a nickname validates here first.

use thiserror::Error;

/// Longest nickname the entry form accepts.
pub const MAX_NICKNAME_LEN: usize = 15;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("nickname is empty")]
    Empty,
    #[error("nickname is longer than {MAX_NICKNAME_LEN} characters")]
    TooLong,
}

/// Trims `raw` and checks it is non-empty and at most
/// [`MAX_NICKNAME_LEN`] characters. Returns the trimmed name to store.
pub fn validate_nickname(raw: &str) -> Result<&str, IdentityError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(IdentityError::Empty);
    }
    if name.chars().count() > MAX_NICKNAME_LEN {
        return Err(IdentityError::TooLong);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_nickname("  ada \n"), Ok("ada"));
    }

    #[test]
    fn rejects_empty_and_whitespace_only_names() {
        assert_eq!(validate_nickname(""), Err(IdentityError::Empty));
        assert_eq!(validate_nickname("   "), Err(IdentityError::Empty));
    }

    #[test]
    fn limits_length_in_characters_not_bytes() {
        let fifteen = "x".repeat(15);
        assert_eq!(validate_nickname(&fifteen), Ok(fifteen.as_str()));
        assert_eq!(
            validate_nickname(&"x".repeat(16)),
            Err(IdentityError::TooLong)
        );

        // multi-byte characters count once each
        let wide = "蛇".repeat(15);
        assert!(validate_nickname(&wide).is_ok());
        assert_eq!(
            validate_nickname(&"蛇".repeat(16)),
            Err(IdentityError::TooLong)
        );
    }
}
