//! Page-range validation.
//!
//! Only empty input is rejected here. The range grammar ("1-2,6-7") is the
//! service's business and it decides what it accepts.

use std::fmt;

use crate::error::ValidationError;

/// Ranges text known to be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRanges(String);

impl ValidRanges {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn validate(text: &str) -> Result<ValidRanges, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(ValidRanges(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        for input in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(validate(input), Err(ValidationError::EmptyInput));
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let ranges = validate("  1-2,6-7 \n").unwrap();
        assert_eq!(ranges.as_str(), "1-2,6-7");
    }

    #[test]
    fn does_not_check_grammar() {
        assert!(validate("9-2,,abc").is_ok());
    }
}
