//! Short identifier generation and custom alias validation.
//!
//! Generated identifiers are drawn from a case-sensitive alphanumeric alphabet
//! using the thread-local CSPRNG, so consecutive outputs are independent and
//! reveal nothing about how many links exist.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Shortest generated identifier.
pub const MIN_GENERATED_LENGTH: usize = 6;
/// Longest generated identifier.
pub const MAX_GENERATED_LENGTH: usize = 8;
/// Longest accepted custom alias.
pub const MAX_ALIAS_LENGTH: usize = 32;

/// Aliases that would shadow service routes.
const RESERVED_ALIASES: &[&str] = &["api", "health"];

/// Source of candidate short identifiers.
///
/// Generation never fails. Collisions are the caller's business: it offers
/// the candidate to the store and asks for another one if it is taken.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random alphanumeric identifiers of a fixed length.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    /// Creates a generator; `length` is clamped to 6..=8.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_GENERATED_LENGTH, MAX_GENERATED_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(7)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::InvalidAlias`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() || alias.len() > MAX_ALIAS_LENGTH {
        return Err(AppError::InvalidAlias(format!(
            "Custom short link must be 1-{MAX_ALIAS_LENGTH} characters long."
        )));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidAlias(
            "Custom short link can only contain letters, digits, hyphens and underscores."
                .to_string(),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::InvalidAlias(format!(
            "The short link \"{alias}\" is reserved."
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_has_configured_length() {
        for length in MIN_GENERATED_LENGTH..=MAX_GENERATED_LENGTH {
            let generator = RandomIdGenerator::new(length);
            assert_eq!(generator.generate().len(), length);
        }
    }

    #[test]
    fn test_generate_length_is_clamped() {
        assert_eq!(RandomIdGenerator::new(2).length(), 6);
        assert_eq!(RandomIdGenerator::new(40).length(), 8);
    }

    #[test]
    fn test_generate_alphanumeric_only() {
        let generator = RandomIdGenerator::default();
        for _ in 0..100 {
            assert!(generator.generate().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_produces_unique_codes() {
        let generator = RandomIdGenerator::new(8);
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generated_codes_pass_alias_rules() {
        let generator = RandomIdGenerator::default();
        assert!(validate_alias(&generator.generate()).is_ok());
    }

    #[test]
    fn test_validate_accepts_common_aliases() {
        assert!(validate_alias("mylink").is_ok());
        assert!(validate_alias("My_Link-2024").is_ok());
        assert!(validate_alias("a").is_ok());
        assert!(validate_alias(&"x".repeat(MAX_ALIAS_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_empty_string() {
        assert!(validate_alias("").is_err());
    }

    #[test]
    fn test_validate_too_long() {
        let err = validate_alias(&"x".repeat(MAX_ALIAS_LENGTH + 1)).unwrap_err();
        assert!(err.to_string().contains("1-32 characters"));
    }

    #[test]
    fn test_validate_special_characters() {
        assert!(validate_alias("my link").is_err());
        assert!(validate_alias("my/link").is_err());
        assert!(validate_alias("lien-été").is_err());
        assert!(validate_alias("a?b").is_err());
    }

    #[test]
    fn test_validate_reserved_aliases() {
        for &reserved in RESERVED_ALIASES {
            assert!(validate_alias(reserved).is_err());
        }
        assert!(validate_alias("HEALTH").is_err());
    }
}
