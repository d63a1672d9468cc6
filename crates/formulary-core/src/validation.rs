//! # Validation Module
//!
//! Input validation for Formulary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host UI                                                      │
//! │  ├── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (controller entry points)                        │
//! │  ├── Required fields, lengths, duplicate product names                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  └── NOT NULL + UNIQUE (user email only)                               │
//! │                                                                         │
//! │  Product-name uniqueness lives in layer 2 on purpose: the storage      │
//! │  layer stays a generic document store.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length accepted for any single-line text field.
pub const MAX_FIELD_LEN: usize = 200;

// =============================================================================
// Normalization
// =============================================================================

/// The dedup key for product names: trimmed and lowercased.
///
/// Used by the controller for single inserts and by the CSV importer for
/// whole-file dedup against the existing catalog.
pub fn normalized_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required single-line text field.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.len() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LEN,
        });
    }

    Ok(())
}

/// Validates the condition text entered for a search.
pub fn validate_condition(condition: &str) -> ValidationResult<()> {
    validate_required("condition", condition)
}

/// Validates an email address.
///
/// Deliberately shallow: a local single-user store gains nothing from an
/// RFC 5322 parser. Presence of `@` with text on both sides is enough to
/// catch typos.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email)?;

    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a product before insert/update.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required("name", &product.name)
}

/// Checks a candidate product name against the existing catalog.
///
/// `existing` is an iterator of *already normalized* names (see
/// [`normalized_name`]).
pub fn check_unique_product_name<'a>(
    name: &str,
    mut existing: impl Iterator<Item = &'a str>,
) -> ValidationResult<()> {
    let candidate = normalized_name(name);

    if existing.any(|n| n == candidate) {
        return Err(ValidationError::DuplicateProductName {
            name: name.trim().to_string(),
        });
    }

    Ok(())
}

/// Validates registration input before the auth service touches storage.
pub fn validate_registration(name: &str, email: &str, password: &str) -> ValidationResult<()> {
    validate_required("name", name)?;
    validate_email(email)?;
    validate_required("password", password)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(validate_required("name", "  ").is_err());
        assert!(validate_required("name", "Urea").is_ok());
    }

    #[test]
    fn required_rejects_overlong() {
        let long = "a".repeat(MAX_FIELD_LEN + 1);
        assert_eq!(
            validate_required("name", &long),
            Err(ValidationError::TooLong {
                field: "name".to_string(),
                max: MAX_FIELD_LEN
            })
        );
    }

    #[test]
    fn email_needs_both_sides_of_at() {
        assert!(validate_email("ana@clinic.com").is_ok());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("@clinic.com").is_err());
        assert!(validate_email("ana.clinic.com").is_err());
    }

    #[test]
    fn normalized_name_folds_case_and_whitespace() {
        assert_eq!(normalized_name("  Ureia 10% "), "ureia 10%");
    }

    #[test]
    fn unique_name_check_is_case_insensitive() {
        let existing = vec!["ureia 10%".to_string(), "melatonina".to_string()];
        let names = || existing.iter().map(String::as_str);

        assert!(check_unique_product_name("UREIA 10%", names()).is_err());
        assert!(check_unique_product_name("Ácido salicílico", names()).is_ok());
    }

    #[test]
    fn registration_checks_every_field() {
        assert!(validate_registration("Ana", "ana@x.com", "secret").is_ok());
        assert!(validate_registration("", "ana@x.com", "secret").is_err());
        assert!(validate_registration("Ana", "nope", "secret").is_err());
        assert!(validate_registration("Ana", "ana@x.com", "").is_err());
    }
}
