use crate::errors::code_error::CodeError;

pub const MAX_NAME_CHARS: usize = 255;
pub const MAX_ORGANIZATION_CHARS: usize = 255;

/// Trimmed signup fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupFields {
    pub name: String,
    pub organization: Option<String>,
}

/// Validates the user-facing signup fields. First violated rule wins, and name
/// rules are checked before organization rules.
///
/// `organization: None` means the field was not submitted at all, which is
/// valid; `Some("")` (or whitespace) was submitted and is rejected.
pub fn validate_signup_fields(
    name: &str,
    organization: Option<&str>,
) -> Result<SignupFields, CodeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CodeError::NAME_EMPTY);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(CodeError::NAME_TOO_LONG);
    }

    let organization = match organization.map(str::trim) {
        None => None,
        Some("") => return Err(CodeError::ORGANIZATION_EMPTY),
        Some(org) if org.chars().count() > MAX_ORGANIZATION_CHARS => {
            return Err(CodeError::ORGANIZATION_TOO_LONG);
        }
        Some(org) => Some(org.to_owned()),
    };

    Ok(SignupFields {
        name: name.to_owned(),
        organization,
    })
}

/// Directory key for an email address.
#[inline(always)]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_and_trims() {
        let fields = validate_signup_fields("  Test User ", Some(" Test Org\t")).unwrap();
        assert_eq!(fields.name, "Test User");
        assert_eq!(fields.organization.as_deref(), Some("Test Org"));
    }

    #[test]
    fn test_absent_organization_is_valid() {
        let fields = validate_signup_fields("Test User", None).unwrap();
        assert_eq!(fields.organization, None);
    }

    #[test]
    fn test_blank_name() {
        assert_eq!(validate_signup_fields("", None), Err(CodeError::NAME_EMPTY));
        assert_eq!(
            validate_signup_fields(" \t\n ", Some("Test Org")),
            Err(CodeError::NAME_EMPTY)
        );
    }

    #[test]
    fn test_name_length_boundary() {
        assert!(validate_signup_fields(&"a".repeat(255), None).is_ok());
        assert_eq!(
            validate_signup_fields(&"a".repeat(256), None),
            Err(CodeError::NAME_TOO_LONG)
        );
        // surrounding whitespace does not count
        assert!(validate_signup_fields(&format!("  {}  ", "a".repeat(255)), None).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(validate_signup_fields(&"é".repeat(255), Some(&"한".repeat(255))).is_ok());
        assert_eq!(
            validate_signup_fields(&"é".repeat(256), None),
            Err(CodeError::NAME_TOO_LONG)
        );
    }

    #[test]
    fn test_blank_organization() {
        assert_eq!(
            validate_signup_fields("Test User", Some("")),
            Err(CodeError::ORGANIZATION_EMPTY)
        );
        assert_eq!(
            validate_signup_fields("Test User", Some("   ")),
            Err(CodeError::ORGANIZATION_EMPTY)
        );
    }

    #[test]
    fn test_organization_length_boundary() {
        assert!(validate_signup_fields("Test User", Some(&"a".repeat(255))).is_ok());
        assert_eq!(
            validate_signup_fields("Test User", Some(&"a".repeat(256))),
            Err(CodeError::ORGANIZATION_TOO_LONG)
        );
    }

    #[test]
    fn test_name_rules_win_over_organization_rules() {
        assert_eq!(
            validate_signup_fields("", Some("")),
            Err(CodeError::NAME_EMPTY)
        );
        assert_eq!(
            validate_signup_fields(&"a".repeat(256), Some(&"a".repeat(256))),
            Err(CodeError::NAME_TOO_LONG)
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Test@Example.COM "), "test@example.com");
    }
}
