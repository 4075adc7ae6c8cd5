use validator::ValidationError;

/// Email domain type. Once constructed, guaranteed to be trimmed, lowercase,
/// and shaped like an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Create a new Email from a string. Trims, lowercases, and validates.
    pub fn new(email: String) -> Result<Self, ValidationError> {
        let normalized = email.trim().to_lowercase();

        // Maximum address length per RFC 5321
        if normalized.len() > 254 {
            let mut error = ValidationError::new("email_too_long");
            error.message = Some("Email address is too long".into());
            return Err(error);
        }

        let has_domain_dot = normalized
            .split_once('@')
            .map_or(false, |(local, domain)| !local.is_empty() && domain.contains('.'));
        if !has_domain_dot {
            let mut error = ValidationError::new("invalid_email");
            error.message = Some("Invalid email address format".into());
            return Err(error);
        }

        Ok(Self(normalized))
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
