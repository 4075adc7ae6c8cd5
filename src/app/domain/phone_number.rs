use validator::ValidationError;

/// US phone number domain type. Once constructed, guaranteed to be in
/// E.164 form ("+1" followed by ten digits).
///
/// Accepts common input shapes: "832-465-8840", "(832) 465-8840",
/// "+1 832 465 8840", "18324658840".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize and validate a raw phone number string.
    pub fn new(input: String) -> Result<Self, ValidationError> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

        let national = match digits.len() {
            10 => digits,
            11 if digits.starts_with('1') => digits[1..].to_string(),
            _ => return Err(invalid_phone()),
        };

        // NANP: neither the area code nor the exchange may start with 0 or 1.
        let bytes = national.as_bytes();
        if bytes[0] < b'2' || bytes[3] < b'2' {
            return Err(invalid_phone());
        }

        Ok(Self(format!("+1{national}")))
    }

    /// Normalized E.164 representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid_phone() -> ValidationError {
    let mut error = ValidationError::new("invalid_phone");
    error.message = Some("Please enter a valid phone number.".into());
    error
}
