use validator::ValidationError;

/// Timezones selectable in the hub, covering the regions volunteers work in.
pub const SUPPORTED_TIMEZONES: &[&str] = &[
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Phoenix",
    "America/Los_Angeles",
    "America/Anchorage",
    "America/Juneau",
    "Pacific/Honolulu",
];

/// IANA timezone name validated against [`SUPPORTED_TIMEZONES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone(String);

impl Timezone {
    pub fn new(input: String) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if SUPPORTED_TIMEZONES.contains(&trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            let mut error = ValidationError::new("invalid_timezone");
            error.message = Some("Please select a valid timezone.".into());
            Err(error)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self("America/New_York".to_string())
    }
}
