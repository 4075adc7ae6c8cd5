use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role a user holds within a single organization membership.
///
/// Leads can manage the organization's clients and reassign them; plain
/// members get read/write access to client data only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")] // Serialize as lowercase string
#[strum(serialize_all = "lowercase")] // Display/FromStr as lowercase string
pub enum MembershipRole {
    Member,
    Lead,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("member".parse::<MembershipRole>().unwrap(), MembershipRole::Member);
        assert_eq!("lead".parse::<MembershipRole>().unwrap(), MembershipRole::Lead);
    }

    #[test]
    fn unknown_role_fails_to_parse() {
        assert!("superuser".parse::<MembershipRole>().is_err());
        assert!("".parse::<MembershipRole>().is_err());
    }

    #[test]
    fn displays_as_lowercase() {
        assert_eq!(MembershipRole::Lead.to_string(), "lead");
    }
}
