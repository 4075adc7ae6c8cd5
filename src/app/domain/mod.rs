pub mod client_id;
pub mod email;
pub mod membership_role;
pub mod organization_id;
pub mod password;
pub mod phone_number;
pub mod timezone;
pub mod user_id;

pub use client_id::ClientId;
pub use email::Email;
pub use membership_role::MembershipRole;
pub use organization_id::OrganizationId;
pub use password::{HashedPassword, Password};
pub use phone_number::PhoneNumber;
pub use timezone::{Timezone, SUPPORTED_TIMEZONES};
pub use user_id::UserId;
