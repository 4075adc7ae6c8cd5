pub mod clients;
pub mod documents;
pub mod memberships;
pub mod messages;
pub mod notes;
pub mod organizations;
pub mod sessions;
pub mod supported_organizations;
pub mod system_notes;
pub mod users;

pub use clients::{Client, NewClient};
pub use documents::{Document, NewDocument};
pub use memberships::Membership;
pub use messages::{Message, MessageDirection, MessageMedium, NewMessage};
pub use notes::{NewNote, Note};
pub use organizations::{NewOrganization, Organization};
pub use sessions::Session;
pub use system_notes::{NewSystemNote, SystemNote};
pub use users::{NewUser, User};
