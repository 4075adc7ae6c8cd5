use crate::app::db;
use crate::app::domain::OrganizationId;

/// Capability every authorization target exposes: the organization the
/// record is scoped to, if it can be resolved at all.
///
/// The policy engine depends on nothing else about a record. Returning
/// `None` means the record cannot be tied to an organization and only
/// admins may touch it.
pub trait Administrable {
    fn organization_id(&self) -> Option<OrganizationId>;
}

fn parse_org_id(raw: Option<&str>) -> Option<OrganizationId> {
    // Malformed ids resolve to nothing rather than erroring; the engine
    // then denies.
    raw.and_then(|s| OrganizationId::from_string(s).ok())
}

/// A client as an authorization target. Scoped by its own organization
/// reference, which may be unset for clients still in intake.
pub struct ClientTarget {
    organization_id: Option<OrganizationId>,
}

impl ClientTarget {
    pub fn new(client: &db::Client) -> Self {
        Self {
            organization_id: parse_org_id(client.organization_id.as_deref()),
        }
    }
}

impl Administrable for ClientTarget {
    fn organization_id(&self) -> Option<OrganizationId> {
        self.organization_id.clone()
    }
}

/// A message as an authorization target. Messages carry no organization of
/// their own; they scope through the client they belong to.
pub struct MessageTarget {
    client_organization_id: Option<OrganizationId>,
}

impl MessageTarget {
    pub fn new(owning_client: &db::Client) -> Self {
        Self {
            client_organization_id: parse_org_id(owning_client.organization_id.as_deref()),
        }
    }
}

impl Administrable for MessageTarget {
    fn organization_id(&self) -> Option<OrganizationId> {
        self.client_organization_id.clone()
    }
}

/// A user note as an authorization target. Always client-owned, so it
/// scopes exactly like the client.
pub struct NoteTarget {
    client_organization_id: Option<OrganizationId>,
}

impl NoteTarget {
    pub fn new(owning_client: &db::Client) -> Self {
        Self {
            client_organization_id: parse_org_id(owning_client.organization_id.as_deref()),
        }
    }
}

impl Administrable for NoteTarget {
    fn organization_id(&self) -> Option<OrganizationId> {
        self.client_organization_id.clone()
    }
}

/// A document as an authorization target, scoped through its client.
pub struct DocumentTarget {
    client_organization_id: Option<OrganizationId>,
}

impl DocumentTarget {
    pub fn new(owning_client: &db::Client) -> Self {
        Self {
            client_organization_id: parse_org_id(owning_client.organization_id.as_deref()),
        }
    }
}

impl Administrable for DocumentTarget {
    fn organization_id(&self) -> Option<OrganizationId> {
        self.client_organization_id.clone()
    }
}

/// A system note as an authorization target. The client reference is
/// optional; an unattached note resolves to no organization.
pub struct SystemNoteTarget {
    client_organization_id: Option<OrganizationId>,
}

impl SystemNoteTarget {
    pub fn new(owning_client: Option<&db::Client>) -> Self {
        Self {
            client_organization_id: owning_client
                .and_then(|c| parse_org_id(c.organization_id.as_deref())),
        }
    }
}

impl Administrable for SystemNoteTarget {
    fn organization_id(&self) -> Option<OrganizationId> {
        self.client_organization_id.clone()
    }
}

/// Another user as an authorization target. Scoped by that user's own home
/// organization, independent of any memberships they hold.
pub struct UserTarget {
    home_organization_id: Option<OrganizationId>,
}

impl UserTarget {
    pub fn new(user: &db::User) -> Self {
        Self {
            home_organization_id: parse_org_id(user.organization_id.as_deref()),
        }
    }
}

impl Administrable for UserTarget {
    fn organization_id(&self) -> Option<OrganizationId> {
        self.home_organization_id.clone()
    }
}

/// An organization itself as an authorization target. Organizations are
/// managed by admins only, so the target never resolves to a scoping org.
pub struct OrganizationTarget;

impl Administrable for OrganizationTarget {
    fn organization_id(&self) -> Option<OrganizationId> {
        None
    }
}
