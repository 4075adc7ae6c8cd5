//! Authorization core.
//!
//! `Ability` answers one question: may the current user administer a given
//! record? It is rebuilt from scratch for every request out of explicit
//! inputs (the admin flag, the user's [`MembershipIndex`], the
//! [`OrganizationDirectory`]) and holds no session state and no cache. The
//! answer is a plain bool; missing or corrupt data denies rather than
//! erroring.

pub mod directory;
pub mod load;
pub mod memberships;
pub mod record;
pub mod scope;

pub use directory::{DirectoryEntry, OrganizationDirectory};
pub use load::AbilityContext;
pub use memberships::MembershipIndex;
pub use record::{
    Administrable, ClientTarget, DocumentTarget, MessageTarget, NoteTarget, OrganizationTarget,
    SystemNoteTarget, UserTarget,
};

use crate::app::domain::{MembershipRole, OrganizationId};

/// Per-request authorization check.
pub struct Ability<'a> {
    directory: &'a OrganizationDirectory,
    user: Option<UserGrants<'a>>,
}

struct UserGrants<'a> {
    is_admin: bool,
    memberships: &'a MembershipIndex,
}

impl<'a> Ability<'a> {
    pub fn for_user(
        is_admin: bool,
        memberships: &'a MembershipIndex,
        directory: &'a OrganizationDirectory,
    ) -> Self {
        Self {
            directory,
            user: Some(UserGrants { is_admin, memberships }),
        }
    }

    /// An ability with no signed-in user. Denies everything.
    pub fn anonymous(directory: &'a OrganizationDirectory) -> Self {
        Self { directory, user: None }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Decide whether the current user may administer the target record.
    ///
    /// Checks run in a fixed precedence: anonymous denies, admin allows,
    /// then the target must resolve to an organization reachable through
    /// the user's memberships (directly or from an ancestor org) or through
    /// a support grant (directly or from above).
    pub fn can_administer(&self, target: &dyn Administrable) -> bool {
        let Some(user) = &self.user else {
            return false;
        };
        if user.is_admin {
            return true;
        }
        let Some(org_id) = target.organization_id() else {
            return false;
        };
        if user.memberships.is_member_of(&org_id) {
            return true;
        }
        let ancestors = self.directory.ancestors(&org_id);
        if ancestors.iter().any(|a| user.memberships.is_member_of(a)) {
            return true;
        }
        user.memberships.supports(self.directory, &org_id)
    }

    /// True if the user holds the lead role at the organization or at any
    /// organization above it. Purely role-based; callers combine this with
    /// the admin flag where admins get a pass.
    pub fn can_lead(&self, organization_id: &OrganizationId) -> bool {
        match &self.user {
            None => false,
            Some(user) => user.memberships.has_role(
                self.directory,
                organization_id,
                MembershipRole::Lead,
                true,
            ),
        }
    }
}
