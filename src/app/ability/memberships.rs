use std::collections::{HashMap, HashSet};

use crate::app::ability::OrganizationDirectory;
use crate::app::domain::{MembershipRole, OrganizationId};

/// Per-user index of membership and support grants, built once per request.
///
/// A membership's stored role may be absent here (`None`) when the row held a
/// string no longer recognized; the membership itself still counts for
/// scoping, it just grants no role.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    memberships: HashMap<OrganizationId, Option<MembershipRole>>,
    supported: HashSet<OrganizationId>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_membership(&mut self, organization_id: OrganizationId, role: Option<MembershipRole>) {
        self.memberships.insert(organization_id, role);
    }

    pub fn add_supported(&mut self, organization_id: OrganizationId) {
        self.supported.insert(organization_id);
    }

    /// Organizations the user holds a membership in.
    pub fn organizations(&self) -> impl Iterator<Item = &OrganizationId> {
        self.memberships.keys()
    }

    pub fn is_member_of(&self, organization_id: &OrganizationId) -> bool {
        self.memberships.contains_key(organization_id)
    }

    /// Organizations the user supports (coalition oversight), as granted.
    /// Descendant expansion happens in the callers that need it.
    pub fn supported_organizations(&self) -> &HashSet<OrganizationId> {
        &self.supported
    }

    /// True if the user holds `role` at the organization itself, or, when
    /// `include_ancestors` is set, at any organization above it.
    pub fn has_role(
        &self,
        directory: &OrganizationDirectory,
        organization_id: &OrganizationId,
        role: MembershipRole,
        include_ancestors: bool,
    ) -> bool {
        if self.memberships.get(organization_id) == Some(&Some(role)) {
            return true;
        }
        if !include_ancestors {
            return false;
        }
        directory
            .ancestors(organization_id)
            .iter()
            .any(|ancestor| self.memberships.get(ancestor) == Some(&Some(role)))
    }

    /// True if the organization is supported directly or sits below a
    /// supported organization.
    pub fn supports(&self, directory: &OrganizationDirectory, organization_id: &OrganizationId) -> bool {
        if self.supported.contains(organization_id) {
            return true;
        }
        directory
            .ancestors(organization_id)
            .iter()
            .any(|ancestor| self.supported.contains(ancestor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (OrganizationDirectory, OrganizationId, OrganizationId, OrganizationId) {
        let parent = OrganizationId::new();
        let child = OrganizationId::new();
        let other = OrganizationId::new();
        let mut directory = OrganizationDirectory::new();
        directory.insert(parent.clone(), "Parent", None);
        directory.insert(child.clone(), "Child", Some(parent.clone()));
        directory.insert(other.clone(), "Other", None);
        (directory, parent, child, other)
    }

    #[test]
    fn empty_index_grants_nothing() {
        let (directory, parent, ..) = tree();
        let index = MembershipIndex::new();
        assert_eq!(index.organizations().count(), 0);
        assert!(!index.is_member_of(&parent));
        assert!(!index.has_role(&directory, &parent, MembershipRole::Lead, true));
        assert!(!index.supports(&directory, &parent));
    }

    #[test]
    fn role_at_the_org_itself() {
        let (directory, parent, ..) = tree();
        let mut index = MembershipIndex::new();
        index.add_membership(parent.clone(), Some(MembershipRole::Lead));

        assert!(index.has_role(&directory, &parent, MembershipRole::Lead, false));
        assert!(!index.has_role(&directory, &parent, MembershipRole::Member, false));
    }

    #[test]
    fn role_inherited_from_ancestor_only_when_asked() {
        let (directory, parent, child, _) = tree();
        let mut index = MembershipIndex::new();
        index.add_membership(parent.clone(), Some(MembershipRole::Lead));

        assert!(index.has_role(&directory, &child, MembershipRole::Lead, true));
        assert!(!index.has_role(&directory, &child, MembershipRole::Lead, false));
    }

    #[test]
    fn membership_without_recognized_role_grants_no_role() {
        let (directory, parent, ..) = tree();
        let mut index = MembershipIndex::new();
        // Role string in the row failed to parse.
        index.add_membership(parent.clone(), "superuser".parse::<MembershipRole>().ok());

        assert!(index.is_member_of(&parent));
        assert!(!index.has_role(&directory, &parent, MembershipRole::Lead, true));
        assert!(!index.has_role(&directory, &parent, MembershipRole::Member, true));
    }

    #[test]
    fn supports_covers_descendants_of_the_grant() {
        let (directory, parent, child, other) = tree();
        let mut index = MembershipIndex::new();
        index.add_supported(parent.clone());

        assert!(index.supports(&directory, &parent));
        assert!(index.supports(&directory, &child));
        assert!(!index.supports(&directory, &other));
    }
}
