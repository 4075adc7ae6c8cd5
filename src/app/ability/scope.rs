use std::collections::HashSet;

use crate::app::ability::Ability;
use crate::app::domain::OrganizationId;

impl<'a> Ability<'a> {
    /// Organizations whose records the current user may administer. Listing
    /// screens pass this set into SQL so a query only ever returns permitted
    /// rows instead of filtering record by record.
    ///
    /// Agrees exactly with [`Ability::can_administer`]: an organization is in
    /// this set iff a record scoped to it would be allowed.
    pub fn accessible_organizations(&self) -> HashSet<OrganizationId> {
        let Some(user) = &self.user else {
            return HashSet::new();
        };
        if user.is_admin {
            return self.directory.all_ids().cloned().collect();
        }

        let mut set = HashSet::new();
        for org in user.memberships.organizations() {
            set.insert(org.clone());
            set.extend(self.directory.descendants(org));
        }
        for org in user.memberships.supported_organizations() {
            set.insert(org.clone());
            set.extend(self.directory.descendants(org));
        }
        set
    }
}
