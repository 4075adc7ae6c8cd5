use sqlx::SqlitePool;

use crate::app::ability::{Ability, MembershipIndex, OrganizationDirectory};
use crate::app::db;
use crate::app::domain::{OrganizationId, UserId};

/// Everything the ability engine needs for one request, loaded fresh from
/// the database. Owned by the handler so the borrowed [`Ability`] can be
/// constructed on the stack.
pub struct AbilityContext {
    pub directory: OrganizationDirectory,
    pub memberships: MembershipIndex,
    pub is_admin: bool,
}

impl AbilityContext {
    pub async fn load(pool: &SqlitePool, user: &db::User) -> Result<Self, sqlx::Error> {
        let directory = load_directory(pool).await?;
        let memberships = match UserId::from_string(&user.id) {
            Ok(user_id) => load_membership_index(pool, &user_id).await?,
            Err(_) => MembershipIndex::new(),
        };
        Ok(Self {
            directory,
            memberships,
            is_admin: user.is_admin,
        })
    }

    pub fn ability(&self) -> Ability<'_> {
        Ability::for_user(self.is_admin, &self.memberships, &self.directory)
    }
}

/// Build the directory from the organizations table. Rows with malformed
/// ids are skipped; a malformed parent reference is treated as no parent.
pub async fn load_directory(pool: &SqlitePool) -> Result<OrganizationDirectory, sqlx::Error> {
    let rows = db::organizations::list_all(pool).await?;
    let mut directory = OrganizationDirectory::new();
    for row in rows {
        let Ok(id) = OrganizationId::from_string(&row.id) else {
            tracing::warn!(organization_id = %row.id, "skipping organization with malformed id");
            continue;
        };
        let parent_id = row
            .parent_id
            .as_deref()
            .and_then(|p| OrganizationId::from_string(p).ok());
        directory.insert(id, row.name, parent_id);
    }
    Ok(directory)
}

/// Build a user's membership index from their membership and support rows.
pub async fn load_membership_index(
    pool: &SqlitePool,
    user_id: &UserId,
) -> Result<MembershipIndex, sqlx::Error> {
    let mut index = MembershipIndex::new();
    for row in db::memberships::list_for_user(pool, user_id).await? {
        let Ok(org_id) = OrganizationId::from_string(&row.organization_id) else {
            continue;
        };
        index.add_membership(org_id, row.role.parse().ok());
    }
    for raw in db::supported_organizations::list_for_user(pool, user_id).await? {
        if let Ok(org_id) = OrganizationId::from_string(&raw) {
            index.add_supported(org_id);
        }
    }
    Ok(index)
}
