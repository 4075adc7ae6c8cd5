use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::app::db;
use crate::app::domain::{
    ClientId, Email, HashedPassword, MembershipRole, OrganizationId, Password, PhoneNumber, UserId,
};
use crate::seeds::{Seed, SeedOutcome};

const DEMO_PASSWORD: &str = "Password123";

/// Populates an empty database with a small coalition: an org tree, one
/// user per authorization role, and a few clients with case activity.
/// Only runs when there are no organizations yet.
pub struct DemoData;

async fn create_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    is_admin: bool,
    organization_id: Option<&OrganizationId>,
) -> Result<UserId, sqlx::Error> {
    let password = Password::new(DEMO_PASSWORD.to_string()).expect("demo password is valid");
    let password_hash =
        HashedPassword::from_password(&password).expect("password hashing must succeed");
    let user_id = UserId::new();
    let user = db::NewUser {
        id: user_id.clone(),
        email: Email::new(email.to_string()).expect("demo email is valid"),
        password_hash,
        name: name.to_string(),
        is_admin,
        organization_id: organization_id.cloned(),
    };
    db::users::insert(pool, &user).await?;
    Ok(user_id)
}

async fn create_org(
    pool: &SqlitePool,
    name: &str,
    parent_id: Option<&OrganizationId>,
) -> Result<OrganizationId, sqlx::Error> {
    let id = OrganizationId::new();
    let org = db::NewOrganization {
        id: id.clone(),
        name: name.to_string(),
        parent_id: parent_id.cloned(),
    };
    db::organizations::insert(pool, &org).await?;
    Ok(id)
}

async fn create_client(
    pool: &SqlitePool,
    organization_id: &OrganizationId,
    legal_name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<ClientId, sqlx::Error> {
    let id = ClientId::new();
    let client = db::NewClient {
        id: id.clone(),
        organization_id: Some(organization_id.clone()),
        legal_name: legal_name.to_string(),
        preferred_name: String::new(),
        email: email.map(|e| Email::new(e.to_string()).expect("demo email is valid")),
        phone_number: phone.map(|p| PhoneNumber::new(p.to_string()).expect("demo phone is valid")),
    };
    db::clients::insert(pool, &client).await?;
    Ok(id)
}

#[async_trait]
impl Seed for DemoData {
    fn version(&self) -> i64 {
        20260214110000
    }

    fn description(&self) -> &str {
        "demo_data"
    }

    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, sqlx::Error> {
        if !db::organizations::list_all(pool).await?.is_empty() {
            return Ok(SeedOutcome::Skipped);
        }

        // Org tree: a coalition with two partners, one of which runs a site.
        let coalition = create_org(pool, "Gulf Coast Coalition", None).await?;
        let east = create_org(pool, "Eastside Tax Partners", Some(&coalition)).await?;
        let west = create_org(pool, "Westside Tax Partners", Some(&coalition)).await?;
        let east_site = create_org(pool, "Eastside Downtown Site", Some(&east)).await?;

        // One user per authorization shape.
        create_user(pool, "admin@example.com", "Ada Admin", true, None).await?;
        let lead = create_user(pool, "lead@example.com", "Lee Lead", false, Some(&east)).await?;
        let member =
            create_user(pool, "member@example.com", "Mia Member", false, Some(&east_site)).await?;
        let supporter =
            create_user(pool, "coalition@example.com", "Cora Coalition", false, None).await?;

        db::memberships::add(pool, &east, &lead, MembershipRole::Lead).await?;
        db::memberships::add(pool, &east_site, &member, MembershipRole::Member).await?;
        db::supported_organizations::add(pool, &supporter, &west).await?;

        // Sample clients with a little case activity.
        let maria = create_client(
            pool,
            &east_site,
            "Maria Martinez",
            Some("maria@example.net"),
            Some("832-465-8840"),
        )
        .await?;
        create_client(pool, &east, "James Jones", Some("james@example.net"), None).await?;
        create_client(pool, &west, "Priya Patel", None, Some("415-555-2671")).await?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        db::messages::insert(
            pool,
            &db::NewMessage {
                id: ulid::Ulid::new().to_string(),
                client_id: maria.clone(),
                user_id: None,
                direction: db::MessageDirection::Incoming,
                medium: db::MessageMedium::Sms,
                body: "Hi, do you still need my W-2?".to_string(),
                sent_at: now,
            },
        )
        .await?;
        db::notes::insert(
            pool,
            &db::NewNote {
                id: ulid::Ulid::new().to_string(),
                client_id: maria.clone(),
                user_id: member.clone(),
                body: "Waiting on W-2 before we can file.".to_string(),
            },
        )
        .await?;
        db::documents::insert(
            pool,
            &db::NewDocument {
                id: ulid::Ulid::new().to_string(),
                client_id: maria,
                uploaded_by: Some(member),
                display_name: "photo-id.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
            },
        )
        .await?;

        eprintln!("Created demo data (all users sign in with {DEMO_PASSWORD})");
        Ok(SeedOutcome::Applied)
    }
}
