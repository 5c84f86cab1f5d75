//! One-shot setup binary: applies migrations and seeds the first admin
//! account so a fresh database is immediately usable.

use anyhow::Context;
use lexcase_db::models::user::CreateUser;
use lexcase_db::repositories::UserRepo;
use lexcase_services::auth::password;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default credentials for the bootstrap admin. Override via
/// `SEED_ADMIN_EMAIL` / `SEED_ADMIN_PASSWORD`.
const DEFAULT_ADMIN_EMAIL: &str = "admin@juridix.local";
const DEFAULT_ADMIN_PASSWORD: &str = "Admin123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexcase_services=info,lexcase_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = lexcase_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;

    lexcase_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    lexcase_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Bootstrap admin ---
    let email = std::env::var("SEED_ADMIN_EMAIL")
        .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string())
        .trim()
        .to_lowercase();

    if UserRepo::find_by_email(&pool, &email).await?.is_some() {
        tracing::info!(%email, "Admin account already present, nothing to do");
        return Ok(());
    }

    let plain_password = std::env::var("SEED_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    let password_hash = password::hash_password(&plain_password)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

    let admin = UserRepo::create(
        &pool,
        &CreateUser {
            first_name: "Admin".to_string(),
            last_name: "Juridix".to_string(),
            email,
            password_hash,
            role: "ADMIN".to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = admin.id, email = %admin.email, "Bootstrap admin created");
    Ok(())
}
