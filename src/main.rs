use anyhow::Context;
use firebase_bootstrap::{bootstrap, FirebaseConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = FirebaseConfig::from_env().context("Failed to load Firebase configuration")?;
    let firebase = bootstrap(&config);

    info!(
        mode = %firebase.mode(),
        project_id = %config.project_id,
        bucket = %config.storage_bucket(),
        "Firebase bootstrap complete"
    );

    Ok(())
}
