//! `mailhash` - seeds a mail account into Redis and lists the stored accounts.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod settings;

use anyhow::{Context, Result};
use mailhash_core::{
    HashAccountRepository, MailAccount, MailAccountLocator, MailAccountRepository,
    RedisHashStore,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailhash=debug,mailhash_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mailhash");

    let config = settings::load().await.context("loading settings")?;
    let store = RedisHashStore::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.url))?;
    let repo = HashAccountRepository::new(store, config.accounts_key.as_str());

    run(&repo).await
}

/// Seed the sample account, then report everything stored.
async fn run<R: MailAccountRepository>(repo: &R) -> Result<()> {
    repo.add(&MailAccount::new("1"))
        .await
        .context("adding sample account")?;

    let accounts = repo.mail_accounts().await.context("listing accounts")?;
    info!("Stored mail accounts: {}, accounts: {accounts:?}", accounts.len());
    Ok(())
}
