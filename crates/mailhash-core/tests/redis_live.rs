//! Tests against a real Redis server.
//!
//! Ignored by default. Run with
//! `MAILHASH_TEST_REDIS_URL=redis://127.0.0.1:6379/ cargo test -- --ignored`.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use mailhash_core::{
    HashAccountRepository, MailAccount, MailAccountId, MailAccountRepository, RedisHashStore,
    StoreConfig,
};

async fn live_repo(key: &str) -> HashAccountRepository<RedisHashStore> {
    let url = std::env::var("MAILHASH_TEST_REDIS_URL").expect("MAILHASH_TEST_REDIS_URL not set");
    let config = StoreConfig::builder(url).accounts_key(key).build();
    let store = RedisHashStore::connect(&config).await.unwrap();
    HashAccountRepository::new(store, config.accounts_key)
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn crud_round_trip() {
    let repo = live_repo("mailhash::test::crud").await;
    let ids = [MailAccountId::from("1"), MailAccountId::from("2")];
    repo.delete_all(&ids).await.unwrap();

    repo.add(&MailAccount::new("1")).await.unwrap();
    repo.add_all(&[MailAccount::with_email("2", "two@gmail.com")])
        .await
        .unwrap();

    assert_eq!(repo.list().await.unwrap().len(), 2);
    assert_eq!(
        repo.get(&ids[0]).await.unwrap(),
        Some(MailAccount::new("1"))
    );

    repo.delete(&ids[0]).await.unwrap();
    assert!(repo.get(&ids[0]).await.unwrap().is_none());

    repo.delete_all(&ids).await.unwrap();
    assert!(repo.list().await.unwrap().is_empty());
}
