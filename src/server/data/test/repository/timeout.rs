use std::time::Duration;

use super::*;
use crate::server::data::repository::bounded;

#[tokio::test]
async fn elapsed_deadline_is_a_timeout() {
    let result = bounded(
        Duration::from_millis(20),
        std::future::pending::<Result<(), StoreError>>(),
    )
    .await;

    assert!(matches!(result, Err(StoreError::Timeout(d)) if d == Duration::from_millis(20)));
}

#[tokio::test]
async fn fast_call_completes_within_deadline() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = Store::new(db.clone(), NAMESPACE).with_timeout(Duration::from_secs(5));
    assert_eq!(store.timeout(), Duration::from_secs(5));

    store.ping().await?;

    let repo: Repository<Item> = store.repository("items");
    repo.insert_one(&item("a", 1)).await?;
    assert_eq!(repo.count(Filter::new()).await?, 1);

    Ok(())
}
