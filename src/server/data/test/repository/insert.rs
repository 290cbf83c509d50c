use super::*;

/// Tests inserting an entity and reading it back by id.
///
/// Verifies that the generated id is written into the stored document and
/// that every other field round-trips unchanged.
///
/// Expected: Ok(Some(Item)) equal to the input apart from `_id`
#[tokio::test]
async fn inserts_and_finds_by_id() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");

    let id = repo.insert_one(&item("widget", 3)).await?;
    let found = repo.find_by_id(id).await?.unwrap();

    assert_eq!(found.id, Some(id));
    assert_eq!(found.name, "widget");
    assert_eq!(found.qty, 3);

    Ok(())
}

/// Tests that an `_id` carried by the entity is kept.
///
/// Expected: Ok with the same id returned, then Err on a duplicate insert
#[tokio::test]
async fn keeps_existing_id_and_rejects_duplicate() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");

    let id: ObjectId = "5f1d7a2b9c3e4f5a6b7c8d9e".parse()?;
    let mut entity = item("widget", 1);
    entity.id = Some(id);

    assert_eq!(repo.insert_one(&entity).await?, id);

    let result = repo.insert_one(&entity).await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));

    Ok(())
}

#[tokio::test]
async fn rejects_non_object_entity() {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<i64> = Store::new(db.clone(), NAMESPACE).repository("numbers");

    let result = repo.insert_one(&5).await;
    assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
}

#[tokio::test]
async fn rejects_malformed_id() {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Value> = Store::new(db.clone(), NAMESPACE).repository("raw");

    let result = repo.insert_one(&json!({"_id": "not-an-id"})).await;
    assert!(matches!(result, Err(StoreError::InvalidObjectId(_))));
}

/// Tests inserting several entities at once.
///
/// Expected: Ok(ids) in input order, each findable
#[tokio::test]
async fn inserts_many_in_order() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");

    let ids = repo
        .insert_many(&[item("a", 1), item("b", 2), item("c", 3)])
        .await?;

    assert_eq!(ids.len(), 3);
    assert_eq!(repo.find_by_id(ids[1]).await?.unwrap().name, "b");
    assert_eq!(repo.count(Filter::new()).await?, 3);

    assert!(repo.insert_many(&[]).await?.is_empty());

    Ok(())
}
