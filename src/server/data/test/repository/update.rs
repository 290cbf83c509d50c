use super::*;

/// Tests setting a field on one document by id.
///
/// Expected: Ok(1) and the new value on read
#[tokio::test]
async fn updates_by_id() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    let id = repo.insert_one(&item("widget", 1)).await?;

    let modified = repo.update_by_id(id, Update::new().set("qty", 7)).await?;
    assert_eq!(modified, 1);
    assert_eq!(repo.find_by_id(id).await?.unwrap().qty, 7);

    Ok(())
}

/// Tests that a matched document left unchanged is not counted.
///
/// Expected: Ok(0) when the field already holds the value
#[tokio::test]
async fn unchanged_document_is_not_counted() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    let id = repo.insert_one(&item("widget", 1)).await?;

    assert_eq!(repo.update_by_id(id, Update::new().set("qty", 1)).await?, 0);
    assert_eq!(repo.update_by_id(id, Update::new().set("qty", 2)).await?, 1);
    assert_eq!(repo.update_by_id(id, Update::new().set("qty", 2)).await?, 0);

    Ok(())
}

#[tokio::test]
async fn increments_and_unsets() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Value> = Store::new(db.clone(), NAMESPACE).repository("raw");
    let id = repo
        .insert_one(&json!({"qty": 1, "note": "remove me"}))
        .await?;

    let modified = repo
        .update_by_id(
            id,
            Update::new().inc("qty", 2).inc("views", 1).unset("note"),
        )
        .await?;
    assert_eq!(modified, 1);

    let doc = repo.find_by_id(id).await?.unwrap();
    assert_eq!(doc["qty"], 3);
    assert_eq!(doc["views"], 1);
    assert!(doc.get("note").is_none());

    Ok(())
}

#[tokio::test]
async fn sets_structured_values() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Value> = Store::new(db.clone(), NAMESPACE).repository("raw");
    let id = repo.insert_one(&json!({"name": "a"})).await?;

    repo.update_by_id(
        id,
        Update::new()
            .set("tags", json!(["x", "y"]))
            .set("owner", json!({"email": "a@example.com"})),
    )
    .await?;

    let found = repo
        .find_one(Filter::new().eq("owner.email", "a@example.com"))
        .await?
        .unwrap();
    assert_eq!(found["tags"], json!(["x", "y"]));

    let found = repo
        .find_one(Filter::new().eq("tags", json!(["x", "y"])))
        .await?;
    assert!(found.is_some());

    Ok(())
}

/// Tests updating every matching document.
///
/// Expected: Ok(2) for the two documents above the threshold
#[tokio::test]
async fn updates_many() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    repo.insert_many(&[item("a", 1), item("b", 2), item("c", 3)])
        .await?;

    let modified = repo
        .update_many(Filter::new().gte("qty", 2), Update::new().set("name", "big"))
        .await?;
    assert_eq!(modified, 2);
    assert_eq!(repo.count(Filter::new().eq("name", "big")).await?, 2);

    Ok(())
}

#[tokio::test]
async fn update_one_touches_single_document() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    repo.insert_many(&[item("a", 1), item("a", 2)]).await?;

    let modified = repo
        .update_one(Filter::new().eq("name", "a"), Update::new().set("name", "z"))
        .await?;
    assert_eq!(modified, 1);
    assert_eq!(repo.count(Filter::new().eq("name", "z")).await?, 1);

    let modified = repo
        .update_one(Filter::new().eq("name", "missing"), Update::new().set("qty", 0))
        .await?;
    assert_eq!(modified, 0);

    Ok(())
}

#[tokio::test]
async fn rejects_invalid_updates() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    let id = repo.insert_one(&item("a", 1)).await?;

    let result = repo
        .update_by_id(id, Update::new().set("_id", "5f1d7a2b9c3e4f5a6b7c8d9e"))
        .await;
    assert!(matches!(result, Err(StoreError::InvalidUpdate(_))));

    let result = repo.update_by_id(id, Update::new()).await;
    assert!(matches!(result, Err(StoreError::InvalidUpdate(_))));

    Ok(())
}

/// Tests replacing a whole document.
///
/// Expected: Ok(1) with `_id` preserved, then Ok(0) for an identical replacement
#[tokio::test]
async fn replaces_one_keeping_id() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    let id = repo.insert_one(&item("old", 1)).await?;

    let modified = repo
        .replace_one(Filter::by_id(id), &item("new", 9))
        .await?;
    assert_eq!(modified, 1);

    let found = repo.find_by_id(id).await?.unwrap();
    assert_eq!(found.name, "new");
    assert_eq!(found.qty, 9);

    let modified = repo.replace_one(Filter::by_id(id), &found).await?;
    assert_eq!(modified, 0);

    let mut other = item("other", 2);
    other.id = Some(ObjectId::new());
    let result = repo.replace_one(Filter::by_id(id), &other).await;
    assert!(matches!(result, Err(StoreError::InvalidDocument(_))));

    Ok(())
}
