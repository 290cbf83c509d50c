use super::*;

/// Tests deleting the same id twice.
///
/// Expected: Ok(1) then Ok(0)
#[tokio::test]
async fn deletes_by_id_once() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    let id = repo.insert_one(&item("widget", 1)).await?;

    assert_eq!(repo.delete_by_id(id).await?, 1);
    assert_eq!(repo.delete_by_id(id).await?, 0);
    assert!(repo.find_by_id(id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn delete_one_removes_single_match() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    repo.insert_many(&[item("a", 1), item("a", 2), item("b", 3)])
        .await?;

    assert_eq!(repo.delete_one(Filter::new().eq("name", "a")).await?, 1);
    assert_eq!(repo.count(Filter::new()).await?, 2);

    Ok(())
}

#[tokio::test]
async fn delete_many_leaves_other_collections() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = Store::new(db.clone(), NAMESPACE);
    let items: Repository<Item> = store.repository("items");
    let others: Repository<Item> = store.repository("others");

    items
        .insert_many(&[item("a", 1), item("b", 2), item("c", 3)])
        .await?;
    others.insert_one(&item("a", 1)).await?;

    assert_eq!(items.delete_many(Filter::new().lt("qty", 3)).await?, 2);
    assert_eq!(items.count(Filter::new()).await?, 1);
    assert_eq!(others.count(Filter::new()).await?, 1);

    assert_eq!(items.delete_many(Filter::new()).await?, 1);

    Ok(())
}
