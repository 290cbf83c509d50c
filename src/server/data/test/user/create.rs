use super::*;

/// Tests creating a user account.
///
/// Expected: Ok(User) with a generated id, findable by that id
#[tokio::test]
async fn creates_user_with_id() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let store = Store::new(test.db.as_ref().unwrap().clone(), "test");

    let repo = UserRepository::new(&store);
    let user = repo
        .create("alice@example.com", "admin", "$argon2id$stub".to_string())
        .await?;

    let id = user.id.unwrap();
    let found = repo.find_by_id(id).await?.unwrap();
    assert_eq!(found, user);
    assert_eq!(found.uid(), id.to_hex());
    assert_eq!(repo.count().await?, 1);

    Ok(())
}
