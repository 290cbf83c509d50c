use super::*;

/// Tests finding a user seeded straight into the documents table.
///
/// Expected: Ok(Some(User)) whose uid is the document id
#[tokio::test]
async fn finds_seeded_user() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let seeded = UserFactory::new(db, "test")
        .email("bob@example.com")
        .role("editor")
        .build()
        .await
        .unwrap();

    let repo = UserRepository::new(&Store::new(db.clone(), "test"));
    let user = repo.find_by_email("bob@example.com").await?.unwrap();

    assert_eq!(user.uid(), seeded.id);
    assert_eq!(user.role, "editor");
    assert!(user.password_hash.starts_with("$argon2"));

    Ok(())
}

#[tokio::test]
async fn returns_none_for_unknown_email() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db, "test").build().await.unwrap();

    let repo = UserRepository::new(&Store::new(db.clone(), "test"));
    assert!(repo.find_by_email("nobody@example.com").await?.is_none());

    Ok(())
}

/// Tests that users of another namespace are not visible.
///
/// Expected: Ok(None)
#[tokio::test]
async fn ignores_other_namespace() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db, "elsewhere")
        .email("carol@example.com")
        .build()
        .await
        .unwrap();

    let repo = UserRepository::new(&Store::new(db.clone(), "test"));
    assert!(repo.find_by_email("carol@example.com").await?.is_none());

    Ok(())
}
