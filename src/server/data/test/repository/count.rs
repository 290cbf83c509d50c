use super::*;

#[tokio::test]
async fn counts_and_checks_existence() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Item> = Store::new(db.clone(), NAMESPACE).repository("items");
    repo.insert_many(&[item("a", 1), item("b", 5), item("c", 10)])
        .await?;

    assert_eq!(repo.count(Filter::new()).await?, 3);
    assert_eq!(repo.count(Filter::new().gt("qty", 1).lte("qty", 5)).await?, 1);
    assert!(repo.exists(Filter::new().eq("name", "c")).await?);
    assert!(!repo.exists(Filter::new().eq("name", "d")).await?);

    Ok(())
}

/// Tests listing distinct values of a field.
///
/// Expected: each non-null value once, missing and null values skipped
#[tokio::test]
async fn lists_distinct_values() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Value> = Store::new(db.clone(), NAMESPACE).repository("raw");
    repo.insert_many(&[
        json!({"color": "red", "qty": 1}),
        json!({"color": "blue", "qty": 2}),
        json!({"color": "red", "qty": 3}),
        json!({"color": null, "qty": 4}),
        json!({"qty": 5}),
    ])
    .await?;

    let mut colors: Vec<String> = repo
        .distinct("color", Filter::new())
        .await?
        .into_iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    colors.sort();
    assert_eq!(colors, vec!["blue", "red"]);

    let colors = repo.distinct("color", Filter::new().gt("qty", 2)).await?;
    assert_eq!(colors, vec![json!("red")]);

    Ok(())
}

/// Tests distinct over booleans and numbers.
///
/// Expected: values keep their JSON type
#[tokio::test]
async fn distinct_keeps_value_types() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo: Repository<Value> = Store::new(db.clone(), NAMESPACE).repository("raw");
    repo.insert_many(&[
        json!({"active": true, "score": 1.5}),
        json!({"active": false, "score": 2}),
        json!({"active": true, "score": 2}),
    ])
    .await?;

    let active = repo.distinct("active", Filter::new()).await?;
    assert_eq!(active.len(), 2);
    assert!(active.contains(&json!(true)));
    assert!(active.contains(&json!(false)));

    let scores = repo.distinct("score", Filter::new()).await?;
    assert_eq!(scores.len(), 2);
    assert!(scores.contains(&json!(1.5)));
    assert!(scores.contains(&json!(2)));

    Ok(())
}
