use crate::server::{
    data::{filter::SortDirection, repository::Repository, store::Store},
    error::store::StoreError,
};
use serde::{Deserialize, Serialize};
use test_utils::builder::TestBuilder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Ticket {
    title: String,
    priority: i64,
    status: String,
}

fn ticket(title: &str, priority: i64, status: &str) -> Ticket {
    Ticket {
        title: title.to_string(),
        priority,
        status: status.to_string(),
    }
}

async fn seeded(store: &Store) -> Result<Repository<Ticket>, StoreError> {
    let repo = store.repository("tickets");
    repo.insert_many(&[
        ticket("a", 1, "open"),
        ticket("b", 2, "open"),
        ticket("c", 3, "closed"),
        ticket("d", 4, "open"),
        ticket("e", 5, "stale"),
    ])
    .await?;
    Ok(repo)
}

/// Tests chaining predicates, sort and paging.
///
/// Expected: open tickets by descending priority, first one skipped
#[tokio::test]
async fn executes_chained_query() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let store = Store::new(test.db.as_ref().unwrap().clone(), "test");
    let repo = seeded(&store).await?;

    let found = repo
        .query()
        .where_eq("status", "open")
        .sort("priority", SortDirection::Descending)
        .skip(1)
        .limit(5)
        .execute()
        .await?;

    let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "a"]);

    Ok(())
}

#[tokio::test]
async fn first_returns_single_match_or_none() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let store = Store::new(test.db.as_ref().unwrap().clone(), "test");
    let repo = seeded(&store).await?;

    let top = repo
        .query()
        .where_in("status", ["open", "stale"])
        .sort("priority", SortDirection::Descending)
        .first()
        .await?;
    assert_eq!(top.unwrap().title, "e");

    let none = repo.query().where_eq("status", "archived").first().await?;
    assert!(none.is_none());

    Ok(())
}

/// Tests that a second predicate on a field replaces the first.
///
/// Expected: only the `less than` bound applies
#[tokio::test]
async fn later_predicate_on_field_wins() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let store = Store::new(test.db.as_ref().unwrap().clone(), "test");
    let repo = seeded(&store).await?;

    let count = repo
        .query()
        .where_greater_than("priority", 2)
        .where_less_than("priority", 4)
        .count()
        .await?;
    assert_eq!(count, 3);

    Ok(())
}

#[tokio::test]
async fn count_ignores_paging() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let store = Store::new(test.db.as_ref().unwrap().clone(), "test");
    let repo = seeded(&store).await?;

    let count = repo
        .query()
        .where_eq("status", "open")
        .limit(1)
        .skip(2)
        .count()
        .await?;
    assert_eq!(count, 3);

    Ok(())
}

#[tokio::test]
async fn last_sort_wins() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let store = Store::new(test.db.as_ref().unwrap().clone(), "test");
    let repo = seeded(&store).await?;

    let found = repo
        .query()
        .sort("title", SortDirection::Descending)
        .sort("priority", SortDirection::Ascending)
        .limit(2)
        .execute()
        .await?;

    let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b"]);

    Ok(())
}

/// Tests a bounded range on one field.
///
/// Expected: both bounds apply, priorities 2 through 4
#[tokio::test]
async fn combines_range_bounds_on_one_field() -> Result<(), StoreError> {
    let test = TestBuilder::new().with_document_table().build().await.unwrap();
    let store = Store::new(test.db.as_ref().unwrap().clone(), "test");
    let repo = seeded(&store).await?;

    let found = repo
        .query()
        .where_greater_than("priority", 1)
        .where_less_than("priority", 5)
        .sort("priority", SortDirection::Ascending)
        .execute()
        .await?;

    let titles: Vec<&str> = found.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "c", "d"]);

    let count = repo
        .query()
        .where_greater_than("priority", 1)
        .where_less_than("priority", 5)
        .count()
        .await?;
    assert_eq!(count, 3);

    Ok(())
}
