//! Document factory for seeding raw rows of the documents table.
//!
//! Rows are inserted with SeaORM directly, bypassing the repository, so tests can
//! set up state the repository would refuse to produce.

use crate::factory::helpers::next_object_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use serde_json::{Map, Value};

/// Factory for creating test documents with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::document::DocumentFactory;
///
/// let doc = DocumentFactory::new(&db, "test", "items")
///     .field("name", "widget")
///     .field("qty", 3)
///     .build()
///     .await?;
/// ```
pub struct DocumentFactory<'a> {
    db: &'a DatabaseConnection,
    namespace: String,
    collection: String,
    id: String,
    body: Map<String, Value>,
}

impl<'a> DocumentFactory<'a> {
    /// Creates a new DocumentFactory with an empty body and a fresh id.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the row
    /// - `namespace` - Store namespace the document belongs to
    /// - `collection` - Collection the document belongs to
    ///
    /// # Returns
    /// - `DocumentFactory` - New factory instance with defaults
    pub fn new(
        db: &'a DatabaseConnection,
        namespace: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            db,
            namespace: namespace.into(),
            collection: collection.into(),
            id: next_object_id(),
            body: Map::new(),
        }
    }

    /// Sets the document id, 24 hex characters.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets one top-level field of the body.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    /// Inserts the document, writing its id under `_id` in the body.
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(mut self) -> Result<entity::document::Model, DbErr> {
        self.body
            .insert("_id".to_string(), Value::String(self.id.clone()));

        entity::document::ActiveModel {
            namespace: ActiveValue::Set(self.namespace),
            collection: ActiveValue::Set(self.collection),
            id: ActiveValue::Set(self.id),
            body: ActiveValue::Set(Value::Object(self.body).to_string()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a document with the given top-level fields.
///
/// # Arguments
/// - `db` - Database connection
/// - `namespace` - Store namespace
/// - `collection` - Collection name
/// - `fields` - JSON object whose entries become the body
///
/// # Returns
/// - `Ok(Model)` - The inserted row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_document(
    db: &DatabaseConnection,
    namespace: &str,
    collection: &str,
    fields: Value,
) -> Result<entity::document::Model, DbErr> {
    let mut factory = DocumentFactory::new(db, namespace, collection);
    if let Value::Object(fields) = fields {
        for (key, value) in fields {
            factory = factory.field(&key, value);
        }
    }
    factory.build().await
}
