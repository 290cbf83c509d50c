//! Generic typed repository over one collection of the document store.
//!
//! Entities are converted to and from JSON with serde. The serialized form of an
//! entity must be a JSON object; its `_id` key holds the hex object id, and the
//! repository fills it in on insert when the entity does not carry one. Every
//! call is bounded by the store's timeout, regardless of any deadline the caller
//! may have.

use std::{future::Future, marker::PhantomData, time::Duration};

use entity::document::{ActiveModel, Column};
use entity::prelude::Document;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbBackend, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Statement, Value,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value as Json};

use crate::server::{
    data::{
        filter::{bind_raw, FieldPath, Filter, FindOptions, Pipeline, SortDirection, Update, ID_FIELD},
        object_id::ObjectId,
        query::QueryBuilder,
        store::Store,
    },
    error::store::StoreError,
};

/// Runs `fut` under `timeout`, mapping an elapsed deadline to `StoreError::Timeout`.
///
/// The future is dropped when the deadline passes.
pub(crate) async fn bounded<F, R>(timeout: Duration, fut: F) -> Result<R, StoreError>
where
    F: Future<Output = Result<R, StoreError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Document store call exceeded {:?}", timeout);
            Err(StoreError::Timeout(timeout))
        }
    }
}

/// Typed CRUD and query access to a named collection.
pub struct Repository<T> {
    store: Store,
    collection: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates a repository for `collection` within the store's namespace.
    ///
    /// # Arguments
    /// - `store` - Store handle providing the connection, namespace and timeout
    /// - `collection` - Name of the collection the repository reads and writes
    ///
    /// # Returns
    /// - `Repository<T>` - New repository instance
    pub fn new(store: Store, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Starts a fluent query against this collection.
    pub fn query(&self) -> QueryBuilder<'_, T> {
        QueryBuilder::new(self)
    }

    /// Inserts a single entity.
    ///
    /// # Arguments
    /// - `entity` - Entity to store; an `_id` it carries is kept, otherwise one is generated
    ///
    /// # Returns
    /// - `Ok(ObjectId)` - Identifier of the stored document
    /// - `Err(StoreError::InvalidDocument)` - Entity does not serialize to a JSON object
    /// - `Err(StoreError::Unavailable)` - Store failure, including a duplicate `_id`
    pub async fn insert_one(&self, entity: &T) -> Result<ObjectId, StoreError> {
        let (id, body) = to_document(entity)?;
        let model = self.active_model(id, body);

        self.bounded(async {
            Document::insert(model)
                .exec_without_returning(self.store.db())
                .await?;
            Ok(id)
        })
        .await
    }

    /// Inserts several entities in one statement.
    ///
    /// # Returns
    /// - `Ok(Vec<ObjectId>)` - Identifiers in input order; empty for empty input
    /// - `Err(StoreError)` - Serialization or store failure; nothing is inserted
    pub async fn insert_many(&self, entities: &[T]) -> Result<Vec<ObjectId>, StoreError> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(entities.len());
        let mut models = Vec::with_capacity(entities.len());
        for entity in entities {
            let (id, body) = to_document(entity)?;
            ids.push(id);
            models.push(self.active_model(id, body));
        }

        self.bounded(async {
            Document::insert_many(models)
                .exec_without_returning(self.store.db())
                .await?;
            Ok(ids)
        })
        .await
    }

    /// Finds the first document matching `filter`.
    ///
    /// # Returns
    /// - `Ok(Some(T))` - A matching document
    /// - `Ok(None)` - No document matches
    /// - `Err(StoreError)` - Invalid filter, store failure or undecodable body
    pub async fn find_one(&self, filter: Filter) -> Result<Option<T>, StoreError> {
        let condition = filter.compile()?;

        self.bounded(async {
            let model = self
                .select()
                .filter(condition)
                .one(self.store.db())
                .await?;
            model.map(|m| from_body(&m.body)).transpose()
        })
        .await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>, StoreError> {
        self.find_one(Filter::by_id(id)).await
    }

    /// Finds every document matching `filter`, honouring sort, skip and limit.
    ///
    /// # Arguments
    /// - `filter` - Predicates all documents must satisfy
    /// - `options` - Sort field and direction, number to skip, maximum to return
    ///
    /// # Returns
    /// - `Ok(Vec<T>)` - Matching documents, possibly empty
    /// - `Err(StoreError)` - Invalid filter or sort field, store failure or undecodable body
    pub async fn find_many(&self, filter: Filter, options: FindOptions) -> Result<Vec<T>, StoreError> {
        let condition = filter.compile()?;
        options.validate()?;

        let mut query = self.select().filter(condition);
        if let Some((field, direction)) = &options.sort {
            let order = match direction {
                SortDirection::Ascending => Order::Asc,
                SortDirection::Descending => Order::Desc,
            };
            query = query.order_by(
                Expr::cust_with_values("json_extract(body, ?)", [field.json_path()]),
                order,
            );
        }
        if let Some(skip) = options.skip {
            query = query.offset(skip);
        }
        // SQLite only accepts OFFSET after a LIMIT
        match options.limit {
            Some(limit) => query = query.limit(limit),
            None if options.skip.is_some() => query = query.limit(i64::MAX as u64),
            None => {}
        }

        self.bounded(async {
            let models = query.all(self.store.db()).await?;
            models.iter().map(|m| from_body(&m.body)).collect()
        })
        .await
    }

    pub async fn find_all(&self, options: FindOptions) -> Result<Vec<T>, StoreError> {
        self.find_many(Filter::new(), options).await
    }

    /// Applies `update` to the first document matching `filter`.
    ///
    /// # Returns
    /// - `Ok(1)` - A document matched and its body changed
    /// - `Ok(0)` - Nothing matched, or the update left the body as it was
    /// - `Err(StoreError)` - Invalid filter or update, or store failure
    pub async fn update_one(&self, filter: Filter, update: Update) -> Result<u64, StoreError> {
        let condition = filter.compile()?;
        let (body_sql, values) = update.compile()?;

        self.bounded(async {
            let Some(id) = self.first_id(condition).await? else {
                return Ok(0);
            };
            self.apply_update(Condition::all().add(Column::Id.eq(id)), body_sql, values)
                .await
        })
        .await
    }

    pub async fn update_by_id(&self, id: ObjectId, update: Update) -> Result<u64, StoreError> {
        self.update_one(Filter::by_id(id), update).await
    }

    /// Applies `update` to every document matching `filter`.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of documents whose body actually changed
    /// - `Err(StoreError)` - Invalid filter or update, or store failure
    pub async fn update_many(&self, filter: Filter, update: Update) -> Result<u64, StoreError> {
        let condition = filter.compile()?;
        let (body_sql, values) = update.compile()?;

        self.bounded(self.apply_update(condition, body_sql, values))
            .await
    }

    /// Replaces the body of the first document matching `filter`, keeping its `_id`.
    ///
    /// # Returns
    /// - `Ok(1)` - A document was replaced with different content
    /// - `Ok(0)` - Nothing matched, or the replacement equals the stored document
    /// - `Err(StoreError::InvalidDocument)` - Replacement carries a different `_id`
    pub async fn replace_one(&self, filter: Filter, replacement: &T) -> Result<u64, StoreError> {
        let condition = filter.compile()?;
        let object = to_object(replacement)?;

        self.bounded(async {
            let Some(id) = self.first_id(condition).await? else {
                return Ok(0);
            };

            match object.get(ID_FIELD) {
                None | Some(Json::Null) => {}
                Some(Json::String(existing)) if *existing == id => {}
                Some(other) => {
                    return Err(StoreError::InvalidDocument(format!(
                        "replacement _id {other} does not match stored _id {id}"
                    )))
                }
            }
            let body = with_id(object, id.clone());

            let result = Document::update_many()
                .col_expr(Column::Body, Expr::value(body.clone()))
                .filter(self.scope())
                .filter(Column::Id.eq(id))
                .filter(Column::Body.ne(body))
                .exec(self.store.db())
                .await?;
            Ok(result.rows_affected)
        })
        .await
    }

    /// Deletes the first document matching `filter`.
    pub async fn delete_one(&self, filter: Filter) -> Result<u64, StoreError> {
        let condition = filter.compile()?;

        self.bounded(async {
            let Some(id) = self.first_id(condition).await? else {
                return Ok(0);
            };
            let result = Document::delete_many()
                .filter(self.scope())
                .filter(Column::Id.eq(id))
                .exec(self.store.db())
                .await?;
            Ok(result.rows_affected)
        })
        .await
    }

    /// Deletes the document with `id`; deleting an absent id returns `Ok(0)`.
    pub async fn delete_by_id(&self, id: ObjectId) -> Result<u64, StoreError> {
        self.delete_one(Filter::by_id(id)).await
    }

    pub async fn delete_many(&self, filter: Filter) -> Result<u64, StoreError> {
        let condition = filter.compile()?;

        self.bounded(async {
            let result = Document::delete_many()
                .filter(self.scope())
                .filter(condition)
                .exec(self.store.db())
                .await?;
            Ok(result.rows_affected)
        })
        .await
    }

    pub async fn count(&self, filter: Filter) -> Result<u64, StoreError> {
        let condition = filter.compile()?;

        self.bounded(async {
            let count = self
                .select()
                .filter(condition)
                .count(self.store.db())
                .await?;
            Ok(count)
        })
        .await
    }

    pub async fn exists(&self, filter: Filter) -> Result<bool, StoreError> {
        let condition = filter.compile()?;

        self.bounded(async { Ok(self.first_id(condition).await?.is_some()) })
            .await
    }

    /// Runs a raw store-native pipeline and decodes each resulting `body` as `R`.
    ///
    /// The pipeline reads from `docs(id, body)`, which holds only this repository's
    /// collection.
    ///
    /// # Returns
    /// - `Ok(Vec<R>)` - One decoded value per result row
    /// - `Err(StoreError::Unavailable)` - The statement failed to prepare or run
    /// - `Err(StoreError::Serialization)` - A `body` is not valid JSON for `R`
    pub async fn aggregate<R>(&self, pipeline: Pipeline) -> Result<Vec<R>, StoreError>
    where
        R: DeserializeOwned,
    {
        let sql = format!(
            "WITH docs AS (SELECT id, body FROM documents WHERE namespace = ? AND collection = ?) {}",
            pipeline.sql
        );
        let mut values: Vec<Value> = vec![
            Value::from(self.store.namespace().to_string()),
            Value::from(self.collection.clone()),
        ];
        values.extend(pipeline.values.iter().map(bind_raw));
        let statement = Statement::from_sql_and_values(DbBackend::Sqlite, sql, values);

        self.bounded(async {
            let rows = self.store.db().query_all_raw(statement).await?;
            rows.iter()
                .map(|row| {
                    let body: String = row.try_get("", "body")?;
                    Ok(serde_json::from_str(&body)?)
                })
                .collect()
        })
        .await
    }

    /// Lists the distinct non-null values of `field` across documents matching `filter`.
    ///
    /// Values keep their JSON type; booleans come back as booleans.
    pub async fn distinct(&self, field: &str, filter: Filter) -> Result<Vec<Json>, StoreError> {
        let path = FieldPath::parse(field)?;
        let condition = filter.compile()?;

        let query = Document::find()
            .select_only()
            .column_as(Expr::cust_with_values("body -> ?", [path.json_path()]), "v")
            .distinct()
            .filter(self.scope())
            .filter(condition);

        self.bounded(async {
            let rows: Vec<Option<String>> = query.into_tuple().all(self.store.db()).await?;
            let mut values = Vec::with_capacity(rows.len());
            for row in rows.into_iter().flatten() {
                match serde_json::from_str::<Json>(&row)? {
                    Json::Null => {}
                    value => values.push(value),
                }
            }
            Ok(values)
        })
        .await
    }

    async fn bounded<F, R>(&self, fut: F) -> Result<R, StoreError>
    where
        F: Future<Output = Result<R, StoreError>>,
    {
        bounded(self.store.timeout(), fut).await
    }

    fn scope(&self) -> Condition {
        Condition::all()
            .add(Column::Namespace.eq(self.store.namespace()))
            .add(Column::Collection.eq(self.collection.as_str()))
    }

    fn select(&self) -> Select<Document> {
        Document::find().filter(self.scope())
    }

    fn active_model(&self, id: ObjectId, body: String) -> ActiveModel {
        ActiveModel {
            namespace: ActiveValue::Set(self.store.namespace().to_string()),
            collection: ActiveValue::Set(self.collection.clone()),
            id: ActiveValue::Set(id.to_hex()),
            body: ActiveValue::Set(body),
        }
    }

    async fn first_id(&self, condition: Condition) -> Result<Option<String>, StoreError> {
        let id = Document::find()
            .select_only()
            .column(Column::Id)
            .filter(self.scope())
            .filter(condition)
            .into_tuple::<String>()
            .one(self.store.db())
            .await?;
        Ok(id)
    }

    async fn apply_update(
        &self,
        condition: Condition,
        body_sql: String,
        values: Vec<Value>,
    ) -> Result<u64, StoreError> {
        // rows whose body would not change are excluded so the count reflects modifications
        let unchanged = format!("body IS NOT ({body_sql})");

        let result = Document::update_many()
            .col_expr(Column::Body, Expr::cust_with_values(body_sql, values.clone()))
            .filter(self.scope())
            .filter(condition)
            .filter(Expr::cust_with_values(unchanged, values))
            .exec(self.store.db())
            .await?;
        Ok(result.rows_affected)
    }
}

/// Serializes `entity` and checks that it is a JSON object.
fn to_object<T: Serialize>(entity: &T) -> Result<Map<String, Json>, StoreError> {
    match serde_json::to_value(entity)? {
        Json::Object(object) => Ok(object),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Produces the id and stored body of a new document.
fn to_document<T: Serialize>(entity: &T) -> Result<(ObjectId, String), StoreError> {
    let object = to_object(entity)?;

    let id = match object.get(ID_FIELD) {
        None | Some(Json::Null) => ObjectId::new(),
        Some(Json::String(hex)) => hex.parse()?,
        Some(other) => return Err(StoreError::InvalidObjectId(other.to_string())),
    };

    Ok((id, with_id(object, id.to_hex())))
}

/// Renders the stored body with `_id` as its first key.
fn with_id(object: Map<String, Json>, id: String) -> String {
    let mut body = Map::with_capacity(object.len() + 1);
    body.insert(ID_FIELD.to_string(), Json::String(id));
    body.extend(object.into_iter().filter(|(key, _)| key != ID_FIELD));
    Json::Object(body).to_string()
}

fn from_body<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    Ok(serde_json::from_str(body)?)
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
