//! Typed query, update and pagination expressions.
//!
//! Filters and updates are small tagged expressions `(field, operator, value)`
//! rather than loose key/value maps. Field names are validated when a predicate
//! is added, and an invalid one is reported by the repository before anything
//! is sent to the store. Compilation targets the SQLite JSON1 functions over the
//! `body` column of the documents table.

use sea_orm::{sea_query::Expr, Condition, Value};
use serde_json::Value as Json;

use crate::server::{data::object_id::ObjectId, error::store::StoreError};

/// Key under which every document stores its identifier.
pub const ID_FIELD: &str = "_id";

/// A validated dotted path into a document, e.g. `owner.email`.
///
/// Each segment is a non-empty run of ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn parse(field: &str) -> Result<Self, StoreError> {
        let valid = !field.is_empty()
            && field.split('.').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
            });

        if valid {
            Ok(Self(field.to_string()))
        } else {
            Err(StoreError::InvalidField(field.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_id(&self) -> bool {
        self.0 == ID_FIELD
    }

    /// The JSON path bound as a parameter to `json_extract` and friends.
    pub(crate) fn json_path(&self) -> String {
        format!("$.{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: FieldPath,
    pub op: Operator,
    pub value: Json,
}

impl Predicate {
    /// Whether `later`, added after `self`, takes the place of `self`.
    fn supersedes(&self, later: &Predicate) -> bool {
        let exact = |op: Operator| matches!(op, Operator::Eq | Operator::In);

        self.field == later.field
            && (self.op == later.op || exact(self.op) || exact(later.op))
    }

    /// Builds a predicate, rejecting invalid field paths and `In` with a non-array value.
    pub fn new(field: &str, op: Operator, value: Json) -> Result<Self, StoreError> {
        let field = FieldPath::parse(field)?;
        if op == Operator::In && !value.is_array() {
            return Err(StoreError::InvalidField(format!(
                "{} (membership test needs a list)",
                field.as_str()
            )));
        }
        Ok(Self { field, op, value })
    }

    fn compile(&self) -> (String, Vec<Value>) {
        let target = "json_extract(body, ?)";
        let mut values = vec![Value::from(self.field.json_path())];

        let sql = match (self.op, &self.value) {
            (Operator::Eq, Json::Null) => format!("{target} IS NULL"),
            (Operator::Ne, Json::Null) => format!("{target} IS NOT NULL"),
            (Operator::In, Json::Array(items)) => {
                if items.is_empty() {
                    return ("1 = 0".to_string(), Vec::new());
                }
                let placeholders: Vec<&str> = items
                    .iter()
                    .map(|item| {
                        let (placeholder, value) = bind(item);
                        values.push(value);
                        placeholder
                    })
                    .collect();
                format!("{target} IN ({})", placeholders.join(", "))
            }
            (op, value) => {
                let symbol = match op {
                    Operator::Eq | Operator::In => "=",
                    Operator::Ne => "IS NOT",
                    Operator::Gt => ">",
                    Operator::Gte => ">=",
                    Operator::Lt => "<",
                    Operator::Lte => "<=",
                };
                let (placeholder, value) = bind(value);
                values.push(value);
                format!("{target} {symbol} {placeholder}")
            }
        };

        (sql, values)
    }
}

/// Binds a JSON value the way `json_extract` reports it.
///
/// Scalars bind as native SQL values. Arrays and objects come back from
/// `json_extract` as minified JSON text, so they bind through `json(?)`.
fn bind(value: &Json) -> (&'static str, Value) {
    match value {
        Json::Null => ("?", Value::from(None::<String>)),
        Json::Bool(b) => ("?", Value::from(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => ("?", Value::from(i)),
            None => ("?", Value::from(n.as_f64().unwrap_or(f64::NAN))),
        },
        Json::String(s) => ("?", Value::from(s.clone())),
        Json::Array(_) | Json::Object(_) => ("json(?)", Value::from(value.to_string())),
    }
}

/// Binds a JSON value for raw SQL written by a caller (aggregation pipelines).
pub(crate) fn bind_raw(value: &Json) -> Value {
    bind(value).1
}

/// Conjunction of predicates; the empty filter matches every document.
///
/// A second predicate on a field replaces the first when both use the same
/// operator, or when either is an equality or membership test. Range bounds on
/// one field combine, so `gt("qty", 1).lte("qty", 5)` keeps both.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
    error: Option<Invalid>,
}

/// Construction error held by a builder until it is compiled.
#[derive(Debug, Clone, PartialEq)]
enum Invalid {
    Field(String),
    Update(String),
}

impl Invalid {
    fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::InvalidUpdate(reason) => Self::Update(reason),
            StoreError::InvalidField(field) => Self::Field(field),
            other => Self::Field(other.to_string()),
        }
    }

    fn to_store(&self) -> StoreError {
        match self {
            Self::Field(field) => StoreError::InvalidField(field.clone()),
            Self::Update(reason) => StoreError::InvalidUpdate(reason.clone()),
        }
    }
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the document whose `_id` is `id`.
    pub fn by_id(id: ObjectId) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    pub fn eq(self, field: &str, value: impl Into<Json>) -> Self {
        self.push(field, Operator::Eq, value.into())
    }

    pub fn ne(self, field: &str, value: impl Into<Json>) -> Self {
        self.push(field, Operator::Ne, value.into())
    }

    pub fn is_in<V: Into<Json>>(self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let list = Json::Array(values.into_iter().map(Into::into).collect());
        self.push(field, Operator::In, list)
    }

    pub fn gt(self, field: &str, value: impl Into<Json>) -> Self {
        self.push(field, Operator::Gt, value.into())
    }

    pub fn gte(self, field: &str, value: impl Into<Json>) -> Self {
        self.push(field, Operator::Gte, value.into())
    }

    pub fn lt(self, field: &str, value: impl Into<Json>) -> Self {
        self.push(field, Operator::Lt, value.into())
    }

    pub fn lte(self, field: &str, value: impl Into<Json>) -> Self {
        self.push(field, Operator::Lte, value.into())
    }

    /// Adds an already built predicate.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.retain(|p| !p.supersedes(&predicate));
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.error.is_none()
    }

    fn push(self, field: &str, op: Operator, value: Json) -> Self {
        match Predicate::new(field, op, value) {
            Ok(predicate) => self.and(predicate),
            Err(err) => {
                let mut filter = self;
                filter.error.get_or_insert(Invalid::from_store(err));
                filter
            }
        }
    }

    /// Compiles into a SeaORM condition, or returns the first construction error.
    pub(crate) fn compile(&self) -> Result<Condition, StoreError> {
        if let Some(err) = &self.error {
            return Err(err.to_store());
        }

        Ok(self
            .predicates
            .iter()
            .fold(Condition::all(), |condition, predicate| {
                let (sql, values) = predicate.compile();
                condition.add(Expr::cust_with_values(sql, values))
            }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    Set(FieldPath, Json),
    Inc(FieldPath, serde_json::Number),
    Unset(FieldPath),
}

impl UpdateOp {
    fn field(&self) -> &FieldPath {
        match self {
            Self::Set(field, _) | Self::Inc(field, _) | Self::Unset(field) => field,
        }
    }
}

/// Ordered list of field modifications applied to each matched document.
#[derive(Debug, Clone, Default)]
pub struct Update {
    ops: Vec<UpdateOp>,
    error: Option<Invalid>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(self, field: &str, value: impl Into<Json>) -> Self {
        let value = value.into();
        self.push(field, |path| UpdateOp::Set(path, value))
    }

    pub fn inc(self, field: &str, by: impl Into<serde_json::Number>) -> Self {
        let by = by.into();
        self.push(field, |path| UpdateOp::Inc(path, by))
    }

    pub fn unset(self, field: &str) -> Self {
        self.push(field, UpdateOp::Unset)
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    fn push(mut self, field: &str, op: impl FnOnce(FieldPath) -> UpdateOp) -> Self {
        match FieldPath::parse(field) {
            Ok(path) if path.is_id() => {
                self.error
                    .get_or_insert(Invalid::Update("_id is immutable".to_string()));
            }
            Ok(path) => self.ops.push(op(path)),
            Err(err) => {
                self.error.get_or_insert(Invalid::from_store(err));
            }
        }
        self
    }

    /// Compiles into an SQL expression producing the new `body` from the old one.
    pub(crate) fn compile(&self) -> Result<(String, Vec<Value>), StoreError> {
        if let Some(err) = &self.error {
            return Err(err.to_store());
        }
        if self.ops.is_empty() {
            return Err(StoreError::InvalidUpdate("no fields to update".to_string()));
        }

        let mut seen: Vec<&FieldPath> = Vec::with_capacity(self.ops.len());
        for op in &self.ops {
            if seen.contains(&op.field()) {
                return Err(StoreError::InvalidUpdate(format!(
                    "field '{}' is updated more than once",
                    op.field().as_str()
                )));
            }
            seen.push(op.field());
        }

        let mut sql = "body".to_string();
        let mut values: Vec<Value> = Vec::new();

        // each op wraps the expression built so far; values are bound in textual order
        for op in &self.ops {
            let mut op_values = Vec::new();
            sql = match op {
                UpdateOp::Set(path, value) => {
                    op_values.push(Value::from(path.json_path()));
                    op_values.push(Value::from(value.to_string()));
                    format!("json_set({sql}, ?, json(?))")
                }
                UpdateOp::Inc(path, by) => {
                    op_values.push(Value::from(path.json_path()));
                    op_values.push(Value::from(path.json_path()));
                    op_values.push(match by.as_i64() {
                        Some(i) => Value::from(i),
                        None => Value::from(by.as_f64().unwrap_or(0.0)),
                    });
                    format!("json_set({sql}, ?, COALESCE(json_extract(body, ?), 0) + ?)")
                }
                UpdateOp::Unset(path) => {
                    op_values.push(Value::from(path.json_path()));
                    format!("json_remove({sql}, ?)")
                }
            };
            // the inner expression's placeholders come before this op's own
            values.extend(op_values);
        }

        Ok((sql, values))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort, limit and skip for `find_many`.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Option<(FieldPath, SortDirection)>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    error: Option<Invalid>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, field: &str, direction: SortDirection) -> Self {
        match FieldPath::parse(field) {
            Ok(path) => self.sort = Some((path, direction)),
            Err(err) => {
                self.error.get_or_insert(Invalid::from_store(err));
            }
        }
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        match &self.error {
            Some(err) => Err(err.to_store()),
            None => Ok(()),
        }
    }
}

/// Raw store-native aggregation.
///
/// `sql` is a SQLite `SELECT` yielding a JSON text column named `body`. It reads
/// from `docs(id, body)`, which holds only the repository's collection.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub sql: String,
    pub values: Vec<Json>,
}

impl Pipeline {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            values: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<Json>) -> Self {
        self.values.push(value.into());
        self
    }
}
