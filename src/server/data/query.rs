//! Fluent, single-use query builder over a repository.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as Json;

use crate::server::{
    data::{
        filter::{Filter, FindOptions, SortDirection},
        repository::Repository,
    },
    error::store::StoreError,
};

/// Accumulates a filter and find options, then runs them once.
///
/// Terminal methods take `self`, so a builder cannot be executed twice. A
/// predicate on a field that already has one replaces it, and the last `sort`
/// wins.
pub struct QueryBuilder<'a, T> {
    repository: &'a Repository<T>,
    filter: Filter,
    options: FindOptions,
}

impl<'a, T> QueryBuilder<'a, T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(repository: &'a Repository<T>) -> Self {
        Self {
            repository,
            filter: Filter::new(),
            options: FindOptions::new(),
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Json>) -> Self {
        self.filter = self.filter.eq(field, value);
        self
    }

    pub fn where_in<V: Into<Json>>(mut self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filter = self.filter.is_in(field, values);
        self
    }

    pub fn where_greater_than(mut self, field: &str, value: impl Into<Json>) -> Self {
        self.filter = self.filter.gt(field, value);
        self
    }

    pub fn where_less_than(mut self, field: &str, value: impl Into<Json>) -> Self {
        self.filter = self.filter.lt(field, value);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.options = self.options.limit(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.options = self.options.skip(skip);
        self
    }

    pub fn sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.options = self.options.sort(field, direction);
        self
    }

    /// Runs the query and returns every match.
    pub async fn execute(self) -> Result<Vec<T>, StoreError> {
        self.repository.find_many(self.filter, self.options).await
    }

    /// Runs the query with a limit of one.
    pub async fn first(self) -> Result<Option<T>, StoreError> {
        let options = self.options.limit(1);
        let mut found = self.repository.find_many(self.filter, options).await?;
        Ok(found.pop())
    }

    /// Counts matches; sort, skip and limit are ignored.
    pub async fn count(self) -> Result<u64, StoreError> {
        self.repository.count(self.filter).await
    }
}
