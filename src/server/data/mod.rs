//! Document store access layer.
//!
//! A `Store` wraps the pooled SeaORM connection to the documents table. Typed
//! `Repository<T>` handles read and write one collection of it, filters and
//! updates are built from the tagged expressions in `filter`, and `QueryBuilder`
//! offers the same operations fluently. Domain repositories such as
//! `UserRepository` sit on top of the generic one.

pub mod filter;
pub mod object_id;
pub mod query;
pub mod repository;
pub mod store;
pub mod user;
