//! Turtle Test Utils
//!
//! Provides shared testing utilities for the turtle backend. This crate offers a
//! builder for test contexts backed by in-memory SQLite databases, plus factories
//! that seed the documents table directly.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment holding the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Raw document and user seeding
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_document_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_document_table()
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform store operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
