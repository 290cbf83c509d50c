//! Factory methods for creating test data.
//!
//! Each factory has a `Factory` struct for customization and a `create_*`
//! convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let doc = factory::create_document(&db, "test", "items", json!({"name": "a"})).await?;
//! let user = factory::user::UserFactory::new(&db, "test").role("admin").build().await?;
//! ```
//!
//! # Available Factories
//!
//! - `document` - Raw rows of the documents table
//! - `user` - Accounts in the `users` collection with hashed passwords
//! - `helpers` - Unique id generation

pub mod document;
pub mod helpers;
pub mod user;

pub use document::create_document;
pub use user::create_user;
