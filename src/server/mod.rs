//! HTTP backend: access control, session tokens and the document store.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers and DTO conversion
//! - **Service Layer** (`service/`) - Login flow and session token engine
//! - **Data Layer** (`data/`) - Document store, typed repositories and query builder
//! - **Model Layer** (`model/`) - Domain models, caller identity and API key registry
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Access gates and session cookie handling
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - JSON config file
//! - **Logging** (`logging`) - Log subscriber and runtime-adjustable outputs
//! - **State** (`state`) - Shared application state (store, API keys)
//! - **Startup** (`startup`) - Store connection, log folder and health monitor
//! - **Router** (`router`) - Axum route configuration
//!
//! # Request Flow
//!
//! 1. **Router** matches the path; unmatched paths are served from the static directory
//! 2. **Middleware** decides the caller identity for gated groups or rejects the request
//! 3. **Controller** reads the identity and body, calls a service
//! 4. **Service** executes business logic against repositories
//! 5. **Data** runs the query against the document store under a timeout
//! 6. **Controller** converts the result to a DTO and responds

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
