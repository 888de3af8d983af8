//! # Jubilee Architecture
//!
//! Jubilee is a **UI-agnostic blog library**. The CLI binary is just one
//! client of it; the same core could sit behind a web page or any other
//! front end.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository Layer (repo.rs, users.rs)                       │
//! │  - Post/comment/like operations, registration, notify hook  │
//! │  - Decides remote vs local per write; always mirrors local  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │  Storage Layer (store/)  │   │  Remote Adapter (remote.rs)  │
//! │  - LocalStore trait      │   │  - Optional REST backend     │
//! │  - FileStore, InMemory   │   │  - Absent when unconfigured  │
//! └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Local-First Writes
//!
//! Every write goes to the remote backend first when one is configured, but
//! the local store is always updated afterwards, whether the remote call
//! succeeded or not. A remote failure is logged and absorbed; it never
//! surfaces as a failure of the user's action. The worst case is operating
//! on local-only data.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `repo.rs` inward, code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<T>`)
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//!
//! ## Module Overview
//!
//! - [`repo`]: The blog repository — entry point for post/comment operations
//! - [`store`]: Local persistence abstraction and implementations
//! - [`remote`]: Optional REST backend adapter
//! - [`notify`]: Best-effort new-post email fan-out
//! - [`users`]: Registered users and notification subscriptions
//! - [`model`]: Core data types (`Post`, `Comment`, `Mood`, `RegisteredUser`)
//! - [`quotes`]: Daily quote rotation and celebration countdown
//! - [`config`]: Environment-derived remote/email configuration
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod quotes;
pub mod remote;
pub mod repo;
pub mod store;
pub mod users;
