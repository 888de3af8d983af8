//! # Local Storage Layer
//!
//! This module defines the durable on-device persistence for jubilee. The
//! [`LocalStore`] trait allows the repository to work with different
//! storage backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Keep the repository **decoupled** from persistence details
//!
//! All persistence goes through this trait. No other component touches the
//! storage medium directly, so the local mirror can never be corrupted by
//! an uncoordinated writer within the same session.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - Posts and comments in `posts.json` / `comments.json`
//!   - Registered users in `users.json`, current session in `session.json`
//!   - The anonymous viewer identity in `viewer-id`
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Cloning shares state, so several components can see one store
//!
//! ## Corruption Tolerance
//!
//! A collection file that exists but fails to parse yields an empty
//! collection and a logged warning, never an error: losing one corrupt
//! table must not take the rest of the application down. Genuine I/O
//! failures still propagate.

use crate::error::Result;
use crate::model::{Comment, Post, RegisteredUser};

pub mod fs;
pub mod memory;

/// Abstract interface for durable local persistence.
///
/// `save` must be atomic from the caller's point of view: both collections
/// are published together or the call fails as a unit.
pub trait LocalStore {
    /// Load all persisted posts and comments.
    fn load(&self) -> Result<(Vec<Post>, Vec<Comment>)>;

    /// Persist both collections together.
    fn save(&mut self, posts: &[Post], comments: &[Comment]) -> Result<()>;

    /// The stable anonymous viewer identity, generated and persisted on
    /// first access. Returns the same id on every later call until
    /// [`LocalStore::clear_viewer_id`].
    fn viewer_id(&mut self) -> Result<String>;

    /// Forget the viewer identity; the next `viewer_id` call mints a new one.
    fn clear_viewer_id(&mut self) -> Result<()>;

    /// Load the registered-user table.
    fn load_users(&self) -> Result<Vec<RegisteredUser>>;

    /// Persist the registered-user table.
    fn save_users(&mut self, users: &[RegisteredUser]) -> Result<()>;

    /// The locally registered current user, if any.
    fn load_session(&self) -> Result<Option<RegisteredUser>>;

    /// Persist the current user record.
    fn save_session(&mut self, user: &RegisteredUser) -> Result<()>;

    /// Remove the current user record.
    fn clear_session(&mut self) -> Result<()>;
}
