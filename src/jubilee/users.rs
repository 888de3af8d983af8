//! Registered users for the notification feature.
//!
//! Registration is local and unauthenticated: the persisted session record
//! is the current user of this install. It is entirely independent of the
//! anonymous viewer identity used for likes.

use crate::error::{BlogError, Result};
use crate::model::RegisteredUser;
use crate::store::LocalStore;

pub struct UserRegistry<S: LocalStore> {
    store: S,
    users: Vec<RegisteredUser>,
    current: Option<RegisteredUser>,
}

impl<S: LocalStore> UserRegistry<S> {
    pub fn open(store: S) -> Result<Self> {
        let users = store.load_users()?;
        let current = store.load_session()?;
        Ok(Self {
            store,
            users,
            current,
        })
    }

    pub fn current(&self) -> Option<&RegisteredUser> {
        self.current.as_ref()
    }

    pub fn users(&self) -> &[RegisteredUser] {
        &self.users
    }

    /// Subscribed users other than the current one — the recipient list for
    /// a new-post notification.
    pub fn subscribed_users(&self) -> Vec<RegisteredUser> {
        let current_id = self.current.as_ref().map(|u| u.id);
        self.users
            .iter()
            .filter(|u| u.is_subscribed && Some(u.id) != current_id)
            .cloned()
            .collect()
    }

    /// Register this install's user and make them the current session.
    pub fn register(&mut self, name: &str, email: &str, subscribe: bool) -> Result<RegisteredUser> {
        if name.trim().is_empty() {
            return Err(BlogError::Validation("name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(BlogError::Validation("email cannot be empty"));
        }

        let user = RegisteredUser::new(name, email, subscribe);
        self.store.save_session(&user)?;
        self.users.push(user.clone());
        self.store.save_users(&self.users)?;
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Flip the current user's notification subscription. No-op when no one
    /// is registered.
    pub fn set_subscription(&mut self, subscribed: bool) -> Result<()> {
        let Some(current) = self.current.as_mut() else {
            return Ok(());
        };
        current.is_subscribed = subscribed;
        let updated = current.clone();

        self.store.save_session(&updated)?;
        if let Some(user) = self.users.iter_mut().find(|u| u.id == updated.id) {
            user.is_subscribed = subscribed;
        }
        self.store.save_users(&self.users)?;
        Ok(())
    }

    /// Forget the current session; the user stays in the table.
    pub fn clear_session(&mut self) -> Result<()> {
        self.store.clear_session()?;
        self.current = None;
        Ok(())
    }
}
