use super::LocalStore;
use crate::error::{BlogError, Result};
use crate::model::{Comment, Post, RegisteredUser};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

#[derive(Default)]
struct MemState {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    viewer_id: Option<String>,
    users: Vec<RegisteredUser>,
    session: Option<RegisteredUser>,
    simulate_write_error: bool,
}

/// In-memory store for testing.
///
/// Uses `Rc<RefCell<_>>` since jubilee is single-threaded; cloning the
/// store shares its state, which lets a test hand "the same storage" to
/// both a repository and a user registry.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Rc<RefCell<MemState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state.borrow_mut().simulate_write_error = simulate;
    }

    fn check_write(&self) -> Result<()> {
        if self.state.borrow().simulate_write_error {
            return Err(BlogError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl LocalStore for InMemoryStore {
    fn load(&self) -> Result<(Vec<Post>, Vec<Comment>)> {
        let state = self.state.borrow();
        Ok((state.posts.clone(), state.comments.clone()))
    }

    fn save(&mut self, posts: &[Post], comments: &[Comment]) -> Result<()> {
        self.check_write()?;
        let mut state = self.state.borrow_mut();
        state.posts = posts.to_vec();
        state.comments = comments.to_vec();
        Ok(())
    }

    fn viewer_id(&mut self) -> Result<String> {
        let mut state = self.state.borrow_mut();
        if let Some(id) = &state.viewer_id {
            return Ok(id.clone());
        }
        let id = Uuid::new_v4().to_string();
        state.viewer_id = Some(id.clone());
        Ok(id)
    }

    fn clear_viewer_id(&mut self) -> Result<()> {
        self.state.borrow_mut().viewer_id = None;
        Ok(())
    }

    fn load_users(&self) -> Result<Vec<RegisteredUser>> {
        Ok(self.state.borrow().users.clone())
    }

    fn save_users(&mut self, users: &[RegisteredUser]) -> Result<()> {
        self.check_write()?;
        self.state.borrow_mut().users = users.to_vec();
        Ok(())
    }

    fn load_session(&self) -> Result<Option<RegisteredUser>> {
        Ok(self.state.borrow().session.clone())
    }

    fn save_session(&mut self, user: &RegisteredUser) -> Result<()> {
        self.check_write()?;
        self.state.borrow_mut().session = Some(user.clone());
        Ok(())
    }

    fn clear_session(&mut self) -> Result<()> {
        self.state.borrow_mut().session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let mut a = InMemoryStore::new();
        let b = a.clone();

        let post = Post::new("amy", "T", "C", vec![], None);
        a.save(&[post], &[]).unwrap();

        let (posts, _) = b.load().unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn simulated_write_error_fails_save() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);
        assert!(store.save(&[], &[]).is_err());
    }

    #[test]
    fn viewer_id_is_lazy_and_stable() {
        let mut store = InMemoryStore::new();
        let first = store.viewer_id().unwrap();
        assert_eq!(first, store.viewer_id().unwrap());
        store.clear_viewer_id().unwrap();
        assert_ne!(first, store.viewer_id().unwrap());
    }
}
