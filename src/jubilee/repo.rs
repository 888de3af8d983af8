//! # Blog Repository
//!
//! The single entry point for post and comment operations. All UI clients
//! interact through [`BlogRepository`]; no other component touches the
//! stores directly.
//!
//! ## Write Path
//!
//! 1. Attempt the operation against the remote adapter, if one is present.
//! 2. Apply the mutation to the in-memory cache and mirror the full state
//!    into the local store — whether the remote call succeeded or not.
//!
//! A remote failure is logged and absorbed. The blog must always appear to
//! work; the worst case is operating on local-only data until the backend
//! returns. Writes apply in call order, with no retries and no coalescing.
//!
//! ## Read Path
//!
//! Reads serve from the in-memory cache hydrated in [`BlogRepository::open`]
//! (remote when available, local otherwise). Staleness against the remote
//! is acceptable; there is no background refresh.

use crate::error::{BlogError, Result};
use crate::model::{Comment, Mood, Post, RegisteredUser};
use crate::notify::NotificationDispatcher;
use crate::remote::{RemoteError, RemoteStore};
use crate::store::LocalStore;
use tracing::{info, warn};
use uuid::Uuid;

pub struct BlogRepository<S: LocalStore> {
    local: S,
    remote: Option<Box<dyn RemoteStore>>,
    dispatcher: NotificationDispatcher,
    viewer_id: String,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl<S: LocalStore> BlogRepository<S> {
    /// Hydrate a repository. When a remote adapter is present and both list
    /// calls succeed, the remote state becomes the cache and is mirrored
    /// locally; otherwise the local store is the source. Returns only once
    /// loading has settled, so readers never observe partial data.
    pub fn open(
        mut local: S,
        remote: Option<Box<dyn RemoteStore>>,
        dispatcher: NotificationDispatcher,
    ) -> Result<Self> {
        let viewer_id = local.viewer_id()?;

        let (posts, comments) = match &remote {
            Some(adapter) => match Self::load_remote(adapter.as_ref()) {
                Ok((posts, comments)) => {
                    local.save(&posts, &comments)?;
                    (posts, comments)
                }
                Err(err) => {
                    warn!(error = %err, "remote load failed, serving local data");
                    local.load()?
                }
            },
            None => local.load()?,
        };

        Ok(Self {
            local,
            remote,
            dispatcher,
            viewer_id,
            posts,
            comments,
        })
    }

    fn load_remote(remote: &dyn RemoteStore) -> std::result::Result<(Vec<Post>, Vec<Comment>), RemoteError> {
        let posts = remote.list_posts()?;
        let comments = remote.list_comments()?;
        Ok((posts, comments))
    }

    /// The stable anonymous identity of this install, used for like state.
    pub fn viewer_id(&self) -> &str {
        &self.viewer_id
    }

    /// All posts, newest first.
    pub fn posts(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        posts
    }

    pub fn post(&self, post_id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Comments on one post, newest first. Orphaned comments (whose post is
    /// gone) are unreachable through here.
    pub fn post_comments(&self, post_id: Uuid) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        comments
    }

    pub fn create_post(
        &mut self,
        author: &str,
        title: &str,
        content: &str,
        tags: Vec<String>,
        mood: Option<Mood>,
    ) -> Result<Post> {
        if title.trim().is_empty() {
            return Err(BlogError::Validation("title cannot be empty"));
        }
        if content.trim().is_empty() {
            return Err(BlogError::Validation("content cannot be empty"));
        }

        let post = Post::new(author, title, content, tags, mood);

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.insert_post(&post) {
                warn!(error = %err, "remote insert failed, keeping post locally");
            }
        }

        self.posts.insert(0, post.clone());
        self.local.save(&self.posts, &self.comments)?;

        self.notify_subscribers(&post);
        Ok(post)
    }

    /// Add a comment. The post is not required to exist: a comment racing a
    /// deletion simply becomes unreachable.
    pub fn add_comment(&mut self, post_id: Uuid, author: &str, content: &str) -> Result<Comment> {
        if content.trim().is_empty() {
            return Err(BlogError::Validation("comment cannot be empty"));
        }

        let comment = Comment::new(post_id, author, content);

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.insert_comment(&comment) {
                warn!(error = %err, "remote insert failed, keeping comment locally");
            }
        }

        self.comments.push(comment.clone());
        self.local.save(&self.posts, &self.comments)?;
        Ok(comment)
    }

    /// Flip a viewer's like on a post. Unknown ids are a silent no-op.
    pub fn toggle_post_like(&mut self, post_id: Uuid, viewer_id: &str) -> Result<()> {
        let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(());
        };
        post.toggle_like(viewer_id);
        let likes = post.likes;
        let liked_by = post.liked_by.clone();

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.update_post_likes(post_id, likes, &liked_by) {
                warn!(error = %err, "remote like update failed, keeping local state");
            }
        }

        self.local.save(&self.posts, &self.comments)
    }

    /// Flip a viewer's like on a comment. Unknown ids are a silent no-op.
    pub fn toggle_comment_like(&mut self, comment_id: Uuid, viewer_id: &str) -> Result<()> {
        let Some(comment) = self.comments.iter_mut().find(|c| c.id == comment_id) else {
            return Ok(());
        };
        comment.toggle_like(viewer_id);
        let likes = comment.likes;
        let liked_by = comment.liked_by.clone();

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.update_comment_likes(comment_id, likes, &liked_by) {
                warn!(error = %err, "remote like update failed, keeping local state");
            }
        }

        self.local.save(&self.posts, &self.comments)
    }

    /// Delete a post and every comment referencing it, as one update.
    pub fn delete_post(&mut self, post_id: Uuid) -> Result<()> {
        if !self.posts.iter().any(|p| p.id == post_id) {
            return Ok(());
        }

        if let Some(remote) = &self.remote {
            // Comment rows cascade via the backend's own FK rule.
            if let Err(err) = remote.delete_post(post_id) {
                warn!(error = %err, "remote delete failed, removing locally");
            }
        }

        self.posts.retain(|p| p.id != post_id);
        self.comments.retain(|c| c.post_id != post_id);
        self.local.save(&self.posts, &self.comments)
    }

    /// Advisory fan-out after a post lands. The report is logged; failures
    /// never affect the write that triggered them.
    fn notify_subscribers(&self, post: &Post) {
        let users = self.local.load_users().unwrap_or_default();
        let current = self.local.load_session().ok().flatten().map(|u| u.id);
        let recipients: Vec<RegisteredUser> = users
            .into_iter()
            .filter(|u| u.is_subscribed && Some(u.id) != current)
            .collect();
        if recipients.is_empty() {
            return;
        }

        let report = self.dispatcher.notify(&recipients, post);
        info!(
            success = report.success,
            failed = report.failed,
            "new post notifications dispatched"
        );
        for error in &report.errors {
            warn!(%error, "notification delivery failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::thread;
    use std::time::Duration;

    fn make_repo() -> BlogRepository<InMemoryStore> {
        BlogRepository::open(
            InMemoryStore::new(),
            None,
            NotificationDispatcher::unconfigured(),
        )
        .unwrap()
    }

    /// Remote that rejects every call, for fallback tests.
    struct FailingRemote;

    impl RemoteStore for FailingRemote {
        fn list_posts(&self) -> std::result::Result<Vec<Post>, RemoteError> {
            Err(RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
        fn list_comments(&self) -> std::result::Result<Vec<Comment>, RemoteError> {
            Err(RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
        fn insert_post(&self, _post: &Post) -> std::result::Result<(), RemoteError> {
            Err(RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
        fn insert_comment(&self, _comment: &Comment) -> std::result::Result<(), RemoteError> {
            Err(RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
        fn update_post_likes(
            &self,
            _id: Uuid,
            _likes: u32,
            _liked_by: &[String],
        ) -> std::result::Result<(), RemoteError> {
            Err(RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
        fn update_comment_likes(
            &self,
            _id: Uuid,
            _likes: u32,
            _liked_by: &[String],
        ) -> std::result::Result<(), RemoteError> {
            Err(RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
        fn delete_post(&self, _id: Uuid) -> std::result::Result<(), RemoteError> {
            Err(RemoteError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
    }

    #[derive(Default)]
    struct FakeRemoteState {
        posts: Vec<Post>,
        comments: Vec<Comment>,
        like_updates: usize,
        deletes: Vec<Uuid>,
    }

    /// In-memory remote backend recording what the repository sends it.
    #[derive(Clone, Default)]
    struct FakeRemote {
        state: Rc<RefCell<FakeRemoteState>>,
    }

    impl RemoteStore for FakeRemote {
        fn list_posts(&self) -> std::result::Result<Vec<Post>, RemoteError> {
            Ok(self.state.borrow().posts.clone())
        }
        fn list_comments(&self) -> std::result::Result<Vec<Comment>, RemoteError> {
            Ok(self.state.borrow().comments.clone())
        }
        fn insert_post(&self, post: &Post) -> std::result::Result<(), RemoteError> {
            self.state.borrow_mut().posts.push(post.clone());
            Ok(())
        }
        fn insert_comment(&self, comment: &Comment) -> std::result::Result<(), RemoteError> {
            self.state.borrow_mut().comments.push(comment.clone());
            Ok(())
        }
        fn update_post_likes(
            &self,
            id: Uuid,
            likes: u32,
            liked_by: &[String],
        ) -> std::result::Result<(), RemoteError> {
            let mut state = self.state.borrow_mut();
            state.like_updates += 1;
            if let Some(post) = state.posts.iter_mut().find(|p| p.id == id) {
                post.likes = likes;
                post.liked_by = liked_by.to_vec();
            }
            Ok(())
        }
        fn update_comment_likes(
            &self,
            id: Uuid,
            likes: u32,
            liked_by: &[String],
        ) -> std::result::Result<(), RemoteError> {
            let mut state = self.state.borrow_mut();
            state.like_updates += 1;
            if let Some(comment) = state.comments.iter_mut().find(|c| c.id == id) {
                comment.likes = likes;
                comment.liked_by = liked_by.to_vec();
            }
            Ok(())
        }
        fn delete_post(&self, id: Uuid) -> std::result::Result<(), RemoteError> {
            let mut state = self.state.borrow_mut();
            state.deletes.push(id);
            state.posts.retain(|p| p.id != id);
            Ok(())
        }
    }

    // --- Validation & Normalization ---

    #[test]
    fn create_post_trims_and_defaults_author() {
        let mut repo = make_repo();
        let post = repo
            .create_post("", "  Hello  ", "World", vec![], None)
            .unwrap();
        assert_eq!(post.author, "Anonymous");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert_eq!(post.likes, 0);
        assert!(post.liked_by.is_empty());
    }

    #[test]
    fn create_post_rejects_blank_required_fields() {
        let mut repo = make_repo();
        assert!(matches!(
            repo.create_post("amy", "   ", "content", vec![], None),
            Err(BlogError::Validation(_))
        ));
        assert!(matches!(
            repo.create_post("amy", "title", "", vec![], None),
            Err(BlogError::Validation(_))
        ));
        assert!(repo.posts().is_empty());
    }

    #[test]
    fn add_comment_rejects_blank_content() {
        let mut repo = make_repo();
        let post = repo.create_post("amy", "T", "C", vec![], None).unwrap();
        assert!(matches!(
            repo.add_comment(post.id, "bo", "  "),
            Err(BlogError::Validation(_))
        ));
    }

    // --- Like Semantics ---

    #[test]
    fn double_toggle_restores_original_like_state() {
        let mut repo = make_repo();
        let post = repo.create_post("amy", "T", "C", vec![], None).unwrap();

        repo.toggle_post_like(post.id, "v1").unwrap();
        let liked = repo.post(post.id).unwrap();
        assert_eq!(liked.likes, 1);
        assert_eq!(liked.likes as usize, liked.liked_by.len());

        repo.toggle_post_like(post.id, "v1").unwrap();
        let unliked = repo.post(post.id).unwrap();
        assert_eq!(unliked.likes, 0);
        assert!(unliked.liked_by.is_empty());
    }

    #[test]
    fn likes_never_diverge_from_liker_set() {
        let mut repo = make_repo();
        let post = repo.create_post("amy", "T", "C", vec![], None).unwrap();

        for viewer in ["v1", "v2", "v1", "v3", "v2", "v1"] {
            repo.toggle_post_like(post.id, viewer).unwrap();
            let current = repo.post(post.id).unwrap();
            assert_eq!(current.likes as usize, current.liked_by.len());
        }
        // v1: 3 toggles -> liked; v2: 2 -> not; v3: 1 -> liked
        let current = repo.post(post.id).unwrap();
        assert_eq!(current.likes, 2);
    }

    #[test]
    fn toggle_on_unknown_ids_is_a_silent_noop() {
        let mut repo = make_repo();
        repo.toggle_post_like(Uuid::new_v4(), "v1").unwrap();
        repo.toggle_comment_like(Uuid::new_v4(), "v1").unwrap();
        assert!(repo.posts().is_empty());
    }

    #[test]
    fn comment_likes_toggle_independently() {
        let mut repo = make_repo();
        let post = repo.create_post("amy", "T", "C", vec![], None).unwrap();
        let comment = repo.add_comment(post.id, "bo", "nice").unwrap();

        repo.toggle_comment_like(comment.id, "v1").unwrap();
        repo.toggle_comment_like(comment.id, "v2").unwrap();

        let comments = repo.post_comments(post.id);
        assert_eq!(comments[0].likes, 2);
        assert_eq!(repo.post(post.id).unwrap().likes, 0);
    }

    // --- Delete Cascade ---

    #[test]
    fn delete_post_cascades_to_its_comments_only() {
        let mut repo = make_repo();
        let a = repo.create_post("amy", "A", "first", vec![], None).unwrap();
        let b = repo.create_post("amy", "B", "second", vec![], None).unwrap();
        repo.add_comment(a.id, "bo", "c1").unwrap();
        repo.add_comment(a.id, "cy", "c2").unwrap();
        let c3 = repo.add_comment(b.id, "bo", "c3").unwrap();

        repo.delete_post(a.id).unwrap();

        let posts = repo.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, b.id);
        assert!(repo.post_comments(a.id).is_empty());
        let remaining = repo.post_comments(b.id);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, c3.id);
    }

    #[test]
    fn delete_of_unknown_post_is_a_noop() {
        let mut repo = make_repo();
        repo.create_post("amy", "T", "C", vec![], None).unwrap();
        repo.delete_post(Uuid::new_v4()).unwrap();
        assert_eq!(repo.posts().len(), 1);
    }

    // --- Serving Order & Orphans ---

    #[test]
    fn posts_serve_newest_first() {
        let mut repo = make_repo();
        repo.create_post("amy", "first", "c", vec![], None).unwrap();
        thread::sleep(Duration::from_millis(5));
        repo.create_post("amy", "second", "c", vec![], None).unwrap();

        let posts = repo.posts();
        assert_eq!(posts[0].title, "second");
        assert_eq!(posts[1].title, "first");
    }

    #[test]
    fn post_comments_serve_newest_first() {
        let mut repo = make_repo();
        let post = repo.create_post("amy", "T", "C", vec![], None).unwrap();
        repo.add_comment(post.id, "bo", "older").unwrap();
        thread::sleep(Duration::from_millis(5));
        repo.add_comment(post.id, "cy", "newer").unwrap();

        let comments = repo.post_comments(post.id);
        assert_eq!(comments[0].content, "newer");
        assert_eq!(comments[1].content, "older");
    }

    #[test]
    fn orphaned_comments_are_tolerated_and_unreachable() {
        let mut repo = make_repo();
        let ghost = Uuid::new_v4();
        repo.add_comment(ghost, "bo", "into the void").unwrap();
        assert_eq!(repo.post_comments(ghost).len(), 1);

        let other = repo.create_post("amy", "T", "C", vec![], None).unwrap();
        assert!(repo.post_comments(other.id).is_empty());
    }

    // --- Local-Only Parity ---

    #[test]
    fn local_only_operations_persist_across_reopen() {
        let store = InMemoryStore::new();
        let mut repo = BlogRepository::open(
            store.clone(),
            None,
            NotificationDispatcher::unconfigured(),
        )
        .unwrap();

        let post = repo.create_post("amy", "T", "C", vec![], None).unwrap();
        repo.add_comment(post.id, "bo", "hi").unwrap();
        repo.toggle_post_like(post.id, "v1").unwrap();
        drop(repo);

        let reopened =
            BlogRepository::open(store, None, NotificationDispatcher::unconfigured()).unwrap();
        let posts = reopened.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].likes, 1);
        assert_eq!(reopened.post_comments(post.id).len(), 1);
    }

    // --- Remote Preference & Fallback ---

    #[test]
    fn hydrates_from_remote_and_mirrors_locally() {
        let remote = FakeRemote::default();
        let seeded = Post::new("amy", "from remote", "body", vec![], None);
        remote.state.borrow_mut().posts.push(seeded.clone());

        let store = InMemoryStore::new();
        let repo = BlogRepository::open(
            store.clone(),
            Some(Box::new(remote)),
            NotificationDispatcher::unconfigured(),
        )
        .unwrap();

        assert_eq!(repo.posts()[0].id, seeded.id);

        // The hydrated state is mirrored into the local store.
        let (mirrored, _) = store.load().unwrap();
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].id, seeded.id);
    }

    #[test]
    fn writes_reach_the_remote_when_it_is_healthy() {
        let remote = FakeRemote::default();
        let mut repo = BlogRepository::open(
            InMemoryStore::new(),
            Some(Box::new(remote.clone())),
            NotificationDispatcher::unconfigured(),
        )
        .unwrap();

        let post = repo.create_post("amy", "T", "C", vec![], None).unwrap();
        repo.add_comment(post.id, "bo", "hi").unwrap();
        repo.toggle_post_like(post.id, "v1").unwrap();
        repo.delete_post(post.id).unwrap();

        let state = remote.state.borrow();
        assert_eq!(state.comments.len(), 1);
        assert_eq!(state.like_updates, 1);
        assert_eq!(state.deletes, vec![post.id]);
        assert!(state.posts.is_empty());
    }

    #[test]
    fn failing_remote_never_loses_writes() {
        let store = InMemoryStore::new();
        let mut repo = BlogRepository::open(
            store.clone(),
            Some(Box::new(FailingRemote)),
            NotificationDispatcher::unconfigured(),
        )
        .unwrap();

        let post = repo
            .create_post("amy", "kept", "despite the backend", vec![], None)
            .unwrap();
        repo.toggle_post_like(post.id, "v1").unwrap();
        drop(repo);

        // Reads after reopening against the same local store see the write,
        // even with the remote still down.
        let reopened = BlogRepository::open(
            store,
            Some(Box::new(FailingRemote)),
            NotificationDispatcher::unconfigured(),
        )
        .unwrap();
        let posts = reopened.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "kept");
        assert_eq!(posts[0].likes, 1);
    }

    // --- Notification Trigger ---

    #[test]
    fn create_post_succeeds_with_subscribers_present() {
        let mut store = InMemoryStore::new();
        let subscriber = RegisteredUser::new("Bo", "bo@example.com", true);
        store.save_users(&[subscriber]).unwrap();

        let mut repo =
            BlogRepository::open(store, None, NotificationDispatcher::unconfigured()).unwrap();
        let post = repo.create_post("amy", "News", "Body", vec![], None).unwrap();
        assert_eq!(post.title, "News");
    }
}
