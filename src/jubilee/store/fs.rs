use super::LocalStore;
use crate::error::{BlogError, Result};
use crate::model::{Comment, Post, RegisteredUser};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

const POSTS_FILE: &str = "posts.json";
const COMMENTS_FILE: &str = "comments.json";
const USERS_FILE: &str = "users.json";
const SESSION_FILE: &str = "session.json";
const VIEWER_FILE: &str = "viewer-id";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The platform data directory (e.g. `~/.local/share/jubilee`).
    pub fn default_root() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "jubilee", "jubilee")
            .ok_or_else(|| BlogError::Store("Could not determine a data directory".to_string()))?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BlogError::Io)?;
        }
        Ok(())
    }

    /// Read a JSON collection. A missing file is an empty collection; a
    /// file that fails to parse is an empty collection plus a warning.
    fn load_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(BlogError::Io)?;
        match serde_json::from_str(&content) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(file, error = %err, "corrupt collection file, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn stage<T: Serialize>(&self, file: &str, records: &[T]) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(records).map_err(BlogError::Serialization)?;
        let tmp = self.root.join(format!(".{}-{}.tmp", file, Uuid::new_v4()));
        fs::write(&tmp, content).map_err(BlogError::Io)?;
        Ok(tmp)
    }

    fn write_atomic(&self, file: &str, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let tmp = self.root.join(format!(".{}-{}.tmp", file, Uuid::new_v4()));
        fs::write(&tmp, content).map_err(BlogError::Io)?;
        fs::rename(&tmp, self.root.join(file)).map_err(BlogError::Io)?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn load(&self) -> Result<(Vec<Post>, Vec<Comment>)> {
        let posts = self.load_collection(POSTS_FILE)?;
        let comments = self.load_collection(COMMENTS_FILE)?;
        Ok((posts, comments))
    }

    fn save(&mut self, posts: &[Post], comments: &[Comment]) -> Result<()> {
        self.ensure_dir()?;

        // Stage both collections before publishing either, so a failure
        // cannot leave only one of them updated.
        let posts_tmp = self.stage(POSTS_FILE, posts)?;
        let comments_tmp = match self.stage(COMMENTS_FILE, comments) {
            Ok(tmp) => tmp,
            Err(err) => {
                let _ = fs::remove_file(&posts_tmp);
                return Err(err);
            }
        };

        fs::rename(&posts_tmp, self.root.join(POSTS_FILE)).map_err(BlogError::Io)?;
        fs::rename(&comments_tmp, self.root.join(COMMENTS_FILE)).map_err(BlogError::Io)?;
        Ok(())
    }

    fn viewer_id(&mut self) -> Result<String> {
        let path = self.root.join(VIEWER_FILE);
        if path.exists() {
            let id = fs::read_to_string(&path).map_err(BlogError::Io)?;
            let id = id.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }

        let id = Uuid::new_v4().to_string();
        self.write_atomic(VIEWER_FILE, &id)?;
        Ok(id)
    }

    fn clear_viewer_id(&mut self) -> Result<()> {
        let path = self.root.join(VIEWER_FILE);
        if path.exists() {
            fs::remove_file(path).map_err(BlogError::Io)?;
        }
        Ok(())
    }

    fn load_users(&self) -> Result<Vec<RegisteredUser>> {
        self.load_collection(USERS_FILE)
    }

    fn save_users(&mut self, users: &[RegisteredUser]) -> Result<()> {
        let content = serde_json::to_string_pretty(users).map_err(BlogError::Serialization)?;
        self.write_atomic(USERS_FILE, &content)
    }

    fn load_session(&self) -> Result<Option<RegisteredUser>> {
        let path = self.root.join(SESSION_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(BlogError::Io)?;
        match serde_json::from_str(&content) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(error = %err, "corrupt session file, treating as unregistered");
                Ok(None)
            }
        }
    }

    fn save_session(&mut self, user: &RegisteredUser) -> Result<()> {
        let content = serde_json::to_string_pretty(user).map_err(BlogError::Serialization)?;
        self.write_atomic(SESSION_FILE, &content)
    }

    fn clear_session(&mut self) -> Result<()> {
        let path = self.root.join(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path).map_err(BlogError::Io)?;
        }
        Ok(())
    }
}
