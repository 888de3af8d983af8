//! # Remote Store Adapter
//!
//! An optional thin client against a PostgREST-style tabular backend with
//! `posts` and `comments` tables. The adapter exists only when connection
//! configuration is present; the repository holds it as
//! `Option<Box<dyn RemoteStore>>` and treats `None` as "always use local".
//!
//! Every method is a single bounded round-trip. Failures of any kind come
//! back as [`RemoteError`] values; the repository absorbs them by falling
//! back to the local store, so nothing here is ever user-fatal and nothing
//! is retried.
//!
//! The wire layout differs from the persisted local layout on two fields
//! (`likedBy` ↔ `liked_by`, `postId` ↔ `post_id`); the row structs below
//! own the wire names and convert to and from the model types.

use crate::config::RemoteConfig;
use crate::model::{Comment, Mood, Post};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const POSTS_TABLE: &str = "posts";
const COMMENTS_TABLE: &str = "comments";

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {0}")]
    Status(reqwest::StatusCode),
}

/// Abstract interface for the remote backend.
///
/// Implemented by [`HttpRemote`] in production and by in-memory fakes in
/// tests; the absent adapter is simply `None` at the repository.
pub trait RemoteStore {
    fn list_posts(&self) -> Result<Vec<Post>, RemoteError>;
    fn list_comments(&self) -> Result<Vec<Comment>, RemoteError>;
    fn insert_post(&self, post: &Post) -> Result<(), RemoteError>;
    fn insert_comment(&self, comment: &Comment) -> Result<(), RemoteError>;
    fn update_post_likes(
        &self,
        id: Uuid,
        likes: u32,
        liked_by: &[String],
    ) -> Result<(), RemoteError>;
    fn update_comment_likes(
        &self,
        id: Uuid,
        likes: u32,
        liked_by: &[String],
    ) -> Result<(), RemoteError>;
    fn delete_post(&self, id: Uuid) -> Result<(), RemoteError>;
}

/// Wire row for the `posts` table.
#[derive(Debug, Serialize, Deserialize)]
struct PostRow {
    id: Uuid,
    author: String,
    title: String,
    content: String,
    timestamp: DateTime<Utc>,
    likes: u32,
    liked_by: Vec<String>,
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mood: Option<Mood>,
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            author: post.author.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            timestamp: post.timestamp,
            likes: post.likes,
            liked_by: post.liked_by.clone(),
            tags: post.tags.clone(),
            mood: post.mood,
        }
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            author: row.author,
            title: row.title,
            content: row.content,
            timestamp: row.timestamp,
            likes: row.likes,
            liked_by: row.liked_by,
            tags: row.tags,
            mood: row.mood,
        }
    }
}

/// Wire row for the `comments` table.
#[derive(Debug, Serialize, Deserialize)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    author: String,
    content: String,
    timestamp: DateTime<Utc>,
    likes: u32,
    liked_by: Vec<String>,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author: comment.author.clone(),
            content: comment.content.clone(),
            timestamp: comment.timestamp,
            likes: comment.likes,
            liked_by: comment.liked_by.clone(),
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author: row.author,
            content: row.content,
            timestamp: row.timestamp,
            likes: row.likes,
            liked_by: row.liked_by,
        }
    }
}

pub struct HttpRemote {
    client: Client,
    base: String,
    api_key: String,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }

    fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(RemoteError::Status(status))
        }
    }

    fn select<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, RemoteError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn update_likes(
        &self,
        table: &str,
        id: Uuid,
        likes: u32,
        liked_by: &[String],
    ) -> Result<(), RemoteError> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&json!({ "likes": likes, "liked_by": liked_by }))
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}

impl RemoteStore for HttpRemote {
    fn list_posts(&self) -> Result<Vec<Post>, RemoteError> {
        let rows: Vec<PostRow> = self.select(POSTS_TABLE)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    fn list_comments(&self) -> Result<Vec<Comment>, RemoteError> {
        let rows: Vec<CommentRow> = self.select(COMMENTS_TABLE)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    fn insert_post(&self, post: &Post) -> Result<(), RemoteError> {
        self.insert(POSTS_TABLE, &PostRow::from(post))
    }

    fn insert_comment(&self, comment: &Comment) -> Result<(), RemoteError> {
        self.insert(COMMENTS_TABLE, &CommentRow::from(comment))
    }

    fn update_post_likes(
        &self,
        id: Uuid,
        likes: u32,
        liked_by: &[String],
    ) -> Result<(), RemoteError> {
        self.update_likes(POSTS_TABLE, id, likes, liked_by)
    }

    fn update_comment_likes(
        &self,
        id: Uuid,
        likes: u32,
        liked_by: &[String],
    ) -> Result<(), RemoteError> {
        self.update_likes(COMMENTS_TABLE, id, likes, liked_by)
    }

    fn delete_post(&self, id: Uuid) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.table_url(POSTS_TABLE))
            .query(&[("id", format!("eq.{}", id))])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}
