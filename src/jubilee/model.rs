use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Excited,
    Grateful,
    Thoughtful,
    Celebratory,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Excited => "excited",
            Mood::Grateful => "grateful",
            Mood::Thoughtful => "thoughtful",
            Mood::Celebratory => "celebratory",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "excited" => Ok(Mood::Excited),
            "grateful" => Ok(Mood::Grateful),
            "thoughtful" => Ok(Mood::Thoughtful),
            "celebratory" => Ok(Mood::Celebratory),
            other => Err(format!(
                "unknown mood '{}' (expected happy, excited, grateful, thoughtful or celebratory)",
                other
            )),
        }
    }
}

// Persisted field names are camelCase (likedBy, postId, ...) to match the
// on-disk table layout; the remote wire names live in remote.rs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub liked_by: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl Post {
    pub fn new(
        author: &str,
        title: &str,
        content: &str,
        tags: Vec<String>,
        mood: Option<Mood>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: normalize_author(author),
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            timestamp: Utc::now(),
            likes: 0,
            liked_by: Vec::new(),
            tags,
            mood,
        }
    }

    /// Flip this viewer's like. Returns true if the post is now liked.
    pub fn toggle_like(&mut self, viewer_id: &str) -> bool {
        let liked = toggle_entry(&mut self.liked_by, viewer_id);
        self.likes = self.liked_by.len() as u32;
        liked
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub liked_by: Vec<String>,
}

impl Comment {
    pub fn new(post_id: Uuid, author: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author: normalize_author(author),
            content: content.trim().to_string(),
            timestamp: Utc::now(),
            likes: 0,
            liked_by: Vec::new(),
        }
    }

    /// Flip this viewer's like. Returns true if the comment is now liked.
    pub fn toggle_like(&mut self, viewer_id: &str) -> bool {
        let liked = toggle_entry(&mut self.liked_by, viewer_id);
        self.likes = self.liked_by.len() as u32;
        liked
    }
}

/// A registered user of the notification feature. Independent of the
/// anonymous viewer identity used for likes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub is_subscribed: bool,
}

impl RegisteredUser {
    pub fn new(name: &str, email: &str, is_subscribed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            created_at: Utc::now(),
            is_subscribed,
        }
    }
}

fn normalize_author(author: &str) -> String {
    let trimmed = author.trim();
    if trimmed.is_empty() {
        "Anonymous".to_string()
    } else {
        trimmed.to_string()
    }
}

fn toggle_entry(liked_by: &mut Vec<String>, viewer_id: &str) -> bool {
    if let Some(pos) = liked_by.iter().position(|v| v == viewer_id) {
        liked_by.remove(pos);
        false
    } else {
        liked_by.push(viewer_id.to_string());
        true
    }
}
