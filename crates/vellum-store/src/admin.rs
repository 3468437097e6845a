//! In-memory editing session for the post collection.
//!
//! The session never writes the post store. "Saving" means serializing the
//! collection back to indented JSON so the operator can copy it over
//! `posts.json` by hand.

use chrono::{Local, Utc};
use uuid::Uuid;

use crate::post::Post;
use crate::store::export_json;

/// Errors reported by admin operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("title and content must not be empty")]
    EmptyField,

    #[error("no post with id \"{0}\"")]
    NotFound(String),
}

/// An in-memory copy of the post collection plus edit-form state.
#[derive(Debug, Default)]
pub struct AdminSession {
    posts: Vec<Post>,
    editing: Option<String>,
}

impl AdminSession {
    /// Start a session over a seeded collection.
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            editing: None,
        }
    }

    /// The current collection, newest additions first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Id of the post currently open for editing, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Add a new post to the front of the collection.
    ///
    /// Title and content are trimmed and must be non-empty; the post gets a
    /// freshly generated id and today's date.
    pub fn add(&mut self, title: &str, content: &str) -> Result<&Post, AdminError> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AdminError::EmptyField);
        }

        self.posts.insert(
            0,
            Post {
                id: generate_post_id(),
                title: title.to_string(),
                date: today(),
                content: content.to_string(),
                summary: None,
            },
        );
        Ok(&self.posts[0])
    }

    /// Open a post for editing.
    pub fn begin_edit(&mut self, id: &str) -> Result<&Post, AdminError> {
        let pos = self.position(id)?;
        self.editing = Some(id.to_string());
        Ok(&self.posts[pos])
    }

    /// Apply an edit to title and content. The date is preserved.
    ///
    /// Closes the edit form when the edited post was the open one.
    pub fn apply_edit(&mut self, id: &str, title: &str, content: &str) -> Result<(), AdminError> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AdminError::EmptyField);
        }

        let pos = self.position(id)?;
        self.posts[pos].title = title.to_string();
        self.posts[pos].content = content.to_string();
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        Ok(())
    }

    /// Close the edit form without applying changes.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Delete a post by id, returning the removed record.
    ///
    /// If the deleted post was open in the edit form, the form is closed.
    pub fn delete(&mut self, id: &str) -> Result<Post, AdminError> {
        let pos = self.position(id)?;
        let removed = self.posts.remove(pos);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        Ok(removed)
    }

    /// Serialize the collection to indented JSON for manual export.
    pub fn export_json(&self) -> serde_json::Result<String> {
        export_json(&self.posts)
    }

    fn position(&self, id: &str) -> Result<usize, AdminError> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AdminError::NotFound(id.to_string()))
    }
}

/// Generate a unique post id from the current time and random bits.
pub fn generate_post_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!("post-{}-{}", millis, &random[..5])
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> AdminSession {
        AdminSession::new(vec![Post {
            id: "p1".to_string(),
            title: "First".to_string(),
            date: "2024-01-01".to_string(),
            content: "hello".to_string(),
            summary: None,
        }])
    }

    #[test]
    fn add_prepends_with_fresh_id_and_todays_date() {
        let mut session = seeded();

        let added_id = session.add("  New post  ", "body").unwrap().id.clone();

        assert_eq!(session.posts().len(), 2);
        assert_eq!(session.posts()[0].id, added_id);
        assert_eq!(session.posts()[0].title, "New post");
        assert_eq!(session.posts()[0].date, today());
        assert_eq!(session.posts()[1].id, "p1");
    }

    #[test]
    fn add_with_empty_title_is_rejected_without_mutation() {
        let mut session = seeded();

        assert_eq!(session.add("   ", "body"), Err(AdminError::EmptyField));
        assert_eq!(session.add("title", ""), Err(AdminError::EmptyField));
        assert_eq!(session.posts().len(), 1);
    }

    #[test]
    fn edit_preserves_date() {
        let mut session = seeded();

        session.apply_edit("p1", "Renamed", "new body").unwrap();

        assert_eq!(session.posts()[0].title, "Renamed");
        assert_eq!(session.posts()[0].content, "new body");
        assert_eq!(session.posts()[0].date, "2024-01-01");
    }

    #[test]
    fn edit_of_unknown_id_fails() {
        let mut session = seeded();

        assert_eq!(
            session.apply_edit("nope", "t", "c"),
            Err(AdminError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn deleting_the_open_edit_target_closes_the_form() {
        let mut session = seeded();
        session.begin_edit("p1").unwrap();
        assert_eq!(session.editing(), Some("p1"));

        session.delete("p1").unwrap();

        assert_eq!(session.editing(), None);
        assert!(session.posts().is_empty());
    }

    #[test]
    fn deleting_another_post_keeps_the_form_open() {
        let mut session = seeded();
        session.add("Second", "body").unwrap();
        session.begin_edit("p1").unwrap();

        let other_id = session.posts()[0].id.clone();
        session.delete(&other_id).unwrap();

        assert_eq!(session.editing(), Some("p1"));
    }

    #[test]
    fn generated_ids_are_unique_and_time_prefixed() {
        let a = generate_post_id();
        let b = generate_post_id();

        assert!(a.starts_with("post-"));
        assert_ne!(a, b);
    }

    #[test]
    fn export_round_trips() {
        let session = seeded();

        let json = session.export_json().unwrap();
        let parsed: Vec<Post> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, session.posts());
    }
}
