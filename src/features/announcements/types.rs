//! Request and response types for announcement API endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl AnnouncementPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn announcement_decodes_api_shape() {
        let announcement: Announcement = serde_json::from_value(json!({
            "_id": "a1",
            "title": "Exam moved",
            "content": "The exam is now on Friday.",
            "userId": "u1",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(announcement.id, "a1");
        assert_eq!(announcement.user_id, "u1");
    }

    #[test]
    fn patch_omits_unset_fields() {
        let patch = AnnouncementPatch {
            content: Some("Updated".to_string()),
            ..AnnouncementPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"content": "Updated"}));
        assert!(AnnouncementPatch::default().is_empty());
    }
}
