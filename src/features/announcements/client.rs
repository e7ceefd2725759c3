//! Client wrappers for announcement API endpoints.

use crate::{
    api::{resource_path, ApiError, Gateway},
    features::announcements::types::{Announcement, AnnouncementDraft, AnnouncementPatch},
};

const ANNOUNCEMENTS: &str = "/announcements";

/// # Errors
/// Returns the API or session error from the gateway.
pub async fn list_announcements(gateway: &Gateway) -> Result<Vec<Announcement>, ApiError> {
    gateway.get_json(ANNOUNCEMENTS).await
}

/// # Errors
/// Returns the API or session error from the gateway.
pub async fn create_announcement(
    gateway: &Gateway,
    draft: &AnnouncementDraft,
) -> Result<Announcement, ApiError> {
    gateway.post_json(ANNOUNCEMENTS, draft).await
}

/// Applies a partial update and returns the stored announcement.
///
/// # Errors
/// Returns `ApiError::Serialization` for an invalid id, otherwise the API or
/// session error from the gateway.
pub async fn update_announcement(
    gateway: &Gateway,
    id: &str,
    patch: &AnnouncementPatch,
) -> Result<Announcement, ApiError> {
    let path = resource_path(ANNOUNCEMENTS, id)?;
    gateway.patch_json(&path, patch).await
}

/// # Errors
/// Returns `ApiError::Serialization` for an invalid id, otherwise the API or
/// session error from the gateway.
pub async fn delete_announcement(gateway: &Gateway, id: &str) -> Result<(), ApiError> {
    let path = resource_path(ANNOUNCEMENTS, id)?;
    gateway.delete(&path).await
}
