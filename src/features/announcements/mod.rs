//! Announcement listing and editing.

pub mod client;
pub mod types;

pub use self::client::{
    create_announcement, delete_announcement, list_announcements, update_announcement,
};
pub use self::types::{Announcement, AnnouncementDraft, AnnouncementPatch};
