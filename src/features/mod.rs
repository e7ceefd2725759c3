//! Feature clients for the dashboard API. Resource features keep their wire
//! types in `types` and their calls in `client`; every call goes through the
//! gateway.

pub mod announcements;
pub mod auth;
pub mod dashboard;
pub mod quizzes;
