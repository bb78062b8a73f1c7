//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **hosted**: REST and storage client for the hosted backend
//! - **change_feed**: in-process broadcast of letter table changes
//! - **admin_login**: admin credentials checked against configured digests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod admin_login;
pub mod change_feed;
pub mod hosted;
