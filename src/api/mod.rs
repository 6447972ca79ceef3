//! REST API collaborator
//!
//! Authentication, uploads and admin endpoints of the backend. Used by the
//! `api` subcommands; scenarios never depend on it.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{AdminStats, ApiResponse, AuthSession, UserInfo, WhitelistEmail, WhitelistStatus};
