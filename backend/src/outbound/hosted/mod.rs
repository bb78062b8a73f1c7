//! Hosted backend adapters.
//!
//! One HTTP client serves both the letters table (`LetterRepository`) and the
//! photo bucket (`BlobStore`).

mod client;
mod config;
mod dto;

pub use client::{
    DEFAULT_BUCKET, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TABLE, HostedBackend, HostedClientError,
    HostedResources,
};
pub use config::{BACKEND_KEY_ENV, BACKEND_URL_ENV, HostedBackendSettings, HostedConfigError};
