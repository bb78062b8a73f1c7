//! Mailroom: letters to Santa.
//!
//! Children send letters (optionally with a selfie), look up a shipping
//! ticket by phone number, and Santa's admins work through the letters on a
//! live board. The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] holds the letter model, the submission wizard, filtering
//!   and the ports the adapters implement.
//! - [`inbound`] exposes the HTTP API and the admin WebSocket.
//! - [`outbound`] talks to the hosted table and object store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
