//! Shared WebSocket adapter state.

use std::sync::Arc;

use url::{Origin, Url};

use crate::domain::ports::LetterAdmin;

/// Origins allowed to open the admin live board.
///
/// Exact origins come from configuration. `http://localhost:<port>` can be
/// allowed as a whole for development.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: Vec<Origin>,
    allow_localhost: bool,
}

impl OriginAllowList {
    /// Build from configured origin URLs. Paths are ignored.
    pub fn new(origins: impl IntoIterator<Item = Url>) -> Self {
        Self {
            origins: origins.into_iter().map(|url| url.origin()).collect(),
            allow_localhost: false,
        }
    }

    /// Also accept `http://localhost` on any non-zero explicit port.
    #[must_use]
    pub fn with_localhost(mut self, allow: bool) -> Self {
        self.allow_localhost = allow;
        self
    }

    /// Whether a parsed `Origin` header may upgrade.
    pub fn allows(&self, origin: &Url) -> bool {
        if self.allow_localhost
            && origin.scheme() == "http"
            && origin.host_str() == Some("localhost")
            && matches!(origin.port(), Some(port) if port != 0)
        {
            return true;
        }
        let candidate = origin.origin();
        candidate.is_tuple() && self.origins.contains(&candidate)
    }
}

/// Dependency bundle for the live board endpoint.
#[derive(Clone)]
pub struct WsState {
    pub admin: Arc<dyn LetterAdmin>,
    pub origins: OriginAllowList,
}

impl WsState {
    pub fn new(admin: Arc<dyn LetterAdmin>, origins: OriginAllowList) -> Self {
        Self { admin, origins }
    }
}
