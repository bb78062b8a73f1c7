//! Correlation id for one inbound request.
//!
//! Held in a Tokio task-local so [`Error`](super::Error) and log lines can
//! pick it up without threading it through every call. Task-locals do not
//! follow spawned work, so photo resizing and the admin live board use the
//! helpers below to carry the id along.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task::JoinHandle;
use uuid::Uuid;

/// Header used both to accept a caller's id and to echo the effective one.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// UUID naming one request in logs and error bodies.
///
/// # Examples
/// ```
/// use mailroom::TraceId;
///
/// let id: TraceId = "0f9c2d4e-5a6b-4c7d-8e9f-0a1b2c3d4e5f".parse().expect("uuid");
/// assert_eq!(id.to_string(), "0f9c2d4e-5a6b-4c7d-8e9f-0a1b2c3d4e5f");
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `id` as the current trace id.
    pub async fn scope<Fut: Future>(id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(id, fut).await
    }

    /// Resize and encode photos off the async workers, keeping the id.
    pub fn spawn_blocking<F, R>(work: F) -> JoinHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let carried = Self::current();
        tokio::task::spawn_blocking(move || match carried {
            Some(id) => CURRENT.sync_scope(id, work),
            None => work(),
        })
    }

    /// Spawn a connection task on the current `LocalSet`, keeping the id of
    /// the request that opened it.
    pub fn spawn_local<Fut>(fut: Fut) -> JoinHandle<Fut::Output>
    where
        Fut: Future + 'static,
        Fut::Output: 'static,
    {
        match Self::current() {
            Some(id) => tokio::task::spawn_local(CURRENT.scope(id, fut)),
            None => tokio::task::spawn_local(fut),
        }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scoped_futures_see_the_id() {
        let id = TraceId::generate();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert_eq!(TraceId::current(), None);
    }

    #[test]
    fn rejects_non_uuid_text() {
        assert!("letter-42".parse::<TraceId>().is_err());
    }

    #[tokio::test]
    async fn photo_work_keeps_the_request_id() {
        let id = TraceId::generate();
        let seen = TraceId::scope(id, async {
            TraceId::spawn_blocking(TraceId::current)
                .await
                .expect("blocking task completes")
        })
        .await;
        assert_eq!(seen, Some(id));
    }

    #[tokio::test]
    async fn unscoped_photo_work_has_no_id() {
        let seen = TraceId::spawn_blocking(TraceId::current)
            .await
            .expect("blocking task completes");
        assert_eq!(seen, None);
    }

    #[tokio::test]
    async fn connection_tasks_keep_the_upgrade_id() {
        let id = TraceId::generate();
        let local = tokio::task::LocalSet::new();
        let seen = local
            .run_until(TraceId::scope(id, async {
                TraceId::spawn_local(async { TraceId::current() })
                    .await
                    .expect("local task completes")
            }))
            .await;
        assert_eq!(seen, Some(id));
    }
}
