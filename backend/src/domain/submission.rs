//! Submission pipeline: photo resize, upload, then record insert.
//!
//! Upload always precedes the insert so a stored record never points at a
//! blob that does not exist yet. A failed insert after a successful upload
//! leaves the blob orphaned; nothing is rolled back.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};
use url::Url;

use crate::domain::photo::{self, BlobName, JpegPhoto, PhotoError};
use crate::domain::ports::{
    BlobStore, LetterChange, LetterChanges, LetterRepository, LetterSubmission,
};
use crate::domain::{Error, Letter, TraceId, ValidLetter};

/// Message shown for any backend failure while sending.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "The snowstorm blocked the connection. Please try again.";

/// Domain service implementing [`LetterSubmission`].
#[derive(Clone)]
pub struct LetterSubmissionService {
    letters: Arc<dyn LetterRepository>,
    blobs: Arc<dyn BlobStore>,
    changes: Arc<dyn LetterChanges>,
    clock: Arc<dyn Clock>,
}

impl LetterSubmissionService {
    /// Create a pipeline over the given table and bucket. Confirmed inserts
    /// are announced on `changes`.
    pub fn new(
        letters: Arc<dyn LetterRepository>,
        blobs: Arc<dyn BlobStore>,
        changes: Arc<dyn LetterChanges>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            letters,
            blobs,
            changes,
            clock,
        }
    }

    async fn store_photo(&self, raw: Vec<u8>) -> Result<Url, Error> {
        let photo = TraceId::spawn_blocking(move || photo::resize_to_jpeg(&raw))
            .await
            .map_err(|err| Error::internal(format!("photo worker failed: {err}")))?
            .map_err(map_photo_error)?;

        let name = BlobName::generate(self.clock.utc(), &mut rand::thread_rng());
        self.upload(&name, &photo).await?;
        self.blobs.public_url(&name).map_err(|err| {
            error!(error = %err, blob = %name, "photo public URL unavailable");
            Error::service_unavailable(SUBMISSION_FAILED_MESSAGE)
        })
    }

    async fn upload(&self, name: &BlobName, photo: &JpegPhoto) -> Result<(), Error> {
        self.blobs.upload(name, photo).await.map_err(|err| {
            error!(error = %err, kind = err.kind(), blob = %name, "photo upload failed");
            Error::service_unavailable(SUBMISSION_FAILED_MESSAGE)
        })?;
        info!(
            blob = %name,
            width = photo.width(),
            height = photo.height(),
            "photo uploaded"
        );
        Ok(())
    }
}

fn map_photo_error(err: PhotoError) -> Error {
    match err {
        PhotoError::Decode(reason) => {
            Error::invalid_request("That picture could not be read. Please choose another photo.")
                .with_details(json!({ "field": "photo", "reason": reason }))
        }
        PhotoError::Encode(reason) => Error::internal(format!("photo encoding failed: {reason}")),
    }
}

#[async_trait]
impl LetterSubmission for LetterSubmissionService {
    async fn submit(&self, letter: ValidLetter, photo: Option<Vec<u8>>) -> Result<Letter, Error> {
        let image_url = match photo {
            Some(raw) => Some(self.store_photo(raw).await?),
            None => None,
        };

        let stored = self
            .letters
            .insert(&letter.into_new_letter(image_url))
            .await
            .map_err(|err| {
                error!(error = %err, kind = err.kind(), "letter insert failed");
                Error::service_unavailable(SUBMISSION_FAILED_MESSAGE)
            })?;
        info!(letter_id = %stored.id, with_photo = stored.image_url.is_some(), "letter stored");
        self.changes.publish(LetterChange::Insert);
        Ok(stored)
    }
}
