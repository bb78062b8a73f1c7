//! Port for the photo bucket.
use async_trait::async_trait;
use url::Url;

use crate::domain::photo::{BlobName, JpegPhoto};

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob storage adapters.
    pub enum BlobStoreError {
        /// The storage service could not be reached or timed out.
        Connection { message: String } => "blob store connection failed: {message}",
        /// The storage service refused the upload.
        Rejected { message: String } => "blob upload rejected: {message}",
        /// A public address could not be formed for the key.
        PublicUrl { message: String } => "blob public URL could not be resolved: {message}",
    }
}

/// Upload-by-key storage with publicly resolvable addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `photo` under `name` as `image/jpeg`.
    async fn upload(&self, name: &BlobName, photo: &JpegPhoto) -> Result<(), BlobStoreError>;

    /// Public address of a previously uploaded blob.
    fn public_url(&self, name: &BlobName) -> Result<Url, BlobStoreError>;
}
