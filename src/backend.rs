//! REST client for the speech backend.

pub mod api;
mod multipart;

pub use api::{BackendClient, BackendLimits, BackendUrlError, CatalogFetchError, SynthesisRequestError};
pub use multipart::MultipartForm;
