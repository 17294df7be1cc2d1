use thiserror::Error;

/// Errors internal to the collection layer.
///
/// These never cross the crate boundary from `fetch_page`/`capture_page` —
/// both convert them to `None` after logging. Constructors (`new`) do
/// propagate them, since a client that cannot be built is a startup error.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },
}
