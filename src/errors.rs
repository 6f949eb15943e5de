use thiserror::Error;

/// Fatal conversion failures. Per-node problems never end up here; they are rendered into the
/// document as error paragraphs instead.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Unable to locate <body> in parsed markup")]
    MissingBody,
}

/// Errors returned by the CMS client and asset stores
#[derive(Error, Debug)]
pub enum CmsError {
    #[error("No asset store configured")]
    NoStore,
    #[error("Missing source URL")]
    EmptyUrl,
    #[error("Invalid URL {0:?}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("CMS responded with {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Unexpected CMS response: {0}")]
    UnexpectedResponse(String),
    #[error("Upload job {0} did not finish in time")]
    JobTimeout(String),
}
