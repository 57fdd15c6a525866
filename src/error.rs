use std::path::PathBuf;

use thiserror::Error;

pub type Error = AnnounceError;
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum AnnounceError {
    #[error("no repo provided. Provide a repo using --repo")]
    MissingRepo,
    #[error("invalid instance url {0:?}: {1}")]
    InvalidInstance(String, url::ParseError),

    // Remote repository
    #[error("error fetching remote: {0}")]
    Git(#[from] git2::Error),

    // Credential store
    #[error("error opening {}: {source}", path.display())]
    StoreRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error decoding {}: {source}", path.display())]
    StoreDecode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode {}: {source}", path.display())]
    StoreEncode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    StoreWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Status templates
    #[error("error reading template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error rendering template: {0}")]
    Template(#[from] tera::Error),

    // Social service
    #[error("failed to request API: {0}")]
    Api(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    ApiStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("bad API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("console input closed before an authorization code was accepted")]
    PromptClosed,
    #[error("IOError: {0}")]
    IOError(#[from] std::io::Error),
}
