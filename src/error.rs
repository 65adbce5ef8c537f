//! EOL error types

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EolError>;

#[derive(Error, Debug)]
pub enum EolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{status} returned by {url}")]
    HttpStatus { status: u16, url: String },

    #[error(
        "refusing to clear non-default cache folder {}; expected its name to be one of .eol-cache, eol-cache or eol",
        dir.display()
    )]
    RefusingToClear { dir: PathBuf },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    GenericError(#[from] anyhow::Error),
}

impl EolError {
    /// Whether an `anyhow` error carries a refusal to clear the cache
    pub fn is_refusal(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<EolError>(),
            Some(EolError::RefusingToClear { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_message_names_directory() {
        let err = EolError::RefusingToClear {
            dir: PathBuf::from("/home/me/Documents"),
        };
        let msg = err.to_string();
        assert!(msg.contains("refusing to clear"));
        assert!(msg.contains("/home/me/Documents"));
    }

    #[test]
    fn test_is_refusal_through_anyhow() {
        let err = anyhow::Error::from(EolError::RefusingToClear {
            dir: PathBuf::from("/tmp/x"),
        });
        assert!(EolError::is_refusal(&err));

        let other = anyhow::anyhow!("disk full");
        assert!(!EolError::is_refusal(&other));
    }

    #[test]
    fn test_http_status_display() {
        let err = EolError::HttpStatus {
            status: 404,
            url: "https://endoflife.date/api/v1/products/nope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "404 returned by https://endoflife.date/api/v1/products/nope"
        );
    }
}
