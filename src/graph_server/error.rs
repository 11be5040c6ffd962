use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, ServerError>;

/// The fixed message the frontend expects when no tree can be built.
pub const NO_ROOT_MESSAGE: &str = "Could not build tree";

// JSON parse errors are sticky data problems.
impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> ServerError {
        ServerError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

// So are failures to read the data file; we only read it once at startup, so
// there is nothing to retry.
impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> ServerError {
        ServerError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::ServerLayer,
            message: err.to_string(),
        })
    }
}

/// Express whether the error seems to be happening in the server or the data.
#[derive(Debug)]
pub enum ErrorLayer {
    /// The server could not get at its inputs, like an unreadable data file.
    ServerLayer,
    /// The flat node records themselves are the problem, like malformed JSON.
    DataLayer,
}

/// Details about what went wrong for investigation purposes.
#[derive(Debug)]
pub struct ErrorDetails {
    pub layer: ErrorLayer,
    /// Stringified version of the lower level error.
    pub message: String,
}

#[derive(Debug)]
pub enum ServerError {
    /// No flat node has an empty parent, so there is nothing to hang the tree
    /// from.  This is the only error the graph-data endpoint reports.
    NoRoot,
    /// An error that will persist for the lifetime of the process because the
    /// flat store never changes after startup.
    StickyProblem(ErrorDetails),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NoRoot => f.write_str(NO_ROOT_MESSAGE),
            ServerError::StickyProblem(details) => {
                write!(f, "{:?}: {}", details.layer, details.message)
            }
        }
    }
}

impl std::error::Error for ServerError {}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = match &self {
            ServerError::NoRoot => NO_ROOT_MESSAGE.to_string(),
            ServerError::StickyProblem(details) => details.message.clone(),
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
