//! Submission outcomes.

use std::fmt;

use reqwest::StatusCode;

use super::error::SubmitError;
use crate::transaction::Transaction;

/// What the ledger said about a submission, as far as it said anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseInfo {
    /// HTTP status, or `None` when no response arrived.
    pub status: Option<u16>,
    /// Raw response body. Empty when no response arrived.
    pub body: String,
    /// Status reason phrase, or the local error description.
    pub message: String,
}

impl ResponseInfo {
    pub(crate) fn from_response(status: StatusCode, body: String) -> Self {
        Self {
            status: Some(status.as_u16()),
            body,
            message: status.canonical_reason().unwrap_or("unknown status").to_owned(),
        }
    }

    /// A failure that happened before or instead of an HTTP response.
    pub(crate) fn local(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ResponseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) if self.body.is_empty() => write!(f, "HTTP {} {}", status, self.message),
            Some(status) => write!(f, "HTTP {} {}: {}", status, self.message, self.body),
            None => f.write_str(&self.message),
        }
    }
}

/// The single result of a submission, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// HTTP 2xx.
    Accepted(ResponseInfo),
    /// HTTP 400.
    Malformed(ResponseInfo),
    /// Any other status, or no response at all.
    OtherError(ResponseInfo),
}

impl SubmitOutcome {
    /// Classifies an HTTP response.
    pub(crate) fn classify(status: StatusCode, body: String) -> Self {
        let info = ResponseInfo::from_response(status, body);
        if status.is_success() {
            SubmitOutcome::Accepted(info)
        } else if status == StatusCode::BAD_REQUEST {
            SubmitOutcome::Malformed(info)
        } else {
            SubmitOutcome::OtherError(info)
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    pub fn response(&self) -> &ResponseInfo {
        match self {
            SubmitOutcome::Accepted(info)
            | SubmitOutcome::Malformed(info)
            | SubmitOutcome::OtherError(info) => info,
        }
    }

    /// Maps the outcome onto the awaitable form, handing back `tx` on
    /// acceptance.
    pub fn into_result(self, tx: Transaction) -> Result<Transaction, SubmitError> {
        match self {
            SubmitOutcome::Accepted(_) => Ok(tx),
            SubmitOutcome::Malformed(info) => Err(SubmitError::Malformed(info)),
            SubmitOutcome::OtherError(info) => Err(SubmitError::Other(info)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(matches!(
            SubmitOutcome::classify(StatusCode::ACCEPTED, String::new()),
            SubmitOutcome::Accepted(_)
        ));
        assert!(matches!(
            SubmitOutcome::classify(StatusCode::OK, String::new()),
            SubmitOutcome::Accepted(_)
        ));
        assert!(matches!(
            SubmitOutcome::classify(StatusCode::BAD_REQUEST, "bad".into()),
            SubmitOutcome::Malformed(_)
        ));
        assert!(matches!(
            SubmitOutcome::classify(StatusCode::UNAUTHORIZED, String::new()),
            SubmitOutcome::OtherError(_)
        ));
        assert!(matches!(
            SubmitOutcome::classify(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            SubmitOutcome::OtherError(_)
        ));
    }

    #[test]
    fn response_info_display() {
        let info = ResponseInfo::from_response(StatusCode::BAD_REQUEST, "invalid id".into());
        assert_eq!(info.to_string(), "HTTP 400 Bad Request: invalid id");
        assert_eq!(ResponseInfo::local("connection refused").to_string(), "connection refused");
    }
}
