//! Error types for parsekit-fetch.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! error_codes {
    ($($(#[$meta:meta])* $name:ident = $value:literal,)*) => {
        /// Backend error code.
        ///
        /// Codes the backend documents are named; anything else is carried
        /// verbatim in [`ErrorCode::Other`]. Serialises as the bare integer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "i64", into = "i64")]
        pub enum ErrorCode {
            $($(#[$meta])* $name,)*
            /// A code this SDK does not enumerate.
            Other(i64),
        }

        impl From<i64> for ErrorCode {
            fn from(value: i64) -> Self {
                match value {
                    $($value => ErrorCode::$name,)*
                    other => ErrorCode::Other(other),
                }
            }
        }

        impl From<ErrorCode> for i64 {
            fn from(code: ErrorCode) -> Self {
                match code {
                    $(ErrorCode::$name => $value,)*
                    ErrorCode::Other(other) => other,
                }
            }
        }
    };
}

error_codes! {
    /// Local sentinel: no structured error was available.
    Unknown = -1,
    InternalServer = 1,
    ConnectionFailed = 100,
    ObjectNotFound = 101,
    InvalidQuery = 102,
    InvalidClassName = 103,
    MissingObjectId = 104,
    InvalidKeyName = 105,
    InvalidPointer = 106,
    InvalidJson = 107,
    CommandUnavailable = 108,
    NotInitialized = 109,
    IncorrectType = 111,
    InvalidChannelName = 112,
    PushMisconfigured = 115,
    ObjectTooLarge = 116,
    OperationForbidden = 119,
    CacheMiss = 120,
    InvalidNestedKey = 121,
    InvalidFileName = 122,
    InvalidAcl = 123,
    Timeout = 124,
    InvalidEmailAddress = 125,
    MissingContentType = 126,
    MissingContentLength = 127,
    InvalidContentLength = 128,
    FileTooLarge = 129,
    FileSaveError = 130,
    DuplicateValue = 137,
    InvalidRoleName = 139,
    ExceededQuota = 140,
    ScriptFailed = 141,
    ValidationFailed = 142,
    FileDeleteFailure = 153,
    RequestLimitExceeded = 155,
    InvalidEventName = 160,
    UsernameMissing = 200,
    PasswordMissing = 201,
    UsernameTaken = 202,
    EmailTaken = 203,
    EmailMissing = 204,
    EmailNotFound = 205,
    SessionMissing = 206,
    MustCreateUserThroughSignup = 207,
    AccountAlreadyLinked = 208,
    InvalidSessionToken = 209,
    LinkedIdMissing = 250,
    InvalidLinkedSession = 251,
    UnsupportedService = 252,
}

impl ErrorCode {
    pub fn value(self) -> i64 {
        self.into()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A backend error: numeric code plus human-readable message.
///
/// Deserialises from the backend's error payload, `{"code": 101, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,

    #[serde(rename = "error")]
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The response body was a structured backend error.
    #[error("{0}")]
    Backend(ErrorInfo),

    /// The caller's decode function failed and the body was not a backend error.
    #[error("error decoding response: {0}")]
    Decode(String),

    /// The network primitive failed or returned nothing usable.
    #[error("unable to reach endpoint: {0}")]
    Transport(String),

    /// A precondition was violated before any network attempt.
    #[error("{0}")]
    InvalidInput(&'static str),
}

impl Error {
    /// Backend code, or [`ErrorCode::Unknown`] for locally synthesised failures.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Backend(info) => info.code,
            Error::Decode(_) | Error::Transport(_) | Error::InvalidInput(_) => ErrorCode::Unknown,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo::new(self.code(), self.message())
    }
}

impl From<ErrorInfo> for Error {
    fn from(info: ErrorInfo) -> Self {
        Error::Backend(info)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
