use std::error::Error as StdError;
use std::fmt;
use std::path::Path;

use crate::data::ResponseMeta;
use crate::error::{Error, ErrorInfo, Result};

/// Turn the raw outcome of a fetch or upload into a typed result.
///
/// In priority order:
/// 1. A body is present: `decode` it. If that fails, the body is tried as a
///    backend error payload; if that fails too, the decode failure is reported.
/// 2. A transport error is present: report it.
/// 3. Otherwise report the response metadata (or its absence).
///
/// `decode` is invoked at most once, and only when a body is present.
///
/// # Examples
///
/// ```
/// use parsekit_fetch::{ErrorCode, Error, decode, resolve_bytes};
///
/// let body = br#"{"code":101,"error":"object not found."}"#;
/// let outcome = resolve_bytes(Some(body), None, None, decode::json::<Vec<u8>>);
/// match outcome {
///     Err(Error::Backend(info)) => assert_eq!(info.code, ErrorCode::ObjectNotFound),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
pub fn resolve_bytes<T, D, E>(
    body: Option<&[u8]>,
    response: Option<&ResponseMeta>,
    transport_error: Option<&(dyn StdError + 'static)>,
    decode: D,
) -> Result<T>
where
    D: FnOnce(&[u8]) -> std::result::Result<T, E>,
    E: fmt::Display,
{
    if let Some(body) = body {
        return decode(body).map_err(|e| match backend_error(body) {
            Some(info) => Error::Backend(info),
            None => Error::Decode(e.to_string()),
        });
    }

    if let Some(error) = transport_error {
        return Err(Error::Transport(error_chain(error)));
    }

    Err(Error::Transport(match response {
        Some(meta) => meta.to_string(),
        None => "no response".to_string(),
    }))
}

/// Download counterpart of [`resolve_bytes`].
///
/// The location itself, serialised as a JSON string, is what `decode`
/// receives; the file is not read. A location that cannot be serialised
/// (a non-UTF-8 path) is reported as a decode failure.
pub fn resolve_location<T, D, E>(
    location: Option<&Path>,
    response: Option<&ResponseMeta>,
    transport_error: Option<&(dyn StdError + 'static)>,
    decode: D,
) -> Result<T>
where
    D: FnOnce(&[u8]) -> std::result::Result<T, E>,
    E: fmt::Display,
{
    match location {
        Some(location) => {
            let encoded = serde_json::to_vec(location).map_err(|e| Error::Decode(e.to_string()))?;
            resolve_bytes(Some(&encoded), response, transport_error, decode)
        }
        None => resolve_bytes(None, response, transport_error, decode),
    }
}

fn backend_error(body: &[u8]) -> Option<ErrorInfo> {
    let mut info: ErrorInfo = serde_json::from_slice(body).ok()?;
    if info.message.trim().is_empty() {
        info.message = format!("backend error {}", info.code);
    }
    Some(info)
}

/// `error: source: source...`, skipping sources already contained in their parent's message.
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    if message.trim().is_empty() {
        message = format!("{error:?}");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decode;
    use crate::error::ErrorCode;
    use serde::Deserialize;
    use std::cell::Cell;
    use std::io;
    use std::path::PathBuf;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct SaveResponse {
        object_id: String,
        created_at: String,
    }

    #[test]
    fn test_success_never_consults_fallback() {
        let calls = Cell::new(0);
        let outcome = resolve_bytes(Some(br#"{"code":101,"error":"x"}"#), None, None, |bytes: &[u8]| {
            calls.set(calls.get() + 1);
            Ok::<_, String>(bytes.len())
        });
        assert_eq!(outcome.unwrap(), 24);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_body_takes_precedence_over_transport_error() {
        let err = io::Error::other("connection reset");
        let outcome = resolve_bytes(Some(b"42"), None, Some(&err), decode::json::<u32>);
        assert_eq!(outcome.unwrap(), 42);
    }

    #[test]
    fn test_decode_failure_without_backend_error() {
        let outcome = resolve_bytes(Some(b"<html>bad gateway</html>"), None, None, decode::json::<SaveResponse>);
        let err = outcome.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unknown);
        assert!(err.message().starts_with("error decoding response: "));
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_failure_detail_is_kept() {
        let outcome = resolve_bytes(Some(b"{}"), None, None, |_: &[u8]| Err::<(), _>("custom detail"));
        assert_eq!(outcome.unwrap_err(), Error::Decode("custom detail".into()));
    }

    #[test]
    fn test_backend_error_fallback() {
        let outcome = resolve_bytes(
            Some(br#"{"code":101,"error":"object not found."}"#),
            Some(&ResponseMeta::new(404, "https://example.com/classes/GameScore/x")),
            None,
            decode::json::<SaveResponse>,
        );
        let err = outcome.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ObjectNotFound);
        assert_eq!(err.message(), "object not found.");
    }

    #[test]
    fn test_backend_error_with_empty_message_gets_one() {
        let outcome = resolve_bytes(Some(br#"{"code":209,"error":""}"#), None, None, decode::json::<SaveResponse>);
        let err = outcome.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSessionToken);
        assert_eq!(err.message(), "backend error 209");
    }

    #[test]
    fn test_transport_error_without_body() {
        let err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let outcome = resolve_bytes(None, None, Some(&err), decode::json::<SaveResponse>);
        let err = outcome.unwrap_err();
        assert_eq!(err, Error::Transport("connection refused".into()));
        assert_eq!(err.message(), "unable to reach endpoint: connection refused");
    }

    #[test]
    fn test_transport_error_includes_sources() {
        #[derive(Debug)]
        struct Outer(io::Error);
        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("error sending request")
            }
        }
        impl StdError for Outer {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let err = Outer(io::Error::other("tls handshake eof"));
        let message = resolve_bytes(None, None, Some(&err), decode::ignore).unwrap_err().message();
        assert_eq!(message, "unable to reach endpoint: error sending request: tls handshake eof");
    }

    #[test]
    fn test_nothing_present_describes_response() {
        let outcome = resolve_bytes(None, Some(&ResponseMeta::new(502, "https://example.com")), None, decode::ignore);
        assert_eq!(
            outcome.unwrap_err().message(),
            "unable to reach endpoint: HTTP 502 from https://example.com"
        );

        let outcome = resolve_bytes(None, None, None, decode::ignore);
        assert_eq!(outcome.unwrap_err().message(), "unable to reach endpoint: no response");
    }

    #[test]
    fn test_decode_not_invoked_without_body() {
        let calls = Cell::new(0);
        let _ = resolve_bytes(None, None, None, |_: &[u8]| {
            calls.set(calls.get() + 1);
            Ok::<_, String>(())
        });
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_save_response_scenario() {
        let body = br#"{"objectId":"abc123","createdAt":"2020-01-01T00:00:00Z"}"#;
        let saved = resolve_bytes(Some(body), None, None, decode::json::<SaveResponse>).unwrap();
        assert_eq!(saved.object_id, "abc123");
        assert_eq!(saved.created_at, "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_location_is_serialized_before_decoding() {
        let location = PathBuf::from("/tmp/parse-download-7.bin");
        let outcome = resolve_location(Some(location.as_path()), None, None, decode::location);
        assert_eq!(outcome.unwrap(), location);
    }

    #[test]
    fn test_location_decode_failure() {
        let location = PathBuf::from("/tmp/file.bin");
        let outcome = resolve_location(Some(location.as_path()), None, None, decode::json::<SaveResponse>);
        assert!(matches!(outcome.unwrap_err(), Error::Decode(_)));
    }

    #[test]
    fn test_missing_location_falls_back_to_transport_error() {
        let err = io::Error::new(io::ErrorKind::TimedOut, "operation timed out");
        let outcome = resolve_location(None, None, Some(&err), decode::location);
        assert_eq!(outcome.unwrap_err().message(), "unable to reach endpoint: operation timed out");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_location_is_a_decode_failure() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let location = Path::new(OsStr::from_bytes(b"/tmp/\xff\xfe.bin"));
        let outcome = resolve_location(Some(location), None, None, decode::location);
        assert!(matches!(outcome.unwrap_err(), Error::Decode(_)));
    }
}
