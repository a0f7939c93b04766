use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
    io::Error as IoError,
};

use base64::DecodeError;
use serde_json::Error as JsonError;

/// Errors raised while decoding U2F messages or configuration.
///
/// These never describe the outcome of a login ceremony, see [`ErrorKind`] for that.
#[derive(Debug)]
pub enum Error {
    IoError(IoError),
    Base64Error(DecodeError),
    JsonError(JsonError),
    U2FErrorCode(u16),
    MalformedApdu,
    UserPresence,
    Other(String),
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::IoError(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Base64Error(e)
    }
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Self {
        Error::JsonError(e)
    }
}

impl From<u16> for Error {
    fn from(sw: u16) -> Self {
        Error::U2FErrorCode(sw)
    }
}

#[cfg(feature = "u2f-server")]
impl From<ring::error::Unspecified> for Error {
    fn from(_: ring::error::Unspecified) -> Self {
        Error::Other("Unspecified".to_string())
    }
}

impl StdError for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        use Error::*;
        match self {
            IoError(io_e) => io_e.fmt(f),
            Base64Error(e) => e.fmt(f),
            JsonError(js_e) => js_e.fmt(f),
            U2FErrorCode(sw) => write!(f, "U2F status word {:#06x}", sw),
            MalformedApdu => write!(f, "Malformed U2F message"),
            UserPresence => write!(f, "User presence was not asserted"),
            Other(s) => write!(f, "{}", s),
        }
    }
}

/// Terminal outcome of a rejected login ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedClientData,
    UnexpectedCeremonyType,
    OriginMismatch,
    ChallengeMismatch,
    InvalidSignature,
    CounterReplay,
    UnknownCredential,
}

impl ErrorKind {
    /// Rejections that point to a forged or cloned authenticator rather than a user or client mistake.
    pub fn is_security_event(&self) -> bool {
        matches!(self, ErrorKind::InvalidSignature | ErrorKind::CounterReplay)
    }
}

impl StdError for ErrorKind {}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        use ErrorKind::*;
        match self {
            MalformedClientData => write!(f, "Client data is malformed"),
            UnexpectedCeremonyType => write!(f, "Client data is not an assertion"),
            OriginMismatch => write!(f, "Client data origin is not accepted"),
            ChallengeMismatch => write!(f, "Client data challenge does not match the issued challenge"),
            InvalidSignature => write!(f, "Signature verification failed"),
            CounterReplay => write!(f, "Counter did not increase, the authenticator may be cloned"),
            UnknownCredential => write!(f, "No credential is registered for this key handle"),
        }
    }
}

#[test]
fn test_security_events() {
    assert!(ErrorKind::InvalidSignature.is_security_event());
    assert!(ErrorKind::CounterReplay.is_security_event());
    assert!(!ErrorKind::OriginMismatch.is_security_event());
    assert!(!ErrorKind::MalformedClientData.is_security_event());
    assert!(!ErrorKind::UnknownCredential.is_security_event());
}

#[test]
fn test_status_word_display() {
    let e: Error = 0x6985u16.into();
    assert_eq!(e.to_string(), "U2F status word 0x6985");
}
