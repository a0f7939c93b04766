//! # U2F login
//!
//! Verification of FIDO U2F authentication (sign) responses: client data
//! validation, signed data reconstruction, ECDSA verification and counter
//! based replay protection.

/// Websafe base64 engines used by the U2F JavaScript API messages
#[cfg(feature = "auth-base")]
pub mod websafe;

#[cfg(feature = "u2f")]
pub mod u2f;
