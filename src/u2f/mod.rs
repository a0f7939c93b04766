pub mod error;
pub mod proto;

#[cfg(feature = "u2f-server")]
pub mod server;
