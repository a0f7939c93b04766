use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    u2f::{
        error::Error,
        proto::web_message::{RegisteredKey, U2fRequest, U2fRequestType, U2fSignRequest},
    },
    websafe,
};

pub mod ceremony;
pub mod client_data;
pub mod config;
pub mod counter;
pub mod response;
pub mod signed_data;
pub mod store;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_utils;

pub use ceremony::{CeremonyOutcome, CeremonyState, CounterUpdate, LoginCeremony};
pub use config::LoginConfig;
pub use response::{HasChallenge, LoginResponse};
pub use store::{ChallengeStore, CredentialStore, MemoryChallengeStore, MemoryCredentialStore, RegisteredCredential, StoreError};

static REQUESTS_IDS: AtomicU64 = AtomicU64::new(0);

/// Builds the javascript API sign request sent to the browser.
pub struct U2fRequestBuilder {
    app_id: Option<String>,
    challenge: Option<String>,
    timeout: Option<u64>,
    registered_keys: Vec<RegisteredKey>,
}

impl U2fRequestBuilder {
    pub fn sign() -> Self {
        U2fRequestBuilder {
            app_id: None,
            challenge: None,
            timeout: None,
            registered_keys: Vec::new(),
        }
    }

    pub fn app_id(mut self, app_id: String) -> Self {
        self.app_id = Some(app_id);
        self
    }

    pub fn challenge(mut self, challenge: &[u8]) -> Self {
        self.challenge = Some(websafe::encode(challenge));
        self
    }

    pub fn timeout_sec(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registered_keys(mut self, regk: Vec<RegisteredKey>) -> Self {
        self.registered_keys.extend(regk);
        self
    }

    pub fn registered_credentials(mut self, credentials: &[RegisteredCredential]) -> Self {
        self.registered_keys.extend(credentials.iter().map(RegisteredCredential::registered_key));
        self
    }

    pub fn build(self) -> Result<U2fRequest, Error> {
        let U2fRequestBuilder {
            app_id,
            challenge,
            timeout,
            registered_keys,
        } = self;

        let challenge = challenge.ok_or_else(|| Error::Other("Unable to build a U2F request without a challenge".to_string()))?;

        if registered_keys.is_empty() {
            return Err(Error::Other(
                "Unable to build a U2F Sign request without at least one registered key".to_string(),
            ));
        }

        Ok(U2fRequest {
            req_type: U2fRequestType::Sign,
            app_id,
            timeout_seconds: timeout,
            request_id: Some(REQUESTS_IDS.fetch_add(1, Ordering::Relaxed)),
            data: U2fSignRequest {
                challenge,
                registered_keys,
            },
        })
    }
}
