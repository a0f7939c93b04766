use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use ring::rand::{SecureRandom, SystemRandom};
use time::{Duration, OffsetDateTime};

use crate::u2f::{
    error::Error,
    proto::{
        constants::{U2F_CHAL_SIZE, U2F_V2_VERSION_STR},
        web_message::RegisteredKey,
    },
};
use crate::websafe;

/// Credential registered for a user, as kept by the relying party.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredCredential {
    pub key_handle: Vec<u8>,
    /// Uncompressed P-256 point
    pub public_key: Vec<u8>,
    /// Last accepted counter, 0 when the credential was never used
    pub counter: u32,
}

impl RegisteredCredential {
    pub fn new(key_handle: Vec<u8>, public_key: Vec<u8>) -> Self {
        RegisteredCredential {
            key_handle,
            public_key,
            counter: 0,
        }
    }

    pub fn with_counter(mut self, counter: u32) -> Self {
        self.counter = counter;
        self
    }

    pub fn registered_key(&self) -> RegisteredKey {
        RegisteredKey {
            version: U2F_V2_VERSION_STR.to_string(),
            key_handle: websafe::encode(&self.key_handle),
            transports: None,
            app_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    /// The stored counter already reached or passed the requested value.
    Conflict,
}

impl std::error::Error for StoreError {}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            StoreError::NotFound => write!(f, "Credential not found"),
            StoreError::Conflict => write!(f, "Counter was already advanced"),
        }
    }
}

/// Storage of registered credentials.
///
/// `advance_counter` must compare and update atomically for a given key handle: it succeeds only when
/// `new_counter` is strictly greater than the stored counter.
pub trait CredentialStore {
    fn lookup(&self, key_handle: &[u8]) -> Option<RegisteredCredential>;
    fn advance_counter(&self, key_handle: &[u8], new_counter: u32) -> Result<(), StoreError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn lookup(&self, key_handle: &[u8]) -> Option<RegisteredCredential> {
        (**self).lookup(key_handle)
    }

    fn advance_counter(&self, key_handle: &[u8], new_counter: u32) -> Result<(), StoreError> {
        (**self).advance_counter(key_handle, new_counter)
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn lookup(&self, key_handle: &[u8]) -> Option<RegisteredCredential> {
        (**self).lookup(key_handle)
    }

    fn advance_counter(&self, key_handle: &[u8], new_counter: u32) -> Result<(), StoreError> {
        (**self).advance_counter(key_handle, new_counter)
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<HashMap<Vec<u8>, RegisteredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, credential: RegisteredCredential) {
        let mut credentials = self.credentials.write().unwrap_or_else(PoisonError::into_inner);
        credentials.insert(credential.key_handle.clone(), credential);
    }

    pub fn len(&self) -> usize {
        self.credentials.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn lookup(&self, key_handle: &[u8]) -> Option<RegisteredCredential> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key_handle)
            .cloned()
    }

    fn advance_counter(&self, key_handle: &[u8], new_counter: u32) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write().unwrap_or_else(PoisonError::into_inner);
        let credential = credentials.get_mut(key_handle).ok_or(StoreError::NotFound)?;

        if new_counter <= credential.counter {
            return Err(StoreError::Conflict);
        }

        credential.counter = new_counter;
        Ok(())
    }
}

/// One-time challenges keyed by session.
pub trait ChallengeStore {
    /// Removes the challenge, a challenge can be read at most once.
    fn take(&self, session: &str) -> Option<Vec<u8>>;
}

pub const DEFAULT_CHALLENGE_TTL_SECONDS: i64 = 300;

pub struct MemoryChallengeStore {
    ttl: Duration,
    rng: SystemRandom,
    challenges: Mutex<HashMap<String, (Vec<u8>, OffsetDateTime)>>,
}

impl Default for MemoryChallengeStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_CHALLENGE_TTL_SECONDS))
    }
}

impl MemoryChallengeStore {
    pub fn new(ttl: Duration) -> Self {
        MemoryChallengeStore {
            ttl,
            rng: SystemRandom::new(),
            challenges: Mutex::new(HashMap::new()),
        }
    }

    /// Generates a fresh random challenge for the session, replacing any pending one.
    ///
    /// Challenges expired at `now` are evicted first, so unanswered sessions do not accumulate.
    pub fn issue(&self, session: &str) -> Result<Vec<u8>, Error> {
        self.issue_at(session, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, session: &str, now: OffsetDateTime) -> Result<Vec<u8>, Error> {
        let mut challenge = vec![0u8; U2F_CHAL_SIZE];
        self.rng.fill(&mut challenge)?;

        let mut challenges = self.challenges.lock().unwrap_or_else(PoisonError::into_inner);
        challenges.retain(|_, (_, expires_at)| now < *expires_at);
        challenges.insert(session.to_string(), (challenge.clone(), now + self.ttl));

        Ok(challenge)
    }

    pub fn take_at(&self, session: &str, now: OffsetDateTime) -> Option<Vec<u8>> {
        let mut challenges = self.challenges.lock().unwrap_or_else(PoisonError::into_inner);
        let (challenge, expires_at) = challenges.remove(session)?;

        if now >= expires_at {
            tracing::debug!(session, "Challenge expired");
            return None;
        }

        Some(challenge)
    }

    /// Number of challenges held, expired ones included until evicted.
    pub fn pending(&self) -> usize {
        self.challenges.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drops every expired challenge, returns how many were removed.
    pub fn purge_expired(&self, now: OffsetDateTime) -> usize {
        let mut challenges = self.challenges.lock().unwrap_or_else(PoisonError::into_inner);
        let before = challenges.len();
        challenges.retain(|_, (_, expires_at)| now < *expires_at);
        before - challenges.len()
    }
}

impl ChallengeStore for MemoryChallengeStore {
    fn take(&self, session: &str) -> Option<Vec<u8>> {
        self.take_at(session, OffsetDateTime::now_utc())
    }
}
