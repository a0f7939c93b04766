use crate::u2f::{
    error::{Error, ErrorKind},
    proto::web_message::U2fSignResponse,
    server::{
        client_data::ClientDataParser,
        config::LoginConfig,
        counter::CounterGuard,
        response::{HasChallenge, LoginResponse},
        signed_data::SignedData,
        store::{ChallengeStore, CredentialStore, RegisteredCredential, StoreError},
        verifier::SignatureVerifier,
    },
};

/// Steps of a login ceremony, in the only order they can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyState {
    Received,
    ClientDataValidated,
    ChallengeMatched,
    SignatureVerified,
    CounterAccepted,
    Complete,
    Rejected(ErrorKind),
}

impl CeremonyState {
    fn next(&self) -> Option<CeremonyState> {
        use CeremonyState::*;
        match self {
            Received => Some(ClientDataValidated),
            ClientDataValidated => Some(ChallengeMatched),
            ChallengeMatched => Some(SignatureVerified),
            SignatureVerified => Some(CounterAccepted),
            CounterAccepted => Some(Complete),
            Complete | Rejected(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CeremonyState::Complete | CeremonyState::Rejected(_))
    }
}

/// Instruction for the credential store once a ceremony completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterUpdate {
    pub key_handle: Vec<u8>,
    pub previous_counter: u32,
    pub new_counter: u32,
}

#[derive(Clone, Debug)]
pub struct CeremonyOutcome {
    trail: Vec<CeremonyState>,
    result: Result<CounterUpdate, ErrorKind>,
}

impl CeremonyOutcome {
    pub fn state(&self) -> CeremonyState {
        match self.result {
            Ok(_) => CeremonyState::Complete,
            Err(kind) => CeremonyState::Rejected(kind),
        }
    }

    /// Every state the ceremony went through, from `Received` to the terminal one.
    pub fn trail(&self) -> &[CeremonyState] {
        &self.trail
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.result.as_ref().err().copied()
    }

    pub fn update(&self) -> Option<&CounterUpdate> {
        self.result.as_ref().ok()
    }

    pub fn into_result(self) -> Result<CounterUpdate, ErrorKind> {
        self.result
    }
}

struct Run<'a> {
    key_handle: &'a [u8],
    trail: Vec<CeremonyState>,
}

impl<'a> Run<'a> {
    fn new(key_handle: &'a [u8]) -> Self {
        Run {
            key_handle,
            trail: vec![CeremonyState::Received],
        }
    }

    fn current(&self) -> CeremonyState {
        self.trail.last().copied().unwrap_or(CeremonyState::Received)
    }

    fn advance(&mut self, to: CeremonyState) {
        debug_assert_eq!(self.current().next(), Some(to));
        tracing::debug!(key_handle = %hex::encode(self.key_handle), state = ?to, "Login ceremony advanced");
        self.trail.push(to);
    }

    fn reject(mut self, kind: ErrorKind) -> CeremonyOutcome {
        let from = self.current();

        if kind.is_security_event() {
            tracing::warn!(key_handle = %hex::encode(self.key_handle), from = ?from, "Login rejected, possible compromised authenticator: {kind}");
        } else {
            tracing::info!(key_handle = %hex::encode(self.key_handle), from = ?from, "Login rejected: {kind}");
        }

        self.trail.push(CeremonyState::Rejected(kind));
        CeremonyOutcome {
            trail: self.trail,
            result: Err(kind),
        }
    }

    fn complete(mut self, update: CounterUpdate) -> CeremonyOutcome {
        self.advance(CeremonyState::Complete);
        tracing::info!(key_handle = %hex::encode(self.key_handle), counter = update.new_counter, "Login accepted");
        CeremonyOutcome {
            trail: self.trail,
            result: Ok(update),
        }
    }
}

/// Acceptance or rejection of U2F login responses for a single app id.
///
/// The credential store is only used by [`LoginCeremony::authenticate`], [`LoginCeremony::verify`] never persists anything.
pub struct LoginCeremony<S> {
    config: LoginConfig,
    store: S,
}

impl<S> LoginCeremony<S> {
    pub fn new(config: LoginConfig, store: S) -> Self {
        LoginCeremony { config, store }
    }

    pub fn config(&self) -> &LoginConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs every step against an already looked up credential and returns the counter update on success.
    pub fn verify(&self, response: &LoginResponse, credential: &RegisteredCredential) -> CeremonyOutcome {
        self.run(response, credential, |_| Ok(()))
    }

    fn run<F>(&self, response: &LoginResponse, credential: &RegisteredCredential, commit: F) -> CeremonyOutcome
    where
        F: FnOnce(&CounterUpdate) -> Result<(), ErrorKind>,
    {
        let mut run = Run::new(response.key_handle());

        if credential.key_handle != response.key_handle() {
            return run.reject(ErrorKind::UnknownCredential);
        }

        let client_data = match ClientDataParser::new(&self.config).parse(response.client_data()) {
            Ok(client_data) => client_data,
            Err(kind) => return run.reject(kind),
        };
        run.advance(CeremonyState::ClientDataValidated);

        if client_data.challenge.as_slice() != response.challenge() {
            return run.reject(ErrorKind::ChallengeMismatch);
        }
        run.advance(CeremonyState::ChallengeMatched);

        let signed_data = SignedData::build(self.config.app_id().as_bytes(), response);
        if let Err(kind) = SignatureVerifier::verify(&signed_data, response.signature(), &credential.public_key) {
            return run.reject(kind);
        }
        run.advance(CeremonyState::SignatureVerified);

        let new_counter = match CounterGuard::check(response.counter(), credential.counter) {
            Ok(counter) => counter,
            Err(kind) => return run.reject(kind),
        };
        run.advance(CeremonyState::CounterAccepted);

        let update = CounterUpdate {
            key_handle: credential.key_handle.clone(),
            previous_counter: credential.counter,
            new_counter,
        };

        if let Err(kind) = commit(&update) {
            return run.reject(kind);
        }

        run.complete(update)
    }
}

impl<S: CredentialStore> LoginCeremony<S> {
    /// Looks the credential up, verifies the response and advances the stored counter.
    ///
    /// A concurrent ceremony that advanced the counter first is reported as a replay.
    pub fn authenticate(&self, response: &LoginResponse) -> CeremonyOutcome {
        let credential = match self.store.lookup(response.key_handle()) {
            Some(credential) => credential,
            None => return Run::new(response.key_handle()).reject(ErrorKind::UnknownCredential),
        };

        self.run(response, &credential, |update| {
            self.store
                .advance_counter(&update.key_handle, update.new_counter)
                .map_err(|e| match e {
                    StoreError::NotFound => ErrorKind::UnknownCredential,
                    StoreError::Conflict => ErrorKind::CounterReplay,
                })
        })
    }

    /// Full server side handling of a javascript API sign response.
    ///
    /// The challenge issued for `session` is consumed; when none is pending the ceremony is rejected
    /// with `ChallengeMismatch`. Errors are returned only when the response itself cannot be decoded.
    pub fn authenticate_sign_response<C: ChallengeStore + ?Sized>(
        &self,
        challenges: &C,
        session: &str,
        rsp: &U2fSignResponse,
    ) -> Result<CeremonyOutcome, Error> {
        let challenge = challenges.take(session);
        let pending = challenge.is_some();
        let response = LoginResponse::from_sign_response(rsp, challenge.unwrap_or_default())?;

        if !pending {
            tracing::debug!(session, "No pending challenge for session");
            return Ok(Run::new(response.key_handle()).reject(ErrorKind::ChallengeMismatch));
        }

        Ok(self.authenticate(&response))
    }
}
