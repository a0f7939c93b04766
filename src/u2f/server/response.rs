use crate::{
    u2f::{
        error::Error,
        proto::{raw_message::AuthenticateResponse, web_message::U2fSignResponse},
        server::signed_data::SignedData,
    },
    websafe,
};

/// Capability of anything bound to a one-time challenge issued by the server.
pub trait HasChallenge {
    fn challenge(&self) -> &[u8];
}

/// Assertion returned by a token for an already registered credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginResponse {
    counter: u32,
    key_handle: Vec<u8>,
    signature: Vec<u8>,
    client_data: Vec<u8>,
    challenge: Vec<u8>,
}

impl LoginResponse {
    pub fn new(counter: u32, key_handle: Vec<u8>, signature: Vec<u8>, client_data: Vec<u8>, challenge: Vec<u8>) -> Self {
        LoginResponse {
            counter,
            key_handle,
            signature,
            client_data,
            challenge,
        }
    }

    /// Decode a javascript API sign response and bind it to the challenge the server issued for it.
    ///
    /// The token must have asserted user presence, the signed data always carries the presence flag.
    pub fn from_sign_response(rsp: &U2fSignResponse, challenge: Vec<u8>) -> Result<Self, Error> {
        let U2fSignResponse {
            key_handle,
            signature_data,
            client_data,
        } = rsp;

        let key_handle = websafe::decode(key_handle)?;
        let client_data = websafe::decode(client_data)?;
        let raw_u2f_sign = AuthenticateResponse::from_bytes(&websafe::decode(signature_data)?)?;

        if !raw_u2f_sign.is_user_present() {
            return Err(Error::UserPresence);
        }

        Ok(LoginResponse {
            counter: raw_u2f_sign.counter,
            key_handle,
            signature: raw_u2f_sign.signature,
            client_data,
            challenge,
        })
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn key_handle(&self) -> &[u8] {
        &self.key_handle
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn client_data(&self) -> &[u8] {
        &self.client_data
    }

    pub fn signed_data(&self, app_id: &[u8]) -> SignedData {
        SignedData::build(app_id, self)
    }
}

impl HasChallenge for LoginResponse {
    fn challenge(&self) -> &[u8] {
        &self.challenge
    }
}
