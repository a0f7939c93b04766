use ring::{
    rand::SystemRandom,
    signature::{self, EcdsaKeyPair, KeyPair},
};

use crate::{
    u2f::{
        proto::{
            constants::{U2F_AUTH_FLAG_TUP, U2F_CLIENT_DATA_TYPE_SIGN},
            raw_message::AuthenticateResponse,
            web_message::{ClientData, U2fSignResponse},
        },
        server::{response::LoginResponse, signed_data::SignedData, store::RegisteredCredential},
    },
    websafe,
};

/// Software token holding a single P-256 key pair.
pub(crate) struct TestToken {
    key_pair: EcdsaKeyPair,
    key_handle: Vec<u8>,
    rng: SystemRandom,
}

impl TestToken {
    pub(crate) fn new() -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&signature::ECDSA_P256_SHA256_ASN1_SIGNING, &rng).expect("key generation");
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&signature::ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref(), &rng).expect("valid pkcs8");
        let key_handle = key_pair.public_key().as_ref()[1..17].to_vec();

        TestToken { key_pair, key_handle, rng }
    }

    pub(crate) fn public_key(&self) -> &[u8] {
        self.key_pair.public_key().as_ref()
    }

    pub(crate) fn key_handle(&self) -> &[u8] {
        &self.key_handle
    }

    pub(crate) fn credential(&self, counter: u32) -> RegisteredCredential {
        RegisteredCredential::new(self.key_handle.clone(), self.public_key().to_vec()).with_counter(counter)
    }

    pub(crate) fn client_data(typ: &str, challenge: &[u8], origin: &str) -> Vec<u8> {
        let client_data = ClientData {
            typ: typ.to_string(),
            challenge: websafe::encode(challenge),
            origin: origin.to_string(),
            cid_pubkey: None,
        };

        serde_json::to_vec(&client_data).expect("serializable client data")
    }

    pub(crate) fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.key_pair.sign(&self.rng, data).expect("signature").as_ref().to_vec()
    }

    /// Builds a response whose signature covers exactly the data the server reconstructs.
    pub(crate) fn respond(&self, app_id: &str, client_data: Vec<u8>, challenge: &[u8], counter: u32) -> LoginResponse {
        let unsigned = LoginResponse::new(counter, self.key_handle.clone(), Vec::new(), client_data.clone(), challenge.to_vec());
        let signature = self.sign(SignedData::build(app_id.as_bytes(), &unsigned).as_bytes());

        LoginResponse::new(counter, self.key_handle.clone(), signature, client_data, challenge.to_vec())
    }

    pub(crate) fn login_response(&self, app_id: &str, challenge: &[u8], origin: &str, counter: u32) -> LoginResponse {
        self.respond(app_id, Self::client_data(U2F_CLIENT_DATA_TYPE_SIGN, challenge, origin), challenge, counter)
    }

    pub(crate) fn sign_response(&self, app_id: &str, challenge: &[u8], origin: &str, counter: u32) -> U2fSignResponse {
        let rsp = self.login_response(app_id, challenge, origin, counter);
        let raw = AuthenticateResponse {
            user_presence: U2F_AUTH_FLAG_TUP,
            counter,
            signature: rsp.signature().to_vec(),
        };

        U2fSignResponse {
            key_handle: websafe::encode(rsp.key_handle()),
            signature_data: websafe::encode(raw.to_bytes().expect("encodable")),
            client_data: websafe::encode(rsp.client_data()),
        }
    }
}
