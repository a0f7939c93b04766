use sha2::{Digest, Sha256};

use crate::u2f::{
    proto::constants::{U2F_AUTH_FLAG_TUP, U2F_AUTH_SIGNED_DATA_SIZE},
    server::response::LoginResponse,
};

/// Bytes covered by the token signature of an authentication response.
///
/// `SHA-256(app id) | 0x01 | counter (big endian) | SHA-256(client data)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedData(Vec<u8>);

impl SignedData {
    pub fn build(app_id: &[u8], response: &LoginResponse) -> SignedData {
        let mut hasher = Sha256::new();

        hasher.update(app_id);

        let app_id_hash = hasher.finalize_reset();

        hasher.update(response.client_data());

        let challenge_hash = hasher.finalize_reset();

        let mut data = Vec::with_capacity(U2F_AUTH_SIGNED_DATA_SIZE);
        data.extend_from_slice(&app_id_hash);
        data.push(U2F_AUTH_FLAG_TUP);
        data.extend_from_slice(&response.counter().to_be_bytes());
        data.extend_from_slice(&challenge_hash);

        SignedData(data)
    }

    #[cfg(test)]
    pub(crate) fn from_raw(data: Vec<u8>) -> SignedData {
        SignedData(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for SignedData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(counter: u32) -> LoginResponse {
        LoginResponse::new(counter, b"kh".to_vec(), Vec::new(), br#"{"typ":"navigator.id.getAssertion"}"#.to_vec(), Vec::new())
    }

    #[test]
    fn test_layout() {
        let signed = SignedData::build(b"example.com", &response(0x0102_0304));
        let bytes = signed.as_bytes();

        assert_eq!(bytes.len(), U2F_AUTH_SIGNED_DATA_SIZE);
        assert_eq!(&bytes[..32], Sha256::digest(b"example.com").as_slice());
        assert_eq!(bytes[32], 0x01);
        assert_eq!(&bytes[33..37], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[37..], Sha256::digest(br#"{"typ":"navigator.id.getAssertion"}"#).as_slice());
    }

    #[test]
    fn test_known_app_id_hash() {
        let signed = SignedData::build(b"example.com", &response(1));

        assert_eq!(
            hex::encode(&signed.as_bytes()[..32]),
            "a379a6f6eeafb9a55e378c118034e2751e682fab9f2d30ab13d2125586ce1947"
        );
    }

    #[test]
    fn test_deterministic() {
        let rsp = response(6);
        let first = SignedData::build(b"example.com", &rsp);

        for _ in 0..8 {
            assert_eq!(SignedData::build(b"example.com", &rsp), first);
        }
        assert_eq!(rsp.signed_data(b"example.com"), first);
        assert_ne!(SignedData::build(b"example.org", &rsp), first);
        assert_ne!(SignedData::build(b"example.com", &response(7)), first);
    }
}
