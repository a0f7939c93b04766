use ring::signature::{self, UnparsedPublicKey};

use crate::u2f::{
    error::ErrorKind,
    proto::constants::{U2F_EC_POINT_SIZE, U2F_MAX_EC_SIG_SIZE, U2F_POINT_UNCOMPRESSED},
    server::signed_data::SignedData,
};

/// ECDSA P-256 / SHA-256 verification of DER encoded token signatures.
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// `public_key` is the uncompressed EC point returned by the token at registration.
    pub fn verify(signed_data: &SignedData, signature: &[u8], public_key: &[u8]) -> Result<(), ErrorKind> {
        if public_key.len() != U2F_EC_POINT_SIZE || public_key[0] != U2F_POINT_UNCOMPRESSED {
            tracing::debug!(len = public_key.len(), "Public key is not an uncompressed P-256 point");
            return Err(ErrorKind::InvalidSignature);
        }

        if signature.is_empty() || signature.len() > U2F_MAX_EC_SIG_SIZE {
            return Err(ErrorKind::InvalidSignature);
        }

        let public_key = UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_ASN1, public_key);

        public_key
            .verify(signed_data.as_bytes(), signature)
            .map_err(|_| ErrorKind::InvalidSignature)
    }

    pub fn is_valid(signed_data: &SignedData, signature: &[u8], public_key: &[u8]) -> bool {
        Self::verify(signed_data, signature, public_key).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::u2f::server::test_utils::TestToken;

    const APP_ID: &str = "example.com";

    #[test]
    fn test_valid_signature() {
        let token = TestToken::new();
        let rsp = token.login_response(APP_ID, b"challenge", "https://example.com", 1);

        assert!(SignatureVerifier::is_valid(&rsp.signed_data(APP_ID.as_bytes()), rsp.signature(), token.public_key()));
    }

    #[test]
    fn test_any_mutated_byte_is_rejected() {
        let token = TestToken::new();
        let rsp = token.login_response(APP_ID, b"challenge", "https://example.com", 9);
        let signed = rsp.signed_data(APP_ID.as_bytes()).into_vec();

        // app id hash, presence flag, counter, client data hash
        for index in [0, 31, 32, 33, 36, 37, 68] {
            let mut mutated = signed.clone();
            mutated[index] ^= 0x01;

            let signed_data = SignedData::from_raw(mutated);
            assert_eq!(
                SignatureVerifier::verify(&signed_data, rsp.signature(), token.public_key()),
                Err(ErrorKind::InvalidSignature),
                "byte {} was mutated",
                index
            );
        }
    }

    #[test]
    fn test_wrong_key() {
        let token = TestToken::new();
        let other = TestToken::new();
        let rsp = token.login_response(APP_ID, b"challenge", "https://example.com", 1);

        assert!(!SignatureVerifier::is_valid(&rsp.signed_data(APP_ID.as_bytes()), rsp.signature(), other.public_key()));
    }

    #[test]
    fn test_malformed_inputs() {
        let token = TestToken::new();
        let rsp = token.login_response(APP_ID, b"challenge", "https://example.com", 1);
        let signed = rsp.signed_data(APP_ID.as_bytes());

        let mut compressed = token.public_key().to_vec();
        compressed[0] = 0x02;
        assert!(!SignatureVerifier::is_valid(&signed, rsp.signature(), &compressed));
        assert!(!SignatureVerifier::is_valid(&signed, rsp.signature(), &[]));
        assert!(!SignatureVerifier::is_valid(&signed, &[], token.public_key()));
        assert!(!SignatureVerifier::is_valid(&signed, &rsp.signature()[1..], token.public_key()));
    }
}
