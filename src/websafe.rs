use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    DecodeError, Engine,
};

const CONFIG_NO_PAD: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

/// Url safe alphabet, no padding on encode, padding tolerated on decode.
pub const BASE64_URLSAFE_NOPAD: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, CONFIG_NO_PAD);

pub fn encode<T: AsRef<[u8]>>(input: T) -> String {
    BASE64_URLSAFE_NOPAD.encode(input)
}

pub fn decode<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>, DecodeError> {
    BASE64_URLSAFE_NOPAD.decode(input)
}

#[test]
fn test_decode_accepts_padding() {
    let encoded = encode(b"u2f");
    assert_eq!(encoded, "dTJm");
    assert_eq!(decode("dTJmZg==").expect("padded input"), b"u2ff".to_vec());
    assert_eq!(decode("dTJmZg").expect("unpadded input"), b"u2ff".to_vec());
}

#[test]
fn test_decode_rejects_standard_alphabet() {
    assert!(decode("+/+/").is_err());
    assert_eq!(decode("-_-_").expect("url safe"), vec![0xfb, 0xff, 0xbf]);
}
