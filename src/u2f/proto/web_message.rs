use serde_derive::*;
use serde_repr::*;

use crate::u2f::proto::constants::{U2F_CLIENT_DATA_TYPE_REGISTER, U2F_CLIENT_DATA_TYPE_SIGN};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
/// FIDO U2F Transports
pub enum Transport {
    /// Bluetooth Classic
    #[serde(rename = "bt")]
    Bluetooth,
    /// Bluetooth Low-Energy
    #[serde(rename = "ble")]
    BluetoothLE,
    /// Near field communication
    #[serde(rename = "nfc")]
    Nfc,
    /// Usb removable device
    #[serde(rename = "usb")]
    Usb,
    /// Usb non-removable device
    #[serde(rename = "usb-internal")]
    UsbInternal,
}

///
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredKey {
    /// The version of the protocol that the registered token speaks. E.g. "U2F_V2".
    pub version: String,
    /// The registered keyHandle to use for signing, as a websafe-base64 encoding of the key handle bytes returned by the U2F token during registration.
    pub key_handle: String,
    /// The transport(s) this token supports, if known by the RP.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub transports: Option<Vec<Transport>>,
    /// The application id that the RP would like to assert for this key handle, if it's distinct from the application id for the overall request. (Ordinarily this will be omitted.)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub app_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum U2fRequestType {
    #[serde(rename = "u2f_sign_request")]
    Sign,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum U2fResponseType {
    #[serde(rename = "u2f_sign_response")]
    Sign,
}

///
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct U2fRequest {
    /// The type of request, always Sign ("u2f_sign_request") here.
    #[serde(rename = "type")]
    pub req_type: U2fRequestType,
    /// An application identifier for the request. If none is given, the origin of the calling web page is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub app_id: Option<String>,
    /// A timeout for the FIDO Client's processing, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// An integer identifying this request from concurrent requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub request_id: Option<u64>,
    /// The specific request data
    #[serde(flatten)]
    pub data: U2fSignRequest,
}

///
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct U2fSignRequest {
    /// The websafe-base64-encoded challenge.
    pub challenge: String,
    /// An array of RegisteredKeys representing the U2F tokens registered to this user.
    pub registered_keys: Vec<RegisteredKey>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct U2fResponse {
    /// The type of response, always Sign ("u2f_sign_response") here.
    #[serde(rename = "type")]
    pub rsp_type: U2fResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub request_id: Option<u64>,
    pub response_data: Response,
}

#[derive(Serialize_repr, Deserialize_repr, Clone, Copy, PartialEq, Debug)]
#[repr(u8)]
pub enum ErrorCode {
    Ok = 0,
    OtherError = 1,
    BadRequest = 2,
    ConfigurationUnsupported = 3,
    DeviceIneligible = 4,
    Timeout = 5,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClientError {
    pub error_code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Sign response as returned by the javascript API, every field is websafe-base64 encoded.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct U2fSignResponse {
    pub key_handle: String,
    pub signature_data: String,
    pub client_data: String,
}

///
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum Response {
    Sign(U2fSignResponse),
    Error(ClientError),
}

impl U2fResponse {
    pub fn as_sign_response(&self) -> Option<&U2fSignResponse> {
        match self.response_data {
            Response::Sign(ref sign) => Some(sign),
            _ => None,
        }
    }

    pub fn as_error_response(&self) -> Option<&ClientError> {
        match self.response_data {
            Response::Error(ref e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientDataType {
    Registration,
    Authentication,
}

impl ClientDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientDataType::Registration => U2F_CLIENT_DATA_TYPE_REGISTER,
            ClientDataType::Authentication => U2F_CLIENT_DATA_TYPE_SIGN,
        }
    }

    pub fn parse(typ: &str) -> Option<Self> {
        match typ {
            U2F_CLIENT_DATA_TYPE_REGISTER => Some(ClientDataType::Registration),
            U2F_CLIENT_DATA_TYPE_SIGN => Some(ClientDataType::Authentication),
            _ => None,
        }
    }
}

/// Client data envelope hashed into the challenge parameter.
///
/// `typ` is kept as a raw string so an unexpected ceremony type can be told apart from a malformed envelope.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ClientData {
    pub typ: String,
    pub challenge: String,
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cid_pubkey: Option<serde_json::Value>,
}

#[test]
fn test_sign_response_json() {
    let json = r#"{"type":"u2f_sign_response","requestId":3,"responseData":{"keyHandle":"a2g","signatureData":"AQAAAAE","clientData":"e30"}}"#;
    let rsp: U2fResponse = serde_json::from_str(json).expect("valid response");

    assert_eq!(rsp.request_id, Some(3));
    let sign = rsp.as_sign_response().expect("sign response");
    assert_eq!(sign.key_handle, "a2g");
    assert!(rsp.as_error_response().is_none());
}

#[test]
fn test_error_response_json() {
    let json = r#"{"type":"u2f_sign_response","responseData":{"errorCode":4}}"#;
    let rsp: U2fResponse = serde_json::from_str(json).expect("valid response");

    let error = rsp.as_error_response().expect("error response");
    assert_eq!(error.error_code, ErrorCode::DeviceIneligible);
    assert!(error.error_message.is_none());
}

#[test]
fn test_client_data_type() {
    assert_eq!(ClientDataType::parse("navigator.id.getAssertion"), Some(ClientDataType::Authentication));
    assert_eq!(ClientDataType::Registration.as_str(), "navigator.id.finishEnrollment");
    assert_eq!(ClientDataType::parse("webauthn.get"), None);
}
