pub const U2F_V2_VERSION_STR: &str = "U2F_V2";

// From: FIDO U2F Raw Message Formats v1.2
// Javascript API client data types

pub const U2F_CLIENT_DATA_TYPE_REGISTER: &str = "navigator.id.finishEnrollment";
pub const U2F_CLIENT_DATA_TYPE_SIGN: &str = "navigator.id.getAssertion";

// General constants

pub const U2F_EC_KEY_SIZE: usize = 32; // EC key size in bytes
pub const U2F_EC_POINT_SIZE: usize = (U2F_EC_KEY_SIZE * 2) + 1; // Size of EC point
pub const U2F_MAX_KH_SIZE: usize = 255; // Max size of key handle, length is a single byte on the wire
pub const U2F_MAX_EC_SIG_SIZE: usize = 72; // Max size of DER coded EC signature
pub const U2F_CTR_SIZE: usize = 4; // Size of counter field
pub const U2F_APPID_SIZE: usize = 32; // Size of application id
pub const U2F_CHAL_SIZE: usize = 32; // Size of challenge
pub const U2F_AUTH_SIGNED_DATA_SIZE: usize = U2F_APPID_SIZE + 1 + U2F_CTR_SIZE + U2F_CHAL_SIZE;

// EC (uncompressed) point

pub const U2F_POINT_UNCOMPRESSED: u8 = 0x04; // Uncompressed point format

// Authentication control byte

pub const U2F_AUTH_FLAG_TUP: u8 = 0x01; // Test of user presence set
pub const U2F_AUTH_FLAG_TDOWN: u8 = 0x00; // Test of user presence not set

// Command status responses

pub const U2F_SW_NO_ERROR: u16 = 0x9000; // SW_NO_ERROR
pub const U2F_SW_WRONG_DATA: u16 = 0x6A80; // SW_WRONG_DATA
pub const U2F_SW_CONDITIONS_NOT_SATISFIED: u16 = 0x6985; // SW_CONDITIONS_NOT_SATISFIED
