use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::u2f::error::Error;
use crate::u2f::proto::constants::*;
use crate::u2f::proto::raw_message::apdu::{ApduFrame, Response};

/// Authentication response message as produced by the token.
///
/// On the wire: `user presence (1) | counter (4, big endian) | signature (DER)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticateResponse {
    pub user_presence: u8,
    pub counter: u32,
    pub signature: Vec<u8>,
}

pub trait Message {
    type Apdu: ApduFrame;
    fn from_apdu(apdu: Self::Apdu) -> Result<Self, Error>
    where
        Self: Sized;
    fn into_apdu(self) -> Result<Self::Apdu, Error>;
}

impl AuthenticateResponse {
    /// Decode the response body, without the trailing status word.
    ///
    /// This is the layout of the `signatureData` field of the javascript API.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() <= 1 + U2F_CTR_SIZE || data.len() > 1 + U2F_CTR_SIZE + U2F_MAX_EC_SIG_SIZE {
            return Err(Error::MalformedApdu);
        }

        let mut cursor = Cursor::new(data);

        let user_presence = cursor.read_u8()?;
        let counter = cursor.read_u32::<BigEndian>()?;

        let mut signature = Vec::with_capacity(data.len() - cursor.position() as usize);
        cursor.read_to_end(&mut signature)?;

        Ok(AuthenticateResponse {
            user_presence,
            counter,
            signature,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut data = Vec::with_capacity(1 + U2F_CTR_SIZE + self.signature.len());

        data.write_u8(self.user_presence)?;
        data.write_u32::<BigEndian>(self.counter)?;
        data.write_all(&self.signature)?;

        Ok(data)
    }

    pub fn is_user_present(&self) -> bool {
        (self.user_presence & U2F_AUTH_FLAG_TUP) == U2F_AUTH_FLAG_TUP
    }
}

impl Message for AuthenticateResponse {
    type Apdu = Response;

    fn from_apdu(apdu: Self::Apdu) -> Result<Self, Error>
    where
        Self: Sized,
    {
        if apdu.status != U2F_SW_NO_ERROR {
            return Err(apdu.status.into());
        }

        apdu.data.ok_or(Error::MalformedApdu).and_then(|data| Self::from_bytes(&data))
    }

    fn into_apdu(self) -> Result<Self::Apdu, Error> {
        Ok(Response {
            data: Some(self.to_bytes()?),
            status: U2F_SW_NO_ERROR,
        })
    }
}

pub mod apdu {
    use std::io::Write;

    use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

    use crate::u2f::error::Error;

    pub trait ApduFrame {
        fn read_from(slice: &[u8]) -> Result<Self, Error>
        where
            Self: Sized;
        fn write_to<W: Write>(self, writer: &mut W) -> Result<(), Error>;
        fn get_frame_size(&self) -> usize;
    }

    #[derive(Clone, Debug)]
    pub struct Response {
        pub data: Option<Vec<u8>>,
        pub status: u16,
    }

    impl Response {
        pub fn from_status(sw: u16) -> Self {
            Response { data: None, status: sw }
        }
    }

    impl ApduFrame for Response {
        fn read_from(slice: &[u8]) -> Result<Self, Error>
        where
            Self: Sized,
        {
            let slice_len = slice.len();

            if slice_len < 2 {
                return Err(Error::MalformedApdu);
            }

            let rsp_data = &slice[0..slice_len - 2];

            let status = (&slice[slice_len - 2..slice_len]).read_u16::<BigEndian>()?;

            let data = if !rsp_data.is_empty() { Some(rsp_data.to_vec()) } else { None };

            Ok(Response { data, status })
        }

        fn write_to<W: Write>(self, writer: &mut W) -> Result<(), Error> {
            let Response { data, status } = self;

            if let Some(data) = data {
                writer.write_all(&data[..])?;
            }

            Ok(writer.write_u16::<BigEndian>(status)?)
        }

        fn get_frame_size(&self) -> usize {
            let mut len = 2; // status bytes
            if let Some(ref data) = self.data {
                len += data.len();
            }
            len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::apdu::{ApduFrame, Response};
    use super::*;

    const SIGNATURE: [u8; 8] = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];

    #[test]
    fn test_counter_is_big_endian() {
        let mut data = vec![0x01, 0x00, 0x00, 0x01, 0x02];
        data.extend_from_slice(&SIGNATURE);

        let rsp = AuthenticateResponse::from_bytes(&data).expect("valid response");

        assert_eq!(rsp.counter, 258);
        assert!(rsp.is_user_present());
        assert_eq!(rsp.signature, SIGNATURE.to_vec());
        assert_eq!(rsp.to_bytes().expect("encodable"), data);
    }

    #[test]
    fn test_from_apdu_with_status() {
        let rsp = AuthenticateResponse {
            user_presence: U2F_AUTH_FLAG_TUP,
            counter: 7,
            signature: SIGNATURE.to_vec(),
        };

        let mut frame = Vec::new();
        let apdu = rsp.clone().into_apdu().expect("encodable");
        assert_eq!(apdu.get_frame_size(), 1 + 4 + SIGNATURE.len() + 2);
        apdu.write_to(&mut frame).expect("writable");
        assert_eq!(&frame[frame.len() - 2..], &[0x90, 0x00]);

        let decoded = AuthenticateResponse::from_apdu(Response::read_from(&frame).expect("frame")).expect("message");
        assert_eq!(decoded, rsp);
    }

    #[test]
    fn test_error_status_is_reported() {
        let mut frame = Vec::new();
        Response::from_status(U2F_SW_CONDITIONS_NOT_SATISFIED)
            .write_to(&mut frame)
            .expect("frame");
        assert_eq!(frame, [0x69, 0x85]);

        let apdu = Response::read_from(&frame).expect("frame");
        assert!(apdu.data.is_none());

        match AuthenticateResponse::from_apdu(apdu) {
            Err(Error::U2FErrorCode(sw)) => assert_eq!(sw, U2F_SW_CONDITIONS_NOT_SATISFIED),
            _ => panic!("expected a status word error"),
        }
    }

    #[test]
    fn test_truncated_messages() {
        assert!(Response::read_from(&[0x90]).is_err());
        assert!(AuthenticateResponse::from_bytes(&[0x01, 0x00, 0x00, 0x00, 0x01]).is_err());
        assert!(AuthenticateResponse::from_bytes(&[]).is_err());
        assert!(AuthenticateResponse::from_bytes(&[0u8; 1 + 4 + U2F_MAX_EC_SIG_SIZE + 1]).is_err());
    }
}
