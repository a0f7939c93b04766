use crate::{
    u2f::{
        error::ErrorKind,
        proto::web_message::{ClientData, ClientDataType},
        server::config::LoginConfig,
    },
    websafe,
};

/// Fields of a validated client data envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedClientData {
    pub challenge: Vec<u8>,
    pub origin: String,
}

pub struct ClientDataParser<'a> {
    config: &'a LoginConfig,
}

impl<'a> ClientDataParser<'a> {
    pub fn new(config: &'a LoginConfig) -> Self {
        ClientDataParser { config }
    }

    /// Checks run in order: envelope decoding, ceremony type, challenge encoding, origin.
    pub fn parse(&self, raw: &[u8]) -> Result<ParsedClientData, ErrorKind> {
        let client_data: ClientData = serde_json::from_slice(raw).map_err(|e| {
            tracing::debug!("Unable to decode client data: {e}");
            ErrorKind::MalformedClientData
        })?;

        if ClientDataType::parse(&client_data.typ) != Some(ClientDataType::Authentication) {
            tracing::debug!(typ = %client_data.typ, "Unexpected client data type");
            return Err(ErrorKind::UnexpectedCeremonyType);
        }

        let challenge = websafe::decode(&client_data.challenge).map_err(|e| {
            tracing::debug!("Unable to decode client data challenge: {e}");
            ErrorKind::MalformedClientData
        })?;

        if !self.config.accepts_origin(&client_data.origin) {
            tracing::debug!(origin = %client_data.origin, "Client data origin is not accepted");
            return Err(ErrorKind::OriginMismatch);
        }

        Ok(ParsedClientData {
            challenge,
            origin: client_data.origin,
        })
    }
}
