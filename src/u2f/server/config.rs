use serde_derive::*;

use crate::u2f::error::Error;

/// Relying party settings a login ceremony is constructed with.
///
/// When no origin is configured the app id itself is the only accepted origin.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginConfig {
    app_id: String,
    #[serde(default)]
    origins: Vec<String>,
}

impl LoginConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        LoginConfig {
            app_id: app_id.into(),
            origins: Vec::new(),
        }
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origins.push(origin.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: LoginConfig = serde_json::from_str(json)?;

        if config.app_id.is_empty() {
            return Err(Error::Other("Unable to build a login configuration without an app id".to_string()));
        }

        Ok(config)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Exact match on scheme, host and port, no normalization is applied.
    pub fn accepts_origin(&self, origin: &str) -> bool {
        if self.origins.is_empty() {
            return self.app_id == origin;
        }

        self.origins.iter().any(|o| o == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = LoginConfig::from_json(r#"{"appId": "https://example.com", "origins": ["https://example.com", "https://login.example.com"]}"#)
            .expect("valid config");

        assert_eq!(config.app_id(), "https://example.com");
        assert!(config.accepts_origin("https://login.example.com"));
        assert!(!config.accepts_origin("https://login.example.com:8443"));
        assert!(!config.accepts_origin("http://example.com"));
    }

    #[test]
    fn test_app_id_is_default_origin() {
        let config = LoginConfig::from_json(r#"{"appId": "https://example.com"}"#).expect("valid config");

        assert!(config.origins().is_empty());
        assert!(config.accepts_origin("https://example.com"));
        assert!(!config.accepts_origin("https://example.org"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(LoginConfig::from_json(r#"{"origins": []}"#), Err(Error::JsonError(_))));
        assert!(matches!(LoginConfig::from_json(r#"{"appId": ""}"#), Err(Error::Other(_))));
    }
}
