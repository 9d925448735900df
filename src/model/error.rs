use serde::{de::Visitor, Deserialize};

/// The error body of a failed Web API request: `{"error": {"status": 401, "message": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiError {
    pub status: u16,
    pub message: ApiErrorMessage,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiErrorMessage {
    PermissionsMissing,
    TokenExpired,
    NoActiveDevice,

    Other(String),
}

impl ApiErrorMessage {
    pub fn describe(&self) -> &str {
        match self {
            ApiErrorMessage::PermissionsMissing => "Permissions missing",
            ApiErrorMessage::TokenExpired => "The access token expired",
            ApiErrorMessage::NoActiveDevice => "Player command failed: No active device found",
            ApiErrorMessage::Other(message) => message,
        }
    }
}

impl<'de> Deserialize<'de> for ApiErrorMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SpotifyErrorMessageVisitor;

        impl<'de> Visitor<'de> for SpotifyErrorMessageVisitor {
            type Value = ApiErrorMessage;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_string(v.to_owned())
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match v.as_str() {
                    "Permissions missing" => Ok(ApiErrorMessage::PermissionsMissing),
                    "The access token expired" | "Token expired" => Ok(ApiErrorMessage::TokenExpired),
                    "Player command failed: No active device found" => Ok(ApiErrorMessage::NoActiveDevice),

                    _ => Ok(ApiErrorMessage::Other(v)),
                }
            }
        }

        deserializer.deserialize_str(SpotifyErrorMessageVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_expired_response() {
        let body = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        let response: ApiErrorResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.error.status, 401);
        assert_eq!(response.error.message, ApiErrorMessage::TokenExpired);
    }

    #[test]
    fn no_active_device_response_with_reason() {
        let body = r#"{"error": {"status": 404, "message": "Player command failed: No active device found", "reason": "NO_ACTIVE_DEVICE"}}"#;
        let response: ApiErrorResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.error.message, ApiErrorMessage::NoActiveDevice);
        assert_eq!(response.error.reason.as_deref(), Some("NO_ACTIVE_DEVICE"));
    }

    #[test]
    fn unknown_message_is_kept() {
        let body = r#"{"error": {"status": 502, "message": "Bad gateway"}}"#;
        let response: ApiErrorResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.error.message, ApiErrorMessage::Other("Bad gateway".to_owned()));
        assert_eq!(response.error.message.describe(), "Bad gateway");
    }
}
