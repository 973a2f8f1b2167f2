use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error codes reported by the native location accessor that get translated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationErrorCode {
    /// Location services are disabled or not available on this device.
    #[serde(rename = "ENOLOCATIONSERVICES")]
    NoLocationServices,
    /// The application lacks the privacy permission to read location.
    #[serde(rename = "ELOCATIONDENIED")]
    LocationDenied,
    /// The position can't be determined right now. A later call may succeed.
    #[serde(rename = "ELOCATIONUNKNOWN")]
    LocationUnknown,
    /// Generic failure obtaining location.
    #[serde(rename = "EGETLOCATIONFAILED")]
    GetLocationFailed,
}

impl LocationErrorCode {
    pub const ALL: [LocationErrorCode; 4] = [
        LocationErrorCode::NoLocationServices,
        LocationErrorCode::LocationDenied,
        LocationErrorCode::LocationUnknown,
        LocationErrorCode::GetLocationFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationErrorCode::NoLocationServices => "ENOLOCATIONSERVICES",
            LocationErrorCode::LocationDenied => "ELOCATIONDENIED",
            LocationErrorCode::LocationUnknown => "ELOCATIONUNKNOWN",
            LocationErrorCode::GetLocationFailed => "EGETLOCATIONFAILED",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LocationErrorCode::NoLocationServices => {
                "Location Services is either disabled or not available."
            }
            LocationErrorCode::LocationDenied => {
                "Current privacy options are preventing this application from receiving location data."
            }
            LocationErrorCode::LocationUnknown => {
                "Location services could not determine the current location. Further calls to getLocation may eventually return the position."
            }
            LocationErrorCode::GetLocationFailed => {
                "There was a problem obtaining location information."
            }
        }
    }

    /// Matches a native error identifier against the known codes. Case-sensitive.
    pub fn from_native(identifier: &str) -> Option<LocationErrorCode> {
        LocationErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == identifier)
    }
}

impl fmt::Display for LocationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown location error code: {0}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for LocationErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationErrorCode::from_native(s).ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// A translated native failure: the code, its fixed message, and any diagnostic payload
/// the accessor attached.
#[derive(Error, Serialize, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct LocationError {
    #[serde(rename = "type")]
    code: LocationErrorCode,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<Value>,
}

impl LocationError {
    pub fn new(code: LocationErrorCode, extra: Option<Value>) -> Self {
        LocationError {
            code,
            message: code.message(),
            extra,
        }
    }

    pub fn code(&self) -> LocationErrorCode {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }
}

/// Failure raised by a native accessor. `message` identifies the failure; it is one of
/// the known codes or arbitrary text.
#[derive(Error, Serialize, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct NativeError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        NativeError {
            message: message.into(),
            extra: None,
        }
    }

    pub fn with_extra(message: impl Into<String>, extra: Value) -> Self {
        NativeError {
            message: message.into(),
            extra: Some(extra),
        }
    }
}

#[derive(Error, Debug)]
pub enum LocationFinderError {
    #[error(transparent)]
    Location(LocationError),
    #[error(transparent)]
    Native(NativeError),
    #[error("Location task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl LocationFinderError {
    pub fn location_error(&self) -> Option<&LocationError> {
        match self {
            LocationFinderError::Location(err) => Some(err),
            _ => None,
        }
    }

    pub fn native_error(&self) -> Option<&NativeError> {
        match self {
            LocationFinderError::Native(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_native_matches_exact_identifiers() {
        for code in LocationErrorCode::ALL {
            assert_eq!(LocationErrorCode::from_native(code.as_str()), Some(code));
        }
        assert_eq!(LocationErrorCode::from_native("elocationdenied"), None);
        assert_eq!(LocationErrorCode::from_native(" ELOCATIONDENIED"), None);
        assert_eq!(LocationErrorCode::from_native("EFOOBAR"), None);
    }

    #[test]
    fn from_str_reports_unknown_identifier() {
        assert_eq!(
            "ELOCATIONUNKNOWN".parse::<LocationErrorCode>(),
            Ok(LocationErrorCode::LocationUnknown)
        );
        assert_eq!(
            "EFOOBAR".parse::<LocationErrorCode>(),
            Err(UnknownErrorCode("EFOOBAR".to_string()))
        );
    }

    #[test]
    fn location_error_serializes_type_key() {
        let err = LocationError::new(LocationErrorCode::LocationDenied, None);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "type": "ELOCATIONDENIED",
                "message": "Current privacy options are preventing this application from receiving location data.",
            })
        );

        let err = LocationError::new(LocationErrorCode::NoLocationServices, Some(json!({"code": 1})));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "type": "ENOLOCATIONSERVICES",
                "message": "Location Services is either disabled or not available.",
                "extra": {"code": 1},
            })
        );
    }

    #[test]
    fn native_error_serializes_message_and_extra() {
        let err = NativeError::with_extra("EFOOBAR", json!({"errno": 5}));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"message": "EFOOBAR", "extra": {"errno": 5}})
        );
        assert_eq!(
            serde_json::to_value(NativeError::new("EFOOBAR")).unwrap(),
            json!({"message": "EFOOBAR"})
        );
    }

    #[test]
    fn message_always_matches_code() {
        for code in LocationErrorCode::ALL {
            let err = LocationError::new(code, Some(json!(null)));
            assert_eq!(err.message(), code.message());
            assert_eq!(err.to_string(), code.message());
        }
    }

    #[test]
    fn code_round_trips_through_serde() {
        let code: LocationErrorCode = serde_json::from_str("\"EGETLOCATIONFAILED\"").unwrap();
        assert_eq!(code, LocationErrorCode::GetLocationFailed);
        assert_eq!(code.to_string(), "EGETLOCATIONFAILED");
    }
}
