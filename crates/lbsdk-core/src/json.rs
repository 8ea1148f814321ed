//! JSON-protocol helpers.

use crate::error::ClientError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const JSON_1_1_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

pub fn to_body<T: Serialize>(value: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(value).map_err(|e| ClientError::parse(format!("unable to encode JSON body: {}", e)))
}

/// Decode a response body. An empty body decodes like `{}`.
pub fn from_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ClientError::parse(format!("invalid JSON response: {}", e)))
}

/// `Option<DateTime<Utc>>` as fractional epoch seconds, the JSON protocol's
/// timestamp format.
pub mod epoch_seconds {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => {
                let secs = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_millis()) / 1000.0;
                serializer.serialize_f64(secs)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<f64> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(secs) if secs.is_finite() => {
                let whole = secs.trunc() as i64;
                let millis = ((secs - secs.trunc()) * 1000.0).round() as i64;
                Utc.timestamp_millis_opt(whole * 1000 + millis)
                    .single()
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", secs)))
            }
            Some(secs) => Err(de::Error::custom(format!("invalid timestamp: {}", secs))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamp {
        #[serde(default, with = "epoch_seconds", skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn epoch_seconds_decode() {
        let s: Stamp = from_body(br#"{"at":1.4E9}"#).unwrap();
        assert_eq!(s.at, Some(Utc.timestamp_opt(1_400_000_000, 0).unwrap()));
        let s: Stamp = from_body(br#"{"at":1400000000.5}"#).unwrap();
        assert_eq!(s.at.unwrap().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn epoch_seconds_encode() {
        let s = Stamp {
            at: Some(Utc.timestamp_opt(1_400_000_000, 0).unwrap()),
        };
        assert_eq!(String::from_utf8(to_body(&s).unwrap()).unwrap(), r#"{"at":1400000000.0}"#);
        let none = Stamp { at: None };
        assert_eq!(String::from_utf8(to_body(&none).unwrap()).unwrap(), "{}");
    }

    #[test]
    fn empty_body_is_empty_object() {
        let s: Stamp = from_body(b"  ").unwrap();
        assert_eq!(s, Stamp { at: None });
    }

    #[test]
    fn wrong_types_fail() {
        assert!(from_body::<Stamp>(br#"{"at":"yesterday"}"#).is_err());
        assert!(from_body::<Stamp>(b"{").is_err());
    }
}
