//! Request signing for direct client uploads.
//!
//! The provider authorises an upload when the client presents a digest of
//! the upload parameters concatenated with the account's API secret. The
//! string that gets hashed is built by:
//!
//! 1. dropping parameters the provider never signs (`file`, `cloud_name`,
//!    `resource_type`, `api_key`) and any null or empty value,
//! 2. rendering each remaining pair as `key=value` (arrays joined by `,`),
//! 3. sorting those pairs and joining them with `&`,
//! 4. appending the secret.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::SignError;

/// Parameters the provider excludes from the signature.
pub const EXCLUDED_PARAMS: &[&str] =
    &["file", "cloud_name", "resource_type", "api_key"];

/// Digest used for signatures. Accounts default to SHA-1; SHA-256 must be
/// enabled on the provider side before it is accepted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    /// Provider default.
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    /// Lowercase name as written in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1",
            SignatureAlgorithm::Sha256 => "sha256",
        }
    }

    fn digest_hex(self, input: &[u8]) -> String {
        match self {
            SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(input)),
            SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SignError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            other => Err(SignError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Signs upload parameters with the account secret.
///
/// Returns the lowercase hex digest the provider expects in the
/// `signature` upload field.
pub fn sign_params(
    params: &Map<String, Value>,
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> Result<String, SignError> {
    if api_secret.trim().is_empty() {
        return Err(SignError::MissingSecret);
    }

    let mut payload = string_to_sign(params)?;
    payload.push_str(api_secret);

    Ok(algorithm.digest_hex(payload.as_bytes()))
}

/// Canonical `k=v&k=v` string covered by the signature, without the secret.
pub fn string_to_sign(params: &Map<String, Value>) -> Result<String, SignError> {
    let mut pairs = Vec::with_capacity(params.len());

    for (key, value) in params {
        if EXCLUDED_PARAMS.contains(&key.as_str()) {
            continue;
        }

        let Some(rendered) = render_value(key, value)? else {
            continue;
        };
        if rendered.is_empty() {
            continue;
        }

        pairs.push(format!("{key}={rendered}"));
    }

    // Sorting the rendered pairs (not the bare keys) is what the provider does.
    pairs.sort();
    Ok(pairs.join("&"))
}

fn render_value(key: &str, value: &Value) -> Result<Option<String>, SignError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Number(number) => Ok(Some(render_number(number))),
        Value::Array(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(_) => {
                        return Err(SignError::UnsupportedValue {
                            key: key.to_string(),
                        });
                    }
                    other => {
                        rendered.push(render_value(key, other)?.unwrap_or_default())
                    }
                }
            }
            Ok(Some(rendered.join(",")))
        }
        Value::Object(_) => Err(SignError::UnsupportedValue {
            key: key.to_string(),
        }),
    }
}

// Whole floats render without a fraction, the way the browser SDK sends them.
fn render_number(number: &Number) -> String {
    if let Some(float) = number.as_f64()
        && number.is_f64()
        && float.fract() == 0.0
        && float.abs() < i64::MAX as f64
    {
        return (float as i64).to_string();
    }
    number.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn matches_provider_documented_example() {
        let params = params(json!({
            "timestamp": 1315060510,
            "public_id": "sample_image",
            "eager": "w_400,h_300,c_pad|w_260,h_200,c_crop",
        }));

        assert_eq!(
            string_to_sign(&params).unwrap(),
            "eager=w_400,h_300,c_pad|w_260,h_200,c_crop&public_id=sample_image&timestamp=1315060510"
        );
        assert_eq!(
            sign_params(&params, "abcd", SignatureAlgorithm::Sha1).unwrap(),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
        assert_eq!(
            sign_params(&params, "abcd", SignatureAlgorithm::Sha256).unwrap(),
            "cc927e1290f9e3ae4c1a741eda21a4630b4ce80f9ce0bc0296337d25cf40f91e"
        );
    }

    #[test]
    fn drops_excluded_empty_and_null_values() {
        let params = params(json!({
            "api_key": "123",
            "cloud_name": "demo",
            "file": "data:...",
            "resource_type": "image",
            "folder": "gallery",
            "context": "",
            "notification_url": null,
            "tags": ["one", "two"],
            "timestamp": 1700000000,
        }));

        assert_eq!(
            string_to_sign(&params).unwrap(),
            "folder=gallery&tags=one,two&timestamp=1700000000"
        );
        assert_eq!(
            sign_params(&params, "secret", SignatureAlgorithm::Sha1).unwrap(),
            "c9b93b32c253cf58aea36180d41b403f6ccfd3d5"
        );
    }

    #[test]
    fn simple_numeric_param() {
        let params = params(json!({ "a": 1 }));
        assert_eq!(
            sign_params(&params, "secret", SignatureAlgorithm::Sha1).unwrap(),
            "29a5968ff376d389db10ba4591fe2926e9186ab6"
        );
    }

    #[test]
    fn whole_floats_render_as_integers() {
        let params = params(json!({ "timestamp": 1700000000.0, "q": 0.5 }));
        assert_eq!(
            string_to_sign(&params).unwrap(),
            "q=0.5&timestamp=1700000000"
        );
    }

    #[test]
    fn empty_array_is_skipped() {
        let params = params(json!({ "tags": [], "b": true }));
        assert_eq!(string_to_sign(&params).unwrap(), "b=true");
    }

    #[test]
    fn empty_params_sign_the_secret_alone() {
        let signature =
            sign_params(&Map::new(), "secret", SignatureAlgorithm::Sha1)
                .unwrap();
        assert_eq!(signature.len(), 40);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = sign_params(
            &params(json!({ "a": 1 })),
            "  ",
            SignatureAlgorithm::Sha1,
        )
        .unwrap_err();
        assert!(matches!(err, SignError::MissingSecret));
    }

    #[test]
    fn nested_objects_are_rejected() {
        let err = string_to_sign(&params(json!({ "context": { "alt": "x" } })))
            .unwrap_err();
        assert!(
            matches!(err, SignError::UnsupportedValue { ref key } if key == "context")
        );
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!(
            "SHA-256".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Sha256
        );
        assert_eq!(
            "sha1".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Sha1
        );
        assert!("md5".parse::<SignatureAlgorithm>().is_err());
    }
}
