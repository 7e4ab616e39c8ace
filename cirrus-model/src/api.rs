//! Request and response bodies for the HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::MediaResource;

/// Plain-text body returned when a signing request has nothing to sign.
pub const MISSING_PARAMS_MESSAGE: &str = "Missing parameters to sign";

/// `GET /api/resources` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesResponse {
    pub data: Vec<MediaResource>,
}

/// Query string accepted by `GET /api/resources`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// `POST /api/sign-cloudinary-params` body.
///
/// `params_to_sign` stays a raw JSON value so the handler can tell an absent
/// or null field apart from one with the wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignParamsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_to_sign: Option<Value>,
}

impl SignParamsRequest {
    pub fn new(params: Map<String, Value>) -> Self {
        Self {
            params_to_sign: Some(Value::Object(params)),
        }
    }
}

/// `POST /api/sign-cloudinary-params` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResponse {
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sign_request_uses_camel_case_field() {
        let parsed: SignParamsRequest =
            serde_json::from_value(json!({ "paramsToSign": { "a": 1 } }))
                .unwrap();
        assert_eq!(parsed.params_to_sign, Some(json!({ "a": 1 })));

        let empty: SignParamsRequest =
            serde_json::from_value(json!({})).unwrap();
        assert!(empty.params_to_sign.is_none());
    }

    #[test]
    fn resources_response_wraps_data() {
        let body = ResourcesResponse {
            data: vec![MediaResource::new(
                "id-1",
                "sample",
                "https://res.cloudinary.com/demo/image/upload/sample.jpg",
                10,
                20,
            )],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["data"][0]["id"], "id-1");
        assert_eq!(value["data"][0]["width"], 10);
        assert!(value["data"][0].get("format").is_none());
    }
}
