//! Client for the NHTSA vPIC `DecodeVinValues` endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::VinDecoder;
use crate::config::DecoderConfig;
use crate::errors::DecodeError;
use crate::models::VehicleAttributes;

/// Flat decode response, one entry per requested VIN
#[derive(Debug, Deserialize)]
struct DecodeVinValuesResponse {
    #[serde(rename = "Results", default)]
    results: Vec<DecodeVinValuesResult>,
}

#[derive(Debug, Deserialize)]
struct DecodeVinValuesResult {
    #[serde(rename = "Make", default)]
    make: Option<String>,
    #[serde(rename = "Model", default)]
    model: Option<String>,
    #[serde(rename = "ModelYear", default)]
    model_year: Option<String>,
    #[serde(rename = "BodyClass", default)]
    body_class: Option<String>,
    #[serde(rename = "ErrorText", default)]
    error_text: Option<String>,
}

fn field(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// NHTSA vPIC decoder
#[derive(Clone)]
pub struct NhtsaDecoder {
    client: Client,
    base_url: String,
    model_year: Option<String>,
}

impl NhtsaDecoder {
    pub fn new(client: Client, base_url: impl Into<String>, model_year: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model_year,
        }
    }

    /// Build a decoder with a client honouring the configured timeouts
    pub fn from_config(config: &DecoderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration()?)
            .connect_timeout(config.connect_timeout_duration()?)
            .user_agent(concat!("vin-cache/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, &config.base_url, config.model_year.clone()))
    }

    fn decode_url(&self, vin: &str) -> String {
        format!(
            "{}/DecodeVinValues/{}?format=json&modelyear={}",
            self.base_url,
            vin,
            self.model_year.as_deref().unwrap_or("")
        )
    }

    fn map_request_error(error: reqwest::Error) -> DecodeError {
        if error.is_timeout() {
            DecodeError::Timeout {
                message: error.to_string(),
            }
        } else if error.is_decode() {
            DecodeError::InvalidResponse {
                message: error.to_string(),
            }
        } else {
            DecodeError::Unreachable {
                message: error.to_string(),
            }
        }
    }

    /// Turn a decode payload into attributes, or NotFound when nothing resolved
    fn interpret(vin: &str, response: DecodeVinValuesResponse) -> Result<VehicleAttributes, DecodeError> {
        let Some(result) = response.results.into_iter().next() else {
            return Err(DecodeError::NotFound {
                vin: vin.to_string(),
            });
        };

        let attributes = VehicleAttributes {
            make: field(result.make),
            model: field(result.model),
            model_year: field(result.model_year),
            body_class: field(result.body_class),
        };

        if attributes.make.is_empty() && attributes.model.is_empty() {
            warn!(
                "VIN {} did not resolve: {}",
                vin,
                result.error_text.as_deref().unwrap_or("no error text")
            );
            return Err(DecodeError::NotFound {
                vin: vin.to_string(),
            });
        }

        Ok(attributes)
    }
}

#[async_trait]
impl VinDecoder for NhtsaDecoder {
    async fn decode(&self, vin: &str) -> Result<VehicleAttributes, DecodeError> {
        let url = self.decode_url(vin);
        debug!("Decoding VIN via {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecodeError::InvalidResponse {
                message: format!(
                    "HTTP error: {} {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let payload: DecodeVinValuesResponse =
            response.json().await.map_err(Self::map_request_error)?;
        Self::interpret(vin, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> DecodeVinValuesResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_interpret_resolved_vin() {
        let payload = parse(json!({
            "Count": 1,
            "Message": "Results returned successfully",
            "Results": [{
                "Make": "PETERBILT",
                "Model": "388",
                "ModelYear": "2014",
                "BodyClass": "Truck-Tractor",
                "ErrorCode": "0"
            }]
        }));

        let attributes = NhtsaDecoder::interpret("1XPWD40X1ED215307", payload).unwrap();

        assert_eq!(
            attributes,
            VehicleAttributes {
                make: "PETERBILT".to_string(),
                model: "388".to_string(),
                model_year: "2014".to_string(),
                body_class: "Truck-Tractor".to_string(),
            }
        );
    }

    #[rstest]
    #[case::no_results(json!({ "Results": [] }))]
    #[case::missing_results(json!({ "Message": "nothing" }))]
    #[case::empty_attributes(json!({ "Results": [{
        "Make": "", "Model": "", "ModelYear": "", "BodyClass": "",
        "ErrorText": "11 - Incorrect Model Year"
    }] }))]
    #[case::null_attributes(json!({ "Results": [{ "Make": null, "Model": null }] }))]
    fn test_interpret_unresolved_vin(#[case] value: serde_json::Value) {
        let result = NhtsaDecoder::interpret("AAAAAAAAAAAAAAAAA", parse(value));
        assert!(matches!(result, Err(DecodeError::NotFound { .. })));
    }

    #[test]
    fn test_decode_url_includes_model_year_hint() {
        let decoder = NhtsaDecoder::new(
            Client::new(),
            "https://vpic.nhtsa.dot.gov/api/vehicles/",
            Some("2014".to_string()),
        );
        assert_eq!(
            decoder.decode_url("1XPWD40X1ED215307"),
            "https://vpic.nhtsa.dot.gov/api/vehicles/DecodeVinValues/1XPWD40X1ED215307?format=json&modelyear=2014"
        );

        let decoder = NhtsaDecoder::new(Client::new(), "http://localhost:1", None);
        assert_eq!(
            decoder.decode_url("1XPWD40X1ED215307"),
            "http://localhost:1/DecodeVinValues/1XPWD40X1ED215307?format=json&modelyear="
        );
    }
}
