//! Advisor backed by a Gemini-compatible `generateContent` endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::reply::{parse_coherence, parse_description};
use super::{Advisor, CoherenceAssessment, CoherenceProjection, DescriptionAssessment, DescriptionQuery};
use crate::error::AdvisoryError;
use crate::models::config::AdvisorConfig;

/// Blocking HTTP advisor.
///
/// Each call is bounded by the configured timeout; expiry surfaces as a
/// transport error like any other failure.
pub struct GeminiAdvisor {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiAdvisor {
    /// Build an advisor, reading the API key from the configured environment variable.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisoryError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AdvisoryError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    /// Build an advisor with an explicit API key.
    pub fn new(config: &AdvisorConfig, api_key: impl Into<String>) -> Result<Self, AdvisoryError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("aduana/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            api_key: api_key.into(),
        })
    }

    fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AdvisoryError::MalformedResponse("empty completion".to_string()));
        }

        debug!("advisor replied with {} characters", text.len());
        Ok(text)
    }
}

fn description_prompt(query: &DescriptionQuery<'_>) -> String {
    format!(
        r#"You are an expert in international trade and Colombian customs (DIAN) import rules.

Decide whether this merchandise description on an import invoice is specific enough for DIAN:

Description: "{description}"
Quantity: {quantity}
Unit price: {unit_price}

An adequate description names the specific product (not "goods" or "various items"),
its brand and model or reference where applicable, and relevant technical characteristics
such as material, size, capacity or composition.

Reply ONLY with JSON of exactly this form:
{{"valid": true or false, "reason": "short explanation", "suggestion": "how to improve it, empty if valid"}}"#,
        description = query.description,
        quantity = query.quantity,
        unit_price = query.unit_price,
    )
}

fn coherence_prompt(projection: &CoherenceProjection) -> Result<String, AdvisoryError> {
    let data = serde_json::to_string_pretty(projection)
        .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;
    Ok(format!(
        r#"You are an expert in international trade and Colombian customs.

Find inconsistencies between the fields of this import invoice:

{data}

Check that the currency fits the supplier's country, that the ports exist and agree with
the origin country, that the Incoterm makes sense for the declared ports, that the total
value is plausible, and that no critical field is empty or contradictory.

Reply ONLY with JSON of exactly this form (use empty lists when everything is fine):
{{"coherent": true or false, "problems": ["serious problem"], "advisories": ["minor remark"]}}"#
    ))
}

fn remediation_prompt(field: &str, value: &str, context: &str) -> String {
    format!(
        r#"Invoice field with an error: {field}
Current value: "{value}"
Error context: {context}

Write a brief (at most two lines), specific and actionable suggestion for correcting this
field so it satisfies DIAN import invoice requirements. Reply with the suggestion only."#
    )
}

impl Advisor for GeminiAdvisor {
    fn assess_description(
        &self,
        query: &DescriptionQuery<'_>,
    ) -> Result<DescriptionAssessment, AdvisoryError> {
        let reply = self.generate(&description_prompt(query))?;
        parse_description(&reply)
    }

    fn assess_coherence(
        &self,
        projection: &CoherenceProjection,
    ) -> Result<CoherenceAssessment, AdvisoryError> {
        let reply = self.generate(&coherence_prompt(projection)?)?;
        parse_coherence(&reply)
    }

    fn suggest_correction(
        &self,
        field: &str,
        value: &str,
        context: &str,
    ) -> Result<String, AdvisoryError> {
        self.generate(&remediation_prompt(field, value, context))
            .map(|text| text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_missing_api_key() {
        let config = AdvisorConfig {
            api_key_env: "ADUANA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AdvisorConfig::default()
        };
        assert_eq!(
            GeminiAdvisor::from_config(&config).err(),
            Some(AdvisoryError::MissingApiKey(
                "ADUANA_TEST_KEY_THAT_IS_NEVER_SET".to_string()
            ))
        );
    }

    #[test]
    fn test_url_joins_endpoint_and_model() {
        let config = AdvisorConfig {
            endpoint: "http://localhost:9/v1beta/".to_string(),
            ..AdvisorConfig::default()
        };
        let advisor = GeminiAdvisor::new(&config, "key").unwrap();
        assert_eq!(
            advisor.url,
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_description_prompt_carries_item() {
        let prompt = description_prompt(&DescriptionQuery {
            description: "Laptop Dell Latitude 5520",
            quantity: Decimal::from(50),
            unit_price: Decimal::from(250),
        });
        assert!(prompt.contains("Laptop Dell Latitude 5520"));
        assert!(prompt.contains("Quantity: 50"));
        assert!(prompt.contains("\"valid\""));
    }
}
