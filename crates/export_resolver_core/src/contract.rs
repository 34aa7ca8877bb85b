use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ResolveError;

pub const IDENTIFIER_NAMESPACE: &str = "cloudformation";
pub const DEFAULT_EXPORT_FILTER: &str = ".+";

/// Matched export names mapped to their values.
pub type ResultSet = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Event CloudFormation sends to a custom resource handler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    #[serde(default)]
    pub resource_type: String,
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceProperties {
    #[serde(rename = "SourceRegion", alias = "sourceRegion", default)]
    source_region: Option<String>,
    #[serde(rename = "ExportFilters", alias = "exportFilters", default)]
    export_filters: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub source_region: String,
    pub export_filters: Vec<String>,
}

impl ResolveRequest {
    pub fn new(source_region: impl Into<String>, export_filters: Vec<String>) -> Self {
        Self {
            source_region: source_region.into(),
            export_filters,
        }
    }

    /// Builds a request from custom resource properties.
    ///
    /// A missing, `null` or empty filter list falls back to the single
    /// match-everything pattern.
    pub fn from_properties(properties: &Value) -> Result<Self, ResolveError> {
        if !properties.is_object() {
            return Err(ResolveError::InvalidRequest(
                "ResourceProperties must be a JSON object".to_string(),
            ));
        }

        let parsed: ResourceProperties = serde_json::from_value(properties.clone())
            .map_err(|error| {
                ResolveError::InvalidRequest(format!("Malformed ResourceProperties: {error}"))
            })?;

        let source_region = parsed
            .source_region
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        if source_region.is_empty() {
            return Err(ResolveError::InvalidRequest(
                "SourceRegion cannot be empty".to_string(),
            ));
        }

        let export_filters = match parsed.export_filters {
            Some(filters) if !filters.is_empty() => filters,
            _ => vec![DEFAULT_EXPORT_FILTER.to_string()],
        };

        Ok(Self {
            source_region,
            export_filters,
        })
    }

    pub fn identifier(&self) -> String {
        export_identifier(&self.source_region)
    }
}

/// Region string used to derive an identifier when properties fail to parse.
pub fn source_region_hint(properties: &Value) -> String {
    ["SourceRegion", "sourceRegion"]
        .iter()
        .find_map(|key| properties.get(key).and_then(Value::as_str))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

pub fn export_identifier(source_region: &str) -> String {
    format!("custom:{IDENTIFIER_NAMESPACE}:{source_region}:exports")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportRecord {
    pub name: String,
    pub value: String,
}

impl ExportRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResponseStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

impl ResponseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        payload: ResultSet,
        identifier: String,
    },
    Failure {
        identifier: String,
        reason: String,
    },
}

impl Outcome {
    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::Success { .. } => ResponseStatus::Success,
            Self::Failure { .. } => ResponseStatus::Failed,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::Success { identifier, .. } | Self::Failure { identifier, .. } => identifier,
        }
    }

    /// Payload reported to CloudFormation; always empty for a failure.
    pub fn payload(&self) -> ResultSet {
        match self {
            Self::Success { payload, .. } => payload.clone(),
            Self::Failure { .. } => ResultSet::new(),
        }
    }
}

/// Body PUT to the pre-signed response URL of a custom resource event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: ResultSet,
}

pub fn build_response(
    event: &CustomResourceEvent,
    outcome: &Outcome,
    log_stream_name: &str,
) -> CustomResourceResponse {
    CustomResourceResponse {
        status: outcome.status(),
        reason: format!("See the details in CloudWatch Log Stream: {log_stream_name}"),
        physical_resource_id: outcome.identifier().to_string(),
        stack_id: event.stack_id.clone(),
        request_id: event.request_id.clone(),
        logical_resource_id: event.logical_resource_id.clone(),
        no_echo: false,
        data: outcome.payload(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_event() -> CustomResourceEvent {
        serde_json::from_value(json!({
            "RequestType": "Create",
            "ResponseURL": "https://cloudformation-custom-resource-response.example/signed",
            "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/app/guid",
            "RequestId": "request-1",
            "ResourceType": "Custom::GlobalImport",
            "LogicalResourceId": "GlobalImport",
            "ResourceProperties": {
                "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:resolver",
                "SourceRegion": "us-east-1"
            }
        }))
        .expect("event should parse")
    }

    #[test]
    fn identifier_is_derived_from_region_only() {
        assert_eq!(
            export_identifier("us-east-1"),
            "custom:cloudformation:us-east-1:exports"
        );
        assert_eq!(export_identifier("eu-west-1"), export_identifier("eu-west-1"));
    }

    #[test]
    fn from_properties_defaults_filters_to_match_everything() {
        let request = ResolveRequest::from_properties(&json!({"SourceRegion": "eu-west-1"}))
            .expect("request should pass");
        assert_eq!(request.export_filters, vec![DEFAULT_EXPORT_FILTER.to_string()]);

        let request = ResolveRequest::from_properties(&json!({
            "SourceRegion": "eu-west-1",
            "ExportFilters": []
        }))
        .expect("request should pass");
        assert_eq!(request.export_filters, vec![DEFAULT_EXPORT_FILTER.to_string()]);
    }

    #[test]
    fn from_properties_accepts_camel_case_keys() {
        let request = ResolveRequest::from_properties(&json!({
            "sourceRegion": " us-east-1 ",
            "exportFilters": ["^app-.+", "db"]
        }))
        .expect("request should pass");

        assert_eq!(request.source_region, "us-east-1");
        assert_eq!(request.export_filters, vec!["^app-.+", "db"]);
        assert_eq!(request.identifier(), "custom:cloudformation:us-east-1:exports");
    }

    #[test]
    fn from_properties_rejects_missing_region() {
        let error = ResolveRequest::from_properties(&json!({"ExportFilters": ["x"]}))
            .expect_err("request should fail");
        assert_eq!(error.to_string(), "invalid request: SourceRegion cannot be empty");
    }

    #[test]
    fn from_properties_rejects_non_string_filters() {
        let properties = json!({"SourceRegion": "us-east-1", "ExportFilters": [42]});
        let error = ResolveRequest::from_properties(&properties).expect_err("request should fail");

        assert_eq!(error.code(), "invalid_request");
        assert_eq!(source_region_hint(&properties), "us-east-1");
    }

    #[test]
    fn failure_response_carries_empty_data() {
        let event = sample_event();
        let outcome = Outcome::Failure {
            identifier: export_identifier("us-east-1"),
            reason: "boom".to_string(),
        };

        let response = build_response(&event, &outcome, "2026/10/19/[$LATEST]abc");
        let body = serde_json::to_value(&response).expect("response should serialize");

        assert_eq!(body["Status"], "FAILED");
        assert_eq!(body["PhysicalResourceId"], "custom:cloudformation:us-east-1:exports");
        assert_eq!(body["RequestId"], "request-1");
        assert_eq!(body["LogicalResourceId"], "GlobalImport");
        assert_eq!(body["NoEcho"], false);
        assert_eq!(body["Data"], json!({}));
        assert_eq!(
            body["Reason"],
            "See the details in CloudWatch Log Stream: 2026/10/19/[$LATEST]abc"
        );
    }
}
