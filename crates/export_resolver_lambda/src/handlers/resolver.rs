use export_resolver_core::contract::{
    build_response, export_identifier, source_region_hint, CustomResourceEvent, Outcome,
    ResolveRequest, ResultSet,
};
use export_resolver_core::error::ResolveError;
use export_resolver_core::filters::{select_exports, ExportFilterSet};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::delivery::DeliveryChannel;
use crate::adapters::listing::ExportLister;
use crate::config::ResolverConfig;
use crate::logging::{log_error, log_info};

/// Value returned to the Lambda runtime once the outcome has been delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverAck {
    pub status: String,
    pub physical_resource_id: String,
    pub exports: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverHandlerError {
    pub message: String,
}

pub fn handle_custom_resource_event(
    event: Value,
    config: &ResolverConfig,
    lister: &impl ExportLister,
    channel: &impl DeliveryChannel,
) -> Result<ResolverAck, ResolverHandlerError> {
    let event: CustomResourceEvent =
        serde_json::from_value(event).map_err(|error| ResolverHandlerError {
            message: format!("Malformed custom resource event: {error}"),
        })?;

    log_info(
        "resolve_started",
        json!({
            "request_type": event.request_type,
            "request_id": event.request_id.clone(),
            "logical_resource_id": event.logical_resource_id.clone(),
        }),
    );

    let outcome = resolve_outcome(&event.resource_properties, lister);
    let response = build_response(&event, &outcome, &config.log_stream_name);

    if let Err(error) = channel.send(&event.response_url, &response) {
        log_error(
            "delivery_failed",
            json!({
                "request_id": event.request_id.clone(),
                "status": response.status.as_str(),
                "physical_resource_id": response.physical_resource_id.clone(),
                "error_message": error.clone(),
            }),
        );
        return Err(ResolverHandlerError {
            message: format!("Failed to deliver custom resource response: {error}"),
        });
    }

    Ok(ResolverAck {
        status: response.status.as_str().to_string(),
        physical_resource_id: response.physical_resource_id,
        exports: response.data.len(),
    })
}

/// Resolves the exports described by `properties` into a single outcome.
///
/// The request and its filters are validated before the listing service is
/// called, so an invalid request never reaches the network.
pub fn resolve_outcome(properties: &Value, lister: &impl ExportLister) -> Outcome {
    let request = match ResolveRequest::from_properties(properties) {
        Ok(value) => value,
        Err(error) => {
            return failure_outcome(export_identifier(&source_region_hint(properties)), error);
        }
    };

    let identifier = request.identifier();
    match resolve_exports(&request, lister) {
        Ok(payload) => {
            log_info(
                "resolve_completed",
                json!({
                    "source_region": request.source_region.clone(),
                    "filters": request.export_filters.len(),
                    "exports_matched": payload.len(),
                    "physical_resource_id": identifier.clone(),
                }),
            );
            Outcome::Success {
                payload,
                identifier,
            }
        }
        Err(error) => failure_outcome(identifier, error),
    }
}

fn resolve_exports(
    request: &ResolveRequest,
    lister: &impl ExportLister,
) -> Result<ResultSet, ResolveError> {
    let filters = ExportFilterSet::compile(request.export_filters.as_slice())?;
    let records = lister
        .list_exports(&request.source_region)
        .map_err(ResolveError::Listing)?;
    Ok(select_exports(&records, &filters))
}

fn failure_outcome(identifier: String, error: ResolveError) -> Outcome {
    log_error(
        "resolve_failed",
        json!({
            "physical_resource_id": identifier.clone(),
            "error_code": error.code(),
            "error_message": error.to_string(),
        }),
    );
    Outcome::Failure {
        identifier,
        reason: error.to_string(),
    }
}
