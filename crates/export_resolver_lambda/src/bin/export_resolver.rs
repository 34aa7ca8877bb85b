use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::error::DisplayErrorContext;
use export_resolver_core::contract::{CustomResourceResponse, ExportRecord};
use export_resolver_lambda::adapters::delivery::DeliveryChannel;
use export_resolver_lambda::adapters::listing::ExportLister;
use export_resolver_lambda::config::ResolverConfig;
use export_resolver_lambda::handlers::resolver::{handle_custom_resource_event, ResolverAck};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

struct CloudFormationExportLister;

impl ExportLister for CloudFormationExportLister {
    fn list_exports(&self, region: &str) -> Result<Vec<ExportRecord>, String> {
        let region = Region::new(region.to_string());

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let aws_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                let client = aws_sdk_cloudformation::Client::new(&aws_config);

                let output = client.list_exports().send().await.map_err(|error| {
                    format!("ListExports call failed: {}", DisplayErrorContext(&error))
                })?;

                Ok(output
                    .exports()
                    .iter()
                    .filter_map(|export| Some(ExportRecord::new(export.name()?, export.value()?)))
                    .collect())
            })
        })
    }
}

struct HttpDeliveryChannel {
    http_client: reqwest::Client,
}

impl DeliveryChannel for HttpDeliveryChannel {
    fn send(&self, response_url: &str, response: &CustomResourceResponse) -> Result<(), String> {
        let body = serde_json::to_vec(response)
            .map_err(|error| format!("failed to serialize custom resource response: {error}"))?;
        let url = response_url.to_string();
        let client = self.http_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                // The pre-signed URL is signed without a content type.
                let reply = client
                    .put(url)
                    .header(CONTENT_TYPE, "")
                    .body(body)
                    .send()
                    .await
                    .map_err(|error| format!("failed to PUT response: {error}"))?;

                let status = reply.status();
                if !status.is_success() {
                    return Err(format!("response URL rejected the report with {status}"));
                }
                Ok(())
            })
        })
    }
}

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &ResolverConfig,
    channel: &HttpDeliveryChannel,
) -> Result<ResolverAck, Error> {
    handle_custom_resource_event(event.payload, config, &CloudFormationExportLister, channel)
        .map_err(|error| Error::from(error.message))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Built once at init; per-invocation work must always reach the response URL.
    let config = ResolverConfig::from_env();
    let http_client = reqwest::Client::builder()
        .timeout(config.delivery_timeout)
        .build()
        .map_err(|error| Error::from(format!("failed to build HTTP client: {error}")))?;
    let channel = HttpDeliveryChannel { http_client };

    let config = &config;
    let channel = &channel;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, config, channel).await
    }))
    .await
}
