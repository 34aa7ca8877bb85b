use export_resolver_core::contract::CustomResourceResponse;

/// Reports a custom resource outcome back to CloudFormation.
pub trait DeliveryChannel {
    fn send(&self, response_url: &str, response: &CustomResourceResponse) -> Result<(), String>;
}
