use crate::error::{MonitorError, Result};
use crate::jvm::introspection::RuntimeIntrospection;
use crate::jvm::jolokia::types::{
    parse_collection_counts, parse_collection_usages, JolokiaRequest, JolokiaResponse,
};
use crate::jvm::types::{CollectorCount, MemoryPoolUsage, RuntimeIdentity};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Introspects a (possibly remote) JVM through a Jolokia agent.
pub struct JolokiaIntrospection {
    url: String,
    client: Client,
    username: Option<String>,
    password: Option<String>,
}

impl JolokiaIntrospection {
    pub fn new(
        url: String,
        username: Option<String>,
        password: Option<String>,
        request_timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            url,
            client,
            username,
            password,
        }
    }

    async fn read_attribute(&self, mbean: &str, attribute: &str) -> Result<Value> {
        let mut req_builder = self
            .client
            .post(&self.url)
            .json(&JolokiaRequest::read(mbean, attribute));

        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            req_builder = req_builder.basic_auth(username, Some(password));
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| MonitorError::Connection(format!("Jolokia HTTP error: {}", e)))?;

        let jolokia_resp: JolokiaResponse = response
            .json()
            .await
            .map_err(|e| MonitorError::Parse(format!("Failed to parse Jolokia response: {}", e)))?;

        if jolokia_resp.status != 200 {
            return Err(MonitorError::Connection(format!(
                "Jolokia error: {}",
                jolokia_resp
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        Ok(jolokia_resp.value)
    }

    async fn read_string(&self, mbean: &str, attribute: &str) -> Result<String> {
        self.read_attribute(mbean, attribute)
            .await?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MonitorError::Parse(format!("{} is not a string", attribute)))
    }
}

#[async_trait]
impl RuntimeIntrospection for JolokiaIntrospection {
    async fn runtime_identity(&self) -> Result<RuntimeIdentity> {
        let vendor = self.read_string("java.lang:type=Runtime", "VmVendor").await?;
        let version = self
            .read_string("java.lang:type=Runtime", "SpecVersion")
            .await?;
        Ok(RuntimeIdentity::new(vendor, version))
    }

    async fn memory_pools(&self) -> Result<Vec<MemoryPoolUsage>> {
        let value = self
            .read_attribute("java.lang:type=MemoryPool,name=*", "CollectionUsage")
            .await?;
        Ok(parse_collection_usages(&value))
    }

    async fn collector_counts(&self) -> Result<Vec<CollectorCount>> {
        let value = self
            .read_attribute("java.lang:type=GarbageCollector,name=*", "CollectionCount")
            .await?;
        Ok(parse_collection_counts(&value))
    }
}
