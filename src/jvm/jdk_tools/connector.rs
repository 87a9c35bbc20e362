use crate::error::{MonitorError, Result};
use crate::health::profile::RuntimeProfile;
use crate::jvm::introspection::RuntimeIntrospection;
use crate::jvm::jdk_tools::detector::JdkToolsStatus;
use crate::jvm::jdk_tools::executor::execute_command;
use crate::jvm::jdk_tools::parsers::jstat::PoolNaming;
use crate::jvm::jdk_tools::parsers::{jcmd, jstat};
use crate::jvm::types::{CollectorCount, MemoryPoolUsage, RuntimeIdentity};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// Introspects a local JVM by shelling out to `jcmd` and `jstat`.
///
/// Pool and collector names are derived from the runtime's own profile the
/// first time they are needed, so they always match what a monitor on the same
/// JVM watches.
pub struct JdkToolsIntrospection {
    pid: u32,
    jcmd_path: PathBuf,
    jstat_path: PathBuf,
    naming: OnceCell<PoolNaming>,
    command_timeout: Duration,
}

impl JdkToolsIntrospection {
    pub fn attach(pid: u32, command_timeout: Duration) -> Result<Self> {
        Self::with_tools(&JdkToolsStatus::detect(), pid, command_timeout)
    }

    pub fn with_tools(tools: &JdkToolsStatus, pid: u32, command_timeout: Duration) -> Result<Self> {
        tools.validate()?;
        let (Some(jcmd_path), Some(jstat_path)) =
            (tools.jcmd.available_path(), tools.jstat.available_path())
        else {
            return Err(MonitorError::Connection("JDK tools not available".to_string()));
        };

        Ok(Self {
            pid,
            jcmd_path: jcmd_path.clone(),
            jstat_path: jstat_path.clone(),
            naming: OnceCell::new(),
            command_timeout,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    async fn execute_jcmd(&self, command: &str) -> Result<String> {
        let output = execute_command(
            &self.jcmd_path,
            &[&self.pid.to_string(), command],
            Some(self.command_timeout),
        )
        .await?;
        Ok(output)
    }

    async fn naming(&self) -> Result<&PoolNaming> {
        self.naming
            .get_or_try_init(|| async {
                let profile = RuntimeProfile::resolve(&self.runtime_identity().await?);
                debug!("Naming jstat pools for {} profile", profile);
                Ok::<_, MonitorError>(PoolNaming::for_profile(profile))
            })
            .await
    }

    async fn execute_jstat(&self, option: &str) -> Result<String> {
        let output = execute_command(
            &self.jstat_path,
            &[option, &self.pid.to_string()],
            Some(self.command_timeout),
        )
        .await?;
        Ok(output)
    }
}

#[async_trait]
impl RuntimeIntrospection for JdkToolsIntrospection {
    async fn runtime_identity(&self) -> Result<RuntimeIdentity> {
        let output = self.execute_jcmd("VM.system_properties").await?;
        jcmd::parse_runtime_identity(&output).map_err(MonitorError::Parse)
    }

    async fn memory_pools(&self) -> Result<Vec<MemoryPoolUsage>> {
        let (gc, capacity) = tokio::try_join!(
            self.execute_jstat("-gc"),
            self.execute_jstat("-gccapacity")
        )?;
        jstat::parse_memory_pools(&gc, &capacity, self.naming().await?)
            .map_err(MonitorError::Parse)
    }

    async fn collector_counts(&self) -> Result<Vec<CollectorCount>> {
        let output = self.execute_jstat("-gc").await?;
        jstat::parse_collector_counts(&output, self.naming().await?).map_err(MonitorError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::jdk_tools::detector::ToolStatus;

    #[test]
    fn test_attach_requires_tools() {
        let tools = JdkToolsStatus {
            jcmd: ToolStatus::NotFound,
            jstat: ToolStatus::NotFound,
            jps: ToolStatus::NotFound,
            java_home: None,
        };

        let result = JdkToolsIntrospection::with_tools(&tools, 1234, Duration::from_secs(1));
        assert!(matches!(result, Err(MonitorError::JdkTools(_))));
    }

    #[tokio::test]
    async fn test_sample_real_jvm() {
        let jvms = match crate::jvm::discovery::discover_local_jvms().await {
            Ok(jvms) if !jvms.is_empty() => jvms,
            _ => {
                println!("No JVMs found, skipping test");
                return;
            }
        };

        let Ok(introspection) = JdkToolsIntrospection::attach(jvms[0].pid, Duration::from_secs(5))
        else {
            println!("JDK tools unavailable, skipping test");
            return;
        };

        if let Ok(identity) = introspection.runtime_identity().await {
            println!("Runtime: {:?}", identity);
            assert!(!identity.vendor.is_empty());
        }
        if let Ok(pools) = introspection.memory_pools().await {
            println!("Pools: {:#?}", pools);
        }
    }
}
