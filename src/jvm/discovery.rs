use crate::error::{MonitorError, Result};
use crate::jvm::jdk_tools::detector::JdkToolsStatus;
use crate::jvm::jdk_tools::executor::execute_command;
use std::time::Duration;

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredJvm {
    pub pid: u32,
    pub main_class: String,
}

/// Lists local JVMs the current user can attach to, preferring `jcmd -l` over
/// `jps -l`.
pub async fn discover_local_jvms() -> Result<Vec<DiscoveredJvm>> {
    let status = JdkToolsStatus::detect();

    let tool = status
        .jcmd
        .available_path()
        .or_else(|| status.jps.available_path())
        .ok_or_else(|| {
            MonitorError::Config("No JDK tools available for JVM discovery".to_string())
        })?;

    let output = execute_command(tool, &["-l"], Some(DISCOVERY_TIMEOUT)).await?;
    Ok(parse_process_list(&output))
}

/// Parses `<pid> <main class or jar> [args]` lines as printed by both
/// `jcmd -l` and `jps -l`.
fn parse_process_list(output: &str) -> Vec<DiscoveredJvm> {
    output
        .lines()
        .filter_map(|line| {
            let (pid, main_class) = line.trim().split_once(' ')?;
            let pid = pid.parse::<u32>().ok()?;
            let main_class = main_class.trim().to_string();

            if main_class.is_empty() || is_jdk_tool(&main_class) {
                return None;
            }

            Some(DiscoveredJvm { pid, main_class })
        })
        .collect()
}

fn is_jdk_tool(main_class: &str) -> bool {
    main_class.contains("jdk.jcmd")
        || main_class.contains("sun.tools.jcmd.JCmd")
        || main_class.contains("sun.tools.jps.Jps")
        || main_class.contains("sun.tools.jstat.Jstat")
        || matches!(main_class, "Jps" | "JCmd" | "Jstat")
}
