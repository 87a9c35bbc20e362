use super::JdkToolsError;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs `tool args...` and returns its stdout. The child is killed if it does
/// not finish within `timeout_duration`.
pub async fn execute_command(
    tool: &Path,
    args: &[&str],
    timeout_duration: Option<Duration>,
) -> Result<String, JdkToolsError> {
    let timeout_duration = timeout_duration.unwrap_or(DEFAULT_TIMEOUT);
    let describe = || format!("{} {}", tool.display(), args.join(" "));

    let command = Command::new(tool).args(args).kill_on_drop(true).output();

    let output = timeout(timeout_duration, command)
        .await
        .map_err(|_| JdkToolsError::Timeout {
            command: describe(),
        })?
        .map_err(|e| JdkToolsError::ExecutionFailed {
            command: describe(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(JdkToolsError::NonZeroExit {
            command: describe(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_reports_execution_failure() {
        let result = execute_command(
            Path::new("definitely-not-a-jdk-tool"),
            &["-l"],
            Some(Duration::from_secs(1)),
        )
        .await;

        assert!(matches!(
            result,
            Err(JdkToolsError::ExecutionFailed { .. })
        ));
    }
}
