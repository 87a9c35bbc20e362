use super::JdkToolsError;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct JdkToolsStatus {
    pub jcmd: ToolStatus,
    pub jstat: ToolStatus,
    pub jps: ToolStatus,
    pub java_home: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum ToolStatus {
    Available { path: PathBuf, version: String },
    NotFound,
    NotExecutable { path: PathBuf },
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ToolStatus::Available { .. })
    }

    /// Path of a tool that can actually be run.
    pub fn available_path(&self) -> Option<&PathBuf> {
        match self {
            ToolStatus::Available { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// What the monitor can do with the tools found on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub can_discover: bool,
    pub can_identify_runtime: bool,
    pub can_sample_pools: bool,
}

impl JdkToolsStatus {
    pub fn detect() -> Self {
        let java_home = std::env::var("JAVA_HOME").ok().map(PathBuf::from);

        Self {
            jcmd: detect_tool("jcmd", java_home.as_deref()),
            jstat: detect_tool("jstat", java_home.as_deref()),
            jps: detect_tool("jps", java_home.as_deref()),
            java_home,
        }
    }

    /// Identity comes from `jcmd`, pool usage and counters from `jstat`.
    pub fn is_usable(&self) -> bool {
        self.jcmd.is_available() && self.jstat.is_available()
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_discover: self.jcmd.is_available() || self.jps.is_available(),
            can_identify_runtime: self.jcmd.is_available(),
            can_sample_pools: self.jstat.is_available(),
        }
    }

    pub fn validate(&self) -> Result<(), JdkToolsError> {
        if !self.jcmd.is_available() {
            return Err(JdkToolsError::JcmdNotFound);
        }
        if !self.jstat.is_available() {
            return Err(JdkToolsError::JstatNotFound);
        }
        Ok(())
    }

    pub fn installation_guidance(&self) -> String {
        let mut guidance = String::from("GC monitoring needs jcmd and jstat from a JDK.\n");

        for (name, status) in [("jcmd", &self.jcmd), ("jstat", &self.jstat)] {
            match status {
                ToolStatus::Available { path, version } => {
                    guidance.push_str(&format!("  {} found at {} ({})\n", name, path.display(), version));
                }
                ToolStatus::NotExecutable { path } => {
                    guidance.push_str(&format!("  {} at {} is not executable\n", name, path.display()));
                }
                ToolStatus::NotFound => {
                    guidance.push_str(&format!("  {} not found\n", name));
                }
            }
        }

        match &self.java_home {
            Some(java_home) => guidance.push_str(&format!(
                "JAVA_HOME is {}; make sure it points at a JDK rather than a JRE.\n",
                java_home.display()
            )),
            None => guidance.push_str("Set JAVA_HOME or put the JDK's bin directory on PATH.\n"),
        }

        guidance
    }
}

/// Probes `$JAVA_HOME/bin/<name>` first, then `<name>` on `PATH`.
fn detect_tool(name: &str, java_home: Option<&Path>) -> ToolStatus {
    let executable = if cfg!(target_os = "windows") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    };

    java_home
        .map(|home| home.join("bin").join(&executable))
        .into_iter()
        .chain(std::iter::once(PathBuf::from(name)))
        .map(probe)
        .find(|status| !matches!(status, ToolStatus::NotFound))
        .unwrap_or(ToolStatus::NotFound)
}

fn probe(path: PathBuf) -> ToolStatus {
    let output = match Command::new(&path).arg("-h").output() {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ToolStatus::NotFound,
        Err(_) => return ToolStatus::NotExecutable { path },
    };

    // `-h` exits with 1 on some JDKs.
    if !(output.status.success() || output.status.code() == Some(1)) {
        return ToolStatus::NotExecutable { path };
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|line| line.contains("version") || line.contains("JDK"))
        .unwrap_or("unknown")
        .to_string();

    ToolStatus::Available { path, version }
}
