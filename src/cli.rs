use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "jvm-gc-health")]
#[command(author = "Anurag Ambuj")]
#[command(version)]
#[command(about = "Garbage-collection health monitor for long-lived JVM daemons", long_about = None)]
pub struct Cli {
    #[arg(short, long, help = "JVM process ID to monitor; lists local JVMs when omitted")]
    pub pid: Option<u32>,

    #[arg(
        short = 'i',
        long,
        help = "Report interval (e.g. 500ms, 5s, 1m)",
        value_parser = parse_duration
    )]
    pub interval: Option<Duration>,

    #[arg(
        short = 'c',
        long,
        help = "Path to configuration file",
        env = "JVM_GC_HEALTH_CONFIG"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print each report as a JSON line")]
    pub json: bool,

    #[cfg(feature = "jolokia")]
    #[arg(long, help = "Jolokia agent URL to monitor instead of a local pid")]
    pub jolokia: Option<String>,
}

fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}
