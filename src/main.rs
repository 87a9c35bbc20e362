use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use jvm_gc_health::{
    cli::Cli,
    config::Config,
    health::{report::HealthReport, scheduler::TokioScheduler, GarbageCollectionMonitor},
    jvm::{
        discovery::discover_local_jvms,
        introspection::RuntimeIntrospection,
        jdk_tools::{connector::JdkToolsIntrospection, detector::JdkToolsStatus},
    },
    logging,
};
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.override_report(cli.interval, cli.json)?;

    logging::init_logging(&config.logging)?;

    let Some(backend) = connect(&cli, &config).await? else {
        return Ok(());
    };

    let profile = GarbageCollectionMonitor::resolve_profile(backend.as_ref()).await;
    let (introspection, watched) = GarbageCollectionMonitor::event_source(
        profile,
        backend,
        config
            .notifications
            .enabled
            .then_some(config.notifications.watch_interval),
    );

    let scheduler = TokioScheduler::current();
    let mut monitor =
        GarbageCollectionMonitor::with_profile(profile, introspection, &scheduler, &config.monitor);

    let mut ticker = interval(config.report.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = HealthReport::capture(&monitor);
                if config.report.json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{}", report);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    monitor.stop();
    if let Some(watched) = watched {
        watched.shutdown();
    }

    Ok(())
}

/// Builds the introspection backend, or lists attachable JVMs and returns
/// `None` when no target was given.
async fn connect(cli: &Cli, config: &Config) -> Result<Option<Arc<dyn RuntimeIntrospection>>> {
    #[cfg(feature = "jolokia")]
    if let Some(url) = &cli.jolokia {
        let backend = jvm_gc_health::jvm::jolokia::connector::JolokiaIntrospection::new(
            url.clone(),
            std::env::var("JOLOKIA_USER").ok(),
            std::env::var("JOLOKIA_PASSWORD").ok(),
            config.jdk_tools.command_timeout,
        );
        return Ok(Some(Arc::new(backend)));
    }

    let Some(pid) = cli.pid else {
        let jvms = discover_local_jvms().await?;
        if jvms.is_empty() {
            println!("No JVM processes found.");
            println!("Make sure you have running Java applications.");
        } else {
            println!("{:>8}  MAIN CLASS", "PID");
            for jvm in jvms {
                println!("{:>8}  {}", jvm.pid, jvm.main_class);
            }
            println!("\nRe-run with --pid <PID> to monitor one of them.");
        }
        return Ok(None);
    };

    let tools = JdkToolsStatus::detect();
    if !tools.is_usable() {
        return Err(eyre!(tools.installation_guidance()));
    }
    debug!("JDK tool capabilities: {:?}", tools.capabilities());

    let backend = JdkToolsIntrospection::with_tools(&tools, pid, config.jdk_tools.command_timeout)?;
    info!("Attached to JVM {}", backend.pid());
    Ok(Some(Arc::new(backend)))
}
