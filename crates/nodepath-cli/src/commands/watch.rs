use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use nodepath_policy::{NodeSnapshot, PathPolicy, StaticHandle};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{load_args, open_store};

pub async fn run(db: &Path, interval_secs: u64, args: Option<&Path>) -> anyhow::Result<()> {
    let args = load_args(args)?;
    let store = open_store(db)?;
    let handle = StaticHandle {
        documents: Arc::new(store),
        nodes: Arc::new(NodeSnapshot::default()),
    };
    let policy = PathPolicy::new(args, &handle)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let interval = Duration::from_secs(interval_secs.max(1));
    let changes = watch_loop(&policy, interval, shutdown_rx).await;
    info!(changes, "watch stopped");
    Ok(())
}

/// Reload on every tick until shutdown. Returns how many reloads changed
/// the configuration.
pub async fn watch_loop(
    policy: &PathPolicy,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let source = policy.source();
    info!(
        namespace = %source.namespace,
        name = %source.name,
        key = %source.key,
        ?interval,
        "watching configuration"
    );

    let mut changes = 0;
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                let before = policy.config().current();
                match policy.refresh_config() {
                    Ok(()) => {
                        let after = policy.config().current();
                        if *after != *before {
                            changes += 1;
                            let nodes: Vec<&str> = after.listed_nodes().collect();
                            info!(
                                entries = after.node_path_map.len(),
                                has_default = after.has_default_path(),
                                ?nodes,
                                "configuration changed"
                            );
                        } else {
                            debug!("configuration unchanged");
                        }
                    }
                    Err(e) => warn!(error = %e, "reload failed, keeping previous configuration"),
                }
            }
            // A dropped sender disables this branch rather than stopping the loop.
            Ok(()) = shutdown.changed() => {
                debug!("watch loop shutting down");
                break;
            }
        }
    }
    changes
}
