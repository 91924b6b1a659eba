// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `atsd`: wires the in-memory store, adapters, and engine together and
//! runs the SLA monitor as a single long-lived background task,
//! coordinated with process lifetime via Ctrl-C / SIGTERM (SPEC_FULL.md
//! §2.1, §4.9).

mod config;

use std::sync::Arc;

use ats_adapters::{InMemoryDirectory, LoggingNotificationDispatcher, TracingAuditLogger};
use ats_core::SystemClock;
use ats_engine::{BulkCoordinator, EscalationService, SLAMonitor, StageRegistry, WorkflowEngine};
use ats_storage::InMemoryStore;
use config::DaemonConfig;
use tracing::info;

/// The fully-wired engine, held for the daemon's lifetime. Only
/// `monitor` is ever driven directly here; the rest sit ready for a
/// future request layer the way `WorkflowEngine`/`BulkCoordinator` are
/// ready in the teacher's `DaemonState` before any command arrives.
#[allow(dead_code)]
struct Engine {
    store: Arc<InMemoryStore>,
    registry: StageRegistry,
    workflow: WorkflowEngine<SystemClock>,
    bulk: BulkCoordinator<SystemClock>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let daemon_config = DaemonConfig::from_env();

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| daemon_config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let engine_config = daemon_config.load_engine_config()?;

    let store = Arc::new(InMemoryStore::new());
    let clock = SystemClock;
    let directory = Arc::new(InMemoryDirectory::new());
    let dispatcher = Arc::new(LoggingNotificationDispatcher);
    let audit = Arc::new(TracingAuditLogger);

    let workflow = WorkflowEngine::new(
        store.clone(),
        clock.clone(),
        directory.clone(),
        dispatcher.clone(),
        audit.clone(),
    );
    let registry =
        StageRegistry::with_default_sla_hours(store.clone(), engine_config.sla.default_stage_sla_hours);
    let escalations = EscalationService::new(
        store.clone(),
        clock.clone(),
        directory,
        dispatcher,
        audit.clone(),
        engine_config.sla.clone(),
    );
    let monitor = SLAMonitor::new(store.clone(), clock.clone(), escalations, engine_config.sla);
    let bulk = BulkCoordinator::new(store.clone(), clock, workflow.clone(), audit, engine_config.bulk_retention);

    let cancel = monitor.cancellation_token();
    let _engine = Engine { store, registry, workflow, bulk };

    info!("sla monitor starting");
    let monitor_task = tokio::spawn(monitor.run());

    wait_for_shutdown_signal().await;
    info!("shutdown signal received, stopping sla monitor");
    cancel.cancel();

    if let Err(e) = monitor_task.await {
        tracing::error!(error = %e, "sla monitor task panicked");
    }

    info!("daemon shutdown complete");
    Ok(())
}

/// Waits for Ctrl-C or, on Unix, SIGTERM — whichever arrives first.
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        let Ok(mut sigterm) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) else {
            std::future::pending::<()>().await;
            return;
        };
        sigterm.recv().await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
