// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ats`: a thin `clap`-based command surface over the exposed
//! operations table (SPEC_FULL.md §2.1, spec.md §6). A convenience
//! wrapper for local exercising of the engine — not the excluded HTTP
//! request layer.

mod harness;
mod output;

use std::time::Duration;

use ats_adapters::Directory;
use ats_core::{Severity, Stage};
use ats_engine::BulkOperation;
use clap::{Parser, Subcommand};
use harness::Harness;
use output::{format_or_json, print_list, OutputFormat};

#[derive(Parser)]
#[command(name = "ats", version, about = "Workflow & SLA engine — local exercising CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format for values the command prints.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Walk through a full application lifecycle: default stages,
    /// advancement, an SLA breach, and a bulk rejection.
    Demo,

    /// Create the canonical six-stage pipeline for a new job and list it.
    CreateDefaultStages {
        /// Job title, for display only.
        #[arg(long, default_value = "Staff Engineer")]
        title: String,
    },

    /// Seed a job and one application, then advance it into a stage.
    Advance {
        #[arg(long, default_value = "Staff Engineer")]
        title: String,
        /// 1-based index into the default six stages.
        #[arg(long, default_value_t = 1)]
        stage_index: usize,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Seed a job and one application, advance it twice, print its timeline.
    Timeline {
        #[arg(long, default_value = "Staff Engineer")]
        title: String,
    },

    /// Seed a job with a few applications at different stages, list the
    /// ones sitting in a named stage.
    ApplicationsInStage {
        #[arg(long, default_value = "Staff Engineer")]
        title: String,
        #[arg(long, default_value = "Initial Screening")]
        stage_name: String,
    },

    /// Seed an application against a near-zero-SLA custom stage and show
    /// it turn up as overdue, without escalating it.
    CheckOverdue {
        #[arg(long, default_value_t = 0)]
        sla_hours: u32,
    },

    /// Same setup as `check-overdue`, but escalate the breach.
    Escalate {
        #[arg(long, default_value_t = 0)]
        sla_hours: u32,
    },

    /// Escalate a breach, then resolve it.
    ResolveEscalation {
        #[arg(long, default_value_t = 0)]
        sla_hours: u32,
    },

    /// Escalate a breach, then list it back via the assignee's queue.
    ListUserEscalations {
        #[arg(long, default_value_t = 0)]
        sla_hours: u32,
    },

    /// Seed several applications and reject them all as one bulk
    /// operation, polling progress to completion.
    SubmitBulk {
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let harness = Harness::new();

    match cli.command {
        Command::Demo => run_demo(&harness).await,
        Command::CreateDefaultStages { title } => create_default_stages(&harness, cli.format, &title).await,
        Command::Advance { title, stage_index, notes } => {
            advance(&harness, cli.format, &title, stage_index, notes).await
        }
        Command::Timeline { title } => timeline(&harness, cli.format, &title).await,
        Command::ApplicationsInStage { title, stage_name } => {
            applications_in_stage(&harness, cli.format, &title, &stage_name).await
        }
        Command::CheckOverdue { sla_hours } => check_overdue(&harness, cli.format, sla_hours).await,
        Command::Escalate { sla_hours } => escalate(&harness, cli.format, sla_hours).await,
        Command::ResolveEscalation { sla_hours } => resolve_escalation(&harness, cli.format, sla_hours).await,
        Command::ListUserEscalations { sla_hours } => list_user_escalations(&harness, cli.format, sla_hours).await,
        Command::SubmitBulk { count } => submit_bulk(&harness, cli.format, count).await,
    }
}

async fn create_default_stages(harness: &Harness, format: OutputFormat, title: &str) -> anyhow::Result<()> {
    let (job_id, stages) = harness.seed_job(title).await?;
    println!("created job {job_id}");
    print_list(format, &stages, "no stages", |s| format!("{:>2}. {} (sla {}h)", s.order_index, s.name, s.sla_hours))
}

async fn advance(
    harness: &Harness,
    format: OutputFormat,
    title: &str,
    stage_index: usize,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let (job_id, stages) = harness.seed_job(title).await?;
    let application_id = harness.seed_application(job_id).await?;
    let target = stages
        .get(stage_index.saturating_sub(1))
        .ok_or_else(|| anyhow::anyhow!("stage_index {stage_index} out of range (1..={})", stages.len()))?;

    let (_, creator) = (job_id, harness.directory.job_creator(&job_id).await?);
    let transition = harness.workflow.advance(application_id, target.id, creator, notes).await?;
    format_or_json(format, &transition, |t| {
        format!("application {} entered stage {} (transition {})", application_id, target.name, t.id)
    })
}

async fn timeline(harness: &Harness, format: OutputFormat, title: &str) -> anyhow::Result<()> {
    let (job_id, stages) = harness.seed_job(title).await?;
    let application_id = harness.seed_application(job_id).await?;
    let actor = harness.directory.job_creator(&job_id).await?;

    harness.workflow.advance(application_id, stages[0].id, actor, None).await?;
    harness.workflow.advance(application_id, stages[1].id, actor, Some("screened".into())).await?;

    let entries = harness.workflow.timeline(application_id).await?;
    print_list(format, &entries, "no transitions", |e| {
        let duration = e.duration_hours.map(|h| format!("{h:.1}h")).unwrap_or_else(|| "open".into());
        format!("stage {} entered_at={} duration={}", e.transition.stage_id, e.transition.entered_at, duration)
    })
}

async fn applications_in_stage(
    harness: &Harness,
    format: OutputFormat,
    title: &str,
    stage_name: &str,
) -> anyhow::Result<()> {
    let (job_id, stages) = harness.seed_job(title).await?;
    let actor = harness.directory.job_creator(&job_id).await?;
    let screening = stages
        .iter()
        .find(|s| s.name == stage_name)
        .ok_or_else(|| anyhow::anyhow!("no default stage named {stage_name:?}"))?;

    for _ in 0..3 {
        let application_id = harness.seed_application(job_id).await?;
        harness.workflow.advance(application_id, screening.id, actor, None).await?;
    }
    // one application left behind in the first stage, for contrast.
    let untouched = harness.seed_application(job_id).await?;
    harness.workflow.advance(untouched, stages[0].id, actor, None).await?;

    let applications = harness.workflow.applications_in_stage(job_id, stage_name).await?;
    print_list(format, &applications, "no applications in stage", |a| format!("{} ({})", a.id, a.status))
}

async fn check_overdue(harness: &Harness, format: OutputFormat, sla_hours: u32) -> anyhow::Result<()> {
    seed_overdue_transition(harness, sla_hours).await?;
    let overdue = harness.monitor.check_overdue().await?;
    print_list(format, &overdue, "nothing overdue", |t| format!("transition {} overdue since {}", t.id, t.sla_deadline))
}

async fn escalate(harness: &Harness, format: OutputFormat, sla_hours: u32) -> anyhow::Result<()> {
    let (transition_id, _) = seed_overdue_transition(harness, sla_hours).await?;
    let escalation = harness.escalations.escalate(transition_id, None).await?;
    format_or_json(format, &escalation, |e| format!("escalated {} as {} to {}", e.id, e.severity, e.assignee))
}

async fn resolve_escalation(harness: &Harness, format: OutputFormat, sla_hours: u32) -> anyhow::Result<()> {
    let (transition_id, _) = seed_overdue_transition(harness, sla_hours).await?;
    let escalation = harness.escalations.escalate(transition_id, None).await?;
    let resolved = harness.escalations.resolve(escalation.id, escalation.assignee).await?;
    format_or_json(format, &resolved, |e| format!("resolved {} (resolved_by {:?})", e.id, e.resolved_by))
}

async fn list_user_escalations(harness: &Harness, format: OutputFormat, sla_hours: u32) -> anyhow::Result<()> {
    let (transition_id, job_id) = seed_overdue_transition(harness, sla_hours).await?;
    harness.escalations.escalate(transition_id, None).await?;
    let assignee = harness.directory.job_creator(&job_id).await?;

    let views = harness.escalations.list_for_user(assignee).await?;
    for view in &views {
        println!(
            "{} — {} ({}) in {} — {:.1}h overdue, severity {}",
            view.escalation.id,
            view.candidate_name,
            view.job_title,
            view.stage_name,
            view.overdue_hours,
            view.escalation.severity
        );
    }
    if views.is_empty() {
        println!("no unresolved escalations");
    }
    Ok(())
}

async fn submit_bulk(harness: &Harness, format: OutputFormat, count: usize) -> anyhow::Result<()> {
    let (job_id, stages) = harness.seed_job("Support Engineer").await?;
    let actor = harness.directory.job_creator(&job_id).await?;
    let mut application_ids = Vec::with_capacity(count);
    for _ in 0..count {
        let application_id = harness.seed_application(job_id).await?;
        harness.workflow.advance(application_id, stages[0].id, actor, None).await?;
        application_ids.push(application_id);
    }

    let op_id = harness
        .bulk
        .submit(application_ids, BulkOperation::Reject { reason: Some("not a fit".into()) }, actor)
        .await?;
    println!("submitted bulk operation {op_id}");

    loop {
        let progress = harness.bulk.get_progress(op_id)?;
        if progress.status.is_terminal() {
            return format_or_json(format, &progress, |p| {
                format!(
                    "bulk {} {} — {}/{} succeeded, {} failed ({:.0}%)",
                    op_id,
                    p.status,
                    p.successful,
                    p.total,
                    p.failed,
                    p.progress_percentage()
                )
            });
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Seed a job, one application, and an already-overdue open transition
/// against a custom `sla_hours`-SLA stage. Returns the transition id and
/// the job id.
async fn seed_overdue_transition(
    harness: &Harness,
    sla_hours: u32,
) -> anyhow::Result<(ats_core::TransitionId, ats_core::JobId)> {
    let (job_id, _) = harness.seed_job("Staff Engineer").await?;
    let application_id = harness.seed_application(job_id).await?;
    let actor = harness.directory.job_creator(&job_id).await?;

    let fast_stage: Stage =
        harness.registry.create_custom(job_id, "Fast SLA", 1, Some(sla_hours), None).await?;
    harness.workflow.advance(application_id, fast_stage.id, actor, None).await?;

    // `is_overdue` requires a strictly-past deadline; give a zero-hour
    // SLA a moment to fall behind `now`.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let transition = harness
        .workflow
        .current_transition(application_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("expected an open transition"))?;

    Ok((transition.id, job_id))
}

async fn run_demo(harness: &Harness) -> anyhow::Result<()> {
    println!("== create_default_stages ==");
    let (job_id, stages) = harness.seed_job("Staff Engineer").await?;
    let actor = harness.directory.job_creator(&job_id).await?;
    for stage in &stages {
        println!("  {:>2}. {} (sla {}h)", stage.order_index, stage.name, stage.sla_hours);
    }

    println!("== advance ==");
    let application_id = harness.seed_application(job_id).await?;
    harness.workflow.advance(application_id, stages[0].id, actor, None).await?;
    let transition = harness.workflow.advance(application_id, stages[1].id, actor, Some("phone screen passed".into())).await?;
    println!("  application {application_id} now in stage {}", transition.stage_id);

    println!("== timeline ==");
    for entry in harness.workflow.timeline(application_id).await? {
        println!("  stage {} entered_at={}", entry.transition.stage_id, entry.transition.entered_at);
    }

    println!("== check_overdue / escalate ==");
    let (transition_id, _) = seed_overdue_transition(harness, 0).await?;
    let overdue = harness.monitor.check_overdue().await?;
    println!("  {} transition(s) currently overdue", overdue.len());
    let escalation = harness.escalations.escalate(transition_id, Some(Severity::Warning)).await?;
    println!("  escalated {} (severity {}) to {}", escalation.id, escalation.severity, escalation.assignee);
    harness.escalations.resolve(escalation.id, escalation.assignee).await?;
    println!("  resolved {}", escalation.id);

    println!("== submit_bulk ==");
    let mut bulk_ids = Vec::new();
    for _ in 0..3 {
        let id = harness.seed_application(job_id).await?;
        harness.workflow.advance(id, stages[0].id, actor, None).await?;
        bulk_ids.push(id);
    }
    let op_id = harness.bulk.submit(bulk_ids, BulkOperation::Approve { reason: None }, actor).await?;
    let progress = loop {
        let progress = harness.bulk.get_progress(op_id)?;
        if progress.status.is_terminal() {
            break progress;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };
    println!("  bulk {} finished: {}/{} succeeded", op_id, progress.successful, progress.total);

    Ok(())
}
