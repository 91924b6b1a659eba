use super::*;
use ats_adapters::{FakeAuditLogger, FakeNotificationDispatcher, InMemoryDirectory};
use ats_core::{Application, CandidateId, Contact, FakeClock, JobId, Stage, StageTransition, StatusHistoryEntry, UserId};
use ats_storage::InMemoryStore;

struct Fixture {
    monitor: SLAMonitor<FakeClock>,
    clock: FakeClock,
    store: Arc<InMemoryStore>,
    transition_id: ats_core::TransitionId,
}

async fn fixture(sla_hours: u32) -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let clock = FakeClock::new();
    clock.set_epoch_ms(0);

    let directory = Arc::new(InMemoryDirectory::new());
    let dispatcher = Arc::new(FakeNotificationDispatcher::new());
    let audit = Arc::new(FakeAuditLogger::new());

    let job_id = JobId::new();
    let hiring_manager = UserId::new();
    directory.put_job(job_id, hiring_manager, "Staff Engineer");
    directory.put_user(hiring_manager, Contact::new("m@example.com", "Morgan Manager"));
    let candidate_id = CandidateId::new();
    directory.put_candidate(candidate_id, Contact::new("k@example.com", "Kay Candidate"));

    let stage = Stage::builder().job_id(job_id).sla_hours(sla_hours).build();
    store.put_stage(stage.clone()).await.unwrap();

    let application = Application::builder().job_id(job_id).candidate_id(candidate_id).build();
    let application_id = application.id;
    store.put_application(application).await.unwrap();

    let transition =
        StageTransition::open(ats_core::TransitionId::new(), application_id, stage.id, 0, u64::from(sla_hours) * 3_600_000, None);
    let transition_id = transition.id;
    store
        .advance_transition(
            &application_id,
            None,
            transition,
            "applied".into(),
            StatusHistoryEntry::new(ats_core::HistoryId::new(), application_id, None, "applied", UserId::new(), None, 0),
        )
        .await
        .unwrap();

    let config = SlaConfig::default();
    let escalation_service =
        EscalationService::new(store.clone(), clock.clone(), directory, dispatcher, audit, config.clone());
    let monitor = SLAMonitor::new(store.clone(), clock.clone(), escalation_service, config);

    Fixture { monitor, clock, store, transition_id }
}

#[tokio::test]
async fn check_overdue_reports_without_escalating() {
    let f = fixture(24).await;
    f.clock.set_epoch_ms(25 * 3_600_000);

    let overdue = f.monitor.check_overdue().await.unwrap();
    assert_eq!(overdue.len(), 1);

    let transition = f.store.get_transition(&f.transition_id).await.unwrap();
    assert!(!transition.is_escalated, "check_overdue must not escalate");
}

#[tokio::test]
async fn scan_once_escalates_and_is_exactly_once() {
    let f = fixture(24).await;
    f.clock.set_epoch_ms(23 * 3_600_000);
    assert_eq!(f.monitor.scan_once().await.unwrap(), 0);

    f.clock.set_epoch_ms(25 * 3_600_000);
    assert_eq!(f.monitor.scan_once().await.unwrap(), 1);

    let transition = f.store.get_transition(&f.transition_id).await.unwrap();
    assert!(transition.is_escalated);

    // a subsequent scan sees it filtered out of list_open_overdue.
    f.clock.set_epoch_ms(200 * 3_600_000);
    assert_eq!(f.monitor.scan_once().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn run_exits_promptly_once_cancelled() {
    let f = fixture(24).await;
    let cancel = f.monitor.cancellation_token();

    let handle = tokio::spawn(f.monitor.run());
    cancel.cancel();

    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("run() should return promptly after cancellation")
        .unwrap();
}
