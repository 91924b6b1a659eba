use super::*;
use ats_adapters::{FakeAuditLogger, FakeNotificationDispatcher, InMemoryDirectory};
use ats_core::{Application, CandidateId, Contact, FakeClock, JobId, Stage};
use ats_storage::InMemoryStore;

struct Fixture {
    engine: WorkflowEngine<FakeClock>,
    clock: FakeClock,
    dispatcher: FakeNotificationDispatcher,
    store: Arc<InMemoryStore>,
    job_id: JobId,
    stages: Vec<Stage>,
    application_id: ApplicationId,
    recruiter: UserId,
}

async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let clock = FakeClock::new();
    clock.set_epoch_ms(0);

    let directory = Arc::new(InMemoryDirectory::new());
    let dispatcher = FakeNotificationDispatcher::new();
    let audit = Arc::new(FakeAuditLogger::new());

    let job_id = JobId::new();
    let hiring_manager = UserId::new();
    directory.put_job(job_id, hiring_manager, "Staff Engineer");
    directory.put_user(hiring_manager, Contact::new("m@example.com", "Morgan Manager"));

    let recruiter = UserId::new();
    directory.put_user(recruiter, Contact::new("r@example.com", "Ada Recruiter"));

    let candidate_id = CandidateId::new();
    directory.put_candidate(candidate_id, Contact::new("k@example.com", "Kay Candidate"));

    let registry = crate::stage_registry::StageRegistry::new(store.clone());
    let stages = registry.create_defaults(job_id).await.unwrap();

    let application = Application::new(ApplicationId::new(), candidate_id, job_id, 0);
    let application_id = application.id;
    store.put_application(application).await.unwrap();

    let engine = WorkflowEngine::new(store.clone(), clock.clone(), directory, Arc::new(dispatcher.clone()), audit);

    Fixture { engine, clock, dispatcher, store, job_id, stages, application_id, recruiter }
}

#[tokio::test]
async fn scenario_1_single_advance() {
    let f = fixture().await;
    f.clock.set_epoch_ms(10 * 3_600_000); // t = 10:00

    let screening = &f.stages[1]; // "Initial Screening", 48h SLA
    let transition =
        f.engine.advance(f.application_id, screening.id, f.recruiter, None).await.unwrap();

    assert_eq!(transition.entered_at, 10 * 3_600_000);
    assert_eq!(transition.sla_deadline, 10 * 3_600_000 + 48 * 3_600_000);
    assert!(transition.is_open());

    let app = f.store.get_application(&f.application_id).await.unwrap();
    assert_eq!(app.status, "initial_screening");

    let history = f.store.list_history_for_application(&f.application_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].previous_status.as_deref(), Some("applied"));
    assert_eq!(history[0].new_status, "initial_screening");
    assert_eq!(history[0].changed_by, f.recruiter);
}

#[tokio::test]
async fn scenario_2_idempotent_advance() {
    let f = fixture().await;
    let screening = &f.stages[1];

    let first = f.engine.advance(f.application_id, screening.id, f.recruiter, None).await.unwrap();
    let second = f.engine.advance(f.application_id, screening.id, f.recruiter, None).await.unwrap();

    assert_eq!(first.id, second.id);
    let history = f.store.list_history_for_application(&f.application_id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn advance_closes_prior_transition_on_move() {
    let f = fixture().await;
    let applied = f.store.open_transition_of(&f.application_id).await.unwrap();
    assert!(applied.is_none(), "application has no transition until first advance");

    let screening = &f.stages[1];
    f.clock.set_epoch_ms(1_000);
    let first = f.engine.advance(f.application_id, screening.id, f.recruiter, None).await.unwrap();

    f.clock.set_epoch_ms(2_000);
    let assessment = &f.stages[2];
    let second = f.engine.advance(f.application_id, assessment.id, f.recruiter, None).await.unwrap();

    let transitions = f.store.list_transitions_for_application(&f.application_id).await.unwrap();
    assert_eq!(transitions.len(), 2);
    let closed = transitions.iter().find(|t| t.id == first.id).unwrap();
    assert_eq!(closed.exited_at, Some(2_000));
    assert!(second.is_open());
}

#[tokio::test]
async fn unknown_application_is_rejected() {
    let f = fixture().await;
    let stage = f.stages[0].id;
    let err = f.engine.advance(ApplicationId::new(), stage, f.recruiter, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::ApplicationNotFound));
}

#[tokio::test]
async fn unknown_stage_is_rejected() {
    let f = fixture().await;
    let err =
        f.engine.advance(f.application_id, ats_core::StageId::new(), f.recruiter, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::StageNotFound));
}

#[tokio::test]
async fn inactive_stage_is_rejected() {
    let f = fixture().await;
    let mut inactive = f.stages[1].clone();
    inactive.active = false;
    f.store.put_stage(inactive.clone()).await.unwrap();

    let err = f.engine.advance(f.application_id, inactive.id, f.recruiter, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::StageNotFound));
}

#[tokio::test]
async fn stage_from_another_job_is_rejected() {
    let f = fixture().await;
    let registry = crate::stage_registry::StageRegistry::new(f.store.clone());
    let other_job = JobId::new();
    let other_stages = registry.create_defaults(other_job).await.unwrap();

    let err =
        f.engine.advance(f.application_id, other_stages[0].id, f.recruiter, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::StageNotForApplicationJob));
}

#[tokio::test]
async fn advance_to_interview_notifies_candidate_and_hiring_manager() {
    let f = fixture().await;
    let interview = f.stages.iter().find(|s| s.name == "Interview").unwrap();
    f.engine.advance(f.application_id, interview.id, f.recruiter, None).await.unwrap();

    // default stage canonicalization yields "interview" which is a triggering status.
    let sent = f.dispatcher.sent();
    assert_eq!(sent.len(), 2);
}

#[tokio::test]
async fn timeline_reports_duration_only_for_closed_transitions() {
    let f = fixture().await;
    f.clock.set_epoch_ms(0);
    f.engine.advance(f.application_id, f.stages[0].id, f.recruiter, None).await.unwrap();
    f.clock.set_epoch_ms(3_600_000 * 5);
    f.engine.advance(f.application_id, f.stages[1].id, f.recruiter, None).await.unwrap();

    let timeline = f.engine.timeline(f.application_id).await.unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].duration_hours, Some(5.0));
    assert_eq!(timeline[1].duration_hours, None);
}

#[tokio::test]
async fn applications_in_stage_finds_only_open_matches() {
    let f = fixture().await;
    f.engine.advance(f.application_id, f.stages[0].id, f.recruiter, None).await.unwrap();

    let in_stage = f.engine.applications_in_stage(f.job_id, "Applied").await.unwrap();
    assert_eq!(in_stage.len(), 1);
    assert_eq!(in_stage[0].id, f.application_id);

    let elsewhere = f.engine.applications_in_stage(f.job_id, "Decision").await.unwrap();
    assert!(elsewhere.is_empty());
}
