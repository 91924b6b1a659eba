use super::*;
use ats_adapters::{FakeAuditLogger, FakeNotificationDispatcher, InMemoryDirectory};
use ats_core::{Application, CandidateId, Contact, FakeClock, JobId};
use ats_storage::InMemoryStore;

struct Fixture {
    coordinator: BulkCoordinator<FakeClock>,
    store: Arc<InMemoryStore>,
    recruiter: UserId,
}

async fn wait_terminal(coordinator: &BulkCoordinator<FakeClock>, op_id: BulkOpId) -> BulkProgress {
    for _ in 0..10_000 {
        let progress = coordinator.get_progress(op_id).unwrap();
        if progress.status.is_terminal() {
            return progress;
        }
        tokio::task::yield_now().await;
    }
    panic!("bulk operation {op_id} never reached a terminal state");
}

async fn fixture() -> (Fixture, Vec<ApplicationId>, ats_core::StageId, ats_core::StageId) {
    let store = Arc::new(InMemoryStore::new());
    let clock = FakeClock::new();
    let directory = Arc::new(InMemoryDirectory::new());
    let dispatcher = Arc::new(FakeNotificationDispatcher::new());
    let audit = Arc::new(FakeAuditLogger::new());

    let job_a = JobId::new();
    let job_b = JobId::new();
    let recruiter = UserId::new();
    directory.put_job(job_a, recruiter, "Staff Engineer");
    directory.put_job(job_b, recruiter, "Support Engineer");
    directory.put_user(recruiter, Contact::new("r@example.com", "Ada Recruiter"));

    let registry = crate::stage_registry::StageRegistry::new(store.clone());
    let stages_a = registry.create_defaults(job_a).await.unwrap();
    let stages_b = registry.create_defaults(job_b).await.unwrap();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let candidate = CandidateId::new();
        directory.put_candidate(candidate, Contact::new("k@example.com", "Kay Candidate"));
        let app = Application::builder().job_id(job_a).candidate_id(candidate).build();
        ids.push(app.id);
        store.put_application(app).await.unwrap();
    }
    // a third application belongs to job_b — targeting it with job_a's
    // stage must fail with StageNotForApplicationJob.
    let candidate = CandidateId::new();
    directory.put_candidate(candidate, Contact::new("k2@example.com", "Kit Candidate"));
    let app_other_job = Application::builder().job_id(job_b).candidate_id(candidate).build();
    ids.push(app_other_job.id);
    store.put_application(app_other_job).await.unwrap();

    let workflow = WorkflowEngine::new(store.clone(), clock.clone(), directory, dispatcher, audit.clone());
    let coordinator =
        BulkCoordinator::new(store.clone(), clock, workflow, audit, BulkRetentionConfig::default());

    (Fixture { coordinator, store, recruiter }, ids, stages_a[1].id, stages_b[1].id)
}

#[tokio::test]
async fn scenario_4_unknown_applications_fail_submission_atomically() {
    let (f, ids, _stage_a, _stage_b) = fixture().await;
    let mut with_unknown = ids.clone();
    let unknown = ApplicationId::new();
    with_unknown.insert(2, unknown);

    let err = f
        .coordinator
        .submit(with_unknown, BulkOperation::MoveToStage { stage_id: _stage_a }, f.recruiter)
        .await
        .unwrap_err();

    match err {
        BulkError::UnknownApplications(missing) => assert_eq!(missing, vec![unknown.to_string()]),
        other => panic!("expected UnknownApplications, got {other:?}"),
    }

    for id in &ids {
        let app = f.store.get_application(id).await.unwrap();
        assert_eq!(app.status, "applied", "untouched on atomic pre-validation failure");
    }
}

#[tokio::test]
async fn scenario_5_partial_failure_completes_with_per_item_error() {
    let (f, ids, stage_a, _stage_b) = fixture().await;

    let op_id = f
        .coordinator
        .submit(ids.clone(), BulkOperation::MoveToStage { stage_id: stage_a }, f.recruiter)
        .await
        .unwrap();

    let progress = wait_terminal(&f.coordinator, op_id).await;

    assert_eq!(progress.status, BulkOpStatus::Completed);
    assert_eq!(progress.total, 3);
    assert_eq!(progress.successful, 2);
    assert_eq!(progress.failed, 1);
    assert_eq!(progress.processed, progress.successful + progress.failed);
    assert_eq!(progress.errors.len(), 1);
    assert_eq!(progress.errors[0].application_id, ids[2]);

    let moved = f.store.get_application(&ids[0]).await.unwrap();
    assert_eq!(moved.status, "initial_screening");
    let untouched = f.store.get_application(&ids[2]).await.unwrap();
    assert_eq!(untouched.status, "applied");
}

#[tokio::test]
async fn set_status_bulk_operation_completes_all_items() {
    let (f, ids, _stage_a, _stage_b) = fixture().await;
    let op_id = f
        .coordinator
        .submit(ids.clone(), BulkOperation::Reject { reason: Some("not a fit".into()) }, f.recruiter)
        .await
        .unwrap();

    let progress = wait_terminal(&f.coordinator, op_id).await;
    assert_eq!(progress.status, BulkOpStatus::Completed);
    assert_eq!(progress.successful, 3);
    assert_eq!(progress.failed, 0);

    for id in &ids {
        let app = f.store.get_application(id).await.unwrap();
        assert_eq!(app.status, "rejected");
    }
}

#[tokio::test]
async fn empty_submission_completes_immediately() {
    let (f, _ids, _stage_a, _stage_b) = fixture().await;
    let op_id = f
        .coordinator
        .submit(Vec::new(), BulkOperation::SetStatus { status: "withdrawn".into() }, f.recruiter)
        .await
        .unwrap();

    let progress = wait_terminal(&f.coordinator, op_id).await;
    assert_eq!(progress.status, BulkOpStatus::Completed);
    assert_eq!(progress.total, 0);
    assert_eq!(progress.progress_percentage(), 0.0);
}

#[tokio::test]
async fn cancel_before_any_item_runs_yields_cancelled_with_nothing_processed() {
    let (f, ids, stage_a, _stage_b) = fixture().await;
    let op_id = f
        .coordinator
        .submit(ids.clone(), BulkOperation::MoveToStage { stage_id: stage_a }, f.recruiter)
        .await
        .unwrap();

    // no `.await` has happened yet on this task since submit() returned,
    // so the spawned worker has not had a chance to run.
    f.coordinator.cancel(op_id).unwrap();

    let progress = wait_terminal(&f.coordinator, op_id).await;
    assert_eq!(progress.status, BulkOpStatus::Cancelled);
    assert_eq!(progress.processed, 0);
}

#[tokio::test]
async fn cancel_unknown_operation_is_rejected() {
    let (f, _ids, _stage_a, _stage_b) = fixture().await;
    let err = f.coordinator.cancel(BulkOpId::new()).unwrap_err();
    assert!(matches!(err, BulkError::OperationNotFound));
}

#[tokio::test]
async fn cancel_terminal_operation_is_rejected() {
    let (f, ids, _stage_a, _stage_b) = fixture().await;
    let op_id = f
        .coordinator
        .submit(ids, BulkOperation::SetStatus { status: "withdrawn".into() }, f.recruiter)
        .await
        .unwrap();
    wait_terminal(&f.coordinator, op_id).await;

    let err = f.coordinator.cancel(op_id).unwrap_err();
    assert!(matches!(err, BulkError::OperationTerminal));
}

#[tokio::test]
async fn cleanup_requires_terminal_state_then_removes_the_record() {
    let (f, ids, stage_a, _stage_b) = fixture().await;
    let op_id = f
        .coordinator
        .submit(ids, BulkOperation::MoveToStage { stage_id: stage_a }, f.recruiter)
        .await
        .unwrap();

    wait_terminal(&f.coordinator, op_id).await;
    f.coordinator.cleanup(op_id).unwrap();

    let err = f.coordinator.get_progress(op_id).unwrap_err();
    assert!(matches!(err, BulkError::OperationNotFound));
}

#[tokio::test]
async fn cleanup_unknown_operation_is_rejected() {
    let (f, _ids, _stage_a, _stage_b) = fixture().await;
    let err = f.coordinator.cleanup(BulkOpId::new()).unwrap_err();
    assert!(matches!(err, BulkError::OperationNotFound));
}

#[tokio::test]
async fn get_progress_unknown_operation_is_rejected() {
    let (f, _ids, _stage_a, _stage_b) = fixture().await;
    let err = f.coordinator.get_progress(BulkOpId::new()).unwrap_err();
    assert!(matches!(err, BulkError::OperationNotFound));
}
