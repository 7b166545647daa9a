use super::common::*;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::marketplace::domain::{JobDraft, JobId, JobStatus};
use crate::marketplace::error::{ErrorKind, ValidationError};
use crate::marketplace::{JobBoardService, JobServiceError};

fn draft() -> JobDraft {
    JobDraft {
        client_id: user("client-1"),
        title: "  Fix leaking tap ".to_string(),
        description: "Kitchen tap drips all night".to_string(),
        location: "Kothrud, Pune".to_string(),
        amount: 450.0,
        duration: Some(" 2 hours ".to_string()),
        scheduled_date: NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"),
        scheduled_time: NaiveTime::from_hms_opt(9, 30, 0),
        required_tags: vec![
            "Plumbing".to_string(),
            " Plumbing ".to_string(),
            "".to_string(),
        ],
    }
}

#[test]
fn post_job_normalizes_and_publishes() {
    let fixture = Fixture::new();

    let job = fixture
        .marketplace
        .jobs
        .post_job(draft())
        .expect("post succeeds");

    assert_eq!(job.title, "Fix leaking tap");
    assert_eq!(job.status, JobStatus::Available);
    assert_eq!(job.scheduled_date, "2024-01-02");
    assert_eq!(job.scheduled_time.as_deref(), Some("09:30"));
    assert_eq!(job.duration.as_deref(), Some("2 hours"));
    assert_eq!(job.required_tags, tags(&["Plumbing"]));
    assert_eq!(job.worker_id, None);
    assert_eq!(job.created_at, now());
}

#[test]
fn post_job_rejects_blank_fields_and_bad_amounts() {
    let fixture = Fixture::new();

    let mut blank_title = draft();
    blank_title.title = "   ".to_string();
    let error = fixture
        .marketplace
        .jobs
        .post_job(blank_title)
        .expect_err("blank title");
    assert!(matches!(
        error,
        JobServiceError::Validation(ValidationError::BlankField { field: "title" })
    ));
    assert_eq!(error.kind(), ErrorKind::ValidationFailure);

    for amount in [0.0, -10.0, f64::NAN] {
        let mut bad_amount = draft();
        bad_amount.amount = amount;
        assert!(matches!(
            fixture.marketplace.jobs.post_job(bad_amount),
            Err(JobServiceError::Validation(ValidationError::InvalidAmount(_)))
        ));
    }

    assert!(fixture.marketplace.jobs.jobs_for_user(&user("client-1")).is_empty());
}

#[test]
fn transitions_follow_the_job_lifecycle() {
    let fixture = Fixture::new();
    let job = fixture
        .marketplace
        .jobs
        .post_job(draft())
        .expect("post succeeds");
    let board = &fixture.marketplace.jobs;

    let error = board
        .transition(&job.id, JobStatus::InProgress)
        .expect_err("cannot skip assignment");
    assert!(matches!(
        error,
        JobServiceError::Validation(ValidationError::IllegalTransition {
            from: JobStatus::Available,
            to: JobStatus::InProgress,
        })
    ));

    let cancelled = board
        .transition(&job.id, JobStatus::Cancelled)
        .expect("cancel succeeds");
    assert_eq!(cancelled.status, JobStatus::Cancelled);

    assert!(board.transition(&job.id, JobStatus::Cancelled).is_err());
}

#[test]
fn assignment_only_happens_through_acceptance() {
    let fixture = Fixture::new();
    let job = fixture.seed_job(new_job("client-1", "Fix tap", &["Plumbing"]));

    assert!(matches!(
        fixture.marketplace.jobs.transition(&job.id, JobStatus::Assigned),
        Err(JobServiceError::Validation(ValidationError::IllegalTransition { .. }))
    ));
}

#[test]
fn unknown_job_is_not_found() {
    let fixture = Fixture::new();

    let error = fixture
        .marketplace
        .jobs
        .transition(&JobId::new("job-missing"), JobStatus::Cancelled)
        .expect_err("missing job");

    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[test]
fn job_store_failures_surface_on_writes_and_soften_on_reads() {
    let board = JobBoardService::new(Arc::new(UnavailableJobRepository), clock());

    let error = board.post_job(draft()).expect_err("store offline");
    assert_eq!(error.kind(), ErrorKind::DependencyFailure);
    assert!(board.jobs_for_user(&user("client-1")).is_empty());
}

#[test]
fn jobs_for_user_lists_posted_jobs_newest_first() {
    let fixture = Fixture::new();
    let older = fixture.seed_job(new_job("client-1", "Older", &[]));
    let newer = fixture.seed_job(new_job("client-1", "Newer", &[]));
    fixture.seed_job(new_job("client-2", "Someone else", &[]));

    assert_eq!(
        fixture.marketplace.jobs.jobs_for_user(&user("client-1")),
        vec![newer, older]
    );
}
