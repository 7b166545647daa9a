use super::common::*;
use std::sync::Arc;

use crate::marketplace::domain::{JobPatch, JobStatus};
use crate::marketplace::repository::JobRepository;
use crate::marketplace::{InMemoryProfileRepository, MatchingService};

#[test]
fn plumbing_worker_sees_the_plumbing_job() {
    let fixture = Fixture::new();
    let job = fixture.seed_job(new_job("client-1", "Fix kitchen sink", &["Plumbing", "Wiring"]));
    fixture.seed_job(new_job("client-2", "Paint the hall", &["Painting"]));

    let feed = fixture
        .marketplace
        .matching
        .feed(&user("worker-1"), &tags(&["Plumbing"]));

    assert_eq!(feed, vec![job]);
}

#[test]
fn feed_never_contains_the_viewers_own_jobs() {
    let fixture = Fixture::new();
    fixture.seed_job(new_job("viewer", "Own plumbing job", &["Plumbing"]));
    fixture.seed_job(new_job("viewer", "Own untagged job", &[]));
    fixture.seed_job(new_job("client-1", "Other plumbing job", &["Plumbing"]));

    for skills in [vec![], vec!["Plumbing"], vec!["Plumbing", "Cooking"], vec!["Cooking"]] {
        let feed = fixture
            .marketplace
            .matching
            .feed(&user("viewer"), &tags(&skills));
        assert!(
            feed.iter().all(|job| job.client_id != user("viewer")),
            "own job leaked for skills {skills:?}"
        );
    }
}

#[test]
fn empty_skill_set_lists_every_available_job_newest_first() {
    let fixture = Fixture::new();
    let first = fixture.seed_job(new_job("client-1", "Cook dinner", &["Cooking"]));
    let second = fixture.seed_job(new_job("client-2", "Walk the dog", &[]));
    let taken = fixture.seed_job(new_job("client-3", "Deep clean", &["Cleaning"]));
    fixture
        .jobs
        .update(
            &taken.id,
            JobPatch {
                status: Some(JobStatus::Cancelled),
                ..JobPatch::default()
            },
        )
        .expect("update succeeds");

    let feed = fixture
        .marketplace
        .matching
        .feed(&user("worker-1"), &tags(&[]));

    assert_eq!(feed, vec![second, first]);
}

#[test]
fn feed_excludes_jobs_without_overlapping_tags() {
    let fixture = Fixture::new();
    fixture.seed_job(new_job("client-1", "Walk the dog", &[]));
    fixture.seed_job(new_job("client-1", "Cook dinner", &["Cooking"]));

    let feed = fixture
        .marketplace
        .matching
        .feed(&user("worker-1"), &tags(&["Plumbing"]));

    assert!(feed.is_empty());
}

#[test]
fn feed_degrades_to_empty_when_jobs_are_unavailable() {
    let service = MatchingService::new(
        Arc::new(UnavailableJobRepository),
        Arc::new(InMemoryProfileRepository::default()),
    );

    assert!(service
        .feed(&user("worker-1"), &tags(&["Plumbing"]))
        .is_empty());
    assert!(service
        .jobs_in_same_locality(&user("worker-1"), Some("Pune"), None)
        .is_empty());
}

#[test]
fn marketplace_feed_uses_stored_skills() {
    let fixture = Fixture::new();
    let plumbing = fixture.seed_job(new_job("client-1", "Fix tap", &["Plumbing"]));
    fixture.seed_job(new_job("client-2", "Cook lunch", &["Cooking"]));
    fixture
        .marketplace
        .profiles
        .update_skills(&user("worker-1"), ["Plumbing"])
        .expect("skills stored");

    assert_eq!(fixture.marketplace.feed_for(&user("worker-1")), vec![plumbing]);
}

#[test]
fn local_feed_matches_city_or_locality_case_insensitively() {
    let fixture = Fixture::new();
    fixture.seed_profile(profile("client-pune", Some("Pune"), Some("Kothrud")));
    fixture.seed_profile(profile("client-mumbai", Some("Mumbai"), Some("Andheri")));
    fixture.seed_profile(profile("client-blank", Some("  "), None));
    let pune = fixture.seed_job(new_job("client-pune", "Garden weeding", &["Gardening"]));
    fixture.seed_job(new_job("client-mumbai", "Laundry pickup", &["Laundry"]));
    fixture.seed_job(new_job("client-blank", "Babysitting", &["Child Care"]));
    fixture.seed_job(new_job("client-unknown", "Tutoring", &["Tutoring"]));

    let by_city = fixture.marketplace.matching.jobs_in_same_locality(
        &user("worker-1"),
        Some("pune"),
        None,
    );
    assert_eq!(by_city, vec![pune.clone()]);

    let by_locality = fixture.marketplace.matching.jobs_in_same_locality(
        &user("worker-1"),
        Some(""),
        Some("KOTHRUD"),
    );
    assert_eq!(by_locality, vec![pune]);

    let blank = fixture.marketplace.matching.jobs_in_same_locality(
        &user("worker-1"),
        Some(" "),
        None,
    );
    assert!(blank.is_empty());
}

#[test]
fn local_feed_for_uses_the_viewers_profile() {
    let fixture = Fixture::new();
    fixture.seed_profile(profile("worker-1", Some("Pune"), None));
    fixture.seed_profile(profile("client-pune", Some("Pune"), None));
    let job = fixture.seed_job(new_job("client-pune", "Garden weeding", &[]));

    assert_eq!(fixture.marketplace.local_feed_for(&user("worker-1")), vec![job]);
    assert!(fixture.marketplace.local_feed_for(&user("stranger")).is_empty());
}

#[test]
fn nearby_feed_filters_by_poster_distance() {
    let fixture = Fixture::new();
    let mut near = profile("client-near", None, None);
    near.latitude = Some(12.9716);
    near.longitude = Some(77.5946);
    let mut far = profile("client-far", None, None);
    far.latitude = Some(13.0827);
    far.longitude = Some(80.2707);
    let mut viewer = profile("worker-1", None, None);
    viewer.latitude = Some(12.9780);
    viewer.longitude = Some(77.5990);
    fixture.seed_profile(near);
    fixture.seed_profile(far);
    fixture.seed_profile(viewer);

    let close = fixture.seed_job(new_job("client-near", "Fix fan", &["Electrical Work"]));
    fixture.seed_job(new_job("client-far", "Fix fan too", &["Electrical Work"]));

    assert_eq!(
        fixture.marketplace.nearby_feed_for(&user("worker-1"), None),
        vec![close]
    );
    assert_eq!(
        fixture
            .marketplace
            .nearby_feed_for(&user("worker-1"), Some(500.0))
            .len(),
        2
    );
    assert!(fixture
        .marketplace
        .nearby_feed_for(&user("no-coordinates"), None)
        .is_empty());
}
