use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{ApplicationDecision, ApplicationId, JobDraft, JobId, JobStatus, UserId};
use super::applications::ApplicationServiceError;
use super::jobs::JobServiceError;
use super::profiles::ProfileUpdate;
use super::repository::{ApplicationRepository, JobRepository, ProfileRepository};
use super::tagging::TagRequest;
use super::Marketplace;
use crate::error::AppError;

type Shared<J, A, P> = State<Arc<Marketplace<J, A, P>>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SkillsPayload {
    pub(crate) skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyPayload {
    pub(crate) worker_id: UserId,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusPayload {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionPayload {
    pub(crate) decision: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NearbyQuery {
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
}

/// Router builder exposing the marketplace over HTTP.
pub fn marketplace_router<J, A, P>(marketplace: Arc<Marketplace<J, A, P>>) -> Router
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/profiles/:user_id",
            get(profile_handler::<J, A, P>).put(profile_update_handler::<J, A, P>),
        )
        .route(
            "/api/v1/profiles/:user_id/skills",
            put(skills_handler::<J, A, P>),
        )
        .route("/api/v1/users/:user_id/feed", get(feed_handler::<J, A, P>))
        .route(
            "/api/v1/users/:user_id/feed/local",
            get(local_feed_handler::<J, A, P>),
        )
        .route(
            "/api/v1/users/:user_id/feed/nearby",
            get(nearby_feed_handler::<J, A, P>),
        )
        .route("/api/v1/users/:user_id/jobs", get(user_jobs_handler::<J, A, P>))
        .route("/api/v1/jobs", post(post_job_handler::<J, A, P>))
        .route(
            "/api/v1/jobs/:job_id/status",
            post(job_status_handler::<J, A, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications",
            post(apply_handler::<J, A, P>).get(job_applications_handler::<J, A, P>),
        )
        .route(
            "/api/v1/workers/:worker_id/applications",
            get(worker_applications_handler::<J, A, P>),
        )
        .route(
            "/api/v1/workers/:worker_id/schedule",
            get(schedule_handler::<J, A, P>),
        )
        .route(
            "/api/v1/applications/:application_id/decision",
            post(decision_handler::<J, A, P>),
        )
        .route("/api/v1/tags/suggest", post(suggest_tags_handler::<J, A, P>))
        .with_state(marketplace)
}

pub(crate) async fn profile_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(user_id): Path<String>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let profile = marketplace.profiles.ensure_profile(&UserId(user_id))?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}

pub(crate) async fn profile_update_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(user_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let profile = marketplace
        .profiles
        .update_details(&UserId(user_id), update)?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}

pub(crate) async fn skills_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(user_id): Path<String>,
    Json(payload): Json<SkillsPayload>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let profile = marketplace
        .profiles
        .update_skills(&UserId(user_id), payload.skills)?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}

pub(crate) async fn feed_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(user_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.feed_for(&UserId(user_id))).into_response()
}

pub(crate) async fn local_feed_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(user_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.local_feed_for(&UserId(user_id))).into_response()
}

pub(crate) async fn nearby_feed_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(user_id): Path<String>,
    Query(query): Query<NearbyQuery>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.nearby_feed_for(&UserId(user_id), query.radius_km)).into_response()
}

pub(crate) async fn user_jobs_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(user_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.jobs.jobs_for_user(&UserId(user_id))).into_response()
}

pub(crate) async fn post_job_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Json(draft): Json<JobDraft>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let job = marketplace.jobs.post_job(draft)?;
    Ok((StatusCode::CREATED, Json(job)).into_response())
}

pub(crate) async fn job_status_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(job_id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let next: JobStatus = payload.status.parse().map_err(JobServiceError::from)?;
    let job = marketplace.jobs.transition(&JobId(job_id), next)?;
    Ok((StatusCode::OK, Json(job)).into_response())
}

pub(crate) async fn apply_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(job_id): Path<String>,
    Json(payload): Json<ApplyPayload>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let receipt =
        marketplace
            .applications
            .apply(&JobId(job_id), &payload.worker_id, payload.message)?;
    Ok((StatusCode::CREATED, Json(receipt)).into_response())
}

pub(crate) async fn job_applications_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.applications.applications_for_job(&JobId(job_id))).into_response()
}

pub(crate) async fn worker_applications_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(worker_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.applications.list_for_worker(&UserId(worker_id))).into_response()
}

pub(crate) async fn schedule_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(worker_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.applications.build_schedule(&UserId(worker_id))).into_response()
}

pub(crate) async fn decision_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Path(application_id): Path<String>,
    Json(payload): Json<DecisionPayload>,
) -> Result<Response, AppError>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    let decision: ApplicationDecision = payload
        .decision
        .parse()
        .map_err(ApplicationServiceError::from)?;
    let application = marketplace
        .applications
        .decide(&ApplicationId(application_id), decision)?;
    Ok((StatusCode::OK, Json(application)).into_response())
}

pub(crate) async fn suggest_tags_handler<J, A, P>(
    State(marketplace): Shared<J, A, P>,
    Json(request): Json<TagRequest>,
) -> Response
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
{
    Json(marketplace.tags.suggest(&request)).into_response()
}
