//! Bounty Board Server
//!
//! HTTP surface over the board. Authorization is the business of the
//! deployment's gateway; handlers take caller identities as request data
//! and focus on lifecycle state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::board::BountyBoard;
use crate::error::{Error, Result};
use crate::escrow::EscrowDirectory;
use crate::types::{Address, Amount, RepoId};

pub struct AppState {
    pub board: Arc<BountyBoard>,
    pub escrows: EscrowDirectory,
    pub started_at: std::time::Instant,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/repos", get(list_repos_handler).post(add_repo_handler))
        .route("/repos/:id", delete(remove_repo_handler))
        .route("/bounties", post(add_bounties_handler))
        .route("/bounties/remove", post(remove_bounties_handler))
        .route("/bounties/update", post(update_bounty_handler))
        .route("/issues/:repo/:number", get(get_issue_handler))
        .route(
            "/applications",
            post(request_assignment_handler),
        )
        .route("/applications/:repo/:number", get(list_applications_handler))
        .route("/applications/review", post(review_application_handler))
        .route("/submissions/review", post(review_submission_handler))
        .route(
            "/settings",
            get(get_settings_handler).post(change_settings_handler),
        )
        .route(
            "/curations",
            get(list_curations_handler).post(curate_handler),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub uptime_secs: u64,
    pub version: String,
    pub repos: usize,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        uptime_secs: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        repos: state.board.repo_count(),
    })
}

// ============================================================================
// REPOS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddRepoRequest {
    pub id: RepoId,
}

async fn list_repos_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let repos = state.board.repos();
    Json(json!({ "count": repos.len(), "repos": repos }))
}

async fn add_repo_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddRepoRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(state.board.add_repo(request.id))
}

async fn remove_repo_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(state.board.remove_repo(&RepoId::from(id)))
}

// ============================================================================
// BOUNTIES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddBountiesRequest {
    pub repo_ids: Vec<RepoId>,
    pub issue_numbers: Vec<u64>,
    pub bounty_sizes: Vec<Amount>,
    pub deadlines: Vec<DateTime<Utc>>,
    pub token_types: Vec<u16>,
    pub token_contracts: Vec<Address>,
    pub metadata: String,
    pub description: String,
    #[serde(default)]
    pub deposit: Amount,
    /// When false, the bounties stay open: first qualified submission wins
    /// and assignment review is disabled.
    #[serde(default = "default_assignable")]
    pub assignable: bool,
}

fn default_assignable() -> bool {
    true
}

async fn add_bounties_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddBountiesRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let board = &state.board;
    let result = if request.assignable {
        board.add_bounties(
            &request.repo_ids,
            &request.issue_numbers,
            &request.bounty_sizes,
            &request.deadlines,
            &request.token_types,
            &request.token_contracts,
            &request.metadata,
            &request.description,
            request.deposit,
        )
    } else {
        board.add_bounties_no_assignment(
            &request.repo_ids,
            &request.issue_numbers,
            &request.bounty_sizes,
            &request.deadlines,
            &request.token_types,
            &request.token_contracts,
            &request.metadata,
            &request.description,
            request.deposit,
        )
    };
    reply(result)
}

#[derive(Debug, Deserialize)]
pub struct RemoveBountiesRequest {
    pub repo_ids: Vec<RepoId>,
    pub issue_numbers: Vec<u64>,
    pub reason: String,
}

async fn remove_bounties_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RemoveBountiesRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(
        state
            .board
            .remove_bounties(&request.repo_ids, &request.issue_numbers, &request.reason),
    )
}

#[derive(Debug, Deserialize)]
pub struct UpdateBountyRequest {
    pub repo_id: RepoId,
    pub issue_number: u64,
    pub data: String,
    pub new_deadline: DateTime<Utc>,
    pub description: String,
}

async fn update_bounty_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateBountyRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(state.board.update_bounty(
        &request.repo_id,
        request.issue_number,
        &request.data,
        request.new_deadline,
        &request.description,
    ))
}

async fn get_issue_handler(
    State(state): State<Arc<AppState>>,
    Path((repo, number)): Path<(String, u64)>,
) -> (StatusCode, Json<serde_json::Value>) {
    let repo_id = RepoId::from(repo);
    match state.board.get_issue(&repo_id, number) {
        Ok(issue) => {
            let metadata = state.board.issue_metadata(&repo_id, number).ok();
            (
                StatusCode::OK,
                Json(json!({ "ok": true, "issue": issue, "metadata": metadata })),
            )
        }
        Err(e) => error_reply(e),
    }
}

// ============================================================================
// ASSIGNMENT
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RequestAssignmentRequest {
    pub repo_id: RepoId,
    pub issue_number: u64,
    pub applicant: Address,
    pub pitch: String,
}

async fn request_assignment_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RequestAssignmentRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(state.board.request_assignment(
        &request.repo_id,
        request.issue_number,
        request.applicant,
        &request.pitch,
    ))
}

async fn list_applications_handler(
    State(state): State<Arc<AppState>>,
    Path((repo, number)): Path<(String, u64)>,
) -> (StatusCode, Json<serde_json::Value>) {
    let repo_id = RepoId::from(repo);
    let result = state.board.applicants_len(&repo_id, number).and_then(|len| {
        (0..len)
            .map(|i| state.board.applicant(&repo_id, number, i))
            .collect::<Result<Vec<_>>>()
    });
    reply(result)
}

#[derive(Debug, Deserialize)]
pub struct ReviewApplicationRequest {
    pub repo_id: RepoId,
    pub issue_number: u64,
    pub applicant: Address,
    pub comment: String,
    pub accept: bool,
}

async fn review_application_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReviewApplicationRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(state.board.review_application(
        &request.repo_id,
        request.issue_number,
        request.applicant,
        &request.comment,
        request.accept,
    ))
}

// ============================================================================
// SUBMISSIONS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReviewSubmissionRequest {
    pub repo_id: RepoId,
    pub issue_number: u64,
    pub submission_index: usize,
    pub accept: bool,
    pub comment: String,
    #[serde(default)]
    pub payout: Vec<Amount>,
}

async fn review_submission_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReviewSubmissionRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(state.board.review_submission(
        &request.repo_id,
        request.issue_number,
        request.submission_index,
        request.accept,
        &request.comment,
        &request.payout,
    ))
}

// ============================================================================
// SETTINGS
// ============================================================================

async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "settings": state.board.settings() }))
}

#[derive(Debug, Deserialize)]
pub struct ChangeSettingsRequest {
    pub xp_multipliers: Vec<u64>,
    pub experience_levels: Vec<String>,
    pub base_rate: u64,
    pub bounty_deadline_offset: u64,
    pub bounty_currency: Option<Address>,
    /// Address of the escrow to allocate future bounties through. Must be
    /// known to this deployment's escrow directory.
    pub bounty_allocator: Address,
}

async fn change_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChangeSettingsRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(allocator) = state.escrows.resolve(&request.bounty_allocator) else {
        warn!(
            "Settings change with unknown allocator {}",
            request.bounty_allocator
        );
        return error_reply(Error::InvalidAllocator);
    };
    reply(state.board.change_bounty_settings(
        request.xp_multipliers,
        request.experience_levels,
        request.base_rate,
        request.bounty_deadline_offset,
        request.bounty_currency,
        allocator,
    ))
}

// ============================================================================
// CURATION
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurateRequest {
    pub priorities: Vec<u64>,
    pub description_indices: Vec<usize>,
    #[serde(default)]
    pub issue_descriptions: String,
    pub description: String,
    pub repo_ids: Vec<RepoId>,
    pub issue_numbers: Vec<u64>,
    pub curation_id: u64,
}

async fn curate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CurateRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    reply(state.board.curate_issues(
        &request.priorities,
        &request.description_indices,
        &request.issue_descriptions,
        &request.description,
        &request.repo_ids,
        &request.issue_numbers,
        request.curation_id,
    ))
}

async fn list_curations_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "curations": state.board.curations() }))
}

// ============================================================================
// PLUMBING
// ============================================================================

fn reply<T: Serialize>(result: Result<T>) -> (StatusCode, Json<serde_json::Value>) {
    match result {
        Ok(value) => (StatusCode::OK, Json(json!({ "ok": true, "result": value }))),
        Err(e) => error_reply(e),
    }
}

fn error_reply(error: Error) -> (StatusCode, Json<serde_json::Value>) {
    warn!("Request failed: {}", error);
    (
        error_status(&error),
        Json(json!({ "ok": false, "error": error.to_string() })),
    )
}

fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::AlreadyExists(_) => StatusCode::CONFLICT,
        Error::Vault(_) | Error::Escrow(_) => StatusCode::BAD_GATEWAY,
        Error::LengthMismatch
        | Error::LengthExceeded(_)
        | Error::InvalidTokenConfig(_)
        | Error::DepositMismatch { .. }
        | Error::InvalidAllocator => StatusCode::UNPROCESSABLE_ENTITY,
        Error::DuplicateApplication
        | Error::OpenBountyNotAssignable
        | Error::AlreadyFulfilled
        | Error::AlreadyRemoved => StatusCode::CONFLICT,
    }
}

/// Run the server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting Bounty Board server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
