//! Axum route handlers for the Match API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::models::{JobPosting, MatchResult, ScoredJob};
use crate::matching::scorer::{score_jobs, ScoreBreakdown};
use crate::skills::parser::ParsedDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub job: JobPosting,
    #[serde(default)]
    pub resume: Option<ParsedDocument>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    pub scorer_backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub resume: Option<ParsedDocument>,
}

#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub results: Vec<ScoredJob>,
    pub scorer_backend: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Scores one posting. A missing or unparsed résumé scores 0 with no gaps.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Json<MatchResponse> {
    let result = state.scorer.score(&request.job, request.resume.as_ref());
    let breakdown = request
        .resume
        .as_ref()
        .filter(|resume| resume.parsed)
        .and_then(|resume| state.scorer.explain(&request.job, resume));
    debug!(title = %request.job.title, score = result.score, "Job scored");
    Json(MatchResponse {
        result,
        scorer_backend: state.scorer.backend(),
        breakdown,
    })
}

/// POST /api/v1/match/batch
///
/// Scores a list of postings against one résumé, keeping the input order.
pub async fn handle_match_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchMatchRequest>,
) -> Json<BatchMatchResponse> {
    let results = score_jobs(
        state.scorer.as_ref(),
        request.jobs,
        request.resume.as_ref(),
    );
    debug!(jobs = results.len(), "Batch scored");
    Json(BatchMatchResponse {
        results,
        scorer_backend: state.scorer.backend(),
    })
}
