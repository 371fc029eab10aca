//! JSON API and the quote draft page.
//!
//! - `POST /api/v1/recommendations`      advice and indicative estimate for a set of answers
//! - `GET  /api/v1/zones/{postal_code}`  delivery zone of a postal code
//! - `POST /api/v1/quote-drafts`         save answers as a quote draft
//! - `GET  /api/v1/quote-drafts`         most recent drafts (`?limit=`)
//! - `GET  /api/v1/quote-drafts/{id}`    one draft
//! - `GET  /quote-drafts/{id}`           one draft rendered as HTML

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use soundrush_core::advisor::advise;
use soundrush_core::catalog::bundle_lines;
use soundrush_core::config::PricingConfig;
use soundrush_core::domain::answers::Answers;
use soundrush_core::domain::recommendation::Advice;
use soundrush_core::errors::{ApplicationError, DomainError, InterfaceError};
use soundrush_core::flows::{validate_step, QuestionStep};
use soundrush_core::logistics::{classify_zone, plausible_postal_country, Zone};
use soundrush_core::quote::{estimate, QuoteDraft, QuoteDraftId, QuoteEstimate, QuotePrefill};
use soundrush_db::QuoteDraftRepository;
use tera::{Context, Tera};
use tracing::{error, info, warn};
use uuid::Uuid;

const CORRELATION_HEADER: &str = "x-correlation-id";
const DEFAULT_LIST_LIMIT: u32 = 20;
const MAX_LIST_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct ApiState {
    drafts: Arc<dyn QuoteDraftRepository>,
    pricing: Arc<PricingConfig>,
    templates: Arc<Tera>,
}

impl ApiState {
    pub fn new(drafts: Arc<dyn QuoteDraftRepository>, pricing: PricingConfig) -> Self {
        Self { drafts, pricing: Arc::new(pricing), templates: init_templates() }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
    pub detail: String,
    pub correlation_id: String,
}

type ApiRejection = (StatusCode, Json<ApiError>);

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub advice: Advice,
    pub estimate: QuoteEstimate,
}

#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub postal_code: String,
    pub zone: Zone,
    pub label: &'static str,
    pub served: bool,
    pub plausible: bool,
}

#[derive(Debug, Serialize)]
pub struct QuoteDraftResponse {
    pub draft: QuoteDraft,
    pub estimate: QuoteEstimate,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

fn init_templates() -> Arc<Tera> {
    let mut tera = Tera::default();
    if let Err(error) =
        tera.add_raw_template("quote_draft.html", include_str!("../../../templates/quote_draft.html"))
    {
        warn!(
            event_name = "system.templates.invalid",
            correlation_id = "bootstrap",
            error = %error,
            "quote draft template failed to compile"
        );
    }
    Arc::new(tera)
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(create_recommendation))
        .route("/api/v1/zones/{postal_code}", get(lookup_zone))
        .route("/api/v1/quote-drafts", post(create_quote_draft).get(list_quote_drafts))
        .route("/api/v1/quote-drafts/{id}", get(get_quote_draft))
        .route("/quote-drafts/{id}", get(view_quote_draft_page))
        .with_state(state)
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn reject(error: ApplicationError, correlation_id: &str) -> ApiRejection {
    let incomplete =
        matches!(error, ApplicationError::Domain(DomainError::IncompleteAnswers { .. }));
    let interface = error.into_interface(correlation_id);
    let status = match &interface {
        InterfaceError::BadRequest { .. } if incomplete => StatusCode::UNPROCESSABLE_ENTITY,
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(
            event_name = "api.request.failed",
            correlation_id,
            status = status.as_u16(),
            error = %interface,
            "request failed"
        );
    } else {
        warn!(
            event_name = "api.request.rejected",
            correlation_id,
            status = status.as_u16(),
            error = %interface,
            "request rejected"
        );
    }

    (
        status,
        Json(ApiError {
            error: interface.user_message(),
            detail: interface.to_string(),
            correlation_id: correlation_id.to_string(),
        }),
    )
}

fn require_mandatory(answers: &Answers) -> Result<(), ApplicationError> {
    let missing = answers.missing_mandatory();
    if missing.is_empty() {
        return Ok(());
    }
    Err(DomainError::IncompleteAnswers {
        missing: missing.into_iter().map(str::to_string).collect(),
    }
    .into())
}

fn price(answers: &Answers, pricing: &PricingConfig) -> (Advice, QuoteEstimate) {
    let advice = advise(answers);
    let estimate = estimate(&QuotePrefill::from_advice(answers, &advice), pricing);
    (advice, estimate)
}

async fn create_recommendation(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(answers): Json<Answers>,
) -> Result<Json<RecommendationResponse>, ApiRejection> {
    let correlation_id = correlation_id(&headers);
    require_mandatory(&answers).map_err(|error| reject(error, &correlation_id))?;

    let (advice, estimate) = price(&answers, &state.pricing);
    info!(
        event_name = "api.recommendation.created",
        correlation_id = %correlation_id,
        zone = advice.zone.as_str(),
        urgent = advice.urgent,
        speaker_count = advice.recommendation.speaker_count,
        console_tier = advice.recommendation.console_tier.as_str(),
        "recommendation computed"
    );

    Ok(Json(RecommendationResponse { advice, estimate }))
}

async fn lookup_zone(Path(postal_code): Path<String>) -> Json<ZoneResponse> {
    let zone = classify_zone(&postal_code);
    Json(ZoneResponse {
        postal_code: postal_code.trim().to_string(),
        zone,
        label: zone.label(),
        served: zone.is_served(),
        plausible: plausible_postal_country(&postal_code).is_some(),
    })
}

async fn create_quote_draft(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(answers): Json<Answers>,
) -> Result<(StatusCode, Json<QuoteDraftResponse>), ApiRejection> {
    let correlation_id = correlation_id(&headers);
    require_mandatory(&answers).map_err(|error| reject(error, &correlation_id))?;
    validate_step(QuestionStep::Logistics, &answers)
        .map_err(|error| reject(DomainError::from(error).into(), &correlation_id))?;

    let (advice, estimate) = price(&answers, &state.pricing);
    let draft = QuoteDraft::new(answers, advice, &estimate)
        .map_err(|error| reject(error.into(), &correlation_id))?;

    state.drafts.save(draft.clone()).await.map_err(|error| {
        reject(ApplicationError::Persistence(error.to_string()), &correlation_id)
    })?;
    info!(
        event_name = "api.quote_draft.saved",
        correlation_id = %correlation_id,
        draft_id = %draft.id,
        zone = draft.advice.zone.as_str(),
        estimate_total = %draft.estimate_total,
        "quote draft saved"
    );

    Ok((StatusCode::CREATED, Json(QuoteDraftResponse { draft, estimate })))
}

async fn list_quote_drafts(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<QuoteDraft>>, ApiRejection> {
    let correlation_id = correlation_id(&headers);
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

    let drafts = state.drafts.list_recent(limit).await.map_err(|error| {
        reject(ApplicationError::Persistence(error.to_string()), &correlation_id)
    })?;
    Ok(Json(drafts))
}

async fn load_draft(
    state: &ApiState,
    id: String,
    correlation_id: &str,
) -> Result<QuoteDraft, ApiRejection> {
    let id = QuoteDraftId(id);
    match state.drafts.find_by_id(&id).await {
        Ok(Some(draft)) => Ok(draft),
        Ok(None) => Err(reject(
            ApplicationError::NotFound { entity: "quote draft", id: id.to_string() },
            correlation_id,
        )),
        Err(error) => {
            Err(reject(ApplicationError::Persistence(error.to_string()), correlation_id))
        }
    }
}

async fn get_quote_draft(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<QuoteDraft>, ApiRejection> {
    let correlation_id = correlation_id(&headers);
    load_draft(&state, id, &correlation_id).await.map(Json)
}

#[derive(Debug, Serialize)]
struct DraftLineView {
    label: &'static str,
    quantity: u32,
    day_rate: String,
}

#[derive(Debug, Serialize)]
struct DraftView {
    id: String,
    status: &'static str,
    created_at: String,
    event_type: &'static str,
    guest_count: &'static str,
    venue: &'static str,
    event_date_time: Option<String>,
    postal_code: String,
    zone_label: &'static str,
    urgent: bool,
    lines: Vec<DraftLineView>,
    reasons: Vec<String>,
    estimate_total: String,
    currency: String,
}

impl DraftView {
    fn from_draft(draft: &QuoteDraft) -> Self {
        let answers = &draft.answers;
        let lines = bundle_lines(&draft.advice.recommendation)
            .into_iter()
            .map(|line| DraftLineView {
                label: line.item.label(),
                quantity: line.quantity,
                day_rate: line.item.day_rate().to_string(),
            })
            .collect();

        Self {
            id: draft.id.to_string(),
            status: draft.status.as_str(),
            created_at: draft.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            event_type: answers.event_type.map(|value| value.as_str()).unwrap_or("-"),
            guest_count: answers.guest_count.map(|value| value.as_str()).unwrap_or("-"),
            venue: answers.venue.map(|value| value.as_str()).unwrap_or("-"),
            event_date_time: answers.event_date_time().map(str::to_string),
            postal_code: answers.postal_code.clone(),
            zone_label: draft.advice.zone.label(),
            urgent: draft.advice.urgent,
            lines,
            reasons: draft.advice.recommendation.reasons.clone(),
            estimate_total: draft.estimate_total.to_string(),
            currency: draft.currency.clone(),
        }
    }
}

async fn view_quote_draft_page(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let correlation_id = correlation_id(&headers);
    let draft = load_draft(&state, id, &correlation_id)
        .await
        .map_err(|(status, Json(body))| (status, Html(format!("<h1>{}</h1>", body.error))))?;

    let mut context = Context::new();
    context.insert("draft", &DraftView::from_draft(&draft));

    let html = state.templates.render("quote_draft.html", &context).map_err(|error| {
        error!(
            event_name = "api.quote_draft.render_failed",
            correlation_id = %correlation_id,
            draft_id = %draft.id,
            error = %error,
            "quote draft page failed to render"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Template error</h1>".to_string()))
    })?;

    Ok(Html(html))
}
