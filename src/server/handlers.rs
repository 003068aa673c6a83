//! Request handlers: front-end form, preview/fetch proxy endpoints, health

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::model::{CustomStyleParams, PreviewRequest, Profile};
use crate::utils::error::Result;
use crate::utils::validation::normalize_target_url;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Parameters accepted by both `POST /preview` (form body) and `GET /fetch`
/// (query string).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PreviewParams {
    pub url: Option<String>,
    pub profile: Option<String>,
    pub font_size: Option<String>,
    pub font_family: Option<String>,
    pub gradient: Option<String>,
}

impl PreviewParams {
    pub fn into_request(self) -> Result<PreviewRequest> {
        let url = normalize_target_url(self.url.as_deref().unwrap_or_default())?;
        let profile = Profile::parse(self.profile.as_deref().unwrap_or_default());
        let custom = CustomStyleParams::from_fields(
            self.font_size.as_deref(),
            self.font_family.as_deref(),
            self.gradient.as_deref(),
        );

        Ok(PreviewRequest {
            url,
            profile,
            custom,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub style_mode: &'static str,
    pub profiles: Vec<String>,
}

/// Front-end form
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// A body that is not a form (or no body at all) is treated as empty so the
/// caller gets the usual missing-parameter answer.
pub async fn preview(
    State(state): State<AppState>,
    form: Option<Form<PreviewParams>>,
) -> Response {
    let params = form.map(|Form(params)| params).unwrap_or_default();
    render_preview(&state, params).await
}

pub async fn fetch(State(state): State<AppState>, Query(params): Query<PreviewParams>) -> Response {
    render_preview(&state, params).await
}

async fn render_preview(state: &AppState, params: PreviewParams) -> Response {
    let request = match params.into_request() {
        Ok(request) => request,
        Err(e) => {
            tracing::info!(error = %e, "Rejected preview request");
            return e.into_response();
        }
    };

    match state.service.preview(&request).await {
        Ok(document) => Html(document.html).into_response(),
        Err(e) => {
            tracing::warn!(
                url = %request.url,
                error = %e,
                suggestion = e.recovery_suggestion(),
                "Preview failed"
            );
            e.into_response()
        }
    }
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.service.rewriter().config();
    let mut profiles: Vec<String> = config.profiles.keys().map(str::to_string).collect();
    profiles.push(Profile::Custom.key().to_string());
    profiles.sort();

    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        style_mode: config.mode.as_str(),
        profiles,
    })
}
