use axum::{Json, Router, extract::Path, routing::get};

use crate::{
    domain::labels::{self, LabelDomain, LabelSet},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(all_labels))
        .route("/{domain}", get(domain_labels))
}

#[utoipa::path(
    get,
    path = "/api/labels",
    responses(
        (status = 200, description = "Display labels and badge colors for every enum", body = ApiResponse<Vec<LabelSet>>)
    ),
    tag = "Labels"
)]
pub async fn all_labels() -> Json<ApiResponse<Vec<LabelSet>>> {
    Json(ApiResponse::success("Labels", labels::all(), Some(Meta::empty())))
}

#[utoipa::path(
    get,
    path = "/api/labels/{domain}",
    params(("domain" = String, Path, description = "Label domain, e.g. booking_status")),
    responses(
        (status = 200, description = "Labels of one domain", body = ApiResponse<LabelSet>),
        (status = 400, description = "Unknown domain")
    ),
    tag = "Labels"
)]
pub async fn domain_labels(Path(domain): Path<String>) -> AppResult<Json<ApiResponse<LabelSet>>> {
    let domain: LabelDomain = domain
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown label domain {domain}")))?;
    let set = LabelSet {
        domain,
        entries: labels::entries(domain).to_vec(),
    };
    Ok(Json(ApiResponse::success("Labels", set, Some(Meta::empty()))))
}
