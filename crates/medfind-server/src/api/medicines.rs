use axum::{
    extract::{Query, State},
    Extension, Json,
};
use medfind_core::{search_term, MedicineWithStock};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
}

pub(super) async fn search_medicines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<MedicineWithStock>>, ApiError> {
    let Some(term) = search_term(query.q.as_deref()) else {
        return Ok(Json(Vec::new()));
    };

    let matches = medfind_db::search_medicines_by_name(&state.pool, term)
        .await
        .map_err(|e| map_db_error(&req_id.0, &medfind_db::DbError::from(e)))?;

    tracing::debug!(
        request_id = %req_id.0,
        matched = matches.len(),
        "medicine search complete"
    );

    Ok(Json(matches))
}
