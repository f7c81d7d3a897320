use axum::{
    extract::{Query, State},
    Extension, Json,
};
use medfind_core::{rank_nearby, RankedPharmacy, RequesterPosition};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

/// Raw `lat`/`lng` query values. Kept as strings so that a malformed number
/// yields an empty list instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

pub(super) async fn list_nearby_pharmacies(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<RankedPharmacy>>, ApiError> {
    let position = RequesterPosition::from_query(query.lat.as_deref(), query.lng.as_deref());

    let pharmacies = medfind_db::list_pharmacies_with_stock(&state.pool)
        .await
        .map_err(|e| map_db_error(&req_id.0, &medfind_db::DbError::from(e)))?;

    let ranked = rank_nearby(&state.policy, position, pharmacies);
    tracing::debug!(
        request_id = %req_id.0,
        position = ?position,
        returned = ranked.len(),
        "nearby pharmacies ranked"
    );

    Ok(Json(ranked))
}
