mod medicines;
mod pharmacies;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use medfind_core::RankingPolicy;
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub policy: Arc<RankingPolicy>,
}

/// The only failure body the API ever returns. Details go to the log.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: &'static str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ApiError {
    #[must_use]
    pub fn server_error() -> Self {
        Self {
            error: "Server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: &str, error: &medfind_db::DbError) -> ApiError {
    tracing::error!(request_id, error = %error, "database query failed");
    ApiError::server_error()
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/pharmacies/nearby",
            get(pharmacies::list_nearby_pharmacies),
        )
        .route("/medicines/search", get(medicines::search_medicines))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match medfind_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app(pool: PgPool) -> Router {
        build_app(AppState {
            pool,
            policy: Arc::new(RankingPolicy::default()),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    async fn seed_pharmacy(pool: &PgPool, name: &str, lat: f64, lng: f64) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO pharmacies (name, address, lat, lng) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(format!("{name}, Nagpur"))
        .bind(lat)
        .bind(lng)
        .fetch_one(pool)
        .await
        .expect("seed_pharmacy failed")
    }

    async fn seed_medicine(pool: &PgPool, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO medicines (name, salt, company) \
             VALUES ($1, 'Paracetamol', 'Micro Labs') RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("seed_medicine failed")
    }

    async fn seed_stock(pool: &PgPool, pharmacy_id: i64, medicine_id: i64, quantity: i32) {
        sqlx::query(
            "INSERT INTO pharmacy_stock (pharmacy_id, medicine_id, quantity, price) \
             VALUES ($1, $2, $3, 32.5)",
        )
        .bind(pharmacy_id)
        .bind(medicine_id)
        .bind(quantity)
        .execute(pool)
        .await
        .expect("seed_stock failed");
    }

    // -------------------------------------------------------------------------
    // Unit tests (no DB)
    // -------------------------------------------------------------------------

    #[test]
    fn api_error_is_a_bare_server_error() {
        let body = serde_json::to_value(ApiError::server_error()).expect("serialize");
        assert_eq!(body, serde_json::json!({ "error": "Server error" }));

        let response = ApiError::server_error().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // -------------------------------------------------------------------------
    // Route tests (with DB)
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_reports_database_ok(pool: PgPool) {
        let (status, json) = get_json(test_app(pool), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "status": "ok", "database": "ok" }));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn request_id_is_echoed_on_response(pool: PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-nearby-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-nearby-1")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn nearby_filters_by_radius_and_sorts_by_distance(pool: PgPool) {
        let here = seed_pharmacy(&pool, "Shri Sai Medicals", 21.1458, 79.0882).await;
        seed_pharmacy(&pool, "Far Pharmacy", 21.20, 79.15).await;
        let close = seed_pharmacy(&pool, "MedPlus Pharmacy", 21.16, 79.09).await;
        let dolo = seed_medicine(&pool, "Dolo 650").await;
        seed_stock(&pool, here, dolo, 8).await;

        let (status, json) =
            get_json(test_app(pool), "/pharmacies/nearby?lat=21.1458&lng=79.0882").await;
        assert_eq!(status, StatusCode::OK);

        let rows = json.as_array().expect("array body");
        let ids: Vec<i64> = rows.iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![here, close], "far pharmacy (~8.8 km) is excluded");

        assert_eq!(rows[0]["distanceKm"].as_f64(), Some(0.0));
        assert_eq!(rows[0]["imageUrl"].as_str(), Some("/pharmacies/default.jpg"));
        assert_eq!(
            rows[0]["googleMapsUrl"].as_str(),
            Some("https://www.google.com/maps/search/?api=1&query=21.1458,79.0882")
        );
        assert_eq!(rows[0]["medicines"][0]["name"].as_str(), Some("Dolo 650"));
        assert_eq!(rows[0]["medicines"][0]["left"].as_i64(), Some(8));
        assert_eq!(rows[0]["medicines"][0]["price"].as_f64(), Some(32.5));
        assert!(rows[1]["medicines"].as_array().expect("medicines").is_empty());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn nearby_without_position_returns_everything_unranked(pool: PgPool) {
        let first = seed_pharmacy(&pool, "Shri Sai Medicals", 21.1458, 79.0882).await;
        let second = seed_pharmacy(&pool, "Far Pharmacy", 21.20, 79.15).await;

        for uri in [
            "/pharmacies/nearby",
            "/pharmacies/nearby?lat=21.1458",
            "/pharmacies/nearby?lat=&lng=79.0882",
        ] {
            let (status, json) = get_json(test_app(pool.clone()), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");

            let rows = json.as_array().expect("array body");
            let ids: Vec<i64> = rows.iter().filter_map(|r| r["id"].as_i64()).collect();
            assert_eq!(ids, vec![first, second], "{uri}");
            assert!(rows.iter().all(|r| r["distanceKm"].is_null()), "{uri}");
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn nearby_with_malformed_position_returns_empty_array(pool: PgPool) {
        seed_pharmacy(&pool, "Shri Sai Medicals", 21.1458, 79.0882).await;

        for uri in [
            "/pharmacies/nearby?lat=abc&lng=79.0882",
            "/pharmacies/nearby?lat=21.1458&lng=NaN",
        ] {
            let (status, json) = get_json(test_app(pool.clone()), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json, serde_json::json!([]), "{uri}");
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn nearby_hides_zero_quantity_stock(pool: PgPool) {
        let here = seed_pharmacy(&pool, "Shri Sai Medicals", 21.1458, 79.0882).await;
        let ors = seed_medicine(&pool, "ORS Sachet").await;
        seed_stock(&pool, here, ors, 0).await;

        let (_, json) = get_json(test_app(pool), "/pharmacies/nearby").await;
        assert!(json[0]["medicines"].as_array().expect("medicines").is_empty());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_without_query_returns_empty_array(pool: PgPool) {
        seed_medicine(&pool, "Dolo 650").await;

        let (status, json) = get_json(test_app(pool.clone()), "/medicines/search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));

        let (status, json) = get_json(test_app(pool), "/medicines/search?q=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_matches_case_insensitively_with_stock(pool: PgPool) {
        let sai = seed_pharmacy(&pool, "Shri Sai Medicals", 21.1458, 79.0882).await;
        let dolo = seed_medicine(&pool, "Dolo 650").await;
        seed_medicine(&pool, "Azithromycin 500").await;
        seed_stock(&pool, sai, dolo, 14).await;

        let (status, json) = get_json(test_app(pool), "/medicines/search?q=dolo").await;
        assert_eq!(status, StatusCode::OK);

        let rows = json.as_array().expect("array body");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"].as_str(), Some("Dolo 650"));
        assert_eq!(rows[0]["salt"].as_str(), Some("Paracetamol"));
        let stock = &rows[0]["stocks"][0];
        assert_eq!(stock["quantity"].as_i64(), Some(14));
        assert_eq!(stock["price"].as_f64(), Some(32.5));
        assert_eq!(stock["pharmacy"]["id"].as_i64(), Some(sai));
        assert_eq!(
            stock["pharmacy"]["address"].as_str(),
            Some("Shri Sai Medicals, Nagpur")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn closed_pool_surfaces_generic_server_error(pool: PgPool) {
        pool.close().await;

        let (status, json) = get_json(test_app(pool), "/pharmacies/nearby").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "Server error" }));
    }
}
