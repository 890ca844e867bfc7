use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{SearchOutcome, SearchPipeline};
use crate::models::{
    CatalogResponse, ErrorResponse, HealthResponse, SearchRequest, SearchResponse, VenueResult,
};
use crate::services::save_trace;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SearchPipeline>,
    pub trace_path: Option<PathBuf>,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/restaurants", web::get().to(list_restaurants))
        .route("/search", web::post().to(search));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Catalog listing endpoint
///
/// GET /api/v1/restaurants
async fn list_restaurants(state: web::Data<AppState>) -> impl Responder {
    match state.pipeline.venues() {
        Ok(venues) => HttpResponse::Ok().json(CatalogResponse::new(venues)),
        Err(e) => {
            tracing::error!("Failed to list catalog: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// { "query": "Turkish restaurant in Downtown Baltimore for 2 people under $65" }
/// ```
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Rejected search request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new("No query provided"));
    }

    let query = req.into_inner().query;
    tracing::info!("Searching venues for query: {:?}", query);

    let outcome = match state.pipeline.search(&query) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Search failed for {:?}: {}", query, e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()));
        }
    };

    if let Some(path) = state.trace_path.clone() {
        let trace = outcome.trace.clone();
        // Persistence is best-effort; the search result is returned either way
        let written = tokio::task::spawn_blocking(move || save_trace(&path, &trace)).await;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to persist search trace: {}", e),
            Err(e) => tracing::warn!("Trace persistence task failed: {}", e),
        }
    }

    HttpResponse::Ok().json(build_response(&state.pipeline, outcome))
}

fn build_response(pipeline: &SearchPipeline, outcome: SearchOutcome) -> SearchResponse {
    let SearchOutcome { query, constraints, results, trace } = outcome;

    let results: Vec<VenueResult> = results
        .into_iter()
        .map(|ranked| {
            let reasons = pipeline.check(&ranked.venue, &constraints).reasons;
            VenueResult::new(ranked, reasons)
        })
        .collect();

    SearchResponse {
        success: true,
        query,
        constraints: constraints.to_string(),
        total_results: results.len(),
        results,
        logs: trace.lines(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Venue;
    use crate::services::{BuiltinCatalog, CatalogError, CatalogProvider};
    use actix_web::{test, App};

    struct MissingCatalog;

    impl CatalogProvider for MissingCatalog {
        fn get_catalog(&self) -> Result<Vec<Venue>, CatalogError> {
            Err(CatalogError::DuplicateVenue("Istanbul Grill".to_string()))
        }
    }

    fn app_state(trace_path: Option<PathBuf>) -> AppState {
        AppState {
            pipeline: Arc::new(SearchPipeline::with_catalog(Arc::new(BuiltinCatalog))),
            trace_path,
        }
    }

    #[actix_web::test]
    async fn test_empty_query_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/search")
            .set_json(serde_json::json!({ "query": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No query provided");
        assert_eq!(body["results"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_search_returns_ranked_results() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/search")
            .set_json(serde_json::json!({ "query": "Turkish restaurant for 2 people under $50" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["total_results"], 1);
        assert_eq!(body["results"][0]["name"], "Bosphorus Cafe");
        assert_eq!(body["results"][0]["constraint_matches"][1], "✓ Price: $44.00 for 2 ≤ $50");
        assert!(body["constraints"].as_str().unwrap().starts_with("Cuisine=Turkish"));
        assert!(!body["logs"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_search_persists_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent_log.txt");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(Some(path.clone()))))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/search")
            .set_json(serde_json::json!({ "query": "Italian restaurant" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("SEARCH COMPLETE"));
    }

    #[actix_web::test]
    async fn test_list_restaurants() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(None)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/restaurants").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 7);
        assert_eq!(body["restaurants"].as_array().unwrap().len(), 7);
        assert_eq!(body["restaurants"][0]["name"], "Istanbul Grill");
        assert_eq!(body["restaurants"][0]["price_per_person"], 28.0);
        assert_eq!(body["restaurants"][0]["window_view"], serde_json::json!(["street"]));
    }

    #[actix_web::test]
    async fn test_list_restaurants_catalog_failure() {
        let state = AppState {
            pipeline: Arc::new(SearchPipeline::with_catalog(Arc::new(MissingCatalog))),
            trace_path: None,
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/restaurants").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Istanbul Grill"));
        assert_eq!(body["results"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
