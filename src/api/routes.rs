//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health, index, metrics_text, ready, render_chart, AppState};

/// Create the API router: one route per registered chart, plus the
/// landing page and operational endpoints. Unknown paths fall through to
/// axum's 404.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics_text));

    for chart in state.registry.iter() {
        let name = chart.name();
        let chart_state = state.clone();
        router = router.route(
            &format!("/{name}.plot"),
            get(move || render_chart(chart_state, name)),
        );
    }

    router.with_state(state).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::charts::ChartRegistry;
    use crate::data::{Dataset, DatasetStore, MIDWEST, MPG};

    const MPG_CSV: &str = "\
cyl,cty,hwy,class
4,21,29,compact
4,20,31,compact
4,19,27,compact
5,20,28,compact
6,16,24,suv
6,15,22,suv
8,13,17,suv
8,12,16,suv
6,17,24,minivan
6,16,23,minivan
4,18,26,minivan
";

    const MIDWEST_CSV: &str = "\
county,area,poptotal,category
ADAMS,0.052,66090,AAR
ALEXANDER,0.014,10626,LHR
BOND,0.022,14991,AAR
BOONE,0.017,30806,ALU
CHAMPAIGN,0.058,173025,HAU
";

    fn test_state() -> AppState {
        let mut store = DatasetStore::new();
        store.insert(Dataset::from_csv(MPG, MPG_CSV).unwrap());
        store.insert(Dataset::from_csv(MIDWEST, MIDWEST_CSV).unwrap());
        AppState::new(store, ChartRegistry::builtin(), Some(42))
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn landing_page_returns_ok() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/heatmap.plot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_unavailable_without_a_recorder() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn chart_route_returns_a_png_content_type() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/box.plot").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "image/png"
        );
    }
}
