//! End-to-end tests for the chart server, driven through the router with
//! in-memory fixture datasets. No network access.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use plotboard::api::{create_router, AppState};
use plotboard::charts::ChartRegistry;
use plotboard::data::{Dataset, DatasetStore, MIDWEST, MPG};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

const MPG_CSV: &str = "\
manufacturer,displ,year,cyl,cty,hwy,class
audi,1.8,1999,4,18,29,compact
audi,1.8,1999,4,21,29,compact
audi,2.0,2008,4,20,31,compact
audi,2.0,2008,4,21,30,compact
audi,2.8,1999,6,16,26,compact
volkswagen,2.5,2008,5,20,28,compact
volkswagen,2.5,2008,5,19,29,compact
toyota,2.2,1999,4,21,27,midsize
toyota,2.4,2008,4,21,31,midsize
toyota,3.5,2008,6,19,28,midsize
chevrolet,5.3,2008,8,14,20,suv
chevrolet,5.7,1999,8,13,17,suv
chevrolet,6.0,2008,8,12,17,suv
jeep,3.0,2008,6,15,19,suv
jeep,4.7,2008,8,9,12,suv
nissan,4.0,2008,6,13,18,suv
dodge,2.4,1999,4,18,24,minivan
dodge,3.0,1999,6,17,24,minivan
dodge,3.3,2008,6,16,23,minivan
dodge,3.8,1999,6,15,21,minivan
honda,1.6,1999,4,24,32,subcompact
honda,1.6,1999,4,25,32,subcompact
subaru,2.5,2008,4,20,27,suv
pontiac,3.8,2008,6,16,26,midsize
";

const MIDWEST_CSV: &str = "\
county,state,area,poptotal,popdensity,category
ADAMS,IL,0.052,66090,1270.961540,AAR
ALEXANDER,IL,0.014,10626,759,LHR
BOND,IL,0.022,14991,681.409091,AAR
BOONE,IL,0.017,30806,1812.117650,ALU
BROWN,IL,0.018,5836,324.222222,AAR
CHAMPAIGN,IL,0.058,173025,2983.189660,HAU
CLARK,IL,0.030,15921,530.7,AAR
COOK,IL,0.060,5105067,85087.78333,HAU
DE KALB,IL,0.038,74624,1963.789470,ALU
DU PAGE,IL,0.020,781666,39083.3,HAU
LAKE,IL,0.027,516418,19126.59259,HAU
WILL,IL,0.050,357313,7146.26,ALU
";

fn fixture_store() -> DatasetStore {
    let mut store = DatasetStore::new();
    store.insert(Dataset::from_csv(MPG, MPG_CSV).expect("mpg fixture parses"));
    store.insert(Dataset::from_csv(MIDWEST, MIDWEST_CSV).expect("midwest fixture parses"));
    store
}

fn fixture_app(seed: Option<u64>) -> Router {
    create_router(AppState::new(
        fixture_store(),
        ChartRegistry::builtin(),
        seed,
    ))
}

async fn get(app: Router, path: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn every_chart_route_returns_a_valid_png() {
    let app = fixture_app(None);

    for chart in ChartRegistry::builtin().iter() {
        let path = format!("/{}.plot", chart.name());
        let (status, content_type, body) = get(app.clone(), &path).await;

        assert_eq!(status, StatusCode::OK, "route {path}");
        assert_eq!(content_type.as_deref(), Some("image/png"), "route {path}");
        assert_eq!(&body[..8], &PNG_MAGIC, "route {path}");
    }
}

#[tokio::test]
async fn png_dimensions_match_the_configured_figure_sizes() {
    let app = fixture_app(Some(7));

    // (route, figure inches at 80 DPI)
    for (path, width, height) in [
        ("/simple.plot", 1280, 800),
        ("/scatter.plot", 1280, 800),
        ("/box.plot", 1040, 800),
        ("/kde.plot", 1040, 800),
        ("/distribution.plot", 1120, 1120),
    ] {
        let (status, _, body) = get(app.clone(), path).await;
        assert_eq!(status, StatusCode::OK, "route {path}");

        let decoded = image::load_from_memory(&body).expect("body decodes as an image");
        assert_eq!(
            (decoded.width(), decoded.height()),
            (width, height),
            "route {path}"
        );
    }
}

#[tokio::test]
async fn box_plot_scenario() {
    let app = fixture_app(None);

    let (status, content_type, body) = get(app, "/box.plot").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(&body[..8], &PNG_MAGIC);

    let decoded = image::load_from_memory(&body).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1040, 800));
}

#[tokio::test]
async fn internally_seeded_distribution_chart_is_byte_identical() {
    let app = fixture_app(None);

    let (_, _, first) = get(app.clone(), "/distribution.plot").await;
    let (_, _, second) = get(app, "/distribution.plot").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn seeded_random_routes_are_reproducible() {
    let app = fixture_app(Some(42));

    for path in ["/simple.plot", "/jittering.plot", "/dotbox.plot"] {
        let (_, _, first) = get(app.clone(), path).await;
        let (_, _, second) = get(app.clone(), path).await;
        assert_eq!(first, second, "route {path}");
    }
}

#[tokio::test]
async fn unseeded_random_route_still_returns_valid_pngs() {
    let app = fixture_app(None);

    let (status_a, _, first) = get(app.clone(), "/simple.plot").await;
    let (status_b, _, second) = get(app, "/simple.plot").await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(&first[..8], &PNG_MAGIC);
    assert_eq!(&second[..8], &PNG_MAGIC);
}

#[tokio::test]
async fn unknown_routes_are_404_not_500() {
    let app = fixture_app(None);

    let (status, _, _) = get(app.clone(), "/heatmap.plot").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get(app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_renders_do_not_cross_contaminate() {
    let app = fixture_app(None);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(
            async move { get(app, "/box.plot").await },
        ));
    }

    let mut bodies = Vec::new();
    for handle in handles {
        let (status, content_type, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/png"));
        assert_eq!(&body[..8], &PNG_MAGIC);

        let decoded = image::load_from_memory(&body).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1040, 800));
        bodies.push(body);
    }

    // The box chart is deterministic, so every concurrent response must
    // be byte-identical to the first.
    for body in &bodies[1..] {
        assert_eq!(body, &bodies[0]);
    }
}

#[tokio::test]
async fn landing_page_links_every_chart_route() {
    let app = fixture_app(None);

    let (status, content_type, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));

    let html = String::from_utf8(body).unwrap();
    for chart in ChartRegistry::builtin().iter() {
        assert!(
            html.contains(&format!("/{}.plot", chart.name())),
            "landing page is missing {}",
            chart.name()
        );
    }
}

#[tokio::test]
async fn health_and_ready_report_server_state() {
    let app = fixture_app(None);

    let (status, _, body) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");

    let (status, _, body) = get(app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    let ready: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(ready["ready"], true);
    assert_eq!(ready["datasets"].as_array().unwrap().len(), 2);
}
