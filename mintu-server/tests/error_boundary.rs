use anyhow::{Result, anyhow};
use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use mintu_server::infra::panic::handle_panic;
use tower_http::catch_panic::CatchPanicLayer;

async fn boom() -> &'static str {
    panic!("render exploded")
}

#[tokio::test]
async fn panicking_handler_gets_fallback_page() -> Result<()> {
    let app = Router::new()
        .route("/boom", get(boom))
        .route("/fine", get(|| async { "ok" }))
        .layer(CatchPanicLayer::custom(handle_panic));
    let server = TestServer::new(app).map_err(|err| anyhow!(err.to_string()))?;

    let response = server.get("/boom").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let html = response.text();
    assert!(html.contains("Something went wrong"));
    assert!(html.contains("<a href=\"/\">Try again</a>"));

    // the server keeps serving afterwards
    server.get("/fine").await.assert_status_ok();
    Ok(())
}
