//! Last-resort error boundary.
//!
//! A panicking handler must not take the page down with it: the panic is
//! logged and the visitor gets a small fallback page with a retry link.

use std::any::Any;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

pub const FALLBACK_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Something went wrong</title></head>
<body>
<main>
<h1>Something went wrong</h1>
<p>The mint page hit an unexpected error.</p>
<p><a href="/">Try again</a></p>
</main>
</body>
</html>
"#;

/// `CatchPanicLayer::custom` handler.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    error!(panic = detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        FALLBACK_PAGE,
    )
        .into_response()
}
