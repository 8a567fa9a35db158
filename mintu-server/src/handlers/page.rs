//! Server-rendered first paint of the mint page.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use mintu_core::{
    ViewSnapshot,
    claim::ClaimAvailability,
    embed::{APP_NAME, MiniAppEmbed},
    view::ImageSlot,
};
use serde::Serialize;
use tracing::instrument;

use crate::infra::{app_state::AppState, errors::AppResult};

pub const SESSIONS_ENDPOINT: &str = "/api/v1/sessions";
pub const SCRIPT_PATH: &str = "/app.js";

/// Opens the session, relays host and wallet reports, and runs queued
/// actions through the Farcaster SDK.
const PAGE_SCRIPT: &str = include_str!("../../assets/app.js");

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        PAGE_SCRIPT,
    )
}

/// Handed to the page script in a JSON `<script>` block.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Bootstrap<'a> {
    sessions_endpoint: &'static str,
    claim: &'a ClaimAvailability,
    snapshot: &'a ViewSnapshot,
}

#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let view = state.preview_view();
    let snapshot = view.snapshot();

    let meta = match &state.config().share.site_url {
        Some(site) => MiniAppEmbed::for_site(site).meta_tags()?,
        None => Vec::new(),
    };
    let bootstrap = serde_json::to_string(&Bootstrap {
        sessions_endpoint: SESSIONS_ENDPOINT,
        claim: view.claim_availability(),
        snapshot: &snapshot,
    })?;

    Ok(Html(render(&meta, &snapshot, &bootstrap)))
}

fn render(
    meta: &[(&'static str, String)],
    snapshot: &ViewSnapshot,
    bootstrap: &str,
) -> String {
    let mut head = String::new();
    for (name, content) in meta {
        head.push_str(&format!(
            "<meta name=\"{name}\" content=\"{}\">\n",
            escape_html(content)
        ));
    }

    let image = match &snapshot.image {
        ImageSlot::Image { url, .. } => format!(
            "<img id=\"preview\" src=\"{}\" alt=\"NFT preview\">",
            escape_html(url)
        ),
        ImageSlot::Placeholder { hint } => {
            format!("<p id=\"preview-hint\">{}</p>", escape_html(hint))
        }
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{head}</head>
<body>
<main id="app">
<h1>{title}</h1>
<p id="progress">{progress}</p>
{image}
</main>
<script id="mintu-bootstrap" type="application/json">{bootstrap}</script>
<script type="module" src="{SCRIPT_PATH}"></script>
</body>
</html>
"#,
        title = APP_NAME,
        progress = escape_html(&snapshot.progress_label),
        bootstrap = escape_script_json(bootstrap),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON inside `<script>` must not contain `</script>`.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_attribute_content() {
        assert_eq!(
            escape_html(r#"{"a":"<b>&'"}"#),
            "{&quot;a&quot;:&quot;&lt;b&gt;&amp;&#39;&quot;}"
        );
    }

    #[test]
    fn script_json_cannot_close_its_tag() {
        assert_eq!(escape_script_json("\"</script>\""), "\"\\u003c/script>\"");
    }
}
