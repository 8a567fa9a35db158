//! `fc:miniapp` / `fc:frame` embed metadata for the page head.

use serde::Serialize;
use url::Url;

pub const APP_NAME: &str = "Base NFT Mint";
pub const BUTTON_TITLE: &str = "Mint now";
pub const SPLASH_BACKGROUND: &str = "#0b0f1a";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniAppEmbed {
    pub version: &'static str,
    pub image_url: String,
    pub button: EmbedButton,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedButton {
    pub title: &'static str,
    pub action: EmbedAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
    pub name: &'static str,
    pub splash_image_url: String,
    pub splash_background_color: &'static str,
}

impl MiniAppEmbed {
    /// Embed launching `site` as a mini app (3:2 `og.png`, `splash.png`).
    pub fn for_site(site: &Url) -> Self {
        Self {
            version: "1",
            image_url: asset(site, "og.png"),
            button: EmbedButton {
                title: BUTTON_TITLE,
                action: EmbedAction {
                    kind: "launch_miniapp",
                    url: site.to_string(),
                    name: APP_NAME,
                    splash_image_url: asset(site, "splash.png"),
                    splash_background_color: SPLASH_BACKGROUND,
                },
            },
        }
    }

    /// Same embed for clients that only understand `fc:frame`.
    pub fn legacy_frame(&self) -> Self {
        let mut frame = self.clone();
        frame.button.action.kind = "launch_frame";
        frame
    }

    /// `(name, content)` pairs for `<meta>` tags.
    pub fn meta_tags(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("fc:miniapp", serde_json::to_string(self)?),
            ("fc:frame", serde_json::to_string(&self.legacy_frame())?),
        ])
    }
}

fn asset(site: &Url, file: &str) -> String {
    site.join(file)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}/{file}", site.as_str().trim_end_matches('/')))
}
