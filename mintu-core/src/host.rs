//! The social client hosting the mini app.
//!
//! Only the shapes the host actually documents are modelled. Avatar lookup
//! walks them in one fixed order (see [`resolve_avatar`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AvatarConfig;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host environment unavailable: {0}")]
    Unavailable(String),

    #[error("host action failed: {0}")]
    Action(String),
}

/// Context the host hands to the mini app on launch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostContext {
    #[serde(default)]
    pub user: Option<HostUser>,
    #[serde(default)]
    pub location: Option<LaunchLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUser {
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

/// Where the mini app was opened from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchLocation {
    CastEmbed { cast: CastRef },
    CastShare { cast: CastRef },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastRef {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub author: Option<CastAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastAuthor {
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

/// A "compose cast" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeCast {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<String>,
}

#[async_trait]
pub trait SocialHost: Send + Sync {
    /// Tell the host the app is ready to be shown. Call once per view.
    async fn ready(&self) -> Result<(), HostError>;

    async fn context(&self) -> Result<HostContext, HostError>;

    async fn compose_cast(&self, cast: ComposeCast) -> Result<(), HostError>;
}

/// Avatar precedence: configured override, then the launching user's
/// `pfpUrl`, then the cast author's `pfpUrl` when opened from a cast embed or
/// share. `ipfs://` results are rewritten through the avatar gateway.
pub fn resolve_avatar(
    config: &AvatarConfig,
    context: Option<&HostContext>,
) -> Option<String> {
    let present = |url: &Option<String>| {
        url.clone().filter(|url| !url.trim().is_empty())
    };
    let from_context = || {
        let context = context?;
        let from_user = context
            .user
            .as_ref()
            .and_then(|user| present(&user.pfp_url));
        let from_cast = match &context.location {
            Some(LaunchLocation::CastEmbed { cast })
            | Some(LaunchLocation::CastShare { cast }) => cast
                .author
                .as_ref()
                .and_then(|author| present(&author.pfp_url)),
            _ => None,
        };
        from_user.or(from_cast)
    };

    present(&config.override_url)
        .or_else(from_context)
        .map(|url| resolve_ipfs(&config.gateway, &url))
}

/// `ipfs://<cid>/<path>` → `<gateway>/ipfs/<cid>/<path>`; other URLs pass
/// through untouched.
pub fn resolve_ipfs(gateway: &str, url: &str) -> String {
    match url.strip_prefix("ipfs://") {
        Some(rest) => {
            let rest = rest.strip_prefix("ipfs/").unwrap_or(rest);
            format!("{gateway}/ipfs/{rest}")
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar_config(override_url: Option<&str>) -> AvatarConfig {
        AvatarConfig {
            override_url: override_url.map(str::to_string),
            gateway: "https://pfp.example".into(),
        }
    }

    fn parse(json: &str) -> HostContext {
        serde_json::from_str(json).expect("context json")
    }

    #[test]
    fn user_avatar_beats_cast_author() {
        let ctx = parse(
            r#"{
                "user": {"fid": 1, "pfpUrl": "https://a/user.png"},
                "location": {"type": "cast_embed", "cast": {"author": {"pfpUrl": "https://a/author.png"}}}
            }"#,
        );
        assert_eq!(
            resolve_avatar(&avatar_config(None), Some(&ctx)).as_deref(),
            Some("https://a/user.png")
        );
    }

    #[test]
    fn cast_author_used_for_cast_share_only() {
        let share = parse(
            r#"{"user": {"fid": 1}, "location": {"type": "cast_share", "cast": {"author": {"pfpUrl": "ipfs://bafy/p.png"}}}}"#,
        );
        assert_eq!(
            resolve_avatar(&avatar_config(None), Some(&share)).as_deref(),
            Some("https://pfp.example/ipfs/bafy/p.png")
        );

        let notification = parse(r#"{"location": {"type": "notification"}}"#);
        assert_eq!(notification.location, Some(LaunchLocation::Other));
        assert_eq!(resolve_avatar(&avatar_config(None), Some(&notification)), None);
    }

    #[test]
    fn override_wins_over_context() {
        let ctx = parse(r#"{"user": {"pfpUrl": "https://a/user.png"}}"#);
        assert_eq!(
            resolve_avatar(&avatar_config(Some("https://fixed/me.png")), Some(&ctx))
                .as_deref(),
            Some("https://fixed/me.png")
        );
    }

    #[test]
    fn blank_avatars_fall_through_to_cast_author() {
        let ctx = parse(
            r#"{
                "user": {"pfpUrl": ""},
                "location": {"type": "cast_embed", "cast": {"author": {"pfpUrl": "https://a/author.png"}}}
            }"#,
        );
        assert_eq!(
            resolve_avatar(&avatar_config(Some("  ")), Some(&ctx)).as_deref(),
            Some("https://a/author.png")
        );
    }

    #[test]
    fn ipfs_prefix_variants_resolve() {
        assert_eq!(
            resolve_ipfs("https://gw", "ipfs://ipfs/bafy/1.png"),
            "https://gw/ipfs/bafy/1.png"
        );
        assert_eq!(resolve_ipfs("https://gw", "https://x/y.png"), "https://x/y.png");
    }
}
