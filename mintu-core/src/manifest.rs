//! Preview image manifest built from configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::ImageConfig;

static IMAGE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(png|jpg|jpeg|gif|webp|svg)(\?.*)?$")
        .expect("image extension pattern is valid")
});

/// Ordered list of absolute image URLs. Built once per view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageManifest {
    urls: Vec<String>,
}

impl ImageManifest {
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self { urls }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }
}

/// Whether `entry` points straight at an image file.
pub fn is_direct_image(entry: &str) -> bool {
    IMAGE_URL.is_match(entry)
}

/// An explicit list wins over a CID; list entries that are not image files
/// are treated as directories of `1.png..=count.png`.
pub fn build_image_manifest(config: &ImageConfig) -> ImageManifest {
    if !config.list.is_empty() {
        let mut urls = Vec::new();
        for entry in &config.list {
            if is_direct_image(entry) {
                urls.push(entry.clone());
            } else {
                urls.extend(numbered(entry.trim_end_matches('/'), config.count));
            }
        }
        return ImageManifest { urls };
    }

    if let Some(cid) = &config.cid {
        let base = format!("{}/ipfs/{}", config.gateway, cid);
        return ImageManifest {
            urls: numbered(&base, config.count).collect(),
        };
    }

    ImageManifest::default()
}

fn numbered(base: &str, count: u32) -> impl Iterator<Item = String> + '_ {
    (1..=count).map(move |i| format!("{base}/{i}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(list: &[&str], cid: Option<&str>, count: u32) -> ImageConfig {
        ImageConfig {
            gateway: "https://gw.example".into(),
            cid: cid.map(str::to_string),
            count,
            list: list.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn direct_urls_are_kept_in_order_without_expansion() {
        let manifest = build_image_manifest(&config(
            &["https://x/b.JPG", "https://x/a.png?v=2"],
            Some("ignored"),
            8,
        ));
        assert_eq!(manifest.urls(), ["https://x/b.JPG", "https://x/a.png?v=2"]);
    }

    #[test]
    fn directory_entry_expands_to_count_files() {
        let manifest = build_image_manifest(&config(&["https://x/dir/"], None, 3));
        assert_eq!(
            manifest.urls(),
            ["https://x/dir/1.png", "https://x/dir/2.png", "https://x/dir/3.png"]
        );
    }

    #[test]
    fn cid_expands_under_gateway_in_numeric_order() {
        let manifest = build_image_manifest(&config(&[], Some("bafyabc"), 5));
        let expected: Vec<String> = (1..=5)
            .map(|i| format!("https://gw.example/ipfs/bafyabc/{i}.png"))
            .collect();
        assert_eq!(manifest.urls(), expected.as_slice());
    }

    #[test]
    fn nothing_configured_yields_empty_manifest() {
        assert!(build_image_manifest(&config(&[], None, 8)).is_empty());
    }

    #[test]
    fn mixed_list_expands_only_directories() {
        let manifest =
            build_image_manifest(&config(&["https://x/a.png", "https://x/dir"], None, 2));
        assert_eq!(
            manifest.urls(),
            ["https://x/a.png", "https://x/dir/1.png", "https://x/dir/2.png"]
        );
    }

    #[test]
    fn extension_match_requires_suffix() {
        assert!(is_direct_image("https://x/y.webp"));
        assert!(is_direct_image("https://x/y.SVG?size=2"));
        assert!(!is_direct_image("https://x/png"));
        assert!(!is_direct_image("https://x/y.png/more"));
    }
}
