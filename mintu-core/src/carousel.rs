//! Rotating preview over the manifest, minus images that failed to load.

use std::collections::HashSet;

use crate::manifest::ImageManifest;

#[derive(Debug, Clone, Default)]
pub struct Carousel {
    manifest: ImageManifest,
    excluded: HashSet<String>,
    /// Manifest order with exclusions removed; rebuilt on every exclusion.
    visible: Vec<String>,
    index: usize,
}

impl Carousel {
    pub fn new(manifest: ImageManifest) -> Self {
        let visible = manifest.urls().to_vec();
        Self {
            manifest,
            excluded: HashSet::new(),
            visible,
            index: 0,
        }
    }

    pub fn manifest(&self) -> &ImageManifest {
        &self.manifest
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn current(&self) -> Option<&str> {
        self.visible.get(self.index).map(String::as_str)
    }

    /// Step to the next visible image. Returns `None` (and does nothing) when
    /// nothing is left to show.
    pub fn advance(&mut self) -> Option<usize> {
        if self.visible.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.visible.len();
        Some(self.index)
    }

    /// Mark `url` as broken. Returns `true` only when the URL belongs to the
    /// manifest and was not excluded before.
    pub fn exclude(&mut self, url: &str) -> bool {
        if !self.manifest.contains(url) || !self.excluded.insert(url.to_string())
        {
            return false;
        }

        self.visible = self
            .manifest
            .urls()
            .iter()
            .filter(|u| !self.excluded.contains(u.as_str()))
            .cloned()
            .collect();
        self.index = match self.visible.len() {
            0 => 0,
            len => self.index % len,
        };
        true
    }
}
