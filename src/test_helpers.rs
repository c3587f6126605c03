//! Shared test utilities for the gallery-view test suite.
//!
//! [`FakeGallery`] is an in-memory [`GalleryApi`] built up with a small
//! builder API. It records every request and can hold a request open on a
//! "gate" so tests can force responses to arrive out of order.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let api = FakeGallery::new()
//!     .with_tags(&["cats"])
//!     .with_tag_images("cats", &[("a.jpg", "A cat")])
//!     .with_image("a.jpg", "A cat", "cats,pets");
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender};

use crate::api::{FetchError, GalleryApi};
use crate::types::{ImageDetail, Tag, ThumbnailEntry};

/// Holds a request until the test releases it.
struct Gate {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl Gate {
    fn pass(&self) {
        let _ = self.entered.lock().unwrap().send(());
        let _ = self.release.lock().unwrap().recv();
    }
}

#[derive(Default)]
pub struct FakeGallery {
    /// `None` makes the tag list fail with HTTP 500.
    tags: Option<Vec<Tag>>,
    by_tag: HashMap<String, Vec<ThumbnailEntry>>,
    images: HashMap<String, ImageDetail>,
    gates: HashMap<String, Gate>,
    requests: Mutex<Vec<String>>,
}

impl FakeGallery {
    pub fn new() -> Self {
        Self {
            tags: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Some(tags.iter().map(|t| Tag::new(*t)).collect());
        self
    }

    /// Register the thumbnail listing for `tag` as `(fileName, description)`
    /// pairs.
    pub fn with_tag_images(mut self, tag: &str, images: &[(&str, &str)]) -> Self {
        let entries = images
            .iter()
            .map(|(name, description)| ThumbnailEntry {
                file_name: name.to_string(),
                description: description.to_string(),
            })
            .collect();
        self.by_tag.insert(tag.to_string(), entries);
        self
    }

    pub fn with_image(mut self, name: &str, description: &str, tags: &str) -> Self {
        self.images.insert(
            name.to_string(),
            ImageDetail {
                file_name: name.to_string(),
                description: description.to_string(),
                tags: tags.to_string(),
            },
        );
        self
    }

    pub fn failing_tags(mut self) -> Self {
        self.tags = None;
        self
    }

    /// Block `thumbnails(tag)`: signal `entered`, then wait on `release`.
    pub fn gate_tag(self, tag: &str, entered: Sender<()>, release: Receiver<()>) -> Self {
        self.gate(format!("tag:{tag}"), entered, release)
    }

    /// Block `image(name)`: signal `entered`, then wait on `release`.
    pub fn gate_image(self, name: &str, entered: Sender<()>, release: Receiver<()>) -> Self {
        self.gate(format!("image:{name}"), entered, release)
    }

    fn gate(mut self, key: String, entered: Sender<()>, release: Receiver<()>) -> Self {
        self.gates.insert(
            key,
            Gate {
                entered: Mutex::new(entered),
                release: Mutex::new(release),
            },
        );
        self
    }

    /// Every request so far, as `tags`, `tag:{tag}` or `image:{name}`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, key: String) {
        if let Some(gate) = self.gates.get(&key) {
            gate.pass();
        }
        self.requests.lock().unwrap().push(key);
    }
}

impl GalleryApi for FakeGallery {
    fn tags(&self) -> Result<Vec<Tag>, FetchError> {
        self.record("tags".to_string());
        self.tags.clone().ok_or_else(|| FetchError::Status {
            url: "rest/gallery".to_string(),
            status: 500,
        })
    }

    fn thumbnails(&self, tag: &str) -> Result<Vec<ThumbnailEntry>, FetchError> {
        self.record(format!("tag:{tag}"));
        self.by_tag
            .get(tag)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: format!("rest/gallery/tag/{tag}"),
            })
    }

    fn image(&self, name: &str) -> Result<ImageDetail, FetchError> {
        self.record(format!("image:{name}"));
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: format!("rest/gallery/image/{name}"),
            })
    }
}
