//! Gallery endpoint client.
//!
//! [`GalleryApi`] is the seam between the loaders and the network: the
//! [`Viewer`](crate::viewer::Viewer) and the exporter only ever talk to the
//! trait, so tests substitute an in-memory gallery and the CLI plugs in
//! [`HttpGallery`].
//!
//! ## Endpoints
//!
//! All three are read-only `GET`s relative to the configured base URL:
//!
//! ```text
//! rest/gallery                 → ["tag", ...]
//! rest/gallery/tag/{tag}       → [{"fileName": .., "description": ..}, ...]
//! rest/gallery/image/{name}    → {"fileName": .., "description": .., "tags": ..}
//! ```
//!
//! Each request carries a fresh random cache-bust query parameter
//! (`dummy=<u64>` by default) so intermediate caches never answer with a
//! stale listing.
//!
//! ## Failure classification
//!
//! Bodies are read as text and decoded separately, so a transport failure,
//! a non-2xx status and a malformed payload each surface as a distinct
//! [`FetchError`] variant.

use crate::config::ServerConfig;
use crate::types::{ImageDetail, Tag, ThumbnailEntry};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found: {url}")]
    NotFound { url: String },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid base URL: {0}")]
    InvalidBase(String),
}

/// Read-only access to the gallery.
pub trait GalleryApi: Send + Sync {
    /// All tags, in server order.
    fn tags(&self) -> Result<Vec<Tag>, FetchError>;
    /// Images carrying `tag`, in server order.
    fn thumbnails(&self, tag: &str) -> Result<Vec<ThumbnailEntry>, FetchError>;
    /// Metadata for the image named `name`.
    fn image(&self, name: &str) -> Result<ImageDetail, FetchError>;
}

/// URL builder for the three JSON endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    cache_bust_param: Option<String>,
}

impl Endpoints {
    /// `base` is the gallery application root; a trailing slash is added if
    /// missing so relative joins stay under it.
    pub fn new(base: &str, cache_bust_param: Option<&str>) -> Result<Self, FetchError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized).map_err(|_| FetchError::InvalidBase(base.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidBase(base.to_string()));
        }
        Ok(Self {
            base,
            cache_bust_param: cache_bust_param.map(str::to_string),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn tags_url(&self, buster: u64) -> Result<Url, FetchError> {
        self.endpoint(&[], buster)
    }

    pub fn thumbnails_url(&self, tag: &str, buster: u64) -> Result<Url, FetchError> {
        self.endpoint(&["tag", tag], buster)
    }

    pub fn image_url(&self, name: &str, buster: u64) -> Result<Url, FetchError> {
        self.endpoint(&["image", name], buster)
    }

    /// `rest/gallery` plus `segments`, each pushed as one percent-encoded
    /// path segment.
    fn endpoint(&self, segments: &[&str], buster: u64) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidBase(self.base.to_string()))?
            .pop_if_empty()
            .push("rest")
            .push("gallery")
            .extend(segments);
        if let Some(param) = &self.cache_bust_param {
            url.query_pairs_mut()
                .append_pair(param, &buster.to_string());
        }
        Ok(url)
    }
}

/// [`GalleryApi`] over HTTP with a blocking `reqwest` client.
pub struct HttpGallery {
    client: Client,
    endpoints: Endpoints,
}

impl HttpGallery {
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoints,
        })
    }

    pub fn from_config(server: &ServerConfig) -> Result<Self, FetchError> {
        let param = server
            .cache_bust
            .then_some(server.cache_bust_param.as_str());
        let endpoints = Endpoints::new(&server.base_url, param)?;
        let timeout = (server.timeout_secs > 0).then(|| Duration::from_secs(server.timeout_secs));
        Self::new(endpoints, timeout)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl GalleryApi for HttpGallery {
    fn tags(&self) -> Result<Vec<Tag>, FetchError> {
        self.get_json(self.endpoints.tags_url(rand::random())?)
    }

    fn thumbnails(&self, tag: &str) -> Result<Vec<ThumbnailEntry>, FetchError> {
        self.get_json(self.endpoints.thumbnails_url(tag, rand::random())?)
    }

    fn image(&self, name: &str) -> Result<ImageDetail, FetchError> {
        self.get_json(self.endpoints.image_url(name, rand::random())?)
    }
}
