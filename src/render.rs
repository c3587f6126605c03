//! HTML fragments for the three page regions.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Server text only ever reaches a template as [`Escaped`], so each fragment
//! is safe to inject into its region as-is.
//!
//! ## Activation
//!
//! Tag buttons and thumbnails must hand their *raw* value back to the next
//! loader. How they do that depends on where the markup ends up:
//!
//! - [`Activation::Script`]: the live page. The value rides in a `data-*`
//!   attribute and the `onclick` handler reads it from `this.dataset`, so no
//!   server text is ever spliced into script source.
//! - [`Activation::Links`]: static pages. Controls become plain links to
//!   pre-rendered pages chosen by a [`LinkTargets`] implementation.
//!
//! ## Fragments
//!
//! ```text
//! #tag_buttons     <button class="tag_button" data-tag="…">…</button>…
//! #thumbnails      <img class="thumbnail" src="thumbnail?name=…" data-name="…" alt="…">…
//! #original_image  <img src="image?name=…" alt="…"><p>Description: …</p><p>Tags: …</p>
//! ```

use crate::api::FetchError;
use crate::config::{self, ViewerConfig};
use crate::escape::Escaped;
use crate::page::{Page, Region};
use crate::types::{ImageDetail, Tag, ThumbnailEntry};
use crate::viewer::FailurePolicy;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use url::form_urlencoded;

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS_LIVE: &str = include_str!("../static/viewer.js");

/// Handler wired to tag buttons on the live page.
pub const SHOW_TAG_HANDLER: &str = "getThumbnailsFor(this.dataset.tag)";
/// Handler wired to thumbnails on the live page.
pub const SHOW_IMAGE_HANDLER: &str = "getOriginalImage(this.dataset.name)";

/// Resolves `thumbnail?name=` and `image?name=` asset URLs.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    base: String,
}

impl Assets {
    /// Relative to the page, for markup served by the gallery itself.
    pub fn relative() -> Self {
        Self::default()
    }

    /// Rooted at an absolute base, for pages served from elsewhere.
    pub fn rooted_at(base: &str) -> Self {
        let base = if base.is_empty() || base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        Self { base }
    }

    /// Prefix put in front of `thumbnail?` and `image?`; empty when relative.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn thumbnail_src(&self, name: &str) -> Escaped {
        self.src("thumbnail", name)
    }

    pub fn image_src(&self, name: &str) -> Escaped {
        self.src("image", name)
    }

    fn src(&self, resource: &str, name: &str) -> Escaped {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("name", name)
            .finish();
        Escaped::new(&format!("{}{resource}?{query}", self.base))
    }
}

/// Page targets for [`Activation::Links`]. `None` renders the control
/// without a link.
pub trait LinkTargets {
    fn tag_href(&self, tag: &str) -> Option<String>;
    fn image_href(&self, name: &str) -> Option<String>;
}

/// How rendered controls invoke the next loader.
#[derive(Clone, Copy)]
pub enum Activation<'a> {
    Script,
    Links(&'a dyn LinkTargets),
}

// ============================================================================
// Region fragments
// ============================================================================

/// One control per tag, in the given order.
pub fn tag_buttons(tags: &[Tag], activation: Activation<'_>) -> Markup {
    html! {
        @for tag in tags {
            @let label = Escaped::new(tag.as_str());
            @match activation {
                Activation::Script => {
                    button.tag_button type="button" data-tag=(label) onclick=(SHOW_TAG_HANDLER) {
                        (label)
                    }
                }
                Activation::Links(targets) => {
                    @if let Some(href) = targets.tag_href(tag.as_str()) {
                        a.tag_button href=(Escaped::new(&href)) { (label) }
                    } @else {
                        span.tag_button { (label) }
                    }
                }
            }
        }
    }
}

/// One thumbnail per entry, in the given order. An empty slice renders
/// nothing.
pub fn thumbnails(entries: &[ThumbnailEntry], assets: &Assets, activation: Activation<'_>) -> Markup {
    html! {
        @for entry in entries {
            @let src = assets.thumbnail_src(&entry.file_name);
            @let alt = Escaped::new(&entry.description);
            @match activation {
                Activation::Script => {
                    img.thumbnail
                        src=(src)
                        data-name=(Escaped::new(&entry.file_name))
                        onclick=(SHOW_IMAGE_HANDLER)
                        alt=(alt);
                }
                Activation::Links(targets) => {
                    @if let Some(href) = targets.image_href(&entry.file_name) {
                        a.thumbnail-link href=(Escaped::new(&href)) {
                            img.thumbnail src=(src) alt=(alt) loading="lazy";
                        }
                    } @else {
                        img.thumbnail src=(src) alt=(alt) loading="lazy";
                    }
                }
            }
        }
    }
}

/// The original image followed by its description and tags.
pub fn detail(image: &ImageDetail, assets: &Assets) -> Markup {
    let description = Escaped::new(&image.description);
    html! {
        img src=(assets.image_src(&image.file_name)) alt=(description);
        p { "Description: " (description) }
        p { "Tags: " (Escaped::new(&image.tags)) }
    }
}

/// Visible error state for a region whose fetch failed.
pub fn failure(region: Region, error: &FetchError) -> Markup {
    html! {
        p.load-error role="alert" {
            "Could not load " (region.label()) ": " (Escaped::new(&error.to_string()))
        }
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Full stylesheet: config-driven variables followed by the static rules.
pub fn stylesheet(config: &ViewerConfig) -> String {
    let variables = config::generate_css_variables(&config.colors, &config.theme);
    format!("{variables}\n\n{CSS_STATIC}")
}

/// Renders the base HTML document structure.
pub fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    let title = Escaped::new(title);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                h1 { (title) }
                (content)
            }
        }
    }
}

/// What the live script needs to run the loaders in the browser.
#[derive(Debug, Clone)]
pub struct LiveSettings {
    /// Gallery root the `rest/gallery` endpoints are resolved against.
    pub endpoint_base: String,
    pub assets: Assets,
    /// `None` turns the cache-buster off.
    pub cache_bust_param: Option<String>,
    pub on_failure: FailurePolicy,
}

impl LiveSettings {
    /// Endpoints and assets both at `server.base_url`, so the document works
    /// wherever it is opened.
    pub fn from_config(config: &ViewerConfig) -> Self {
        let server = &config.server;
        Self {
            endpoint_base: Assets::rooted_at(&server.base_url).base().to_string(),
            assets: Assets::rooted_at(&server.base_url),
            cache_bust_param: server.cache_bust.then(|| server.cache_bust_param.clone()),
            on_failure: config.render.on_failure,
        }
    }
}

/// The three regions wrapped in their containers.
///
/// Region contents are inserted verbatim: they were produced by the
/// fragment renderers above.
pub fn regions(page: &Page) -> Markup {
    html! {
        @for region in Region::ALL {
            div id=(region.element_id()) {
                (PreEscaped(page.contents(region)))
            }
        }
    }
}

/// A complete document showing the current state of `page`, with no
/// script. Controls must use [`Activation::Links`] to stay usable.
pub fn page_document(title: &str, css: &str, page: &Page) -> Markup {
    base_document(title, css, regions(page))
}

/// A complete live document: the current state of `page` plus the script
/// defining [`SHOW_TAG_HANDLER`] and [`SHOW_IMAGE_HANDLER`], so controls
/// rendered with [`Activation::Script`] keep loading from the server.
pub fn live_document(title: &str, css: &str, page: &Page, live: &LiveSettings) -> Markup {
    let title = Escaped::new(title);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body
                data-endpoint-base=(Escaped::new(&live.endpoint_base))
                data-asset-base=(Escaped::new(live.assets.base()))
                data-cache-bust=[live.cache_bust_param.as_deref().map(Escaped::new)]
                data-on-failure=(live.on_failure.as_str())
            {
                h1 { (title) }
                (regions(page))
                script { (PreEscaped(JS_LIVE)) }
            }
        }
    }
}
