//! # Gallery View
//!
//! A viewer for a tagged image gallery served over HTTP. The server owns the
//! data; this crate fetches it, escapes it, and renders it into three page
//! regions with maud.
//!
//! # Architecture: Three Loaders, Three Regions
//!
//! Every interaction is one loader cycle: trigger → fetch → render → commit.
//!
//! ```text
//! load_tags()        GET rest/gallery               →  #tag_buttons
//! show_tag(tag)      GET rest/gallery/tag/{tag}     →  #thumbnails   (clears #original_image)
//! show_image(name)   GET rest/gallery/image/{name}  →  #original_image
//! ```
//!
//! Every request carries a random `dummy=` query parameter so intermediate
//! caches never answer with a stale listing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`escape`] | HTML escaping of server text; the [`escape::Escaped`] newtype |
//! | [`types`] | JSON records returned by the endpoints (`Tag`, `ThumbnailEntry`, `ImageDetail`) |
//! | [`api`] | Endpoint URLs, the [`api::GalleryApi`] seam, and the blocking HTTP client |
//! | [`page`] | The three named regions and the generation guard against stale responses |
//! | [`viewer`] | The loaders, failure policy and outcomes |
//! | [`render`] | Maud fragments for each region, the stylesheet and full documents |
//! | [`export`] | Static export of every tag and image page, fetched in parallel |
//! | [`config`] | Layered `gallery.toml` loading, validation and CSS generation |
//! | [`output`] | CLI output formatting for listings and export results |
//!
//! # Design Decisions
//!
//! ## Escaping Is a Type
//!
//! Every server-supplied string reaches markup either through maud's
//! auto-escaping interpolation or as an [`escape::Escaped`] value. Nothing
//! builds HTML by string concatenation, so a description like `<script>`
//! always renders as text.
//!
//! ## Latest Selection Wins
//!
//! Responses can arrive out of order. Each region keeps a generation counter;
//! a loader takes a ticket when it starts and may only write while its ticket
//! is still the newest. Selecting a tag also invalidates any image detail
//! still in flight.
//!
//! ## Failures Are Visible
//!
//! Loaders return `Result`. By default a failed fetch replaces its region with
//! an error notice; `render.on_failure = "keep-previous"` leaves the region
//! untouched instead.

pub mod api;
pub mod config;
pub mod escape;
pub mod export;
pub mod output;
pub mod page;
pub mod render;
pub mod types;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
