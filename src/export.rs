//! Static export of the whole gallery.
//!
//! Walks every tag and every image the endpoints expose and writes a flat set
//! of linked pages, so the gallery can be browsed without a script host:
//!
//! ```text
//! out/
//! ├── index.html        # Tag buttons only
//! ├── tag-001.html      # Tag buttons + thumbnails for the first tag
//! ├── tag-002.html
//! ├── image-001.html    # Tag buttons + the first distinct image
//! └── ...
//! ```
//!
//! Pages are numbered by position (tags in server order, images in order of
//! first appearance) so server text never becomes part of a file name.
//!
//! Thumbnail listings and image details are fetched in parallel on a bounded
//! rayon pool. A failed listing or detail still gets its page, showing the
//! same error fragment the live viewer would; only a failed tag list aborts
//! the export.

use crate::api::{FetchError, GalleryApi};
use crate::page::{Page, Region};
use crate::render::{self, Activation, Assets, LinkTargets};
use crate::types::{ImageDetail, Tag, ThumbnailEntry};
use maud::Markup;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not fetch tag list: {0}")]
    Fetch(#[from] FetchError),
    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub struct ExportOptions<'a> {
    /// Page heading and document title prefix.
    pub title: &'a str,
    /// Full stylesheet inlined into every page.
    pub css: &'a str,
    /// Where `thumbnail?name=` and `image?name=` resolve.
    pub assets: Assets,
    /// Parallel fetches.
    pub workers: usize,
}

/// One written page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPage {
    pub label: String,
    pub file: String,
    pub ok: bool,
}

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    pub tag_pages: Vec<ExportedPage>,
    pub image_pages: Vec<ExportedPage>,
}

impl ExportSummary {
    pub fn failures(&self) -> usize {
        self.tag_pages
            .iter()
            .chain(&self.image_pages)
            .filter(|p| !p.ok)
            .count()
    }
}

/// Maps tags and image names to their page files.
#[derive(Debug, Default)]
pub struct SiteIndex {
    tags: HashMap<String, String>,
    images: HashMap<String, String>,
}

impl SiteIndex {
    pub fn new(tags: &[Tag], image_names: &[String]) -> Self {
        let tags = tags
            .iter()
            .enumerate()
            .map(|(idx, tag)| (tag.as_str().to_string(), tag_page_file(idx)))
            .collect();
        let images = image_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), image_page_file(idx)))
            .collect();
        Self { tags, images }
    }
}

impl LinkTargets for SiteIndex {
    fn tag_href(&self, tag: &str) -> Option<String> {
        self.tags.get(tag).cloned()
    }

    fn image_href(&self, name: &str) -> Option<String> {
        self.images.get(name).cloned()
    }
}

fn tag_page_file(idx: usize) -> String {
    format!("tag-{:03}.html", idx + 1)
}

fn image_page_file(idx: usize) -> String {
    format!("image-{:03}.html", idx + 1)
}

/// Tags with repeats dropped, keeping the first occurrence, so every tag
/// page is reachable from the tag buttons.
fn distinct_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}

/// Distinct file names across all successful listings, in first-seen order.
fn distinct_images(listings: &[Result<Vec<ThumbnailEntry>, FetchError>]) -> Vec<String> {
    let mut seen = HashSet::new();
    listings
        .iter()
        .filter_map(|listing| listing.as_ref().ok())
        .flatten()
        .filter(|entry| seen.insert(entry.file_name.clone()))
        .map(|entry| entry.file_name.clone())
        .collect()
}

pub fn export<A: GalleryApi>(
    api: &A,
    output_dir: &Path,
    options: &ExportOptions<'_>,
) -> Result<ExportSummary, ExportError> {
    let tags = distinct_tags(api.tags()?);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()?;

    let listings: Vec<Result<Vec<ThumbnailEntry>, FetchError>> =
        pool.install(|| tags.par_iter().map(|tag| api.thumbnails(tag.as_str())).collect());
    let image_names = distinct_images(&listings);
    let details: Vec<Result<ImageDetail, FetchError>> =
        pool.install(|| image_names.par_iter().map(|name| api.image(name)).collect());

    let index = SiteIndex::new(&tags, &image_names);
    let tag_panel = render::tag_buttons(&tags, Activation::Links(&index));

    fs::create_dir_all(output_dir)?;
    let mut summary = ExportSummary {
        output_dir: output_dir.to_path_buf(),
        ..ExportSummary::default()
    };

    let page = Page::new();
    fill(&page, Region::Tags, tag_panel.clone());
    write_page(output_dir, "index.html", options, options.title, &page)?;

    for (idx, (tag, listing)) in tags.iter().zip(&listings).enumerate() {
        let page = Page::new();
        fill(&page, Region::Tags, tag_panel.clone());
        let thumbnails = match listing {
            Ok(entries) => render::thumbnails(entries, &options.assets, Activation::Links(&index)),
            Err(error) => {
                warn!(tag = tag.as_str(), %error, "tag listing failed");
                render::failure(Region::Thumbnails, error)
            }
        };
        fill(&page, Region::Thumbnails, thumbnails);

        let file = tag_page_file(idx);
        let title = format!("{} · {}", options.title, tag);
        write_page(output_dir, &file, options, &title, &page)?;
        summary.tag_pages.push(ExportedPage {
            label: tag.to_string(),
            file,
            ok: listing.is_ok(),
        });
    }

    for (idx, (name, detail)) in image_names.iter().zip(&details).enumerate() {
        let page = Page::new();
        fill(&page, Region::Tags, tag_panel.clone());
        let markup = match detail {
            Ok(image) => render::detail(image, &options.assets),
            Err(error) => {
                warn!(image = name.as_str(), %error, "image detail failed");
                render::failure(Region::Detail, error)
            }
        };
        fill(&page, Region::Detail, markup);

        let file = image_page_file(idx);
        let title = format!("{} · {}", options.title, name);
        write_page(output_dir, &file, options, &title, &page)?;
        summary.image_pages.push(ExportedPage {
            label: name.clone(),
            file,
            ok: detail.is_ok(),
        });
    }

    info!(
        tags = summary.tag_pages.len(),
        images = summary.image_pages.len(),
        failures = summary.failures(),
        "export complete"
    );
    Ok(summary)
}

fn fill(page: &Page, region: Region, markup: Markup) {
    let ticket = page.begin(region);
    page.commit(ticket, markup);
}

fn write_page(
    output_dir: &Path,
    file: &str,
    options: &ExportOptions<'_>,
    title: &str,
    page: &Page,
) -> std::io::Result<()> {
    let html = render::page_document(title, options.css, page);
    fs::write(output_dir.join(file), html.into_string())
}
