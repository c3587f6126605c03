//! The three loaders.
//!
//! Each loader is one trigger → fetch → render → commit cycle against a
//! [`Page`] region:
//!
//! | Loader | Region | Fetch |
//! |--------|--------|-------|
//! | [`Viewer::load_tags`] | Tags | tag list |
//! | [`Viewer::show_tag`] | Thumbnails (clears Detail) | images for a tag |
//! | [`Viewer::show_image`] | Detail | one image's metadata |
//!
//! Loaders keep no state between calls. A `&Viewer` can be shared across
//! threads; concurrent selections of the same region race, and the page's
//! generation guard makes the most recently *started* selection win.
//!
//! Every loader returns its result. What the region shows on failure is
//! decided by the [`FailurePolicy`].

use crate::api::{FetchError, GalleryApi};
use crate::page::{Page, Region, Ticket};
use crate::render::{self, Activation, Assets};
use maud::Markup;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What a region shows after its fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Replace the region with a visible error message.
    #[default]
    ShowError,
    /// Leave the region as it was.
    KeepPrevious,
}

impl FailurePolicy {
    /// The config spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::ShowError => "show-error",
            FailurePolicy::KeepPrevious => "keep-previous",
        }
    }
}

/// Result of a loader whose fetch succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The region now shows this selection.
    Rendered,
    /// A newer selection for the region started while this one was in
    /// flight; the response was dropped.
    Superseded,
}

pub struct Viewer<A> {
    api: A,
    page: Page,
    policy: FailurePolicy,
    assets: Assets,
}

impl<A: GalleryApi> Viewer<A> {
    pub fn new(api: A, policy: FailurePolicy) -> Self {
        Self {
            api,
            page: Page::new(),
            policy,
            assets: Assets::relative(),
        }
    }

    /// Resolve thumbnail and image links against `assets` instead of the
    /// page location.
    pub fn with_assets(mut self, assets: Assets) -> Self {
        self.assets = assets;
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Render one control per tag into the Tags region.
    pub fn load_tags(&self) -> Result<Outcome, FetchError> {
        let ticket = self.page.begin(Region::Tags);
        let tags = self.api.tags().map_err(|e| self.fail(ticket, e))?;
        let markup = render::tag_buttons(&tags, Activation::Script);
        Ok(self.finish(ticket, markup, tags.len(), None))
    }

    /// Render the thumbnails for `tag` and clear the Detail region.
    pub fn show_tag(&self, tag: &str) -> Result<Outcome, FetchError> {
        let ticket = self.page.begin(Region::Thumbnails);
        let entries = self.api.thumbnails(tag).map_err(|e| self.fail(ticket, e))?;
        let markup = render::thumbnails(&entries, &self.assets, Activation::Script);
        Ok(self.finish(ticket, markup, entries.len(), Some(Region::Detail)))
    }

    /// Render the original image named `name` into the Detail region.
    pub fn show_image(&self, name: &str) -> Result<Outcome, FetchError> {
        let ticket = self.page.begin(Region::Detail);
        let image = self.api.image(name).map_err(|e| self.fail(ticket, e))?;
        let markup = render::detail(&image, &self.assets);
        Ok(self.finish(ticket, markup, 1, None))
    }

    /// Commit `markup`, emptying `clears` in the same step when given.
    fn finish(&self, ticket: Ticket, markup: Markup, items: usize, clears: Option<Region>) -> Outcome {
        let region = ticket.region().label();
        let committed = match clears {
            Some(cleared) => self.page.commit_clearing(ticket, markup, cleared),
            None => self.page.commit(ticket, markup),
        };
        if committed {
            info!(region, items, "rendered");
            Outcome::Rendered
        } else {
            debug!(region, "dropped superseded response");
            Outcome::Superseded
        }
    }

    fn fail(&self, ticket: Ticket, error: FetchError) -> FetchError {
        let region = ticket.region();
        warn!(region = region.label(), %error, "load failed");
        if self.policy == FailurePolicy::ShowError {
            // A stale failure must not hide a newer selection's content.
            self.page.commit(ticket, render::failure(region, &error));
        }
        error
    }
}
