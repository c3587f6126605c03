//! The three page regions the loaders write into.
//!
//! Each [`Region`] is owned by exactly one loader and only ever changes
//! through a wholesale replace. Writes are guarded by a per-region
//! generation: a loader takes a [`Ticket`] before its request goes out and
//! may only commit if no newer selection for that region has started since.
//! A slow response for an old selection therefore can never overwrite the
//! result of a newer one, whatever order the responses arrive in.

use maud::Markup;
use std::sync::Mutex;

/// One of the three fixed regions of the gallery page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Tag buttons.
    Tags,
    /// Thumbnails for the selected tag.
    Thumbnails,
    /// The selected original image and its metadata.
    Detail,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Tags, Region::Thumbnails, Region::Detail];

    /// `id` of the element holding this region in the page markup.
    pub fn element_id(self) -> &'static str {
        match self {
            Region::Tags => "tag_buttons",
            Region::Thumbnails => "thumbnails",
            Region::Detail => "original_image",
        }
    }

    /// Short human label, used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Region::Tags => "tags",
            Region::Thumbnails => "thumbnails",
            Region::Detail => "image",
        }
    }

    fn index(self) -> usize {
        match self {
            Region::Tags => 0,
            Region::Thumbnails => 1,
            Region::Detail => 2,
        }
    }
}

/// Permission to write one region, valid until a newer selection starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket does nothing unless committed"]
pub struct Ticket {
    region: Region,
    generation: u64,
}

impl Ticket {
    pub fn region(&self) -> Region {
        self.region
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    content: String,
}

/// The gallery page as three independently replaceable regions.
#[derive(Debug, Default)]
pub struct Page {
    slots: [Mutex<Slot>; 3],
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection for `region`, superseding any earlier ticket.
    pub fn begin(&self, region: Region) -> Ticket {
        let mut slot = self.slot(region);
        slot.generation += 1;
        Ticket {
            region,
            generation: slot.generation,
        }
    }

    /// Replace the region's contents if `ticket` is still the latest
    /// selection. Returns `false` (and changes nothing) when superseded.
    pub fn commit(&self, ticket: Ticket, markup: Markup) -> bool {
        let mut slot = self.slot(ticket.region);
        if slot.generation != ticket.generation {
            return false;
        }
        slot.content = markup.into_string();
        true
    }

    /// [`commit`](Self::commit) that also empties `cleared` and supersedes
    /// its in-flight selections, both under one lock. A selection for
    /// `cleared` that starts after this returns is never wiped by it.
    pub fn commit_clearing(&self, ticket: Ticket, markup: Markup, cleared: Region) -> bool {
        if cleared == ticket.region {
            return self.commit(ticket, markup);
        }
        // Always lock in region order so two-slot commits cannot deadlock.
        let (mut slot, mut other) = if ticket.region.index() < cleared.index() {
            let slot = self.slot(ticket.region);
            (slot, self.slot(cleared))
        } else {
            let other = self.slot(cleared);
            (self.slot(ticket.region), other)
        };
        if slot.generation != ticket.generation {
            return false;
        }
        other.generation += 1;
        other.content.clear();
        slot.content = markup.into_string();
        true
    }

    /// Whether `ticket` could still commit.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slot(ticket.region).generation == ticket.generation
    }

    /// Current markup of `region`.
    pub fn contents(&self, region: Region) -> String {
        self.slot(region).content.clone()
    }

    fn slot(&self, region: Region) -> std::sync::MutexGuard<'_, Slot> {
        // Slot updates cannot panic halfway, so a poisoned lock still holds
        // consistent content.
        self.slots[region.index()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
