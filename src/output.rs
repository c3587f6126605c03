//! CLI output formatting.
//!
//! Output is information-first: every entity leads with its positional index
//! and identity, with secondary details on indented context lines.
//!
//! ## Tags
//!
//! ```text
//! Tags (2)
//! 001 cats
//! 002 dogs
//! ```
//!
//! ## Thumbnails
//!
//! ```text
//! cats (2 images)
//! 001 a.jpg
//!     Description: A cat on a wall
//! 002 b.jpg
//! ```
//!
//! ## Image
//!
//! ```text
//! a.jpg
//!     Description: A cat on a wall
//!     Tags: cats,walls
//! ```
//!
//! ## Export
//!
//! ```text
//! Home → index.html
//!
//! Tags
//! 001 cats → tag-001.html
//! 002 gone → tag-002.html (failed)
//!
//! Images
//! 001 a.jpg → image-001.html
//!
//! Exported 2 tag pages, 1 image page to out (1 failed)
//! ```
//!
//! Each view has a `format_*` function returning lines (pure, testable) and
//! the CLI prints them with [`print_lines`]. Server text is shown raw except
//! that control characters are replaced, so a hostile description cannot
//! drive the terminal.

use crate::export::{ExportSummary, ExportedPage};
use crate::types::{ImageDetail, Tag, ThumbnailEntry};

/// Longest description shown on a context line, in characters.
const MAX_DESCRIPTION: usize = 80;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Replace control characters with U+FFFD.
fn terminal_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

pub fn format_tags(tags: &[Tag]) -> Vec<String> {
    let mut lines = vec![format!("Tags ({})", tags.len())];
    for (i, tag) in tags.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), terminal_safe(tag.as_str())));
    }
    lines
}

pub fn format_thumbnails(tag: &str, entries: &[ThumbnailEntry]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        terminal_safe(tag),
        plural(entries.len(), "image", "images")
    )];
    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            terminal_safe(&entry.file_name)
        ));
        if !entry.description.is_empty() {
            lines.push(format!(
                "    Description: {}",
                truncate_desc(&terminal_safe(&entry.description), MAX_DESCRIPTION)
            ));
        }
    }
    lines
}

pub fn format_detail(image: &ImageDetail) -> Vec<String> {
    vec![
        terminal_safe(&image.file_name),
        format!("    Description: {}", terminal_safe(&image.description)),
        format!("    Tags: {}", terminal_safe(&image.tags)),
    ]
}

fn page_line(index: usize, page: &ExportedPage) -> String {
    let status = if page.ok { "" } else { " (failed)" };
    format!(
        "{} {} → {}{}",
        format_index(index),
        terminal_safe(&page.label),
        page.file,
        status
    )
}

pub fn format_export_output(summary: &ExportSummary) -> Vec<String> {
    let mut lines = vec!["Home → index.html".to_string()];

    if !summary.tag_pages.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        for (i, page) in summary.tag_pages.iter().enumerate() {
            lines.push(page_line(i + 1, page));
        }
    }

    if !summary.image_pages.is_empty() {
        lines.push(String::new());
        lines.push("Images".to_string());
        for (i, page) in summary.image_pages.iter().enumerate() {
            lines.push(page_line(i + 1, page));
        }
    }

    lines.push(String::new());
    let failures = summary.failures();
    let failed = if failures > 0 {
        format!(" ({failures} failed)")
    } else {
        String::new()
    };
    lines.push(format!(
        "Exported {}, {} to {}{}",
        plural(summary.tag_pages.len(), "tag page", "tag pages"),
        plural(summary.image_pages.len(), "image page", "image pages"),
        summary.output_dir.display(),
        failed
    ));
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
