//! End-to-end tests of the `gallery-view` binary against a local server.

mod common;

use common::{GalleryServer, sample_gallery};
use gallery_view::config;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary in `cwd` so no stray `gallery.toml` is picked up.
fn run(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gallery-view"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn gen_config_output_loads_back() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["gen-config"]);
    assert!(output.status.success());

    let path = tmp.path().join("gallery.toml");
    std::fs::write(&path, &output.stdout).unwrap();
    let loaded = config::load_config(&path, true).unwrap();
    assert_eq!(loaded.server.cache_bust_param, "dummy");
    assert_eq!(loaded.server.timeout_secs, 30);
}

#[test]
fn tags_lists_inventory() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["--base-url", &server.base_url(), "tags"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Tags (2)\n001 cats\n002 night sky\n");
}

#[test]
fn thumbnails_html_prints_fragment() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["--base-url", &server.base_url(), "thumbnails", "cats", "--html"],
    );
    assert!(output.status.success());
    let html = stdout(&output);
    assert_eq!(html.matches("<img").count(), 2);
    assert!(html.contains("A &lt;cat&gt;"));
}

#[test]
fn image_lists_detail() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["--base-url", &server.base_url(), "image", "b.jpg"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("    Tags: cats,night sky"));
}

#[test]
fn missing_tag_exits_non_zero() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["--base-url", &server.base_url(), "thumbnails", "dogs"]);
    assert!(!output.status.success());
}

#[test]
fn snapshot_writes_all_three_regions() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &[
            "--base-url",
            &server.base_url(),
            "snapshot",
            "--tag",
            "cats",
            "--image",
            "a.jpg",
            "--output",
            "page.html",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let html = std::fs::read_to_string(tmp.path().join("page.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"id="tag_buttons""#));
    assert!(html.contains(r#"id="thumbnails""#));
    assert!(html.contains(r#"id="original_image""#));
    assert!(html.contains("<p>Description: x</p>"));
}

#[test]
fn snapshot_failure_still_writes_alert() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["--base-url", &server.base_url(), "snapshot", "--tag", "dogs", "--output", "p.html"],
    );
    assert!(!output.status.success());

    let html = std::fs::read_to_string(tmp.path().join("p.html")).unwrap();
    assert!(html.contains(r#"role="alert""#));
    assert!(html.contains(r#"data-tag="cats""#));
}

#[test]
fn thumbnails_html_failure_prints_alert() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["--base-url", &server.base_url(), "thumbnails", "dogs", "--html"],
    );
    assert!(!output.status.success());
    assert!(stdout(&output).contains(r#"role="alert""#));
}

#[test]
fn keep_previous_prints_no_alert() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let toml = format!(
        "[server]\nbase_url = \"{}\"\n\n[render]\non_failure = \"keep-previous\"\n",
        server.base_url()
    );
    std::fs::write(tmp.path().join("gallery.toml"), toml).unwrap();

    let output = run(tmp.path(), &["thumbnails", "dogs", "--html"]);
    assert!(!output.status.success());
    assert!(!stdout(&output).contains("role="));
}

#[test]
fn snapshot_controls_have_defined_handlers() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["--base-url", &server.base_url(), "snapshot", "--tag", "cats"],
    );
    assert!(output.status.success());

    let html = stdout(&output);
    assert!(html.contains(r#"onclick="getThumbnailsFor(this.dataset.tag)""#));
    assert!(html.contains(r#"onclick="getOriginalImage(this.dataset.name)""#));
    assert!(html.contains("window.getThumbnailsFor = function"));
    assert!(html.contains("window.getOriginalImage = function"));
    assert!(html.contains(&format!(r#"data-endpoint-base="{}""#, server.base_url())));
    assert!(html.contains(&format!(r#"src="{}thumbnail?name=a.jpg""#, server.base_url())));
}

#[test]
fn snapshot_requests_are_cache_busted() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["--base-url", &server.base_url(), "snapshot", "--tag", "cats"],
    );
    assert!(output.status.success());

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.contains("?dummy=")));
}

#[test]
fn config_file_disables_cache_bust() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let toml = format!(
        "[server]\nbase_url = \"{}\"\ncache_bust = false\n",
        server.base_url()
    );
    std::fs::write(tmp.path().join("gallery.toml"), toml).unwrap();

    let output = run(tmp.path(), &["tags"]);
    assert!(output.status.success());
    assert_eq!(server.requests(), vec!["/gallery/rest/gallery".to_string()]);
}

#[test]
fn explicit_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["--config", "nope.toml", "tags"]);
    assert!(!output.status.success());
}

#[test]
fn export_writes_linked_site() {
    let server = GalleryServer::start(sample_gallery());
    let tmp = TempDir::new().unwrap();
    let output = run(
        tmp.path(),
        &["--base-url", &server.base_url(), "export", "--output", "site"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let site = tmp.path().join("site");
    for file in ["index.html", "tag-001.html", "tag-002.html", "image-003.html"] {
        assert!(site.join(file).is_file(), "missing {file}");
    }
    let night = std::fs::read_to_string(site.join("tag-002.html")).unwrap();
    assert!(night.contains(&format!("{}thumbnail?name=c.jpg", server.base_url())));
    assert!(stdout(&output).contains("Exported 2 tag pages, 3 image pages"));
}
