use clap::{Parser, Subcommand};
use gallery_view::api::{GalleryApi, HttpGallery};
use gallery_view::config::{self, ViewerConfig};
use gallery_view::export::{self, ExportOptions};
use gallery_view::output;
use gallery_view::page::Region;
use gallery_view::render::{self, Assets, LiveSettings};
use gallery_view::viewer::Viewer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const TITLE: &str = "Gallery";

#[derive(Parser)]
#[command(name = "gallery-view")]
#[command(about = "Browse a tagged image gallery served over HTTP")]
#[command(long_about = "\
Browse a tagged image gallery served over HTTP

The server exposes three JSON endpoints below its base URL:

  rest/gallery                 # tag list
  rest/gallery/tag/{tag}       # thumbnails for one tag
  rest/gallery/image/{name}    # one image's description and tags

and serves the pictures themselves at thumbnail?name= and image?name=.

Every request carries a random cache-busting query parameter (dummy=...)
unless disabled in gallery.toml.

Run 'gallery-view gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every command.
#[derive(clap::Args)]
struct GlobalArgs {
    /// Config file (gallery.toml is used when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gallery base URL, overriding server.base_url
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log every request and render at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the gallery's tags
    Tags {
        /// Print the tag buttons fragment instead of a listing
        #[arg(long)]
        html: bool,
    },
    /// List the images carrying a tag
    Thumbnails {
        tag: String,
        /// Print the thumbnails fragment instead of a listing
        #[arg(long)]
        html: bool,
    },
    /// Show one image's description and tags
    Image {
        name: String,
        /// Print the detail fragment instead of a listing
        #[arg(long)]
        html: bool,
    },
    /// Render a full page: tags, then optionally a tag and an image
    Snapshot {
        /// Tag to select after the tags load
        #[arg(long)]
        tag: Option<String>,
        /// Image to open after the thumbnails load
        #[arg(long)]
        image: Option<String>,
        /// Write the document here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a static, linked copy of every tag and image page
    Export {
        #[arg(long, default_value = "gallery-export")]
        output: PathBuf,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command {
        Command::Tags { html: false } => {
            let (_, api) = connect(&cli.global)?;
            output::print_lines(&output::format_tags(&api.tags()?));
        }
        Command::Thumbnails { tag, html: false } => {
            let (_, api) = connect(&cli.global)?;
            let entries = api.thumbnails(&tag)?;
            output::print_lines(&output::format_thumbnails(&tag, &entries));
        }
        Command::Image { name, html: false } => {
            let (_, api) = connect(&cli.global)?;
            output::print_lines(&output::format_detail(&api.image(&name)?));
        }
        Command::Tags { html: true } => {
            let (config, api) = connect(&cli.global)?;
            let viewer = Viewer::new(api, config.render.on_failure);
            let loaded = viewer.load_tags();
            println!("{}", viewer.page().contents(Region::Tags));
            loaded?;
        }
        Command::Thumbnails { tag, html: true } => {
            let (config, api) = connect(&cli.global)?;
            let viewer = Viewer::new(api, config.render.on_failure);
            let loaded = viewer.show_tag(&tag);
            println!("{}", viewer.page().contents(Region::Thumbnails));
            loaded?;
        }
        Command::Image { name, html: true } => {
            let (config, api) = connect(&cli.global)?;
            let viewer = Viewer::new(api, config.render.on_failure);
            let loaded = viewer.show_image(&name);
            println!("{}", viewer.page().contents(Region::Detail));
            loaded?;
        }
        Command::Snapshot { tag, image, output } => {
            let (config, api) = connect(&cli.global)?;
            let live = LiveSettings::from_config(&config);
            let viewer =
                Viewer::new(api, config.render.on_failure).with_assets(live.assets.clone());
            // Failed regions are still written; the first failure sets the exit status.
            let mut loads = vec![viewer.load_tags()];
            if let Some(tag) = &tag {
                loads.push(viewer.show_tag(tag));
            }
            if let Some(image) = &image {
                loads.push(viewer.show_image(image));
            }
            let css = render::stylesheet(&config);
            let html = render::live_document(TITLE, &css, viewer.page(), &live).into_string();
            match output {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{}", html),
            }
            if let Some(error) = loads.into_iter().find_map(Result::err) {
                return Err(error.into());
            }
        }
        Command::Export { output: out_dir } => {
            let (config, api) = connect(&cli.global)?;
            let css = render::stylesheet(&config);
            let options = ExportOptions {
                title: TITLE,
                css: &css,
                assets: Assets::rooted_at(config.export_asset_base()),
                workers: config::effective_workers(&config.export),
            };
            let summary = export::export(&api, &out_dir, &options)?;
            output::print_lines(&output::format_export_output(&summary));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so fragments and documents on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file, apply command-line overrides, build the client.
///
/// An explicit `--config` must exist; the implicit `gallery.toml` is optional.
fn connect(args: &GlobalArgs) -> Result<(ViewerConfig, HttpGallery), Box<dyn std::error::Error>> {
    let (path, required) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(config::CONFIG_FILENAME), false),
    };
    let mut config = config::load_config(&path, required)?;
    if let Some(base_url) = &args.base_url {
        config.server.base_url = base_url.clone();
        config.validate()?;
    }
    let api = HttpGallery::from_config(&config.server)?;
    Ok((config, api))
}
