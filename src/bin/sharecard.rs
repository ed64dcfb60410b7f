use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use sharecard::{
    Config, FontBook, FontProbe as _, GenerationBatch, HeadlineSizing, HttpVideoSource,
    JsonFilePreferences, MemoryPreferences, Notice, PreferenceStore, RenderOptions, Session,
    TextEngine, VideoId, VideoMetadata,
};

#[derive(Parser, Debug)]
#[command(name = "sharecard", version, about = "Render shareable images for a YouTube video")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a video's metadata and thumbnail, then render all four images.
    Generate(GenerateArgs),
    /// Render all four images from a local thumbnail without network access.
    Render(RenderArgs),
    /// List the offered font families, or check one.
    Fonts(FontsArgs),
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Font family for all text (saved for next time).
    #[arg(long)]
    font: Option<String>,

    /// Write a single `thumbnails-<id>.zip` instead of individual files.
    #[arg(long, conflicts_with = "stagger")]
    zip: bool,

    /// Pause between individual files.
    #[arg(long)]
    stagger: bool,

    /// Always draw the headline at 110px instead of shrinking it to fit.
    #[arg(long)]
    fixed_headline: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// youtu.be or youtube.com video URL.
    url: String,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Thumbnail image (JPEG, PNG, ...).
    #[arg(long)]
    thumbnail: PathBuf,

    /// Video identifier used for filenames and the short link.
    #[arg(long)]
    id: String,

    #[arg(long)]
    title: String,

    #[arg(long)]
    author: String,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct FontsArgs {
    /// Report whether this family is available instead of listing.
    #[arg(long)]
    check: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env();
    tracing::debug!(?config, "configuration loaded");

    match cli.cmd {
        Command::Generate(args) => cmd_generate(&config, args).await,
        Command::Render(args) => cmd_render(&config, args).await,
        Command::Fonts(args) => cmd_fonts(&config, args),
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sharecard=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .with(env_filter)
            .init();
    }
}

fn open_session(config: &Config, output: &OutputArgs) -> Session {
    let engine = TextEngine::new(FontBook::system(config.font_dirs.as_slice()));
    let prefs: Box<dyn PreferenceStore> = match &config.prefs_path {
        Some(path) => Box::new(JsonFilePreferences::new(path.clone())),
        None => Box::new(MemoryPreferences::default()),
    };
    let options = RenderOptions {
        headline: if output.fixed_headline {
            HeadlineSizing::Fixed
        } else {
            HeadlineSizing::Dynamic
        },
        jpeg_quality: config.jpeg_quality,
    };

    let (mut session, notices) = Session::open(engine, prefs, options);
    report(&notices);
    if let Some(font) = &output.font {
        report(&session.select_font(font));
    }
    session
}

async fn cmd_generate(config: &Config, args: GenerateArgs) -> anyhow::Result<()> {
    let mut session = open_session(config, &args.output);
    let source = HttpVideoSource::new(&config.oembed_endpoint, &config.thumbnail_base)?;

    let batch = session
        .generate(&source, &args.url)
        .await
        .with_context(|| format!("generating images for '{}'", args.url))?;
    report(batch.notices());
    save(batch, &args.output).await
}

async fn cmd_render(config: &Config, args: RenderArgs) -> anyhow::Result<()> {
    let mut session = open_session(config, &args.output);

    let bytes = std::fs::read(&args.thumbnail)
        .with_context(|| format!("reading thumbnail '{}'", args.thumbnail.display()))?;
    let bitmap = sharecard::decode_image(&bytes)?;
    let video_id = VideoId::new(args.id)?;
    let metadata = VideoMetadata::new(args.title, args.author, video_id.short_url())?;

    let batch = session.generate_offline(video_id, metadata, bitmap)?;
    report(batch.notices());
    save(batch, &args.output).await
}

fn cmd_fonts(config: &Config, args: FontsArgs) -> anyhow::Result<()> {
    let book = FontBook::system(config.font_dirs.as_slice());
    let (catalog, notice) = sharecard::FontCatalog::discover(&book);
    report(notice.as_slice());

    match args.check {
        Some(family) => {
            let family = sharecard::sanitize_font_selection(&family);
            let selection = sharecard::FontSelection::new(catalog);
            if selection.is_available(&family, &book) {
                let installed = book.has_family(&family).unwrap_or(false);
                println!(
                    "{family}: available{}",
                    if installed { "" } else { " (not installed locally)" }
                );
            } else {
                println!("{}", Notice::FontUnavailable { family });
            }
        }
        None => {
            for family in catalog.iter() {
                println!("{family}");
            }
        }
    }
    Ok(())
}

async fn save(batch: &GenerationBatch, output: &OutputArgs) -> anyhow::Result<()> {
    let dir: &Path = &output.out;
    let written = if output.zip {
        vec![sharecard::zip_batch(Some(batch), dir)?]
    } else if output.stagger {
        sharecard::save_staggered(Some(batch), dir, sharecard::DEFAULT_STAGGER).await?
    } else {
        sharecard::save_individual(Some(batch), dir)?
    };
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn report(notices: &[Notice]) {
    for notice in notices {
        eprintln!("warning: {notice}");
    }
}
