use cardsmith::assets::{AssetCache, AssetKey, check_assets};
use cardsmith::config::{self, StudioConfig};
use cardsmith::geometry::{Dimensions, FrameGeometry, PLACEHOLDER_SIZE, Point, RenderDimensions};
use cardsmith::imaging::{
    RasterImage, RgbaRaster, fill_placement, identify, is_supported_photo,
    supported_input_extensions,
};
use cardsmith::mapper::screen_to_frame;
use cardsmith::output::{self, PointerSample, PositionReport};
use cardsmith::position::{SourceKind, default_position, is_customized};
use cardsmith::studio::{CardStudio, GenerationRequest, RenderedCard, load_script};
use cardsmith::types::CardData;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("CARDSMITH_ON_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CARDSMITH_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "cardsmith")]
#[command(about = "Compose trading-card images from a photo and card fields")]
#[command(long_about = "\
Compose trading-card images from a photo and card fields

The photo is placed inside the card's photo frame, either filling it
(default) or at an explicit centre and scale, then the frame art, text,
HP badge and energy icons are layered on top.

Asset layout (under assets.root, default public/):

  public/
  ├── poke/
  │   ├── <type>.png               # Frame art per energy type
  │   ├── hp-30.png … hp-120.png   # HP badges
  │   ├── energy-large-<type>.png  # Move cost icons
  │   ├── energy-small-<type>.png  # Weakness, resistance, retreat
  │   ├── energy-colorless.png
  │   └── missingno.png            # Placeholder photo
  └── fonts/
      └── gill-*.ttf

Card files are TOML or JSON with the fields name, type, hp, desc_type,
length, weight, flavor_text, move1, move2, weakness, resistance,
retreat_cost. Each move is a table with name and damage.

Run 'cardsmith gen-config' to generate a documented cardsmith.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding cardsmith.toml; asset paths resolve against it
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one card to a PNG
    Render {
        /// Card fields (.toml or .json)
        #[arg(long)]
        card: PathBuf,
        /// Photo to place in the frame; the placeholder is used without one
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Photo centre x in frame pixels
        #[arg(long)]
        x: Option<f64>,
        /// Photo centre y in frame pixels
        #[arg(long)]
        y: Option<f64>,
        /// Photo scale relative to its native size
        #[arg(long)]
        scale: Option<f64>,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Show the default position and fill placement for a photo
    Position {
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Rendered preview size, e.g. 363x498
        #[arg(long, value_parser = parse_size, requires = "pointer")]
        rendered: Option<RenderDimensions>,
        /// Pointer in preview pixels, e.g. 141,161
        #[arg(long, value_parser = parse_point, requires = "rendered")]
        pointer: Option<Point>,
    },
    /// Drive the studio with a timed event script and write the final card
    Replay {
        /// JSON array of timed events
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        card: Option<PathBuf>,
        #[arg(long)]
        photo: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Report which required asset files are missing
    Check,
    /// Print a stock cardsmith.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Render {
            card,
            photo,
            x,
            y,
            scale,
            out,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let card = load_card(&card)?;
            let photo = photo.as_deref().map(open_photo).transpose()?;
            let frame = FrameGeometry::CARD;
            let default = default_position(source_kind(photo.as_ref()), &frame);
            let position = default.with_overrides(x, y, scale, &frame);

            let mut studio = open_studio(&cli.config_dir, &config);
            studio.preload();
            let request = GenerationRequest {
                revision: 0,
                card,
                photo: photo.map(Arc::new),
                use_custom: is_customized(position, default),
                position,
            };
            let rendered = studio.render(&request)?;
            let path = write_card(&rendered, &out)?;
            output::print_render_report(&rendered, &path);
        }
        Command::Position {
            photo,
            rendered,
            pointer,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let frame = FrameGeometry::CARD;
            let (native, source) = match &photo {
                Some(path) => {
                    check_photo_extension(path)?;
                    let dims = identify(path)?;
                    (Some(dims), SourceKind::Photo(dims))
                }
                None => (None, SourceKind::Placeholder),
            };
            let drawn = match native {
                Some(dims) => dims,
                None => placeholder_size(&cli.config_dir, &config),
            };
            let sample = rendered.zip(pointer).map(|(surface, pointer)| PointerSample {
                pointer,
                surface,
                frame_point: screen_to_frame(pointer, surface, &frame),
            });
            output::print_position_report(&PositionReport {
                native,
                default: default_position(source, &frame),
                fill: fill_placement(drawn, &frame),
                sample,
            });
        }
        Command::Replay {
            script,
            card,
            photo,
            out,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let events = load_script(&script)?;
            let photo = photo.as_deref().map(open_photo).transpose()?;

            let mut studio = open_studio(&cli.config_dir, &config);
            studio.preload();
            let start = Instant::now();
            if photo.is_some() {
                studio.set_photo(photo);
            }
            if let Some(path) = card {
                studio.edit_card(load_card(&path)?, start);
            }
            let summary = studio.replay(&events, start);
            output::print_replay_summary(&summary, studio.output());
            if let Some(rendered) = studio.output() {
                let path = write_card(rendered, &out)?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Check => {
            let config = config::load_config(&cli.config_dir)?;
            let root = config.assets.root_in(&cli.config_dir);
            let report = check_assets(&root, &config.assets.placeholder);
            output::print_asset_check(&report);
            if !report.is_complete() {
                return Err(format!("{} asset(s) missing", report.missing.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_studio(config_dir: &Path, config: &StudioConfig) -> CardStudio<RgbaRaster> {
    let root = config.assets.root_in(config_dir);
    let assets = AssetCache::from_dir(root, config.assets.placeholder.clone());
    CardStudio::new(assets, config)
}

fn check_photo_extension(path: &Path) -> Result<(), String> {
    if is_supported_photo(path) {
        Ok(())
    } else {
        Err(format!(
            "{}: unsupported photo format (expected one of: {})",
            path.display(),
            supported_input_extensions().join(", ")
        ))
    }
}

fn open_photo(path: &Path) -> Result<RgbaRaster, Box<dyn std::error::Error>> {
    check_photo_extension(path)?;
    Ok(RgbaRaster::open(path)?)
}

fn source_kind(photo: Option<&RgbaRaster>) -> SourceKind {
    match photo {
        Some(p) => SourceKind::Photo(p.dimensions()),
        None => SourceKind::Placeholder,
    }
}

/// Size of the placeholder on disk, or the nominal size when it is missing.
fn placeholder_size(config_dir: &Path, config: &StudioConfig) -> Dimensions {
    let path = config
        .assets
        .root_in(config_dir)
        .join(AssetKey::Placeholder.path(&config.assets.placeholder));
    identify(&path).unwrap_or(PLACEHOLDER_SIZE)
}

/// Card fields from a `.json` file, or TOML for anything else.
fn load_card(path: &Path) -> Result<CardData, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let card = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    Ok(card)
}

fn write_card(card: &RenderedCard, out: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(out)?;
    let path = out.join(&card.filename);
    std::fs::write(&path, &card.png)?;
    Ok(path)
}

fn parse_size(s: &str) -> Result<RenderDimensions, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: f64 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let height: f64 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    Ok(RenderDimensions::new(width, height))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Point::new(x, y))
}
