use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use wildfire_grid_core::{
    CellLocation, ColorPalette, ExecutionMode, Raster, SimulationConfig, TerrainSource,
    UpdateSchedule, WildfireSimulation, WindDirection, DEFAULT_SEED,
};

/// Wildfire grid automaton demo: runs a fire and writes PNG snapshots
#[derive(Parser, Debug)]
#[command(name = "wildfire-demo")]
#[command(about = "Grid wildfire cellular automaton demo", long_about = None)]
struct Args {
    /// Grid width in cells (overrides the preset or config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides the preset or config file)
    #[arg(long)]
    height: Option<usize>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 100)]
    ticks: u32,

    /// RNG seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in rule set (reference, extended), ignored with --config
    #[arg(short = 'p', long, default_value = "reference")]
    preset: String,

    /// Grayscale heightmap image
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// RGB landscape image mapping colours to materials
    #[arg(long)]
    landscape: Option<PathBuf>,

    /// Cell to ignite as `x,y`, repeatable (default: grid centre)
    #[arg(short, long)]
    ignite: Vec<String>,

    /// Initial wind direction (calm, n, s, e, w, ne, nw, se, sw)
    #[arg(short, long)]
    wind: Option<String>,

    /// Write a snapshot every N ticks (0 = final snapshot only)
    #[arg(long, default_value_t = 10)]
    snapshot_every: u32,

    /// Directory for PNG snapshots
    #[arg(short, long, default_value = "snapshots")]
    output_dir: PathBuf,

    /// Snapshot colours (reference, compute)
    #[arg(long, default_value = "reference")]
    palette: String,

    /// Step rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Update only cells whose id parity matches the tick
    #[arg(long)]
    parity: bool,
}

fn parse_location(text: &str) -> Option<CellLocation> {
    let (x, y) = text.split_once(',')?;
    Some(CellLocation::new(
        x.trim().parse().ok()?,
        y.trim().parse().ok()?,
    ))
}

/// Whether the loop writes a snapshot after `step`
fn is_snapshot_step(step: u32, snapshot_every: u32) -> bool {
    snapshot_every > 0 && step % snapshot_every == 0
}

fn build_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = if let Some(path) = &args.config {
        info!("Loading configuration from {}", path.display());
        SimulationConfig::load_json(path)?
    } else {
        match args.preset.to_lowercase().as_str() {
            "reference" => SimulationConfig::reference(),
            "extended" => SimulationConfig::extended(),
            other => {
                warn!("Unknown preset '{}', using reference", other);
                SimulationConfig::reference()
            }
        }
    };

    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(config.width);
        let height = args.height.unwrap_or(config.height);
        config = config.with_size(width, height);
    }
    if args.parallel {
        config.execution = ExecutionMode::RowParallel;
    }
    if args.parity {
        config.schedule = UpdateSchedule::Parity;
    }
    Ok(config)
}

/// Decode the optional rasters; a file that cannot be read becomes a warning
fn load_terrain(args: &Args) -> TerrainSource {
    let mut terrain = TerrainSource::new();

    if let Some(path) = &args.heightmap {
        terrain = match image::open(path) {
            Ok(image) => {
                let gray = image.to_luma8();
                let (width, height) = (gray.width() as usize, gray.height() as usize);
                info!("Loaded heightmap {} ({}x{})", path.display(), width, height);
                terrain.with_heightmap_bytes(width, height, 1, gray.into_raw())
            }
            Err(e) => terrain.with_heightmap_failure(format!("{}: {}", path.display(), e)),
        };
    }

    if let Some(path) = &args.landscape {
        terrain = match image::open(path) {
            Ok(image) if image.color().has_color() => {
                let rgb = image.to_rgb8();
                let (width, height) = (rgb.width() as usize, rgb.height() as usize);
                info!("Loaded landscape {} ({}x{})", path.display(), width, height);
                terrain.with_landscape_bytes(width, height, rgb.into_raw())
            }
            // Single-channel input is handed over as-is and rejected by the engine
            Ok(image) => {
                let gray = image.to_luma8();
                match Raster::luma(gray.width() as usize, gray.height() as usize, gray.into_raw()) {
                    Ok(raster) => terrain.with_landscape(raster),
                    Err(e) => terrain.with_landscape_failure(e.to_string()),
                }
            }
            Err(e) => terrain.with_landscape_failure(format!("{}: {}", path.display(), e)),
        };
    }

    terrain
}

fn write_snapshot(
    sim: &WildfireSimulation,
    palette: &ColorPalette,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let raster = sim.render_snapshot(palette);
    let image = image::RgbImage::from_raw(
        raster.width as u32,
        raster.height as u32,
        raster.into_bytes(),
    )
    .ok_or("snapshot buffer does not match its dimensions")?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = output_dir.join(format!("{}_{}.png", timestamp, sim.tick()));
    image.save(&path)?;
    Ok(path)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("=== Wildfire Grid Demo ===\n");

    let config = build_config(&args)?;
    let palette = ColorPalette::from_name(&args.palette).unwrap_or_else(|| {
        warn!("Unknown palette '{}', using reference", args.palette);
        ColorPalette::reference()
    });

    let mut sim = WildfireSimulation::initialize(config, args.seed, load_terrain(&args))?;
    println!(
        "Created {}x{} grid (seed {}, wind {})",
        sim.width(),
        sim.height(),
        args.seed,
        sim.wind()
    );
    for warning in sim.init_warnings() {
        println!("Warning: {}", warning);
    }

    if let Some(name) = &args.wind {
        match WindDirection::parse(name) {
            Some(wind) => sim.set_wind(wind),
            None => warn!("Unknown wind direction '{}', keeping {}", name, sim.wind()),
        }
    }

    let ignitions: Vec<CellLocation> = if args.ignite.is_empty() {
        vec![CellLocation::new(sim.width() / 2, sim.height() / 2)]
    } else {
        args.ignite
            .iter()
            .filter_map(|text| {
                let location = parse_location(text);
                if location.is_none() {
                    warn!("Ignoring malformed ignition point '{}'", text);
                }
                location
            })
            .collect()
    };
    for location in ignitions {
        if !sim.ignite(location) {
            warn!("Could not ignite ({}, {})", location.x, location.y);
        }
    }

    std::fs::create_dir_all(&args.output_dir)?;
    println!("Writing snapshots to {}\n", args.output_dir.display());
    println!("{}", sim.stats());

    let mut last_snapshot = None;
    for step in 1..=args.ticks {
        sim.advance();

        if is_snapshot_step(step, args.snapshot_every) {
            println!("{}", sim.stats());
            let path = write_snapshot(&sim, &palette, &args.output_dir)?;
            info!("Wrote {}", path.display());
            last_snapshot = Some((step, path));
        }
    }

    let stats = sim.stats();
    println!("\n=== Final State ===");
    println!("{}", stats);
    println!(
        "Materials: {} grass, {} tree, {} water, {} bedrock",
        stats.grass, stats.tree, stats.water, stats.bedrock
    );
    // The last tick may already have been written by the loop
    let path = match last_snapshot {
        Some((step, path)) if step == args.ticks => path,
        _ => write_snapshot(&sim, &palette, &args.output_dir)?,
    };
    println!("Final snapshot: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_steps() {
        assert!(is_snapshot_step(10, 10));
        assert!(!is_snapshot_step(9, 10));
        assert!(!is_snapshot_step(10, 0));
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location("3, 7"), Some(CellLocation::new(3, 7)));
        assert_eq!(parse_location("3"), None);
        assert_eq!(parse_location("a,1"), None);
    }
}
