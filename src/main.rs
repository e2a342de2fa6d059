//! svg-scene CLI
//!
//! Usage:
//!   svg-scene [OPTIONS] [INPUT]
//!
//! Options:
//!   -c, --config <FILE>  Render configuration (TOML format)
//!   -o, --output <FILE>  Write SVG to a file instead of stdout
//!   --strict             Fail when the build records warnings
//!   --bbox <NAME>        Print the bounding box of a named element
//!   -d, --debug          Log debug output to stderr
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use svg_scene::{build_scene, render_svg, RenderConfig};

#[derive(Parser)]
#[command(name = "svg-scene")]
#[command(about = "Build SVG documents from geometric scene scripts")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Render configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,

    /// Print the bounding box of the named element as `x y width height`
    /// instead of rendering
    #[arg(long, value_name = "NAME")]
    bbox: Option<String>,

    /// Debug mode: log scene construction to stderr
    #[arg(short, long)]
    debug: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path).unwrap_or_else(|e| {
            fail(format!("Error loading config '{}': {}", path.display(), e))
        }),
        None => RenderConfig::default(),
    };
    if cli.strict {
        config = config.with_strict(true);
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => fail(format!("Error reading file '{}': {}", path.display(), e)),
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                fail(format!("Error reading from stdin: {}", e));
            }
            (buffer, "<stdin>".to_string())
        }
    };

    let scene = match build_scene(&source, &config.build) {
        Ok(scene) => scene,
        Err(e) => fail(e.format(&source, &filename).trim_end()),
    };

    if let Some(name) = &cli.bbox {
        let Some(id) = scene.resolve(name) else {
            fail(format!("Error: no element named '{}'", name));
        };
        match scene.bounding_box(id) {
            Ok(b) => println!("{} {} {} {}", b.x, b.y, b.width, b.height),
            Err(e) => fail(format!("Error: {}", e)),
        }
        return;
    }

    let svg = render_svg(&scene, &config.svg);
    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, format!("{}\n", svg)) {
                fail(format!("Error writing '{}': {}", path.display(), e));
            }
        }
        None => println!("{}", svg),
    }
}
