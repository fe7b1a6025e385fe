use std::fs::{self, File};
use std::io::Write;
use std::sync::Arc;

use bcr::api::{ApiRequest, Edge, PROTOBUF, route_request};
use bcr::app::App;
use bcr::core::config::{CliOverrides, ResolvedConfig, load_config, resolve};
use bcr::core::prefs::{FilePreferences, MemoryPreferences, PreferenceStore};
use bcr::registry::Registry;
use bcr::registry::payload::decode_registry;
use bcr::registry::symbols::{HttpSymbolsSource, SymbolsSource};
use bcr::tui;
use clap::{Parser, Subcommand};
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "bcr", about = "Bazel Central Registry browser")]
struct Args {
    /// Registry payload file (base64 of a gzip'd protobuf Registry)
    #[arg(short, long, global = true)]
    registry: Option<String>,

    /// Site root the browser is served from
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Site root to fetch symbols.pb.gz from
    #[arg(long, global = true)]
    symbols_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Browse interactively (default)
    Run {
        /// Location to open, e.g. `modules/rules_go`
        location: Option<String>,
    },
    /// Dispatch one location and print the page as text
    Render { location: String },
    /// Answer one edge request, e.g. `/api/modules/rules_go`
    Api {
        target: String,
        /// Ask for protobuf instead of JSON
        #[arg(long)]
        protobuf: bool,
    },
}

fn to_io<E: std::fmt::Display>(e: E) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

fn load_registry(config: &ResolvedConfig) -> std::io::Result<Registry> {
    let path = config
        .registry_path
        .as_ref()
        .ok_or_else(|| to_io("no registry payload configured (use --registry or BCR_REGISTRY)"))?;
    let payload = fs::read_to_string(path)
        .map_err(|e| to_io(format!("failed to read {}: {e}", path.display())))?;
    decode_registry(&payload).map_err(to_io)
}

fn open_preferences() -> Box<dyn PreferenceStore> {
    let Some(path) = FilePreferences::default_path() else {
        warn!("Could not determine home directory, preferences will not persist");
        return Box::new(MemoryPreferences::new());
    };
    match FilePreferences::open(path) {
        Ok(prefs) => Box::new(prefs),
        Err(e) => {
            warn!("Failed to open preferences ({e}), using in-memory store");
            Box::new(MemoryPreferences::new())
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to bcr.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("bcr.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            warn!("Config error: {e}");
            Default::default()
        }
    };
    let cli = CliOverrides {
        registry: args.registry,
        base_url: args.base_url,
        symbols_url: args.symbols_url,
    };
    let resolved = resolve(&config, &cli);
    info!("bcr starting up: {:?}", resolved);

    let registry = Arc::new(load_registry(&resolved)?);
    let source: Arc<dyn SymbolsSource> = Arc::new(HttpSymbolsSource::new(&resolved.symbols_url));

    match args.command.unwrap_or(Command::Run { location: None }) {
        Command::Run { location } => {
            let mut app = App::new(registry, open_preferences());
            app.set_keyboard_shortcuts(resolved.keyboard_shortcuts);
            let location = location.unwrap_or(resolved.start_location);
            app.start(&location).map_err(to_io)?;
            tui::run(app, source)
        }
        Command::Render { location } => {
            let app = App::new(registry, Box::new(MemoryPreferences::new()));
            let text = tui::render_to_string(app, &location, source.as_ref())
                .await
                .map_err(to_io)?;
            println!("{text}");
            Ok(())
        }
        Command::Api { target, protobuf } => {
            let mut req = ApiRequest::get(&target);
            if protobuf {
                req = req.accept(PROTOBUF);
            }
            match route_request(&registry, &req).map_err(to_io)? {
                Edge::Api(resp) => {
                    if resp.status != 200 {
                        eprintln!("HTTP {}", resp.status);
                    }
                    if resp.content_type == PROTOBUF {
                        std::io::stdout().write_all(&resp.body)?;
                    } else {
                        println!("{}", resp.body_text());
                    }
                    Ok(())
                }
                Edge::Asset(path) => {
                    println!("static asset: {path}");
                    Ok(())
                }
            }
        }
    }
}
