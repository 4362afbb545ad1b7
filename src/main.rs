//! Chart server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use plotboard::api::{create_router, AppState};
use plotboard::charts::{ChartContext, ChartRegistry};
use plotboard::config::Config;
use plotboard::data::fetch::load_datasets;
use plotboard::metrics;
use plotboard::render::pipeline;
use plotboard::utils::shutdown_signal;

/// Statistical chart server.
#[derive(Parser, Debug)]
#[command(name = "plotboard")]
#[command(about = "Serves seaborn-style statistical charts as PNG over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port.
    #[arg(short, long, default_value = "8080")]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the chart server (default).
    Serve {
        /// HTTP server port.
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch both datasets and print their shapes.
    FetchData,

    /// Render a single chart to a PNG file.
    Render {
        /// Chart name, e.g. `box` or `scatter`.
        chart: String,

        /// Output file path.
        #[arg(short, long, default_value = "chart.png")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("plotboard=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Initialize metrics
    metrics::init_metrics();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::FetchData) => cmd_fetch_data().await,
        Some(Command::Render { chart, output }) => cmd_render(&chart, &output).await,
        Some(Command::Serve { port }) => cmd_serve(port).await,
        None => cmd_serve(args.port).await,
    }
}

/// Run the chart server.
async fn cmd_serve(port: u16) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    // Install the Prometheus recorder first so the startup fetch is
    // already measured.
    let metrics_handle = match metrics::install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics recorder unavailable: {}", e);
            None
        }
    };

    // Fetch datasets; a failure here is fatal since every route depends
    // on the store.
    info!("Fetching datasets...");
    let store = load_datasets(&config).await.map_err(|e| {
        error!("Dataset load failed: {}", e);
        e
    })?;

    let registry = ChartRegistry::builtin();
    info!("Registered {} charts", registry.len());
    if let Some(seed) = config.plot_seed {
        info!("Random-data routes seeded with {}", seed);
    }

    let mut state = AppState::new(store, registry, config.plot_seed);
    if let Some(handle) = metrics_handle {
        state = state.with_metrics_handle(handle);
    }

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PLOTBOARD - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  mpg dataset: {}", config.mpg_url);
    println!("  midwest dataset: {}", config.midwest_url);
    println!("  Fetch timeout: {}ms", config.http_timeout_ms);
    println!(
        "  Plot seed: {}",
        match config.plot_seed {
            Some(seed) => seed.to_string(),
            None => "unseeded".to_string(),
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch both datasets and print their shapes.
async fn cmd_fetch_data() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PLOTBOARD - DATASET FETCH");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("\nFetching datasets...\n");
    let store = load_datasets(&config).await?;

    for name in store.names() {
        let dataset = store.get(name)?;
        println!("{} ({} rows)", dataset.name(), dataset.rows());
        for (column, dtype) in dataset.schema() {
            println!("  {:<12} {}", column, dtype);
        }
        println!();
    }

    println!("======================================================================");
    println!("DATASET FETCH COMPLETED");
    println!("======================================================================");

    Ok(())
}

/// Render a single chart to a PNG file on disk.
async fn cmd_render(chart: &str, output: &std::path::Path) -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Fetching datasets...");
    let store = load_datasets(&config).await?;

    let registry = ChartRegistry::builtin();
    let Some(chart_impl) = registry.get(chart) else {
        let known: Vec<&str> = registry.iter().map(|c| c.name()).collect();
        anyhow::bail!("unknown chart {chart}; known charts: {}", known.join(", "));
    };

    let ctx = ChartContext::new(&store, config.plot_seed);
    let figure = chart_impl.figure(&ctx)?;
    let png = pipeline::render(chart_impl.name(), figure)?;

    std::fs::write(output, &png.bytes)?;
    info!(
        "Wrote {} ({} bytes, {}x{}) to {}",
        chart,
        png.bytes.len(),
        png.width,
        png.height,
        output.display()
    );

    Ok(())
}
