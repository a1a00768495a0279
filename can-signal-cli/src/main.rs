//! CAN Signal Monitor CLI
//!
//! Live-decodes signals from a SocketCAN interface using the
//! can-signal-decoder library and adds the orchestration around it:
//! - last-known-value state tracking
//! - per-frame CSV logging
//! - a single-line console dashboard

use anyhow::{Context, Result};
use can_signal_decoder::{Configuration, FrameDecoder};
use clap::Parser;
use std::path::PathBuf;

mod config;
mod csv_log;
mod dashboard;
mod source;
mod state;

use config::AppConfig;
use csv_log::CsvLogger;
use dashboard::Dashboard;
use source::CanBusSource;
use state::SignalState;

/// CAN Signal Monitor - decode, log and display live CAN bus signals
#[derive(Parser, Debug)]
#[command(name = "can-signal-cli")]
#[command(about = "Decode, log and display live CAN bus signals", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the signal configuration (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Path to the application configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    app_config: Option<PathBuf>,

    /// CAN interface to listen on (overrides the app config)
    #[arg(long, value_name = "IFACE")]
    channel: Option<String>,

    /// Directory for CSV output (overrides the app config)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Stop after this many frames (for testing)
    #[arg(long, value_name = "COUNT")]
    max_frames: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("CAN Signal Monitor v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", can_signal_decoder::VERSION);

    // Application config: file if given, defaults otherwise, flags on top
    let mut app_config = match &args.app_config {
        Some(path) => config::load_app_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(channel) = &args.channel {
        app_config.bus.channel = channel.clone();
    }
    if let Some(log_dir) = &args.log_dir {
        app_config.output.log_dir = log_dir.clone();
    }

    // Signal config errors are fatal here, before any frame is read
    let signal_config = Configuration::load_file(&args.config)
        .with_context(|| format!("Failed to load signal config: {:?}", args.config))?;

    let stats = signal_config.stats();
    log::info!(
        "Signal config loaded: {} messages, {} signals",
        stats.num_messages,
        stats.num_signals
    );

    run_monitor(&app_config, &signal_config, args.max_frames)
}

/// The main read loop: decode each frame, merge into state, log, display
fn run_monitor(
    app_config: &AppConfig,
    signal_config: &Configuration,
    max_frames: Option<usize>,
) -> Result<()> {
    let mut state = SignalState::new(signal_config);
    let mut csv = CsvLogger::create(&app_config.output.log_dir, &state)?;
    let mut dashboard = Dashboard::new(&app_config.dashboard);

    let source = CanBusSource::open(&app_config.bus.channel).with_context(|| {
        format!(
            "Failed to open CAN interface '{}'",
            app_config.bus.channel
        )
    })?;

    println!("Listening on {}... (Ctrl+C to quit)\n", app_config.bus.channel);

    let mut frames_seen = 0usize;
    for frame in source {
        let frame = frame.context("CAN read failed")?;

        // Frames we don't understand still get a CSV row with the current
        // snapshot, exactly like recognized ones
        if let Some(decoded) = FrameDecoder::decode_frame(&frame, signal_config) {
            log::debug!("Decoded 0x{:X}: {} signals", frame.can_id, decoded.len());
            state.apply(&decoded);
        } else {
            log::trace!("Unrecognized CAN ID 0x{:X}", frame.can_id);
        }

        csv.write_row(frame.can_id, &state)?;
        dashboard.refresh(&state);

        frames_seen += 1;
        if let Some(max) = max_frames {
            if frames_seen >= max {
                log::info!("Reached max frame count ({}), stopping", max);
                break;
            }
        }
    }

    println!();
    log::info!("Exiting.");
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
