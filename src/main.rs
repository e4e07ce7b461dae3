use booking_desk::BookingConfig;
use booking_desk::error::Result;
use booking_desk::logger::init_logger;
use booking_desk::runtime::{Driver, Runtime};
use booking_desk::terminal::Terminal;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "booking-desk", about = "Book an IT support appointment from the terminal")]
struct Args {
    /// YAML file with booking settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the simulated slot availability
    #[arg(long)]
    seed: Option<u64>,

    /// Make every simulated submission fail
    #[arg(long)]
    fail: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    init_logger(args.verbose, args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => BookingConfig::load(path)?,
        None => BookingConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.simulate_failure |= args.fail;
    info!(?config, "starting booking session");

    let driver = Driver::new(config.build_state(), config.backend()).with_timings(config.timings());
    let mut runtime = Runtime::new(driver, Terminal::new()?);
    runtime.run()?;

    let driver = runtime.into_driver();
    info!(submitted = driver.backend().submitted().len(), "session closed");
    Ok(())
}
