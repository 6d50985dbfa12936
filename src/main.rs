use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pingsweep::args::PingsweepArgs;
use pingsweep::error::SweepError;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_logging();
    let args = PingsweepArgs::parse();
    if let Err(e) = pingsweep::run(&args) {
        // * stop message already printed by the sweep
        if !matches!(e.downcast_ref::<SweepError>(), Some(SweepError::Stopped { .. })) {
            let _ = pingsweep::print_err(&mut io::stdout(), &e);
        }
        process::exit(1);
    }
}
