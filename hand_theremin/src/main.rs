//! hand_theremin — interactive entry point.

use clap::Parser;
use hand_theremin::{app::run, cli::Args};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Args::parse().into_config();

    #[cfg(feature = "leap")]
    log::info!("built with LeapMotion support");
    log::info!("sensor={:?} audio={:?}", cfg.sensor, cfg.audio);

    if let Err(e) = run(cfg) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
