use clap::Parser;
use log::LevelFilter;
use pfm_scanner::{Error, PfmScanner};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Error> {
    let pfm_scanner = PfmScanner::parse();
    let level = match pfm_scanner.verbose.log_level_filter() {
        LevelFilter::Off => None,
        LevelFilter::Error => Some(Level::ERROR),
        LevelFilter::Warn => Some(Level::WARN),
        LevelFilter::Info => Some(Level::INFO),
        LevelFilter::Debug => Some(Level::DEBUG),
        LevelFilter::Trace => Some(Level::TRACE),
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_line_number(false)
        .compact()
        .with_file(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
    if let Err(err) = pfm_scanner.exec() {
        error!("{}", err);
        return Err(err);
    }
    Ok(())
}
