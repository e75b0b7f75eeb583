use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Map the number of `-v` flags to a log level. Warnings are always shown.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Route `log` records to stderr so stdout carries only tokenizer output.
/// Best-effort: a logger that is already installed is left in place.
pub fn init(verbosity: u8) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level_for(verbosity), config, std::io::stderr());
}
