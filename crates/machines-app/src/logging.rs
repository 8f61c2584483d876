use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// Verbosity 0 shows info and above, 1 adds debug, 2 or more adds trace.
/// `RUST_LOG` still overrides the default filter.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // Only fails if a logger is already installed, e.g. by another test.
    let _ = builder.try_init();
}
