//! Logging setup for binaries embedding the service client.
//!
//! The library itself only emits records through the [`log`] facade, which
//! stays silent until a logger is installed. [`init_logging`] installs
//! `log4rs` with the [`LogfmtEncoder`] so the `method` and `url` of each
//! outgoing request are printed next to the message.

pub mod logfmt_encoder;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, debug, info};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Deserializers, Logger, Root};

pub use logfmt_encoder::{LogfmtEncoder, LogfmtEncoderDeserializer};

const EXTERNAL_CONFIG_PATH: &str = "log4rs.yml";
const CONSOLE_APPENDER: &str = "stdout";

/// Crates whose connection chatter is capped at `warn` by default.
const QUIET_TARGETS: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

/// Deserializers for external log4rs files, with the `logfmt` encoder kind
/// registered.
pub fn deserializers() -> Deserializers {
    let mut deserializers = Deserializers::default();
    deserializers.insert("logfmt", LogfmtEncoderDeserializer);
    deserializers
}

/// Initializes logging from `log4rs.yml` in the working directory, or from
/// [`default_config`] when that file does not exist.
pub fn init_logging() -> Result<()> {
    let path = Path::new(EXTERNAL_CONFIG_PATH);

    if path.exists() {
        log4rs::init_file(path, deserializers()).context("Failed to load external log4rs.yml")?;
        info!(path = EXTERNAL_CONFIG_PATH; "Logging initialized from external configuration");
        return Ok(());
    }

    log4rs::init_config(default_config()?).context("Failed to initialize default logging")?;

    debug!("Logging initialized with defaults (no external log4rs.yml found)");
    Ok(())
}

/// Console logging at `info`, HTTP stack internals at `warn`.
pub fn default_config() -> Result<Config> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(LogfmtEncoder::default()))
        .build();

    let mut builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    for target in QUIET_TARGETS {
        builder = builder.logger(Logger::builder().build(target, LevelFilter::Warn));
    }

    builder
        .build(Root::builder().appender(CONSOLE_APPENDER).build(LevelFilter::Info))
        .map_err(|e| anyhow!("Invalid default logging config: {e}"))
}
