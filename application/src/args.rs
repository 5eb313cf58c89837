//! Command line arguments.

use clap::Parser;

/// Daemon of the car rental system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file to load.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses [`Args`] from the command line.
    ///
    /// # Errors
    ///
    /// Errors if the command line doesn't form valid [`Args`].
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
