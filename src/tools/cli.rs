//! Command line options for the bzip2 binary.

use clap::Parser;
use log::LevelFilter;

/// Compress or decompress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
}

#[derive(Parser, Debug)]
#[clap(
    name = "bzs",
    version,
    about = "A block-sorting file compressor, streaming edition."
)]
pub struct BzOpts {
    /// Compress files (the default).
    #[clap(short = 'z', long = "compress", conflicts_with = "decompress")]
    pub compress: bool,

    /// Decompress files.
    #[clap(short = 'd', long = "decompress")]
    pub decompress: bool,

    /// Keep (don't delete) input files.
    #[clap(short = 'k', long = "keep")]
    pub keep: bool,

    /// Silently overwrite existing output files.
    #[clap(short = 'f', long = "force")]
    pub force: bool,

    /// Block size in 100k units (1-9).
    #[clap(short = 'b', long = "block-size", default_value_t = 9)]
    pub block_size: u8,

    /// Verbosity; repeat for more detail (-v, -vv, -vvv).
    #[clap(short = 'v', parse(from_occurrences))]
    pub verbose: usize,

    /// Files to process.
    #[clap(required = true)]
    pub files: Vec<String>,
}

impl BzOpts {
    pub fn mode(&self) -> Mode {
        if self.decompress {
            Mode::Unzip
        } else {
            Mode::Zip
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
