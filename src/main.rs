//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::fs::{self, File};
use std::io::{self, Error, ErrorKind};
use std::path::Path;

use clap::Parser;
use log::info;
use simplelog::{Config, TermLogger, TerminalMode};

use bzip2_stream::tools::cli::{BzOpts, Mode};
use bzip2_stream::{BzDecoder, BzEncoder};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), std::io::Error> {
    let opts = BzOpts::parse();

    TermLogger::init(
        opts.log_level(),
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    for file in &opts.files {
        match opts.mode() {
            Mode::Zip => compress_file(file, &opts)?,
            Mode::Unzip => decompress_file(file, &opts)?,
        }
    }

    info!("Done.\n");
    Ok(())
}

/// Compress one file to `<name>.bz2` using the streaming encoder.
fn compress_file(path: &str, opts: &BzOpts) -> io::Result<()> {
    let out_path = format!("{}.bz2", path);
    if Path::new(&out_path).exists() && !opts.force {
        return Err(Error::new(
            ErrorKind::AlreadyExists,
            format!("{} exists; use --force to overwrite", out_path),
        ));
    }

    let mut source = File::open(path)?;
    let mut encoder = BzEncoder::new(File::create(&out_path)?, opts.block_size);
    let copied = io::copy(&mut source, &mut encoder)?;
    let sink = encoder.finish()?;
    sink.sync_all()?;

    info!(
        "Compressed {} ({} bytes) to {}.",
        path, copied, out_path
    );

    if !opts.keep {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Decompress one `.bz2` file, verifying every checksum on the way out.
fn decompress_file(path: &str, opts: &BzOpts) -> io::Result<()> {
    let out_path = path
        .strip_suffix(".bz2")
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{}.out", path));
    if Path::new(&out_path).exists() && !opts.force {
        return Err(Error::new(
            ErrorKind::AlreadyExists,
            format!("{} exists; use --force to overwrite", out_path),
        ));
    }

    let mut decoder = BzDecoder::new(File::open(path)?);
    let mut sink = File::create(&out_path)?;
    let copied = io::copy(&mut decoder, &mut sink)?;

    info!(
        "Decompressed {} to {} ({} bytes, {} blocks).",
        path,
        out_path,
        copied,
        decoder.blocks_read()
    );

    if !opts.keep {
        fs::remove_file(path)?;
    }
    Ok(())
}
