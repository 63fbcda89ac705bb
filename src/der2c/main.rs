use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use der_to_c::carray::{CArray, DEFAULT_ARRAY_NAME};
use der_to_c::files::{self, CertificateFileFormat};

/// Print a certificate as a C `uint8_t` array and a `uint32_t` length constant.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// array name, the length constant is <name>_len
    #[clap(long, default_value = DEFAULT_ARRAY_NAME)]
    name: String,

    /// cert encoding: der|pem
    #[clap(long, default_value = "der")]
    format: CertificateFileFormat,

    /// Path to cert file.
    #[clap(default_value = "mosquitto.org.der")]
    cert_path: PathBuf,
}

pub fn main() -> anyhow::Result<()> {
    // stdout only carries the generated C
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let bytes = files::read_certificate_file(&args.cert_path, args.format)
        .with_context(|| format!("Could not convert {}", args.cert_path.display()))?;
    let array = CArray::new(&args.name, &bytes)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    array.write_to(&mut out).context("Failed to write to stdout")?;
    out.flush()?;

    Ok(())
}
