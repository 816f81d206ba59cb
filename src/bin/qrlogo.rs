//! CLI binary for qrlogo.
//!
//! A thin shim over the library crate: `generate` writes one image,
//! `serve` runs the HTTP endpoint.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qrlogo::pipeline::fetch::is_url;
use qrlogo::{generate, generate_from_bytes, write_png, GenerateConfig, GenerateRequest};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # QR for a URL with a remote logo, written to a file
  qrlogo generate https://example.com --logo https://example.com/logo.png -o qr.png

  # Logo from disk, PNG to stdout
  qrlogo generate "hello world" --logo ./logo.png > qr.png

  # Smaller modules, no quiet zone, stats as JSON
  qrlogo generate WIFI:S:home;; --logo ./logo.png --box-size 6 --border 0 -o qr.png --json

  # Run the HTTP endpoint
  qrlogo serve --bind 0.0.0.0:8000
  curl -X POST localhost:8000/generate_logo/ \
       -H 'content-type: application/json' \
       -d '{"qr_code_content":"https://example.com","download_link":"https://example.com/logo.png"}' \
       -o qr.png

ENVIRONMENT VARIABLES:
  QRLOGO_BIND              Listen address for `serve`
  QRLOGO_BOX_SIZE          Pixels per QR module
  QRLOGO_BORDER            Quiet zone width in modules
  QRLOGO_DOWNLOAD_TIMEOUT  Logo download timeout in seconds
  QRLOGO_MAX_DOWNLOAD      Largest logo body in bytes
  RUST_LOG                 Overrides the log filter (e.g. qrlogo=debug)
"#;

/// Generate QR codes with an embedded logo.
#[derive(Parser, Debug)]
#[command(
    name = "qrlogo",
    version,
    about = "Generate QR codes with a centered logo fetched from a URL",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "QRLOGO_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "QRLOGO_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single QR code image.
    Generate {
        /// Text to encode.
        content: String,

        /// Logo: HTTP/HTTPS URL or local file path.
        #[arg(short, long)]
        logo: String,

        /// Write the PNG to this file instead of stdout.
        #[arg(short, long, env = "QRLOGO_OUTPUT")]
        output: Option<PathBuf>,

        /// Print generation stats as JSON on stdout (requires --output).
        #[arg(long, requires = "output")]
        json: bool,
    },

    /// Serve `POST /generate_logo/` over HTTP.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "QRLOGO_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// Pixels per QR module (1–100).
    #[arg(long, global = true, env = "QRLOGO_BOX_SIZE", default_value_t = 10,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    box_size: u32,

    /// Quiet zone width in modules (0–50).
    #[arg(long, global = true, env = "QRLOGO_BORDER", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(0..=50))]
    border: u32,

    /// Logo download timeout in seconds.
    #[arg(long, global = true, env = "QRLOGO_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Largest logo body accepted, in bytes.
    #[arg(long, global = true, env = "QRLOGO_MAX_DOWNLOAD", default_value_t = 10 * 1024 * 1024)]
    max_download_bytes: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli.pipeline)?;

    match cli.command {
        Command::Generate {
            content,
            logo,
            output,
            json,
        } => run_generate(content, logo, output, json, cli.quiet, &config).await,
        Command::Serve { bind } => {
            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("Failed to bind {bind}"))?;
            if !cli.quiet {
                eprintln!(
                    "{} serving {} on {}",
                    green("◆"),
                    bold("POST /generate_logo/"),
                    bold(&format!("http://{bind}"))
                );
            }
            qrlogo::server::serve(listener, config, shutdown_signal())
                .await
                .context("Server error")
        }
    }
}

async fn run_generate(
    content: String,
    logo: String,
    output: Option<PathBuf>,
    json: bool,
    quiet: bool,
    config: &GenerateConfig,
) -> Result<()> {
    let image = if is_url(&logo) {
        let request = GenerateRequest::new(content, logo);
        generate(&request, config)
            .await
            .context("Generation failed")?
    } else {
        let bytes = tokio::fs::read(&logo)
            .await
            .with_context(|| format!("Failed to read logo file {logo:?}"))?;
        let cfg = config.clone();
        tokio::task::spawn_blocking(move || generate_from_bytes(&content, &bytes, &cfg))
            .await
            .context("Generation task panicked")?
            .context("Generation failed")?
    };

    match output {
        Some(ref path) => {
            write_png(&image, path)
                .await
                .context("Failed to write output")?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&image.stats)
                        .context("Failed to serialise stats")?
                );
            } else if !quiet {
                eprintln!(
                    "{}  {}x{} px  QR v{}  logo {}px  {}ms  →  {}",
                    green("✔"),
                    image.width,
                    image.height,
                    image.stats.qr_version,
                    image.stats.logo.map(|l| l.size).unwrap_or(0),
                    image.stats.total_duration_ms,
                    bold(&path.display().to_string()),
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&image.png)
                .context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
            if !quiet {
                eprintln!(
                    "{}",
                    dim(&format!(
                        "{}x{} px, {} bytes PNG",
                        image.width, image.height, image.stats.png_bytes
                    ))
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `GenerateConfig`.
fn build_config(args: &PipelineArgs) -> Result<GenerateConfig> {
    GenerateConfig::builder()
        .box_size(args.box_size)
        .border(args.border)
        .download_timeout_secs(args.download_timeout)
        .max_download_bytes(args.max_download_bytes)
        .build()
        .context("Invalid configuration")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down");
    }
}
