//! # ptdecode CLI
//!
//! Command-line interface for decoding captured label printer jobs.
//!
//! ## Usage
//!
//! ```bash
//! # Decode a capture to PNG
//! ptdecode render job.prn --png label.png
//!
//! # Decode a capture served over HTTP, QL-1060 geometry
//! ptdecode render https://example.com/job.prn --model ql1060 --png label.png
//!
//! # Print the token trace (or JSON lines with --json)
//! ptdecode trace job.prn
//!
//! # Write a sample capture
//! ptdecode demo sample.prn
//!
//! # Run the HTTP server
//! ptdecode serve --listen 0.0.0.0:8080
//! ```

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use ptdecode::{
    PtdecodeError,
    decode::{self, DecodeJob, DecodeOptions, Decoded, LogSink},
    demo,
    printer::PrinterModel,
    server::{self, ServerConfig},
    source::Source,
};

/// ptdecode - label printer stream decoder
#[derive(Parser, Debug)]
#[command(name = "ptdecode")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a capture into an image
    Render {
        /// Capture file, http(s) URL, or - for stdin
        input: String,

        /// Output image (format follows the extension)
        #[arg(long, short = 'o', value_name = "FILE")]
        png: Option<PathBuf>,

        /// Also print the token trace
        #[arg(long)]
        trace: bool,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Print the token trace of a capture
    Trace {
        /// Capture file, http(s) URL, or - for stdin
        input: String,

        /// Emit one JSON object per event
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Write a sample capture
    Demo {
        /// Output file
        output: PathBuf,
    },

    /// Run the HTTP decode server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Upload limit in megabytes
        #[arg(long, default_value = "16")]
        max_body_mb: usize,

        #[command(flatten)]
        decode: DecodeArgs,
    },
}

/// Decode options shared by all subcommands.
#[derive(Args, Debug)]
struct DecodeArgs {
    /// Printer model
    #[arg(long, value_enum, default_value_t = PrinterModel::Generic)]
    model: PrinterModel,

    /// Do not draw the marker columns next to raster data
    #[arg(long)]
    no_filler: bool,

    /// Accept any ESC * mode byte (historical behavior)
    #[arg(long)]
    accept_any_graphics_mode: bool,

    /// The capture is expected to be compressed (warns if it is not)
    #[arg(long)]
    compressed: bool,

    /// Opcodes per cooperative batch
    #[arg(long, default_value_t = decode::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Surface width limit in dots
    #[arg(long, default_value_t = decode::DEFAULT_MAX_WIDTH)]
    max_width: usize,

    /// Surface height limit in dots
    #[arg(long, default_value_t = decode::DEFAULT_MAX_HEIGHT)]
    max_height: usize,
}

impl DecodeArgs {
    fn options(&self, trace: bool) -> DecodeOptions {
        DecodeOptions {
            compression_hint: self.compressed,
            trace,
            model: self.model,
            draw_filler: !self.no_filler,
            accept_any_graphics_mode: self.accept_any_graphics_mode,
            batch_size: self.batch_size.max(1),
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), PtdecodeError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            png,
            trace,
            decode,
        } => {
            let data = Source::parse(&input).load().await?;
            let options = decode.options(trace);
            let decoded = finish(DecodeJob::new(data, options).run().await)?;

            if let Some(events) = &decoded.trace {
                for event in events {
                    println!("{}", event);
                }
            }
            report(&decoded, decode.model);

            if let Some(path) = png {
                decoded.save(&path)?;
                info!("Saved to {}", path.display());
            }
        }

        Commands::Trace {
            input,
            json,
            decode,
        } => {
            let data = Source::parse(&input).load().await?;
            let options = decode.options(true);
            let decoded = finish(DecodeJob::new(data, options).run().await)?;

            for event in decoded.trace.iter().flatten() {
                if json {
                    let line = serde_json::to_string(event)
                        .map_err(|e| PtdecodeError::InvalidInput(e.to_string()))?;
                    println!("{}", line);
                } else {
                    println!("{}", event);
                }
            }
        }

        Commands::Demo { output } => {
            let capture = demo::demo_capture();
            tokio::fs::write(&output, &capture).await?;
            info!("Wrote {} bytes to {}", capture.len(), output.display());

            // Sanity check: the sample must decode cleanly
            let mut sink = LogSink;
            let decoded = decode::decode_with_sink(&capture, &DecodeOptions::default(), &mut sink)?;
            report(&decoded, PrinterModel::Generic);
        }

        Commands::Serve {
            listen,
            max_body_mb,
            decode,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                max_body_bytes: max_body_mb * 1024 * 1024,
                defaults: decode.options(false),
            };
            server::serve(config).await?;
        }
    }

    Ok(())
}

/// Keep the partial image of a failed decode in the log before reporting.
fn finish(result: Result<Decoded, decode::DecodeFailure>) -> Result<Decoded, PtdecodeError> {
    result.map_err(|failure| {
        if let Some(events) = &failure.partial.trace {
            for event in events {
                println!("{}", event);
            }
        }
        info!(
            "Partial image before the error: {}x{}",
            failure.partial.width, failure.partial.height
        );
        PtdecodeError::from(failure)
    })
}

fn report(decoded: &Decoded, model: PrinterModel) {
    let config = model.config();
    info!(
        "Decoded {} opcodes / {} bytes: {}",
        decoded.opcodes, decoded.bytes_consumed, decoded.halt
    );
    info!(
        "Image {}x{} dots ({:.1} x {:.1} mm at {} DPI), {} black pixels",
        decoded.width,
        decoded.height,
        config.dots_to_mm(decoded.width),
        config.dots_to_mm(decoded.height),
        config.dpi,
        decoded.black_pixels()
    );
}
