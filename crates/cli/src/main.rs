//! AVR simulator CLI.
//!
//! This binary is a thin host around `avrsim-core`. It performs:
//! 1. **Device listing:** Prints the built-in device catalog.
//! 2. **Disassembly:** Decodes a raw binary image and prints the listing.
//! 3. **Timed run:** Runs an image for a bounded wall-clock time, logging
//!    telemetry, then prints statistics.
//!
//! Images are raw binaries (`avr-objcopy -O binary`), loaded at `--base`.
//! Logging goes to stderr and is filtered with `RUST_LOG` (default `info`).

use std::error::Error;
use std::time::Duration;
use std::{fs, process};

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use avrsim_core::config::{DevicePrototype, SimConfig};
use avrsim_core::isa::disasm;
use avrsim_core::sim::{FirmwareImage, Simulator, decode};
use avrsim_core::{device, stats::StatsSnapshot};

#[derive(Parser, Debug)]
#[command(
    name = "avrsim",
    author,
    version,
    about = "AVR 8-bit microcontroller simulator",
    long_about = "Decode, disassemble, and run raw AVR firmware images.\n\nExamples:\n  avrsim devices\n  avrsim disasm --image blink.bin\n  avrsim run --device atmega2560 --image blink.bin --duration-ms 2000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in devices.
    Devices,

    /// Print the disassembly of an image.
    Disasm {
        #[command(flatten)]
        target: Target,
    },

    /// Run an image for a bounded time.
    Run {
        #[command(flatten)]
        target: Target,

        /// Wall-clock run time in milliseconds.
        #[arg(long, default_value_t = 10_000)]
        duration_ms: u64,

        /// Run configuration (JSON file).
        #[arg(long)]
        config: Option<String>,

        /// Log the disassembly listing at debug level before running.
        #[arg(long)]
        listing: bool,
    },
}

/// Which device to build and which image to load into it.
#[derive(Args, Debug)]
struct Target {
    /// Built-in device identifier.
    #[arg(short, long, default_value = device::DEFAULT_DEVICE)]
    device: String,

    /// Device prototype JSON file; overrides `--device`.
    #[arg(long)]
    device_file: Option<String>,

    /// Raw binary image.
    #[arg(short, long)]
    image: String,

    /// Load address of the image (decimal or 0x-prefixed hex).
    #[arg(long, default_value = "0", value_parser = parse_addr)]
    base: u32,
}

impl Target {
    fn device(&self) -> Result<DevicePrototype, Box<dyn Error>> {
        let device = match &self.device_file {
            Some(path) => DevicePrototype::from_json(&read_text(path)?)?,
            None => device::lookup(&self.device)?,
        };
        Ok(device)
    }

    fn image(&self) -> Result<FirmwareImage, Box<dyn Error>> {
        let bytes = fs::read(&self.image).map_err(|e| format!("could not read image '{}': {e}", self.image))?;
        Ok(FirmwareImage::new().with_region(self.base, bytes))
    }
}

fn parse_addr(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn read_text(path: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(path).map_err(|e| format!("could not read '{path}': {e}"))?)
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Devices => {
            cmd_devices();
            Ok(())
        }
        Commands::Disasm { target } => cmd_disasm(&target),
        Commands::Run {
            target,
            duration_ms,
            config,
            listing,
        } => cmd_run(&target, duration_ms, config.as_deref(), listing),
    };

    if let Err(e) = result {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Prints every built-in device with its memory layout.
fn cmd_devices() {
    println!("{:<12} {:>8} {:>6} {:>6}  ret", "device", "flash", "sram", "eeprom");
    for name in device::names() {
        if let Ok(d) = device::lookup(name) {
            println!(
                "{:<12} {:>8} {:>6} {:>6}  {}",
                d.name,
                d.program_memory_size,
                d.sram_size,
                d.eeprom_size,
                d.return_address_size()
            );
        }
    }
}

/// Decodes the image and prints its listing followed by any decode issues.
fn cmd_disasm(target: &Target) -> Result<(), Box<dyn Error>> {
    let device = target.device()?;
    let decoded = decode(&device, &target.image()?)?;

    for line in disasm::listing(&decoded.instructions) {
        println!("{line}");
    }
    for issue in &decoded.issues {
        warn!(%issue, "decode issue");
    }
    info!(
        instructions = decoded.instructions.count(),
        data_bytes = decoded.data_section.len(),
        issues = decoded.issues.len(),
        "disassembled {}",
        target.image
    );
    Ok(())
}

/// Runs the image for at most `duration_ms`, then prints statistics.
///
/// A fatal error in the run loop is reported with the core state at the
/// moment it stopped, and exits with status 1.
fn cmd_run(target: &Target, duration_ms: u64, config: Option<&str>, listing: bool) -> Result<(), Box<dyn Error>> {
    let mut sim_config = match config {
        Some(path) => SimConfig::from_json(&read_text(path)?)?,
        None => SimConfig::default(),
    };
    sim_config.listing |= listing;

    let device = target.device()?;
    info!(device = %device.name, image = %target.image, base = target.base, "loading image");
    let mut sim = Simulator::new(&device, &target.image()?, sim_config)?;

    println!("[*] Device: {}  Image: {} @ {:#06x}", device.name, target.image, target.base);
    println!("[*] Running for {duration_ms} ms");

    let outcome = sim.run_for(Duration::from_millis(duration_ms));
    let samples = sim.samples().try_iter().count();

    match outcome {
        Ok(report) => {
            info!(
                pc = report.pc,
                instructions = report.stats.instructions,
                cycles = report.stats.cycles,
                samples,
                "run finished"
            );
            println!("[*] Stopped at PC {:#06x} after {samples} telemetry samples", report.pc);
            report.stats.print();
            Ok(())
        }
        Err(e) => {
            error!(error = %e, samples, "run ended with a fatal error");
            if let Some(mcu) = sim.mcu() {
                eprintln!(
                    "[!] PC {:#06x}  SP {:#06x}  SREG {:#010b}",
                    mcu.pc(),
                    mcu.sp(),
                    mcu.sreg()
                );
            }
            let snapshot: StatsSnapshot = sim.stats().snapshot();
            snapshot.print();
            Err(e.into())
        }
    }
}
