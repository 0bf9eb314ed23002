use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use coco3_core::core::machine::Machine;
use coco3_machines::binary::{self, BinaryError};
use coco3_machines::registry::{self, MachineEntry};
use coco3_machines::rom_loader::RomLoadError;
use thiserror::Error;

mod config;
mod emulator;
mod input;
mod rom_path;

use config::{Config, ConfigError};
use emulator::Typist;

const DEFAULT_MACHINE: &str = "coco3";
const DEFAULT_FRAMES: u64 = 600;
const DEFAULT_BOOT_FRAMES: u64 = 90;

/// Headless Tandy Color Computer 3 emulator
#[derive(Parser, Debug)]
#[command(name = "coco3")]
#[command(version)]
#[command(about = "Run a Color Computer 3 headless and dump the CPU state")]
struct Cli {
    /// Machine to run (coco3, coco3-512k)
    machine: Option<String>,

    /// ROM set: a .zip, a single image, or a directory of images or coco3.zip
    #[arg(long)]
    rom_path: Option<PathBuf>,

    /// LOADM binary to store into memory after boot
    #[arg(long)]
    load: Option<PathBuf>,

    /// Jump to the loaded binary's execution address
    #[arg(long, requires = "load")]
    exec: bool,

    /// Frames to run (60 per emulated second)
    #[arg(long)]
    frames: Option<u64>,

    /// Frames to run before --load, letting BASIC initialise
    #[arg(long)]
    boot_frames: Option<u64>,

    /// Installed RAM in KB (128 or 512); picks the matching machine variant
    #[arg(long)]
    ram: Option<u32>,

    /// Text to type on the emulated keyboard ("\n" for ENTER)
    #[arg(long = "type")]
    type_text: Option<String>,

    /// Config file (default: <config dir>/coco3/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept ROM images whose CRC32 matches no known dump
    #[arg(long)]
    skip_checksums: bool,

    /// Log every executed instruction
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rom(#[from] RomLoadError),
    #[error("{path}: {source}")]
    Binary { path: PathBuf, source: BinaryError },
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unknown machine {name} (available: {available})")]
    UnknownMachine { name: String, available: String },
    #[error("no {ram}KB variant of {name}")]
    UnsupportedRam { name: String, ram: u32 },
    #[error("no ROM path given (use --rom-path or [paths] rom_path in the config)")]
    NoRomPath,
    #[error("{0} has no execution address")]
    NoExecAddress(PathBuf),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::load(cli.config.as_deref())?;

    let entry = select_machine(&cli, &config)?;
    let rom_path = cli
        .rom_path
        .clone()
        .or_else(|| config.paths.rom_path.clone())
        .ok_or(AppError::NoRomPath)?;
    let skip_checksums = cli.skip_checksums || config.run.skip_checksums;

    let rom_set = rom_path::load_rom_set(entry.rom_name, &rom_path)?;
    let mut machine = (entry.create)(&rom_set, skip_checksums)?;
    log::info!("{} ({}KB) ready", entry.name, entry.ram_kb);
    machine.reset();

    let key_map = input::default_key_map(machine.input_map());
    let mut typist = Typist::new(cli.type_text.as_deref().unwrap_or(""), &key_map);
    let mut frames = cli.frames.or(config.run.frames).unwrap_or(DEFAULT_FRAMES);

    if let Some(path) = &cli.load {
        let boot = cli
            .boot_frames
            .or(config.run.boot_frames)
            .unwrap_or(DEFAULT_BOOT_FRAMES)
            .min(frames);
        emulator::run(machine.as_mut(), boot, &mut typist);
        frames -= boot;
        load_program(machine.as_mut(), path, cli.exec)?;
    }

    emulator::run(machine.as_mut(), frames, &mut typist);

    println!("frames: {}", machine.frame_count());
    println!("{}", machine.cpu_state());
    Ok(())
}

fn select_machine(cli: &Cli, config: &Config) -> Result<&'static MachineEntry, AppError> {
    let name = cli
        .machine
        .clone()
        .or_else(|| config.machine.name.clone())
        .unwrap_or_else(|| DEFAULT_MACHINE.to_string());

    let entry = registry::find(&name).ok_or_else(|| AppError::UnknownMachine {
        name: name.clone(),
        available: registry::all()
            .iter()
            .map(|e| e.name)
            .collect::<Vec<_>>()
            .join(", "),
    })?;

    match cli.ram.or(config.machine.ram) {
        Some(ram) if ram != entry.ram_kb => registry::find_by_ram(entry.rom_name, ram)
            .ok_or(AppError::UnsupportedRam { name, ram }),
        _ => Ok(entry),
    }
}

fn load_program(machine: &mut dyn Machine, path: &Path, exec: bool) -> Result<(), AppError> {
    let data = std::fs::read(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let image = binary::load(machine, &data).map_err(|source| AppError::Binary {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "{}: {} blocks, {} bytes",
        path.display(),
        image.blocks,
        image.bytes
    );

    if exec {
        let pc = image
            .exec
            .ok_or_else(|| AppError::NoExecAddress(path.to_path_buf()))?;
        log::info!("EXEC {pc:04X}");
        machine.force_pc(pc);
    }
    Ok(())
}
