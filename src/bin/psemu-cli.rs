// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Headless debug harness
//!
//! Boots the BIOS, optionally side-loads an EXE and inserts a disc
//! image, runs a number of frames, prints the captured TTY output and
//! writes the final framebuffer. Exits 1 on usage errors (missing
//! BIOS), 0 on clean shutdown.

use clap::Parser;
use psemu::config::HarnessConfig;
use psemu::core::system::System;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "psemu-cli", about = "Headless PSX core emulator harness")]
struct Args {
    /// BIOS ROM image (512KB)
    bios: Option<PathBuf>,

    /// Configuration file (TOML); flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PS-X EXE to side-load once the BIOS shell is reached
    #[arg(long)]
    exe: Option<PathBuf>,

    /// Disc image to insert (raw 2352-byte sectors)
    #[arg(long)]
    disc: Option<PathBuf>,

    /// Frames to run (default 60)
    #[arg(long, default_value_t = 0)]
    frames: u32,

    /// Stop on any guest exception
    #[arg(long)]
    break_on_exception: bool,

    /// Write the final framebuffer (raw A1B5G5R5, 1024x512x2 bytes)
    #[arg(long)]
    dump_vram: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match HarnessConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("psemu-cli: {}", e);
                return ExitCode::from(1);
            }
        },
        None => HarnessConfig::default(),
    };
    config = config.merge(HarnessConfig {
        bios: args.bios,
        exe: args.exe,
        disc: args.disc,
        frames: args.frames,
        break_on_exception: args.break_on_exception,
        vram_dump: args.dump_vram,
    });

    let Some(bios_path) = config.bios.clone() else {
        eprintln!("usage: psemu-cli <bios> [--exe FILE] [--disc FILE] [--frames N]");
        return ExitCode::from(1);
    };

    match run(&config, &bios_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("psemu-cli: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(config: &HarnessConfig, bios_path: &std::path::Path) -> psemu::Result<()> {
    let mut system = System::new();
    system.load_bios(&bios_path.to_string_lossy())?;
    system.set_break_on_exception(config.break_on_exception);

    if let Some(exe_path) = &config.exe {
        let mut exe = Vec::new();
        File::open(exe_path)?.read_to_end(&mut exe)?;
        system.sideload_exe(exe)?;
        log::info!("EXE queued from {}", exe_path.display());
    }

    if let Some(disc_path) = &config.disc {
        let mut image = File::open(disc_path)?;
        system.set_disc(Some(Box::new(move |offset, buffer| {
            if image.seek(SeekFrom::Start(offset)).is_ok() {
                let _ = image.read_exact(buffer);
            }
        })));
        log::info!("Disc inserted from {}", disc_path.display());
    }

    let frames = if config.frames == 0 { 60 } else { config.frames };
    for frame in 0..frames {
        system.run_frame()?;
        if system.system_error() {
            log::error!("SystemError after {} frames", frame + 1);
            break;
        }
    }

    let tty = system.take_tty_output();
    if !tty.is_empty() {
        print!("{}", tty);
        std::io::stdout().flush().ok();
    }

    if let Some(dump_path) = &config.vram_dump {
        std::fs::write(dump_path, system.dump_vram())?;
        log::info!("Framebuffer written to {}", dump_path.display());
    }

    log::info!("Clean shutdown after {} cycles", system.cycles());
    Ok(())
}
