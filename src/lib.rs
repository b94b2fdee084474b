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

//! psemu: a cycle-stepped Sony PlayStation (PSX) core emulator
//!
//! The crate models the LR33300 CPU interpreter with its GTE (COP2) and
//! system control (COP0) coprocessors, the memory bus with its DMA
//! engines, the command-driven 2D rasterizing GPU with 1MB of VRAM, and
//! the CD-ROM drive state machine. One call to
//! [`core::system::System::step`] advances the whole machine by one
//! simulated clock cycle.
//!
//! # Architecture
//!
//! - [`core::cpu`]: MIPS-I instruction interpreter, delay slots,
//!   exceptions
//! - [`core::gte`]: fixed-point vector/matrix pipeline with the UNR
//!   perspective divider
//! - [`core::memory`]: bus dispatch and the per-cycle bus step
//! - [`core::dma`]: GPU linked-list/VRAM transfers and the OTC clear
//! - [`core::gpu`]: GP0/GP1 state machine and software rasterizer
//! - [`core::cdrom`]: command dispatch with scheduled interrupt chains
//! - [`core::system`]: wiring, reset, frame loop, host hooks
//!
//! # Example
//!
//! ```no_run
//! use psemu::core::system::System;
//!
//! let mut system = System::new();
//! system.load_bios("SCPH1001.BIN")?;
//! system.run_frame()?;
//! let framebuffer = system.dump_vram();
//! # Ok::<(), psemu::EmulatorError>(())
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`core::error::Result<T>`]. Guest-level
//! CPU exceptions are not errors; only creation-time failures and
//! host-fatal conditions (Reserved Instruction, break-on-exception)
//! surface as `Err`.

pub mod config;
pub mod core;

// Re-export commonly used types
pub use core::error::{EmulatorError, Result};
