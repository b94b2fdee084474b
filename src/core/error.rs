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

//! Error types for the emulator core
//!
//! The core deliberately keeps its error surface small: guest-visible
//! faults (CPU exceptions, disc errors, unmapped I/O) are part of the
//! emulated machine state and never reach the host as `Err`. What remains
//! is creation-time failure (BIOS loading), malformed side-loaded
//! executables, and the two conditions a host run loop treats as fatal:
//! a Reserved Instruction exception, and any guest exception when the
//! host has opted into `break_on_exception`.

use crate::core::cpu::ExceptionCause;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Top-level emulator error type
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// BIOS file could not be found or opened
    #[error("BIOS file not found: {0}")]
    BiosNotFound(String),

    /// BIOS file has the wrong size (must be exactly 512KB)
    #[error("invalid BIOS size: expected {expected} bytes, got {got} bytes")]
    InvalidBiosSize { expected: usize, got: usize },

    /// Side-loaded executable is malformed (bad magic, truncated header)
    #[error("invalid executable: {0}")]
    InvalidExecutable(String),

    /// The guest executed a Reserved Instruction
    ///
    /// This terminates the host run loop unconditionally: it indicates
    /// either an emulator bug or a runaway guest.
    #[error("reserved instruction 0x{instruction:08X} at PC=0x{pc:08X}")]
    ReservedInstruction { pc: u32, instruction: u32 },

    /// A guest exception was taken while `break_on_exception` is set
    #[error("guest exception {cause:?} at EPC=0x{epc:08X}")]
    GuestException { cause: ExceptionCause, epc: u32 },

    /// Harness configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying I/O error (BIOS/EXE/config file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
