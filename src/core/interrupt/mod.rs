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

//! Interrupt controller (I_STAT / I_MASK)
//!
//! The controller aggregates interrupt requests from the hardware blocks
//! and drives the CPU's external interrupt line.
//!
//! ## Registers
//!
//! - **I_STAT** (0x1F801070): pending interrupt bits. Reading returns the
//!   pending set; writing acknowledges (`i_stat &= value`, so 0 bits
//!   clear, 1 bits leave the flag untouched). Acknowledgement can only
//!   ever clear bits.
//! - **I_MASK** (0x1F801074): enable mask, plain read/write.
//!
//! ## Sources
//!
//! | Bit | Source |
//! |-----|--------|
//! | 0   | V-blank |
//! | 1   | GPU |
//! | 2   | CD-ROM |
//! | 3   | DMA |
//! | 4-6 | Timers 0-2 |

/// Interrupt request sources, by I_STAT bit position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqSource {
    /// Vertical blank (bit 0)
    Vblank,
    /// GPU (bit 1)
    Gpu,
    /// CD-ROM controller (bit 2)
    CdRom,
    /// DMA transfer complete (bit 3)
    Dma,
    /// Timer 0 (bit 4)
    Timer0,
    /// Timer 1 (bit 5)
    Timer1,
    /// Timer 2 (bit 6)
    Timer2,
}

impl IrqSource {
    /// I_STAT bit for this source
    #[inline(always)]
    pub fn bit(self) -> u32 {
        match self {
            IrqSource::Vblank => 1 << 0,
            IrqSource::Gpu => 1 << 1,
            IrqSource::CdRom => 1 << 2,
            IrqSource::Dma => 1 << 3,
            IrqSource::Timer0 => 1 << 4,
            IrqSource::Timer1 => 1 << 5,
            IrqSource::Timer2 => 1 << 6,
        }
    }
}

/// PlayStation interrupt controller
///
/// # Example
///
/// ```
/// use psemu::core::interrupt::{InterruptController, IrqSource};
///
/// let mut ic = InterruptController::new();
/// ic.request(IrqSource::Vblank);
/// assert!(!ic.is_pending()); // masked by default
///
/// ic.write_mask(0x0001);
/// assert!(ic.is_pending());
///
/// // Acknowledge by writing 0 to the bit
/// ic.write_status(!0x0001);
/// assert!(!ic.is_pending());
/// ```
pub struct InterruptController {
    /// I_STAT pending bits
    status: u32,

    /// I_MASK enable bits
    mask: u32,
}

impl InterruptController {
    /// All architecturally defined interrupt bits
    const IRQ_BITS: u32 = 0x7FF;

    /// Create a controller with everything cleared and masked
    pub fn new() -> Self {
        Self { status: 0, mask: 0 }
    }

    /// Restore power-on state
    pub fn reset(&mut self) {
        self.status = 0;
        self.mask = 0;
    }

    /// Raise an interrupt request
    ///
    /// Sets the source's I_STAT bit. The mask does not gate the flag
    /// itself, only whether it reaches the CPU.
    pub fn request(&mut self, source: IrqSource) {
        self.status |= source.bit();
        log::trace!("IRQ requested: {:?}, I_STAT=0x{:04X}", source, self.status);
    }

    /// True when any unmasked interrupt is pending
    ///
    /// This is the level of the CPU's external interrupt line.
    #[inline(always)]
    pub fn is_pending(&self) -> bool {
        (self.status & self.mask) != 0
    }

    /// Read I_STAT
    pub fn read_status(&self) -> u32 {
        self.status
    }

    /// Write I_STAT (acknowledge)
    ///
    /// `i_stat &= value`: zero bits acknowledge, one bits are left alone.
    pub fn write_status(&mut self, value: u32) {
        self.status &= value & Self::IRQ_BITS;
        log::trace!("IRQ acknowledged, I_STAT=0x{:04X}", self.status);
    }

    /// Read I_MASK
    pub fn read_mask(&self) -> u32 {
        self.mask
    }

    /// Write I_MASK
    pub fn write_mask(&mut self, value: u32) {
        self.mask = value & Self::IRQ_BITS;
        log::debug!("IRQ mask set: 0x{:04X}", self.mask);
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}
