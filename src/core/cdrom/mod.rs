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

//! CD-ROM drive controller
//!
//! The drive's observable behaviour is a sequence of interrupts plus
//! the bytes delivered through its response FIFO. A command written to
//! register 1 (index 0) consumes parameters from the parameter FIFO
//! and arms one or more interrupt descriptors; each descriptor carries
//! a countdown in CPU cycles, its response bytes, and optionally the
//! descriptor to activate after acknowledgement. When a countdown
//! reaches zero the descriptor's bytes become the drive's response
//! FIFO, the interrupt type lands in the interrupt flag register, and
//! a fire line is raised for the bus to latch into I_STAT bit 2.
//!
//! Acknowledgement (register 3, index 1) clears flag bits; when the
//! acknowledged type covers the active descriptor's type the chain
//! advances to its successor, which then starts its own countdown.
//! Reset or a fresh command can truncate a chain at any point, which
//! is why this is an explicit state machine rather than a coroutine.
//!
//! While the drive is reading, a per-cycle counter paces sector
//! delivery: each elapsed period invokes the host's read callback with
//! an absolute byte offset into the image (2352-byte raw sectors, with
//! a 24-byte header skip) and schedules a fresh INT1.

use crate::core::fifo::Fifo;
use bitflags::bitflags;

mod commands;

bitflags! {
    /// Drive status byte ("response status")
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DriveStatus: u8 {
        const ERROR = 0x01;
        const MOTOR_ON = 0x02;
        const SEEK_ERROR = 0x04;
        const ID_ERROR = 0x08;
        const SHELL_OPEN = 0x10;
        const READING = 0x20;
        const SEEKING = 0x40;
        const PLAYING = 0x80;
    }
}

bitflags! {
    /// Drive mode byte (Setmode parameter)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DriveMode: u8 {
        const CDDA = 0x01;
        const AUTO_PAUSE = 0x02;
        const REPORT = 0x04;
        const XA_FILTER = 0x08;
        const IGNORE = 0x10;
        const SIZE_2340 = 0x20;
        const XA_ADPCM = 0x40;
        const DOUBLE_SPEED = 0x80;
    }
}

/// Interrupt descriptor slots
///
/// The drive uses the INT1/INT2/INT3/INT5 response classes; the slot
/// index doubles as the array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntSlot {
    /// Data ready (sector delivered)
    Int1 = 0,
    /// Command complete (second response)
    Int2 = 1,
    /// Command acknowledge (first response)
    Int3 = 2,
    /// Error response
    Int5 = 3,
}

impl IntSlot {
    /// The 3-bit type value latched into the interrupt flag register
    #[inline(always)]
    fn bits(self) -> u8 {
        match self {
            IntSlot::Int1 => 1,
            IntSlot::Int2 => 2,
            IntSlot::Int3 => 3,
            IntSlot::Int5 => 5,
        }
    }
}

/// One scheduled interrupt
///
/// Descriptors are plain values in a fixed array; chaining is the
/// `next` slot id, so reset and acknowledgement can truncate a chain
/// without touching heap state.
#[derive(Debug, Clone, Copy)]
struct PendingInterrupt {
    /// Scheduled and counting down
    armed: bool,
    /// Countdown hit zero; waiting for acknowledgement
    fired: bool,
    /// Remaining CPU cycles until fire
    cycles: u32,
    /// Bytes that become the response FIFO on fire
    response: Fifo<u8, 16>,
    /// Descriptor to activate once this one is acknowledged
    next: Option<IntSlot>,
}

impl Default for PendingInterrupt {
    fn default() -> Self {
        Self {
            armed: false,
            fired: false,
            cycles: 0,
            response: Fifo::new(),
            next: None,
        }
    }
}

/// Current head position, decoded from BCD Setloc parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct MsfPosition {
    pub minute: u8,
    pub second: u8,
    pub sector: u8,
}

/// Host-provided sector reader
///
/// Called with the absolute byte offset into the disc image and a
/// 2340-byte destination. The callee must not re-enter the emulator.
pub type SectorReadFn = Box<dyn FnMut(u64, &mut [u8])>;

/// Decode a BCD byte: `bcd - 6 * (bcd >> 4)`
#[inline(always)]
pub(crate) fn bcd_to_dec(value: u8) -> u8 {
    value.wrapping_sub(6 * (value >> 4))
}

/// CD-ROM drive controller
pub struct Cdrom {
    /// Register bank select (low 2 bits of register 0)
    index: u8,

    /// Interrupt enable mask (low 5 bits)
    interrupt_enable: u8,

    /// Interrupt flag register (low 3 bits hold the fired type)
    interrupt_flag: u8,

    /// Drive status byte
    status: DriveStatus,

    /// Drive mode byte
    mode: DriveMode,

    /// Parameter FIFO (command arguments)
    params: Fifo<u8, 16>,

    /// Response FIFO (swapped in from the fired descriptor)
    response: Fifo<u8, 16>,

    /// The four interrupt descriptors
    interrupts: [PendingInterrupt; 4],

    /// Currently active descriptor (counting down or awaiting ack)
    active: Option<IntSlot>,

    /// Head position
    position: MsfPosition,

    /// Raw sector buffer (2352 bytes; the callback fills the 2340
    /// bytes past the 12-byte sync pattern)
    sector_buffer: [u8; Self::RAW_SECTOR_SIZE],

    /// Cycles accumulated towards the next sector while reading
    read_cycles: u32,

    /// Sectors streamed since the read began
    sector_count: u32,

    /// Fire line, latched (and cleared) by the bus each step
    fire: bool,

    /// Host sector reader; present means a disc is inserted
    reader: Option<SectorReadFn>,
}

impl Cdrom {
    /// CPU clock, used to derive sector pacing
    const CPU_CLOCK_HZ: u32 = 33_868_800;

    /// Raw sector size on disc
    pub const RAW_SECTOR_SIZE: usize = 2352;

    /// Header bytes skipped when handing data to the callback
    pub const SECTOR_HEADER_SKIP: u64 = 24;

    /// First-response delay for most commands
    const ACK_CYCLES: u32 = 20_000;

    /// First-response delay when the drive reacts "immediately"
    const SHORT_ACK_CYCLES: u32 = 1_000;

    /// Pause second-response delay
    const PAUSE_COMPLETE_CYCLES: u32 = 25_000;

    /// Init second-response delay
    const INIT_COMPLETE_CYCLES: u32 = 70_000;

    /// Seek second-response delay
    const SEEK_COMPLETE_CYCLES: u32 = 100_000;

    /// GetID second-response delay
    const GETID_COMPLETE_CYCLES: u32 = 33_000;

    /// Delay before the INT1 that follows a streamed sector
    const SECTOR_INT1_CYCLES: u32 = 30_000;

    /// Create a drive with no disc inserted
    pub fn new() -> Self {
        Self {
            index: 0,
            interrupt_enable: 0,
            interrupt_flag: 0,
            status: DriveStatus::MOTOR_ON,
            mode: DriveMode::default(),
            params: Fifo::new(),
            response: Fifo::new(),
            interrupts: [PendingInterrupt::default(); 4],
            active: None,
            position: MsfPosition::default(),
            sector_buffer: [0u8; Self::RAW_SECTOR_SIZE],
            read_cycles: 0,
            sector_count: 0,
            fire: false,
            reader: None,
        }
    }

    /// Restore power-on state; the inserted disc (reader) is kept
    pub fn reset(&mut self) {
        self.index = 0;
        self.interrupt_enable = 0;
        self.interrupt_flag = 0;
        self.status = DriveStatus::MOTOR_ON;
        self.mode = DriveMode::default();
        self.params.clear();
        self.response.clear();
        self.interrupts = [PendingInterrupt::default(); 4];
        self.active = None;
        self.position = MsfPosition::default();
        self.sector_buffer = [0u8; Self::RAW_SECTOR_SIZE];
        self.read_cycles = 0;
        self.sector_count = 0;
        self.fire = false;
    }

    /// Insert or remove a disc
    ///
    /// With a reader installed GetID reports a licensed disc;
    /// without one GetID is denied with the INT5 error response.
    pub fn set_reader(&mut self, reader: Option<SectorReadFn>) {
        self.reader = reader;
    }

    /// True while a disc is inserted
    pub fn disc_present(&self) -> bool {
        self.reader.is_some()
    }

    /// Cycles per streamed sector for the current speed
    fn sector_read_cycle_count(&self) -> u32 {
        let sectors_per_second = if self.mode.contains(DriveMode::DOUBLE_SPEED) {
            150
        } else {
            75
        };
        Self::CPU_CLOCK_HZ / sectors_per_second
    }

    /// Advance the drive by one CPU cycle
    pub fn step(&mut self) {
        // Countdown of the active descriptor
        if let Some(slot) = self.active {
            let descriptor = &mut self.interrupts[slot as usize];
            if descriptor.armed && !descriptor.fired && descriptor.cycles > 0 {
                descriptor.cycles -= 1;
                if descriptor.cycles == 0 {
                    descriptor.fired = true;
                    self.response = descriptor.response;
                    self.interrupt_flag = slot.bits();
                    self.fire = true;
                    log::trace!("CD-ROM INT{} fired", slot.bits());
                }
            }
        }

        // Sector pacing while reading
        if self.status.contains(DriveStatus::READING) && self.reader.is_some() {
            self.read_cycles += 1;
            if self.read_cycles >= self.sector_read_cycle_count() {
                self.read_cycles = 0;
                self.stream_sector();
            }
        }
    }

    /// Deliver one sector through the host callback and queue INT1
    fn stream_sector(&mut self) {
        let sector = self.position.sector as u64 + self.sector_count as u64;
        let lba = sector + self.position.second as u64 * 75
            + self.position.minute as u64 * 60 * 75
            - 150;
        let offset = lba * Self::RAW_SECTOR_SIZE as u64 + Self::SECTOR_HEADER_SKIP;

        if let Some(reader) = self.reader.as_mut() {
            reader(offset, &mut self.sector_buffer[12..]);
        }
        self.sector_count += 1;

        log::trace!(
            "CD-ROM sector {} streamed (offset 0x{:X})",
            self.sector_count,
            offset
        );

        let status = self.status.bits();
        self.schedule(IntSlot::Int1, Self::SECTOR_INT1_CYCLES, &[status], None);
    }

    /// Arm an interrupt descriptor
    ///
    /// The descriptor becomes active immediately when no other
    /// interrupt is in flight; otherwise it waits to be chained.
    fn schedule(&mut self, slot: IntSlot, cycles: u32, response: &[u8], next: Option<IntSlot>) {
        let descriptor = &mut self.interrupts[slot as usize];
        descriptor.armed = true;
        descriptor.fired = false;
        descriptor.cycles = cycles.max(1);
        descriptor.response.clear();
        for &byte in response {
            descriptor.response.push(byte);
        }
        descriptor.next = next;

        if self.active.is_none() {
            self.active = Some(slot);
        }
    }

    /// Acknowledge interrupt flag bits (register 3, index 1)
    ///
    /// When the write covers the active descriptor's type the chain
    /// advances; bit 6 additionally flushes the parameter FIFO.
    fn acknowledge(&mut self, value: u8) {
        self.interrupt_flag &= !(value & 0x1F);
        if value & 0x40 != 0 {
            self.params.clear();
        }

        if let Some(slot) = self.active {
            let type_bits = slot.bits();
            let descriptor = &mut self.interrupts[slot as usize];
            if descriptor.fired && (value & 0x7) & type_bits == type_bits {
                descriptor.armed = false;
                descriptor.fired = false;
                self.active = descriptor.next.take();
                if let Some(next) = self.active {
                    log::trace!("CD-ROM chaining to INT{}", next.bits());
                }
            }
        }
    }

    /// Take the latched fire line (bus side)
    pub fn take_fire(&mut self) -> bool {
        std::mem::take(&mut self.fire)
    }

    /// Read an indexed register (offset 0-3 from 0x1F801800)
    pub fn read_register(&mut self, offset: u32) -> u8 {
        match offset {
            0 => self.read_index_status(),
            1 => self.response.pop().unwrap_or(0),
            2 => {
                // Data FIFO reads go through DMA on this core
                log::trace!("CD-ROM data register read (empty)");
                0
            }
            _ => match self.index {
                0 => self.interrupt_enable | 0xE0,
                1 => self.interrupt_flag | 0xE0,
                _ => {
                    log::trace!("CD-ROM register 3 read with index {}", self.index);
                    self.interrupt_flag | 0xE0
                }
            },
        }
    }

    /// Write an indexed register (offset 0-3 from 0x1F801800)
    pub fn write_register(&mut self, offset: u32, value: u8) {
        match offset {
            0 => {
                // Bits 2/3 flush the FIFOs, low bits select the bank
                if value & 0x04 != 0 {
                    self.params.clear();
                }
                if value & 0x08 != 0 {
                    self.response.clear();
                }
                self.index = value & 0x3;
            }
            1 => match self.index {
                0 => self.execute_command(value),
                _ => log::trace!(
                    "CD-ROM register 1 write 0x{:02X} with index {} ignored",
                    value,
                    self.index
                ),
            },
            2 => match self.index {
                0 => {
                    if !self.params.push(value) {
                        log::warn!("CD-ROM parameter FIFO overflow");
                    }
                }
                1 => self.interrupt_enable = value & 0x1F,
                _ => log::trace!(
                    "CD-ROM register 2 write 0x{:02X} with index {} ignored",
                    value,
                    self.index
                ),
            },
            _ => match self.index {
                0 => log::trace!("CD-ROM request register = 0x{:02X}", value),
                1 => self.acknowledge(value),
                _ => log::trace!(
                    "CD-ROM register 3 write 0x{:02X} with index {} ignored",
                    value,
                    self.index
                ),
            },
        }
    }

    /// Register 0 read: bit-packed index/status byte
    ///
    /// Bit 0-1 index, bit 3 parameter FIFO empty, bit 4 parameter FIFO
    /// not full, bit 5 response FIFO not empty, bit 6 data FIFO not
    /// empty, bit 7 busy.
    fn read_index_status(&self) -> u8 {
        let mut value = self.index & 0x3;
        if self.params.is_empty() {
            value |= 1 << 3;
        }
        if !self.params.is_full() {
            value |= 1 << 4;
        }
        if !self.response.is_empty() {
            value |= 1 << 5;
        }
        value
    }

    /// Current interrupt flag value
    pub fn interrupt_flag(&self) -> u8 {
        self.interrupt_flag
    }

    /// Drive status byte
    pub fn status(&self) -> DriveStatus {
        self.status
    }

    /// Current decoded head position
    pub fn position(&self) -> MsfPosition {
        self.position
    }
}

impl Default for Cdrom {
    fn default() -> Self {
        Self::new()
    }
}
