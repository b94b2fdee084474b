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

//! System integration
//!
//! Wires the CPU, bus, GPU, DMA, CD-ROM, timers and interrupt
//! controller together and drives them one simulated cycle at a time:
//! each [`System::step`] runs one CPU instruction followed by one bus
//! cycle. [`System::run_frame`] runs a frame's worth of cycles
//! (33.8685 MHz / 60) and raises the V-blank interrupt at the end.
//!
//! The system also hosts the two BIOS integration hooks: TTY output
//! capture (the A0h/B0h putchar vectors) and the EXE side-loader that
//! fires when the shell reaches 0x80030000.

use super::cdrom::{Cdrom, SectorReadFn};
use super::cpu::{Cpu, ExceptionCause};
use super::dma::Dma;
use super::error::{EmulatorError, Result};
use super::gpu::Gpu;
use super::interrupt::{InterruptController, IrqSource};
use super::memory::Bus;
use super::timer::Timers;
use std::cell::RefCell;
use std::rc::Rc;

/// The whole machine
///
/// # Example
/// ```no_run
/// use psemu::core::system::System;
///
/// let mut system = System::new();
/// system.load_bios("SCPH1001.BIN").unwrap();
/// system.run_frame().unwrap();
/// ```
pub struct System {
    /// CPU interpreter
    cpu: Cpu,

    /// Memory bus (owns RAM/BIOS, routes I/O, runs the bus step)
    bus: Bus,

    /// GPU, shared with the bus for memory-mapped access
    gpu: Rc<RefCell<Gpu>>,

    /// DMA controller
    dma: Rc<RefCell<Dma>>,

    /// CD-ROM drive
    cdrom: Rc<RefCell<Cdrom>>,

    /// Timers
    timers: Rc<RefCell<Timers>>,

    /// Interrupt controller
    interrupt_controller: Rc<RefCell<InterruptController>>,

    /// Total cycles executed since reset
    cycles: u64,

    /// Treat every guest exception as fatal to the run loop
    break_on_exception: bool,

    /// Captured TTY output from the BIOS putchar vectors
    tty_output: String,

    /// The BIOS signalled SystemError through the A0h vector
    system_error: bool,

    /// Executable queued for side-loading at the shell entry
    pending_exe: Option<Vec<u8>>,
}

impl System {
    /// CPU clock frequency
    pub const CPU_CLOCK_HZ: u32 = 33_868_800;

    /// Cycles per 60Hz frame
    pub const CYCLES_PER_FRAME: u32 = Self::CPU_CLOCK_HZ / 60;

    /// PC value at which the shell accepts a side-loaded EXE
    const SHELL_ENTRY_PC: u32 = 0x8003_0000;

    /// PS-X EXE header magic
    const EXE_MAGIC: &'static [u8] = b"PS-X EXE";

    /// Build a system with all components wired
    pub fn new() -> Self {
        let gpu = Rc::new(RefCell::new(Gpu::new()));
        let dma = Rc::new(RefCell::new(Dma::new()));
        let cdrom = Rc::new(RefCell::new(Cdrom::new()));
        let timers = Rc::new(RefCell::new(Timers::new()));
        let interrupt_controller = Rc::new(RefCell::new(InterruptController::new()));

        let mut bus = Bus::new();
        bus.set_gpu(gpu.clone());
        bus.set_dma(dma.clone());
        bus.set_cdrom(cdrom.clone());
        bus.set_timers(timers.clone());
        bus.set_interrupt_controller(interrupt_controller.clone());

        log::info!("System assembled");

        Self {
            cpu: Cpu::new(),
            bus,
            gpu,
            dma,
            cdrom,
            timers,
            interrupt_controller,
            cycles: 0,
            break_on_exception: false,
            tty_output: String::new(),
            system_error: false,
            pending_exe: None,
        }
    }

    /// Load the BIOS ROM from a file
    pub fn load_bios(&mut self, path: &str) -> Result<()> {
        self.bus.load_bios(path)
    }

    /// Load the BIOS ROM from bytes
    pub fn load_bios_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.bus.load_bios_bytes(bytes)
    }

    /// Reset every component to power-on state
    ///
    /// The BIOS image and an inserted disc survive the reset.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.gpu.borrow_mut().reset();
        self.dma.borrow_mut().reset();
        self.cdrom.borrow_mut().reset();
        self.timers.borrow_mut().reset();
        self.interrupt_controller.borrow_mut().reset();
        self.cycles = 0;
        self.tty_output.clear();
        self.system_error = false;
    }

    /// Run exactly one CPU cycle and one bus cycle
    ///
    /// Returns an error only for host-fatal conditions: a Reserved
    /// Instruction, or any guest exception while `break_on_exception`
    /// is set. Ordinary guest exceptions are invisible here.
    pub fn step(&mut self) -> Result<()> {
        self.capture_tty();
        self.apply_pending_exe()?;

        let exception = self.cpu.step(&mut self.bus);
        self.bus.step();
        self.cycles += 1;

        match exception {
            Some(ExceptionCause::ReservedInstruction) => Err(EmulatorError::ReservedInstruction {
                pc: self.cpu.cop0_reg(14),
                instruction: self.cpu.current_instruction(),
            }),
            Some(cause) if self.break_on_exception && cause != ExceptionCause::Interrupt => {
                Err(EmulatorError::GuestException {
                    cause,
                    epc: self.cpu.cop0_reg(14),
                })
            }
            _ => Ok(()),
        }
    }

    /// Run one frame of cycles, then raise V-blank
    pub fn run_frame(&mut self) -> Result<()> {
        for _ in 0..Self::CYCLES_PER_FRAME {
            self.step()?;
        }
        self.vblank();
        Ok(())
    }

    /// Raise the V-blank interrupt (I_STAT bit 0)
    pub fn vblank(&mut self) {
        self.interrupt_controller
            .borrow_mut()
            .request(IrqSource::Vblank);
    }

    /// Insert or remove a disc
    ///
    /// The callback receives absolute byte offsets into the image and
    /// a 2340-byte destination buffer; it must not re-enter the
    /// emulator. With a callback present GetID reports a licensed
    /// disc.
    pub fn set_disc(&mut self, reader: Option<SectorReadFn>) {
        self.cdrom.borrow_mut().set_reader(reader);
    }

    /// Queue a PS-X EXE for side-loading
    ///
    /// The image is applied when the BIOS shell reaches 0x80030000:
    /// RAM is overwritten at the address in header word 0x10 with the
    /// bytes from offset 0x800, and the CPU jumps to the entry in
    /// header word 0x18.
    pub fn sideload_exe(&mut self, exe: Vec<u8>) -> Result<()> {
        if exe.len() < 0x800 {
            return Err(EmulatorError::InvalidExecutable(
                "file shorter than the 2KB header".into(),
            ));
        }
        if &exe[..Self::EXE_MAGIC.len()] != Self::EXE_MAGIC {
            return Err(EmulatorError::InvalidExecutable("bad PS-X EXE magic".into()));
        }
        self.pending_exe = Some(exe);
        Ok(())
    }

    /// Apply a queued EXE once the shell is reached
    fn apply_pending_exe(&mut self) -> Result<()> {
        if self.pending_exe.is_none() || self.cpu.pc() != Self::SHELL_ENTRY_PC {
            return Ok(());
        }
        let exe = self.pending_exe.take().unwrap();

        let destination = u32::from_le_bytes(exe[0x10..0x14].try_into().unwrap());
        let entry = u32::from_le_bytes(exe[0x18..0x1C].try_into().unwrap());

        self.bus.write_ram_slice(destination, &exe[0x800..])?;
        self.cpu.set_pc(entry);

        log::info!(
            "Side-loaded EXE: {} bytes to 0x{:08X}, entry 0x{:08X}",
            exe.len() - 0x800,
            destination,
            entry
        );
        Ok(())
    }

    /// Capture BIOS TTY output
    ///
    /// A0h vector with function 0x3C and B0h vector with function 0x3D
    /// are std_out_putchar; the character sits in r4. A0h function
    /// 0x40 is the SystemError trampoline.
    fn capture_tty(&mut self) {
        let pc = self.cpu.pc() & 0x1FFF_FFFF;
        let function = self.cpu.reg(9);

        if pc == 0xA0 {
            match function {
                0x3C => self.push_tty_char(),
                0x40 => {
                    if !self.system_error {
                        log::error!("BIOS SystemError raised");
                        self.system_error = true;
                    }
                }
                _ => {}
            }
        } else if pc == 0xB0 && function == 0x3D {
            self.push_tty_char();
        }
    }

    fn push_tty_char(&mut self) {
        let ch = (self.cpu.reg(4) & 0xFF) as u8 as char;
        self.tty_output.push(ch);
        if ch == '\n' {
            let line: String = self
                .tty_output
                .lines()
                .last()
                .unwrap_or_default()
                .to_string();
            log::debug!("TTY: {}", line);
        }
    }

    /// Take everything the BIOS printed so far
    pub fn take_tty_output(&mut self) -> String {
        std::mem::take(&mut self.tty_output)
    }

    /// True once the BIOS signalled SystemError
    pub fn system_error(&self) -> bool {
        self.system_error
    }

    /// Make every guest exception fatal to the run loop
    pub fn set_break_on_exception(&mut self, enabled: bool) {
        self.break_on_exception = enabled;
    }

    /// Total cycles executed since reset
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The CPU, for inspection
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable CPU access (test setups, debuggers)
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// The bus, for inspection and direct memory access
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Mutable bus access
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Snapshot VRAM as raw little-endian A1B5G5R5 bytes
    ///
    /// The layout is the persisted-framebuffer contract: 1024 x 512
    /// cells, two bytes each.
    pub fn dump_vram(&self) -> Vec<u8> {
        let gpu = self.gpu.borrow();
        let mut bytes = Vec::with_capacity(Gpu::VRAM_SIZE * 2);
        for &cell in gpu.vram() {
            bytes.extend_from_slice(&cell.to_le_bytes());
        }
        bytes
    }

    /// Run a closure against the GPU (host presentation)
    pub fn with_gpu<R>(&self, f: impl FnOnce(&Gpu) -> R) -> R {
        f(&self.gpu.borrow())
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}
