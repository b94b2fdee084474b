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

//! CPU (LSI LR33300, a MIPS-I variant) interpreter
//!
//! Cycle-stepped fetch/decode/execute. Each call to [`Cpu::step`] runs
//! exactly one instruction (or takes one pending interrupt), honoring
//! branch delay slots and the standard exception entry sequence.
//!
//! # Delay slots
//!
//! A taken branch or jump writes its target into `next_pc`; the
//! instruction after the branch always executes before control arrives
//! at the target. The in-delay-slot condition is carried in a flag so
//! exception entry can back EPC up to the branch instruction.
//!
//! # Exceptions
//!
//! All exceptions vector to the fixed entry 0x80000080. Entry pushes the
//! SR mode/interrupt-enable stack left by two bits, latches the cause
//! code into CAUSE bits 2-6, and records the faulting address in BadA
//! for address errors. Exceptions are normal guest control flow, not
//! host errors; the caller can observe the cause of the most recent step
//! through the return value.

use crate::core::gte::Gte;
use crate::core::memory::Bus;

mod cop0;
mod decode;
mod instructions;
#[cfg(test)]
mod tests;

use cop0::Cop0;
pub use cop0::ExceptionCause;

/// CPU state
///
/// # Example
/// ```
/// use psemu::core::cpu::Cpu;
///
/// let cpu = Cpu::new();
/// assert_eq!(cpu.reg(0), 0); // r0 is hardwired to zero
/// assert_eq!(cpu.pc(), 0xBFC00000); // BIOS entry point
/// ```
pub struct Cpu {
    /// General purpose registers (r0-r31); r0 always reads as zero
    regs: [u32; 32],

    /// Address of the instruction currently being fetched
    pc: u32,

    /// Address of the next instruction (branch targets land here)
    next_pc: u32,

    /// Address of the instruction currently executing (EPC source)
    current_pc: u32,

    /// Multiply/divide result accumulators
    hi: u32,
    lo: u32,

    /// Coprocessor 0 (system control)
    cop0: Cop0,

    /// Coprocessor 2 (Geometry Transformation Engine)
    gte: Gte,

    /// True while the currently executing instruction sits in a branch
    /// delay slot
    in_branch_delay: bool,

    /// Set by a taken branch/jump; promoted to `in_branch_delay` at the
    /// start of the following step
    branch_taken: bool,

    /// Raw word of the instruction currently executing
    current_instruction: u32,

    /// Exception taken during the most recent step, if any
    last_exception: Option<ExceptionCause>,
}

impl Cpu {
    /// Reset vector (BIOS entry point)
    const RESET_VECTOR: u32 = 0xBFC0_0000;

    /// General exception vector
    const EXCEPTION_VECTOR: u32 = 0x8000_0080;

    /// Create a CPU in reset state
    pub fn new() -> Self {
        Self {
            regs: [0u32; 32],
            pc: Self::RESET_VECTOR,
            next_pc: Self::RESET_VECTOR.wrapping_add(4),
            current_pc: Self::RESET_VECTOR,
            hi: 0,
            lo: 0,
            cop0: Cop0::new(),
            gte: Gte::new(),
            in_branch_delay: false,
            branch_taken: false,
            current_instruction: 0,
            last_exception: None,
        }
    }

    /// Restore power-on state
    pub fn reset(&mut self) {
        self.regs = [0u32; 32];
        self.pc = Self::RESET_VECTOR;
        self.next_pc = Self::RESET_VECTOR.wrapping_add(4);
        self.current_pc = Self::RESET_VECTOR;
        self.hi = 0;
        self.lo = 0;
        self.cop0.reset();
        self.gte.reset();
        self.in_branch_delay = false;
        self.branch_taken = false;
        self.current_instruction = 0;
        self.last_exception = None;
    }

    /// Read a general purpose register; r0 always returns 0
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        if index == 0 {
            0
        } else {
            self.regs[index as usize]
        }
    }

    /// Write a general purpose register; writes to r0 are dropped
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
        }
    }

    /// Execute one instruction (or take one pending interrupt)
    ///
    /// Returns the exception cause if this step entered the exception
    /// vector, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psemu::core::cpu::Cpu;
    /// use psemu::core::memory::Bus;
    ///
    /// let mut cpu = Cpu::new();
    /// let mut bus = Bus::new();
    /// let exception = cpu.step(&mut bus);
    /// assert!(exception.is_none());
    /// ```
    pub fn step(&mut self, bus: &mut Bus) -> Option<ExceptionCause> {
        self.last_exception = None;

        // External interrupt: taken before the instruction at `pc` runs,
        // so EPC points at it (or at the branch if it is a delay slot).
        if self.interrupt_pending(bus) {
            self.current_pc = self.pc;
            self.in_branch_delay = self.branch_taken;
            self.branch_taken = false;
            self.enter_exception(ExceptionCause::Interrupt);
            return self.last_exception;
        }

        // The instruction fetched below executes now; it is a delay slot
        // exactly when the previous instruction took a branch.
        self.in_branch_delay = self.branch_taken;
        self.branch_taken = false;

        let pc = self.pc;
        self.current_pc = pc;

        if pc & 0x3 != 0 {
            self.address_exception(ExceptionCause::AddressErrorLoad, pc);
            return self.last_exception;
        }

        let instruction = bus.read32(pc);
        self.current_instruction = instruction;

        // Advance PC before execution so branches see the delay slot
        // address in `pc` and can overwrite `next_pc`.
        self.pc = self.next_pc;
        self.next_pc = self.next_pc.wrapping_add(4);

        self.execute_instruction(bus);
        self.last_exception
    }

    /// Dispatch on the 6-bit opcode
    fn execute_instruction(&mut self, bus: &mut Bus) {
        let instruction = self.current_instruction;
        let op = ((instruction >> 26) & 0x3F) as u8;

        match op {
            0x00 => self.execute_special(instruction),
            0x01 => self.execute_bcondz(instruction),
            0x02 => self.op_j(instruction),
            0x03 => self.op_jal(instruction),
            0x04 => self.op_beq(instruction),
            0x05 => self.op_bne(instruction),
            0x06 => self.op_blez(instruction),
            0x07 => self.op_bgtz(instruction),
            0x08 => self.op_addi(instruction),
            0x09 => self.op_addiu(instruction),
            0x0A => self.op_slti(instruction),
            0x0B => self.op_sltiu(instruction),
            0x0C => self.op_andi(instruction),
            0x0D => self.op_ori(instruction),
            0x0E => self.op_xori(instruction),
            0x0F => self.op_lui(instruction),
            0x10 => self.execute_cop0(instruction),
            0x12 => self.execute_cop2(instruction),
            0x20 => self.op_lb(bus, instruction),
            0x21 => self.op_lh(bus, instruction),
            0x22 => self.op_lwl(bus, instruction),
            0x23 => self.op_lw(bus, instruction),
            0x24 => self.op_lbu(bus, instruction),
            0x25 => self.op_lhu(bus, instruction),
            0x26 => self.op_lwr(bus, instruction),
            0x28 => self.op_sb(bus, instruction),
            0x29 => self.op_sh(bus, instruction),
            0x2A => self.op_swl(bus, instruction),
            0x2B => self.op_sw(bus, instruction),
            0x2E => self.op_swr(bus, instruction),
            0x32 => self.op_lwc2(bus, instruction),
            0x3A => self.op_swc2(bus, instruction),
            _ => {
                log::warn!(
                    "Reserved instruction 0x{:08X} (opcode 0x{:02X}) at PC=0x{:08X}",
                    instruction,
                    op,
                    self.current_pc
                );
                self.enter_exception(ExceptionCause::ReservedInstruction);
            }
        }
    }

    /// Dispatch the SPECIAL group (opcode 0x00) on the funct field
    fn execute_special(&mut self, instruction: u32) {
        let (rs, rt, rd, shamt, funct) = decode::decode_r_type(instruction);

        match funct {
            0x00 => self.op_sll(rt, rd, shamt),
            0x02 => self.op_srl(rt, rd, shamt),
            0x03 => self.op_sra(rt, rd, shamt),
            0x04 => self.op_sllv(rs, rt, rd),
            0x06 => self.op_srlv(rs, rt, rd),
            0x07 => self.op_srav(rs, rt, rd),
            0x08 => self.op_jr(rs),
            0x09 => self.op_jalr(rs, rd),
            0x0C => self.enter_exception(ExceptionCause::Syscall),
            0x0D => self.enter_exception(ExceptionCause::Breakpoint),
            0x10 => self.op_mfhi(rd),
            0x11 => self.op_mthi(rs),
            0x12 => self.op_mflo(rd),
            0x13 => self.op_mtlo(rs),
            0x18 => self.op_mult(rs, rt),
            0x19 => self.op_multu(rs, rt),
            0x1A => self.op_div(rs, rt),
            0x1B => self.op_divu(rs, rt),
            0x20 => self.op_add(rs, rt, rd),
            0x21 => self.op_addu(rs, rt, rd),
            0x22 => self.op_sub(rs, rt, rd),
            0x23 => self.op_subu(rs, rt, rd),
            0x24 => self.op_and(rs, rt, rd),
            0x25 => self.op_or(rs, rt, rd),
            0x26 => self.op_xor(rs, rt, rd),
            0x27 => self.op_nor(rs, rt, rd),
            0x2A => self.op_slt(rs, rt, rd),
            0x2B => self.op_sltu(rs, rt, rd),
            _ => {
                log::warn!(
                    "Reserved SPECIAL funct 0x{:02X} at PC=0x{:08X}",
                    funct,
                    self.current_pc
                );
                self.enter_exception(ExceptionCause::ReservedInstruction);
            }
        }
    }

    /// Record a taken branch: relative target into `next_pc`
    ///
    /// At execution time `pc` already holds the delay slot address, so
    /// the MIPS target rule `target = delay_slot + offset` falls out of
    /// a single add.
    pub(crate) fn branch(&mut self, offset: i32) {
        self.next_pc = self.pc.wrapping_add(offset as u32);
        self.branch_taken = true;
    }

    /// Record a taken jump: absolute target into `next_pc`
    pub(crate) fn jump(&mut self, target: u32) {
        self.next_pc = target;
        self.branch_taken = true;
    }

    /// Enter the exception vector
    ///
    /// EPC receives the faulting instruction address, backed up by 4
    /// when the fault hit a delay slot so the guest restarts from the
    /// branch. The SR mode/interrupt stack is pushed left two bits and
    /// the cause code latched into CAUSE.
    pub(crate) fn enter_exception(&mut self, cause: ExceptionCause) {
        let sr = self.cop0.regs[Cop0::SR];
        self.cop0.regs[Cop0::SR] = (sr & 0xFFFF_FFC0) | ((sr & 0xF) << 2);

        let cause_reg = self.cop0.regs[Cop0::CAUSE];
        self.cop0.regs[Cop0::CAUSE] = (cause_reg & !0x7C) | ((cause as u32) << 2);

        let epc = if self.in_branch_delay {
            self.cop0.regs[Cop0::CAUSE] |= 1 << 31;
            self.current_pc.wrapping_sub(4)
        } else {
            self.cop0.regs[Cop0::CAUSE] &= !(1 << 31);
            self.current_pc
        };
        self.cop0.regs[Cop0::EPC] = epc;

        log::debug!(
            "Exception {:?}: EPC=0x{:08X}, delay={}, instruction=0x{:08X}",
            cause,
            epc,
            self.in_branch_delay,
            self.current_instruction
        );

        self.pc = Self::EXCEPTION_VECTOR;
        self.next_pc = Self::EXCEPTION_VECTOR.wrapping_add(4);
        self.branch_taken = false;
        self.last_exception = Some(cause);
    }

    /// Enter an address error exception, latching the bad address
    pub(crate) fn address_exception(&mut self, cause: ExceptionCause, vaddr: u32) {
        self.cop0.regs[Cop0::BADA] = vaddr;
        self.enter_exception(cause);
    }

    /// External interrupt gate
    ///
    /// The interrupt controller's line is mirrored into CAUSE bit 10
    /// (hardware IRQ 2) every step; the interrupt is taken when CAUSE
    /// bit 10, the matching SR mask bit (bit 10) and the global IE bit
    /// (bit 0) are all set.
    fn interrupt_pending(&mut self, bus: &Bus) -> bool {
        let pending = bus.is_interrupt_pending();

        if pending {
            self.cop0.regs[Cop0::CAUSE] |= 1 << 10;
        } else {
            self.cop0.regs[Cop0::CAUSE] &= !(1 << 10);
        }

        let sr = self.cop0.regs[Cop0::SR];
        pending && (sr & 1) != 0 && (sr & (1 << 10)) != 0
    }

    /// Current program counter (next instruction to fetch)
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Raw word of the most recently executed instruction
    pub fn current_instruction(&self) -> u32 {
        self.current_instruction
    }

    /// Set PC and next PC (EXE side-loading, test setup)
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
        self.next_pc = pc.wrapping_add(4);
        self.branch_taken = false;
    }

    /// HI accumulator
    pub fn hi(&self) -> u32 {
        self.hi
    }

    /// LO accumulator
    pub fn lo(&self) -> u32 {
        self.lo
    }

    /// True if the instruction executed by the most recent step sat in
    /// a branch delay slot
    pub fn in_delay_slot(&self) -> bool {
        self.in_branch_delay
    }

    /// Read a COP0 register (SR, CAUSE, EPC, BadA, ...)
    pub fn cop0_reg(&self, index: usize) -> u32 {
        self.cop0.regs[index]
    }

    /// Write a COP0 register (test setup)
    pub fn set_cop0_reg(&mut self, index: usize, value: u32) {
        self.cop0.regs[index] = value;
    }

    /// The GTE coprocessor
    pub fn gte(&self) -> &Gte {
        &self.gte
    }

    /// Mutable GTE access
    pub fn gte_mut(&mut self) -> &mut Gte {
        &mut self.gte
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
