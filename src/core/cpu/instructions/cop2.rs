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

//! Coprocessor 2 (GTE) instructions
//!
//! MFC2/MTC2 move data registers, CFC2/CTC2 move control registers, and
//! LWC2/SWC2 load/store data registers through the bus. Encodings with
//! bit 25 set dispatch into the GTE arithmetic pipeline; a function the
//! GTE does not recognize raises Reserved Instruction.

use super::super::decode::decode_i_type;
use super::super::{Cpu, ExceptionCause};
use crate::core::memory::Bus;

impl Cpu {
    /// Dispatch a COP2 instruction (opcode 0x12)
    pub(crate) fn execute_cop2(&mut self, instruction: u32) {
        if instruction & (1 << 25) != 0 {
            // GTE arithmetic operation
            if !self.gte.execute(instruction & 0x01FF_FFFF) {
                log::warn!("Unknown GTE function 0x{:08X}", instruction);
                self.enter_exception(ExceptionCause::ReservedInstruction);
            }
            return;
        }

        let rs = ((instruction >> 21) & 0x1F) as u8;
        let rt = ((instruction >> 16) & 0x1F) as u8;
        let rd = ((instruction >> 11) & 0x1F) as usize;

        match rs {
            // MFC2: rt <- GTE data register
            0x00 => {
                let value = self.gte.read_data(rd) as u32;
                self.set_reg(rt, value);
            }
            // CFC2: rt <- GTE control register
            0x02 => {
                let value = self.gte.read_control(rd) as u32;
                self.set_reg(rt, value);
            }
            // MTC2: GTE data register <- rt
            0x04 => {
                self.gte.write_data(rd, self.reg(rt) as i32);
            }
            // CTC2: GTE control register <- rt
            0x06 => {
                self.gte.write_control(rd, self.reg(rt) as i32);
            }
            _ => {
                log::warn!("Unknown COP2 operation 0x{:08X}", instruction);
                self.enter_exception(ExceptionCause::ReservedInstruction);
            }
        }
    }

    /// LWC2: Load Word to Coprocessor 2
    ///
    /// Loads a word from memory into a GTE data register.
    pub(crate) fn op_lwc2(&mut self, bus: &mut Bus, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let addr = self.reg(rs).wrapping_add((imm as i16) as u32);
        if addr & 0x3 != 0 {
            self.address_exception(ExceptionCause::AddressErrorLoad, addr);
            return;
        }
        let value = bus.read32(addr);
        self.gte.write_data(rt as usize, value as i32);
    }

    /// SWC2: Store Word from Coprocessor 2
    ///
    /// Stores a GTE data register to memory.
    pub(crate) fn op_swc2(&mut self, bus: &mut Bus, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let addr = self.reg(rs).wrapping_add((imm as i16) as u32);
        if addr & 0x3 != 0 {
            self.address_exception(ExceptionCause::AddressErrorStore, addr);
            return;
        }
        let value = self.gte.read_data(rt as usize) as u32;
        bus.write32(addr, value);
    }
}
