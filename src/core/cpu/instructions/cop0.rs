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

//! Coprocessor 0 (System Control) instructions

use super::super::cop0::Cop0;
use super::super::{Cpu, ExceptionCause};

impl Cpu {
    /// Dispatch a COP0 instruction (opcode 0x10)
    ///
    /// MFC0/MTC0 are selected by the `rs` field; RFE by funct 0x10 with
    /// `rs` bit 4 set. Anything else is a Reserved Instruction.
    pub(crate) fn execute_cop0(&mut self, instruction: u32) {
        let rs = ((instruction >> 21) & 0x1F) as u8;

        match rs {
            0x00 => self.op_mfc0(instruction),
            0x04 => self.op_mtc0(instruction),
            0x10 => {
                if instruction & 0x3F == 0x10 {
                    self.op_rfe();
                } else {
                    log::warn!("Unknown COP0 operation 0x{:08X}", instruction);
                    self.enter_exception(ExceptionCause::ReservedInstruction);
                }
            }
            _ => {
                log::warn!("Unknown COP0 operation 0x{:08X}", instruction);
                self.enter_exception(ExceptionCause::ReservedInstruction);
            }
        }
    }

    /// MFC0: Move From Coprocessor 0
    ///
    /// Format: mfc0 rt, rd
    pub(crate) fn op_mfc0(&mut self, instruction: u32) {
        let rt = ((instruction >> 16) & 0x1F) as u8;
        let rd = ((instruction >> 11) & 0x1F) as usize;
        let value = self.cop0.regs[rd];
        self.set_reg(rt, value);
    }

    /// MTC0: Move To Coprocessor 0
    ///
    /// Format: mtc0 rt, rd
    pub(crate) fn op_mtc0(&mut self, instruction: u32) {
        let rt = ((instruction >> 16) & 0x1F) as u8;
        let rd = ((instruction >> 11) & 0x1F) as usize;
        let value = self.reg(rt);

        if rd == Cop0::CAUSE {
            // Only the software interrupt bits are writable
            let cause = self.cop0.regs[Cop0::CAUSE];
            self.cop0.regs[Cop0::CAUSE] = (cause & !0x300) | (value & 0x300);
        } else {
            self.cop0.regs[rd] = value;
        }
    }

    /// RFE: Restore From Exception
    ///
    /// Pops the three-entry mode/interrupt-enable stack: SR bits 0-3 are
    /// replaced by bits 2-5, bits 4-5 are preserved.
    pub(crate) fn op_rfe(&mut self) {
        let sr = self.cop0.regs[Cop0::SR];
        self.cop0.regs[Cop0::SR] = (sr & !0xF) | ((sr >> 2) & 0xF);
    }
}
