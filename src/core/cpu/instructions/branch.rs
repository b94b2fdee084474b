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

use super::super::decode::decode_i_type;
use super::super::Cpu;

impl Cpu {
    // === Branch Instructions ===

    /// Handle the BCOND group (opcode 0x01)
    ///
    /// The `rt` field selects the flavour:
    /// - bit 0: branch on `>= 0` (BGEZ) when set, `< 0` (BLTZ) when clear
    /// - `(rt & 0x1E) == 0x10`: linking variant (BLTZAL/BGEZAL), which
    ///   writes the return address to r31 whether or not the branch is
    ///   taken
    pub(crate) fn execute_bcondz(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let offset = ((imm as i16) as i32) << 2;

        let is_bgez = (rt & 0x01) != 0;
        let is_link = (rt & 0x1E) == 0x10;

        let ge_zero = (self.reg(rs) as i32) >= 0;
        let taken = if is_bgez { ge_zero } else { !ge_zero };

        if is_link {
            // Return address is written unconditionally
            self.set_reg(31, self.next_pc);
        }

        if taken {
            self.branch(offset);
        }
    }

    /// BEQ: Branch on Equal
    ///
    /// Target: (delay slot address) + (sign_extend(offset) << 2)
    ///
    /// Format: beq rs, rt, offset
    pub(crate) fn op_beq(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let offset = ((imm as i16) as i32) << 2;

        if self.reg(rs) == self.reg(rt) {
            self.branch(offset);
        }
    }

    /// BNE: Branch on Not Equal
    ///
    /// Format: bne rs, rt, offset
    pub(crate) fn op_bne(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let offset = ((imm as i16) as i32) << 2;

        if self.reg(rs) != self.reg(rt) {
            self.branch(offset);
        }
    }

    /// BLEZ: Branch on Less than or Equal to Zero (signed)
    ///
    /// Format: blez rs, offset
    pub(crate) fn op_blez(&mut self, instruction: u32) {
        let (_, rs, _, imm) = decode_i_type(instruction);
        let offset = ((imm as i16) as i32) << 2;

        if (self.reg(rs) as i32) <= 0 {
            self.branch(offset);
        }
    }

    /// BGTZ: Branch on Greater Than Zero (signed)
    ///
    /// Format: bgtz rs, offset
    pub(crate) fn op_bgtz(&mut self, instruction: u32) {
        let (_, rs, _, imm) = decode_i_type(instruction);
        let offset = ((imm as i16) as i32) << 2;

        if (self.reg(rs) as i32) > 0 {
            self.branch(offset);
        }
    }
}
