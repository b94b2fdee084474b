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
    // === Logical Instructions ===

    /// AND: Bitwise AND
    ///
    /// Format: and rd, rs, rt
    pub(crate) fn op_and(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs) & self.reg(rt);
        self.set_reg(rd, result);
    }

    /// OR: Bitwise OR
    ///
    /// Format: or rd, rs, rt
    pub(crate) fn op_or(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs) | self.reg(rt);
        self.set_reg(rd, result);
    }

    /// XOR: Bitwise Exclusive OR
    ///
    /// Format: xor rd, rs, rt
    pub(crate) fn op_xor(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs) ^ self.reg(rt);
        self.set_reg(rd, result);
    }

    /// NOR: Bitwise NOR
    ///
    /// Format: nor rd, rs, rt
    pub(crate) fn op_nor(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = !(self.reg(rs) | self.reg(rt));
        self.set_reg(rd, result);
    }

    /// ANDI: AND Immediate (zero-extended)
    ///
    /// Format: andi rt, rs, imm
    pub(crate) fn op_andi(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) & (imm as u32);
        self.set_reg(rt, result);
    }

    /// ORI: OR Immediate (zero-extended)
    ///
    /// Format: ori rt, rs, imm
    pub(crate) fn op_ori(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) | (imm as u32);
        self.set_reg(rt, result);
    }

    /// XORI: XOR Immediate (zero-extended)
    ///
    /// Format: xori rt, rs, imm
    pub(crate) fn op_xori(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let result = self.reg(rs) ^ (imm as u32);
        self.set_reg(rt, result);
    }

    /// LUI: Load Upper Immediate
    ///
    /// Places the immediate in the upper halfword of `rt`; the lower
    /// halfword is zeroed.
    ///
    /// Format: lui rt, imm
    pub(crate) fn op_lui(&mut self, instruction: u32) {
        let (_, _, rt, imm) = decode_i_type(instruction);
        self.set_reg(rt, (imm as u32) << 16);
    }
}
