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

use super::super::decode::decode_j_type;
use super::super::{Cpu, ExceptionCause};

impl Cpu {
    // === Jump Instructions ===

    /// J: Jump
    ///
    /// Target: (target << 2) | (delay slot address & 0xF0000000)
    ///
    /// Format: j target
    pub(crate) fn op_j(&mut self, instruction: u32) {
        let (_, target) = decode_j_type(instruction);
        let dest = (target << 2) | (self.pc & 0xF000_0000);
        self.jump(dest);
    }

    /// JAL: Jump And Link
    ///
    /// Writes the return address (instruction address + 8) to r31.
    ///
    /// Format: jal target
    pub(crate) fn op_jal(&mut self, instruction: u32) {
        // next_pc currently holds instruction address + 8
        self.set_reg(31, self.next_pc);
        self.op_j(instruction);
    }

    /// JR: Jump Register
    ///
    /// Raises an address error if the target is not word-aligned.
    ///
    /// Format: jr rs
    pub(crate) fn op_jr(&mut self, rs: u8) {
        let dest = self.reg(rs);
        if dest & 0x3 != 0 {
            self.address_exception(ExceptionCause::AddressErrorLoad, dest);
            return;
        }
        self.jump(dest);
    }

    /// JALR: Jump And Link Register
    ///
    /// Writes the return address to `rd` (usually r31 but any register
    /// is legal). Raises an address error on a misaligned target.
    ///
    /// Format: jalr rd, rs
    pub(crate) fn op_jalr(&mut self, rs: u8, rd: u8) {
        let dest = self.reg(rs);
        self.set_reg(rd, self.next_pc);
        if dest & 0x3 != 0 {
            self.address_exception(ExceptionCause::AddressErrorLoad, dest);
            return;
        }
        self.jump(dest);
    }
}
