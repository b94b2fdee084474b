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

use super::super::Cpu;

impl Cpu {
    // === Shift Instructions ===

    /// SLL: Shift Left Logical
    ///
    /// Format: sll rd, rt, shamt
    pub(crate) fn op_sll(&mut self, rt: u8, rd: u8, shamt: u8) {
        let result = self.reg(rt) << shamt;
        self.set_reg(rd, result);
    }

    /// SRL: Shift Right Logical (zero fill)
    ///
    /// Format: srl rd, rt, shamt
    pub(crate) fn op_srl(&mut self, rt: u8, rd: u8, shamt: u8) {
        let result = self.reg(rt) >> shamt;
        self.set_reg(rd, result);
    }

    /// SRA: Shift Right Arithmetic (sign fill)
    ///
    /// Format: sra rd, rt, shamt
    pub(crate) fn op_sra(&mut self, rt: u8, rd: u8, shamt: u8) {
        let result = (self.reg(rt) as i32) >> shamt;
        self.set_reg(rd, result as u32);
    }

    /// SLLV: Shift Left Logical Variable
    ///
    /// The shift amount is the low 5 bits of `rs`.
    ///
    /// Format: sllv rd, rt, rs
    pub(crate) fn op_sllv(&mut self, rs: u8, rt: u8, rd: u8) {
        let shamt = self.reg(rs) & 0x1F;
        let result = self.reg(rt) << shamt;
        self.set_reg(rd, result);
    }

    /// SRLV: Shift Right Logical Variable
    ///
    /// Format: srlv rd, rt, rs
    pub(crate) fn op_srlv(&mut self, rs: u8, rt: u8, rd: u8) {
        let shamt = self.reg(rs) & 0x1F;
        let result = self.reg(rt) >> shamt;
        self.set_reg(rd, result);
    }

    /// SRAV: Shift Right Arithmetic Variable
    ///
    /// Format: srav rd, rt, rs
    pub(crate) fn op_srav(&mut self, rs: u8, rt: u8, rd: u8) {
        let shamt = self.reg(rs) & 0x1F;
        let result = (self.reg(rt) as i32) >> shamt;
        self.set_reg(rd, result as u32);
    }
}
