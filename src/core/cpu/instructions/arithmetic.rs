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
use super::super::{Cpu, ExceptionCause};

impl Cpu {
    // === Arithmetic Instructions ===

    /// ADD: Add (with overflow exception)
    ///
    /// Adds two registers with signed overflow detection. On overflow the
    /// destination is left unmodified and an Overflow exception is taken.
    ///
    /// Format: add rd, rs, rt
    pub(crate) fn op_add(&mut self, rs: u8, rt: u8, rd: u8) {
        let a = self.reg(rs) as i32;
        let b = self.reg(rt) as i32;

        match a.checked_add(b) {
            Some(result) => self.set_reg(rd, result as u32),
            None => self.enter_exception(ExceptionCause::Overflow),
        }
    }

    /// ADDU: Add Unsigned (wraps, no exception)
    ///
    /// Format: addu rd, rs, rt
    pub(crate) fn op_addu(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs).wrapping_add(self.reg(rt));
        self.set_reg(rd, result);
    }

    /// SUB: Subtract (with overflow exception)
    ///
    /// Format: sub rd, rs, rt
    pub(crate) fn op_sub(&mut self, rs: u8, rt: u8, rd: u8) {
        let a = self.reg(rs) as i32;
        let b = self.reg(rt) as i32;

        match a.checked_sub(b) {
            Some(result) => self.set_reg(rd, result as u32),
            None => self.enter_exception(ExceptionCause::Overflow),
        }
    }

    /// SUBU: Subtract Unsigned (wraps, no exception)
    ///
    /// Format: subu rd, rs, rt
    pub(crate) fn op_subu(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs).wrapping_sub(self.reg(rt));
        self.set_reg(rd, result);
    }

    /// SLT: Set on Less Than (signed compare)
    ///
    /// Format: slt rd, rs, rt
    pub(crate) fn op_slt(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = (self.reg(rs) as i32) < (self.reg(rt) as i32);
        self.set_reg(rd, result as u32);
    }

    /// SLTU: Set on Less Than Unsigned
    ///
    /// Format: sltu rd, rs, rt
    pub(crate) fn op_sltu(&mut self, rs: u8, rt: u8, rd: u8) {
        let result = self.reg(rs) < self.reg(rt);
        self.set_reg(rd, result as u32);
    }

    /// ADDI: Add Immediate (sign-extended, with overflow exception)
    ///
    /// On overflow `rt` is not written and an Overflow exception is taken.
    ///
    /// Format: addi rt, rs, imm
    pub(crate) fn op_addi(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let imm = (imm as i16) as i32;
        let a = self.reg(rs) as i32;

        match a.checked_add(imm) {
            Some(result) => self.set_reg(rt, result as u32),
            None => self.enter_exception(ExceptionCause::Overflow),
        }
    }

    /// ADDIU: Add Immediate Unsigned (sign-extended, wraps)
    ///
    /// Despite the name the immediate is sign-extended; "unsigned" only
    /// means no overflow trap.
    ///
    /// Format: addiu rt, rs, imm
    pub(crate) fn op_addiu(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let imm = (imm as i16) as u32;
        let result = self.reg(rs).wrapping_add(imm);
        self.set_reg(rt, result);
    }

    /// SLTI: Set on Less Than Immediate (signed, sign-extended)
    ///
    /// Format: slti rt, rs, imm
    pub(crate) fn op_slti(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let imm = (imm as i16) as i32;
        let result = (self.reg(rs) as i32) < imm;
        self.set_reg(rt, result as u32);
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended, then the compare is unsigned.
    ///
    /// Format: sltiu rt, rs, imm
    pub(crate) fn op_sltiu(&mut self, instruction: u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let imm = (imm as i16) as u32;
        let result = self.reg(rs) < imm;
        self.set_reg(rt, result as u32);
    }
}
