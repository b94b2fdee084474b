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

//! Multiply/divide unit instructions
//!
//! Results land in the HI/LO accumulator pair. Division never traps:
//! division by zero and the i32::MIN / -1 case produce the boundary
//! results the hardware defines.

use super::super::Cpu;

impl Cpu {
    /// MULT: Multiply (signed)
    ///
    /// HI:LO = rs * rt as a 64-bit signed product.
    pub(crate) fn op_mult(&mut self, rs: u8, rt: u8) {
        let a = (self.reg(rs) as i32) as i64;
        let b = (self.reg(rt) as i32) as i64;
        let product = (a * b) as u64;
        self.hi = (product >> 32) as u32;
        self.lo = product as u32;
    }

    /// MULTU: Multiply Unsigned
    pub(crate) fn op_multu(&mut self, rs: u8, rt: u8) {
        let a = self.reg(rs) as u64;
        let b = self.reg(rt) as u64;
        let product = a * b;
        self.hi = (product >> 32) as u32;
        self.lo = product as u32;
    }

    /// DIV: Divide (signed)
    ///
    /// LO = quotient, HI = remainder. The two undefined-input cases take
    /// the values the R3000 produces: n/0 gives LO=-1 (or 1 for negative
    /// n) with HI=n, and i32::MIN / -1 gives LO=i32::MIN with HI=0.
    pub(crate) fn op_div(&mut self, rs: u8, rt: u8) {
        let n = self.reg(rs) as i32;
        let d = self.reg(rt) as i32;

        if d == 0 {
            self.hi = n as u32;
            self.lo = if n >= 0 { 0xFFFF_FFFF } else { 1 };
        } else if n == i32::MIN && d == -1 {
            self.hi = 0;
            self.lo = 0x8000_0000;
        } else {
            self.hi = (n % d) as u32;
            self.lo = (n / d) as u32;
        }
    }

    /// DIVU: Divide Unsigned
    ///
    /// Division by zero gives LO=0xFFFFFFFF with HI=n.
    pub(crate) fn op_divu(&mut self, rs: u8, rt: u8) {
        let n = self.reg(rs);
        let d = self.reg(rt);

        if d == 0 {
            self.hi = n;
            self.lo = 0xFFFF_FFFF;
        } else {
            self.hi = n % d;
            self.lo = n / d;
        }
    }

    /// MFHI: Move From HI
    pub(crate) fn op_mfhi(&mut self, rd: u8) {
        self.set_reg(rd, self.hi);
    }

    /// MTHI: Move To HI
    pub(crate) fn op_mthi(&mut self, rs: u8) {
        self.hi = self.reg(rs);
    }

    /// MFLO: Move From LO
    pub(crate) fn op_mflo(&mut self, rd: u8) {
        self.set_reg(rd, self.lo);
    }

    /// MTLO: Move To LO
    pub(crate) fn op_mtlo(&mut self, rs: u8) {
        self.lo = self.reg(rs);
    }
}
