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

//! Load and store instructions
//!
//! Alignment faults raise AdEL/AdES with the offending address latched
//! into COP0 BadA before the bus is consulted. LWL/LWR and SWL/SWR use
//! the two low address bits to select byte lanes; the merge tables are
//! the little-endian R3000 ones.

use super::super::decode::decode_i_type;
use super::super::{Cpu, ExceptionCause};
use crate::core::memory::Bus;

impl Cpu {
    /// Compute the effective address for a load/store
    #[inline(always)]
    fn effective_address(&self, instruction: u32) -> (u8, u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let addr = self.reg(rs).wrapping_add((imm as i16) as u32);
        (rt, addr)
    }

    // === Loads ===

    /// LB: Load Byte (sign-extended)
    pub(crate) fn op_lb(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        let value = bus.read8(addr) as i8 as u32;
        self.set_reg(rt, value);
    }

    /// LBU: Load Byte Unsigned
    pub(crate) fn op_lbu(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        let value = bus.read8(addr) as u32;
        self.set_reg(rt, value);
    }

    /// LH: Load Halfword (sign-extended)
    ///
    /// Address bit 0 must be clear, else AdEL.
    pub(crate) fn op_lh(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        if addr & 0x1 != 0 {
            self.address_exception(ExceptionCause::AddressErrorLoad, addr);
            return;
        }
        let value = bus.read16(addr) as i16 as u32;
        self.set_reg(rt, value);
    }

    /// LHU: Load Halfword Unsigned
    pub(crate) fn op_lhu(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        if addr & 0x1 != 0 {
            self.address_exception(ExceptionCause::AddressErrorLoad, addr);
            return;
        }
        let value = bus.read16(addr) as u32;
        self.set_reg(rt, value);
    }

    /// LW: Load Word
    ///
    /// The two low address bits must be clear, else AdEL.
    pub(crate) fn op_lw(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        if addr & 0x3 != 0 {
            self.address_exception(ExceptionCause::AddressErrorLoad, addr);
            return;
        }
        let value = bus.read32(addr);
        self.set_reg(rt, value);
    }

    /// LWL: Load Word Left
    ///
    /// Merges the upper part of an unaligned word into `rt`. Lane
    /// selection by `addr & 3`: keep low 24/16/8/0 bits of `rt`, insert
    /// the aligned word shifted left by 24/16/8/0.
    pub(crate) fn op_lwl(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        let word = bus.read32(addr & !0x3);
        let cur = self.reg(rt);

        let value = match addr & 0x3 {
            0 => (cur & 0x00FF_FFFF) | (word << 24),
            1 => (cur & 0x0000_FFFF) | (word << 16),
            2 => (cur & 0x0000_00FF) | (word << 8),
            _ => word,
        };
        self.set_reg(rt, value);
    }

    /// LWR: Load Word Right
    ///
    /// Merges the lower part of an unaligned word into `rt`. Lane
    /// selection by `addr & 3`: insert the aligned word shifted right by
    /// 0/8/16/24 while preserving the high 0/8/16/24 bits of `rt`.
    pub(crate) fn op_lwr(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        let word = bus.read32(addr & !0x3);
        let cur = self.reg(rt);

        let value = match addr & 0x3 {
            0 => word,
            1 => (cur & 0xFF00_0000) | (word >> 8),
            2 => (cur & 0xFFFF_0000) | (word >> 16),
            _ => (cur & 0xFFFF_FF00) | (word >> 24),
        };
        self.set_reg(rt, value);
    }

    // === Stores ===

    /// SB: Store Byte
    pub(crate) fn op_sb(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        bus.write8(addr, self.reg(rt) as u8);
    }

    /// SH: Store Halfword
    ///
    /// Address bit 0 must be clear, else AdES.
    pub(crate) fn op_sh(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        if addr & 0x1 != 0 {
            self.address_exception(ExceptionCause::AddressErrorStore, addr);
            return;
        }
        bus.write16(addr, self.reg(rt) as u16);
    }

    /// SW: Store Word
    ///
    /// The two low address bits must be clear, else AdES. While SR.IsC
    /// isolates the cache the store does not reach memory (the BIOS
    /// relies on this during its RAM-clear sequence).
    pub(crate) fn op_sw(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        if addr & 0x3 != 0 {
            self.address_exception(ExceptionCause::AddressErrorStore, addr);
            return;
        }
        if self.cop0.cache_isolated() {
            log::trace!("SW to 0x{:08X} suppressed (cache isolated)", addr);
            return;
        }
        bus.write32(addr, self.reg(rt));
    }

    /// SWL: Store Word Left
    ///
    /// Mirror of LWL: stores the upper part of `rt` into an unaligned
    /// word, preserving the memory bytes outside the lane.
    pub(crate) fn op_swl(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        let aligned = addr & !0x3;
        let cur = bus.read32(aligned);
        let value = self.reg(rt);

        let merged = match addr & 0x3 {
            0 => (cur & 0xFFFF_FF00) | (value >> 24),
            1 => (cur & 0xFFFF_0000) | (value >> 16),
            2 => (cur & 0xFF00_0000) | (value >> 8),
            _ => value,
        };
        bus.write32(aligned, merged);
    }

    /// SWR: Store Word Right
    ///
    /// Mirror of LWR.
    pub(crate) fn op_swr(&mut self, bus: &mut Bus, instruction: u32) {
        let (rt, addr) = self.effective_address(instruction);
        let aligned = addr & !0x3;
        let cur = bus.read32(aligned);
        let value = self.reg(rt);

        let merged = match addr & 0x3 {
            0 => value,
            1 => (cur & 0x0000_00FF) | (value << 8),
            2 => (cur & 0x0000_FFFF) | (value << 16),
            _ => (cur & 0x00FF_FFFF) | (value << 24),
        };
        bus.write32(aligned, merged);
    }
}
