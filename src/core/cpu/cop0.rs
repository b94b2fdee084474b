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

//! COP0 (System Control Coprocessor)
//!
//! Holds the 32 system control registers. Only SR, CAUSE, EPC and BADA
//! carry meaning in this core; the remaining slots read back whatever was
//! written, which is enough for the BIOS probes.

/// Exception causes with their architectural exception codes
///
/// The code lands in CAUSE bits 2-6 when the exception is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionCause {
    /// External interrupt (code 0)
    Interrupt = 0,
    /// Address error on load or instruction fetch (code 4)
    AddressErrorLoad = 4,
    /// Address error on store (code 5)
    AddressErrorStore = 5,
    /// SYSCALL instruction (code 8)
    Syscall = 8,
    /// BREAK instruction (code 9)
    Breakpoint = 9,
    /// Reserved instruction (code 10)
    ReservedInstruction = 10,
    /// Arithmetic overflow (code 12)
    Overflow = 12,
}

/// COP0 register file
pub(crate) struct Cop0 {
    /// Raw register slots, indexed by the MTC0/MFC0 `rd` field
    pub(crate) regs: [u32; 32],
}

impl Cop0 {
    /// Bad virtual address (set by address error exceptions)
    pub(crate) const BADA: usize = 8;

    /// Status register
    pub(crate) const SR: usize = 12;

    /// Exception cause register
    pub(crate) const CAUSE: usize = 13;

    /// Exception program counter
    pub(crate) const EPC: usize = 14;

    /// Processor ID
    pub(crate) const PRID: usize = 15;

    /// SR bit 16: isolate cache (data stores do not reach memory)
    pub(crate) const SR_ISOLATE_CACHE: u32 = 1 << 16;

    pub(crate) fn new() -> Self {
        let mut cop0 = Self { regs: [0; 32] };
        cop0.regs[Self::PRID] = 0x0000_0002;
        cop0
    }

    pub(crate) fn reset(&mut self) {
        self.regs = [0; 32];
        self.regs[Self::PRID] = 0x0000_0002;
    }

    /// True while SR.IsC isolates the data cache
    #[inline(always)]
    pub(crate) fn cache_isolated(&self) -> bool {
        self.regs[Self::SR] & Self::SR_ISOLATE_CACHE != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_codes() {
        assert_eq!(ExceptionCause::Interrupt as u32, 0);
        assert_eq!(ExceptionCause::AddressErrorLoad as u32, 4);
        assert_eq!(ExceptionCause::AddressErrorStore as u32, 5);
        assert_eq!(ExceptionCause::Syscall as u32, 8);
        assert_eq!(ExceptionCause::Breakpoint as u32, 9);
        assert_eq!(ExceptionCause::ReservedInstruction as u32, 10);
        assert_eq!(ExceptionCause::Overflow as u32, 12);
    }

    #[test]
    fn test_reset_preserves_prid() {
        let mut cop0 = Cop0::new();
        cop0.regs[Cop0::SR] = 0xDEAD_BEEF;
        cop0.reset();
        assert_eq!(cop0.regs[Cop0::SR], 0);
        assert_eq!(cop0.regs[Cop0::PRID], 0x0000_0002);
    }

    #[test]
    fn test_cache_isolation_flag() {
        let mut cop0 = Cop0::new();
        assert!(!cop0.cache_isolated());
        cop0.regs[Cop0::SR] |= Cop0::SR_ISOLATE_CACHE;
        assert!(cop0.cache_isolated());
    }
}
