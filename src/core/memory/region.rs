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

//! Physical address region classification
//!
//! Address translation is a fixed top-bit mask (`vaddr & 0x1FFFFFFF`);
//! the resulting 29-bit physical address selects a region by range.

/// Physical memory regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Main RAM, 2MB, mirrored through the low 8MB
    Ram,
    /// Scratchpad, 1KB fast RAM
    Scratchpad,
    /// Memory-mapped I/O registers
    Io,
    /// BIOS ROM, 512KB, read-only
    Bios,
    /// Cache control register (no-op in this core)
    CacheControl,
    /// Nothing decodes here: loads read 0, stores drop
    Unmapped,
}

impl MemoryRegion {
    /// Classify a 29-bit physical address
    #[inline(always)]
    pub fn classify(paddr: u32) -> Self {
        match paddr {
            0x0000_0000..=0x007F_FFFF => MemoryRegion::Ram,
            0x1F80_0000..=0x1F80_03FF => MemoryRegion::Scratchpad,
            0x1F80_1000..=0x1F80_1FFF => MemoryRegion::Io,
            0x1FC0_0000..=0x1FC7_FFFF => MemoryRegion::Bios,
            0x1FFE_0130 => MemoryRegion::CacheControl,
            _ => MemoryRegion::Unmapped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ram_mirrors() {
        assert_eq!(MemoryRegion::classify(0x0000_0000), MemoryRegion::Ram);
        assert_eq!(MemoryRegion::classify(0x001F_FFFF), MemoryRegion::Ram);
        // The 2MB array mirrors through the 8MB window
        assert_eq!(MemoryRegion::classify(0x007F_FFFF), MemoryRegion::Ram);
        assert_eq!(MemoryRegion::classify(0x0080_0000), MemoryRegion::Unmapped);
    }

    #[test]
    fn test_io_window() {
        assert_eq!(MemoryRegion::classify(0x1F80_1000), MemoryRegion::Io);
        assert_eq!(MemoryRegion::classify(0x1F80_1814), MemoryRegion::Io);
        assert_eq!(MemoryRegion::classify(0x1F80_1FFF), MemoryRegion::Io);
        assert_eq!(MemoryRegion::classify(0x1F80_2000), MemoryRegion::Unmapped);
    }

    #[test]
    fn test_scratchpad_and_bios() {
        assert_eq!(MemoryRegion::classify(0x1F80_0000), MemoryRegion::Scratchpad);
        assert_eq!(MemoryRegion::classify(0x1F80_03FF), MemoryRegion::Scratchpad);
        assert_eq!(MemoryRegion::classify(0x1FC0_0000), MemoryRegion::Bios);
        assert_eq!(MemoryRegion::classify(0x1FC7_FFFF), MemoryRegion::Bios);
    }

    #[test]
    fn test_cache_control() {
        // 0xFFFE0130 masks down to 0x1FFE0130
        assert_eq!(
            MemoryRegion::classify(0xFFFE_0130 & 0x1FFF_FFFF),
            MemoryRegion::CacheControl
        );
    }
}
