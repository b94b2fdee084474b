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

//! GP1 control port
//!
//! Display control commands (0x02-0x08) are recorded but have no
//! observable effect in a headless core; reset (0x00) and command
//! buffer reset (0x01) drive the GP0 state machine, and Get GPU Info
//! (0x10) answers drawing-state queries through GPUREAD.

use super::Gpu;

impl Gpu {
    /// GPUSTAT value established by GP1(0x00)
    pub const GPUSTAT_RESET: u32 = 0x1480_2000;

    /// Feed one word into the GP1 port
    pub fn write_gp1(&mut self, word: u32) {
        let command = (word >> 24) as u8;

        match command {
            // Reset GPU: restore drawing state and status, keep VRAM
            0x00 => self.reset_state(),

            // Reset command buffer
            0x01 => {
                self.end_command();
                self.transfer = None;
            }

            // Acknowledge GPU interrupt
            0x02 => self.gpustat &= !(1 << 24),

            // Display enable (bit 0: 1 = disabled)
            0x03 => {
                self.gpustat = (self.gpustat & !(1 << 23)) | ((word & 1) << 23);
            }

            // DMA direction
            0x04 => {
                self.gpustat = (self.gpustat & !(0x3 << 29)) | ((word & 0x3) << 29);
            }

            // Display area/range settings: recorded only
            0x05 => self.display_area_start = word & 0x7FFFF,
            0x06 => self.display_range_h = word & 0xFF_FFFF,
            0x07 => self.display_range_v = word & 0xF_FFFF,
            0x08 => self.display_mode = word & 0xFF,

            // Get GPU Info
            0x10 => self.gp1_get_info(word),

            _ => log::warn!("Unhandled GP1 command 0x{:02X} (word 0x{:08X})", command, word),
        }
    }

    /// GP1(0x10): Get GPU Info
    ///
    /// The sub-command in the low byte selects which piece of drawing
    /// state lands in GPUREAD. Sub 0x07 (GPU version on later board
    /// revisions) leaves GPUREAD unchanged.
    fn gp1_get_info(&mut self, word: u32) {
        match word & 0xFF {
            0x02 => self.gpuread = self.texture_window.to_word(),
            0x03 => {
                self.gpuread =
                    (self.draw_area.left as u32) | ((self.draw_area.top as u32) << 10);
            }
            0x04 => {
                self.gpuread =
                    (self.draw_area.right as u32) | ((self.draw_area.bottom as u32) << 10);
            }
            0x05 => {
                self.gpuread = ((self.draw_offset.0 as u32) & 0x7FF)
                    | (((self.draw_offset.1 as u32) & 0x7FF) << 11);
            }
            0x07 => {}
            sub => log::trace!("GP1 Get Info sub-command 0x{:02X} ignored", sub),
        }
    }
}
