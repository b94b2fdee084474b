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

//! GP0 command decode
//!
//! The first word of a command selects the handler and the number of
//! parameter words that follow. Drawing state writes (0xE1-0xE6)
//! execute immediately; everything else buffers its parameters in the
//! 16-entry FIFO and runs when the last word arrives.
//!
//! Polygon (0x20-0x3F) and rectangle (0x60-0x7F) commands are decoded
//! generically from their option bits, which covers the whole command
//! groups rather than an enumerated subset:
//!
//! - polygons: bit 2 textured, bit 3 quad, bit 4 gouraud;
//!   parameter count = vertices * (1 + textured) + (gouraud ? vertices-1 : 0)
//! - rectangles: bit 2 textured, bits 3-4 size class;
//!   parameter count = 1 (xy) + textured + (variable size ? 1 : 0)

mod drawing_mode;
mod polygon;
mod rectangle;
mod transfer;

use super::registers::{
    Gp0State, PendingCommand, PolygonFlags, RectSize, RectangleFlags,
};
use super::Gpu;

impl Gpu {
    /// Feed one word into the GP0 port
    pub fn write_gp0(&mut self, word: u32) {
        self.last_word = word;

        match self.port_state {
            Gp0State::AwaitingCommand => self.decode_command(word),
            Gp0State::ReceivingParameters => {
                self.params.push(word);
                self.remaining_words -= 1;
                if self.remaining_words == 0 {
                    self.run_command();
                }
            }
            Gp0State::ReceivingData => self.process_vram_write(word),
            Gp0State::TransferringData => {
                log::warn!("GP0 write 0x{:08X} during VRAM->CPU transfer ignored", word);
            }
        }
    }

    /// Decode a fresh command word
    fn decode_command(&mut self, word: u32) {
        let command = (word >> 24) as u8;

        match command {
            // NOP and cache clear have no observable effect here
            0x00 => {}
            0x01 => log::trace!("GP0 clear cache"),

            // Fill rectangle: colour, then xy and wh parameters
            0x02 => self.begin_command(word, PendingCommand::FillRectangle, 2),

            // Polygon group
            0x20..=0x3F => {
                let flags = PolygonFlags {
                    textured: command & 0x04 != 0,
                    quad: command & 0x08 != 0,
                    gouraud: command & 0x10 != 0,
                };
                let vertices: u32 = if flags.quad { 4 } else { 3 };
                let mut count = vertices * (1 + flags.textured as u32);
                if flags.gouraud {
                    count += vertices - 1;
                }
                self.begin_command(word, PendingCommand::Polygon(flags), count);
            }

            // Rectangle group
            0x60..=0x7F => {
                let flags = RectangleFlags {
                    textured: command & 0x04 != 0,
                    size: match (command >> 3) & 0x3 {
                        0 => RectSize::Variable,
                        1 => RectSize::One,
                        2 => RectSize::Eight,
                        _ => RectSize::Sixteen,
                    },
                };
                let mut count = 1 + flags.textured as u32;
                if flags.size == RectSize::Variable {
                    count += 1;
                }
                self.begin_command(word, PendingCommand::Rectangle(flags), count);
            }

            // VRAM transfers
            0xA0..=0xBF => self.begin_command(word, PendingCommand::CopyCpuToVram, 2),
            0xC0..=0xDF => self.begin_command(word, PendingCommand::CopyVramToCpu, 2),

            // Immediate drawing state writes
            0xE1 => self.gp0_draw_mode(word),
            0xE2 => self.gp0_texture_window(word),
            0xE3 => self.gp0_drawing_area_top_left(word),
            0xE4 => self.gp0_drawing_area_bottom_right(word),
            0xE5 => self.gp0_drawing_offset(word),
            0xE6 => self.gp0_mask_bits(word),

            _ => log::warn!("Unhandled GP0 command 0x{:02X} (word 0x{:08X})", command, word),
        }
    }

    /// Start buffering a multi-word command
    ///
    /// The low 24 bits of the command word (colour, or modulation
    /// colour for textured primitives) enter the parameter FIFO first.
    fn begin_command(&mut self, word: u32, pending: PendingCommand, parameter_count: u32) {
        self.params.clear();
        self.params.push(word & 0x00FF_FFFF);
        self.pending = pending;
        self.remaining_words = parameter_count;
        self.port_state = Gp0State::ReceivingParameters;
    }

    /// Run the buffered command once its last parameter arrived
    fn run_command(&mut self) {
        match self.pending {
            PendingCommand::Polygon(flags) => self.finish_polygon(flags),
            PendingCommand::Rectangle(flags) => self.finish_rectangle(flags),
            PendingCommand::FillRectangle => self.finish_fill_rectangle(),
            PendingCommand::CopyCpuToVram => self.begin_cpu_to_vram(),
            PendingCommand::CopyVramToCpu => self.begin_vram_to_cpu(),
            PendingCommand::None => {
                log::warn!("GP0 parameter FIFO completed with no pending command");
                self.end_command();
            }
        }
    }

    /// Return the port to its idle state
    pub(super) fn end_command(&mut self) {
        self.params.clear();
        self.pending = PendingCommand::None;
        self.remaining_words = 0;
        self.port_state = Gp0State::AwaitingCommand;
    }
}
