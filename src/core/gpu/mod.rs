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

//! GPU: VRAM, GP0/GP1 command ports, software rasterizer
//!
//! VRAM is a 1024x512 array of 16-bit cells in A1B5G5R5 format; all
//! coordinates wrap into it. The GP0 port is a four-state machine
//! (awaiting command, receiving parameters, receiving data for a
//! CPU->VRAM copy, transferring data for a VRAM->CPU copy) feeding the
//! rasterizer; GP1 carries control writes.
//!
//! GPUSTAT keeps the true status bits (GP1(0x00) establishes
//! 0x14802000); the bus-visible read decorates them with the three
//! ready flags, since a synchronous core is always ready.

mod gp0;
mod gp1;
mod primitives;
mod registers;
mod render;
#[cfg(test)]
mod tests;

pub use primitives::{Color, TextureDepth, TextureInfo, Vertex};
pub use registers::{
    ClutAttribute, DrawMode, DrawingArea, Gp0State, TextureWindow,
};
pub use render::Rasterizer;

use crate::core::fifo::Fifo;
use registers::{PendingCommand, VramTransfer};

/// Software GPU state
///
/// # Examples
///
/// ```
/// use psemu::core::gpu::Gpu;
///
/// let mut gpu = Gpu::new();
/// gpu.write_vram(100, 100, 0x7FFF);
/// assert_eq!(gpu.read_vram(100, 100), 0x7FFF);
/// ```
pub struct Gpu {
    /// VRAM: 1024x512 16-bit cells, row-major
    pub(crate) vram: Vec<u16>,

    /// Triangle/rectangle rasterizer (carries the clip rectangle)
    pub(crate) rasterizer: Rasterizer,

    /// GP0 port state
    pub(crate) port_state: Gp0State,

    /// Parameter FIFO (16 words, like the hardware queue)
    pub(crate) params: Fifo<u32, 16>,

    /// Words still expected before the buffered command can run
    pub(crate) remaining_words: u32,

    /// Completion handler for the buffered command
    pub(crate) pending: PendingCommand,

    /// Draw mode / texpage shadow
    pub(crate) draw_mode: DrawMode,

    /// CLUT attribute shadow
    pub(crate) clut: ClutAttribute,

    /// Drawing area (inclusive clip rectangle)
    pub(crate) draw_area: DrawingArea,

    /// Drawing offset applied to every vertex
    pub(crate) draw_offset: (i16, i16),

    /// Texture window
    pub(crate) texture_window: TextureWindow,

    /// Mask bit settings (GP0 0xE6, recorded)
    pub(crate) mask_bits: u8,

    /// Active CPU<->VRAM transfer rectangle
    pub(crate) transfer: Option<VramTransfer>,

    /// GPUREAD response latch
    pub(crate) gpuread: u32,

    /// True GPUSTAT bits
    pub(crate) gpustat: u32,

    /// Most recent word received on GP0
    pub(crate) last_word: u32,

    // Display control state, recorded by GP1 0x05-0x08
    pub(crate) display_area_start: u32,
    pub(crate) display_range_h: u32,
    pub(crate) display_range_v: u32,
    pub(crate) display_mode: u32,
}

impl Gpu {
    /// VRAM width in 16-bit cells
    pub const VRAM_WIDTH: usize = 1024;

    /// VRAM height in lines
    pub const VRAM_HEIGHT: usize = 512;

    /// Total VRAM cells
    pub const VRAM_SIZE: usize = Self::VRAM_WIDTH * Self::VRAM_HEIGHT;

    /// Create a GPU with cleared VRAM and reset drawing state
    pub fn new() -> Self {
        let mut gpu = Self {
            vram: vec![0u16; Self::VRAM_SIZE],
            rasterizer: Rasterizer::new(),
            port_state: Gp0State::AwaitingCommand,
            params: Fifo::new(),
            remaining_words: 0,
            pending: PendingCommand::None,
            draw_mode: DrawMode::default(),
            clut: ClutAttribute::default(),
            draw_area: DrawingArea::default(),
            draw_offset: (0, 0),
            texture_window: TextureWindow::default(),
            mask_bits: 0,
            transfer: None,
            gpuread: 0,
            gpustat: Self::GPUSTAT_RESET,
            last_word: 0,
            display_area_start: 0,
            display_range_h: 0,
            display_range_v: 0,
            display_mode: 0,
        };
        gpu.update_clip();
        gpu
    }

    /// Full hardware reset: drawing state and VRAM
    pub fn reset(&mut self) {
        self.reset_state();
        self.vram.fill(0);
    }

    /// GP1(0x00) reset: restore state defaults, preserve VRAM
    pub(crate) fn reset_state(&mut self) {
        self.port_state = Gp0State::AwaitingCommand;
        self.params.clear();
        self.remaining_words = 0;
        self.pending = PendingCommand::None;
        self.draw_mode = DrawMode::default();
        self.clut = ClutAttribute::default();
        self.draw_area = DrawingArea::default();
        self.draw_offset = (0, 0);
        self.texture_window = TextureWindow::default();
        self.mask_bits = 0;
        self.transfer = None;
        self.gpuread = 0;
        self.gpustat = Self::GPUSTAT_RESET;
        self.last_word = 0;
        self.display_area_start = 0;
        self.display_range_h = 0;
        self.display_range_v = 0;
        self.display_mode = 0;
        self.update_clip();
    }

    /// Read a VRAM cell; coordinates wrap into 1024x512
    #[inline(always)]
    pub fn read_vram(&self, x: u16, y: u16) -> u16 {
        self.vram[Self::vram_index(x, y)]
    }

    /// Write a VRAM cell; coordinates wrap into 1024x512
    #[inline(always)]
    pub fn write_vram(&mut self, x: u16, y: u16, value: u16) {
        let index = Self::vram_index(x, y);
        self.vram[index] = value;
    }

    #[inline(always)]
    fn vram_index(x: u16, y: u16) -> usize {
        ((y & 0x1FF) as usize) * Self::VRAM_WIDTH + ((x & 0x3FF) as usize)
    }

    /// The whole framebuffer, for host presentation and persistence
    pub fn vram(&self) -> &[u16] {
        &self.vram
    }

    /// Bus-visible GPUSTAT: true bits decorated with the ready flags
    /// (26: ready for command, 27: ready to send VRAM, 28: ready for
    /// DMA block)
    pub fn read_status(&self) -> u32 {
        self.gpustat | (1 << 26) | (1 << 27) | (1 << 28)
    }

    /// Bus-visible GPUREAD
    ///
    /// During a VRAM->CPU transfer every read latches the next two
    /// pixels; otherwise the last latched response is returned.
    pub fn read_gpuread(&mut self) -> u32 {
        if self.port_state == Gp0State::TransferringData {
            self.transfer_next_gpuread();
        }
        self.gpuread
    }

    /// Push the drawing area into the rasterizer clip
    pub(crate) fn update_clip(&mut self) {
        self.rasterizer.set_clip(&self.draw_area);
    }

    /// Most recent word received on GP0
    pub fn last_word(&self) -> u32 {
        self.last_word
    }

    /// Mask bit settings recorded from GP0(0xE6)
    pub fn mask_bits(&self) -> u8 {
        self.mask_bits
    }

    /// Display control state recorded from GP1 0x05-0x08
    /// (area start, horizontal range, vertical range, mode)
    pub fn display_state(&self) -> (u32, u32, u32, u32) {
        (
            self.display_area_start,
            self.display_range_h,
            self.display_range_v,
            self.display_mode,
        )
    }
}

impl Default for Gpu {
    fn default() -> Self {
        Self::new()
    }
}
