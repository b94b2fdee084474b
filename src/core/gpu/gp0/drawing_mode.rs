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

//! GP0 drawing state commands (0xE1-0xE6)

use super::super::registers::{DrawMode, TextureWindow};
use super::super::Gpu;

impl Gpu {
    /// GP0(0xE1): draw mode / texpage
    ///
    /// The texpage bits are mirrored into the low bits of GPUSTAT.
    pub(super) fn gp0_draw_mode(&mut self, word: u32) {
        self.draw_mode = DrawMode::from_attribute(word);
        self.gpustat = (self.gpustat & !0x7FF) | (word & 0x7FF);
        log::trace!(
            "Draw mode: page=({}, {}), depth={:?}",
            self.draw_mode.page_x,
            self.draw_mode.page_y,
            self.draw_mode.depth
        );
    }

    /// GP0(0xE2): texture window
    pub(super) fn gp0_texture_window(&mut self, word: u32) {
        self.texture_window = TextureWindow::from_word(word);
    }

    /// GP0(0xE3): drawing area top-left corner
    pub(super) fn gp0_drawing_area_top_left(&mut self, word: u32) {
        self.draw_area.left = (word & 0x3FF) as u16;
        self.draw_area.top = ((word >> 10) & 0x3FF) as u16;
        self.update_clip();
    }

    /// GP0(0xE4): drawing area bottom-right corner
    pub(super) fn gp0_drawing_area_bottom_right(&mut self, word: u32) {
        self.draw_area.right = (word & 0x3FF) as u16;
        self.draw_area.bottom = ((word >> 10) & 0x3FF) as u16;
        self.update_clip();
    }

    /// GP0(0xE5): drawing offset (11-bit signed pair)
    pub(super) fn gp0_drawing_offset(&mut self, word: u32) {
        let x = ((word & 0x7FF) as i16) << 5 >> 5;
        let y = (((word >> 11) & 0x7FF) as i16) << 5 >> 5;
        self.draw_offset = (x, y);
        log::trace!("Drawing offset: ({}, {})", x, y);
    }

    /// GP0(0xE6): mask bit settings (recorded; masking itself is not
    /// applied by this rasterizer)
    pub(super) fn gp0_mask_bits(&mut self, word: u32) {
        self.mask_bits = (word & 0x3) as u8;
        self.gpustat = (self.gpustat & !(0x3 << 11)) | ((word & 0x3) << 11);
    }
}
