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

//! GP0 rectangle commands (0x60-0x7F) and fill (0x02)
//!
//! Rectangles draw with the raw command colour or raw texels anchored
//! at the first texcoord; there is no interpolation. Fill bypasses the
//! drawing area clip and wraps modulo the VRAM dimensions.

use super::super::primitives::{Color, Vertex};
use super::super::registers::{ClutAttribute, RectSize, RectangleFlags};
use super::super::Gpu;

impl Gpu {
    /// Complete a buffered rectangle command
    pub(super) fn finish_rectangle(&mut self, flags: RectangleFlags) {
        let first = self.params.pop().unwrap_or(0);
        let color = Color::from_command(first);

        let xy = self.params.pop().unwrap_or(0);
        let origin = Vertex::from_word(xy).offset(self.draw_offset);

        let mut uv = (0u8, 0u8);
        if flags.textured {
            let attribute = self.params.pop().unwrap_or(0);
            uv = (attribute as u8, (attribute >> 8) as u8);
            self.clut = ClutAttribute::from_attribute(attribute >> 16);
        }

        let (width, height) = match flags.size {
            RectSize::One => (1, 1),
            RectSize::Eight => (8, 8),
            RectSize::Sixteen => (16, 16),
            RectSize::Variable => {
                let size = self.params.pop().unwrap_or(0);
                (
                    (size & 0x3FF) as u16,
                    ((size >> 16) & 0x1FF) as u16,
                )
            }
        };

        if flags.textured {
            let info = self.texture_info();
            let window = self.texture_window;
            self.rasterizer.draw_textured_rectangle(
                &mut self.vram,
                origin,
                width,
                height,
                uv,
                &info,
                &window,
            );
        } else {
            self.rasterizer
                .draw_rectangle(&mut self.vram, origin, width, height, color);
        }

        self.end_command();
    }

    /// GP0(0x02): fill a VRAM rectangle with a solid colour
    ///
    /// Coordinates wrap modulo the VRAM dimensions and ignore the
    /// drawing area.
    pub(super) fn finish_fill_rectangle(&mut self) {
        let color = Color::from_command(self.params.pop().unwrap_or(0));
        let xy = self.params.pop().unwrap_or(0);
        let size = self.params.pop().unwrap_or(0);

        let x = (xy & 0xFFFF) as u16;
        let y = (xy >> 16) as u16;
        let width = (size & 0xFFFF) as u16;
        let height = (size >> 16) as u16;

        let rgb15 = color.to_rgb15();
        for dy in 0..height {
            for dx in 0..width {
                self.write_vram(x.wrapping_add(dx), y.wrapping_add(dy), rgb15);
            }
        }

        log::trace!(
            "Fill rectangle ({}, {}) {}x{} with 0x{:04X}",
            x,
            y,
            width,
            height,
            rgb15
        );
        self.end_command();
    }
}
