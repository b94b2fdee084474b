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

//! Texel sampling
//!
//! Texture pages live in VRAM itself. 4bpp packs four palette indices
//! per halfword, 8bpp packs two, 15bpp stores direct colour. Indexed
//! depths resolve through a CLUT row, also in VRAM. A sampled value of
//! 0x0000 means "fully transparent" and is skipped by the callers.

use super::super::primitives::{TextureDepth, TextureInfo};
use super::super::registers::TextureWindow;
use super::Rasterizer;

impl Rasterizer {
    /// Read a VRAM cell with hardware coordinate wrap
    #[inline(always)]
    fn read_cell(vram: &[u16], x: u16, y: u16) -> u16 {
        vram[((y & 0x1FF) as usize) * 1024 + ((x & 0x3FF) as usize)]
    }

    /// Sample a raw texel at texture coordinates (u, v)
    ///
    /// The texture window is applied first, then the depth decides how
    /// the halfword at the page is unpacked.
    pub(crate) fn sample_texel(
        &self,
        vram: &[u16],
        u: u8,
        v: u8,
        info: &TextureInfo,
        window: &TextureWindow,
    ) -> u16 {
        let (u, v) = window.apply(u, v);

        match info.depth {
            TextureDepth::T4Bit => {
                // Four texels per halfword
                let cell = Self::read_cell(
                    vram,
                    info.base_x + (u as u16) / 4,
                    info.base_y + v as u16,
                );
                let index = (cell >> ((u % 4) * 4)) & 0xF;
                Self::read_cell(vram, info.clut_x + index, info.clut_y)
            }
            TextureDepth::T8Bit => {
                // Two texels per halfword
                let cell = Self::read_cell(
                    vram,
                    info.base_x + (u as u16) / 2,
                    info.base_y + v as u16,
                );
                let index = (cell >> ((u % 2) * 8)) & 0xFF;
                Self::read_cell(vram, info.clut_x + index, info.clut_y)
            }
            TextureDepth::T15Bit => {
                Self::read_cell(vram, info.base_x + u as u16, info.base_y + v as u16)
            }
        }
    }
}
