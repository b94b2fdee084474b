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

//! GP0 polygon commands (0x20-0x3F)
//!
//! Parameter stream per vertex: an optional colour word (Gouraud,
//! vertices after the first), the XY word, and an optional
//! texcoord/attribute word (textured). The attribute halfwords of the
//! first two vertices carry the CLUT and texpage selections, which also
//! update the GPU's shadows.
//!
//! Quads render as the two triangles (v0,v1,v2) and (v1,v2,v3).

use super::super::primitives::{Color, TextureInfo, Vertex};
use super::super::registers::{ClutAttribute, DrawMode, PolygonFlags};
use super::super::Gpu;

impl Gpu {
    /// Complete a buffered polygon command
    pub(super) fn finish_polygon(&mut self, flags: PolygonFlags) {
        let vertex_count = if flags.quad { 4 } else { 3 };

        let first = self.params.pop().unwrap_or(0);
        let base_color = Color::from_command(first);

        let mut vertices = [Vertex::default(); 4];
        let mut colors = [base_color; 4];
        let mut texcoords = [(0u8, 0u8); 4];

        for i in 0..vertex_count {
            if flags.gouraud && i > 0 {
                colors[i] = Color::from_command(self.params.pop().unwrap_or(0));
            }
            let xy = self.params.pop().unwrap_or(0);
            vertices[i] = Vertex::from_word(xy).offset(self.draw_offset);

            if flags.textured {
                let attribute = self.params.pop().unwrap_or(0);
                texcoords[i] = (attribute as u8, (attribute >> 8) as u8);

                // Vertex 0 carries the CLUT, vertex 1 the texpage
                match i {
                    0 => self.clut = ClutAttribute::from_attribute(attribute >> 16),
                    1 => {
                        let page = DrawMode::from_attribute(attribute >> 16);
                        self.draw_mode.page_x = page.page_x;
                        self.draw_mode.page_y = page.page_y;
                        self.draw_mode.semi_transparency = page.semi_transparency;
                        self.draw_mode.depth = page.depth;
                    }
                    _ => {}
                }
            }
        }

        if flags.textured {
            let info = self.texture_info();
            let window = self.texture_window;
            self.rasterizer.draw_textured_triangle(
                &mut self.vram,
                [vertices[0], vertices[1], vertices[2]],
                [texcoords[0], texcoords[1], texcoords[2]],
                &info,
                &window,
            );
            if flags.quad {
                self.rasterizer.draw_textured_triangle(
                    &mut self.vram,
                    [vertices[1], vertices[2], vertices[3]],
                    [texcoords[1], texcoords[2], texcoords[3]],
                    &info,
                    &window,
                );
            }
        } else if flags.gouraud {
            self.rasterizer.draw_shaded_triangle(
                &mut self.vram,
                [vertices[0], vertices[1], vertices[2]],
                [colors[0], colors[1], colors[2]],
            );
            if flags.quad {
                self.rasterizer.draw_shaded_triangle(
                    &mut self.vram,
                    [vertices[1], vertices[2], vertices[3]],
                    [colors[1], colors[2], colors[3]],
                );
            }
        } else {
            self.rasterizer.draw_flat_triangle(
                &mut self.vram,
                [vertices[0], vertices[1], vertices[2]],
                base_color,
            );
            if flags.quad {
                self.rasterizer.draw_flat_triangle(
                    &mut self.vram,
                    [vertices[1], vertices[2], vertices[3]],
                    base_color,
                );
            }
        }

        self.end_command();
    }

    /// Resolve the current texpage and CLUT shadows into sampling
    /// parameters
    pub(super) fn texture_info(&self) -> TextureInfo {
        let (base_x, base_y) = self.draw_mode.page_base();
        let (clut_x, clut_y) = self.clut.base();
        TextureInfo {
            base_x,
            base_y,
            clut_x,
            clut_y,
            depth: self.draw_mode.depth,
        }
    }
}
