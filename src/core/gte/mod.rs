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

//! GTE (Geometry Transformation Engine) - COP2
//!
//! Fixed-point 3D vector and matrix pipeline. All arithmetic runs on
//! 64-bit intermediates with results saturated into the register file by
//! a family of limiters, each of which records its saturation event in
//! the FLAG register:
//!
//! | Limiter | Target | Range | FLAG bits |
//! |---------|--------|-------|-----------|
//! | A1-A3   | IR1-IR3 | [-32768, 32767] (or [0, 32767] under `lm`) | 24/23/22 |
//! | B1-B3   | colour FIFO channels | [0, 255] | 21/20/19 |
//! | C       | SZ3 | [0, 65535] | 18 |
//! | D1/D2   | SX2/SY2 | [-1024, 1023] | 14/13 |
//! | E       | IR0 | [0, 4095] | 12 |
//!
//! FLAG accumulates across operations; it is only replaced by an
//! explicit control-register 31 write, so software that wants a clean
//! reading clears it first.
//!
//! The perspective divides go through the hardware's Unsigned
//! Newton-Raphson reciprocal unit (see [`division`]).

mod division;
mod registers;

use division::unr_divide;

/// GTE register file and pipeline state
///
/// # Example
///
/// ```
/// use psemu::core::gte::Gte;
///
/// let mut gte = Gte::new();
/// gte.write_control(Gte::RT11_RT12, 0x1000); // R11 = 1.0 in 4.12
/// ```
pub struct Gte {
    /// Data registers (MFC2/MTC2 bank)
    data: [i32; 32],

    /// Control registers (CFC2/CTC2 bank)
    control: [i32; 32],

    /// FLAG register, accumulated across operations
    flags: u32,
}

impl Gte {
    // Data register indices
    pub const VXY0: usize = 0;
    pub const VZ0: usize = 1;
    pub const VXY1: usize = 2;
    pub const VZ1: usize = 3;
    pub const VXY2: usize = 4;
    pub const VZ2: usize = 5;
    pub const RGBC: usize = 6;
    pub const OTZ: usize = 7;
    pub const IR0: usize = 8;
    pub const IR1: usize = 9;
    pub const IR2: usize = 10;
    pub const IR3: usize = 11;
    pub const SXY0: usize = 12;
    pub const SXY1: usize = 13;
    pub const SXY2: usize = 14;
    pub const SXYP: usize = 15;
    pub const SZ0: usize = 16;
    pub const SZ1: usize = 17;
    pub const SZ2: usize = 18;
    pub const SZ3: usize = 19;
    pub const RGB0: usize = 20;
    pub const RGB1: usize = 21;
    pub const RGB2: usize = 22;
    pub const RES1: usize = 23;
    pub const MAC0: usize = 24;
    pub const MAC1: usize = 25;
    pub const MAC2: usize = 26;
    pub const MAC3: usize = 27;
    pub const IRGB: usize = 28;
    pub const ORGB: usize = 29;
    pub const LZCS: usize = 30;
    pub const LZCR: usize = 31;

    // Control register indices
    pub const RT11_RT12: usize = 0;
    pub const RT13_RT21: usize = 1;
    pub const RT22_RT23: usize = 2;
    pub const RT31_RT32: usize = 3;
    pub const RT33: usize = 4;
    pub const TRX: usize = 5;
    pub const TRY: usize = 6;
    pub const TRZ: usize = 7;
    pub const L11_L12: usize = 8;
    pub const L13_L21: usize = 9;
    pub const L22_L23: usize = 10;
    pub const L31_L32: usize = 11;
    pub const L33: usize = 12;
    pub const RBK: usize = 13;
    pub const GBK: usize = 14;
    pub const BBK: usize = 15;
    pub const LR1_LR2: usize = 16;
    pub const LR3_LG1: usize = 17;
    pub const LG2_LG3: usize = 18;
    pub const LB1_LB2: usize = 19;
    pub const LB3: usize = 20;
    pub const RFC: usize = 21;
    pub const GFC: usize = 22;
    pub const BFC: usize = 23;
    pub const OFX: usize = 24;
    pub const OFY: usize = 25;
    pub const H: usize = 26;
    pub const DQA: usize = 27;
    pub const DQB: usize = 28;
    pub const ZSF3: usize = 29;
    pub const ZSF4: usize = 30;
    pub const FLAG: usize = 31;

    /// Create a GTE with all registers cleared
    pub fn new() -> Self {
        Self {
            data: [0; 32],
            control: [0; 32],
            flags: 0,
        }
    }

    /// Clear the register file and FLAG
    pub fn reset(&mut self) {
        self.data = [0; 32];
        self.control = [0; 32];
        self.flags = 0;
    }

    /// Current FLAG value
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Execute a GTE command word
    ///
    /// Bit 19 selects `sf` (results shifted down by 12 fractional bits),
    /// bit 10 selects `lm` (IR clamps become unsigned). Returns `false`
    /// for function codes the pipeline does not implement, which the
    /// CPU turns into a Reserved Instruction exception.
    pub fn execute(&mut self, command: u32) -> bool {
        let opcode = command & 0x3F;
        let sf = command & (1 << 19) != 0;
        let lm = command & (1 << 10) != 0;

        match opcode {
            0x01 => self.rtps(sf, lm),
            0x06 => self.nclip(),
            0x0C => self.op(sf, lm),
            0x12 => self.mvmva(command),
            0x13 => self.ncds(sf, lm),
            0x28 => self.sqr(sf, lm),
            0x2D => self.avsz3(),
            0x2E => self.avsz4(),
            0x30 => self.rtpt(sf, lm),
            _ => return false,
        }
        true
    }

    // === Limiters ===

    /// Clamp `value` into `[min, max]`, recording saturation in FLAG
    fn limit(&mut self, value: i64, min: i64, max: i64, flag_bit: u32) -> i64 {
        if value < min {
            self.flags |= 1 << flag_bit;
            min
        } else if value > max {
            self.flags |= 1 << flag_bit;
            max
        } else {
            value
        }
    }

    /// A1/A2/A3: MAC -> IR clamp (FLAG bits 24/23/22)
    fn limit_ir(&mut self, channel: u32, value: i64, lm: bool) -> i64 {
        let min = if lm { 0 } else { -32768 };
        self.limit(value, min, 32767, 25 - channel)
    }

    /// B1/B2/B3: colour channel clamp to [0, 255] (FLAG bits 21/20/19)
    fn limit_color(&mut self, channel: u32, value: i64) -> i64 {
        self.limit(value, 0, 255, 22 - channel)
    }

    // === Operations ===

    /// RTPS: perspective-transform the vertex in V0
    pub fn rtps(&mut self, sf: bool, lm: bool) {
        self.transform_vertex(0, sf, lm);
    }

    /// RTPT: perspective-transform V0, V1 and V2 in sequence
    pub fn rtpt(&mut self, sf: bool, lm: bool) {
        self.transform_vertex(0, sf, lm);
        self.transform_vertex(1, sf, lm);
        self.transform_vertex(2, sf, lm);
    }

    /// Rotate/translate/project one vertex
    ///
    /// MAC1-3 take the rotated, translated vector; IR1-3 the clamped
    /// copy. The depth enters the SZ FIFO, the UNR divide produces the
    /// projection scale, and the projected point enters the SXY FIFO.
    /// MAC0/IR0 take the depth-cue interpolation factor.
    fn transform_vertex(&mut self, index: usize, sf: bool, lm: bool) {
        let shift = if sf { 12 } else { 0 };

        let (vx, vy, vz) = self.vector(index);
        let rt = self.rotation_matrix();
        let (trx, try_, trz) = self.translation();

        let mac1 = ((trx << 12) + rt[0][0] * vx + rt[0][1] * vy + rt[0][2] * vz) >> shift;
        let mac2 = ((try_ << 12) + rt[1][0] * vx + rt[1][1] * vy + rt[1][2] * vz) >> shift;
        let mac3 = ((trz << 12) + rt[2][0] * vx + rt[2][1] * vy + rt[2][2] * vz) >> shift;

        self.data[Self::MAC1] = mac1 as i32;
        self.data[Self::MAC2] = mac2 as i32;
        self.data[Self::MAC3] = mac3 as i32;

        let ir1 = self.limit_ir(1, mac1, lm);
        let ir2 = self.limit_ir(2, mac2, lm);
        let ir3 = self.limit_ir(3, mac3, lm);
        self.data[Self::IR1] = ir1 as i32;
        self.data[Self::IR2] = ir2 as i32;
        self.data[Self::IR3] = ir3 as i32;

        // The depth always carries full fraction: shift down the other
        // 12 bits when sf left them in place
        let sz3 = self.limit(mac3 >> (12 - shift), 0, 0xFFFF, 18) as u16;
        self.push_sz(sz3);

        let h = (self.control[Self::H] as u32) & 0xFFFF;
        let divisor = unr_divide(h, sz3, &mut self.flags) as i64;

        let ofx = self.control[Self::OFX] as i64;
        let ofy = self.control[Self::OFY] as i64;
        let sx = self.limit((ir1 * divisor + ofx) >> 16, -1024, 1023, 14);
        let sy = self.limit((ir2 * divisor + ofy) >> 16, -1024, 1023, 13);
        self.push_sxy((((sy as i32) & 0xFFFF) << 16) | ((sx as i32) & 0xFFFF));

        let dqa = (self.control[Self::DQA] as i16) as i64;
        let dqb = self.control[Self::DQB] as i64;
        let mac0 = dqa * divisor + dqb;
        self.data[Self::MAC0] = mac0 as i32;
        let ir0 = self.limit(mac0 >> 12, 0, 4095, 12);
        self.data[Self::IR0] = ir0 as i32;
    }

    /// NCLIP: winding test on the screen coordinate FIFO
    ///
    /// MAC0 takes the signed doubled area of (SXY0, SXY1, SXY2); its
    /// sign tells front-facing from back-facing.
    pub fn nclip(&mut self) {
        let sx0 = (self.data[Self::SXY0] as i16) as i64;
        let sy0 = ((self.data[Self::SXY0] >> 16) as i16) as i64;
        let sx1 = (self.data[Self::SXY1] as i16) as i64;
        let sy1 = ((self.data[Self::SXY1] >> 16) as i16) as i64;
        let sx2 = (self.data[Self::SXY2] as i16) as i64;
        let sy2 = ((self.data[Self::SXY2] >> 16) as i16) as i64;

        let mac0 = sx0 * sy1 + sx1 * sy2 + sx2 * sy0 - sx0 * sy2 - sx1 * sy0 - sx2 * sy1;
        self.data[Self::MAC0] = mac0 as i32;
    }

    /// AVSZ3: average the three newest screen depths
    ///
    /// MAC0 = ZSF3 * (SZ1 + SZ2 + SZ3); OTZ takes the C-limited
    /// 20.12 result.
    pub fn avsz3(&mut self) {
        let zsf3 = (self.control[Self::ZSF3] as i16) as i64;
        let sum = (self.data[Self::SZ1] as i64 & 0xFFFF)
            + (self.data[Self::SZ2] as i64 & 0xFFFF)
            + (self.data[Self::SZ3] as i64 & 0xFFFF);

        let mac0 = zsf3 * sum;
        self.data[Self::MAC0] = mac0 as i32;
        let otz = self.limit(mac0 >> 12, 0, 0xFFFF, 18);
        self.data[Self::OTZ] = otz as i32;
    }

    /// MVMVA: general matrix-vector multiply with translation
    ///
    /// The command word selects the matrix (bits 17-18: rotation,
    /// light, colour), the multiplicand vector (bits 15-16: V0-V2 or
    /// IR) and the translation vector (bits 13-14: TR, BK, FC, or
    /// none). MAC1-3 and IR1-3 receive the result like the fixed
    /// transforms do.
    pub fn mvmva(&mut self, command: u32) {
        let sf = command & (1 << 19) != 0;
        let lm = command & (1 << 10) != 0;
        let shift = if sf { 12 } else { 0 };

        let matrix = match (command >> 17) & 0x3 {
            0 => self.rotation_matrix(),
            1 => self.light_matrix(),
            _ => self.color_matrix(),
        };

        let (vx, vy, vz) = match (command >> 15) & 0x3 {
            0 => self.vector(0),
            1 => self.vector(1),
            2 => self.vector(2),
            _ => (
                (self.data[Self::IR1] as i16) as i64,
                (self.data[Self::IR2] as i16) as i64,
                (self.data[Self::IR3] as i16) as i64,
            ),
        };

        let (tx, ty, tz) = match (command >> 13) & 0x3 {
            0 => self.translation(),
            1 => self.background_color(),
            2 => self.far_color(),
            _ => (0, 0, 0),
        };

        let mac1 = ((tx << 12) + matrix[0][0] * vx + matrix[0][1] * vy + matrix[0][2] * vz) >> shift;
        let mac2 = ((ty << 12) + matrix[1][0] * vx + matrix[1][1] * vy + matrix[1][2] * vz) >> shift;
        let mac3 = ((tz << 12) + matrix[2][0] * vx + matrix[2][1] * vy + matrix[2][2] * vz) >> shift;

        self.set_mac_ir(mac1, mac2, mac3, lm);
    }

    /// SQR: square the IR vector
    pub fn sqr(&mut self, sf: bool, lm: bool) {
        let shift = if sf { 12 } else { 0 };
        let ir1 = (self.data[Self::IR1] as i16) as i64;
        let ir2 = (self.data[Self::IR2] as i16) as i64;
        let ir3 = (self.data[Self::IR3] as i16) as i64;

        self.set_mac_ir((ir1 * ir1) >> shift, (ir2 * ir2) >> shift, (ir3 * ir3) >> shift, lm);
    }

    /// OP: outer product of the IR vector with (D1, D2, D3)
    ///
    /// D1-D3 are the rotation matrix diagonal (RT11, RT22, RT33).
    pub fn op(&mut self, sf: bool, lm: bool) {
        let shift = if sf { 12 } else { 0 };
        let d1 = (self.control[Self::RT11_RT12] as i16) as i64;
        let d2 = (self.control[Self::RT22_RT23] as i16) as i64;
        let d3 = (self.control[Self::RT33] as i16) as i64;
        let ir1 = (self.data[Self::IR1] as i16) as i64;
        let ir2 = (self.data[Self::IR2] as i16) as i64;
        let ir3 = (self.data[Self::IR3] as i16) as i64;

        self.set_mac_ir(
            (ir3 * d2 - ir2 * d3) >> shift,
            (ir1 * d3 - ir3 * d1) >> shift,
            (ir2 * d1 - ir1 * d2) >> shift,
            lm,
        );
    }

    /// AVSZ4: average all four screen depths
    ///
    /// MAC0 = ZSF4 * (SZ0 + SZ1 + SZ2 + SZ3); OTZ takes the C-limited
    /// result.
    pub fn avsz4(&mut self) {
        let zsf4 = (self.control[Self::ZSF4] as i16) as i64;
        let sum = (self.data[Self::SZ0] as i64 & 0xFFFF)
            + (self.data[Self::SZ1] as i64 & 0xFFFF)
            + (self.data[Self::SZ2] as i64 & 0xFFFF)
            + (self.data[Self::SZ3] as i64 & 0xFFFF);

        let mac0 = zsf4 * sum;
        self.data[Self::MAC0] = mac0 as i32;
        let otz = self.limit(mac0 >> 12, 0, 0xFFFF, 18);
        self.data[Self::OTZ] = otz as i32;
    }

    /// Store MAC1-3 and their IR clamps
    fn set_mac_ir(&mut self, mac1: i64, mac2: i64, mac3: i64, lm: bool) {
        self.data[Self::MAC1] = mac1 as i32;
        self.data[Self::MAC2] = mac2 as i32;
        self.data[Self::MAC3] = mac3 as i32;
        let ir1 = self.limit_ir(1, mac1, lm);
        let ir2 = self.limit_ir(2, mac2, lm);
        let ir3 = self.limit_ir(3, mac3, lm);
        self.data[Self::IR1] = ir1 as i32;
        self.data[Self::IR2] = ir2 as i32;
        self.data[Self::IR3] = ir3 as i32;
    }

    /// NCDS: normal colour with depth cue, single vertex
    ///
    /// V0 is lit through the light matrix, biased by the background
    /// colour through the light colour matrix, modulated by the primary
    /// colour, mixed towards the far colour by IR0, and pushed into the
    /// RGB FIFO with the CD code preserved.
    pub fn ncds(&mut self, sf: bool, lm: bool) {
        let shift = if sf { 12 } else { 0 };

        // Light direction
        let (vx, vy, vz) = self.vector(0);
        let llm = self.light_matrix();
        let mut mac1 = (llm[0][0] * vx + llm[0][1] * vy + llm[0][2] * vz) >> shift;
        let mut mac2 = (llm[1][0] * vx + llm[1][1] * vy + llm[1][2] * vz) >> shift;
        let mut mac3 = (llm[2][0] * vx + llm[2][1] * vy + llm[2][2] * vz) >> shift;
        let mut ir1 = self.limit_ir(1, mac1, lm);
        let mut ir2 = self.limit_ir(2, mac2, lm);
        let mut ir3 = self.limit_ir(3, mac3, lm);

        // Light colour with background bias
        let lcm = self.color_matrix();
        let (rbk, gbk, bbk) = self.background_color();
        mac1 = ((rbk << 12) + lcm[0][0] * ir1 + lcm[0][1] * ir2 + lcm[0][2] * ir3) >> shift;
        mac2 = ((gbk << 12) + lcm[1][0] * ir1 + lcm[1][1] * ir2 + lcm[1][2] * ir3) >> shift;
        mac3 = ((bbk << 12) + lcm[2][0] * ir1 + lcm[2][1] * ir2 + lcm[2][2] * ir3) >> shift;
        ir1 = self.limit_ir(1, mac1, lm);
        ir2 = self.limit_ir(2, mac2, lm);
        ir3 = self.limit_ir(3, mac3, lm);

        // Modulate by the primary colour
        let rgbc = self.data[Self::RGBC] as u32;
        let r = (rgbc & 0xFF) as i64;
        let g = ((rgbc >> 8) & 0xFF) as i64;
        let b = ((rgbc >> 16) & 0xFF) as i64;
        let code = rgbc & 0xFF00_0000;
        mac1 = (r * ir1) << 4;
        mac2 = (g * ir2) << 4;
        mac3 = (b * ir3) << 4;

        // Depth cue: mix towards the far colour by IR0
        let (rfc, gfc, bfc) = self.far_color();
        let ir0 = self.data[Self::IR0] as i64;
        let mix1 = self.limit_ir(1, ((rfc << 12) - mac1) >> shift, false);
        let mix2 = self.limit_ir(2, ((gfc << 12) - mac2) >> shift, false);
        let mix3 = self.limit_ir(3, ((bfc << 12) - mac3) >> shift, false);
        mac1 = (mac1 + mix1 * ir0) >> shift;
        mac2 = (mac2 + mix2 * ir0) >> shift;
        mac3 = (mac3 + mix3 * ir0) >> shift;

        self.data[Self::MAC1] = mac1 as i32;
        self.data[Self::MAC2] = mac2 as i32;
        self.data[Self::MAC3] = mac3 as i32;

        let cr = self.limit_color(1, mac1 >> 4);
        let cg = self.limit_color(2, mac2 >> 4);
        let cb = self.limit_color(3, mac3 >> 4);
        self.push_rgb((code as i32) | ((cb as i32) << 16) | ((cg as i32) << 8) | (cr as i32));

        let ir1 = self.limit_ir(1, mac1, lm);
        let ir2 = self.limit_ir(2, mac2, lm);
        let ir3 = self.limit_ir(3, mac3, lm);
        self.data[Self::IR1] = ir1 as i32;
        self.data[Self::IR2] = ir2 as i32;
        self.data[Self::IR3] = ir3 as i32;
    }
}

impl Default for Gte {
    fn default() -> Self {
        Self::new()
    }
}
