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

//! GP0 VRAM transfer commands (0xA0 CPU->VRAM, 0xC0 VRAM->CPU)

use super::super::registers::{Gp0State, VramTransfer};
use super::super::Gpu;

impl Gpu {
    /// GP0(0xA0): start a CPU->VRAM copy
    ///
    /// Subsequent GP0 words carry two pixels each until the rectangle
    /// is full.
    pub(super) fn begin_cpu_to_vram(&mut self) {
        let _ = self.params.pop();
        let coords = self.params.pop().unwrap_or(0);
        let size = self.params.pop().unwrap_or(0);

        let transfer = VramTransfer::from_words(coords, size);
        log::debug!(
            "CPU->VRAM transfer: ({}, {}) {}x{}",
            transfer.x,
            transfer.y,
            transfer.width,
            transfer.height
        );

        self.transfer = Some(transfer);
        self.params.clear();
        self.port_state = Gp0State::ReceivingData;
    }

    /// Consume one data word of an active CPU->VRAM copy
    pub(super) fn process_vram_write(&mut self, word: u32) {
        let Some(mut transfer) = self.transfer.take() else {
            return;
        };

        let (x, y) = transfer.advance();
        self.write_vram(x, y, word as u16);

        if !transfer.done() {
            let (x, y) = transfer.advance();
            self.write_vram(x, y, (word >> 16) as u16);
        }

        if transfer.done() {
            log::debug!("CPU->VRAM transfer complete");
            self.end_command();
        } else {
            self.transfer = Some(transfer);
        }
    }

    /// GP0(0xC0): start a VRAM->CPU copy
    ///
    /// Pixels are produced two at a time through GPUREAD.
    pub(super) fn begin_vram_to_cpu(&mut self) {
        let _ = self.params.pop();
        let coords = self.params.pop().unwrap_or(0);
        let size = self.params.pop().unwrap_or(0);

        let transfer = VramTransfer::from_words(coords, size);
        log::debug!(
            "VRAM->CPU transfer: ({}, {}) {}x{}",
            transfer.x,
            transfer.y,
            transfer.width,
            transfer.height
        );

        self.transfer = Some(transfer);
        self.params.clear();
        self.port_state = Gp0State::TransferringData;
    }

    /// Latch the next two pixels of an active VRAM->CPU copy
    ///
    /// Called from the GPUREAD path; returns to AwaitingCommand when
    /// the rectangle is exhausted.
    pub(crate) fn transfer_next_gpuread(&mut self) {
        let Some(mut transfer) = self.transfer.take() else {
            return;
        };

        let (x, y) = transfer.advance();
        let low = self.read_vram(x, y) as u32;
        let high = if transfer.done() {
            0
        } else {
            let (x, y) = transfer.advance();
            self.read_vram(x, y) as u32
        };
        self.gpuread = low | (high << 16);

        if transfer.done() {
            log::debug!("VRAM->CPU transfer complete");
            self.end_command();
        } else {
            self.transfer = Some(transfer);
        }
    }
}
