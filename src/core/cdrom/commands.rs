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

//! CD-ROM command implementations
//!
//! Each command consumes its parameters from the parameter FIFO and
//! arms one or more interrupt descriptors. Multi-stage commands chain
//! the second descriptor off the first, so the completion response
//! only starts counting once the guest acknowledges the first one.

use super::{bcd_to_dec, Cdrom, DriveMode, DriveStatus, IntSlot};

impl Cdrom {
    /// Dispatch a command byte written to register 1, index 0
    pub(super) fn execute_command(&mut self, command: u8) {
        log::debug!("CD-ROM command 0x{:02X}", command);

        match command {
            0x01 => self.cmd_getstat(),
            0x02 => self.cmd_setloc(),
            0x06 => self.cmd_readn(),
            0x09 => self.cmd_pause(),
            0x0A => self.cmd_init(),
            0x0E => self.cmd_setmode(),
            0x15 => self.cmd_seekl(),
            0x19 => self.cmd_subfunction(),
            0x1A => self.cmd_getid(),
            _ => {
                log::warn!("Unknown CD-ROM command 0x{:02X}", command);
                self.error_response();
            }
        }
    }

    /// 0x01 Getstat: current status over INT3
    fn cmd_getstat(&mut self) {
        let status = self.status.bits();
        self.schedule(IntSlot::Int3, Self::ACK_CYCLES, &[status], None);
    }

    /// 0x02 Setloc: decode three BCD bytes into the head position
    fn cmd_setloc(&mut self) {
        if self.params.len() < 3 {
            log::warn!("CD-ROM Setloc with insufficient parameters");
            self.error_response();
            return;
        }

        let minute = bcd_to_dec(self.params.pop().unwrap_or(0));
        let second = bcd_to_dec(self.params.pop().unwrap_or(0));
        let sector = bcd_to_dec(self.params.pop().unwrap_or(0));
        self.position.minute = minute;
        self.position.second = second;
        self.position.sector = sector;

        log::debug!("CD-ROM Setloc {:02}:{:02}:{:02}", minute, second, sector);

        let status = self.status.bits();
        self.schedule(IntSlot::Int3, Self::ACK_CYCLES, &[status], None);
    }

    /// 0x06 ReadN: start streaming data sectors
    ///
    /// INT3 acknowledges; INT1s then arrive from the sector pacing in
    /// `step`.
    fn cmd_readn(&mut self) {
        self.status.insert(DriveStatus::READING | DriveStatus::MOTOR_ON);
        self.read_cycles = 0;
        self.sector_count = 0;

        let status = self.status.bits();
        self.schedule(IntSlot::Int3, Self::ACK_CYCLES, &[status], None);
    }

    /// 0x09 Pause: stop reading
    ///
    /// INT3 answers promptly with the status as it was; the reading
    /// flag is cleared and INT2 later reports the settled state.
    fn cmd_pause(&mut self) {
        let before = self.status.bits();
        self.status
            .remove(DriveStatus::READING | DriveStatus::SEEKING | DriveStatus::PLAYING);
        let after = self.status.bits();

        self.schedule(
            IntSlot::Int3,
            Self::SHORT_ACK_CYCLES,
            &[before],
            Some(IntSlot::Int2),
        );
        self.schedule_chained(IntSlot::Int2, Self::PAUSE_COMPLETE_CYCLES, &[after]);
    }

    /// 0x0A Init: reset the drive mode, stop any activity
    fn cmd_init(&mut self) {
        self.status.insert(DriveStatus::MOTOR_ON);
        self.status
            .remove(DriveStatus::READING | DriveStatus::SEEKING | DriveStatus::PLAYING);
        self.mode = DriveMode::from_bits_truncate(0x02);

        let status = self.status.bits();
        self.schedule(
            IntSlot::Int3,
            Self::ACK_CYCLES,
            &[status],
            Some(IntSlot::Int2),
        );
        self.schedule_chained(IntSlot::Int2, Self::INIT_COMPLETE_CYCLES, &[status]);
    }

    /// 0x0E Setmode: one parameter byte replaces the mode
    fn cmd_setmode(&mut self) {
        let Some(mode) = self.params.pop() else {
            log::warn!("CD-ROM Setmode with no parameter");
            self.error_response();
            return;
        };

        self.mode = DriveMode::from_bits_truncate(mode);
        log::debug!(
            "CD-ROM Setmode 0x{:02X} ({}x speed)",
            mode,
            if self.mode.contains(DriveMode::DOUBLE_SPEED) { 2 } else { 1 }
        );

        let status = self.status.bits();
        self.schedule(IntSlot::Int3, Self::ACK_CYCLES, &[status], None);
    }

    /// 0x15 SeekL: data-mode seek to the Setloc position
    ///
    /// INT3 reports the seek in progress; INT2 reports it settled.
    fn cmd_seekl(&mut self) {
        self.status.insert(DriveStatus::SEEKING | DriveStatus::MOTOR_ON);
        let seeking = self.status.bits();
        self.status.remove(DriveStatus::SEEKING);
        let settled = self.status.bits();

        self.schedule(
            IntSlot::Int3,
            Self::ACK_CYCLES,
            &[seeking],
            Some(IntSlot::Int2),
        );
        self.schedule_chained(IntSlot::Int2, Self::SEEK_COMPLETE_CYCLES, &[settled]);
    }

    /// 0x19 sub-function dispatch
    ///
    /// Only 0x20 (GetVersion) is populated; it answers the fixed
    /// date/version quad.
    fn cmd_subfunction(&mut self) {
        let Some(subfunction) = self.params.pop() else {
            log::warn!("CD-ROM sub-function command with no parameter");
            self.error_response();
            return;
        };

        match subfunction {
            0x20 => {
                self.schedule(IntSlot::Int3, Self::ACK_CYCLES, &[0x94, 0x09, 0x19, 0xC0], None);
            }
            _ => {
                log::warn!("Unknown CD-ROM sub-function 0x{:02X}", subfunction);
                self.error_response();
            }
        }
    }

    /// 0x1A GetID: disc identification
    ///
    /// With a disc inserted: INT3 with the status, then INT2 with the
    /// licensed-disc descriptor. Without one: INT3, then the INT5
    /// denial.
    fn cmd_getid(&mut self) {
        let status = self.status.bits();

        if self.disc_present() {
            self.schedule(
                IntSlot::Int3,
                Self::ACK_CYCLES,
                &[status],
                Some(IntSlot::Int2),
            );
            self.schedule_chained(
                IntSlot::Int2,
                Self::GETID_COMPLETE_CYCLES,
                &[0x02, 0x00, 0x20, 0x00, b'S', b'C', b'E', b'A'],
            );
        } else {
            self.schedule(
                IntSlot::Int3,
                Self::ACK_CYCLES,
                &[status],
                Some(IntSlot::Int5),
            );
            self.schedule_chained(
                IntSlot::Int5,
                Self::GETID_COMPLETE_CYCLES,
                &[0x08, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
            );
        }
    }

    /// Arm a descriptor that only becomes active through chaining
    fn schedule_chained(&mut self, slot: IntSlot, cycles: u32, response: &[u8]) {
        let was_active = self.active;
        self.schedule(slot, cycles, response, None);
        // A chained descriptor must not pre-empt the chain head
        self.active = was_active;
    }

    /// Generic INT5 error response
    pub(super) fn error_response(&mut self) {
        self.status.insert(DriveStatus::ERROR);
        let status = self.status.bits();
        self.schedule(IntSlot::Int5, Self::ACK_CYCLES, &[status, 0x40], None);
        self.status.remove(DriveStatus::ERROR);
    }
}
