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

//! Root counters (timers 0-2)
//!
//! Three 16-bit counters with value/mode/target registers at
//! 0x1F801100-0x1F801128. All three count system clock ticks, once per
//! bus step; the dotclock and hblank clock sources of the real machine
//! are approximated by the system clock, since analog video timing is
//! outside this core's scope.
//!
//! ## Mode register bits (subset honored here)
//!
//! | Bit | Meaning |
//! |-----|---------|
//! | 3   | Reset counter to 0 when target is reached |
//! | 4   | Raise IRQ when target is reached |
//! | 5   | Raise IRQ on overflow (0xFFFF wrap) |
//! | 11  | Reached target (read-clear) |
//! | 12  | Reached 0xFFFF (read-clear) |

use crate::core::interrupt::{InterruptController, IrqSource};

/// One 16-bit root counter
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerChannel {
    /// Current counter value
    value: u16,

    /// Mode register (bits 11/12 are the read-clear reached flags)
    mode: u16,

    /// Target value
    target: u16,

    /// Channel number (0-2), used for IRQ routing and logging
    id: u8,
}

impl TimerChannel {
    fn new(id: u8) -> Self {
        Self {
            value: 0,
            mode: 0,
            target: 0,
            id,
        }
    }

    /// Read the counter value
    pub fn read_value(&self) -> u16 {
        self.value
    }

    /// Write the counter value
    pub fn write_value(&mut self, value: u16) {
        self.value = value;
    }

    /// Read the mode register
    ///
    /// Reading clears the reached-target and reached-overflow flags
    /// (bits 11 and 12).
    pub fn read_mode(&mut self) -> u16 {
        let mode = self.mode;
        self.mode &= !0x1800;
        mode
    }

    /// Write the mode register
    ///
    /// Writing resets the counter to zero.
    pub fn write_mode(&mut self, value: u16) {
        self.mode = value & 0x07FF;
        self.value = 0;
        log::trace!("Timer {} mode = 0x{:04X}", self.id, value);
    }

    /// Read the target register
    pub fn read_target(&self) -> u16 {
        self.target
    }

    /// Write the target register
    pub fn write_target(&mut self, value: u16) {
        self.target = value;
    }

    /// Advance the counter by one tick
    ///
    /// Returns true when the channel wants to raise its interrupt.
    fn tick(&mut self) -> bool {
        self.value = self.value.wrapping_add(1);
        let mut irq = false;

        if self.value == self.target {
            self.mode |= 1 << 11;
            if self.mode & (1 << 4) != 0 {
                irq = true;
            }
            if self.mode & (1 << 3) != 0 {
                self.value = 0;
            }
        }

        if self.value == 0xFFFF {
            self.mode |= 1 << 12;
            if self.mode & (1 << 5) != 0 {
                irq = true;
            }
        }

        irq
    }
}

/// The three root counters
pub struct Timers {
    channels: [TimerChannel; 3],
}

impl Timers {
    /// Create all three channels in reset state
    pub fn new() -> Self {
        Self {
            channels: [
                TimerChannel::new(0),
                TimerChannel::new(1),
                TimerChannel::new(2),
            ],
        }
    }

    /// Restore power-on state
    pub fn reset(&mut self) {
        for (id, channel) in self.channels.iter_mut().enumerate() {
            *channel = TimerChannel::new(id as u8);
        }
    }

    /// Immutable channel access
    pub fn channel(&self, index: usize) -> &TimerChannel {
        &self.channels[index]
    }

    /// Mutable channel access
    pub fn channel_mut(&mut self, index: usize) -> &mut TimerChannel {
        &mut self.channels[index]
    }

    /// Advance all channels by one system clock tick
    ///
    /// Raises the matching I_STAT bit (4-6) for any channel whose IRQ
    /// condition fired this tick.
    pub fn step(&mut self, interrupts: &mut InterruptController) {
        for (id, channel) in self.channels.iter_mut().enumerate() {
            if channel.tick() {
                let source = match id {
                    0 => IrqSource::Timer0,
                    1 => IrqSource::Timer1,
                    _ => IrqSource::Timer2,
                };
                log::trace!("Timer {} IRQ", id);
                interrupts.request(source);
            }
        }
    }

    /// Read a timer register by offset from 0x1F801100
    ///
    /// Layout: channel N occupies 0x10 bytes at N*0x10; within a channel
    /// the registers are value (+0x0), mode (+0x4), target (+0x8).
    pub fn read_register(&mut self, offset: u32) -> u16 {
        let channel = ((offset >> 4) & 0x3) as usize;
        if channel > 2 {
            return 0;
        }
        match offset & 0xF {
            0x0 => self.channels[channel].read_value(),
            0x4 => self.channels[channel].read_mode(),
            0x8 => self.channels[channel].read_target(),
            _ => 0,
        }
    }

    /// Write a timer register by offset from 0x1F801100
    pub fn write_register(&mut self, offset: u32, value: u16) {
        let channel = ((offset >> 4) & 0x3) as usize;
        if channel > 2 {
            return;
        }
        match offset & 0xF {
            0x0 => self.channels[channel].write_value(value),
            0x4 => self.channels[channel].write_mode(value),
            0x8 => self.channels[channel].write_target(value),
            _ => {}
        }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_increments_per_step() {
        let mut timers = Timers::new();
        let mut ic = InterruptController::new();
        for _ in 0..10 {
            timers.step(&mut ic);
        }
        assert_eq!(timers.channel(0).read_value(), 10);
        assert_eq!(timers.channel(2).read_value(), 10);
    }

    #[test]
    fn test_mode_write_resets_counter() {
        let mut timers = Timers::new();
        let mut ic = InterruptController::new();
        for _ in 0..5 {
            timers.step(&mut ic);
        }
        timers.write_register(0x04, 0x0000);
        assert_eq!(timers.channel(0).read_value(), 0, "mode write resets value");
    }

    #[test]
    fn test_target_reset_mode() {
        let mut timers = Timers::new();
        let mut ic = InterruptController::new();
        // Reset-at-target, target = 4
        timers.write_register(0x14, 1 << 3);
        timers.write_register(0x18, 4);
        for _ in 0..4 {
            timers.step(&mut ic);
        }
        assert_eq!(
            timers.channel(1).read_value(),
            0,
            "counter wraps to 0 at target when mode bit 3 is set"
        );
    }

    #[test]
    fn test_target_irq_raises_istat_bit() {
        let mut timers = Timers::new();
        let mut ic = InterruptController::new();
        // IRQ-at-target on timer 2, target = 3
        timers.write_register(0x24, 1 << 4);
        timers.write_register(0x28, 3);
        for _ in 0..3 {
            timers.step(&mut ic);
        }
        assert_eq!(
            ic.read_status() & IrqSource::Timer2.bit(),
            IrqSource::Timer2.bit(),
            "timer 2 should raise I_STAT bit 6 at target"
        );
    }

    #[test]
    fn test_reached_flags_are_read_clear() {
        let mut timers = Timers::new();
        let mut ic = InterruptController::new();
        timers.write_register(0x08, 2);
        timers.step(&mut ic);
        timers.step(&mut ic);
        let mode = timers.read_register(0x04);
        assert_ne!(mode & (1 << 11), 0, "reached-target flag set");
        let mode = timers.read_register(0x04);
        assert_eq!(mode & (1 << 11), 0, "reached-target flag cleared by read");
    }
}
