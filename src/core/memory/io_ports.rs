// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Memory-mapped I/O register dispatch
//!
//! Word-granular registers: interrupt control, DMA, GPU. Halfword
//! access is defined for interrupt control and the timers; byte access
//! for the CD-ROM register bank. Anything else in the I/O window logs
//! and behaves as unmapped (reads 0, writes dropped).

use super::Bus;

impl Bus {
    /// Interrupt status register
    const I_STAT: u32 = 0x1F80_1070;
    /// Interrupt mask register
    const I_MASK: u32 = 0x1F80_1074;
    /// DMA channel register window (MADR/BCR/CHCR x 7)
    const DMA_CHANNELS_START: u32 = 0x1F80_1080;
    const DMA_CHANNELS_END: u32 = 0x1F80_10EF;
    /// DMA control register
    const DMA_DPCR: u32 = 0x1F80_10F0;
    /// DMA interrupt register
    const DMA_DICR: u32 = 0x1F80_10F4;
    /// Timer register window
    const TIMERS_START: u32 = 0x1F80_1100;
    const TIMERS_END: u32 = 0x1F80_112F;
    /// CD-ROM register bank
    const CDROM_START: u32 = 0x1F80_1800;
    const CDROM_END: u32 = 0x1F80_1803;
    /// GPU GP0 write / GPUREAD read
    const GPU_GP0: u32 = 0x1F80_1810;
    /// GPU GP1 write / GPUSTAT read
    const GPU_GP1: u32 = 0x1F80_1814;

    /// Read an I/O register (word)
    pub(super) fn read_io32(&self, paddr: u32) -> u32 {
        match paddr {
            Self::I_STAT => self
                .interrupt_controller
                .as_ref()
                .map_or(0, |ic| ic.borrow().read_status()),
            Self::I_MASK => self
                .interrupt_controller
                .as_ref()
                .map_or(0, |ic| ic.borrow().read_mask()),

            Self::DMA_CHANNELS_START..=Self::DMA_CHANNELS_END => {
                let Some(dma) = &self.dma else { return 0 };
                let offset = paddr - Self::DMA_CHANNELS_START;
                let channel = (offset / 0x10) as usize;
                match offset & 0xF {
                    0x0 => dma.borrow().read_madr(channel),
                    0x4 => dma.borrow().read_bcr(channel),
                    0x8 => dma.borrow().read_chcr(channel),
                    _ => {
                        log::debug!("Invalid DMA register read at 0x{:08X}", paddr);
                        0
                    }
                }
            }
            Self::DMA_DPCR => self.dma.as_ref().map_or(0, |dma| dma.borrow().read_control()),
            Self::DMA_DICR => self
                .dma
                .as_ref()
                .map_or(0, |dma| dma.borrow().read_interrupt()),

            Self::TIMERS_START..=Self::TIMERS_END => {
                self.timers.as_ref().map_or(0, |timers| {
                    timers.borrow_mut().read_register(paddr - Self::TIMERS_START) as u32
                })
            }

            Self::GPU_GP0 => self
                .gpu
                .as_ref()
                .map_or(0, |gpu| gpu.borrow_mut().read_gpuread()),
            Self::GPU_GP1 => self.gpu.as_ref().map_or(0, |gpu| gpu.borrow().read_status()),

            _ => {
                log::debug!("Unhandled I/O read32 at 0x{:08X}", paddr);
                0
            }
        }
    }

    /// Write an I/O register (word)
    pub(super) fn write_io32(&mut self, paddr: u32, value: u32) {
        match paddr {
            Self::I_STAT => {
                if let Some(ic) = &self.interrupt_controller {
                    ic.borrow_mut().write_status(value);
                }
            }
            Self::I_MASK => {
                if let Some(ic) = &self.interrupt_controller {
                    ic.borrow_mut().write_mask(value);
                }
            }

            Self::DMA_CHANNELS_START..=Self::DMA_CHANNELS_END => {
                let Some(dma) = &self.dma else { return };
                let offset = paddr - Self::DMA_CHANNELS_START;
                let channel = (offset / 0x10) as usize;
                match offset & 0xF {
                    0x0 => dma.borrow_mut().write_madr(channel, value),
                    0x4 => dma.borrow_mut().write_bcr(channel, value),
                    0x8 => dma.borrow_mut().write_chcr(channel, value),
                    _ => log::debug!("Invalid DMA register write at 0x{:08X}", paddr),
                }
            }
            Self::DMA_DPCR => {
                if let Some(dma) = &self.dma {
                    dma.borrow_mut().write_control(value);
                }
            }
            Self::DMA_DICR => {
                if let Some(dma) = &self.dma {
                    dma.borrow_mut().write_interrupt(value);
                }
            }

            Self::TIMERS_START..=Self::TIMERS_END => {
                if let Some(timers) = &self.timers {
                    timers
                        .borrow_mut()
                        .write_register(paddr - Self::TIMERS_START, value as u16);
                }
            }

            Self::GPU_GP0 => {
                if let Some(gpu) = &self.gpu {
                    gpu.borrow_mut().write_gp0(value);
                }
            }
            Self::GPU_GP1 => {
                if let Some(gpu) = &self.gpu {
                    gpu.borrow_mut().write_gp1(value);
                }
            }

            _ => log::debug!(
                "Unhandled I/O write32 at 0x{:08X} = 0x{:08X}",
                paddr,
                value
            ),
        }
    }

    /// Read an I/O register (halfword)
    pub(super) fn read_io16(&self, paddr: u32) -> u16 {
        match paddr {
            Self::I_STAT | Self::I_MASK => self.read_io32(paddr) as u16,
            Self::TIMERS_START..=Self::TIMERS_END => self.timers.as_ref().map_or(0, |timers| {
                timers.borrow_mut().read_register(paddr - Self::TIMERS_START)
            }),
            _ => {
                log::debug!("Unhandled I/O read16 at 0x{:08X}", paddr);
                0
            }
        }
    }

    /// Write an I/O register (halfword)
    pub(super) fn write_io16(&mut self, paddr: u32, value: u16) {
        match paddr {
            Self::I_STAT | Self::I_MASK => self.write_io32(paddr, value as u32),
            Self::TIMERS_START..=Self::TIMERS_END => {
                if let Some(timers) = &self.timers {
                    timers
                        .borrow_mut()
                        .write_register(paddr - Self::TIMERS_START, value);
                }
            }
            _ => log::debug!(
                "Unhandled I/O write16 at 0x{:08X} = 0x{:04X}",
                paddr,
                value
            ),
        }
    }

    /// Read an I/O register (byte)
    pub(super) fn read_io8(&self, paddr: u32) -> u8 {
        match paddr {
            Self::CDROM_START..=Self::CDROM_END => self.cdrom.as_ref().map_or(0, |cdrom| {
                cdrom.borrow_mut().read_register(paddr - Self::CDROM_START)
            }),
            _ => {
                log::debug!("Unhandled I/O read8 at 0x{:08X}", paddr);
                0
            }
        }
    }

    /// Write an I/O register (byte)
    pub(super) fn write_io8(&mut self, paddr: u32, value: u8) {
        match paddr {
            Self::CDROM_START..=Self::CDROM_END => {
                if let Some(cdrom) = &self.cdrom {
                    cdrom
                        .borrow_mut()
                        .write_register(paddr - Self::CDROM_START, value);
                }
            }
            _ => log::debug!(
                "Unhandled I/O write8 at 0x{:08X} = 0x{:02X}",
                paddr,
                value
            ),
        }
    }
}
