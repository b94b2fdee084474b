// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! GPU command port and rendering tests

use super::*;

// ========== GP0 State Machine Tests ==========

#[test]
fn test_fill_rectangle_scenario() {
    // GP0 0x02FF8040, 0x00100010, 0x00040004: a 4x4 block at (16,16)
    // filled with the 15-bit encoding of RGB (0x40, 0x80, 0xFF).
    let mut gpu = Gpu::new();
    gpu.write_gp0(0x02FF_8040);
    gpu.write_gp0(0x0010_0010);
    gpu.write_gp0(0x0004_0004);

    let expected = Color {
        r: 0x40,
        g: 0x80,
        b: 0xFF,
    }
    .to_rgb15();

    for y in 16..20 {
        for x in 16..20 {
            assert_eq!(gpu.read_vram(x, y), expected, "pixel ({}, {})", x, y);
        }
    }
    // Nothing outside the block changed
    assert_eq!(gpu.read_vram(15, 16), 0);
    assert_eq!(gpu.read_vram(20, 16), 0);
    assert_eq!(gpu.read_vram(16, 15), 0);
    assert_eq!(gpu.read_vram(16, 20), 0);
}

#[test]
fn test_command_completion_returns_to_idle() {
    let mut gpu = Gpu::new();
    gpu.write_gp0(0x0200_0000);
    assert_eq!(gpu.port_state, Gp0State::ReceivingParameters);
    gpu.write_gp0(0);
    gpu.write_gp0(0);
    assert_eq!(
        gpu.port_state,
        Gp0State::AwaitingCommand,
        "GP0 returns to AwaitingCommand after a command completes"
    );
    assert!(gpu.params.is_empty(), "parameter FIFO drained");
}

#[test]
fn test_nop_and_clear_cache_stay_idle() {
    let mut gpu = Gpu::new();
    gpu.write_gp0(0x0000_0000);
    gpu.write_gp0(0x0100_0000);
    assert_eq!(gpu.port_state, Gp0State::AwaitingCommand);
}

#[test]
fn test_polygon_parameter_counts() {
    // Each command buffers the documented number of words and then
    // returns to idle: 0x28 mono quad (5 total), 0x2C textured quad
    // (9), 0x30 shaded tri (6), 0x38 shaded quad (8).
    for (cmd, total_words) in [
        (0x28u32, 5u32),
        (0x2C, 9),
        (0x30, 6),
        (0x38, 8),
        (0x20, 4),
        (0x3C, 12),
    ] {
        let mut gpu = Gpu::new();
        gpu.write_gp0(cmd << 24);
        for _ in 0..total_words - 1 {
            assert_eq!(
                gpu.port_state,
                Gp0State::ReceivingParameters,
                "command 0x{:02X} still buffering",
                cmd
            );
            gpu.write_gp0(0);
        }
        assert_eq!(
            gpu.port_state,
            Gp0State::AwaitingCommand,
            "command 0x{:02X} complete after {} words",
            cmd,
            total_words
        );
    }
}

#[test]
fn test_rectangle_parameter_counts() {
    // 0x65 textured variable rect (4 total), 0x68 1x1 dot (2).
    for (cmd, total_words) in [(0x65u32, 4u32), (0x68, 2), (0x60, 3), (0x7C, 3)] {
        let mut gpu = Gpu::new();
        gpu.write_gp0(cmd << 24);
        for _ in 0..total_words - 1 {
            gpu.write_gp0(0);
        }
        assert_eq!(
            gpu.port_state,
            Gp0State::AwaitingCommand,
            "command 0x{:02X} complete after {} words",
            cmd,
            total_words
        );
    }
}

#[test]
fn test_mono_quad_draws_rectangle_region() {
    let mut gpu = Gpu::new();
    // White quad covering (10,10)-(20,20)
    gpu.write_gp0(0x28FF_FFFF);
    gpu.write_gp0(0x000A_000A);
    gpu.write_gp0(0x000A_0014);
    gpu.write_gp0(0x0014_000A);
    gpu.write_gp0(0x0014_0014);

    assert_eq!(gpu.read_vram(12, 12), 0x7FFF, "interior of the quad");
    assert_eq!(gpu.read_vram(25, 25), 0, "outside the quad");
}

#[test]
fn test_dot_command_writes_single_pixel() {
    let mut gpu = Gpu::new();
    gpu.write_gp0(0x68FF_FFFF);
    gpu.write_gp0(0x0020_0030); // (0x30, 0x20)
    assert_eq!(gpu.read_vram(0x30, 0x20), 0x7FFF);
    assert_eq!(gpu.read_vram(0x31, 0x20), 0);
    assert_eq!(gpu.read_vram(0x30, 0x21), 0);
}

#[test]
fn test_drawing_offset_translates_vertices() {
    let mut gpu = Gpu::new();
    gpu.write_gp0(0xE500_0000 | (5 << 11) | 5); // offset (5, 5)
    gpu.write_gp0(0x68FF_FFFF);
    gpu.write_gp0(0x0000_0000);
    assert_eq!(gpu.read_vram(5, 5), 0x7FFF, "dot lands offset by (5,5)");
}

#[test]
fn test_drawing_area_clips_polygons() {
    let mut gpu = Gpu::new();
    // Clip to (0,0)-(15,15)
    gpu.write_gp0(0xE300_0000);
    gpu.write_gp0(0xE400_0000 | (15 << 10) | 15);
    // White quad covering (0,0)-(32,32)
    gpu.write_gp0(0x28FF_FFFF);
    gpu.write_gp0(0x0000_0000);
    gpu.write_gp0(0x0000_0020);
    gpu.write_gp0(0x0020_0000);
    gpu.write_gp0(0x0020_0020);

    assert_eq!(gpu.read_vram(10, 10), 0x7FFF);
    assert_eq!(gpu.read_vram(16, 16), 0, "clipped by the drawing area");
}

// ========== VRAM Transfer Tests ==========

#[test]
fn test_cpu_to_vram_transfer() {
    let mut gpu = Gpu::new();
    // 2x2 copy to (10, 20)
    gpu.write_gp0(0xA000_0000);
    gpu.write_gp0(0x0014_000A);
    gpu.write_gp0(0x0002_0002);
    assert_eq!(gpu.port_state, Gp0State::ReceivingData);

    gpu.write_gp0(0x2222_1111);
    gpu.write_gp0(0x4444_3333);

    assert_eq!(gpu.read_vram(10, 20), 0x1111);
    assert_eq!(gpu.read_vram(11, 20), 0x2222);
    assert_eq!(gpu.read_vram(10, 21), 0x3333);
    assert_eq!(gpu.read_vram(11, 21), 0x4444);
    assert_eq!(gpu.port_state, Gp0State::AwaitingCommand);
}

#[test]
fn test_vram_to_cpu_transfer_via_gpuread() {
    let mut gpu = Gpu::new();
    gpu.write_vram(10, 20, 0x1111);
    gpu.write_vram(11, 20, 0x2222);
    gpu.write_vram(10, 21, 0x3333);
    gpu.write_vram(11, 21, 0x4444);

    gpu.write_gp0(0xC000_0000);
    gpu.write_gp0(0x0014_000A);
    gpu.write_gp0(0x0002_0002);
    assert_eq!(gpu.port_state, Gp0State::TransferringData);

    assert_eq!(gpu.read_gpuread(), 0x2222_1111);
    assert_eq!(gpu.read_gpuread(), 0x4444_3333);
    assert_eq!(gpu.port_state, Gp0State::AwaitingCommand);
}

#[test]
fn test_transfer_wraps_row_at_width() {
    let mut gpu = Gpu::new();
    // 3x2 transfer: x wraps back to the origin after each row
    gpu.write_gp0(0xA000_0000);
    gpu.write_gp0(0x0000_0000);
    gpu.write_gp0(0x0002_0003);

    gpu.write_gp0(0x0002_0001);
    gpu.write_gp0(0x0004_0003);
    gpu.write_gp0(0x0006_0005);

    assert_eq!(gpu.read_vram(0, 0), 1);
    assert_eq!(gpu.read_vram(1, 0), 2);
    assert_eq!(gpu.read_vram(2, 0), 3);
    assert_eq!(gpu.read_vram(0, 1), 4);
    assert_eq!(gpu.read_vram(1, 1), 5);
    assert_eq!(gpu.read_vram(2, 1), 6);
}

// ========== GP1 Tests ==========

#[test]
fn test_gp1_reset_establishes_status() {
    let mut gpu = Gpu::new();
    gpu.write_gp0(0xE100_000F);
    gpu.write_gp1(0x0000_0000);
    assert_eq!(gpu.gpustat, Gpu::GPUSTAT_RESET);
    assert_eq!(gpu.port_state, Gp0State::AwaitingCommand);
}

#[test]
fn test_gp1_reset_preserves_vram() {
    let mut gpu = Gpu::new();
    gpu.write_vram(0, 0, 0x1234);
    gpu.write_gp1(0x0000_0000);
    assert_eq!(gpu.read_vram(0, 0), 0x1234, "GP1 reset must not clear VRAM");
}

#[test]
fn test_gp1_command_buffer_reset_aborts_parameters() {
    let mut gpu = Gpu::new();
    gpu.write_gp0(0x2800_0000); // mono quad, expecting 4 more words
    gpu.write_gp0(0);
    gpu.write_gp1(0x0100_0000);
    assert_eq!(gpu.port_state, Gp0State::AwaitingCommand);
    assert!(gpu.params.is_empty());
}

#[test]
fn test_status_read_decorates_ready_flags() {
    let gpu = Gpu::new();
    let status = gpu.read_status();
    assert_eq!(status & Gpu::GPUSTAT_RESET, Gpu::GPUSTAT_RESET, "true bits kept");
    assert_ne!(status & (1 << 26), 0, "ready to receive command");
    assert_ne!(status & (1 << 27), 0, "ready to send VRAM");
    assert_ne!(status & (1 << 28), 0, "ready to receive DMA block");
}

#[test]
fn test_gp1_get_info_answers_drawing_state() {
    let mut gpu = Gpu::new();
    gpu.write_gp0(0xE300_0000 | (7 << 10) | 3); // area top-left (3, 7)
    gpu.write_gp1(0x1000_0003);
    assert_eq!(gpu.gpuread, (7 << 10) | 3);
}

#[test]
fn test_gp1_get_info_sub7_leaves_gpuread() {
    let mut gpu = Gpu::new();
    gpu.gpuread = 0xCAFE_BABE;
    gpu.write_gp1(0x1000_0007);
    assert_eq!(gpu.gpuread, 0xCAFE_BABE, "sub 0x07 must not touch GPUREAD");
}

// ========== Textured Drawing Tests ==========

#[test]
fn test_textured_rect_skips_transparent_texels() {
    let mut gpu = Gpu::new();
    // 15-bit texpage at (64, 0) via draw mode: page_x=1, depth=2
    gpu.write_gp0(0xE100_0000 | (2 << 7) | 1);
    // Texels: one opaque, one transparent
    gpu.write_vram(64, 0, 0x7C1F);
    gpu.write_vram(65, 0, 0x0000);
    // Background to prove transparency
    gpu.write_vram(200, 100, 0x0333);
    gpu.write_vram(201, 100, 0x0333);

    // Textured variable-size rect at (200, 100), 2x1, uv (0,0)
    gpu.write_gp0(0x6500_0000);
    gpu.write_gp0(0x0064_00C8);
    gpu.write_gp0(0x0000_0000);
    gpu.write_gp0(0x0001_0002);

    assert_eq!(gpu.read_vram(200, 100), 0x7C1F, "opaque texel written raw");
    assert_eq!(
        gpu.read_vram(201, 100),
        0x0333,
        "transparent texel leaves the framebuffer untouched"
    );
}
