// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! CPU interpreter tests
//!
//! Programs are written to RAM through the bus and executed from KSEG0
//! addresses. No peripherals are attached unless a test needs them.

use super::*;
use crate::core::interrupt::{InterruptController, IrqSource};
use std::cell::RefCell;
use std::rc::Rc;

/// Base address used by most test programs (KSEG0 RAM)
const BASE: u32 = 0x8000_0100;

fn setup() -> (Cpu, Bus) {
    let mut cpu = Cpu::new();
    let bus = Bus::new();
    cpu.set_pc(BASE);
    (cpu, bus)
}

fn load_program(bus: &mut Bus, base: u32, program: &[u32]) {
    for (i, &word) in program.iter().enumerate() {
        bus.write32(base + (i as u32) * 4, word);
    }
}

// ========== Register File Tests ==========

#[test]
fn test_r0_is_hardwired_to_zero() {
    let (mut cpu, mut bus) = setup();
    // ORI r0, r0, 0xFFFF
    load_program(&mut bus, BASE, &[0x3400_FFFF]);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(0), 0, "r0 must stay zero after any instruction");
}

#[test]
fn test_lui_ori_pair() {
    let (mut cpu, mut bus) = setup();
    // LUI r1, 0xDEAD; ORI r1, r1, 0xBEEF
    load_program(&mut bus, BASE, &[0x3C01_DEAD, 0x3421_BEEF]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(1), 0xDEAD_BEEF);
}

// ========== Arithmetic Tests ==========

#[test]
fn test_addi_overflow_scenario() {
    // Set r1 = 0x7FFFFFFF, execute ADDI r2, r1, 1.
    // Expect: Overflow taken, EPC = address of the ADDI, r2 unchanged,
    // CAUSE exception code field = 12.
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x7FFF_FFFF);
    cpu.set_reg(2, 0x5555_5555);
    // ADDI r2, r1, 1
    load_program(&mut bus, BASE, &[0x2022_0001]);

    let exception = cpu.step(&mut bus);

    assert_eq!(exception, Some(ExceptionCause::Overflow));
    assert_eq!(cpu.cop0_reg(14), BASE, "EPC must point at the ADDI");
    assert_eq!(cpu.reg(2), 0x5555_5555, "rt must not be committed");
    assert_eq!(
        (cpu.cop0_reg(13) >> 2) & 0x1F,
        12,
        "CAUSE exception code must be Ov (12)"
    );
    assert_eq!(cpu.pc(), 0x8000_0080, "control transfers to the vector");
}

#[test]
fn test_addiu_wraps_without_exception() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x7FFF_FFFF);
    // ADDIU r2, r1, 1
    load_program(&mut bus, BASE, &[0x2422_0001]);
    let exception = cpu.step(&mut bus);
    assert!(exception.is_none());
    assert_eq!(cpu.reg(2), 0x8000_0000);
}

#[test]
fn test_sub_overflow_leaves_rd_unmodified() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x8000_0000);
    cpu.set_reg(2, 1);
    cpu.set_reg(3, 0x1111_1111);
    // SUB r3, r1, r2
    load_program(&mut bus, BASE, &[0x0022_1822]);
    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::Overflow));
    assert_eq!(cpu.reg(3), 0x1111_1111);
}

#[test]
fn test_slt_signed_vs_sltu_unsigned() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0xFFFF_FFFF); // -1 signed, max unsigned
    cpu.set_reg(2, 1);
    // SLT r3, r1, r2 ; SLTU r4, r1, r2
    load_program(&mut bus, BASE, &[0x0022_182A, 0x0022_202B]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(3), 1, "-1 < 1 signed");
    assert_eq!(cpu.reg(4), 0, "0xFFFFFFFF is not < 1 unsigned");
}

// ========== Multiply/Divide Tests ==========

#[test]
fn test_mult_and_mflo_mfhi() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0xFFFF_FFFF); // -1
    cpu.set_reg(2, 16);
    // MULT r1, r2 ; MFLO r3 ; MFHI r4
    load_program(&mut bus, BASE, &[0x0022_0018, 0x0000_1812, 0x0000_2010]);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    // -1 * 16 = -16 = 0xFFFFFFF0 with sign-extended high word
    assert_eq!(cpu.reg(3), 0xFFFF_FFF0);
    assert_eq!(cpu.reg(4), 0xFFFF_FFFF);
}

#[test]
fn test_div_by_zero_boundary_results() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 42);
    cpu.set_reg(2, 0);
    // DIV r1, r2 ; MFLO r3 ; MFHI r4
    load_program(&mut bus, BASE, &[0x0022_001A, 0x0000_1812, 0x0000_2010]);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.reg(3), 0xFFFF_FFFF, "n/0 quotient is -1 for n >= 0");
    assert_eq!(cpu.reg(4), 42, "n/0 remainder is n");
}

// ========== Branch and Delay Slot Tests ==========

#[test]
fn test_beq_taken_executes_delay_slot() {
    // BEQ r0, r0, +3 branches to BASE+0x10; the ORI in the delay slot
    // still executes, the two after it are skipped.
    let (mut cpu, mut bus) = setup();
    load_program(
        &mut bus,
        BASE,
        &[
            0x1000_0003, // BEQ r0, r0, +3
            0x3405_1234, // ORI r5, r0, 0x1234  (delay slot)
            0x3405_DEAD, // ORI r5, r0, 0xDEAD  (skipped)
            0x3405_DEAD, // ORI r5, r0, 0xDEAD  (skipped)
            0x0000_0000, // NOP                 (branch target)
        ],
    );

    cpu.step(&mut bus);
    assert!(cpu.step(&mut bus).is_none());

    assert_eq!(cpu.reg(5), 0x1234, "delay slot must execute");
    assert_eq!(cpu.pc(), BASE + 0x10, "execution resumes at the target");
}

#[test]
fn test_bne_not_taken_falls_through() {
    let (mut cpu, mut bus) = setup();
    // BNE r0, r0, +4 ; ORI r5, r0, 1 ; ORI r6, r0, 2
    load_program(&mut bus, BASE, &[0x1400_0004, 0x3405_0001, 0x3406_0002]);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    assert_eq!(cpu.reg(5), 1);
    assert_eq!(cpu.reg(6), 2, "untaken branch falls straight through");
}

#[test]
fn test_bgezal_links_even_when_not_taken() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0xFFFF_FFFF); // negative, so BGEZAL is not taken
    // BGEZAL r1, +4 (rt = 0x11)
    load_program(&mut bus, BASE, &[0x0431_0004]);
    cpu.step(&mut bus);
    assert_eq!(
        cpu.reg(31),
        BASE + 8,
        "linking BCOND variants write r31 unconditionally"
    );
    assert_eq!(cpu.pc(), BASE + 4, "branch itself is not taken");
}

#[test]
fn test_bltz_taken_on_negative() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x8000_0000);
    // BLTZ r1, +3 ; NOP ; NOP ; NOP ; ORI r5, r0, 7
    load_program(
        &mut bus,
        BASE,
        &[0x0420_0003, 0, 0, 0, 0x3405_0007],
    );
    cpu.step(&mut bus);
    cpu.step(&mut bus); // delay slot
    cpu.step(&mut bus); // target: ORI
    assert_eq!(cpu.reg(5), 7);
}

// ========== Jump Tests ==========

#[test]
fn test_jal_writes_return_address() {
    let (mut cpu, mut bus) = setup();
    let target = (BASE + 0x40) & 0x0FFF_FFFF;
    // JAL target ; NOP
    load_program(&mut bus, BASE, &[0x0C00_0000 | (target >> 2), 0]);
    cpu.step(&mut bus);
    cpu.step(&mut bus); // delay slot
    assert_eq!(cpu.reg(31), BASE + 8, "JAL links PC+8");
    assert_eq!(cpu.pc(), BASE + 0x40);
}

#[test]
fn test_jr_round_trip() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(31, BASE + 0x20);
    // JR r31 ; NOP
    load_program(&mut bus, BASE, &[0x03E0_0008, 0]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), BASE + 0x20);
}

#[test]
fn test_jr_misaligned_target_raises_adel() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, BASE + 0x21);
    // JR r1
    load_program(&mut bus, BASE, &[0x0020_0008]);
    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::AddressErrorLoad));
    assert_eq!(cpu.cop0_reg(8), BASE + 0x21, "BadA holds the bad target");
}

// ========== Load/Store Tests ==========

#[test]
fn test_lwl_lwr_assemble_aligned_word() {
    // RAM at 0x200 holds bytes {AA, BB, CC, DD}; the canonical pair
    // LWL rt,3(base) / LWR rt,0(base) reassembles the full word.
    let (mut cpu, mut bus) = setup();
    for (i, b) in [0xAAu8, 0xBB, 0xCC, 0xDD].iter().enumerate() {
        bus.write8(0x200 + i as u32, *b);
    }
    cpu.set_reg(1, 0x200);
    // LWL r2, 3(r1) ; LWR r2, 0(r1)
    load_program(&mut bus, BASE, &[0x8822_0003, 0x9822_0000]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(2), 0xDDCC_BBAA, "bytes assemble little-endian");
}

#[test]
fn test_lwl_lwr_unaligned_word() {
    // Unaligned load across a word boundary: bytes at 0x201-0x204.
    let (mut cpu, mut bus) = setup();
    for (i, b) in [0xAAu8, 0xBB, 0xCC, 0xDD].iter().enumerate() {
        bus.write8(0x200 + i as u32, *b);
    }
    for (i, b) in [0x11u8, 0x22, 0x33, 0x44].iter().enumerate() {
        bus.write8(0x204 + i as u32, *b);
    }
    cpu.set_reg(1, 0x201);
    // LWR r2, 0(r1) ; LWL r2, 3(r1)
    load_program(&mut bus, BASE, &[0x9822_0000, 0x8822_0003]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(
        cpu.reg(2),
        0x11DD_CCBB,
        "unaligned word is bytes 0x201..0x205 in little-endian order"
    );
}

#[test]
fn test_swl_swr_store_round_trip() {
    // SWL/SWR mirror LWL/LWR: the pair writes the full register to an
    // aligned address, and the load pair reads it back.
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x200);
    cpu.set_reg(2, 0x1337_CAFE);
    // SWL r2, 3(r1) ; SWR r2, 0(r1) ; LWL r3, 3(r1) ; LWR r3, 0(r1)
    load_program(
        &mut bus,
        BASE,
        &[0xA822_0003, 0xB822_0000, 0x8823_0003, 0x9823_0000],
    );
    for _ in 0..4 {
        cpu.step(&mut bus);
    }
    assert_eq!(bus.read32(0x200), 0x1337_CAFE);
    assert_eq!(cpu.reg(3), 0x1337_CAFE);
}

#[test]
fn test_lh_sign_extends_and_lhu_does_not() {
    let (mut cpu, mut bus) = setup();
    bus.write16(0x300, 0x8001);
    cpu.set_reg(1, 0x300);
    // LH r2, 0(r1) ; LHU r3, 0(r1)
    load_program(&mut bus, BASE, &[0x8422_0000, 0x9423_0000]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(2), 0xFFFF_8001);
    assert_eq!(cpu.reg(3), 0x0000_8001);
}

#[test]
fn test_misaligned_lw_raises_adel_with_bada() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x102);
    // LW r2, 0(r1)
    load_program(&mut bus, BASE, &[0x8C22_0000]);
    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::AddressErrorLoad));
    assert_eq!(cpu.cop0_reg(8), 0x102);
}

#[test]
fn test_misaligned_sh_raises_ades() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x101);
    // SH r2, 0(r1)
    load_program(&mut bus, BASE, &[0xA422_0000]);
    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::AddressErrorStore));
}

#[test]
fn test_sw_suppressed_while_cache_isolated() {
    let (mut cpu, mut bus) = setup();
    bus.write32(0x400, 0x5555_5555);
    cpu.set_reg(1, 0x400);
    cpu.set_reg(2, 0xAAAA_AAAA);
    cpu.set_cop0_reg(12, 1 << 16); // SR.IsC
    // SW r2, 0(r1)
    load_program(&mut bus, BASE, &[0xAC22_0000]);
    cpu.step(&mut bus);
    assert_eq!(
        bus.read32(0x400),
        0x5555_5555,
        "SW must not reach memory while the cache is isolated"
    );
}

// ========== Exception Entry Tests ==========

#[test]
fn test_syscall_vectors_and_pushes_sr_stack() {
    let (mut cpu, mut bus) = setup();
    cpu.set_cop0_reg(12, 0x0000_0003); // IE + KU current
    load_program(&mut bus, BASE, &[0x0000_000C]); // SYSCALL
    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::Syscall));
    assert_eq!(cpu.pc(), 0x8000_0080);
    assert_eq!(
        cpu.cop0_reg(12) & 0x3F,
        0x0C,
        "mode stack pushed left by two bits"
    );
    assert_eq!((cpu.cop0_reg(13) >> 2) & 0x1F, 8);
}

#[test]
fn test_rfe_pops_sr_stack() {
    let (mut cpu, mut bus) = setup();
    cpu.set_cop0_reg(12, 0x0000_000C);
    // RFE
    load_program(&mut bus, BASE, &[0x4200_0010]);
    cpu.step(&mut bus);
    assert_eq!(cpu.cop0_reg(12) & 0x3F, 0x03, "stack popped right by two");
}

#[test]
fn test_exception_in_delay_slot_backs_epc_to_branch() {
    let (mut cpu, mut bus) = setup();
    load_program(
        &mut bus,
        BASE,
        &[
            0x1000_0002, // BEQ r0, r0, +2
            0x0000_000C, // SYSCALL (delay slot)
        ],
    );
    cpu.step(&mut bus);
    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::Syscall));
    assert_eq!(
        cpu.cop0_reg(14),
        BASE,
        "EPC must point at the branch, not the delay slot"
    );
    assert_ne!(cpu.cop0_reg(13) & (1 << 31), 0, "CAUSE.BD set");
}

#[test]
fn test_reserved_opcode_raises_ri() {
    let (mut cpu, mut bus) = setup();
    load_program(&mut bus, BASE, &[0xFC00_0000]); // opcode 0x3F
    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::ReservedInstruction));
}

// ========== Interrupt Tests ==========

#[test]
fn test_interrupt_taken_when_enabled() {
    let mut cpu = Cpu::new();
    let mut bus = Bus::new();
    let ic = Rc::new(RefCell::new(InterruptController::new()));
    bus.set_interrupt_controller(ic.clone());

    cpu.set_pc(BASE);
    load_program(&mut bus, BASE, &[0x3405_0001]); // ORI r5, r0, 1

    ic.borrow_mut().write_mask(IrqSource::Vblank.bit());
    ic.borrow_mut().request(IrqSource::Vblank);
    cpu.set_cop0_reg(12, 0x0000_0401); // IE + IM2

    let exception = cpu.step(&mut bus);
    assert_eq!(exception, Some(ExceptionCause::Interrupt));
    assert_eq!(cpu.cop0_reg(14), BASE, "EPC points at the pre-empted instruction");
    assert_eq!(cpu.reg(5), 0, "pre-empted instruction did not run");
    assert_ne!(cpu.cop0_reg(13) & (1 << 10), 0, "CAUSE.IP2 mirrored");
}

#[test]
fn test_interrupt_masked_by_sr() {
    let mut cpu = Cpu::new();
    let mut bus = Bus::new();
    let ic = Rc::new(RefCell::new(InterruptController::new()));
    bus.set_interrupt_controller(ic.clone());

    cpu.set_pc(BASE);
    load_program(&mut bus, BASE, &[0x3405_0001]);

    ic.borrow_mut().write_mask(IrqSource::Vblank.bit());
    ic.borrow_mut().request(IrqSource::Vblank);
    // IE set but IM2 clear
    cpu.set_cop0_reg(12, 0x0000_0001);

    let exception = cpu.step(&mut bus);
    assert!(exception.is_none(), "masked interrupt must not be taken");
    assert_eq!(cpu.reg(5), 1);
}

// ========== COP2 Move Tests ==========

#[test]
fn test_mtc2_mfc2_round_trip() {
    let (mut cpu, mut bus) = setup();
    cpu.set_reg(1, 0x1234);
    // MTC2 r1, gd0 ; MFC2 r2, gd0
    load_program(&mut bus, BASE, &[0x4881_0000, 0x4802_0000]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(2), 0x1234);
}

#[test]
fn test_lwc2_swc2_through_memory() {
    let (mut cpu, mut bus) = setup();
    bus.write32(0x500, 0x0042_0017);
    cpu.set_reg(1, 0x500);
    // LWC2 gd6, 0(r1) ; SWC2 gd6, 4(r1)
    load_program(&mut bus, BASE, &[0xC826_0000, 0xE826_0004]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(bus.read32(0x504), 0x0042_0017);
}
