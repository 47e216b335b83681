use super::*;
use crate::machine::{Interrupt, InterruptController};
use crate::{GbError, Result};

struct TestBus {
    memory: [u8; 0x10000],
    interrupts: InterruptController,
    writes: Vec<(u16, u8)>,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
            interrupts: InterruptController::new(),
            writes: Vec::new(),
        }
    }
}

impl TestBus {
    fn with_program(program: &[u8]) -> Self {
        let mut bus = Self::default();
        bus.memory[..program.len()].copy_from_slice(program);
        bus
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        self.writes.push((addr, value));
        self.memory[addr as usize] = value;
        Ok(())
    }

    fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }
}

fn cpu_at(pc: u16) -> Cpu {
    let mut cpu = Cpu::new();
    cpu.regs.pc = pc;
    cpu
}

fn step(cpu: &mut Cpu, bus: &mut TestBus) -> u32 {
    cpu.step(bus).expect("instruction should execute")
}

#[test]
fn boot_state_matches_dmg() {
    let cpu = Cpu::new();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.is_halted());
}

#[test]
fn nop_advances_pc() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::with_program(&[0x00]);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 1);
}

#[test]
fn ld_immediate_then_add_immediate() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::with_program(&[0x3E, 0x05, 0xC6, 0x03]);

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a, 8);
    assert_eq!(cpu.regs.f, 0x00);
    assert_eq!(cpu.regs.pc, 4);
}

#[test]
fn xor_a_clears_a_and_sets_only_zero() {
    let mut cpu = cpu_at(0);
    cpu.regs.a = 0x5A;
    cpu.regs.f = 0x70;
    let mut bus = TestBus::with_program(&[0xAF]);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(cpu.regs.f, 0x80);
}

#[test]
fn ld_16bit_and_basic_ld_indirect_work() {
    let mut cpu = cpu_at(0);
    cpu.regs.a = 0xAB;
    // LD BC,0x1234 ; LD (BC),A ; LD A,(BC)
    let mut bus = TestBus::with_program(&[0x01, 0x34, 0x12, 0x02, 0x0A]);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(cpu.regs.pc, 3);

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0x1234], 0xAB);

    cpu.regs.a = 0;
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a, 0xAB);
}

#[test]
fn ld_r_r_and_hl_inc_dec_forms_work() {
    let mut cpu = cpu_at(0);
    // LD HL,0xC000 ; LD B,0x12 ; LD (HL),B ; LD A,(HL+) ; LD (HL-),A ; LD C,A
    let mut bus =
        TestBus::with_program(&[0x21, 0x00, 0xC0, 0x06, 0x12, 0x70, 0x2A, 0x32, 0x4F]);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0xC000], 0x12);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.hl(), 0xC001);

    step(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC001], 0x12);
    assert_eq!(cpu.regs.hl(), 0xC000);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.c, 0x12);
}

#[test]
fn ldh_and_ld_c_forms_address_high_page() {
    let mut cpu = cpu_at(0);
    cpu.regs.a = 0x42;
    cpu.regs.c = 0x81;
    // LDH (0x80),A ; LD (C),A ; LDH A,(0x90)
    let mut bus = TestBus::with_program(&[0xE0, 0x80, 0xE2, 0xF0, 0x90]);
    bus.memory[0xFF90] = 0x99;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.memory[0xFF80], 0x42);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0xFF81], 0x42);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.a, 0x99);
}

#[test]
fn ld_a16_sp_stores_little_endian() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0xBEEF;
    let mut bus = TestBus::with_program(&[0x08, 0x00, 0xC1]);

    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(bus.memory[0xC100], 0xEF);
    assert_eq!(bus.memory[0xC101], 0xBE);
}

fn reference_alu(op: AluOp, a: u8, v: u8, carry: bool) -> (u8, u8) {
    let c = carry as i32;
    let (a32, v32) = (a as i32, v as i32);
    let (result, n, h, cy) = match op {
        AluOp::Add | AluOp::Adc => {
            let c = if op == AluOp::Adc { c } else { 0 };
            let r = a32 + v32 + c;
            (r, false, (a32 & 0xF) + (v32 & 0xF) + c > 0xF, r > 0xFF)
        }
        AluOp::Sub | AluOp::Sbc | AluOp::Cp => {
            let c = if op == AluOp::Sbc { c } else { 0 };
            let r = a32 - v32 - c;
            (r, true, (a32 & 0xF) - (v32 & 0xF) - c < 0, r < 0)
        }
        AluOp::And => (a32 & v32, false, true, false),
        AluOp::Xor => (a32 ^ v32, false, false, false),
        AluOp::Or => (a32 | v32, false, false, false),
    };
    let result = result as u8;
    let flags = ((result == 0) as u8) << 7 | (n as u8) << 6 | (h as u8) << 5 | (cy as u8) << 4;
    let a_out = if op == AluOp::Cp { a } else { result };
    (a_out, flags)
}

#[test]
fn alu_matches_reference_for_every_operand_pair() {
    let ops = [
        AluOp::Add,
        AluOp::Adc,
        AluOp::Sub,
        AluOp::Sbc,
        AluOp::And,
        AluOp::Xor,
        AluOp::Or,
        AluOp::Cp,
    ];
    let mut cpu = Cpu::new();
    for op in ops {
        for carry in [false, true] {
            for a in 0..=255u8 {
                for v in 0..=255u8 {
                    cpu.regs.a = a;
                    cpu.regs.f = if carry { 0x10 } else { 0x00 };
                    cpu.alu(op, v);
                    let expected = reference_alu(op, a, v, carry);
                    assert_eq!(
                        (cpu.regs.a, cpu.regs.f),
                        expected,
                        "{op:?} a={a:#04x} v={v:#04x} carry={carry}"
                    );
                }
            }
        }
    }
}

#[test]
fn inc_dec_8bit_update_flags_and_preserve_c() {
    let mut cpu = cpu_at(0);
    cpu.regs.b = 0x0F;
    cpu.regs.c = 0x10;
    cpu.regs.f = 0x10;
    // INC B ; DEC C
    let mut bus = TestBus::with_program(&[0x04, 0x0D]);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.b, 0x10);
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::C));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.c, 0x0F);
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn inc_hl_reads_then_writes_modified_value() {
    let mut cpu = cpu_at(0);
    cpu.regs.set_hl(0xC000);
    // INC (HL) ; DEC (HL) ; DEC (HL)
    let mut bus = TestBus::with_program(&[0x34, 0x35, 0x35]);
    bus.memory[0xC000] = 0xFF;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.writes, vec![(0xC000, 0x00)]);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC000], 0xFE);
    assert_eq!(bus.writes.len(), 3);
}

#[test]
fn inc_dec_16bit_and_add_hl_rr_behaviour() {
    let mut cpu = cpu_at(0);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.f = 0x80;
    cpu.regs.set_de(0x0000);
    // ADD HL,BC ; INC BC ; DEC DE
    let mut bus = TestBus::with_program(&[0x09, 0x03, 0x1B]);

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert!(cpu.get_flag(Flag::Z), "ADD HL,rr leaves Z alone");
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.bc(), 0x0002);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.de(), 0xFFFF);
}

#[test]
fn add_sp_r8_signed_and_flags() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0x0FFF;
    // ADD SP,+1 ; ADD SP,-1 ; LD HL,SP+2
    let mut bus = TestBus::with_program(&[0xE8, 0x01, 0xE8, 0xFF, 0xF8, 0x02]);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, 0x1000);
    assert_eq!(cpu.regs.f, 0x30);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.sp, 0x0FFF);
    assert_eq!(cpu.regs.f, 0x00);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.hl(), 0x1001);
    assert_eq!(cpu.regs.sp, 0x0FFF);
}

#[test]
fn push_and_pop_roundtrip_and_pop_af_masks_low_flags() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0xFFFE;
    cpu.regs.set_bc(0x12FF);
    // PUSH BC ; POP DE ; PUSH BC ; POP AF
    let mut bus = TestBus::with_program(&[0xC5, 0xD1, 0xC5, 0xF1]);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0xFF);
    assert_eq!(bus.memory[0xFFFD], 0x12);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.de(), 0x12FF);
    assert_eq!(cpu.regs.sp, 0xFFFE);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f, 0xF0);
}

#[test]
fn push_then_pop_restores_every_pair() {
    type Get = fn(&Registers) -> u16;
    type Set = fn(&mut Registers, u16);
    let pairs: [(u8, u8, Get, Set, u16); 4] = [
        (0xC5, 0xC1, Registers::bc, Registers::set_bc, 0xFFFF),
        (0xD5, 0xD1, Registers::de, Registers::set_de, 0xFFFF),
        (0xE5, 0xE1, Registers::hl, Registers::set_hl, 0xFFFF),
        (0xF5, 0xF1, Registers::af, Registers::set_af, 0xFFF0),
    ];

    for (push, pop, get, set, mask) in pairs {
        for value in [0x0000, 0x0001, 0x1234, 0x80F0, 0xABCD, 0xFFFF] {
            let mut cpu = cpu_at(0);
            cpu.regs.sp = 0xD000;
            set(&mut cpu.regs, value);
            let mut bus = TestBus::with_program(&[push, pop]);

            assert_eq!(step(&mut cpu, &mut bus), 16);
            assert_eq!(cpu.regs.sp, 0xCFFE);
            set(&mut cpu.regs, !value);

            assert_eq!(step(&mut cpu, &mut bus), 12);
            assert_eq!(get(&cpu.regs), value & mask, "pair {push:02X}/{pop:02X}");
            assert_eq!(cpu.regs.sp, 0xD000);
        }
    }
}

#[test]
fn prefix_and_holes_never_execute_silently() {
    let mut cpu = cpu_at(0x0300);
    let mut bus = TestBus::default();
    let err = cpu.execute(&mut bus, 0x0300, 0xCB, Op::Prefix, 0).unwrap_err();
    assert_eq!(
        err,
        GbError::InvalidOpcode {
            addr: 0x0300,
            opcode: 0xCB,
        }
    );
    assert!(cpu.is_locked());

    let mut cpu = cpu_at(0x0300);
    assert!(cpu.execute(&mut bus, 0x0300, 0xFD, Op::Invalid, 0).is_err());
    assert!(cpu.is_locked());
    assert!(bus.writes.is_empty());
}

#[test]
fn jr_reaches_both_ends_of_displacement_range() {
    let mut cpu = cpu_at(0x1000);
    let mut bus = TestBus::default();
    bus.memory[0x1000] = 0x18;
    bus.memory[0x1001] = 0x7F;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x1002 + 127);
    assert!(cpu.jumped());

    let mut cpu = cpu_at(0x1000);
    bus.memory[0x1001] = 0x80;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x1002 - 128);
}

#[test]
fn conditional_branches_charge_penalty_only_when_taken() {
    let mut cpu = cpu_at(0);
    // JR NZ,+2 (Z set: not taken) ; JR Z,+2 (taken)
    let mut bus = TestBus::with_program(&[0x20, 0x02, 0x28, 0x02]);
    cpu.set_flag(Flag::Z, true);

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc, 2);
    assert!(!cpu.jumped());
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc, 6);
}

#[test]
fn call_and_ret_roundtrip() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0xD000;
    // CALL 0x0010 ; ... 0x0010: RET NC (C set: skip) ; RET
    let mut bus = TestBus::with_program(&[0xCD, 0x10, 0x00]);
    bus.memory[0x10] = 0xD0;
    bus.memory[0x11] = 0xC9;
    cpu.set_flag(Flag::C, true);

    assert_eq!(step(&mut cpu, &mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x0010);
    assert_eq!(cpu.regs.sp, 0xCFFE);

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0011);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0003);
    assert_eq!(cpu.regs.sp, 0xD000);
}

#[test]
fn conditional_call_and_ret_taken_costs() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0xD000;
    // CALL C,0x0010 ; 0x0010: RET C
    let mut bus = TestBus::with_program(&[0xDC, 0x10, 0x00]);
    bus.memory[0x10] = 0xD8;
    cpu.set_flag(Flag::C, true);

    assert_eq!(step(&mut cpu, &mut bus), 24);
    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(cpu.regs.pc, 3);
}

#[test]
fn jp_hl_and_rst() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0xD000;
    cpu.regs.set_hl(0x0200);
    let mut bus = TestBus::with_program(&[0xE9]);
    bus.memory[0x0200] = 0xEF;

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(bus.memory[0xCFFE], 0x01);
    assert_eq!(bus.memory[0xCFFF], 0x02);
}

#[test]
fn daa_cpl_scf_ccf_behaviour() {
    let mut cpu = cpu_at(0);
    // LD A,0x45 ; ADD A,0x38 ; DAA ; CPL ; SCF ; CCF
    let mut bus = TestBus::with_program(&[0x3E, 0x45, 0xC6, 0x38, 0x27, 0x2F, 0x37, 0x3F]);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x83);
    assert!(!cpu.get_flag(Flag::C));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x7C);
    assert!(cpu.get_flag(Flag::N) && cpu.get_flag(Flag::H));

    step(&mut cpu, &mut bus);
    assert!(cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::N) && !cpu.get_flag(Flag::H));

    step(&mut cpu, &mut bus);
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn rotate_a_always_clears_zero() {
    let mut cpu = cpu_at(0);
    cpu.regs.a = 0x80;
    // RLCA ; RRA (C=1 from RLCA)
    let mut bus = TestBus::with_program(&[0x07, 0x1F]);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert_eq!(cpu.regs.f, 0x10);

    cpu.regs.a = 0x00;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x80);
    assert_eq!(cpu.regs.f, 0x00);
}

#[test]
fn cb_shift_register_and_memory() {
    let mut cpu = cpu_at(0);
    cpu.regs.b = 0x85;
    cpu.regs.set_hl(0xC000);
    // RLC B ; SWAP (HL) ; SRA B
    let mut bus = TestBus::with_program(&[0xCB, 0x00, 0xCB, 0x36, 0xCB, 0x28]);
    bus.memory[0xC000] = 0xF0;

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.b, 0x0B);
    assert_eq!(cpu.regs.f, 0x10);
    assert_eq!(cpu.regs.pc, 2);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x0F);
    assert_eq!(cpu.regs.f, 0x00);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.b, 0x05);
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn cb_bit_res_set_on_hl() {
    let mut cpu = cpu_at(0);
    cpu.regs.set_hl(0xC000);
    cpu.regs.f = 0x10;
    // BIT 0,(HL) ; SET 0,(HL) ; BIT 0,(HL) ; RES 7,(HL)
    let mut bus =
        TestBus::with_program(&[0xCB, 0x46, 0xCB, 0xC6, 0xCB, 0x46, 0xCB, 0xBE]);
    bus.memory[0xC000] = 0x80;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.f, 0xB0);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x81);

    step(&mut cpu, &mut bus);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::C));

    step(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC000], 0x01);
}

#[test]
fn invalid_opcodes_lock_the_core() {
    for opcode in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
        let mut cpu = cpu_at(0x0200);
        let mut bus = TestBus::default();
        bus.memory[0x0200] = opcode;

        let expected = GbError::InvalidOpcode {
            addr: 0x0200,
            opcode,
        };
        assert_eq!(cpu.step(&mut bus), Err(expected.clone()));
        assert!(cpu.is_locked());
        assert_eq!(cpu.step(&mut bus), Err(expected));
    }
}

#[test]
fn pending_interrupt_waits_while_ime_clear() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::with_program(&[0x00]);
    bus.interrupts.write_ie(0x01);
    bus.interrupts.request(Interrupt::VBlank);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 1);
    assert_eq!(bus.interrupts.pending_vector(), Some(0x40));
}

#[test]
fn interrupt_dispatch_pushes_pc_and_acknowledges() {
    let mut cpu = cpu_at(0x1234);
    cpu.regs.sp = 0xD000;
    let mut bus = TestBus::default();
    bus.interrupts.write_ie(0x1F);
    bus.interrupts.request(Interrupt::Timer);
    bus.interrupts.request(Interrupt::Joypad);
    bus.interrupts.enable_master();

    assert_eq!(step(&mut cpu, &mut bus), INTERRUPT_TICKS);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(cpu.regs.sp, 0xCFFE);
    assert_eq!(bus.memory[0xCFFE], 0x34);
    assert_eq!(bus.memory[0xCFFF], 0x12);
    assert!(!bus.interrupts.master_enabled());
    assert!(!bus.interrupts.is_requested(Interrupt::Timer));
    assert!(bus.interrupts.is_requested(Interrupt::Joypad));
}

#[test]
fn ei_takes_effect_after_following_instruction() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0xD000;
    // EI ; NOP ; NOP
    let mut bus = TestBus::with_program(&[0xFB, 0x00, 0x00]);
    bus.interrupts.write_ie(0x01);
    bus.interrupts.request(Interrupt::VBlank);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert!(!bus.interrupts.master_enabled());
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 2);
    assert!(bus.interrupts.master_enabled());

    assert_eq!(step(&mut cpu, &mut bus), INTERRUPT_TICKS);
    assert_eq!(cpu.regs.pc, 0x0040);
}

#[test]
fn di_cancels_a_pending_ei() {
    let mut cpu = cpu_at(0);
    // EI ; DI ; NOP ; NOP
    let mut bus = TestBus::with_program(&[0xFB, 0xF3, 0x00, 0x00]);
    for _ in 0..4 {
        step(&mut cpu, &mut bus);
    }
    assert!(!bus.interrupts.master_enabled());
}

#[test]
fn reti_enables_interrupts_immediately() {
    let mut cpu = cpu_at(0x0040);
    cpu.regs.sp = 0xCFFE;
    let mut bus = TestBus::default();
    bus.memory[0x0040] = 0xD9;
    bus.memory[0xCFFE] = 0x00;
    bus.memory[0xCFFF] = 0x02;

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert!(bus.interrupts.master_enabled());
}

#[test]
fn halt_idles_until_interrupt_then_services_it() {
    let mut cpu = cpu_at(0);
    cpu.regs.sp = 0xD000;
    let mut bus = TestBus::with_program(&[0x76, 0x00]);
    bus.interrupts.write_ie(0x04);
    bus.interrupts.enable_master();

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert!(cpu.is_halted());
    for _ in 0..3 {
        assert_eq!(step(&mut cpu, &mut bus), IDLE_TICKS);
        assert_eq!(cpu.regs.pc, 1);
    }

    bus.interrupts.request(Interrupt::Timer);
    assert_eq!(step(&mut cpu, &mut bus), INTERRUPT_TICKS);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(bus.memory[0xCFFE], 0x01);
}

#[test]
fn halt_with_ime_clear_wakes_without_servicing() {
    let mut cpu = cpu_at(0);
    // HALT ; INC A
    let mut bus = TestBus::with_program(&[0x76, 0x3C]);
    bus.interrupts.write_ie(0x01);
    cpu.regs.a = 0;

    step(&mut cpu, &mut bus);
    assert!(cpu.is_halted());
    assert_eq!(step(&mut cpu, &mut bus), IDLE_TICKS);

    bus.interrupts.request(Interrupt::VBlank);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.regs.pc, 2);
    assert!(bus.interrupts.is_requested(Interrupt::VBlank));
}

#[test]
fn halt_bug_repeats_next_byte() {
    let mut cpu = cpu_at(0);
    // HALT ; INC A ; NOP
    let mut bus = TestBus::with_program(&[0x76, 0x3C, 0x00]);
    bus.interrupts.write_ie(0x01);
    bus.interrupts.request(Interrupt::VBlank);
    cpu.regs.a = 0;

    step(&mut cpu, &mut bus);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.pc, 1);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 1);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 2);
    assert_eq!(cpu.regs.a, 2);
}

#[test]
fn stop_idles_until_a_joypad_line_goes_low() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::with_program(&[0x10, 0x00, 0x3C]);
    bus.memory[0xFF00] = 0xCF;
    cpu.regs.a = 0;

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert!(cpu.is_stopped());
    assert_eq!(cpu.regs.pc, 2);
    assert_eq!(step(&mut cpu, &mut bus), IDLE_TICKS);
    assert_eq!(cpu.regs.a, 0);

    bus.memory[0xFF00] = 0xCE;
    step(&mut cpu, &mut bus);
    assert!(!cpu.is_stopped());
    assert_eq!(cpu.regs.a, 1);
}
