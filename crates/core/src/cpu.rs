//! # 6502 CPU Implementation
//!
//! Register file, stack discipline, interrupt entry and the table-driven
//! dispatcher. Instruction bodies live in [`crate::instructions`].

use serde::{Deserialize, Serialize};

use crate::addressing;
use crate::bus::Bus;
use crate::error::{CpuError, Result};
use crate::opcodes::{self, Op};

pub const STACK_BASE: u16 = 0x0100;
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Stack pointer after reset, as expected by nestest-style conformance logs.
pub const RESET_SP: u8 = 0xFD;
/// Status after reset: IRQ-disable and Unused.
pub const RESET_STATUS: u8 = Flag::IrqDisable as u8 | Flag::Unused as u8;

/// Cycles spent entering an NMI or IRQ handler.
pub const INTERRUPT_CYCLES: u32 = 7;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flag {
    Carry      = 0b00000001,
    Zero       = 0b00000010,
    IrqDisable = 0b00000100,
    Decimal    = 0b00001000,
    Break      = 0b00010000,
    Unused     = 0b00100000,
    Overflow   = 0b01000000,
    Negative   = 0b10000000,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Irq,
}

/// What a single call to [`Cpu::step`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction ran to completion.
    Executed { cycles: u32 },
    /// The processor is locked up on a JAM opcode and will not advance
    /// until reset.
    Halted { opcode: u8 },
}

impl StepOutcome {
    pub fn cycles(&self) -> u32 {
        match *self {
            StepOutcome::Executed { cycles } => cycles,
            StepOutcome::Halted { .. } => 0,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, StepOutcome::Halted { .. })
    }
}

/// Plain snapshot of the programmer-visible registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub p: u8,
}

pub struct Cpu {
    pub(crate) pc: u16,
    pub(crate) sp: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    jammed: Option<u8>,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            pc: 0,
            sp: 0,
            a: 0,
            x: 0,
            y: 0,
            p: 0,
            jammed: None,
        }
    }

    /// Put the CPU into its documented post-reset state and load PC from the
    /// reset vector. The stack pointer is set to `$FD` directly instead of
    /// modelling the three suppressed pushes.
    pub fn reset<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = RESET_SP;
        self.p = RESET_STATUS;
        self.jammed = None;
        self.pc = bus.read_word(RESET_VECTOR);
        log::debug!("Reset: PC=${:04X}", self.pc);
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn status(&self) -> u8 {
        self.p
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.get_flag(flag)
    }

    /// The JAM opcode the processor locked up on, if any.
    pub fn jammed(&self) -> Option<u8> {
        self.jammed
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            p: self.p,
        }
    }

    pub fn set_registers(&mut self, registers: Registers) {
        self.a = registers.a;
        self.x = registers.x;
        self.y = registers.y;
        self.sp = registers.sp;
        self.pc = registers.pc;
        self.p = registers.p;
    }

    /// Execute exactly one instruction and report its cycle cost.
    ///
    /// Undefined opcodes return [`CpuError::UndefinedOpcode`] with PC left on
    /// the offending byte. JAM opcodes lock the processor up; every later call
    /// returns [`StepOutcome::Halted`] until [`Cpu::reset`].
    pub fn step<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<StepOutcome> {
        if let Some(opcode) = self.jammed {
            return Ok(StepOutcome::Halted { opcode });
        }

        let pc = self.pc;
        let opcode = bus.read(pc);
        let instruction = opcodes::lookup(opcode);

        match instruction.op {
            Op::Jam => {
                log::warn!("CPU jammed on opcode 0x{:02X} at PC: 0x{:04X}", opcode, pc);
                self.jammed = Some(opcode);
                return Ok(StepOutcome::Halted { opcode });
            }
            Op::Undefined => {
                log::warn!(
                    "Undefined instruction: 0x{:02X} ({}) at PC: 0x{:04X}",
                    opcode,
                    instruction.mnemonic,
                    pc
                );
                return Err(CpuError::UndefinedOpcode { opcode, pc });
            }
            _ => {}
        }

        let operand = addressing::resolve(instruction.mode, pc, self.x, self.y, bus);
        self.pc = pc.wrapping_add(instruction.len());

        let mut cycles = instruction.cycles as u32 + self.execute(instruction.op, operand, bus);
        if instruction.page_penalty && operand.page_crossed {
            cycles += 1;
        }

        Ok(StepOutcome::Executed { cycles })
    }

    /// Enter the NMI or IRQ handler. Only valid between steps. Returns the
    /// cycles spent, which is zero when an IRQ is masked or the CPU is jammed.
    pub fn interrupt<B: Bus + ?Sized>(&mut self, bus: &mut B, kind: Interrupt) -> u32 {
        if self.jammed.is_some() {
            return 0;
        }
        if kind == Interrupt::Irq && self.get_flag(Flag::IrqDisable) {
            return 0;
        }

        self.push_word(bus, self.pc);
        let status = (self.p | Flag::Unused as u8) & !(Flag::Break as u8);
        self.push_byte(bus, status);
        self.set_flag(Flag::IrqDisable, true);

        let vector = match kind {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq => IRQ_VECTOR,
        };
        self.pc = bus.read_word(vector);
        log::debug!("{:?}: jumping to ${:04X}", kind, self.pc);
        INTERRUPT_CYCLES
    }

    pub(crate) fn pop_byte<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE + self.sp as u16)
    }

    pub(crate) fn push_byte<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_BASE + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pop_word<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pop_byte(bus) as u16;
        let hi = self.pop_byte(bus) as u16;
        (hi << 8) | lo
    }

    pub(crate) fn push_word<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u16) {
        self.push_byte(bus, (value >> 8) as u8);
        self.push_byte(bus, value as u8);
    }

    pub(crate) fn get_flag(&self, flag: Flag) -> bool {
        (self.p & flag as u8) != 0
    }

    pub(crate) fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.p |= flag as u8;
        } else {
            self.p &= !(flag as u8);
        }
    }

    pub(crate) fn set_flags_zero_negative(&mut self, value: u8) {
        self.set_flag(Flag::Zero, value == 0);
        self.set_flag(Flag::Negative, value & 0b1000_0000 != 0);
    }

    pub(crate) fn carry(&self) -> u8 {
        if self.get_flag(Flag::Carry) {
            1
        } else {
            0
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatBus;

    /// Counts every bus access so tests can check the access contract.
    struct CountingBus {
        inner: FlatBus,
        reads: usize,
        writes: usize,
    }

    impl CountingBus {
        fn new() -> Self {
            CountingBus {
                inner: FlatBus::new(),
                reads: 0,
                writes: 0,
            }
        }
    }

    impl Bus for CountingBus {
        fn read(&mut self, address: u16) -> u8 {
            self.reads += 1;
            self.inner.read(address)
        }

        fn write(&mut self, address: u16, value: u8) {
            self.writes += 1;
            self.inner.write(address, value)
        }
    }

    fn cpu_at(bus: &mut FlatBus, pc: u16, program: &[u8]) -> Cpu {
        bus.load(pc, program).unwrap();
        let mut cpu = Cpu::new();
        cpu.reset(bus);
        cpu.pc = pc;
        cpu
    }

    #[test]
    fn test_reset_state() {
        let mut bus = FlatBus::new();
        bus.poke(0xFFFC, 0x34);
        bus.poke(0xFFFD, 0x12);
        let mut cpu = Cpu::new();
        cpu.a = 0x55;
        cpu.x = 0x66;
        cpu.y = 0x77;
        cpu.reset(&mut bus);
        assert_eq!(cpu.pc(), 0x1234);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.status(), 0x24);
        assert_eq!((cpu.a, cpu.x, cpu.y), (0, 0, 0));
    }

    #[test]
    fn test_zero_negative_for_every_byte() {
        let mut cpu = Cpu::new();
        for v in 0..=255u8 {
            cpu.p = Flag::Carry as u8 | Flag::Overflow as u8;
            cpu.set_flags_zero_negative(v);
            assert_eq!(cpu.get_flag(Flag::Negative), v & 0x80 != 0);
            assert_eq!(cpu.get_flag(Flag::Zero), v == 0);
            assert!(cpu.get_flag(Flag::Carry));
            assert!(cpu.get_flag(Flag::Overflow));
        }
    }

    #[test]
    fn test_stack_push_pop_wraps() {
        let mut bus = FlatBus::new();
        let mut cpu = Cpu::new();
        cpu.sp = 0x00;
        cpu.push_byte(&mut bus, 0xAB);
        assert_eq!(cpu.sp, 0xFF);
        assert_eq!(bus.peek(0x0100), 0xAB);
        cpu.push_byte(&mut bus, 0xCD);
        assert_eq!(bus.peek(0x01FF), 0xCD);
        assert_eq!(cpu.pop_byte(&mut bus), 0xCD);
        assert_eq!(cpu.pop_byte(&mut bus), 0xAB);
        assert_eq!(cpu.sp, 0x00);
    }

    #[test]
    fn test_push_word_order() {
        let mut bus = FlatBus::new();
        let mut cpu = Cpu::new();
        cpu.sp = 0xFD;
        cpu.push_word(&mut bus, 0x1234);
        assert_eq!(bus.peek(0x01FD), 0x12);
        assert_eq!(bus.peek(0x01FC), 0x34);
        assert_eq!(cpu.pop_word(&mut bus), 0x1234);
    }

    #[test]
    fn test_undefined_opcode_is_an_error() {
        let mut bus = FlatBus::new();
        let mut cpu = cpu_at(&mut bus, 0x8000, &[0xAB, 0x00]);
        let err = cpu.step(&mut bus).unwrap_err();
        assert!(matches!(
            err,
            CpuError::UndefinedOpcode {
                opcode: 0xAB,
                pc: 0x8000
            }
        ));
        assert_eq!(cpu.pc(), 0x8000);
    }

    #[test]
    fn test_jam_halts_until_reset() {
        let mut bus = FlatBus::new();
        let mut cpu = cpu_at(&mut bus, 0x8000, &[0x02, 0xEA]);
        assert_eq!(
            cpu.step(&mut bus).unwrap(),
            StepOutcome::Halted { opcode: 0x02 }
        );
        assert_eq!(
            cpu.step(&mut bus).unwrap(),
            StepOutcome::Halted { opcode: 0x02 }
        );
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.jammed(), Some(0x02));

        cpu.reset(&mut bus);
        assert_eq!(cpu.jammed(), None);
    }

    #[test]
    fn test_register_only_instruction_touches_no_memory() {
        let mut bus = CountingBus::new();
        bus.inner.load(0x8000, &[0xAA]).unwrap();
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        cpu.step(&mut bus).unwrap();
        assert_eq!(bus.reads, 1);
        assert_eq!(bus.writes, 0);
    }

    #[test]
    fn test_read_modify_write_writes_once() {
        let mut bus = CountingBus::new();
        bus.inner.load(0x8000, &[0xE6, 0x10]).unwrap();
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        cpu.step(&mut bus).unwrap();
        assert_eq!(bus.writes, 1);
        // opcode, operand byte, data read
        assert_eq!(bus.reads, 3);
        assert_eq!(bus.inner.peek(0x0010), 0x01);
    }

    #[test]
    fn test_nmi_entry() {
        let mut bus = FlatBus::new();
        bus.poke(0xFFFA, 0x00);
        bus.poke(0xFFFB, 0x90);
        let mut cpu = cpu_at(&mut bus, 0x8123, &[]);
        cpu.p = 0x20 | Flag::Carry as u8;
        assert_eq!(cpu.interrupt(&mut bus, Interrupt::Nmi), 7);
        assert_eq!(cpu.pc(), 0x9000);
        assert_eq!(cpu.sp(), 0xFA);
        assert_eq!(bus.peek(0x01FD), 0x81);
        assert_eq!(bus.peek(0x01FC), 0x23);
        assert_eq!(bus.peek(0x01FB), 0x21);
        assert!(cpu.flag(Flag::IrqDisable));
    }

    #[test]
    fn test_irq_masked() {
        let mut bus = FlatBus::new();
        let mut cpu = cpu_at(&mut bus, 0x8000, &[]);
        assert!(cpu.flag(Flag::IrqDisable));
        assert_eq!(cpu.interrupt(&mut bus, Interrupt::Irq), 0);
        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFD);
    }

    #[test]
    fn test_irq_taken_when_enabled() {
        let mut bus = FlatBus::new();
        bus.poke(0xFFFE, 0x00);
        bus.poke(0xFFFF, 0xA0);
        let mut cpu = cpu_at(&mut bus, 0x8000, &[]);
        cpu.set_flag(Flag::IrqDisable, false);
        assert_eq!(cpu.interrupt(&mut bus, Interrupt::Irq), 7);
        assert_eq!(cpu.pc(), 0xA000);
        assert_eq!(bus.peek(0x01FB) & Flag::Break as u8, 0);
    }

    #[test]
    fn test_registers_round_trip() {
        let mut cpu = Cpu::new();
        let regs = Registers {
            a: 1,
            x: 2,
            y: 3,
            sp: 4,
            pc: 0x0506,
            p: 0x24,
        };
        cpu.set_registers(regs);
        assert_eq!(cpu.registers(), regs);
    }
}
