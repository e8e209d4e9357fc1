//! # Addressing Modes
//!
//! Effective-address resolution for every 6502 addressing mode. Resolution
//! only reads operand bytes and pointers; it never touches registers and never
//! charges cycles. Page crossings are reported back in [`Resolved`] so the
//! dispatcher can decide whether the instruction pays the extra cycle.

use crate::bus::Bus;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
}

impl Mode {
    /// Number of bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            Mode::Implied | Mode::Accumulator => 0,
            Mode::Immediate
            | Mode::ZeroPage
            | Mode::ZeroPageX
            | Mode::ZeroPageY
            | Mode::Relative
            | Mode::IndirectX
            | Mode::IndirectY => 1,
            Mode::Absolute | Mode::AbsoluteX | Mode::AbsoluteY | Mode::Indirect => 2,
        }
    }
}

/// Where an instruction's operand lives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    None,
    Accumulator,
    Address(u16),
}

/// Result of resolving one instruction's operand. Consumed by the dispatcher
/// within the same step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub target: Target,
    pub page_crossed: bool,
}

impl Resolved {
    fn at(address: u16) -> Self {
        Resolved {
            target: Target::Address(address),
            page_crossed: false,
        }
    }

    fn crossing(base: u16, index: u8) -> Self {
        Resolved {
            target: Target::Address(offset(base, index)),
            page_crossed: cross(base, index),
        }
    }

    /// Effective address, if the operand lives in memory.
    pub fn address(&self) -> Option<u16> {
        match self.target {
            Target::Address(address) => Some(address),
            _ => None,
        }
    }
}

/// Resolve the operand of the instruction whose opcode sits at `pc`.
///
/// For [`Mode::Relative`] the target is the branch destination and
/// `page_crossed` compares it with the address of the next instruction.
/// For [`Mode::Indirect`] the target is the jump destination, including the
/// NMOS bug where a pointer at `$xxFF` takes its high byte from `$xx00`.
pub fn resolve<B: Bus + ?Sized>(mode: Mode, pc: u16, x: u8, y: u8, bus: &mut B) -> Resolved {
    let operand = pc.wrapping_add(1);

    match mode {
        Mode::Implied => Resolved {
            target: Target::None,
            page_crossed: false,
        },
        Mode::Accumulator => Resolved {
            target: Target::Accumulator,
            page_crossed: false,
        },
        Mode::Immediate => Resolved::at(operand),
        Mode::ZeroPage => Resolved::at(bus.read(operand) as u16),
        Mode::ZeroPageX => Resolved::at(low_byte(offset(bus.read(operand), x))),
        Mode::ZeroPageY => Resolved::at(low_byte(offset(bus.read(operand), y))),
        Mode::Relative => {
            let displacement = bus.read(operand) as i8;
            let next = pc.wrapping_add(2);
            let destination = next.wrapping_add(displacement as u16);
            Resolved {
                target: Target::Address(destination),
                page_crossed: high_byte(next) != high_byte(destination),
            }
        }
        Mode::Absolute => Resolved::at(bus.read_word(operand)),
        Mode::AbsoluteX => Resolved::crossing(bus.read_word(operand), x),
        Mode::AbsoluteY => Resolved::crossing(bus.read_word(operand), y),
        Mode::Indirect => {
            let i = bus.read_word(operand);
            Resolved::at(bus.read_noncontinuous_word(i, high_byte(i) | low_byte(i.wrapping_add(1))))
        }
        Mode::IndirectX => {
            let i = offset(bus.read(operand), x);
            Resolved::at(bus.read_noncontinuous_word(low_byte(i), low_byte(i.wrapping_add(1))))
        }
        Mode::IndirectY => {
            let i = bus.read(operand);
            let base = bus.read_noncontinuous_word(i as u16, low_byte(offset(i, 1)));
            Resolved::crossing(base, y)
        }
    }
}

fn cross(base: u16, offset: u8) -> bool {
    (base & 0xFF) + offset as u16 > 0xFF
}

fn offset<T: Into<u16>>(base: T, offset: u8) -> u16 {
    base.into().wrapping_add(offset as u16)
}

fn low_byte<T: Into<u16>>(value: T) -> u16 {
    value.into() & 0xFF
}

fn high_byte(value: u16) -> u16 {
    value & 0xFF00
}
