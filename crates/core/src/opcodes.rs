//! # Opcode Table
//!
//! One entry per opcode byte: mnemonic, operation, addressing mode, base
//! cycle count and whether an indexed page crossing costs an extra cycle.
//! The table is a constant; nothing about it is configurable at runtime.

use crate::addressing::Mode;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,

    // Stable undocumented opcodes
    Alr,
    Anc,
    Arr,
    Dcp,
    Isc,
    Las,
    Lax,
    Rla,
    Rra,
    Sax,
    Sbx,
    Slo,
    Sre,

    /// Processor lock-up
    Jam,
    /// Known opcode whose behaviour is unstable on real silicon
    Undefined,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub op: Op,
    pub mode: Mode,
    /// Base cycles, before page-crossing and branch penalties.
    pub cycles: u8,
    /// Indexed reads that cross a page boundary take one extra cycle.
    pub page_penalty: bool,
    pub documented: bool,
}

impl Instruction {
    /// Total size in bytes, opcode included.
    pub const fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }

    pub const fn operand_len(&self) -> u16 {
        self.mode.operand_len()
    }

    const fn page(mut self) -> Self {
        self.page_penalty = true;
        self
    }

    const fn undocumented(mut self) -> Self {
        self.documented = false;
        self
    }
}

const fn i(mnemonic: &'static str, op: Op, mode: Mode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        op,
        mode,
        cycles,
        page_penalty: false,
        documented: true,
    }
}

/// Look up the table entry for an opcode byte.
pub fn lookup(opcode: u8) -> &'static Instruction {
    &OPCODES[opcode as usize]
}

pub static OPCODES: [Instruction; 256] = {
    use Mode::*;
    use Op::*;
    [
        /* 0x00 */ i("BRK", Brk, Implied, 7),
        /* 0x01 */ i("ORA", Ora, IndirectX, 6),
        /* 0x02 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x03 */ i("SLO", Slo, IndirectX, 8).undocumented(),
        /* 0x04 */ i("NOP", Nop, ZeroPage, 3).undocumented(),
        /* 0x05 */ i("ORA", Ora, ZeroPage, 3),
        /* 0x06 */ i("ASL", Asl, ZeroPage, 5),
        /* 0x07 */ i("SLO", Slo, ZeroPage, 5).undocumented(),
        /* 0x08 */ i("PHP", Php, Implied, 3),
        /* 0x09 */ i("ORA", Ora, Immediate, 2),
        /* 0x0A */ i("ASL", Asl, Accumulator, 2),
        /* 0x0B */ i("ANC", Anc, Immediate, 2).undocumented(),
        /* 0x0C */ i("NOP", Nop, Absolute, 4).undocumented(),
        /* 0x0D */ i("ORA", Ora, Absolute, 4),
        /* 0x0E */ i("ASL", Asl, Absolute, 6),
        /* 0x0F */ i("SLO", Slo, Absolute, 6).undocumented(),
        /* 0x10 */ i("BPL", Bpl, Relative, 2),
        /* 0x11 */ i("ORA", Ora, IndirectY, 5).page(),
        /* 0x12 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x13 */ i("SLO", Slo, IndirectY, 8).undocumented(),
        /* 0x14 */ i("NOP", Nop, ZeroPageX, 4).undocumented(),
        /* 0x15 */ i("ORA", Ora, ZeroPageX, 4),
        /* 0x16 */ i("ASL", Asl, ZeroPageX, 6),
        /* 0x17 */ i("SLO", Slo, ZeroPageX, 6).undocumented(),
        /* 0x18 */ i("CLC", Clc, Implied, 2),
        /* 0x19 */ i("ORA", Ora, AbsoluteY, 4).page(),
        /* 0x1A */ i("NOP", Nop, Implied, 2).undocumented(),
        /* 0x1B */ i("SLO", Slo, AbsoluteY, 7).undocumented(),
        /* 0x1C */ i("NOP", Nop, AbsoluteX, 4).page().undocumented(),
        /* 0x1D */ i("ORA", Ora, AbsoluteX, 4).page(),
        /* 0x1E */ i("ASL", Asl, AbsoluteX, 7),
        /* 0x1F */ i("SLO", Slo, AbsoluteX, 7).undocumented(),
        /* 0x20 */ i("JSR", Jsr, Absolute, 6),
        /* 0x21 */ i("AND", And, IndirectX, 6),
        /* 0x22 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x23 */ i("RLA", Rla, IndirectX, 8).undocumented(),
        /* 0x24 */ i("BIT", Bit, ZeroPage, 3),
        /* 0x25 */ i("AND", And, ZeroPage, 3),
        /* 0x26 */ i("ROL", Rol, ZeroPage, 5),
        /* 0x27 */ i("RLA", Rla, ZeroPage, 5).undocumented(),
        /* 0x28 */ i("PLP", Plp, Implied, 4),
        /* 0x29 */ i("AND", And, Immediate, 2),
        /* 0x2A */ i("ROL", Rol, Accumulator, 2),
        /* 0x2B */ i("ANC", Anc, Immediate, 2).undocumented(),
        /* 0x2C */ i("BIT", Bit, Absolute, 4),
        /* 0x2D */ i("AND", And, Absolute, 4),
        /* 0x2E */ i("ROL", Rol, Absolute, 6),
        /* 0x2F */ i("RLA", Rla, Absolute, 6).undocumented(),
        /* 0x30 */ i("BMI", Bmi, Relative, 2),
        /* 0x31 */ i("AND", And, IndirectY, 5).page(),
        /* 0x32 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x33 */ i("RLA", Rla, IndirectY, 8).undocumented(),
        /* 0x34 */ i("NOP", Nop, ZeroPageX, 4).undocumented(),
        /* 0x35 */ i("AND", And, ZeroPageX, 4),
        /* 0x36 */ i("ROL", Rol, ZeroPageX, 6),
        /* 0x37 */ i("RLA", Rla, ZeroPageX, 6).undocumented(),
        /* 0x38 */ i("SEC", Sec, Implied, 2),
        /* 0x39 */ i("AND", And, AbsoluteY, 4).page(),
        /* 0x3A */ i("NOP", Nop, Implied, 2).undocumented(),
        /* 0x3B */ i("RLA", Rla, AbsoluteY, 7).undocumented(),
        /* 0x3C */ i("NOP", Nop, AbsoluteX, 4).page().undocumented(),
        /* 0x3D */ i("AND", And, AbsoluteX, 4).page(),
        /* 0x3E */ i("ROL", Rol, AbsoluteX, 7),
        /* 0x3F */ i("RLA", Rla, AbsoluteX, 7).undocumented(),
        /* 0x40 */ i("RTI", Rti, Implied, 6),
        /* 0x41 */ i("EOR", Eor, IndirectX, 6),
        /* 0x42 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x43 */ i("SRE", Sre, IndirectX, 8).undocumented(),
        /* 0x44 */ i("NOP", Nop, ZeroPage, 3).undocumented(),
        /* 0x45 */ i("EOR", Eor, ZeroPage, 3),
        /* 0x46 */ i("LSR", Lsr, ZeroPage, 5),
        /* 0x47 */ i("SRE", Sre, ZeroPage, 5).undocumented(),
        /* 0x48 */ i("PHA", Pha, Implied, 3),
        /* 0x49 */ i("EOR", Eor, Immediate, 2),
        /* 0x4A */ i("LSR", Lsr, Accumulator, 2),
        /* 0x4B */ i("ALR", Alr, Immediate, 2).undocumented(),
        /* 0x4C */ i("JMP", Jmp, Absolute, 3),
        /* 0x4D */ i("EOR", Eor, Absolute, 4),
        /* 0x4E */ i("LSR", Lsr, Absolute, 6),
        /* 0x4F */ i("SRE", Sre, Absolute, 6).undocumented(),
        /* 0x50 */ i("BVC", Bvc, Relative, 2),
        /* 0x51 */ i("EOR", Eor, IndirectY, 5).page(),
        /* 0x52 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x53 */ i("SRE", Sre, IndirectY, 8).undocumented(),
        /* 0x54 */ i("NOP", Nop, ZeroPageX, 4).undocumented(),
        /* 0x55 */ i("EOR", Eor, ZeroPageX, 4),
        /* 0x56 */ i("LSR", Lsr, ZeroPageX, 6),
        /* 0x57 */ i("SRE", Sre, ZeroPageX, 6).undocumented(),
        /* 0x58 */ i("CLI", Cli, Implied, 2),
        /* 0x59 */ i("EOR", Eor, AbsoluteY, 4).page(),
        /* 0x5A */ i("NOP", Nop, Implied, 2).undocumented(),
        /* 0x5B */ i("SRE", Sre, AbsoluteY, 7).undocumented(),
        /* 0x5C */ i("NOP", Nop, AbsoluteX, 4).page().undocumented(),
        /* 0x5D */ i("EOR", Eor, AbsoluteX, 4).page(),
        /* 0x5E */ i("LSR", Lsr, AbsoluteX, 7),
        /* 0x5F */ i("SRE", Sre, AbsoluteX, 7).undocumented(),
        /* 0x60 */ i("RTS", Rts, Implied, 6),
        /* 0x61 */ i("ADC", Adc, IndirectX, 6),
        /* 0x62 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x63 */ i("RRA", Rra, IndirectX, 8).undocumented(),
        /* 0x64 */ i("NOP", Nop, ZeroPage, 3).undocumented(),
        /* 0x65 */ i("ADC", Adc, ZeroPage, 3),
        /* 0x66 */ i("ROR", Ror, ZeroPage, 5),
        /* 0x67 */ i("RRA", Rra, ZeroPage, 5).undocumented(),
        /* 0x68 */ i("PLA", Pla, Implied, 4),
        /* 0x69 */ i("ADC", Adc, Immediate, 2),
        /* 0x6A */ i("ROR", Ror, Accumulator, 2),
        /* 0x6B */ i("ARR", Arr, Immediate, 2).undocumented(),
        /* 0x6C */ i("JMP", Jmp, Indirect, 5),
        /* 0x6D */ i("ADC", Adc, Absolute, 4),
        /* 0x6E */ i("ROR", Ror, Absolute, 6),
        /* 0x6F */ i("RRA", Rra, Absolute, 6).undocumented(),
        /* 0x70 */ i("BVS", Bvs, Relative, 2),
        /* 0x71 */ i("ADC", Adc, IndirectY, 5).page(),
        /* 0x72 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x73 */ i("RRA", Rra, IndirectY, 8).undocumented(),
        /* 0x74 */ i("NOP", Nop, ZeroPageX, 4).undocumented(),
        /* 0x75 */ i("ADC", Adc, ZeroPageX, 4),
        /* 0x76 */ i("ROR", Ror, ZeroPageX, 6),
        /* 0x77 */ i("RRA", Rra, ZeroPageX, 6).undocumented(),
        /* 0x78 */ i("SEI", Sei, Implied, 2),
        /* 0x79 */ i("ADC", Adc, AbsoluteY, 4).page(),
        /* 0x7A */ i("NOP", Nop, Implied, 2).undocumented(),
        /* 0x7B */ i("RRA", Rra, AbsoluteY, 7).undocumented(),
        /* 0x7C */ i("NOP", Nop, AbsoluteX, 4).page().undocumented(),
        /* 0x7D */ i("ADC", Adc, AbsoluteX, 4).page(),
        /* 0x7E */ i("ROR", Ror, AbsoluteX, 7),
        /* 0x7F */ i("RRA", Rra, AbsoluteX, 7).undocumented(),
        /* 0x80 */ i("NOP", Nop, Immediate, 2).undocumented(),
        /* 0x81 */ i("STA", Sta, IndirectX, 6),
        /* 0x82 */ i("NOP", Nop, Immediate, 2).undocumented(),
        /* 0x83 */ i("SAX", Sax, IndirectX, 6).undocumented(),
        /* 0x84 */ i("STY", Sty, ZeroPage, 3),
        /* 0x85 */ i("STA", Sta, ZeroPage, 3),
        /* 0x86 */ i("STX", Stx, ZeroPage, 3),
        /* 0x87 */ i("SAX", Sax, ZeroPage, 3).undocumented(),
        /* 0x88 */ i("DEY", Dey, Implied, 2),
        /* 0x89 */ i("NOP", Nop, Immediate, 2).undocumented(),
        /* 0x8A */ i("TXA", Txa, Implied, 2),
        /* 0x8B */ i("ANE", Undefined, Immediate, 2).undocumented(),
        /* 0x8C */ i("STY", Sty, Absolute, 4),
        /* 0x8D */ i("STA", Sta, Absolute, 4),
        /* 0x8E */ i("STX", Stx, Absolute, 4),
        /* 0x8F */ i("SAX", Sax, Absolute, 4).undocumented(),
        /* 0x90 */ i("BCC", Bcc, Relative, 2),
        /* 0x91 */ i("STA", Sta, IndirectY, 6),
        /* 0x92 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0x93 */ i("SHA", Undefined, IndirectY, 6).undocumented(),
        /* 0x94 */ i("STY", Sty, ZeroPageX, 4),
        /* 0x95 */ i("STA", Sta, ZeroPageX, 4),
        /* 0x96 */ i("STX", Stx, ZeroPageY, 4),
        /* 0x97 */ i("SAX", Sax, ZeroPageY, 4).undocumented(),
        /* 0x98 */ i("TYA", Tya, Implied, 2),
        /* 0x99 */ i("STA", Sta, AbsoluteY, 5),
        /* 0x9A */ i("TXS", Txs, Implied, 2),
        /* 0x9B */ i("TAS", Undefined, AbsoluteY, 5).undocumented(),
        /* 0x9C */ i("SHY", Undefined, AbsoluteX, 5).undocumented(),
        /* 0x9D */ i("STA", Sta, AbsoluteX, 5),
        /* 0x9E */ i("SHX", Undefined, AbsoluteY, 5).undocumented(),
        /* 0x9F */ i("SHA", Undefined, AbsoluteY, 5).undocumented(),
        /* 0xA0 */ i("LDY", Ldy, Immediate, 2),
        /* 0xA1 */ i("LDA", Lda, IndirectX, 6),
        /* 0xA2 */ i("LDX", Ldx, Immediate, 2),
        /* 0xA3 */ i("LAX", Lax, IndirectX, 6).undocumented(),
        /* 0xA4 */ i("LDY", Ldy, ZeroPage, 3),
        /* 0xA5 */ i("LDA", Lda, ZeroPage, 3),
        /* 0xA6 */ i("LDX", Ldx, ZeroPage, 3),
        /* 0xA7 */ i("LAX", Lax, ZeroPage, 3).undocumented(),
        /* 0xA8 */ i("TAY", Tay, Implied, 2),
        /* 0xA9 */ i("LDA", Lda, Immediate, 2),
        /* 0xAA */ i("TAX", Tax, Implied, 2),
        /* 0xAB */ i("LXA", Undefined, Immediate, 2).undocumented(),
        /* 0xAC */ i("LDY", Ldy, Absolute, 4),
        /* 0xAD */ i("LDA", Lda, Absolute, 4),
        /* 0xAE */ i("LDX", Ldx, Absolute, 4),
        /* 0xAF */ i("LAX", Lax, Absolute, 4).undocumented(),
        /* 0xB0 */ i("BCS", Bcs, Relative, 2),
        /* 0xB1 */ i("LDA", Lda, IndirectY, 5).page(),
        /* 0xB2 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0xB3 */ i("LAX", Lax, IndirectY, 5).page().undocumented(),
        /* 0xB4 */ i("LDY", Ldy, ZeroPageX, 4),
        /* 0xB5 */ i("LDA", Lda, ZeroPageX, 4),
        /* 0xB6 */ i("LDX", Ldx, ZeroPageY, 4),
        /* 0xB7 */ i("LAX", Lax, ZeroPageY, 4).undocumented(),
        /* 0xB8 */ i("CLV", Clv, Implied, 2),
        /* 0xB9 */ i("LDA", Lda, AbsoluteY, 4).page(),
        /* 0xBA */ i("TSX", Tsx, Implied, 2),
        /* 0xBB */ i("LAS", Las, AbsoluteY, 4).page().undocumented(),
        /* 0xBC */ i("LDY", Ldy, AbsoluteX, 4).page(),
        /* 0xBD */ i("LDA", Lda, AbsoluteX, 4).page(),
        /* 0xBE */ i("LDX", Ldx, AbsoluteY, 4).page(),
        /* 0xBF */ i("LAX", Lax, AbsoluteY, 4).page().undocumented(),
        /* 0xC0 */ i("CPY", Cpy, Immediate, 2),
        /* 0xC1 */ i("CMP", Cmp, IndirectX, 6),
        /* 0xC2 */ i("NOP", Nop, Immediate, 2).undocumented(),
        /* 0xC3 */ i("DCP", Dcp, IndirectX, 8).undocumented(),
        /* 0xC4 */ i("CPY", Cpy, ZeroPage, 3),
        /* 0xC5 */ i("CMP", Cmp, ZeroPage, 3),
        /* 0xC6 */ i("DEC", Dec, ZeroPage, 5),
        /* 0xC7 */ i("DCP", Dcp, ZeroPage, 5).undocumented(),
        /* 0xC8 */ i("INY", Iny, Implied, 2),
        /* 0xC9 */ i("CMP", Cmp, Immediate, 2),
        /* 0xCA */ i("DEX", Dex, Implied, 2),
        /* 0xCB */ i("SBX", Sbx, Immediate, 2).undocumented(),
        /* 0xCC */ i("CPY", Cpy, Absolute, 4),
        /* 0xCD */ i("CMP", Cmp, Absolute, 4),
        /* 0xCE */ i("DEC", Dec, Absolute, 6),
        /* 0xCF */ i("DCP", Dcp, Absolute, 6).undocumented(),
        /* 0xD0 */ i("BNE", Bne, Relative, 2),
        /* 0xD1 */ i("CMP", Cmp, IndirectY, 5).page(),
        /* 0xD2 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0xD3 */ i("DCP", Dcp, IndirectY, 8).undocumented(),
        /* 0xD4 */ i("NOP", Nop, ZeroPageX, 4).undocumented(),
        /* 0xD5 */ i("CMP", Cmp, ZeroPageX, 4),
        /* 0xD6 */ i("DEC", Dec, ZeroPageX, 6),
        /* 0xD7 */ i("DCP", Dcp, ZeroPageX, 6).undocumented(),
        /* 0xD8 */ i("CLD", Cld, Implied, 2),
        /* 0xD9 */ i("CMP", Cmp, AbsoluteY, 4).page(),
        /* 0xDA */ i("NOP", Nop, Implied, 2).undocumented(),
        /* 0xDB */ i("DCP", Dcp, AbsoluteY, 7).undocumented(),
        /* 0xDC */ i("NOP", Nop, AbsoluteX, 4).page().undocumented(),
        /* 0xDD */ i("CMP", Cmp, AbsoluteX, 4).page(),
        /* 0xDE */ i("DEC", Dec, AbsoluteX, 7),
        /* 0xDF */ i("DCP", Dcp, AbsoluteX, 7).undocumented(),
        /* 0xE0 */ i("CPX", Cpx, Immediate, 2),
        /* 0xE1 */ i("SBC", Sbc, IndirectX, 6),
        /* 0xE2 */ i("NOP", Nop, Immediate, 2).undocumented(),
        /* 0xE3 */ i("ISC", Isc, IndirectX, 8).undocumented(),
        /* 0xE4 */ i("CPX", Cpx, ZeroPage, 3),
        /* 0xE5 */ i("SBC", Sbc, ZeroPage, 3),
        /* 0xE6 */ i("INC", Inc, ZeroPage, 5),
        /* 0xE7 */ i("ISC", Isc, ZeroPage, 5).undocumented(),
        /* 0xE8 */ i("INX", Inx, Implied, 2),
        /* 0xE9 */ i("SBC", Sbc, Immediate, 2),
        /* 0xEA */ i("NOP", Nop, Implied, 2),
        /* 0xEB */ i("SBC", Sbc, Immediate, 2).undocumented(),
        /* 0xEC */ i("CPX", Cpx, Absolute, 4),
        /* 0xED */ i("SBC", Sbc, Absolute, 4),
        /* 0xEE */ i("INC", Inc, Absolute, 6),
        /* 0xEF */ i("ISC", Isc, Absolute, 6).undocumented(),
        /* 0xF0 */ i("BEQ", Beq, Relative, 2),
        /* 0xF1 */ i("SBC", Sbc, IndirectY, 5).page(),
        /* 0xF2 */ i("JAM", Jam, Implied, 0).undocumented(),
        /* 0xF3 */ i("ISC", Isc, IndirectY, 8).undocumented(),
        /* 0xF4 */ i("NOP", Nop, ZeroPageX, 4).undocumented(),
        /* 0xF5 */ i("SBC", Sbc, ZeroPageX, 4),
        /* 0xF6 */ i("INC", Inc, ZeroPageX, 6),
        /* 0xF7 */ i("ISC", Isc, ZeroPageX, 6).undocumented(),
        /* 0xF8 */ i("SED", Sed, Implied, 2),
        /* 0xF9 */ i("SBC", Sbc, AbsoluteY, 4).page(),
        /* 0xFA */ i("NOP", Nop, Implied, 2).undocumented(),
        /* 0xFB */ i("ISC", Isc, AbsoluteY, 7).undocumented(),
        /* 0xFC */ i("NOP", Nop, AbsoluteX, 4).page().undocumented(),
        /* 0xFD */ i("SBC", Sbc, AbsoluteX, 4).page(),
        /* 0xFE */ i("INC", Inc, AbsoluteX, 7),
        /* 0xFF */ i("ISC", Isc, AbsoluteX, 7).undocumented(),
    ]
};
