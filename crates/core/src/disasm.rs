//! # Disassembler
//! 逆アセンブル、16進ダンプ、実行トレース行の生成

use crate::addressing::Mode;
use crate::cpu::Registers;
use crate::opcodes;

/// Format one instruction. `bytes[0]` is the opcode at `address`; missing
/// operand bytes are shown as `??`.
pub fn format_instruction(address: u16, bytes: &[u8]) -> String {
    let Some(&opcode) = bytes.first() else {
        return String::from("???");
    };
    let instruction = opcodes::lookup(opcode);
    let byte = |i: usize| bytes.get(i).copied();
    let lo = || byte(1).map_or("??".to_string(), |b| format!("{:02X}", b));
    let word = || match (byte(1), byte(2)) {
        (Some(low), Some(high)) => format!("{:02X}{:02X}", high, low),
        _ => "????".to_string(),
    };

    let operand = match instruction.mode {
        Mode::Implied => String::new(),
        Mode::Accumulator => "A".to_string(),
        Mode::Immediate => format!("#${}", lo()),
        Mode::ZeroPage => format!("${}", lo()),
        Mode::ZeroPageX => format!("${},X", lo()),
        Mode::ZeroPageY => format!("${},Y", lo()),
        Mode::Relative => match byte(1) {
            Some(displacement) => {
                let target = address
                    .wrapping_add(2)
                    .wrapping_add(displacement as i8 as u16);
                format!("${:04X}", target)
            }
            None => "$????".to_string(),
        },
        Mode::Absolute => format!("${}", word()),
        Mode::AbsoluteX => format!("${},X", word()),
        Mode::AbsoluteY => format!("${},Y", word()),
        Mode::Indirect => format!("(${})", word()),
        Mode::IndirectX => format!("(${},X)", lo()),
        Mode::IndirectY => format!("(${}),Y", lo()),
    };

    let marker = if instruction.documented { "" } else { "*" };
    if operand.is_empty() {
        format!("{}{}", marker, instruction.mnemonic)
    } else {
        format!("{}{} {}", marker, instruction.mnemonic, operand)
    }
}

/// 逆アセンブル。`memory[0]` is the byte at `base`.
pub fn disassemble(memory: &[u8], base: u16, count: usize) -> Vec<(u16, String)> {
    let mut result = Vec::new();
    let mut offset = 0usize;

    for _ in 0..count {
        if offset >= memory.len() {
            break;
        }

        let address = base.wrapping_add(offset as u16);
        let size = opcodes::lookup(memory[offset]).len() as usize;
        let end = (offset + size).min(memory.len());
        result.push((address, format_instruction(address, &memory[offset..end])));
        offset += size;
    }

    result
}

/// 16進ダンプ。`memory[0]` is the byte at `base`.
pub fn hex_dump(memory: &[u8], base: u16) -> String {
    let mut result = String::new();

    for (row, chunk) in memory.chunks(16).enumerate() {
        // アドレス
        let address = base.wrapping_add((row * 16) as u16);
        result.push_str(&format!("{:04X}: ", address));

        // 16進ダンプ
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => result.push_str(&format!("{:02X} ", b)),
                None => result.push_str("   "),
            }
            if i == 7 {
                result.push(' ');
            }
        }

        // ASCII表示
        result.push_str(" |");
        for &b in chunk {
            if b.is_ascii_graphic() || b == b' ' {
                result.push(b as char);
            } else {
                result.push('.');
            }
        }
        result.push_str("|\n");
    }

    result
}

/// nestest-style log line for the instruction about to execute.
///
/// `bytes` holds the instruction starting with its opcode; `cycles` is the
/// running total before the instruction executes.
pub fn trace_line(registers: &Registers, bytes: &[u8], cycles: u64) -> String {
    let size = bytes
        .first()
        .map_or(1, |&op| opcodes::lookup(op).len() as usize)
        .min(bytes.len());
    let raw = bytes[..size]
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");

    let asm = format_instruction(registers.pc, &bytes[..size]);
    // Undocumented opcodes carry a '*' that sits in the separator column
    let asm = if asm.starts_with('*') {
        asm
    } else {
        format!(" {}", asm)
    };

    format!(
        "{:04X}  {:<8} {:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        registers.pc, raw, asm, registers.a, registers.x, registers.y, registers.p, registers.sp, cycles
    )
}
