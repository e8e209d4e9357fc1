//! # Instruction Execution
//!
//! One method per instruction family. Each receives the already resolved
//! operand and touches the bus at most once for the data read and once for
//! the write. PC has already been advanced past the instruction when these
//! run, so control-flow instructions simply overwrite it.

use crate::addressing::{Resolved, Target};
use crate::bus::Bus;
use crate::cpu::{Cpu, Flag, IRQ_VECTOR};
use crate::opcodes::Op;

impl Cpu {
    /// Run `op` against `operand`. Returns cycles beyond the table's base
    /// count that only the instruction itself can know about (taken
    /// branches).
    pub(crate) fn execute<B: Bus + ?Sized>(&mut self, op: Op, operand: Resolved, bus: &mut B) -> u32 {
        let target = operand.target;

        match op {
            // Loads
            Op::Lda => {
                let value = self.read_operand(target, bus);
                self.lda(value);
            }
            Op::Ldx => {
                let value = self.read_operand(target, bus);
                self.set_flags_zero_negative(value);
                self.x = value;
            }
            Op::Ldy => {
                let value = self.read_operand(target, bus);
                self.set_flags_zero_negative(value);
                self.y = value;
            }

            // Stores
            Op::Sta => self.write_operand(target, self.a, bus),
            Op::Stx => self.write_operand(target, self.x, bus),
            Op::Sty => self.write_operand(target, self.y, bus),

            // Arithmetic
            Op::Adc => {
                let value = self.read_operand(target, bus);
                self.adc(value);
            }
            Op::Sbc => {
                let value = self.read_operand(target, bus);
                self.sbc(value);
            }

            // Comparisons
            Op::Cmp => {
                let value = self.read_operand(target, bus);
                self.compare(self.a, value);
            }
            Op::Cpx => {
                let value = self.read_operand(target, bus);
                self.compare(self.x, value);
            }
            Op::Cpy => {
                let value = self.read_operand(target, bus);
                self.compare(self.y, value);
            }

            // Bitwise operations
            Op::And => {
                let value = self.read_operand(target, bus);
                self.and(value);
            }
            Op::Ora => {
                let value = self.read_operand(target, bus);
                self.ora(value);
            }
            Op::Eor => {
                let value = self.read_operand(target, bus);
                self.eor(value);
            }
            Op::Bit => {
                let value = self.read_operand(target, bus);
                self.bit(value);
            }

            // Shifts and rotates
            Op::Asl => {
                self.asl(target, bus);
            }
            Op::Lsr => {
                self.lsr(target, bus);
            }
            Op::Rol => {
                self.rol(target, bus);
            }
            Op::Ror => {
                self.ror(target, bus);
            }

            // Increments and decrements
            Op::Inc => {
                self.inc(target, bus);
            }
            Op::Dec => {
                self.dec(target, bus);
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_flags_zero_negative(self.x);
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_flags_zero_negative(self.x);
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                self.set_flags_zero_negative(self.y);
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.set_flags_zero_negative(self.y);
            }

            // Register moves
            Op::Tax => {
                self.x = self.a;
                self.set_flags_zero_negative(self.x);
            }
            Op::Tay => {
                self.y = self.a;
                self.set_flags_zero_negative(self.y);
            }
            Op::Txa => {
                self.a = self.x;
                self.set_flags_zero_negative(self.a);
            }
            Op::Tya => {
                self.a = self.y;
                self.set_flags_zero_negative(self.a);
            }
            Op::Tsx => {
                self.x = self.sp;
                self.set_flags_zero_negative(self.x);
            }
            Op::Txs => self.sp = self.x,

            // Flag operations
            Op::Clc => self.set_flag(Flag::Carry, false),
            Op::Sec => self.set_flag(Flag::Carry, true),
            Op::Cli => self.set_flag(Flag::IrqDisable, false),
            Op::Sei => self.set_flag(Flag::IrqDisable, true),
            Op::Clv => self.set_flag(Flag::Overflow, false),
            Op::Cld => self.set_flag(Flag::Decimal, false),
            Op::Sed => self.set_flag(Flag::Decimal, true),

            // Branches
            Op::Bpl => return self.branch(!self.get_flag(Flag::Negative), operand),
            Op::Bmi => return self.branch(self.get_flag(Flag::Negative), operand),
            Op::Bvc => return self.branch(!self.get_flag(Flag::Overflow), operand),
            Op::Bvs => return self.branch(self.get_flag(Flag::Overflow), operand),
            Op::Bcc => return self.branch(!self.get_flag(Flag::Carry), operand),
            Op::Bcs => return self.branch(self.get_flag(Flag::Carry), operand),
            Op::Bne => return self.branch(!self.get_flag(Flag::Zero), operand),
            Op::Beq => return self.branch(self.get_flag(Flag::Zero), operand),

            // Jumps and procedure calls
            Op::Jmp => {
                if let Some(address) = operand.address() {
                    self.pc = address;
                }
            }
            Op::Jsr => self.jsr(operand, bus),
            Op::Rts => self.pc = self.pop_word(bus).wrapping_add(1),
            Op::Brk => self.brk(bus),
            Op::Rti => {
                self.p = self.pop_byte(bus);
                self.pc = self.pop_word(bus);
            }

            // Stack operations
            Op::Pha => self.push_byte(bus, self.a),
            Op::Php => {
                let p = self.p | Flag::Break as u8 | Flag::Unused as u8;
                self.push_byte(bus, p);
            }
            Op::Pla => {
                let value = self.pop_byte(bus);
                self.lda(value);
            }
            Op::Plp => self.p = self.pop_byte(bus),

            Op::Nop => {}

            // Undocumented: each is the documented pair run back to back
            Op::Lax => {
                let value = self.read_operand(target, bus);
                self.lda(value);
                self.x = self.a;
            }
            Op::Sax => self.write_operand(target, self.a & self.x, bus),
            Op::Dcp => {
                let value = self.dec(target, bus);
                self.compare(self.a, value);
            }
            Op::Isc => {
                let value = self.inc(target, bus);
                self.sbc(value);
            }
            Op::Slo => {
                let value = self.asl(target, bus);
                self.ora(value);
            }
            Op::Rla => {
                let value = self.rol(target, bus);
                self.and(value);
            }
            Op::Sre => {
                let value = self.lsr(target, bus);
                self.eor(value);
            }
            Op::Rra => {
                let value = self.ror(target, bus);
                self.adc(value);
            }
            Op::Sbx => {
                let value = self.read_operand(target, bus);
                let ax = self.a & self.x;
                self.compare(ax, value);
                self.x = ax.wrapping_sub(value);
            }
            Op::Las => {
                let value = self.read_operand(target, bus) & self.sp;
                self.sp = value;
                self.lda(value);
                self.x = value;
            }
            Op::Anc => {
                let value = self.read_operand(target, bus);
                self.and(value);
                self.set_flag(Flag::Carry, self.get_flag(Flag::Negative));
            }
            Op::Alr => {
                let value = self.read_operand(target, bus);
                self.and(value);
                self.lsr(Target::Accumulator, bus);
            }
            Op::Arr => {
                let value = self.read_operand(target, bus);
                self.and(value);
                let result = self.ror(Target::Accumulator, bus);
                self.set_flag(Flag::Carry, result & 0b0100_0000 != 0);
                self.set_flag(Flag::Overflow, ((result >> 6) ^ (result >> 5)) & 1 != 0);
            }

            // Intercepted by the dispatcher before execution
            Op::Jam | Op::Undefined => {}
        }

        0
    }

    fn read_operand<B: Bus + ?Sized>(&mut self, target: Target, bus: &mut B) -> u8 {
        match target {
            Target::Address(address) => bus.read(address),
            Target::Accumulator => self.a,
            Target::None => 0,
        }
    }

    fn write_operand<B: Bus + ?Sized>(&mut self, target: Target, value: u8, bus: &mut B) {
        match target {
            Target::Address(address) => bus.write(address, value),
            Target::Accumulator => self.a = value,
            Target::None => {}
        }
    }

    fn lda(&mut self, value: u8) {
        self.set_flags_zero_negative(value);
        self.a = value;
    }

    /// Binary add with carry. The Decimal flag is ignored on this CPU.
    fn adc(&mut self, operand: u8) {
        let a = self.a;
        let result = a as u16 + operand as u16 + self.carry() as u16;
        self.set_flag(Flag::Carry, result > 0xFF);
        self.set_flag(
            Flag::Overflow,
            !(a ^ operand) & (a ^ result as u8) & 0x80 != 0,
        );
        self.set_flags_zero_negative(result as u8);
        self.a = result as u8;
    }

    fn sbc(&mut self, operand: u8) {
        self.adc(!operand);
    }

    fn compare(&mut self, register: u8, operand: u8) {
        self.set_flags_zero_negative(register.wrapping_sub(operand));
        self.set_flag(Flag::Carry, register >= operand);
    }

    fn and(&mut self, operand: u8) {
        let result = self.a & operand;
        self.set_flags_zero_negative(result);
        self.a = result;
    }

    fn ora(&mut self, operand: u8) {
        let result = self.a | operand;
        self.set_flags_zero_negative(result);
        self.a = result;
    }

    fn eor(&mut self, operand: u8) {
        let result = self.a ^ operand;
        self.set_flags_zero_negative(result);
        self.a = result;
    }

    fn bit(&mut self, operand: u8) {
        self.set_flag(Flag::Zero, self.a & operand == 0);
        self.set_flag(Flag::Overflow, operand & 0b0100_0000 != 0);
        self.set_flag(Flag::Negative, operand & 0b1000_0000 != 0);
    }

    fn asl<B: Bus + ?Sized>(&mut self, target: Target, bus: &mut B) -> u8 {
        let operand = self.read_operand(target, bus);
        let result = operand << 1;
        self.set_flag(Flag::Carry, operand & 0b1000_0000 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(target, result, bus);
        result
    }

    fn lsr<B: Bus + ?Sized>(&mut self, target: Target, bus: &mut B) -> u8 {
        let operand = self.read_operand(target, bus);
        let result = operand >> 1;
        self.set_flag(Flag::Carry, operand & 0b0000_0001 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(target, result, bus);
        result
    }

    fn rol<B: Bus + ?Sized>(&mut self, target: Target, bus: &mut B) -> u8 {
        let operand = self.read_operand(target, bus);
        let result = (operand << 1) | self.carry();
        self.set_flag(Flag::Carry, operand & 0b1000_0000 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(target, result, bus);
        result
    }

    fn ror<B: Bus + ?Sized>(&mut self, target: Target, bus: &mut B) -> u8 {
        let operand = self.read_operand(target, bus);
        let result = (operand >> 1) | (self.carry() << 7);
        self.set_flag(Flag::Carry, operand & 0b0000_0001 != 0);
        self.set_flags_zero_negative(result);
        self.write_operand(target, result, bus);
        result
    }

    fn inc<B: Bus + ?Sized>(&mut self, target: Target, bus: &mut B) -> u8 {
        let result = self.read_operand(target, bus).wrapping_add(1);
        self.set_flags_zero_negative(result);
        self.write_operand(target, result, bus);
        result
    }

    fn dec<B: Bus + ?Sized>(&mut self, target: Target, bus: &mut B) -> u8 {
        let result = self.read_operand(target, bus).wrapping_sub(1);
        self.set_flags_zero_negative(result);
        self.write_operand(target, result, bus);
        result
    }

    /// +1 cycle when taken, +1 more when the destination is on another page.
    fn branch(&mut self, condition: bool, operand: Resolved) -> u32 {
        match operand.address() {
            Some(destination) if condition => {
                self.pc = destination;
                if operand.page_crossed {
                    2
                } else {
                    1
                }
            }
            _ => 0,
        }
    }

    fn jsr<B: Bus + ?Sized>(&mut self, operand: Resolved, bus: &mut B) {
        let return_address = self.pc.wrapping_sub(1);
        self.push_word(bus, return_address);
        if let Some(address) = operand.address() {
            self.pc = address;
        }
    }

    /// BRK skips a padding byte: the pushed return address is the opcode
    /// address + 2.
    fn brk<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        self.push_word(bus, self.pc.wrapping_add(1));
        let status = self.p | Flag::Break as u8 | Flag::Unused as u8;
        self.push_byte(bus, status);
        self.pc = bus.read_word(IRQ_VECTOR);
        self.set_flag(Flag::Break, true);
        self.set_flag(Flag::IrqDisable, true);
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::{Bus, FlatBus};
    use crate::cpu::{Cpu, Flag, StepOutcome};

    fn setup(program: &[u8]) -> (Cpu, FlatBus) {
        let mut bus = FlatBus::new();
        bus.load(0x0200, program).unwrap();
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.set_pc(0x0200);
        (cpu, bus)
    }

    fn step(cpu: &mut Cpu, bus: &mut FlatBus) -> u32 {
        match cpu.step(bus).unwrap() {
            StepOutcome::Executed { cycles } => cycles,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_adc_overflow_and_carry() {
        // LDA #$50; ADC #$50
        let (mut cpu, mut bus) = setup(&[0xA9, 0x50, 0x69, 0x50]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.flag(Flag::Overflow));
        assert!(!cpu.flag(Flag::Carry));
        assert!(cpu.flag(Flag::Negative));

        // LDA #$FF; ADC #$01 with carry clear
        let (mut cpu, mut bus) = setup(&[0xA9, 0xFF, 0x69, 0x01]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flag(Flag::Carry));
        assert!(cpu.flag(Flag::Zero));
        assert!(!cpu.flag(Flag::Overflow));
    }

    #[test]
    fn test_adc_ignores_decimal_flag() {
        // SED; LDA #$09; ADC #$01
        let (mut cpu, mut bus) = setup(&[0xF8, 0xA9, 0x09, 0x69, 0x01]);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert!(cpu.flag(Flag::Decimal));
        assert_eq!(cpu.a, 0x0A);
    }

    #[test]
    fn test_sbc_undoes_adc() {
        for a in [0x00u8, 0x01, 0x7F, 0x80, 0xC3, 0xFF] {
            for m in [0x00u8, 0x01, 0x40, 0x80, 0xFE, 0xFF] {
                // CLC; ADC #m; SEC; SBC #m
                let mut bus = FlatBus::new();
                bus.load(0x0200, &[0x18, 0x69, m, 0x38, 0xE9, m]).unwrap();
                let mut cpu = Cpu::new();
                cpu.set_pc(0x0200);
                cpu.a = a;
                for _ in 0..4 {
                    cpu.step(&mut bus).unwrap();
                }
                assert_eq!(cpu.a, a, "a={:02X} m={:02X}", a, m);
            }
        }
    }

    #[test]
    fn test_sbc_overflow() {
        // SEC; LDA #$80; SBC #$01 -> $7F, overflow
        let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0x80, 0xE9, 0x01]);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(cpu.a, 0x7F);
        assert!(cpu.flag(Flag::Overflow));
        assert!(cpu.flag(Flag::Carry));
        assert!(!cpu.flag(Flag::Negative));
    }

    #[test]
    fn test_rol_nine_times_restores_value_and_carry() {
        let (mut cpu, mut bus) = setup(&[0x2A; 9]);
        cpu.a = 0b1011_0010;
        cpu.p |= Flag::Carry as u8;
        for _ in 0..9 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(cpu.a, 0b1011_0010);
        assert!(cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_rol_memory() {
        // SEC; ROL $10
        let (mut cpu, mut bus) = setup(&[0x38, 0x26, 0x10]);
        bus.poke(0x0010, 0x80);
        step(&mut cpu, &mut bus);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.peek(0x0010), 0x01);
        assert!(cpu.flag(Flag::Carry));
        assert!(!cpu.flag(Flag::Zero));
    }

    #[test]
    fn test_ror_accumulator_sets_negative_from_carry() {
        // SEC; LDA #$02; ROR A
        let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0x02, 0x6A]);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(cpu.a, 0x81);
        assert!(cpu.flag(Flag::Negative));
        assert!(!cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_lsr_clears_negative() {
        // LDA #$FF; LSR A
        let (mut cpu, mut bus) = setup(&[0xA9, 0xFF, 0x4A]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x7F);
        assert!(cpu.flag(Flag::Carry));
        assert!(!cpu.flag(Flag::Negative));
    }

    #[test]
    fn test_compare() {
        // LDA #$40; CMP #$40; CMP #$41; CMP #$3F
        let (mut cpu, mut bus) = setup(&[0xA9, 0x40, 0xC9, 0x40, 0xC9, 0x41, 0xC9, 0x3F]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert!(cpu.flag(Flag::Zero) && cpu.flag(Flag::Carry));
        step(&mut cpu, &mut bus);
        assert!(!cpu.flag(Flag::Carry) && cpu.flag(Flag::Negative));
        step(&mut cpu, &mut bus);
        assert!(cpu.flag(Flag::Carry) && !cpu.flag(Flag::Zero));
        assert_eq!(cpu.a, 0x40);
    }

    #[test]
    fn test_bit() {
        // LDA #$01; BIT $10
        let (mut cpu, mut bus) = setup(&[0xA9, 0x01, 0x24, 0x10]);
        bus.poke(0x0010, 0xC0);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert!(cpu.flag(Flag::Zero));
        assert!(cpu.flag(Flag::Negative));
        assert!(cpu.flag(Flag::Overflow));
        assert_eq!(cpu.a, 0x01);
    }

    #[test]
    fn test_inc_dec_wrap_without_carry() {
        // DEX; INY ; INC $10
        let (mut cpu, mut bus) = setup(&[0xCA, 0xC8, 0xE6, 0x10]);
        cpu.y = 0xFF;
        bus.poke(0x0010, 0xFF);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(cpu.x, 0xFF);
        assert_eq!(cpu.y, 0x00);
        assert_eq!(bus.peek(0x0010), 0x00);
        assert!(cpu.flag(Flag::Zero));
        assert!(!cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_transfers() {
        // LDX #$80; TXS; TSX; LDA #$00; TAY
        let (mut cpu, mut bus) = setup(&[0xA2, 0x80, 0x9A, 0xA9, 0x00, 0xBA, 0xA8]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.sp(), 0x80);
        assert!(cpu.flag(Flag::Negative));
        step(&mut cpu, &mut bus);
        assert!(cpu.flag(Flag::Zero));
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.x, 0x80);
        assert!(cpu.flag(Flag::Negative));
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.y, 0x00);
        assert!(cpu.flag(Flag::Zero));
    }

    #[test]
    fn test_php_forces_break_and_unused() {
        let (mut cpu, mut bus) = setup(&[0x08]);
        cpu.p = 0x00;
        step(&mut cpu, &mut bus);
        assert_eq!(bus.peek(0x01FD), 0x30);
        assert_eq!(cpu.status(), 0x00);
    }

    #[test]
    fn test_plp_is_verbatim_and_pla_sets_flags() {
        let (mut cpu, mut bus) = setup(&[0x28, 0x68]);
        bus.poke(0x01FE, 0xC3);
        bus.poke(0x01FF, 0x00);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.status(), 0xC3);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flag(Flag::Zero));
        assert!(!cpu.flag(Flag::Negative));
    }

    #[test]
    fn test_branch_cycles() {
        // BNE not taken (Z set after LDA #0)
        let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xD0, 0x10]);
        step(&mut cpu, &mut bus);
        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!(cpu.pc(), 0x0204);

        // BEQ taken, same page
        let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xF0, 0x10]);
        step(&mut cpu, &mut bus);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(cpu.pc(), 0x0214);

        // BEQ taken backwards across a page
        let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xF0, 0xF0]);
        step(&mut cpu, &mut bus);
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.pc(), 0x01F4);
    }

    #[test]
    fn test_jsr_rts() {
        // JSR $0300 ... at $0300: RTS
        let (mut cpu, mut bus) = setup(&[0x20, 0x00, 0x03, 0xEA]);
        bus.poke(0x0300, 0x60);
        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc(), 0x0300);
        assert_eq!(bus.peek(0x01FD), 0x02);
        assert_eq!(bus.peek(0x01FC), 0x02);
        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc(), 0x0203);
        assert_eq!(cpu.sp(), 0xFD);
    }

    #[test]
    fn test_jmp_indirect_bug_through_step() {
        let (mut cpu, mut bus) = setup(&[0x6C, 0xFF, 0x30]);
        bus.poke(0x30FF, 0x40);
        bus.poke(0x3000, 0x80);
        bus.poke(0x3100, 0x50);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.pc(), 0x8040);
    }

    #[test]
    fn test_lax_sax() {
        // LAX $10; LDX #$0F; SAX $11
        let (mut cpu, mut bus) = setup(&[0xA7, 0x10, 0xA2, 0x0F, 0x87, 0x11]);
        bus.poke(0x0010, 0x9C);
        step(&mut cpu, &mut bus);
        assert_eq!((cpu.a, cpu.x), (0x9C, 0x9C));
        assert!(cpu.flag(Flag::Negative));
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(bus.peek(0x0011), 0x0C);
    }

    #[test]
    fn test_dcp_decrements_then_compares() {
        // LDA #$40; DCP $10
        let (mut cpu, mut bus) = setup(&[0xA9, 0x40, 0xC7, 0x10]);
        bus.poke(0x0010, 0x41);
        step(&mut cpu, &mut bus);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.peek(0x0010), 0x40);
        assert!(cpu.flag(Flag::Zero));
        assert!(cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_isc_increments_then_subtracts() {
        // SEC; LDA #$10; ISC $10
        let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0x10, 0xE7, 0x10]);
        bus.poke(0x0010, 0x04);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(bus.peek(0x0010), 0x05);
        assert_eq!(cpu.a, 0x0B);
        assert!(cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_rla_uses_carry_from_rotate() {
        // SEC; LDA #$FF; RLA $10
        let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0xFF, 0x27, 0x10]);
        bus.poke(0x0010, 0x80);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(bus.peek(0x0010), 0x01);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_rra_adds_rotated_carry() {
        // CLC; LDA #$01; RRA $10  ($03 -> $01, carry out 1; A = 1 + 1 + 1)
        let (mut cpu, mut bus) = setup(&[0x18, 0xA9, 0x01, 0x67, 0x10]);
        bus.poke(0x0010, 0x03);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(bus.peek(0x0010), 0x01);
        assert_eq!(cpu.a, 0x03);
        assert!(!cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_slo_sre() {
        // LDA #$01; SLO $10; SRE $11
        let (mut cpu, mut bus) = setup(&[0xA9, 0x01, 0x07, 0x10, 0x47, 0x11]);
        bus.poke(0x0010, 0x81);
        bus.poke(0x0011, 0x06);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(bus.peek(0x0010), 0x02);
        assert_eq!(cpu.a, 0x03);
        assert!(cpu.flag(Flag::Carry));
        step(&mut cpu, &mut bus);
        assert_eq!(bus.peek(0x0011), 0x03);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flag(Flag::Zero));
        assert!(!cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_sbx() {
        // LDA #$F0; LDX #$3C; SBX #$10
        let (mut cpu, mut bus) = setup(&[0xA9, 0xF0, 0xA2, 0x3C, 0xCB, 0x10]);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(cpu.x, 0x20);
        assert_eq!(cpu.a, 0xF0);
        assert!(cpu.flag(Flag::Carry));
    }

    #[test]
    fn test_las() {
        // LAS $0300,Y
        let (mut cpu, mut bus) = setup(&[0xBB, 0x00, 0x03]);
        bus.poke(0x0300, 0x8F);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x8D);
        assert_eq!(cpu.x, 0x8D);
        assert_eq!(cpu.sp(), 0x8D);
        assert!(cpu.flag(Flag::Negative));
    }

    #[test]
    fn test_anc_alr_arr() {
        // LDA #$FF; ANC #$80
        let (mut cpu, mut bus) = setup(&[0xA9, 0xFF, 0x0B, 0x80]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.flag(Flag::Carry));

        // LDA #$FF; ALR #$03
        let (mut cpu, mut bus) = setup(&[0xA9, 0xFF, 0x4B, 0x03]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.flag(Flag::Carry));

        // SEC; LDA #$FF; ARR #$C0 -> $E0, C=1 (bit 6), V=0 (bit6 ^ bit5)
        let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0xFF, 0x6B, 0xC0]);
        for _ in 0..3 {
            step(&mut cpu, &mut bus);
        }
        assert_eq!(cpu.a, 0xE0);
        assert!(cpu.flag(Flag::Carry));
        assert!(!cpu.flag(Flag::Overflow));
        assert!(cpu.flag(Flag::Negative));
    }

    #[test]
    fn test_page_penalty_on_loads_only() {
        // LDA $02FF,X with X=1 crosses
        let (mut cpu, mut bus) = setup(&[0xBD, 0xFF, 0x02]);
        cpu.x = 1;
        assert_eq!(step(&mut cpu, &mut bus), 5);

        // STA $02FF,X never pays the penalty
        let (mut cpu, mut bus) = setup(&[0x9D, 0xFF, 0x02]);
        cpu.x = 1;
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.read(0x0300), 0x00);

        // NOP $02FF,X (undocumented) pays it
        let (mut cpu, mut bus) = setup(&[0x1C, 0xFF, 0x02]);
        cpu.x = 1;
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.pc(), 0x0203);
    }

    #[test]
    fn test_multi_byte_nops_advance_pc() {
        let (mut cpu, mut bus) = setup(&[0x04, 0x10, 0x80, 0x00, 0x0C, 0x00, 0x03, 0x1A]);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!(cpu.pc(), 0x0208);
    }
}
