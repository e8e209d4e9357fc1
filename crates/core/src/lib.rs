//! # RP2A03 Core
//! 6502 CPU core as found in the NES/Famicom (decimal mode disabled)

pub mod addressing;
pub mod bus;
pub mod cpu;
pub mod disasm;
pub mod error;
mod instructions;
pub mod opcodes;

pub use bus::{Bus, FlatBus};
pub use cpu::{Cpu, Flag, Interrupt, Registers, StepOutcome};
pub use error::{CpuError, Result};

/// Cycles consumed by the reset sequence.
pub const RESET_CYCLES: u64 = 7;

/// `run` が停止した理由
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// JAM命令でCPUが停止
    Halted { opcode: u8 },
    /// ブレークポイントに到達
    Breakpoint(u16),
    /// ステップ数の上限に到達
    StepLimit,
}

/// `run` の実行結果
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub cycles: u64,
    pub reason: StopReason,
}

/// CPUとフラットなメモリバスを持つシステム
pub struct System {
    cpu: Cpu,
    bus: FlatBus,
    cycles: u64,
}

impl System {
    /// 新しいシステムを作成
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: FlatBus::new(),
            cycles: 0,
        }
    }

    /// プログラムをメモリにロード
    pub fn load_program(&mut self, address: u16, program: &[u8]) -> Result<()> {
        self.bus.load(address, program)?;
        log::info!("Loaded {} bytes at ${:04X}", program.len(), address);
        Ok(())
    }

    /// リセットベクタを書き換え
    pub fn set_reset_vector(&mut self, address: u16) {
        self.bus.poke(cpu::RESET_VECTOR, address as u8);
        self.bus.poke(cpu::RESET_VECTOR + 1, (address >> 8) as u8);
    }

    /// システムをリセット
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.cycles = RESET_CYCLES;
    }

    /// 1命令実行
    pub fn step(&mut self) -> Result<StepOutcome> {
        if log::log_enabled!(log::Level::Trace) {
            let bytes = self.read_memory_range(self.cpu.pc(), 3);
            log::trace!(
                "{}",
                disasm::trace_line(&self.cpu.registers(), &bytes, self.cycles)
            );
        }

        let outcome = self.cpu.step(&mut self.bus)?;
        self.cycles += outcome.cycles() as u64;
        Ok(outcome)
    }

    /// 停止条件に達するまで実行
    ///
    /// Stops on lock-up, when PC reaches `breakpoint` before an instruction
    /// runs, or after `max_steps` instructions. Undefined opcodes are returned
    /// as errors.
    pub fn run(&mut self, max_steps: u64, breakpoint: Option<u16>) -> Result<RunSummary> {
        let start_cycles = self.cycles;
        let mut steps = 0;

        let reason = loop {
            if steps >= max_steps {
                break StopReason::StepLimit;
            }
            if breakpoint == Some(self.cpu.pc()) && steps > 0 {
                break StopReason::Breakpoint(self.cpu.pc());
            }

            match self.step()? {
                StepOutcome::Executed { .. } => steps += 1,
                StepOutcome::Halted { opcode } => break StopReason::Halted { opcode },
            }
        };

        Ok(RunSummary {
            steps,
            cycles: self.cycles - start_cycles,
            reason,
        })
    }

    /// 割り込みを発生（命令の間でのみ）
    pub fn interrupt(&mut self, kind: Interrupt) -> u32 {
        let cycles = self.cpu.interrupt(&mut self.bus, kind);
        self.cycles += cycles as u64;
        cycles
    }

    /// リセットからの累計サイクル数
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// CPU状態の取得（デバッグ用）
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// CPU状態のmutable取得
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &FlatBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut FlatBus {
        &mut self.bus
    }

    // ========== メモリエディタ API ==========

    /// 任意のアドレスを読み取り
    pub fn peek(&self, address: u16) -> u8 {
        self.bus.peek(address)
    }

    /// 任意のアドレスに書き込み
    pub fn poke(&mut self, address: u16, value: u8) {
        self.bus.poke(address, value);
    }

    /// メモリ範囲を読み取り（アドレス空間の末尾で折り返す）
    pub fn read_memory_range(&self, start: u16, length: usize) -> Vec<u8> {
        (0..length)
            .map(|i| self.peek(start.wrapping_add(i as u16)))
            .collect()
    }

    /// メモリダンプを16進数文字列で取得
    pub fn hex_dump(&self, start: u16, length: usize) -> String {
        let memory = self.read_memory_range(start, length);
        disasm::hex_dump(&memory, start)
    }

    /// 逆アセンブル
    pub fn disassemble(&self, start: u16, count: usize) -> Vec<(u16, String)> {
        let memory = self.read_memory_range(start, count * 3); // 最大3バイト/命令
        disasm::disassemble(&memory, start, count)
    }

    /// 現在のPCから逆アセンブル
    pub fn disassemble_at_pc(&self, count: usize) -> Vec<(u16, String)> {
        self.disassemble(self.cpu.pc(), count)
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}
