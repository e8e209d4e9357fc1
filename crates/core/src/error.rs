//! エラー型の定義

use thiserror::Error;

/// CPUコアのエラー型
#[derive(Error, Debug)]
pub enum CpuError {
    #[error("Undefined opcode {opcode:#04x} at PC {pc:#06x}")]
    UndefinedOpcode { opcode: u8, pc: u16 },

    #[error("Program of {len} bytes does not fit at address {address:#06x}")]
    ProgramTooLarge { address: u16, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result型のエイリアス
pub type Result<T> = std::result::Result<T, CpuError>;
