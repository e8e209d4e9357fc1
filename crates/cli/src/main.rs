//! # RP2A03 CLI
//!
//! 生のバイナリイメージをフラットな64KBメモリにロードして実行するフロントエンド

use anyhow::{bail, Context, Result};
use clap::Parser;
use rp2a03_core::{cpu::RESET_VECTOR, StopReason, System};
use std::path::PathBuf;

/// RP2A03 CPU ランナー
#[derive(Parser, Debug)]
#[command(name = "rp2a03")]
#[command(about = "Run a raw 6502 program on the RP2A03 CPU core", long_about = None)]
struct Args {
    /// プログラムファイルのパス
    #[arg(value_name = "PROGRAM")]
    program: PathBuf,

    /// ロード先アドレス（デフォルト: $8000）
    #[arg(short, long, default_value = "8000", value_parser = parse_hex)]
    load_address: u16,

    /// リセットベクタに書き込む開始アドレス
    #[arg(short, long, value_parser = parse_hex)]
    entry: Option<u16>,

    /// 最大ステップ数
    #[arg(short, long, default_value_t = 1_000_000)]
    max_steps: u64,

    /// このアドレスに到達したら停止
    #[arg(short, long, value_parser = parse_hex)]
    break_at: Option<u16>,

    /// 終了時にメモリをダンプ（例: 0200:40）
    #[arg(short, long, value_parser = parse_range)]
    dump: Option<(u16, usize)>,

    /// 命令ごとのトレースを出力
    #[arg(short, long)]
    trace: bool,

    /// 最終レジスタをJSONで出力
    #[arg(long)]
    json: bool,
}

/// `$C000`, `0xC000`, `C000` のいずれも受け付ける
fn parse_hex(s: &str) -> std::result::Result<u16, String> {
    let digits = s
        .strip_prefix('$')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{}': {}", s, e))
}

/// `START:LEN`（どちらも16進数）
fn parse_range(s: &str) -> std::result::Result<(u16, usize), String> {
    let (start, len) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:LEN, got '{}'", s))?;
    let start = parse_hex(start)?;
    let len = parse_hex(len)? as usize;
    Ok((start, len))
}

/// イメージがリセットベクタ($FFFC-$FFFD)を含むか
fn covers_reset_vector(load_address: u16, len: usize) -> bool {
    let start = load_address as usize;
    let vector = RESET_VECTOR as usize;
    start <= vector && start + len > vector + 1
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.trace {
        builder.filter_module("rp2a03_core", log::LevelFilter::Trace);
    }
    builder.init();

    // プログラムの読み込み
    let program = std::fs::read(&args.program)
        .with_context(|| format!("failed to read {:?}", args.program))?;
    if program.is_empty() {
        bail!("{:?} is empty", args.program);
    }

    // システムの初期化
    let mut system = System::new();
    system.load_program(args.load_address, &program)?;

    match args.entry {
        Some(entry) => system.set_reset_vector(entry),
        None if !covers_reset_vector(args.load_address, program.len()) => {
            system.set_reset_vector(args.load_address)
        }
        None => {}
    }
    system.reset();
    log::info!("Starting at ${:04X}", system.cpu().pc());

    let summary = system
        .run(args.max_steps, args.break_at)
        .with_context(|| format!("execution stopped at ${:04X}", system.cpu().pc()))?;

    match summary.reason {
        StopReason::Halted { opcode } => {
            log::info!("CPU halted on ${:02X} at ${:04X}", opcode, system.cpu().pc())
        }
        StopReason::Breakpoint(pc) => log::info!("Breakpoint reached at ${:04X}", pc),
        StopReason::StepLimit => log::info!("Step limit ({}) reached", args.max_steps),
    }
    log::info!("{} instructions, {} cycles", summary.steps, summary.cycles);

    let registers = system.cpu().registers();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&registers)?);
    } else {
        println!(
            "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PC:{:04X} CYC:{}",
            registers.a,
            registers.x,
            registers.y,
            registers.p,
            registers.sp,
            registers.pc,
            system.cycles()
        );
    }

    if let Some((start, len)) = args.dump {
        print!("{}", system.hex_dump(start, len));
    }

    Ok(())
}
