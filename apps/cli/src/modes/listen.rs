//! Listen 模式
//!
//! 从串口设备、文件或 stdin 逐行读取命令，每条命令的结果写到 stdout。
//! `--input` 指向已存在的普通文件时按文件读取，否则用会话的串口参数打开设备。

use anyhow::{Context, Result};
use servo_arm_client::PoseWriter;
use servo_arm_client::control::Delay;
use servo_arm_control::{Dispatcher, Response};
use servo_arm_driver::{SerialSettings, is_regular_file, open_port};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tracing::info;

use super::input::{InputEvent, LineInput};
use crate::session::Session;

/// 处理统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenStats {
    pub lines: usize,
    pub motions: usize,
    pub errors: usize,
}

/// 打开输入（None 时使用 stdin）
pub fn open_input(path: Option<&Path>, serial: &SerialSettings) -> Result<LineInput> {
    match path {
        Some(path) if is_regular_file(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            info!("Listening on {}", path.display());
            Ok(LineInput::from_reader(BufReader::new(file)))
        },
        Some(path) => {
            let port = open_port(path, serial)
                .with_context(|| format!("Failed to open input device {}", path.display()))?;
            info!("Listening on serial port {}", path.display());
            Ok(LineInput::from_reader(BufReader::new(port)))
        },
        None => {
            info!("Listening on stdin");
            Ok(LineInput::from_reader(BufReader::new(std::io::stdin())))
        },
    }
}

/// 运行 listen 模式
pub fn run_listen(session: &mut Session, input: Option<&Path>, shutdown: &AtomicBool) -> Result<()> {
    let input = open_input(input, session.serial_settings())?;
    let stdout = std::io::stdout();
    let stats = serve(session.dispatcher(), &input, shutdown, &mut stdout.lock())?;
    info!(
        "Listen done: {} lines, {} motions, {} errors",
        stats.lines, stats.motions, stats.errors
    );
    Ok(())
}

/// 控制循环：逐条执行，直到输入结束或收到关闭信号
pub fn serve<W, D, O>(
    dispatcher: &mut Dispatcher<W, D>,
    input: &LineInput,
    shutdown: &AtomicBool,
    out: &mut O,
) -> Result<ListenStats>
where
    W: PoseWriter,
    D: Delay,
    O: Write,
{
    let mut stats = ListenStats::default();

    while let Some(event) = input.next_event(shutdown) {
        let line = match event {
            InputEvent::Line(line) => line,
            InputEvent::Interrupt | InputEvent::Eof => break,
        };

        let response = dispatcher.handle_line(&line);
        if matches!(response, Response::Ignored) {
            continue;
        }

        stats.lines += 1;
        if response.is_motion() {
            stats.motions += 1;
        }
        if response.is_error() {
            stats.errors += 1;
        }
        writeln!(out, "{}", response)?;
        out.flush()?;
    }

    Ok(stats)
}
