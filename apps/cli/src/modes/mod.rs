//! 运行模式
//!
//! - REPL 模式：交互式 Shell（rustyline）
//! - Listen 模式：从串口设备、文件或 stdin 读取命令行
//!
//! 两种模式都使用专用输入线程 + 有界通道：运动期间输入的命令排队，
//! 当前运动结束后才执行，不会与运动并发。

pub mod input;
pub mod listen;
pub mod repl;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 安装 Ctrl+C 处理，返回关闭标志
///
/// 控制循环只在两条命令之间检查该标志，正在进行的运动总会执行完。
pub fn install_shutdown_handler() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;
    Ok(shutdown)
}
