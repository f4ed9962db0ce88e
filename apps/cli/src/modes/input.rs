//! 专用输入线程
//!
//! 在独立线程中阻塞读取输入，通过有界 crossbeam 通道把事件交给控制线程。
//!
//! 按字节读到 `\n` 再做有损 UTF-8 解码：串口噪声只会变成一条无法识别的命令，
//! 不会让输入线程退出。

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::io::{BufRead, ErrorKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// 输入队列容量
pub const INPUT_QUEUE_CAPACITY: usize = 16;

/// 检查关闭标志的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 输入事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 一行命令
    Line(String),
    /// 用户中断（Ctrl+C）
    Interrupt,
    /// 输入结束
    Eof,
}

/// 输入端
pub struct LineInput {
    rx: Receiver<InputEvent>,
    _thread: thread::JoinHandle<()>,
}

impl LineInput {
    /// 在专用线程中运行 `reader`，它通过 `Sender` 发送事件
    pub fn spawn<F>(reader: F) -> Self
    where
        F: FnOnce(Sender<InputEvent>) + Send + 'static,
    {
        let (tx, rx) = bounded(INPUT_QUEUE_CAPACITY);
        let thread = thread::spawn(move || reader(tx));
        Self {
            rx,
            _thread: thread,
        }
    }

    /// 从任意 `BufRead` 逐行读取
    ///
    /// 串口读超时（`TimedOut` / `WouldBlock`）和 `Interrupted` 会重试，
    /// 已读到的半行保留到下一次读取。
    pub fn from_reader<R>(mut reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        Self::spawn(move |tx| {
            let mut buf = Vec::new();
            loop {
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = decode_line(&buf);
                        buf.clear();
                        if tx.send(InputEvent::Line(line)).is_err() {
                            return; // 控制线程已退出
                        }
                    },
                    Err(e) if is_retryable(e.kind()) => continue,
                    Err(e) => {
                        warn!("Input read error: {}", e);
                        break;
                    },
                }
            }
            if !buf.is_empty() {
                let _ = tx.send(InputEvent::Line(decode_line(&buf)));
            }
            debug!("Input closed");
            let _ = tx.send(InputEvent::Eof);
        })
    }

    /// 等待下一个事件；关闭标志被置位时返回 `None`
    pub fn next_event(&self, shutdown: &AtomicBool) -> Option<InputEvent> {
        loop {
            if shutdown.load(Ordering::SeqCst) {
                return None;
            }
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(event) => return Some(event),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Some(InputEvent::Eof),
            }
        }
    }
}

/// 去掉行尾，非法 UTF-8 替换为 U+FFFD
fn decode_line(bytes: &[u8]) -> String {
    let line = String::from_utf8_lossy(bytes);
    line.trim_end_matches(['\r', '\n']).to_string()
}

fn is_retryable(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}
