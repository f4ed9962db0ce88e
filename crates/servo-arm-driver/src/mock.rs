//! Mock 舵机总线
//!
//! 记录每次写入，用于测试和 dry-run。日志通过 [`WriteLog`] 句柄共享，
//! 总线被 `Arm` 拿走后测试代码仍可读取。

use crate::{DriverError, PulseRange, ServoBus};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// 一次通道写入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoWrite {
    pub channel: u8,
    /// 下发的角度（度）
    pub angle: i32,
    /// 对应脉宽（微秒）
    pub pulse_us: u16,
}

/// 共享写入日志
#[derive(Debug, Clone, Default)]
pub struct WriteLog {
    writes: Arc<Mutex<Vec<ServoWrite>>>,
    flushes: Arc<Mutex<usize>>,
}

impl WriteLog {
    /// 所有写入的快照
    pub fn writes(&self) -> Vec<ServoWrite> {
        self.writes.lock().clone()
    }

    /// 取出并清空
    pub fn take(&self) -> Vec<ServoWrite> {
        std::mem::take(&mut *self.writes.lock())
    }

    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.lock().is_empty()
    }

    /// flush 调用次数
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock()
    }

    /// 某通道最后一次写入的角度
    pub fn last_angle(&self, channel: u8) -> Option<i32> {
        self.writes
            .lock()
            .iter()
            .rev()
            .find(|w| w.channel == channel)
            .map(|w| w.angle)
    }
}

/// Mock 舵机总线
#[derive(Debug, Default)]
pub struct MockServoBus {
    log: WriteLog,
    pulse: PulseRange,
    fail_writes: Arc<AtomicBool>,
}

impl MockServoBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pulse_range(mut self, pulse: PulseRange) -> Self {
        self.pulse = pulse;
        self
    }

    /// 日志句柄
    pub fn log(&self) -> WriteLog {
        self.log.clone()
    }

    /// 故障注入开关（可在总线被移走后切换）
    pub fn failure_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_writes)
    }
}

impl ServoBus for MockServoBus {
    fn write_angle(&mut self, channel: u8, angle: i32) -> Result<(), DriverError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(DriverError::Backend(format!(
                "injected failure on channel {channel}"
            )));
        }

        let write = ServoWrite {
            channel,
            angle,
            pulse_us: self.pulse.angle_to_pulse(angle),
        };
        trace!("mock servo write {:?}", write);
        self.log.writes.lock().push(write);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        *self.log.flushes.lock() += 1;
        Ok(())
    }
}
