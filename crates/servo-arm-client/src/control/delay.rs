//! 步间延时
//!
//! 插值的每一步写完后阻塞等待 `step_delay`。延时抽象成 trait，
//! 真实运行使用 `spin_sleep` 低抖动延时，测试使用 [`RecordingDelay`]（不真正睡眠）。

use std::time::Duration;

/// 阻塞延时
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// 基于 `spin_sleep` 的阻塞延时
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinDelay;

impl Delay for SpinDelay {
    fn delay(&mut self, duration: Duration) {
        if !duration.is_zero() {
            spin_sleep::sleep(duration);
        }
    }
}

/// 不等待（dry-run）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay(&mut self, _duration: Duration) {}
}

/// 记录每次延时但不睡眠
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    delays: Vec<Duration>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub fn count(&self) -> usize {
        self.delays.len()
    }

    /// 累计延时
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }
}

impl Delay for RecordingDelay {
    fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
    }
}

impl<D: Delay + ?Sized> Delay for Box<D> {
    fn delay(&mut self, duration: Duration) {
        (**self).delay(duration)
    }
}
