//! # Servo Arm Driver
//!
//! 舵机输出层，提供统一的 `ServoBus` 抽象。
//!
//! ## 后端
//!
//! - [`SerialServoBus`]: 向串口舵机控制板（`serialport`）或任意 `Write` 写 `#<ch>P<us>\r` 文本帧
//! - [`MockServoBus`]: 记录所有写入，无硬件依赖（测试、dry-run）
//!
//! 本层只认识通道号和角度，不认识关节。关节到通道的映射在 `servo-arm-client` 中完成。

pub mod error;
pub mod mock;
pub mod pulse;
pub mod serial;

pub use error::DriverError;
pub use mock::{MockServoBus, ServoWrite, WriteLog};
pub use pulse::PulseRange;
pub use serial::{SerialServoBus, SerialSettings, is_regular_file, open_port};

/// 舵机总线
///
/// 每次调用写一个通道。实现者应立即（同步地）把角度下发到硬件。
pub trait ServoBus {
    /// 把 `angle`（度）写到 `channel`
    fn write_angle(&mut self, channel: u8, angle: i32) -> Result<(), DriverError>;

    /// 刷新底层缓冲（一帧位姿写完后调用）
    fn flush(&mut self) -> Result<(), DriverError> {
        Ok(())
    }
}

impl<B: ServoBus + ?Sized> ServoBus for Box<B> {
    fn write_angle(&mut self, channel: u8, angle: i32) -> Result<(), DriverError> {
        (**self).write_angle(channel, angle)
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        (**self).flush()
    }
}
