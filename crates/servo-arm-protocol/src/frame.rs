//! 舵机输出帧
//!
//! 每个关节一帧，文本格式 `#<channel>P<pulse_us>\r`，
//! 与常见串口舵机控制板（SSC-32 风格）兼容。

use std::fmt;

/// 帧起始符
const FRAME_START: char = '#';
/// 脉宽字段标记
const PULSE_MARK: char = 'P';
/// 帧结束符
const FRAME_END: char = '\r';

/// 单个舵机通道的输出帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoFrame {
    /// 输出通道号
    pub channel: u8,
    /// 脉宽（微秒）
    pub pulse_us: u16,
}

impl ServoFrame {
    pub fn new(channel: u8, pulse_us: u16) -> Self {
        Self { channel, pulse_us }
    }

    /// 编码为线上文本
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ServoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{FRAME_START}{}{PULSE_MARK}{}{FRAME_END}",
            self.channel, self.pulse_us
        )
    }
}
