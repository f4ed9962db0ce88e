//! 角度到脉宽的线性映射
//!
//! 标准舵机：50Hz PWM，脉宽决定角度（不是频率）。
//! 默认 0° = 500µs，180° = 2400µs。

/// 舵机可接受的最大角度
pub const MAX_SERVO_ANGLE: i32 = 180;

/// 脉宽范围（微秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseRange {
    /// 0° 对应的脉宽
    pub min_us: u16,
    /// 180° 对应的脉宽
    pub max_us: u16,
}

impl Default for PulseRange {
    fn default() -> Self {
        Self {
            min_us: 500,
            max_us: 2400,
        }
    }
}

impl PulseRange {
    pub fn new(min_us: u16, max_us: u16) -> Self {
        Self { min_us, max_us }
    }

    /// 角度（度）转脉宽（微秒）
    ///
    /// 角度先钳位到 [0, 180]。`max_us < min_us` 时映射方向反转（舵机反装）。
    pub fn angle_to_pulse(&self, angle: i32) -> u16 {
        let angle = angle.clamp(0, MAX_SERVO_ANGLE) as i64;
        let min = self.min_us as i64;
        let span = self.max_us as i64 - min;

        (min + angle * span / MAX_SERVO_ANGLE as i64) as u16
    }
}
