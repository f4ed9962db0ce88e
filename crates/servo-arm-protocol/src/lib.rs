//! # Servo Arm Protocol
//!
//! 舵机机械臂的串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `command`: 串口命令行解析（单字符命令 + 调试位姿）
//! - `frame`: 舵机输出帧构建
//!
//! ## 在架构中的位置
//!
//! ```text
//! Serial line  ──parse_line()──▶  ArmCommand  ──▶ Dispatcher (servo-arm-control)
//! PoseWriter   ──ServoFrame──▶    "#<ch>P<us>\r" ──▶ 舵机控制板
//! ```

pub mod command;
pub mod frame;

// 重新导出常用类型
pub use command::{ArmCommand, ProtocolError, RESERVED_KEYS, parse_line};
pub use frame::ServoFrame;

/// 关节数量（底座、肩、肘、腕、夹爪）
pub const JOINT_COUNT: usize = 5;
