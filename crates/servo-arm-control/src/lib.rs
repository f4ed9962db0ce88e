//! # Servo Arm Control
//!
//! 机械臂的上层控制：
//!
//! - [`ArmProfile`]: TOML 配置（限位、夹爪、home、命名位姿、任务表）
//! - [`ArmBuilder`]: 由配置构造 `Arm`
//! - [`SequenceRunner`]: 执行按键触发的任务
//! - [`Dispatcher`]: 行命令分发

pub mod builder;
pub mod dispatch;
pub mod error;
pub mod profile;
pub mod sequence;
pub mod task;

pub use builder::ArmBuilder;
pub use dispatch::{Dispatcher, Response, help_text};
pub use error::ControlError;
pub use profile::{
    ArmProfile, GripperConfig, HomeConfig, LimitsConfig, MotionParams, PulseConfig, SerialConfig,
};
pub use sequence::{RunReport, SequenceRunner};
pub use task::{GripperAction, NamedPoses, TaskSequence, TaskStep};
