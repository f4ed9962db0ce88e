//! 类型系统模块
//!
//! - `Joint`: 关节枚举
//! - `Pose`: 5 关节位姿（度）
//! - `JointLimits`: 关节限位表（含夹爪 open/close）

pub mod joint;
pub mod limits;
pub mod pose;

pub use joint::{JOINT_COUNT, Joint};
pub use limits::{GripperRange, JointLimits, JointRange};
pub use pose::Pose;
