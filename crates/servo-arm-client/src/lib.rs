//! 客户端接口模块
//!
//! 五关节舵机机械臂的运动核心：
//! - 强类型位姿和限位（`Pose`、`JointLimits`）
//! - 关节同步线性插值（`Interpolator`）
//! - 钳位写入（`PoseWriter`）
//! - 持有 CurrentPose 的控制器（`Arm`）
//!
//! # 数据流
//!
//! ```text
//! Task Sequencer ──▶ Arm::move_to_pose ──▶ Interpolator ──▶ PoseWriter(clamp) ──▶ ServoBus
//! ```

pub mod arm;
pub mod control;
pub mod types;
pub mod writer;

// 重新导出常用类型
pub use arm::{Arm, GRIPPER_STEP_SIZE, MotionStats};
pub use types::*;
pub use writer::{ChannelMap, PoseWriter, ServoPoseWriter};
