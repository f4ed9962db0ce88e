//! 关节枚举
//!
//! 提供编译期安全的关节索引，防止越界和索引错误。
//!
//! # 示例
//!
//! ```rust
//! use servo_arm_client::types::{Joint, Pose};
//!
//! let pose = Pose::new(90, 80, 70, 60, 40);
//! assert_eq!(pose[Joint::Elbow], 70);
//!
//! for joint in Joint::ALL {
//!     println!("{}: {}", joint, pose[joint]);
//! }
//! ```

use std::fmt;

/// 关节数量
pub const JOINT_COUNT: usize = servo_arm_protocol::JOINT_COUNT;

/// 关节枚举
///
/// 表示机械臂的 5 个自由度，顺序与串口调试命令的参数顺序一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Joint {
    /// 底座旋转
    Base = 0,
    /// 肩部俯仰
    Shoulder = 1,
    /// 肘部俯仰
    Elbow = 2,
    /// 腕部俯仰
    Wrist = 3,
    /// 夹爪
    Gripper = 4,
}

impl Joint {
    /// 所有关节的数组
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Base,
        Joint::Shoulder,
        Joint::Elbow,
        Joint::Wrist,
        Joint::Gripper,
    ];

    /// 获取关节索引（0-4）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 从索引创建关节（范围检查）
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 获取关节名称
    pub const fn name(self) -> &'static str {
        match self {
            Joint::Base => "base",
            Joint::Shoulder => "shoulder",
            Joint::Elbow => "elbow",
            Joint::Wrist => "wrist",
            Joint::Gripper => "gripper",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
