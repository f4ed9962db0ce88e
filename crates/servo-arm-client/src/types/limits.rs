//! 关节限位表
//!
//! 每个关节一个闭区间 `[min, max]`；夹爪用 `open` / `close` 两个角度描述，
//! 钳位区间为 `[min(open, close), max(open, close)]`，不假设 `open < close`。
//!
//! 限位在配置阶段确定，之后不可变。

use super::joint::Joint;
use super::pose::Pose;

/// 关节闭区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[i32; 2]", into = "[i32; 2]"))]
pub struct JointRange {
    min: i32,
    max: i32,
}

impl JointRange {
    /// 创建区间，端点顺序自动规范化
    pub const fn new(a: i32, b: i32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// 舵机全行程 `[0, 180]`
    pub const fn full() -> Self {
        Self::new(0, 180)
    }

    #[inline]
    pub const fn min(&self) -> i32 {
        self.min
    }

    #[inline]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// 钳位到区间内
    ///
    /// `v < min` 取 `min`，`v > max` 取 `max`，否则原样返回。
    #[inline]
    pub fn clamp(&self, v: i32) -> i32 {
        if v < self.min {
            self.min
        } else if v > self.max {
            self.max
        } else {
            v
        }
    }

    #[inline]
    pub fn contains(&self, v: i32) -> bool {
        (self.min..=self.max).contains(&v)
    }
}

impl Default for JointRange {
    fn default() -> Self {
        Self::full()
    }
}

impl From<[i32; 2]> for JointRange {
    fn from([a, b]: [i32; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<JointRange> for [i32; 2] {
    fn from(range: JointRange) -> Self {
        [range.min, range.max]
    }
}

/// 夹爪张开 / 闭合角度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GripperRange {
    /// 张开角度
    pub open: i32,
    /// 闭合角度
    pub close: i32,
}

impl GripperRange {
    pub const fn new(open: i32, close: i32) -> Self {
        Self { open, close }
    }

    /// 规范化后的钳位区间
    pub const fn range(&self) -> JointRange {
        JointRange::new(self.open, self.close)
    }

    /// `open > close`（舵机反装的夹爪）
    pub const fn is_inverted(&self) -> bool {
        self.open > self.close
    }
}

impl Default for GripperRange {
    fn default() -> Self {
        Self::new(90, 40)
    }
}

/// 关节限位表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointLimits {
    pub base: JointRange,
    pub shoulder: JointRange,
    pub elbow: JointRange,
    pub wrist: JointRange,
    pub gripper: GripperRange,
}

impl JointLimits {
    pub const fn new(
        base: JointRange,
        shoulder: JointRange,
        elbow: JointRange,
        wrist: JointRange,
        gripper: GripperRange,
    ) -> Self {
        Self {
            base,
            shoulder,
            elbow,
            wrist,
            gripper,
        }
    }

    /// 某关节的钳位区间（夹爪为规范化后的 open/close 区间）
    pub fn range(&self, joint: Joint) -> JointRange {
        match joint {
            Joint::Base => self.base,
            Joint::Shoulder => self.shoulder,
            Joint::Elbow => self.elbow,
            Joint::Wrist => self.wrist,
            Joint::Gripper => self.gripper.range(),
        }
    }

    /// 钳位单个关节
    #[inline]
    pub fn clamp(&self, joint: Joint, v: i32) -> i32 {
        self.range(joint).clamp(v)
    }

    /// 逐关节钳位整个位姿
    pub fn clamp_pose(&self, pose: Pose) -> Pose {
        pose.map_with_joint(|joint, v| self.clamp(joint, v))
    }

    /// 位姿是否完全在限位内
    pub fn contains(&self, pose: &Pose) -> bool {
        pose.iter().all(|(joint, v)| self.range(joint).contains(v))
    }
}
