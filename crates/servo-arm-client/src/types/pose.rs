//! 位姿（5 个关节角度的快照）
//!
//! `Pose` 是值类型：`Copy`，按字段比较，没有身份。

use super::joint::{JOINT_COUNT, Joint};
use std::fmt;
use std::ops::{Index, IndexMut};

/// 位姿（单位：度）
///
/// 名义范围 0–180，实际范围由各关节的限位决定。允许任意 `i32`，
/// 越界值在写入硬件前由 [`PoseWriter`](crate::writer::PoseWriter) 钳位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "[i32; 5]", into = "[i32; 5]")
)]
pub struct Pose {
    pub base: i32,
    pub shoulder: i32,
    pub elbow: i32,
    pub wrist: i32,
    pub gripper: i32,
}

impl Pose {
    pub const fn new(base: i32, shoulder: i32, elbow: i32, wrist: i32, gripper: i32) -> Self {
        Self {
            base,
            shoulder,
            elbow,
            wrist,
            gripper,
        }
    }

    /// 所有关节相同角度
    pub const fn splat(angle: i32) -> Self {
        Self::new(angle, angle, angle, angle, angle)
    }

    /// 转为数组（顺序同 [`Joint::ALL`]）
    pub const fn to_array(self) -> [i32; JOINT_COUNT] {
        [self.base, self.shoulder, self.elbow, self.wrist, self.gripper]
    }

    /// 只替换一个关节
    pub fn with(mut self, joint: Joint, angle: i32) -> Self {
        self[joint] = angle;
        self
    }

    /// 只替换夹爪角度
    pub fn with_gripper(self, angle: i32) -> Self {
        self.with(Joint::Gripper, angle)
    }

    /// 带关节的映射转换
    pub fn map_with_joint<F>(self, mut f: F) -> Self
    where
        F: FnMut(Joint, i32) -> i32,
    {
        Self::new(
            f(Joint::Base, self.base),
            f(Joint::Shoulder, self.shoulder),
            f(Joint::Elbow, self.elbow),
            f(Joint::Wrist, self.wrist),
            f(Joint::Gripper, self.gripper),
        )
    }

    /// 按关节迭代 `(Joint, angle)`
    pub fn iter(&self) -> impl Iterator<Item = (Joint, i32)> + '_ {
        Joint::ALL.into_iter().map(move |joint| (joint, self[joint]))
    }

    /// 逐关节差值 `target - self`（i64，避免极端输入溢出）
    pub fn delta_to(&self, target: &Pose) -> [i64; JOINT_COUNT] {
        let mut delta = [0i64; JOINT_COUNT];
        for joint in Joint::ALL {
            delta[joint.index()] = target[joint] as i64 - self[joint] as i64;
        }
        delta
    }
}

impl Index<Joint> for Pose {
    type Output = i32;

    #[inline]
    fn index(&self, joint: Joint) -> &i32 {
        match joint {
            Joint::Base => &self.base,
            Joint::Shoulder => &self.shoulder,
            Joint::Elbow => &self.elbow,
            Joint::Wrist => &self.wrist,
            Joint::Gripper => &self.gripper,
        }
    }
}

impl IndexMut<Joint> for Pose {
    #[inline]
    fn index_mut(&mut self, joint: Joint) -> &mut i32 {
        match joint {
            Joint::Base => &mut self.base,
            Joint::Shoulder => &mut self.shoulder,
            Joint::Elbow => &mut self.elbow,
            Joint::Wrist => &mut self.wrist,
            Joint::Gripper => &mut self.gripper,
        }
    }
}

// From/Into 转换
impl From<[i32; JOINT_COUNT]> for Pose {
    #[inline]
    fn from(data: [i32; JOINT_COUNT]) -> Self {
        let [base, shoulder, elbow, wrist, gripper] = data;
        Self::new(base, shoulder, elbow, wrist, gripper)
    }
}

impl From<Pose> for [i32; JOINT_COUNT] {
    #[inline]
    fn from(pose: Pose) -> Self {
        pose.to_array()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "base={} shoulder={} elbow={} wrist={} gripper={}",
            self.base, self.shoulder, self.elbow, self.wrist, self.gripper
        )
    }
}
