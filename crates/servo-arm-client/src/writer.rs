//! PoseWriter - 钳位并下发位姿
//!
//! 每次调用：逐关节钳位到限位区间，再向舵机总线写 5 次（每关节一次），无条件执行。
//! 钳位是静默的，不返回错误。总线写入失败只记录日志，不向插值器传播。

use crate::types::{JOINT_COUNT, Joint, JointLimits, Pose};
use servo_arm_driver::ServoBus;
use tracing::{error, trace};

/// 位姿写入器
pub trait PoseWriter {
    /// 写一个位姿（不可失败）
    fn write_pose(&mut self, pose: Pose);
}

impl<W: PoseWriter + ?Sized> PoseWriter for &mut W {
    fn write_pose(&mut self, pose: Pose) {
        (**self).write_pose(pose)
    }
}

/// 关节到舵机通道的映射
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelMap {
    pub base: u8,
    pub shoulder: u8,
    pub elbow: u8,
    pub wrist: u8,
    pub gripper: u8,
}

impl ChannelMap {
    pub fn channel(&self, joint: Joint) -> u8 {
        match joint {
            Joint::Base => self.base,
            Joint::Shoulder => self.shoulder,
            Joint::Elbow => self.elbow,
            Joint::Wrist => self.wrist,
            Joint::Gripper => self.gripper,
        }
    }

    /// 是否有两个关节共用同一通道
    pub fn has_duplicates(&self) -> bool {
        let mut channels = [0u8; JOINT_COUNT];
        for joint in Joint::ALL {
            channels[joint.index()] = self.channel(joint);
        }
        channels.sort_unstable();
        channels.windows(2).any(|w| w[0] == w[1])
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            base: 0,
            shoulder: 1,
            elbow: 2,
            wrist: 3,
            gripper: 4,
        }
    }
}

/// 钳位 + 舵机总线下发
pub struct ServoPoseWriter<B: ServoBus> {
    bus: B,
    limits: JointLimits,
    channels: ChannelMap,
    /// 累计写入失败次数
    failed_writes: u64,
}

impl<B: ServoBus> ServoPoseWriter<B> {
    pub fn new(bus: B, limits: JointLimits, channels: ChannelMap) -> Self {
        Self {
            bus,
            limits,
            channels,
            failed_writes: 0,
        }
    }

    pub fn limits(&self) -> &JointLimits {
        &self.limits
    }

    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// 累计写入失败次数
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes
    }

    pub fn into_bus(self) -> B {
        self.bus
    }
}

impl<B: ServoBus> PoseWriter for ServoPoseWriter<B> {
    fn write_pose(&mut self, pose: Pose) {
        let clamped = self.limits.clamp_pose(pose);
        if clamped != pose {
            trace!("clamped {} -> {}", pose, clamped);
        }

        for (joint, angle) in clamped.iter() {
            let channel = self.channels.channel(joint);
            if let Err(e) = self.bus.write_angle(channel, angle) {
                self.failed_writes += 1;
                error!("{} (channel {}) error writing angle {}: {}", joint, channel, angle, e);
            }
        }

        if let Err(e) = self.bus.flush() {
            self.failed_writes += 1;
            error!("Servo bus flush failed: {}", e);
        }
    }
}
