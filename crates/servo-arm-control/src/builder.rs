//! Builder 模式实现
//!
//! 由配置文件、舵机总线和延时器链式构造 [`Arm`]。

use crate::profile::ArmProfile;
use servo_arm_client::control::Delay;
use servo_arm_client::{Arm, Pose, ServoPoseWriter};
use servo_arm_driver::ServoBus;
use tracing::info;

/// Arm Builder（链式构造）
///
/// # Example
///
/// ```
/// use servo_arm_client::control::NoDelay;
/// use servo_arm_control::{ArmBuilder, ArmProfile};
/// use servo_arm_driver::MockServoBus;
///
/// let profile = ArmProfile::builtin().unwrap();
/// let bus = MockServoBus::new();
/// let log = bus.log();
///
/// let arm = ArmBuilder::new(&profile).sync(true).build(bus, NoDelay);
/// assert_eq!(arm.current_pose(), profile.home.pose);
/// assert_eq!(log.len(), 5);
/// ```
pub struct ArmBuilder<'a> {
    profile: &'a ArmProfile,
    /// 覆盖配置中的 home 位姿
    home: Option<Pose>,
    /// 构造后立即把 home 位姿写一次
    sync: bool,
}

impl<'a> ArmBuilder<'a> {
    pub fn new(profile: &'a ArmProfile) -> Self {
        Self {
            profile,
            home: None,
            sync: false,
        }
    }

    /// 覆盖 home 位姿（可选）
    pub fn home(mut self, pose: Pose) -> Self {
        self.home = Some(pose);
        self
    }

    /// 构造后是否同步舵机（默认 false）
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// 构造 Arm
    pub fn build<B, D>(self, bus: B, delay: D) -> Arm<ServoPoseWriter<B>, D>
    where
        B: ServoBus,
        D: Delay,
    {
        let limits = self.profile.joint_limits();
        let home = self.home.unwrap_or(self.profile.home.pose);
        let writer = ServoPoseWriter::new(bus, limits, self.profile.channels);

        let mut arm = Arm::new(writer, delay, home, limits.gripper);
        if self.sync {
            info!("Syncing servos to home pose {}", home);
            arm.sync();
        }
        arm
    }
}
