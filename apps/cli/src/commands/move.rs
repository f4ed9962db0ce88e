//! 移动命令
//!
//! 从 home 位姿插值运动到目标位姿（一次性）。

use anyhow::Result;
use clap::Args;
use servo_arm_client::Pose;
use servo_arm_control::Response;
use std::time::Duration;

use crate::session::Session;

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 目标角度（度）：base shoulder elbow wrist gripper
    #[arg(required = true, num_args = 5, allow_negative_numbers = true)]
    pub angles: Vec<i32>,

    /// 步长（度，默认取配置中的 debug.step_size）
    #[arg(long, allow_negative_numbers = true)]
    pub step_size: Option<i32>,

    /// 步间延时（毫秒，默认取配置中的 debug.step_delay_ms）
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

impl MoveCommand {
    /// 目标位姿
    pub fn target(&self) -> Result<Pose> {
        let angles: [i32; 5] = self
            .angles
            .as_slice()
            .try_into()
            .map_err(|_| anyhow::anyhow!("Expected 5 angles, got {}", self.angles.len()))?;
        Ok(Pose::from(angles))
    }

    pub fn execute(&self, session: &mut Session) -> Result<()> {
        let target = self.target()?;
        let params = session.profile().debug;
        let step_size = self.step_size.unwrap_or(params.step_size);
        let step_delay = self
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| params.step_delay());

        let arm = session.dispatcher().arm_mut();
        arm.move_to_pose(target, step_delay, step_size);
        println!("{}", Response::Moved(arm.current_pose()));
        Ok(())
    }
}
