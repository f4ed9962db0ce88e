//! run 命令
//!
//! 按 key 或名称执行配置中的任务

use anyhow::Result;
use clap::Args;
use servo_arm_control::{ControlError, Response, SequenceRunner};

use crate::session::Session;

/// 任务执行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 任务 key（单字符）或名称
    pub task: String,
}

impl RunCommand {
    pub fn execute(&self, session: &mut Session) -> Result<()> {
        let profile = session.profile();
        let task = profile
            .task(&self.task)
            .cloned()
            .ok_or_else(|| ControlError::UnknownTask(self.task.clone()))?;
        let poses = profile.poses.clone();

        let report = SequenceRunner::run(session.dispatcher().arm_mut(), &task, &poses)?;
        println!(
            "{}",
            Response::TaskDone {
                key: task.key,
                name: task.name,
                report,
            }
        );
        Ok(())
    }
}
