//! 脚本系统
//!
//! JSON 脚本：一串任务步骤，可以引用配置中的命名位姿。
//!
//! ```json
//! {
//!   "name": "wave",
//!   "description": "swing the base twice",
//!   "steps": [
//!     { "to": [150, 90, 90, 90, 90], "step_delay_ms": 10, "step_size": 3 },
//!     { "to": [30, 90, 90, 90, 90], "step_delay_ms": 10, "step_size": 3 },
//!     { "pause_ms": 100 },
//!     { "home": true }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use servo_arm_control::{SequenceRunner, TaskStep};
use std::fs;
use std::path::Path;

use crate::session::Session;

/// 脚本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 步骤序列
    pub steps: Vec<TaskStep>,
}

impl Script {
    /// 加载脚本文件
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;

        let script: Script = serde_json::from_str(&content).context("Failed to parse script JSON")?;

        Ok(script)
    }

    /// 执行脚本
    pub fn execute(&self, session: &mut Session) -> Result<()> {
        println!("Script: {} ({} steps)", self.name, self.steps.len());
        if !self.description.is_empty() {
            println!("  {}", self.description);
        }

        let poses = session.profile().poses.clone();
        let report =
            SequenceRunner::run_steps(session.dispatcher().arm_mut(), &self.name, &self.steps, &poses)?;

        println!(
            "Script '{}' done: {} moves, {} steps in {:.2?}",
            self.name, report.moves, report.interpolation_steps, report.elapsed
        );
        println!("{}", session.dispatcher().arm().current_pose());
        Ok(())
    }
}
