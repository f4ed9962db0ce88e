//! 任务数据模型
//!
//! 任务是数据而不是代码：一个单字符按键对应一串有序的运动步骤，
//! 每一步都带自己的步间延时和步长。

use serde::{Deserialize, Serialize};
use servo_arm_client::Pose;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// 命名位姿表（名称 -> 位姿）
pub type NamedPoses = BTreeMap<String, Pose>;

fn default_step_delay_ms() -> u64 {
    15
}

fn default_step_size() -> i32 {
    2
}

fn default_gripper_delay_ms() -> u64 {
    10
}

/// 夹爪动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GripperAction {
    Open,
    Close,
}

impl fmt::Display for GripperAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GripperAction::Open => write!(f, "open"),
            GripperAction::Close => write!(f, "close"),
        }
    }
}

/// 任务步骤
///
/// 按字段名区分（untagged），多余字段视为错误：
///
/// ```toml
/// { move = "above_left", step_delay_ms = 15, step_size = 2 }
/// { to = [90, 120, 90, 90, 40], step_delay_ms = 20, step_size = 1 }
/// { gripper = "close", step_delay_ms = 10 }
/// { home = true, step_delay_ms = 15, step_size = 2 }
/// { pause_ms = 200 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum TaskStep {
    /// 运动到命名位姿
    Move {
        #[serde(rename = "move")]
        pose: String,
        #[serde(default = "default_step_delay_ms")]
        step_delay_ms: u64,
        #[serde(default = "default_step_size")]
        step_size: i32,
    },

    /// 运动到字面位姿
    MoveTo {
        to: Pose,
        #[serde(default = "default_step_delay_ms")]
        step_delay_ms: u64,
        #[serde(default = "default_step_size")]
        step_size: i32,
    },

    /// 张开/闭合夹爪（固定步长）
    Gripper {
        gripper: GripperAction,
        #[serde(default = "default_gripper_delay_ms")]
        step_delay_ms: u64,
    },

    /// 回 home 位姿（`home = false` 时跳过）
    Home {
        home: bool,
        #[serde(default = "default_step_delay_ms")]
        step_delay_ms: u64,
        #[serde(default = "default_step_size")]
        step_size: i32,
    },

    /// 原地停顿
    Pause { pause_ms: u64 },
}

impl TaskStep {
    /// 步骤中的 step_size（没有则为 None）
    pub fn step_size(&self) -> Option<i32> {
        match self {
            TaskStep::Move { step_size, .. }
            | TaskStep::MoveTo { step_size, .. }
            | TaskStep::Home { step_size, .. } => Some(*step_size),
            TaskStep::Gripper { .. } | TaskStep::Pause { .. } => None,
        }
    }

    /// 引用的命名位姿
    pub fn pose_name(&self) -> Option<&str> {
        match self {
            TaskStep::Move { pose, .. } => Some(pose),
            _ => None,
        }
    }

    /// 是否会驱动舵机
    pub fn is_motion(&self) -> bool {
        match self {
            TaskStep::Pause { .. } => false,
            TaskStep::Home { home, .. } => *home,
            _ => true,
        }
    }

    pub fn step_delay(&self) -> Duration {
        match self {
            TaskStep::Move { step_delay_ms, .. }
            | TaskStep::MoveTo { step_delay_ms, .. }
            | TaskStep::Gripper { step_delay_ms, .. }
            | TaskStep::Home { step_delay_ms, .. } => Duration::from_millis(*step_delay_ms),
            TaskStep::Pause { pause_ms } => Duration::from_millis(*pause_ms),
        }
    }
}

impl fmt::Display for TaskStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStep::Move {
                pose,
                step_delay_ms,
                step_size,
            } => write!(f, "move {} ({}ms, step {})", pose, step_delay_ms, step_size),
            TaskStep::MoveTo {
                to,
                step_delay_ms,
                step_size,
            } => write!(f, "move to [{}] ({}ms, step {})", to, step_delay_ms, step_size),
            TaskStep::Gripper {
                gripper,
                step_delay_ms,
            } => write!(f, "gripper {} ({}ms)", gripper, step_delay_ms),
            TaskStep::Home {
                home: true,
                step_delay_ms,
                step_size,
            } => write!(f, "home ({}ms, step {})", step_delay_ms, step_size),
            TaskStep::Home { home: false, .. } => write!(f, "home (skipped)"),
            TaskStep::Pause { pause_ms } => write!(f, "pause {}ms", pause_ms),
        }
    }
}

/// 一个按键触发的任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSequence {
    /// 触发按键（单字符）
    pub key: char,
    pub name: String,
    #[serde(default)]
    pub steps: Vec<TaskStep>,
}

impl TaskSequence {
    pub fn new(key: char, name: impl Into<String>, steps: Vec<TaskStep>) -> Self {
        Self {
            key,
            name: name.into(),
            steps,
        }
    }

    /// 按 key（单字符）或名称匹配
    pub fn matches(&self, selector: &str) -> bool {
        let mut chars = selector.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c == self.key => true,
            _ => self.name == selector,
        }
    }
}
