//! 控制层错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 控制层错误
#[derive(Error, Debug)]
pub enum ControlError {
    /// 读取配置文件失败
    #[error("Failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("Failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 配置校验失败
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// 任务表中没有该任务
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// 任务引用了不存在的命名位姿
    #[error("Task '{task}' references unknown pose '{pose}'")]
    UnknownPose { task: String, pose: String },
}
