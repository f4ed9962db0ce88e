//! 串口命令解析
//!
//! 行协议：每行一个命令，首字符选择命令类型。
//!
//! | 命令 | 含义 |
//! |------|------|
//! | `d b s e w g` | 调试移动（5 个整数角度） |
//! | `r` | 复位（回到 home 位姿） |
//! | `o` / `c` | 张开 / 闭合夹爪 |
//! | `p` | 查询当前指令位姿 |
//! | `h` / `?` | 帮助 |
//! | 其他单字符 | 任务键（由配置文件中的任务表解释） |
//!
//! 调试移动的角度不做范围检查，越界值由 PoseWriter 钳位。

use crate::JOINT_COUNT;
use thiserror::Error;

/// 保留的命令字符，任务键不能使用
pub const RESERVED_KEYS: [char; 7] = ['d', 'r', 'o', 'c', 'p', 'h', '?'];

/// 协议解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// 调试命令参数数量错误
    #[error("Format error: expected {expected} angles, got {actual}")]
    Format { expected: usize, actual: usize },

    /// 参数不是整数
    #[error("Format error: invalid angle '{token}'")]
    InvalidNumber { token: String },

    /// 无参数命令带了多余参数
    #[error("Format error: '{command}' takes no arguments")]
    UnexpectedArguments { command: char },

    /// 命令字不是单个字符
    #[error("Unrecognized command: '{0}'")]
    Unrecognized(String),
}

/// 解析后的串口命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmCommand {
    /// 调试移动：`[base, shoulder, elbow, wrist, gripper]`
    Debug([i32; JOINT_COUNT]),
    /// 回到 home 位姿
    Reset,
    /// 张开夹爪
    OpenGripper,
    /// 闭合夹爪
    CloseGripper,
    /// 查询当前位姿
    Status,
    /// 帮助
    Help,
    /// 任务键
    Task(char),
}

/// 解析一行命令
///
/// 空行返回 `Ok(None)`。
///
/// # 示例
///
/// ```rust
/// use servo_arm_protocol::{ArmCommand, parse_line};
///
/// let cmd = parse_line("d 90 90 90 90 40").unwrap();
/// assert_eq!(cmd, Some(ArmCommand::Debug([90, 90, 90, 90, 40])));
/// assert_eq!(parse_line("   ").unwrap(), None);
/// ```
pub fn parse_line(line: &str) -> Result<Option<ArmCommand>, ProtocolError> {
    let mut tokens = line.split_whitespace();

    let Some(head) = tokens.next() else {
        return Ok(None);
    };

    let mut chars = head.chars();
    let key = match (chars.next(), chars.next()) {
        (Some(key), None) => key,
        _ => return Err(ProtocolError::Unrecognized(head.to_string())),
    };

    let args: Vec<&str> = tokens.collect();

    if key == 'd' {
        return parse_debug(&args).map(Some);
    }

    if !args.is_empty() {
        return Err(ProtocolError::UnexpectedArguments { command: key });
    }

    let cmd = match key {
        'r' => ArmCommand::Reset,
        'o' => ArmCommand::OpenGripper,
        'c' => ArmCommand::CloseGripper,
        'p' => ArmCommand::Status,
        'h' | '?' => ArmCommand::Help,
        other => ArmCommand::Task(other),
    };

    Ok(Some(cmd))
}

fn parse_debug(args: &[&str]) -> Result<ArmCommand, ProtocolError> {
    if args.len() != JOINT_COUNT {
        return Err(ProtocolError::Format {
            expected: JOINT_COUNT,
            actual: args.len(),
        });
    }

    let mut angles = [0i32; JOINT_COUNT];
    for (slot, token) in angles.iter_mut().zip(args) {
        *slot = token.parse().map_err(|_| ProtocolError::InvalidNumber {
            token: token.to_string(),
        })?;
    }

    Ok(ArmCommand::Debug(angles))
}
