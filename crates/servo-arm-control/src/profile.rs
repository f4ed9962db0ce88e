//! # 机械臂配置文件
//!
//! TOML 格式，包含限位、夹爪开合角、home 位姿、运动参数、通道映射、命名位姿和任务表。
//!
//! 配置文件路径（CLI 默认）：
//! - Linux: `~/.config/servo-arm/profile.toml`
//! - macOS: `~/Library/Application Support/servo-arm/profile.toml`
//! - Windows: `%APPDATA%\servo-arm\profile.toml`
//!
//! 没有配置文件时使用内置的 [`ArmProfile::builtin`]。

use crate::error::ControlError;
use crate::task::{NamedPoses, TaskSequence};
use serde::{Deserialize, Serialize};
use servo_arm_client::{ChannelMap, GripperRange, JointLimits, JointRange, Pose};
use servo_arm_driver::{PulseRange, SerialSettings};
use servo_arm_protocol::RESERVED_KEYS;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// 内置配置
const BUILTIN_PROFILE: &str = include_str!("../profiles/default.toml");

/// 运动参数（步间延时 + 步长）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    pub step_delay_ms: u64,
    pub step_size: i32,
}

impl MotionParams {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            step_delay_ms: 15,
            step_size: 2,
        }
    }
}

/// 四个旋转关节的原始限位
///
/// 保留配置文件中的原始顺序，便于校验时发现写反的区间。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub base: [i32; 2],
    pub shoulder: [i32; 2],
    pub elbow: [i32; 2],
    pub wrist: [i32; 2],
}

impl LimitsConfig {
    fn entries(&self) -> [(&'static str, [i32; 2]); 4] {
        [
            ("base", self.base),
            ("shoulder", self.shoulder),
            ("elbow", self.elbow),
            ("wrist", self.wrist),
        ]
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let full = [0, 180];
        Self {
            base: full,
            shoulder: full,
            elbow: full,
            wrist: full,
        }
    }
}

/// 夹爪配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    pub open: i32,
    pub close: i32,
    /// 开合时的步间延时
    pub step_delay_ms: u64,
}

impl GripperConfig {
    pub fn range(&self) -> GripperRange {
        GripperRange::new(self.open, self.close)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for GripperConfig {
    fn default() -> Self {
        let range = GripperRange::default();
        Self {
            open: range.open,
            close: range.close,
            step_delay_ms: 10,
        }
    }
}

/// Home 位姿及回位运动参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub pose: Pose,
    pub step_delay_ms: u64,
    pub step_size: i32,
}

impl HomeConfig {
    pub fn motion(&self) -> MotionParams {
        MotionParams {
            step_delay_ms: self.step_delay_ms,
            step_size: self.step_size,
        }
    }
}

impl Default for HomeConfig {
    fn default() -> Self {
        let motion = MotionParams::default();
        Self {
            pose: Pose::splat(90),
            step_delay_ms: motion.step_delay_ms,
            step_size: motion.step_size,
        }
    }
}

/// 脉宽配置（微秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub min_us: u16,
    pub max_us: u16,
}

impl Default for PulseConfig {
    fn default() -> Self {
        let range = PulseRange::default();
        Self {
            min_us: range.min_us,
            max_us: range.max_us,
        }
    }
}

impl From<PulseConfig> for PulseRange {
    fn from(config: PulseConfig) -> Self {
        PulseRange::new(config.min_us, config.max_us)
    }
}

/// 串口参数（输出设备与 listen 输入设备共用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl SerialConfig {
    pub fn settings(&self) -> SerialSettings {
        SerialSettings {
            baud_rate: self.baud_rate,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        let settings = SerialSettings::default();
        Self {
            baud_rate: settings.baud_rate,
            timeout_ms: settings.timeout.as_millis() as u64,
        }
    }
}

/// 机械臂配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmProfile {
    pub limits: LimitsConfig,
    pub gripper: GripperConfig,
    pub home: HomeConfig,
    /// `d` 调试命令的运动参数
    pub debug: MotionParams,
    pub channels: ChannelMap,
    pub pulse: PulseConfig,
    pub serial: SerialConfig,
    pub poses: NamedPoses,
    pub tasks: Vec<TaskSequence>,
}

impl ArmProfile {
    /// 内置配置（两个抓取放置任务）
    pub fn builtin() -> Result<Self, ControlError> {
        Self::from_toml_str(BUILTIN_PROFILE)
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ControlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded profile from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ControlError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ControlError> {
        Ok(toml::to_string(self)?)
    }

    /// 保存到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ControlError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| ControlError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 限位表（写反的区间会被规范化）
    pub fn joint_limits(&self) -> JointLimits {
        let [base, shoulder, elbow, wrist] = self.limits.entries().map(|(_, [a, b])| {
            JointRange::new(a, b)
        });
        JointLimits::new(base, shoulder, elbow, wrist, self.gripper.range())
    }

    pub fn pulse_range(&self) -> PulseRange {
        self.pulse.into()
    }

    pub fn serial_settings(&self) -> SerialSettings {
        self.serial.settings()
    }

    /// 按 key 或名称查找任务
    pub fn task(&self, selector: &str) -> Option<&TaskSequence> {
        self.tasks.iter().find(|task| task.matches(selector))
    }

    pub fn task_by_key(&self, key: char) -> Option<&TaskSequence> {
        self.tasks.iter().find(|task| task.key == key)
    }

    /// 校验配置
    ///
    /// 返回警告列表（同时以 `warn!` 输出）；结构性问题返回错误：
    /// - 任务 key 重复或与内置命令冲突
    /// - 任务引用不存在的命名位姿
    /// - 两个关节共用同一通道
    /// - 波特率为 0
    pub fn validate(&self) -> Result<Vec<String>, ControlError> {
        let mut warnings = Vec::new();

        for (joint, [min, max]) in self.limits.entries() {
            if min > max {
                warnings.push(format!(
                    "{} range [{}, {}] is reversed, using [{}, {}]",
                    joint, min, max, max, min
                ));
            }
        }

        for (name, params) in [("home", self.home.motion()), ("debug", self.debug)] {
            if params.step_size <= 0 {
                warnings.push(format!(
                    "{} step_size {} is not positive, treated as 1",
                    name, params.step_size
                ));
            }
        }

        if self.channels.has_duplicates() {
            return Err(ControlError::InvalidProfile(format!(
                "duplicate servo channels: {:?}",
                self.channels
            )));
        }

        if self.serial.baud_rate == 0 {
            return Err(ControlError::InvalidProfile(
                "serial baud_rate must be positive".to_string(),
            ));
        }
        if self.serial.timeout_ms == 0 {
            warnings.push("serial timeout_ms is 0, reads will poll without waiting".to_string());
        }

        let mut keys = HashSet::new();
        for task in &self.tasks {
            if RESERVED_KEYS.contains(&task.key) {
                return Err(ControlError::InvalidProfile(format!(
                    "task '{}' uses reserved key '{}'",
                    task.name, task.key
                )));
            }
            if task.key.is_whitespace() {
                return Err(ControlError::InvalidProfile(format!(
                    "task '{}' has a blank key",
                    task.name
                )));
            }
            if !keys.insert(task.key) {
                return Err(ControlError::InvalidProfile(format!(
                    "duplicate task key '{}'",
                    task.key
                )));
            }

            for step in &task.steps {
                if let Some(pose) = step.pose_name() {
                    if !self.poses.contains_key(pose) {
                        return Err(ControlError::UnknownPose {
                            task: task.name.clone(),
                            pose: pose.to_string(),
                        });
                    }
                }
                match step.step_size() {
                    Some(step_size) if step_size <= 0 => warnings.push(format!(
                        "task '{}' step '{}' has step_size {}, treated as 1",
                        task.name, step, step_size
                    )),
                    _ => {},
                }
            }
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        Ok(warnings)
    }
}
