//! 会话
//!
//! 按全局参数加载配置、打开舵机输出，构造命令分发器。
//! 启动时把 home 位姿写一次，让舵机与 CurrentPose 一致。
//!
//! `--output` 指向已存在的普通文件时追加帧流，否则按串口设备打开。

use anyhow::{Context, Result};
use servo_arm_client::ServoPoseWriter;
use servo_arm_client::control::{Delay, NoDelay, SpinDelay};
use servo_arm_control::{ArmBuilder, ArmProfile, Dispatcher};
use servo_arm_driver::{
    MockServoBus, SerialServoBus, SerialSettings, ServoBus, WriteLog, is_regular_file,
};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::commands::config::resolve_profile;

/// 会话使用的分发器类型
pub type SessionDispatcher = Dispatcher<ServoPoseWriter<Box<dyn ServoBus>>, Box<dyn Delay>>;

/// 输出与配置选项
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// 配置文件（None 时使用默认路径或内置配置）
    pub profile: Option<PathBuf>,
    /// 舵机输出设备（None 时使用 mock）
    pub output: Option<PathBuf>,
    /// 强制 mock 输出并跳过步间延时
    pub dry_run: bool,
    /// 覆盖配置中的波特率
    pub baud_rate: Option<u32>,
}

/// 一次 CLI 会话
pub struct Session {
    dispatcher: SessionDispatcher,
    /// mock 输出的写入日志
    log: Option<WriteLog>,
    serial: SerialSettings,
}

impl Session {
    pub fn open(options: &SessionOptions) -> Result<Self> {
        let profile = resolve_profile(options.profile.as_deref())?;
        for warning in profile.validate().context("Profile validation failed")? {
            eprintln!("warning: {}", warning);
        }
        Self::with_profile(profile, options)
    }

    pub fn with_profile(profile: ArmProfile, options: &SessionOptions) -> Result<Self> {
        let mut serial = profile.serial_settings();
        if let Some(baud_rate) = options.baud_rate {
            serial.baud_rate = baud_rate;
        }

        let (bus, log) = open_output(&profile, &serial, options)?;
        let delay: Box<dyn Delay> = if options.dry_run {
            Box::new(NoDelay)
        } else {
            Box::new(SpinDelay)
        };

        let arm = ArmBuilder::new(&profile).sync(true).build(bus, delay);
        Ok(Self {
            dispatcher: Dispatcher::new(arm, profile),
            log,
            serial,
        })
    }

    pub fn dispatcher(&mut self) -> &mut SessionDispatcher {
        &mut self.dispatcher
    }

    pub fn profile(&self) -> &ArmProfile {
        self.dispatcher.profile()
    }

    /// 生效的串口参数（配置 + `--baud`）
    pub fn serial_settings(&self) -> &SerialSettings {
        &self.serial
    }

    /// mock 输出累计写入次数
    pub fn mock_writes(&self) -> Option<usize> {
        self.log.as_ref().map(|log| log.len())
    }

    /// 打印会话摘要（dry-run 时显示写入次数）
    pub fn print_summary(&self) {
        let stats = self.dispatcher.arm().stats();
        info!(
            "Session done: {} moves, {} steps, {} pose writes",
            stats.moves, stats.steps, stats.writes
        );
        if let Some(writes) = self.mock_writes() {
            println!("dry-run: {} servo writes", writes);
        }
    }
}

fn open_output(
    profile: &ArmProfile,
    serial: &SerialSettings,
    options: &SessionOptions,
) -> Result<(Box<dyn ServoBus>, Option<WriteLog>)> {
    match (&options.output, options.dry_run) {
        (Some(path), false) => {
            let bus = open_serial(path, serial, profile)
                .with_context(|| format!("Failed to open servo output {}", path.display()))?;
            Ok((bus, None))
        },
        _ => {
            let mock = MockServoBus::new().with_pulse_range(profile.pulse_range());
            let log = mock.log();
            info!("Using mock servo output");
            let bus: Box<dyn ServoBus> = Box::new(mock);
            Ok((bus, Some(log)))
        },
    }
}

fn open_serial(
    path: &Path,
    serial: &SerialSettings,
    profile: &ArmProfile,
) -> Result<Box<dyn ServoBus>> {
    let pulse = profile.pulse_range();
    let bus: Box<dyn ServoBus> = if is_regular_file(path) {
        Box::new(SerialServoBus::open_file(path, pulse)?)
    } else {
        Box::new(SerialServoBus::open_device(path, serial, pulse)?)
    };
    Ok(bus)
}
