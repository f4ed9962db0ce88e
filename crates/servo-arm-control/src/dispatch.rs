//! 命令分发
//!
//! 把一行文本解析成 [`ArmCommand`] 并在 [`Arm`] 上执行。格式错误和未知命令只返回诊断，
//! 不会产生任何运动。

use crate::error::ControlError;
use crate::profile::ArmProfile;
use crate::sequence::{RunReport, SequenceRunner};
use servo_arm_client::control::Delay;
use servo_arm_client::{Arm, Pose, PoseWriter};
use servo_arm_protocol::{ArmCommand, ProtocolError, parse_line};
use std::fmt;
use std::fmt::Write as _;
use tracing::{debug, warn};

/// 命令执行结果
#[derive(Debug)]
pub enum Response {
    /// 运动完成，附带新的 CurrentPose
    Moved(Pose),
    /// 任务完成
    TaskDone {
        key: char,
        name: String,
        report: RunReport,
    },
    /// 当前指令位姿
    Pose(Pose),
    Help(String),
    /// 空行
    Ignored,
    /// 格式错误（未运动）
    FormatError(ProtocolError),
    /// 未知命令或任务键（未运动）
    Unrecognized(String),
    /// 任务执行前校验失败（未运动）
    Failed(ControlError),
}

impl Response {
    /// 是否产生了运动
    pub fn is_motion(&self) -> bool {
        matches!(self, Response::Moved(_) | Response::TaskDone { .. })
    }

    /// 是否是诊断（错误）输出
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Response::FormatError(_) | Response::Unrecognized(_) | Response::Failed(_)
        )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Moved(pose) => write!(f, "OK {}", pose),
            Response::TaskDone { key, name, report } => write!(
                f,
                "Task '{}' ({}) done: {} moves, {} steps in {:.2?}",
                key, name, report.moves, report.interpolation_steps, report.elapsed
            ),
            Response::Pose(pose) => write!(f, "{}", pose),
            Response::Help(text) => write!(f, "{}", text),
            Response::Ignored => Ok(()),
            Response::FormatError(e) => write!(f, "{}", e),
            Response::Unrecognized(command) => write!(f, "Unrecognized command: '{}'", command),
            Response::Failed(e) => write!(f, "Error: {}", e),
        }
    }
}

/// 命令分发器
pub struct Dispatcher<W: PoseWriter, D: Delay> {
    arm: Arm<W, D>,
    profile: ArmProfile,
}

impl<W: PoseWriter, D: Delay> Dispatcher<W, D> {
    pub fn new(arm: Arm<W, D>, profile: ArmProfile) -> Self {
        Self { arm, profile }
    }

    pub fn arm(&self) -> &Arm<W, D> {
        &self.arm
    }

    pub fn arm_mut(&mut self) -> &mut Arm<W, D> {
        &mut self.arm
    }

    pub fn profile(&self) -> &ArmProfile {
        &self.profile
    }

    pub fn into_arm(self) -> Arm<W, D> {
        self.arm
    }

    /// 处理一行输入
    pub fn handle_line(&mut self, line: &str) -> Response {
        match parse_line(line) {
            Ok(None) => Response::Ignored,
            Ok(Some(command)) => self.execute(command),
            Err(ProtocolError::Unrecognized(command)) => {
                warn!("Unrecognized command: {:?}", command);
                Response::Unrecognized(command)
            },
            Err(e) => {
                warn!("{}", e);
                Response::FormatError(e)
            },
        }
    }

    /// 执行已解析的命令
    pub fn execute(&mut self, command: ArmCommand) -> Response {
        debug!("Executing {:?}", command);
        match command {
            ArmCommand::Debug(angles) => {
                let params = self.profile.debug;
                self.arm
                    .move_to_pose(Pose::from(angles), params.step_delay(), params.step_size);
                Response::Moved(self.arm.current_pose())
            },
            ArmCommand::Reset => {
                let params = self.profile.home.motion();
                self.arm.go_home(params.step_delay(), params.step_size);
                Response::Moved(self.arm.current_pose())
            },
            ArmCommand::OpenGripper => {
                self.arm.open_gripper(self.profile.gripper.step_delay());
                Response::Moved(self.arm.current_pose())
            },
            ArmCommand::CloseGripper => {
                self.arm.close_gripper(self.profile.gripper.step_delay());
                Response::Moved(self.arm.current_pose())
            },
            ArmCommand::Status => Response::Pose(self.arm.current_pose()),
            ArmCommand::Help => Response::Help(help_text(&self.profile)),
            ArmCommand::Task(key) => self.run_task(key),
        }
    }

    fn run_task(&mut self, key: char) -> Response {
        let Some(task) = self.profile.task_by_key(key) else {
            warn!("No task bound to key '{}'", key);
            return Response::Unrecognized(key.to_string());
        };

        match SequenceRunner::run(&mut self.arm, task, &self.profile.poses) {
            Ok(report) => Response::TaskDone {
                key,
                name: task.name.clone(),
                report,
            },
            Err(e) => {
                warn!("Task '{}' rejected: {}", task.name, e);
                Response::Failed(e)
            },
        }
    }
}

/// 帮助文本（含任务表）
pub fn help_text(profile: &ArmProfile) -> String {
    let mut text = String::from(
        "Commands:\n\
         \x20 d b s e w g   move to angles (base shoulder elbow wrist gripper)\n\
         \x20 r             reset to home pose\n\
         \x20 o / c         open / close gripper\n\
         \x20 p             print current pose\n\
         \x20 h / ?         this help\n",
    );

    if !profile.tasks.is_empty() {
        text.push_str("Tasks:\n");
        for task in &profile.tasks {
            let _ = writeln!(text, "  {}             {}", task.key, task.name);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ArmBuilder;
    use servo_arm_client::ServoPoseWriter;
    use servo_arm_client::control::RecordingDelay;
    use servo_arm_driver::{MockServoBus, WriteLog};

    fn dispatcher() -> (
        Dispatcher<ServoPoseWriter<MockServoBus>, RecordingDelay>,
        WriteLog,
    ) {
        let profile = ArmProfile::builtin().unwrap();
        let bus = MockServoBus::new();
        let log = bus.log();
        let arm = ArmBuilder::new(&profile).build(bus, RecordingDelay::new());
        (Dispatcher::new(arm, profile), log)
    }

    #[test]
    fn test_debug_move() {
        let (mut d, log) = dispatcher();
        let response = d.handle_line("d 100 90 90 90 60");

        assert!(response.is_motion());
        assert_eq!(d.arm().current_pose(), Pose::new(100, 90, 90, 90, 60));
        // 调试参数 step_size = 1：max_delta 30 -> 30 步 + 1 次对齐
        assert_eq!(log.len(), 31 * 5);
        assert_eq!(d.arm().delay().total().as_millis(), 30 * 20);
    }

    #[test]
    fn test_debug_out_of_range_is_clamped_downstream() {
        let (mut d, log) = dispatcher();
        d.handle_line("d 90 200 90 90 90");

        // CurrentPose 记录请求值，写出的 shoulder 钳位到 165
        assert_eq!(d.arm().current_pose().shoulder, 200);
        assert_eq!(log.last_angle(1), Some(165));
    }

    #[test]
    fn test_format_error_causes_no_motion() {
        let (mut d, log) = dispatcher();

        for line in ["d 1 2 3", "d 1 2 3 4 x", "r now"] {
            let response = d.handle_line(line);
            assert!(matches!(response, Response::FormatError(_)), "{}", line);
            assert!(response.to_string().starts_with("Format error"));
        }
        assert!(log.is_empty());
        assert_eq!(d.arm().stats().moves, 0);
    }

    #[test]
    fn test_unknown_task_key() {
        let (mut d, log) = dispatcher();
        let response = d.handle_line("z");
        assert!(matches!(response, Response::Unrecognized(ref k) if k == "z"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_blank_line_ignored() {
        let (mut d, _log) = dispatcher();
        assert!(matches!(d.handle_line("   "), Response::Ignored));
        assert_eq!(d.handle_line("").to_string(), "");
    }

    #[test]
    fn test_status_and_help() {
        let (mut d, log) = dispatcher();

        let response = d.handle_line("p");
        assert_eq!(response.to_string(), Pose::splat(90).to_string());

        let help = d.handle_line("?").to_string();
        assert!(help.contains("reset to home pose"));
        assert!(help.contains("pick-left-place-right"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_gripper_commands() {
        let (mut d, _log) = dispatcher();
        d.handle_line("c");
        assert_eq!(d.arm().current_pose().gripper, 40);
        d.handle_line("o");
        assert_eq!(d.arm().current_pose().gripper, 90);
    }

    #[test]
    fn test_reset_returns_home() {
        let (mut d, _log) = dispatcher();
        d.handle_line("d 10 20 30 40 50");
        let response = d.handle_line("r");
        assert_eq!(response.to_string(), format!("OK {}", Pose::splat(90)));
    }

    #[test]
    fn test_run_task_by_key() {
        let (mut d, _log) = dispatcher();
        let response = d.handle_line("a");

        match response {
            Response::TaskDone { key, name, report } => {
                assert_eq!(key, 'a');
                assert_eq!(name, "pick-left-place-right");
                assert_eq!(report.steps, 10);
                assert_eq!(report.moves, 9);
            },
            other => panic!("unexpected response: {:?}", other),
        }
        assert_eq!(d.arm().current_pose(), Pose::splat(90));
    }

    #[test]
    fn test_task_with_bad_pose_fails_without_motion() {
        let mut profile = ArmProfile::builtin().unwrap();
        profile.poses.remove("drop_right");
        let bus = MockServoBus::new();
        let log = bus.log();
        let arm = ArmBuilder::new(&profile).build(bus, RecordingDelay::new());
        let mut d = Dispatcher::new(arm, profile);

        let response = d.handle_line("a");
        assert!(matches!(response, Response::Failed(ControlError::UnknownPose { .. })));
        assert!(response.is_error());
        assert!(log.is_empty());
    }
}
