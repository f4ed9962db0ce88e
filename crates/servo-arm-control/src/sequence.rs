//! 任务执行器
//!
//! 先解析所有命名位姿，全部有效后才开始运动（引用错误时不会执行半个任务）。
//! 之后按顺序调用插值器，CurrentPose 从上一步流入下一步。

use crate::error::ControlError;
use crate::task::{GripperAction, NamedPoses, TaskSequence, TaskStep};
use servo_arm_client::control::Delay;
use servo_arm_client::{Arm, Pose, PoseWriter};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// 任务执行报告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// 执行的任务步骤数
    pub steps: usize,
    /// 发出的运动次数
    pub moves: u64,
    /// 插值步数累计
    pub interpolation_steps: u64,
    pub elapsed: Duration,
}

/// 已解析的步骤
#[derive(Debug, Clone, Copy)]
enum Action {
    Move {
        target: Pose,
        step_delay: Duration,
        step_size: i32,
    },
    Gripper {
        action: GripperAction,
        step_delay: Duration,
    },
    Home {
        step_delay: Duration,
        step_size: i32,
    },
    Pause(Duration),
    Skip,
}

/// 任务执行器
pub struct SequenceRunner;

impl SequenceRunner {
    /// 执行一个任务
    pub fn run<W, D>(
        arm: &mut Arm<W, D>,
        task: &TaskSequence,
        poses: &NamedPoses,
    ) -> Result<RunReport, ControlError>
    where
        W: PoseWriter,
        D: Delay,
    {
        info!("Running task '{}' ({})", task.key, task.name);
        let report = Self::run_steps(arm, &task.name, &task.steps, poses)?;
        info!(
            "Task '{}' done: {} moves, {} steps in {:?}",
            task.name, report.moves, report.interpolation_steps, report.elapsed
        );
        Ok(report)
    }

    /// 执行一串步骤（脚本或任务）
    pub fn run_steps<W, D>(
        arm: &mut Arm<W, D>,
        label: &str,
        steps: &[TaskStep],
        poses: &NamedPoses,
    ) -> Result<RunReport, ControlError>
    where
        W: PoseWriter,
        D: Delay,
    {
        let actions = Self::resolve(label, steps, poses)?;

        let started = Instant::now();
        let before = arm.stats();

        for (i, (step, action)) in steps.iter().zip(actions).enumerate() {
            debug!("[{}] step {}/{}: {}", label, i + 1, steps.len(), step);
            match action {
                Action::Move {
                    target,
                    step_delay,
                    step_size,
                } => arm.move_to_pose(target, step_delay, step_size),
                Action::Gripper {
                    action: GripperAction::Open,
                    step_delay,
                } => arm.open_gripper(step_delay),
                Action::Gripper {
                    action: GripperAction::Close,
                    step_delay,
                } => arm.close_gripper(step_delay),
                Action::Home {
                    step_delay,
                    step_size,
                } => arm.go_home(step_delay, step_size),
                Action::Pause(duration) => arm.delay_mut().delay(duration),
                Action::Skip => {},
            }
        }

        let after = arm.stats();
        Ok(RunReport {
            steps: steps.len(),
            moves: after.moves - before.moves,
            interpolation_steps: after.steps - before.steps,
            elapsed: started.elapsed(),
        })
    }

    fn resolve(
        label: &str,
        steps: &[TaskStep],
        poses: &NamedPoses,
    ) -> Result<Vec<Action>, ControlError> {
        steps
            .iter()
            .map(|step| {
                let step_delay = step.step_delay();
                Ok(match step {
                    TaskStep::Move {
                        pose, step_size, ..
                    } => Action::Move {
                        target: *poses.get(pose).ok_or_else(|| ControlError::UnknownPose {
                            task: label.to_string(),
                            pose: pose.clone(),
                        })?,
                        step_delay,
                        step_size: *step_size,
                    },
                    TaskStep::MoveTo { to, step_size, .. } => Action::Move {
                        target: *to,
                        step_delay,
                        step_size: *step_size,
                    },
                    TaskStep::Gripper { gripper, .. } => Action::Gripper {
                        action: *gripper,
                        step_delay,
                    },
                    TaskStep::Home {
                        home: true,
                        step_size,
                        ..
                    } => Action::Home {
                        step_delay,
                        step_size: *step_size,
                    },
                    TaskStep::Home { home: false, .. } => Action::Skip,
                    TaskStep::Pause { .. } => Action::Pause(step_delay),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servo_arm_client::control::RecordingDelay;
    use servo_arm_client::{ChannelMap, GripperRange, JointLimits, ServoPoseWriter};
    use servo_arm_driver::{MockServoBus, WriteLog};

    fn arm() -> (Arm<ServoPoseWriter<MockServoBus>, RecordingDelay>, WriteLog) {
        let bus = MockServoBus::new();
        let log = bus.log();
        let limits = JointLimits::default();
        let writer = ServoPoseWriter::new(bus, limits, ChannelMap::default());
        let arm = Arm::new(
            writer,
            RecordingDelay::new(),
            Pose::splat(90),
            GripperRange::new(90, 40),
        );
        (arm, log)
    }

    fn poses() -> NamedPoses {
        let mut poses = NamedPoses::new();
        poses.insert("above".to_string(), Pose::new(60, 100, 120, 90, 90));
        poses.insert("grab".to_string(), Pose::new(60, 120, 140, 80, 90));
        poses
    }

    fn pick_task() -> TaskSequence {
        TaskSequence::new(
            'a',
            "pick",
            vec![
                TaskStep::Move {
                    pose: "above".to_string(),
                    step_delay_ms: 0,
                    step_size: 5,
                },
                TaskStep::Move {
                    pose: "grab".to_string(),
                    step_delay_ms: 0,
                    step_size: 5,
                },
                TaskStep::Gripper {
                    gripper: GripperAction::Close,
                    step_delay_ms: 0,
                },
                TaskStep::Pause { pause_ms: 100 },
                TaskStep::Home {
                    home: true,
                    step_delay_ms: 0,
                    step_size: 5,
                },
            ],
        )
    }

    #[test]
    fn test_run_task_ends_at_home() {
        let (mut arm, log) = arm();
        let report = SequenceRunner::run(&mut arm, &pick_task(), &poses()).unwrap();

        assert_eq!(report.steps, 5);
        assert_eq!(report.moves, 4);
        assert_eq!(arm.current_pose(), Pose::splat(90));
        assert!(!log.is_empty());
    }

    #[test]
    fn test_current_pose_flows_between_steps() {
        let (mut arm, _log) = arm();
        let task = TaskSequence::new(
            'x',
            "two",
            vec![
                TaskStep::Move {
                    pose: "grab".to_string(),
                    step_delay_ms: 0,
                    step_size: 5,
                },
                TaskStep::Gripper {
                    gripper: GripperAction::Close,
                    step_delay_ms: 0,
                },
            ],
        );

        SequenceRunner::run(&mut arm, &task, &poses()).unwrap();
        // 夹爪闭合只改夹爪，其余关节保持在 grab
        assert_eq!(arm.current_pose(), Pose::new(60, 120, 140, 80, 40));
    }

    #[test]
    fn test_unknown_pose_means_no_motion() {
        let (mut arm, log) = arm();
        let mut task = pick_task();
        task.steps.push(TaskStep::Move {
            pose: "missing".to_string(),
            step_delay_ms: 0,
            step_size: 1,
        });

        let err = SequenceRunner::run(&mut arm, &task, &poses()).unwrap_err();
        assert!(matches!(err, ControlError::UnknownPose { ref pose, .. } if pose == "missing"));
        assert!(log.is_empty());
        assert_eq!(arm.current_pose(), Pose::splat(90));
        assert_eq!(arm.stats().moves, 0);
    }

    #[test]
    fn test_pause_uses_arm_delay() {
        let (mut arm, _log) = arm();
        let steps = vec![TaskStep::Pause { pause_ms: 250 }];
        let report = SequenceRunner::run_steps(&mut arm, "script", &steps, &poses()).unwrap();

        assert_eq!(report.moves, 0);
        assert_eq!(arm.delay().delays(), &[Duration::from_millis(250)]);
    }

    #[test]
    fn test_step_delays_follow_step_parameters() {
        let (mut arm, _log) = arm();
        let steps = vec![TaskStep::MoveTo {
            to: Pose::new(100, 90, 90, 90, 90),
            step_delay_ms: 7,
            step_size: 2,
        }];
        let report = SequenceRunner::run_steps(&mut arm, "script", &steps, &poses()).unwrap();

        assert_eq!(report.interpolation_steps, 5);
        assert_eq!(arm.delay().total(), Duration::from_millis(35));
    }

    #[test]
    fn test_home_false_is_skipped() {
        let (mut arm, log) = arm();
        let steps = vec![TaskStep::Home {
            home: false,
            step_delay_ms: 0,
            step_size: 1,
        }];
        let report = SequenceRunner::run_steps(&mut arm, "script", &steps, &poses()).unwrap();
        assert_eq!(report.moves, 0);
        assert!(log.is_empty());
    }
}
