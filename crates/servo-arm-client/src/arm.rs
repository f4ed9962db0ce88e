//! Arm - 机械臂控制器
//!
//! 持有当前指令位姿（CurrentPose）、位姿写入器和延时器。
//!
//! # 设计
//!
//! - **单一写者**：CurrentPose 只在 [`Arm::move_to_pose`] 结束时更新，没有全局状态
//! - **原子运动**：`move_to_pose` 需要 `&mut self`，两次运动的步序列不可能交错
//! - **不可抢占**：一旦开始，运动总是执行到结束（没有取消机制）
//! - **不可失败**：任何目标位姿都合法，越界值由 PoseWriter 钳位
//!
//! # 示例
//!
//! ```rust
//! use servo_arm_client::{Arm, ChannelMap, ServoPoseWriter};
//! use servo_arm_client::control::RecordingDelay;
//! use servo_arm_client::types::{JointLimits, Pose};
//! use servo_arm_driver::MockServoBus;
//! use std::time::Duration;
//!
//! let limits = JointLimits::default();
//! let writer = ServoPoseWriter::new(MockServoBus::new(), limits, ChannelMap::default());
//! let mut arm = Arm::new(writer, RecordingDelay::new(), Pose::splat(90), limits.gripper);
//!
//! let target = Pose::new(120, 90, 60, 90, 40);
//! arm.move_to_pose(target, Duration::from_millis(15), 2);
//! assert_eq!(arm.current_pose(), target);
//! ```

use crate::control::{Delay, Interpolator};
use crate::types::{GripperRange, Pose};
use crate::writer::PoseWriter;
use std::time::Duration;
use tracing::{debug, info};

/// 夹爪开合使用的固定步长（度）
pub const GRIPPER_STEP_SIZE: i32 = 1;

/// 运动统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionStats {
    /// 完成的运动次数
    pub moves: u64,
    /// 插值步数累计
    pub steps: u64,
    /// PoseWriter 写入次数累计
    pub writes: u64,
}

/// 机械臂控制器
pub struct Arm<W: PoseWriter, D: Delay> {
    /// 最后一次指令位姿（不是传感器读数）
    current: Pose,
    home: Pose,
    gripper: GripperRange,
    writer: W,
    delay: D,
    stats: MotionStats,
}

impl<W: PoseWriter, D: Delay> Arm<W, D> {
    /// 创建控制器，CurrentPose 初始化为 `home`
    ///
    /// 不会写硬件；需要让舵机与 CurrentPose 对齐时调用 [`Arm::sync`]。
    pub fn new(writer: W, delay: D, home: Pose, gripper: GripperRange) -> Self {
        Self {
            current: home,
            home,
            gripper,
            writer,
            delay,
            stats: MotionStats::default(),
        }
    }

    /// 当前指令位姿
    pub fn current_pose(&self) -> Pose {
        self.current
    }

    pub fn home_pose(&self) -> Pose {
        self.home
    }

    pub fn gripper(&self) -> GripperRange {
        self.gripper
    }

    pub fn stats(&self) -> MotionStats {
        self.stats
    }

    /// 把 CurrentPose 原样写一次（启动时让硬件与指令状态一致）
    pub fn sync(&mut self) {
        debug!("Syncing servos to {}", self.current);
        self.emit(self.current);
    }

    /// 插值运动到目标位姿
    ///
    /// 1. 快照 `start = CurrentPose`
    /// 2. `steps = max(1, floor(max_delta / step_size))`（`step_size <= 0` 按 1）
    /// 3. 每一步写入中间位姿，然后阻塞 `step_delay`
    /// 4. 结束后 `CurrentPose = target`，并再写一次精确目标
    ///
    /// 共写入 `steps + 1` 次，延时 `steps` 次。
    pub fn move_to_pose(&mut self, target: Pose, step_delay: Duration, step_size: i32) {
        let start = self.current;
        let interpolator = Interpolator::new(start, target, step_size);
        let steps = interpolator.steps();

        info!(
            "Moving {} -> {} ({} steps, dominant {} travels {} deg, {:?}/step)",
            start,
            target,
            steps,
            interpolator.dominant_joint(),
            interpolator.max_delta(),
            step_delay
        );

        for (i, pose) in interpolator.enumerate() {
            debug!("step {}/{}: {}", i + 1, steps, pose);
            self.emit(pose);
            self.delay.delay(step_delay);
        }

        // 精确到位，不依赖最后一步的截断结果
        self.current = target;
        self.emit(target);

        self.stats.moves += 1;
        self.stats.steps += steps;
    }

    /// 张开夹爪（只改夹爪角度，步长固定）
    pub fn open_gripper(&mut self, step_delay: Duration) {
        let target = self.current.with_gripper(self.gripper.open);
        self.move_to_pose(target, step_delay, GRIPPER_STEP_SIZE);
    }

    /// 闭合夹爪（只改夹爪角度，步长固定）
    pub fn close_gripper(&mut self, step_delay: Duration) {
        let target = self.current.with_gripper(self.gripper.close);
        self.move_to_pose(target, step_delay, GRIPPER_STEP_SIZE);
    }

    /// 回到 home 位姿
    pub fn go_home(&mut self, step_delay: Duration, step_size: i32) {
        self.move_to_pose(self.home, step_delay, step_size);
    }

    fn emit(&mut self, pose: Pose) {
        self.writer.write_pose(pose);
        self.stats.writes += 1;
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::RecordingDelay;

    /// 记录原始（未钳位）写入的 PoseWriter
    #[derive(Default)]
    struct PoseLog(Vec<Pose>);

    impl PoseWriter for PoseLog {
        fn write_pose(&mut self, pose: Pose) {
            self.0.push(pose);
        }
    }

    fn arm_at(home: Pose) -> Arm<PoseLog, RecordingDelay> {
        Arm::new(
            PoseLog::default(),
            RecordingDelay::new(),
            home,
            GripperRange::new(90, 40),
        )
    }

    #[test]
    fn test_initial_pose_is_home() {
        let arm = arm_at(Pose::splat(90));
        assert_eq!(arm.current_pose(), Pose::splat(90));
        assert_eq!(arm.home_pose(), Pose::splat(90));
        assert!(arm.writer().0.is_empty());
    }

    #[test]
    fn test_move_writes_steps_plus_one() {
        let mut arm = arm_at(Pose::splat(0));
        let target = Pose::new(100, 0, 0, 0, 0);

        arm.move_to_pose(target, Duration::from_millis(20), 2);

        assert_eq!(arm.writer().0.len(), 51);
        assert_eq!(arm.delay().count(), 50);
        assert_eq!(arm.delay().total(), Duration::from_millis(1000));
        assert_eq!(arm.current_pose(), target);
        assert_eq!(*arm.writer().0.last().unwrap(), target);
    }

    #[test]
    fn test_move_to_current_pose() {
        let home = Pose::new(90, 80, 70, 60, 50);
        let mut arm = arm_at(home);

        arm.move_to_pose(home, Duration::from_millis(7), 5);

        // 一步插值 + 最终对齐，关节不变
        assert_eq!(arm.writer().0, vec![home, home]);
        assert_eq!(arm.delay().count(), 1);
        assert_eq!(arm.current_pose(), home);
    }

    #[test]
    fn test_zero_step_size_terminates() {
        let mut arm = arm_at(Pose::splat(0));
        arm.move_to_pose(Pose::new(0, 0, 0, 0, 10), Duration::ZERO, 0);
        assert_eq!(arm.stats().steps, 10);
        assert_eq!(arm.current_pose(), Pose::new(0, 0, 0, 0, 10));
    }

    #[test]
    fn test_current_pose_updated_only_at_end() {
        // 越界目标：CurrentPose 精确等于请求值（钳位只影响硬件写入）
        let mut arm = arm_at(Pose::splat(90));
        let target = Pose::new(400, -30, 90, 90, 90);
        arm.move_to_pose(target, Duration::ZERO, 50);
        assert_eq!(arm.current_pose(), target);
    }

    #[test]
    fn test_gripper_operations() {
        let mut arm = arm_at(Pose::new(90, 90, 90, 90, 90));

        arm.close_gripper(Duration::from_millis(5));
        assert_eq!(arm.current_pose(), Pose::new(90, 90, 90, 90, 40));
        // 固定步长 1°：50 步 + 1 次对齐
        assert_eq!(arm.stats().steps, 50);
        assert!(
            arm.writer()
                .0
                .iter()
                .all(|p| p.base == 90 && p.shoulder == 90 && p.elbow == 90 && p.wrist == 90)
        );

        arm.open_gripper(Duration::from_millis(5));
        assert_eq!(arm.current_pose().gripper, 90);
    }

    #[test]
    fn test_sequential_moves_chain_current_pose() {
        let mut arm = arm_at(Pose::splat(90));
        let a = Pose::new(60, 100, 120, 90, 90);
        let b = Pose::new(60, 120, 140, 80, 90);

        arm.move_to_pose(a, Duration::ZERO, 3);
        arm.writer_mut().0.clear();
        arm.move_to_pose(b, Duration::ZERO, 3);

        // 第二次运动从 a 出发
        let first = arm.writer().0[0];
        assert!(first.shoulder > a.shoulder && first.shoulder <= b.shoulder);
        assert_eq!(arm.current_pose(), b);
        assert_eq!(arm.stats().moves, 2);
    }

    #[test]
    fn test_go_home_and_sync() {
        let home = Pose::splat(90);
        let mut arm = arm_at(home);
        arm.move_to_pose(Pose::splat(30), Duration::ZERO, 10);
        arm.go_home(Duration::ZERO, 10);
        assert_eq!(arm.current_pose(), home);

        let before = arm.stats().writes;
        arm.sync();
        assert_eq!(arm.stats().writes, before + 1);
        assert_eq!(*arm.writer().0.last().unwrap(), home);
    }
}
