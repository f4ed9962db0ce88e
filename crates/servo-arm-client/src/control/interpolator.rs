//! Interpolator - 关节同步线性插值器
//!
//! 从起始位姿到目标位姿生成中间位姿序列。
//!
//! # 算法
//!
//! ```text
//! delta[j]  = target[j] - start[j]
//! max_delta = max_j |delta[j]|
//! steps     = max(1, floor(max_delta / step_size))
//! pose_i[j] = start[j] + trunc(delta[j] * i / steps),  i = 1..=steps
//! ```
//!
//! 所有关节共用同一个 `steps`，因此按同一归一化进度 `t = i / steps` 运动，
//! 同时出发、同时到达（不会出现某个关节先到位的"错位"现象）。
//!
//! 取整方向为向零截断；`i == steps` 时结果精确等于目标。
//!
//! # 示例
//!
//! ```rust
//! use servo_arm_client::control::Interpolator;
//! use servo_arm_client::types::Pose;
//!
//! let start = Pose::splat(0);
//! let target = Pose::new(100, 0, 0, 0, 0);
//!
//! let interp = Interpolator::new(start, target, 2);
//! assert_eq!(interp.steps(), 50);
//!
//! let last = interp.last().unwrap();
//! assert_eq!(last, target);
//! ```

use crate::types::{JOINT_COUNT, Joint, Pose};

/// 插值器
///
/// Iterator 模式：按需生成中间位姿，不分配内存。
#[derive(Debug, Clone)]
pub struct Interpolator {
    start: Pose,
    target: Pose,
    delta: [i64; JOINT_COUNT],
    max_delta: u64,
    steps: u64,
    /// 已产出的步数（0..=steps）
    current_index: u64,
}

impl Interpolator {
    /// 创建插值器
    ///
    /// `step_size <= 0` 按 1 处理（避免除零和死循环）。
    pub fn new(start: Pose, target: Pose, step_size: i32) -> Self {
        let delta = start.delta_to(&target);
        let max_delta = delta.iter().map(|d| d.unsigned_abs()).max().unwrap_or(0);
        let steps = Self::step_count(max_delta, step_size);

        Interpolator {
            start,
            target,
            delta,
            max_delta,
            steps,
            current_index: 0,
        }
    }

    /// 计算步数：`max(1, floor(max_delta / step_size))`
    ///
    /// ```rust
    /// # use servo_arm_client::control::Interpolator;
    /// assert_eq!(Interpolator::step_count(100, 2), 50);
    /// assert_eq!(Interpolator::step_count(5, 10), 1);
    /// assert_eq!(Interpolator::step_count(0, 3), 1);
    /// assert_eq!(Interpolator::step_count(7, 0), 7);
    /// assert_eq!(Interpolator::step_count(7, -4), 7);
    /// ```
    pub fn step_count(max_delta: u64, step_size: i32) -> u64 {
        let step_size = normalize_step_size(step_size) as u64;
        (max_delta / step_size).max(1)
    }

    /// 第 `i` 步的位姿（`1 <= i <= steps`）
    fn pose_at(&self, i: u64) -> Pose {
        let steps = self.steps as i128;
        let i = i as i128;
        self.start.map_with_joint(|joint, s| {
            let d = self.delta[joint.index()] as i128;
            // i128 整数除法向零截断
            let offset = d * i / steps;
            (s as i128 + offset) as i32
        })
    }

    pub fn start(&self) -> Pose {
        self.start
    }

    pub fn target(&self) -> Pose {
        self.target
    }

    /// 总步数
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// 最大关节行程（度）
    pub fn max_delta(&self) -> u64 {
        self.max_delta
    }

    /// 行程最大的关节（决定步数）
    pub fn dominant_joint(&self) -> Joint {
        Joint::ALL
            .into_iter()
            .max_by_key(|joint| (self.delta[joint.index()].unsigned_abs(), -(joint.index() as i64)))
            .unwrap_or(Joint::Base)
    }
}

impl Iterator for Interpolator {
    type Item = Pose;

    fn next(&mut self) -> Option<Pose> {
        if self.current_index >= self.steps {
            return None;
        }

        self.current_index += 1;
        Some(self.pose_at(self.current_index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps - self.current_index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Interpolator {}

/// `step_size <= 0` 视为 1
#[inline]
pub fn normalize_step_size(step_size: i32) -> i32 {
    step_size.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_count_scenario() {
        let interp = Interpolator::new(Pose::splat(0), Pose::new(100, 0, 0, 0, 0), 2);
        assert_eq!(interp.max_delta(), 100);
        assert_eq!(interp.steps(), 50);
        assert_eq!(interp.len(), 50);
    }

    #[test]
    fn test_small_delta_single_step() {
        // base 90 -> 95，step 10：floor(5/10) = 0 -> 1 步，直接到位
        let start = Pose::new(90, 90, 90, 90, 90);
        let target = Pose::new(95, 90, 90, 90, 90);

        let poses: Vec<_> = Interpolator::new(start, target, 10).collect();
        assert_eq!(poses, vec![target]);
    }

    #[test]
    fn test_identical_poses_single_step() {
        let pose = Pose::new(10, 20, 30, 40, 50);
        let mut interp = Interpolator::new(pose, pose, 3);

        assert_eq!(interp.max_delta(), 0);
        assert_eq!(interp.steps(), 1);
        assert_eq!(interp.next(), Some(pose));
        assert_eq!(interp.next(), None);
    }

    #[test]
    fn test_non_positive_step_size_treated_as_one() {
        let start = Pose::splat(0);
        let target = Pose::new(0, 0, 0, 0, 6);

        assert_eq!(Interpolator::new(start, target, 0).steps(), 6);
        assert_eq!(Interpolator::new(start, target, -5).steps(), 6);
        assert_eq!(Interpolator::new(start, target, i32::MIN).steps(), 6);
    }

    #[test]
    fn test_last_pose_is_exact_target() {
        let start = Pose::new(0, 180, 45, 90, 40);
        let target = Pose::new(133, 7, 91, 90, 90);

        let last = Interpolator::new(start, target, 7).last().unwrap();
        assert_eq!(last, target);
    }

    #[test]
    fn test_joints_are_synchronized() {
        // base 走 100°，elbow 走 -50°：每一步 elbow 进度约为 base 的一半
        let start = Pose::new(0, 90, 100, 90, 90);
        let target = Pose::new(100, 90, 50, 90, 90);

        let interp = Interpolator::new(start, target, 10);
        assert_eq!(interp.steps(), 10);
        assert_eq!(interp.dominant_joint(), Joint::Base);

        for (i, pose) in interp.enumerate() {
            let i = (i + 1) as i32;
            assert_eq!(pose.base, 10 * i);
            assert_eq!(pose.elbow, 100 - 5 * i);
            assert_eq!(pose.shoulder, 90);
        }
    }

    #[test]
    fn test_truncation_toward_zero() {
        // delta = 10，steps = 3：10/3 = 3.33 -> 3，20/3 = 6.67 -> 6
        let start = Pose::splat(0);
        let target = Pose::new(10, -10, 0, 0, 0);
        let poses: Vec<_> = Interpolator::new(start, target, 3).collect();

        assert_eq!(poses.len(), 3);
        assert_eq!((poses[0].base, poses[0].shoulder), (3, -3));
        assert_eq!((poses[1].base, poses[1].shoulder), (6, -6));
        assert_eq!((poses[2].base, poses[2].shoulder), (10, -10));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let start = Pose::splat(i32::MIN);
        let target = Pose::splat(i32::MAX);
        let interp = Interpolator::new(start, target, i32::MAX);

        assert_eq!(interp.steps(), 2);
        let poses: Vec<_> = interp.collect();
        assert_eq!(poses[1], target);
    }
}
