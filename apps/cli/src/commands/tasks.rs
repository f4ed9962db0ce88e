//! tasks 命令
//!
//! 列出配置中的任务

use servo_arm_control::ArmProfile;

/// 打印任务表
pub fn list_tasks(profile: &ArmProfile) {
    if profile.tasks.is_empty() {
        println!("(no tasks)");
        return;
    }

    println!("{:<4} {:<28} STEPS", "KEY", "NAME");
    for task in &profile.tasks {
        println!("{:<4} {:<28} {}", task.key, task.name, task.steps.len());
    }
}
