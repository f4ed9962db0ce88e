//! 运动控制模块
//!
//! - `Interpolator` - 关节同步线性插值器
//! - `Delay` - 步间阻塞延时

pub mod delay;
pub mod interpolator;

// 重新导出常用类型
pub use delay::{Delay, NoDelay, RecordingDelay, SpinDelay};
pub use interpolator::{Interpolator, normalize_step_size};
