//! 命令定义和实现

pub mod config;
pub mod r#move;
pub mod run;
pub mod tasks;

pub use config::ConfigCommand;
pub use r#move::MoveCommand;
pub use run::RunCommand;
