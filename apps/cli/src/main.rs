//! # Servo Arm CLI
//!
//! Command-line interface for five-joint hobby-servo arms.
//!
//! ## 运行方式
//!
//! ### One-shot 模式
//!
//! ```bash
//! # 从 home 位姿运动到目标（dry-run：mock 输出，无延时）
//! servo-arm-cli --dry-run move 120 90 60 90 40
//!
//! # 在真实控制板上执行任务 'a'
//! servo-arm-cli --output /dev/ttyUSB0 run a
//! ```
//!
//! ### 行命令模式
//!
//! ```bash
//! # 交互式 Shell
//! $ servo-arm-cli shell
//! arm> d 120 90 60 90 40
//! arm> a
//! arm> exit
//!
//! # 从串口读取命令（两个设备都使用配置中的 [serial] 参数，可用 --baud 覆盖）
//! servo-arm-cli --output /dev/ttyUSB0 --baud 9600 listen --input /dev/ttyACM0
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod modes;
mod script;
mod session;

use commands::tasks::list_tasks;
use commands::{ConfigCommand, MoveCommand, RunCommand};
use modes::install_shutdown_handler;
use modes::listen::run_listen;
use modes::repl::run_repl;
use script::Script;
use session::{Session, SessionOptions};

/// Servo Arm CLI - 舵机机械臂命令行工具
#[derive(Parser, Debug)]
#[command(name = "servo-arm-cli")]
#[command(about = "Command-line interface for five-joint servo arm control", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件（默认 $CONFIG_DIR/servo-arm/profile.toml，不存在时使用内置配置）
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// 舵机输出：串口设备，或已存在的文件（追加帧流）；默认 mock 输出
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// 串口波特率（覆盖配置中的 [serial] baud_rate）
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// mock 输出且跳过步间延时
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动交互式 Shell（REPL 模式）
    Shell,

    /// 从设备、文件或 stdin 读取行命令
    Listen {
        /// 输入设备或文件（默认 stdin）
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// 从 home 位姿运动到目标位姿
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 执行配置中的任务
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 执行 JSON 脚本
    Script {
        /// 脚本文件路径
        file: PathBuf,
    },

    /// 列出任务
    Tasks,

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            profile: self.profile.clone(),
            output: self.output.clone(),
            dry_run: self.dry_run,
            baud_rate: self.baud,
        }
    }
}

fn main() -> Result<()> {
    // 初始化日志（stdout 留给命令输出）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("servo_arm_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let options = cli.session_options();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(cli.profile.as_deref()),

        Commands::Tasks => {
            let profile = commands::config::resolve_profile(cli.profile.as_deref())?;
            list_tasks(&profile);
            Ok(())
        },

        Commands::Move { args } => {
            let mut session = Session::open(&options)?;
            args.execute(&mut session)?;
            session.print_summary();
            Ok(())
        },

        Commands::Run { args } => {
            let mut session = Session::open(&options)?;
            args.execute(&mut session)?;
            session.print_summary();
            Ok(())
        },

        Commands::Script { file } => {
            let script = Script::load(&file)?;
            let mut session = Session::open(&options)?;
            script.execute(&mut session)?;
            session.print_summary();
            Ok(())
        },

        Commands::Listen { input } => {
            let shutdown = install_shutdown_handler()?;
            let mut session = Session::open(&options)?;
            run_listen(&mut session, input.as_deref(), &shutdown)?;
            session.print_summary();
            Ok(())
        },

        Commands::Shell => {
            let shutdown = install_shutdown_handler()?;
            let mut session = Session::open(&options)?;
            run_repl(&mut session, &shutdown)?;
            session.print_summary();
            Ok(())
        },
    }
}
