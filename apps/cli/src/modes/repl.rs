//! REPL 模式（交互式 Shell）
//!
//! 专用输入线程持有 rustyline Editor（保留历史记录），命令经有界通道交给控制线程。

use anyhow::Result;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use servo_arm_control::Response;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use tracing::warn;

use super::input::{InputEvent, LineInput};
use crate::session::Session;

const PROMPT: &str = "arm> ";

/// 历史文件路径
fn history_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("servo-arm");
    path.push("history.txt");
    Some(path)
}

/// 创建专用输入线程
fn spawn_readline() -> LineInput {
    LineInput::spawn(|tx| {
        let mut rl = match Editor::<(), DefaultHistory>::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                let _ = tx.send(InputEvent::Eof);
                return;
            },
        };

        let history = history_path();
        if let Some(path) = &history {
            rl.load_history(path).ok(); // 首次运行没有历史文件
        }

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());

                    let exit = line == "exit" || line == "quit";
                    if tx.send(InputEvent::Line(line)).is_err() || exit {
                        break;
                    }
                },

                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    let _ = tx.send(InputEvent::Interrupt);
                    break;
                },

                Err(ReadlineError::Eof) => {
                    let _ = tx.send(InputEvent::Eof);
                    break;
                },

                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    let _ = tx.send(InputEvent::Eof);
                    break;
                },
            }
        }

        if let Some(path) = &history {
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            if let Err(e) = rl.save_history(path) {
                warn!("Failed to save history: {}", e);
            }
        }
    })
}

/// 运行 REPL 模式
pub fn run_repl(session: &mut Session, shutdown: &AtomicBool) -> Result<()> {
    println!("Servo Arm CLI v{} - interactive shell", env!("CARGO_PKG_VERSION"));
    println!("Type 'h' for help, 'exit' to quit");
    println!();

    let input = spawn_readline();

    while let Some(event) = input.next_event(shutdown) {
        let line = match event {
            InputEvent::Line(line) => line,
            InputEvent::Interrupt | InputEvent::Eof => break,
        };

        match line.as_str() {
            "exit" | "quit" => break,
            "help" => println!("{}", session.dispatcher().handle_line("h")),
            _ => match session.dispatcher().handle_line(&line) {
                Response::Ignored => {},
                response if response.is_error() => {
                    eprintln!("{}", response);
                    eprintln!("Hint: type 'h' to list commands");
                },
                response => println!("{}", response),
            },
        }
    }

    println!("Bye");
    Ok(())
}
