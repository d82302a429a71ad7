pub mod command;
pub mod parse;

use crate::shell::{command::execute_command, parse::parse_command};
use crate::volume::{config::VolumeConfig, Volume};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::{io::stdout, path::PathBuf};

pub fn start_shell() {
    banner();

    let username = whoami::username();
    let hostname = whoami::hostname();

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    // 初始化 reedline
    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".netdisk_history");

    let mut line_editor = Reedline::create().with_history(Box::new(
        reedline::FileBackedHistory::with_file(100, history_path).unwrap(),
    ));

    // 命令补全
    let commands = vec![
        "help",
        "connect",
        "disconnect",
        "mount",
        "unmount",
        "grant",
        "revoke",
        "read",
        "write",
        "fill",
        "status",
        "exit",
    ];
    let completer = reedline::DefaultCompleter::new_with_wordlen(
        commands.iter().map(|s| s.to_string()).collect(),
        2,
    );
    line_editor = line_editor.with_completer(Box::new(completer));

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!(
            "{}@{}",
            username.green().bold(),
            hostname.cyan().bold()
        )),
        DefaultPromptSegment::Basic("NetDisk".bright_blue().bold().to_string()),
    );

    // 整个会话共用一个卷对象；挂载与写权限状态都在它身上
    let mut volume = Volume::new(VolumeConfig::default());

    loop {
        let input = line_editor.read_line(&prompt);

        match input {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        if let Err(e) = execute_command(&cmd, &mut volume) {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        }
                        if matches!(cmd, command::Command::Exit) {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown command. Type 'help' for command list.".yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting NetDisk...".yellow());
                break;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    println!("{}", "GoodBye!".bright_yellow());
}

/// 清屏并打印欢迎信息
fn banner() {
    let mut stdout = stdout();

    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print("Welcome to NetDisk v0.1.0\n"),
        ResetColor
    )
    .unwrap();
    println!(
        "{}",
        "A linear volume over a remote JBOD array controller.".bright_black()
    );
}
