use crate::shell::command::Command;
use crate::utils::parse_u32;

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "connect" => {
            if args.len() >= 2 {
                Some(Command::Connect(
                    args[0].to_string(),
                    args[1].parse().ok()?,
                ))
            } else {
                None
            }
        }
        "disconnect" => Some(Command::Disconnect),
        "mount" => Some(Command::Mount),
        "unmount" => Some(Command::Unmount),
        "grant" => Some(Command::Grant),
        "revoke" => Some(Command::Revoke),
        "read" => {
            if args.len() >= 2 {
                Some(Command::Read(parse_u32(args[0])?, parse_u32(args[1])?))
            } else {
                None
            }
        }
        "write" => {
            if args.len() >= 2 {
                Some(Command::Write(parse_u32(args[0])?, args[1..].join(" ")))
            } else {
                None
            }
        }
        "fill" => {
            if args.len() >= 3 {
                Some(Command::Fill(
                    parse_u32(args[0])?,
                    parse_u32(args[1])?,
                    u8::try_from(parse_u32(args[2])?).ok()?,
                ))
            } else {
                None
            }
        }
        "status" => Some(Command::Status),
        "exit" => Some(Command::Exit),
        _ => None,
    }
}
