use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;

use crate::net::types::{BLOCKS_PER_DISK, BLOCK_SIZE, CAPACITY, DISK_COUNT, MAX_TRANSFER};
use crate::utils::hex_dump;
use crate::volume::error::VolumeError;
use crate::volume::Volume;

#[derive(Debug)]
pub enum Command {
    Help,
    Connect(String, u16),
    Disconnect,
    Mount,
    Unmount,
    Grant,
    Revoke,
    Read(u32, u32),
    Write(u32, String),
    Fill(u32, u32, u8),
    Status,
    Exit,
}

pub fn execute_command(cmd: &Command, volume: &mut Volume) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => print_help(),
        Command::Connect(host, port) => {
            volume.connect(host, *port)?;
            println!(
                "🔌 Connected to controller at {}",
                format!("{}:{}", host, port).green()
            );
        }
        Command::Disconnect => {
            volume.disconnect();
            println!("{}", "🔌 Disconnected.".yellow());
        }
        Command::Mount => {
            volume.mount()?;
            println!("{}", "💿 Array mounted.".green());
        }
        Command::Unmount => {
            volume.unmount()?;
            println!("{}", "💿 Array unmounted.".yellow());
        }
        Command::Grant => {
            volume.grant_write()?;
            println!("{}", "✏️  Write permission granted.".green());
        }
        Command::Revoke => {
            volume.revoke_write()?;
            println!("{}", "🔒 Write permission revoked.".yellow());
        }
        Command::Read(offset, len) => {
            // 先卡住范围再分配缓冲区，拦掉诸如 0xffffffff 的离谱长度
            if *offset as u64 + *len as u64 > CAPACITY {
                return Err(Box::new(VolumeError::OutOfRange {
                    offset: *offset,
                    len: *len as usize,
                }));
            }
            let mut data = vec![0u8; *len as usize];
            // 单次调用的上限是 MAX_TRANSFER，超长请求在这里切片
            for (i, chunk) in data.chunks_mut(MAX_TRANSFER).enumerate() {
                let at = offset + (i * MAX_TRANSFER) as u32;
                volume.read(at, chunk)?;
            }
            print!("{}", hex_dump(*offset, &data));
            println!("📖 Read {} bytes at offset {}", len, offset);
        }
        Command::Write(offset, text) => {
            let data = text.as_bytes();
            for (i, chunk) in data.chunks(MAX_TRANSFER).enumerate() {
                let at = offset + (i * MAX_TRANSFER) as u32;
                volume.write(at, chunk)?;
            }
            println!(
                "✅ Wrote {} bytes at offset {}",
                data.len().to_string().green(),
                offset
            );
        }
        Command::Fill(offset, len, byte) => {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "This overwrites {} bytes starting at offset {}. Continue?",
                    len, offset
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }

            let pb = ProgressBar::new(*len as u64);
            pb.set_style(
                ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} bytes")?
                    .progress_chars("=> "),
            );
            let mut remaining = *len as usize;
            let mut at = *offset;
            while remaining > 0 {
                let chunk = remaining.min(MAX_TRANSFER);
                volume.write(at, &vec![*byte; chunk])?;
                at += chunk as u32;
                remaining -= chunk;
                pb.inc(chunk as u64);
            }
            pb.finish_with_message("done");
            println!("✅ Filled {} bytes with 0x{:02x}", len, byte);
        }
        Command::Status => {
            let state = |on: bool| {
                if on {
                    "yes".green()
                } else {
                    "no".red()
                }
            };
            println!("{}", "📊 Volume Status".bright_yellow().bold());
            println!("  {}: {}", "Connected".blue(), state(volume.is_connected()));
            println!("  {}: {}", "Mounted".blue(), state(volume.is_mounted()));
            println!("  {}: {}", "Writable".blue(), state(volume.is_writable()));
            println!(
                "  {}: {} disks x {} blocks x {} bytes = {} bytes",
                "Geometry".blue(),
                DISK_COUNT,
                BLOCKS_PER_DISK,
                BLOCK_SIZE,
                CAPACITY
            );
        }
        Command::Exit => println!("{}", "👋 Exiting NetDisk shell...".yellow().bold()),
    }

    Ok(())
}

fn print_help() {
    println!("{}", "📘 NetDisk Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  connect <host> <port>    Connect to the array controller
  disconnect               Drop the connection
  mount                    Mount the array (required before read)
  unmount                  Unmount the array
  grant                    Request write permission
  revoke                   Give up write permission
  read <offset> <len>      Hex-dump <len> bytes from the volume
  write <offset> <text>    Write a text string at <offset>
  fill <offset> <len> <b>  Fill a range with byte <b> (asks first)
  status                   Show connection / mount state and geometry
  help                     Show this help message
  exit                     Quit the shell

  Offsets and lengths accept decimal or 0x-prefixed hex.
"
        .bright_black()
    );
}
