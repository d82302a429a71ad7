//! 进程内的模拟阵列控制器：在回环地址上监听，按真实线路协议应答。
//! 存储、挂载状态、写权限和当前 (disk, block) 指针都按协议语义维护。
//! 可注入故障，用于验证客户端在中途失败时的放弃与重试行为。

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use net_disk::net::protocol::{self, Command, PacketFlags, HEADER_LEN};
use net_disk::net::types::{Block, BLOCKS_PER_DISK, BLOCK_SIZE, CAPACITY, DISK_COUNT};

/// 控制器的故障注入模式
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// 正常应答所有命令
    None,
    /// 前 n 次 WriteBlock 正常，之后的 WriteBlock 一律置错误位
    RejectWriteBlockAfter(u32),
    /// 前 n 次 ReadBlock 置错误位，之后恢复正常（模拟瞬时故障）
    RejectFirstReadBlocks(u32),
    /// 应答 n 条命令后直接断开连接
    DisconnectAfter(u32),
    /// 应答 n 条命令后不再应答（连接保持打开）
    StallAfter(u32),
}

pub struct MockController {
    pub port: u16,
}

impl MockController {
    /// 启动一个监听线程；测试进程退出时线程随之结束
    pub fn spawn() -> Self {
        Self::spawn_with(Fault::None)
    }

    pub fn spawn_with(fault: Fault) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock controller");
        let port = listener.local_addr().expect("local addr").port();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let mut session = Session::new(stream, fault);
                let _ = session.run();
            }
        });
        Self { port }
    }
}

struct Session {
    stream: TcpStream,
    fault: Fault,
    storage: Vec<u8>, // 16 个磁盘拼接成的扁平内容
    mounted: bool,
    writable: bool,
    disk: usize,
    block: usize,       // 每次读/写后自动前移
    answered: u32,      // 已应答的命令数
    write_blocks: u32,  // 已成功执行的 WriteBlock 数
    rejected_reads: u32,
}

impl Session {
    fn new(stream: TcpStream, fault: Fault) -> Self {
        Self {
            stream,
            fault,
            storage: vec![0u8; CAPACITY as usize],
            mounted: false,
            writable: false,
            disk: 0,
            block: 0,
            answered: 0,
            write_blocks: 0,
            rejected_reads: 0,
        }
    }

    fn run(&mut self) -> std::io::Result<()> {
        loop {
            match self.fault {
                Fault::DisconnectAfter(n) if self.answered >= n => return Ok(()),
                Fault::StallAfter(n) if self.answered >= n => {
                    thread::sleep(Duration::from_secs(3600));
                    return Ok(());
                }
                _ => {}
            }

            let mut header = [0u8; HEADER_LEN];
            // 客户端断开即结束会话
            if self.stream.read_exact(&mut header).is_err() {
                return Ok(());
            }
            let descriptor = u32::from_be_bytes(header[0..4].try_into().unwrap());
            let flags = PacketFlags::from_bits_truncate(header[4]);
            let mut payload: Block = [0; BLOCK_SIZE];
            if flags.contains(PacketFlags::PAYLOAD) {
                self.stream.read_exact(&mut payload)?;
            }

            let (ok, data) = self.dispatch(protocol::decode_descriptor(descriptor), &payload);

            let mut resp_flags = PacketFlags::empty();
            if !ok {
                resp_flags |= PacketFlags::ERROR;
            }
            if data.is_some() {
                resp_flags |= PacketFlags::PAYLOAD;
            }
            let mut packet = Vec::with_capacity(HEADER_LEN + BLOCK_SIZE);
            packet.extend_from_slice(&descriptor.to_be_bytes());
            packet.push(resp_flags.bits());
            if let Some(block) = data {
                packet.extend_from_slice(&block);
            }
            self.stream.write_all(&packet)?;
            self.answered += 1;
        }
    }

    fn dispatch(&mut self, cmd: Option<Command>, payload: &Block) -> (bool, Option<Block>) {
        match cmd {
            Some(Command::Mount) => {
                self.mounted = true;
                (true, None)
            }
            Some(Command::Unmount) => {
                self.mounted = false;
                (true, None)
            }
            Some(Command::WritePermission) => {
                self.writable = true;
                (true, None)
            }
            Some(Command::RevokeWritePermission) => {
                self.writable = false;
                (true, None)
            }
            Some(Command::SeekToDisk(disk)) => {
                if self.mounted && (disk as usize) < DISK_COUNT {
                    self.disk = disk as usize;
                    (true, None)
                } else {
                    (false, None)
                }
            }
            Some(Command::SeekToBlock(block)) => {
                if self.mounted && (block as usize) < BLOCKS_PER_DISK {
                    self.block = block as usize;
                    (true, None)
                } else {
                    (false, None)
                }
            }
            Some(Command::ReadBlock) => {
                if let Fault::RejectFirstReadBlocks(n) = self.fault {
                    if self.rejected_reads < n {
                        self.rejected_reads += 1;
                        return (false, None);
                    }
                }
                if self.mounted && self.block < BLOCKS_PER_DISK {
                    let start = (self.disk * BLOCKS_PER_DISK + self.block) * BLOCK_SIZE;
                    let mut out: Block = [0; BLOCK_SIZE];
                    out.copy_from_slice(&self.storage[start..start + BLOCK_SIZE]);
                    self.block += 1;
                    (true, Some(out))
                } else {
                    (false, None)
                }
            }
            Some(Command::WriteBlock) => {
                if let Fault::RejectWriteBlockAfter(n) = self.fault {
                    if self.write_blocks >= n {
                        return (false, None);
                    }
                }
                if self.mounted && self.writable && self.block < BLOCKS_PER_DISK {
                    let start = (self.disk * BLOCKS_PER_DISK + self.block) * BLOCK_SIZE;
                    self.storage[start..start + BLOCK_SIZE].copy_from_slice(payload);
                    self.block += 1;
                    self.write_blocks += 1;
                    (true, None)
                } else {
                    (false, None)
                }
            }
            None => (false, None),
        }
    }
}
