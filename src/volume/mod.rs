use crate::net::client::ArrayClient;
use crate::net::protocol::Command;
use crate::net::types::{Block, BLOCK_SIZE, CAPACITY, MAX_TRANSFER};
use crate::volume::config::VolumeConfig;
use crate::volume::error::{Result, VolumeError};
use crate::volume::geometry::{block_of, disk_of, intra_of};

pub mod config;
pub mod error;
pub mod geometry;

/// 指向远程磁盘阵列的一个线性卷会话。
/// 挂载与写权限状态都挂在会话对象上，由调用方持有；
/// 不存在进程级单例，多个会话互相独立。
#[derive(Debug)]
pub struct Volume {
    client: ArrayClient,
    config: VolumeConfig,
    mounted: bool,  // 是否已挂载（读操作的前提）
    writable: bool, // 是否已授予写权限（与挂载状态相互独立）
}

impl Volume {
    pub fn new(config: VolumeConfig) -> Self {
        let client = ArrayClient::new(config.timeout);
        Self {
            client,
            config,
            mounted: false,
            writable: false,
        }
    }

    pub fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        self.client.connect(host, port)
    }

    pub fn disconnect(&mut self) {
        self.client.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// 执行一次往返；控制器报错时按配置做有限次重试。
    /// 传输错误立即放弃：出错后流的位置不可知，重发只会脱帧。
    fn op(&mut self, cmd: Command, mut block: Option<&mut Block>) -> Result<()> {
        let mut attempt = 0;
        loop {
            match self.client.execute(cmd, block.as_deref_mut()) {
                Err(VolumeError::Controller(_)) if attempt < self.config.retries => attempt += 1,
                outcome => return outcome,
            }
        }
    }

    /// 挂载阵列；失败时本地状态不变。
    /// 重复挂载不做本地拦截，命令原样下发，由控制器裁决。
    pub fn mount(&mut self) -> Result<()> {
        self.op(Command::Mount, None)?;
        self.mounted = true;
        Ok(())
    }

    pub fn unmount(&mut self) -> Result<()> {
        self.op(Command::Unmount, None)?;
        self.mounted = false;
        Ok(())
    }

    pub fn grant_write(&mut self) -> Result<()> {
        self.op(Command::WritePermission, None)?;
        self.writable = true;
        Ok(())
    }

    pub fn revoke_write(&mut self) -> Result<()> {
        self.op(Command::RevokeWritePermission, None)?;
        self.writable = false;
        Ok(())
    }

    /// 从线性地址 offset 处读满 buf。
    /// 校验顺序：传输上限、地址范围、挂载状态，全部在任何网络 I/O 之前；
    /// 挂载必须由调用方事先完成，read 不会顺手挂载。
    /// 中途失败立即返回错误，已拷入 buf 的前缀保持原样（不回滚）。
    pub fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<u32> {
        let len = buf.len();
        if len > MAX_TRANSFER {
            return Err(VolumeError::TransferTooLarge(len));
        }
        let end = offset as u64 + len as u64;
        if end > CAPACITY {
            return Err(VolumeError::OutOfRange { offset, len });
        }
        if !self.mounted {
            return Err(VolumeError::NotMounted);
        }
        // 零长度传输：校验通过即成功，不产生任何网络 I/O
        if len == 0 {
            return Ok(0);
        }

        let mut cur_disk = disk_of(offset);
        self.op(Command::SeekToDisk(cur_disk), None)?;
        self.op(Command::SeekToBlock(block_of(offset)), None)?;

        let mut scratch: Block = [0; BLOCK_SIZE];
        let mut cursor = offset;
        while (cursor as u64) < end {
            let disk = disk_of(cursor);
            // 跨过磁盘边界：块号回绕到新磁盘的 0 号块，需要重新定位；
            // 同一磁盘内控制器在每次读后自动前移块指针，无需重复 seek
            if disk != cur_disk {
                self.op(Command::SeekToDisk(disk), None)?;
                self.op(Command::SeekToBlock(block_of(cursor)), None)?;
                cur_disk = disk;
            }
            self.op(Command::ReadBlock, Some(&mut scratch))?;

            let intra = intra_of(cursor);
            let copy_len = (BLOCK_SIZE - intra).min((end - cursor as u64) as usize);
            let dst = (cursor - offset) as usize;
            buf[dst..dst + copy_len].copy_from_slice(&scratch[intra..intra + copy_len]);
            cursor += copy_len as u32;
        }
        Ok(len as u32)
    }

    /// 把 data 写入线性地址 offset 处。
    /// 逐块做 read-modify-write，保住写入范围之外的字节；
    /// 中途失败时整个操作放弃，已写入的块保持已提交（不回滚），
    /// 错误里带上已提交的前缀长度。
    pub fn write(&mut self, offset: u32, data: &[u8]) -> Result<u32> {
        let len = data.len();
        if len > MAX_TRANSFER {
            return Err(VolumeError::TransferTooLarge(len));
        }
        let end = offset as u64 + len as u64;
        if end > CAPACITY {
            return Err(VolumeError::OutOfRange { offset, len });
        }
        if !self.mounted {
            return Err(VolumeError::NotMounted);
        }
        if !self.writable {
            return Err(VolumeError::NotWritable);
        }
        if len == 0 {
            return Ok(0);
        }

        let mut committed: u32 = 0;
        match self.write_blocks(offset, data, &mut committed) {
            Ok(()) => Ok(len as u32),
            Err(source) => Err(VolumeError::Partial {
                committed,
                source: Box::new(source),
            }),
        }
    }

    fn write_blocks(&mut self, offset: u32, data: &[u8], committed: &mut u32) -> Result<()> {
        let end = offset as u64 + data.len() as u64;
        let mut scratch: Block = [0; BLOCK_SIZE];
        let mut cursor = offset;
        while (cursor as u64) < end {
            let disk = disk_of(cursor);
            let block = block_of(cursor);

            // 先取出整块旧数据
            self.op(Command::SeekToDisk(disk), None)?;
            self.op(Command::SeekToBlock(block), None)?;
            self.op(Command::ReadBlock, Some(&mut scratch))?;

            // ReadBlock 会使控制器的块指针前移，写回前必须重新定位
            self.op(Command::SeekToDisk(disk), None)?;
            self.op(Command::SeekToBlock(block), None)?;

            let intra = intra_of(cursor);
            let splice_len = (BLOCK_SIZE - intra).min((end - cursor as u64) as usize);
            let src = (cursor - offset) as usize;
            scratch[intra..intra + splice_len].copy_from_slice(&data[src..src + splice_len]);
            self.op(Command::WriteBlock, Some(&mut scratch))?;

            cursor += splice_len as u32;
            *committed = cursor - offset;
        }
        Ok(())
    }
}
