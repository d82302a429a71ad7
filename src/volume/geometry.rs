use crate::net::types::{BLOCK_SIZE, DISK_SIZE};

/// 线性地址所在的磁盘号
pub fn disk_of(addr: u32) -> u8 {
    (addr as usize / DISK_SIZE) as u8
}

/// 线性地址在其磁盘内的块号
pub fn block_of(addr: u32) -> u16 {
    ((addr as usize % DISK_SIZE) / BLOCK_SIZE) as u16
}

/// 线性地址在其块内的偏移
pub fn intra_of(addr: u32) -> usize {
    addr as usize % BLOCK_SIZE
}
