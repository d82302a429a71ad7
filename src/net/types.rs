/// 每个逻辑块（Block）的大小：256 字节
/// 远程控制器以“块”为最小读写单位。
pub const BLOCK_SIZE: usize = 256;

/// 阵列中磁盘的数量
pub const DISK_COUNT: usize = 16;

/// 每个磁盘包含的块数：64KB / 256B = 256 块
pub const BLOCKS_PER_DISK: usize = 256;

/// 单个磁盘的容量（单位：字节）
pub const DISK_SIZE: usize = BLOCK_SIZE * BLOCKS_PER_DISK;

/// 整个线性地址空间的总容量：16 * 64KB = 1MB
pub const CAPACITY: u64 = (DISK_COUNT * DISK_SIZE) as u64;

/// 单次 read/write 调用允许的最大传输长度
pub const MAX_TRANSFER: usize = 1024;

/// 定义一个逻辑块类型（每块 256 字节的字节数组）
/// 所有远程读写都以 Block 为单位进行。
pub type Block = [u8; BLOCK_SIZE];
