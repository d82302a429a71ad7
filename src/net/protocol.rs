use bitflags::bitflags;

use crate::net::types::{Block, BLOCK_SIZE, DISK_COUNT};

/// 数据包头长度：4 字节操作描述符 + 1 字节状态位
pub const HEADER_LEN: usize = 5;

/// 命令码位于描述符的 [12:18) 位
const CMD_SHIFT: u32 = 12;
const CMD_MASK: u32 = 0x3f;

/// seek-to-block 的块号位于 [4:12) 位
const BLOCK_SHIFT: u32 = 4;

bitflags! {
    /// 状态字节：bit0 = 控制器报错，bit1 = 头后紧跟一个 256 字节数据块
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PacketFlags: u8 {
        const ERROR = 0b01;
        const PAYLOAD = 0b10;
    }
}

/// 控制器命令集（与远程阵列控制器的协议约定一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Mount,                 // 挂载阵列
    Unmount,               // 卸载阵列
    SeekToDisk(u8),        // 定位到指定磁盘
    SeekToBlock(u16),      // 定位到当前磁盘内的指定块
    ReadBlock,             // 读当前位置的整块
    WriteBlock,            // 写当前位置的整块（请求携带数据）
    WritePermission,       // 授予写权限
    RevokeWritePermission, // 撤销写权限
}

impl Command {
    fn code(self) -> u32 {
        match self {
            Command::Mount => 0,
            Command::Unmount => 1,
            Command::SeekToDisk(_) => 2,
            Command::SeekToBlock(_) => 3,
            Command::ReadBlock => 4,
            Command::WriteBlock => 5,
            Command::WritePermission => 6,
            Command::RevokeWritePermission => 7,
        }
    }

    /// 只有 WriteBlock 请求携带数据块
    pub fn carries_payload(self) -> bool {
        matches!(self, Command::WriteBlock)
    }
}

/// 把命令编码为 32 位操作描述符。
/// 参数域由调用方保证不越界（磁盘号 < 16，块号 < 256）。
pub fn encode_descriptor(cmd: Command) -> u32 {
    let param = match cmd {
        Command::SeekToDisk(disk) => disk as u32,
        Command::SeekToBlock(block) => (block as u32) << BLOCK_SHIFT,
        _ => 0,
    };
    (cmd.code() << CMD_SHIFT) | param
}

/// 从描述符还原命令；非法命令码或参数域越界返回 None
pub fn decode_descriptor(op: u32) -> Option<Command> {
    if op >> (CMD_SHIFT + 6) != 0 {
        return None;
    }
    let code = (op >> CMD_SHIFT) & CMD_MASK;
    let param = op & 0xfff;
    match code {
        0 if param == 0 => Some(Command::Mount),
        1 if param == 0 => Some(Command::Unmount),
        2 if param < DISK_COUNT as u32 => Some(Command::SeekToDisk(param as u8)),
        3 if param & 0xf == 0 => Some(Command::SeekToBlock((param >> BLOCK_SHIFT) as u16)),
        4 if param == 0 => Some(Command::ReadBlock),
        5 if param == 0 => Some(Command::WriteBlock),
        6 if param == 0 => Some(Command::WritePermission),
        7 if param == 0 => Some(Command::RevokeWritePermission),
        _ => None,
    }
}

/// 编码一个不携带数据的请求包（除 WriteBlock 外的所有命令）
pub fn encode_request(cmd: Command) -> Vec<u8> {
    let mut packet = Vec::with_capacity(HEADER_LEN);
    packet.extend_from_slice(&encode_descriptor(cmd).to_be_bytes());
    packet.push(PacketFlags::empty().bits());
    packet
}

/// 编码一个 WriteBlock 请求包：头部置数据位，后接整块数据
pub fn encode_write_request(block: &Block) -> Vec<u8> {
    let mut packet = Vec::with_capacity(HEADER_LEN + BLOCK_SIZE);
    packet.extend_from_slice(&encode_descriptor(Command::WriteBlock).to_be_bytes());
    packet.push(PacketFlags::PAYLOAD.bits());
    packet.extend_from_slice(block);
    packet
}

/// 响应头：回显的描述符 + 状态位
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeader {
    pub descriptor: u32,
    pub flags: PacketFlags,
}

impl ResponseHeader {
    pub fn is_error(&self) -> bool {
        self.flags.contains(PacketFlags::ERROR)
    }

    pub fn has_payload(&self) -> bool {
        self.flags.contains(PacketFlags::PAYLOAD)
    }
}

/// 解析 5 字节响应头；描述符为网络字节序
pub fn decode_response_header(header: &[u8; HEADER_LEN]) -> ResponseHeader {
    let descriptor = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    // 未定义的状态位直接丢弃
    let flags = PacketFlags::from_bits_truncate(header[4]);
    ResponseHeader { descriptor, flags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_bit_layout() {
        assert_eq!(encode_descriptor(Command::Mount), 0x0000);
        assert_eq!(encode_descriptor(Command::Unmount), 0x1000);
        assert_eq!(encode_descriptor(Command::SeekToDisk(5)), 0x2005);
        assert_eq!(encode_descriptor(Command::SeekToBlock(37)), 0x3250);
        assert_eq!(encode_descriptor(Command::ReadBlock), 0x4000);
        assert_eq!(encode_descriptor(Command::WriteBlock), 0x5000);
        assert_eq!(encode_descriptor(Command::WritePermission), 0x6000);
        assert_eq!(encode_descriptor(Command::RevokeWritePermission), 0x7000);
    }

    #[test]
    fn descriptor_round_trip() {
        let commands = [
            Command::Mount,
            Command::Unmount,
            Command::SeekToDisk(15),
            Command::SeekToBlock(255),
            Command::ReadBlock,
            Command::WriteBlock,
            Command::WritePermission,
            Command::RevokeWritePermission,
        ];
        for cmd in commands {
            assert_eq!(decode_descriptor(encode_descriptor(cmd)), Some(cmd));
        }
    }

    #[test]
    fn decode_rejects_bad_descriptors() {
        // 命令码超出命令集
        assert_eq!(decode_descriptor(8 << 12), None);
        // 命令域之上的位必须为 0
        assert_eq!(decode_descriptor(1 << 18), None);
        // seek-to-disk 的磁盘号超出阵列
        assert_eq!(decode_descriptor(0x2000 | 16), None);
        // 无参命令不允许带参数
        assert_eq!(decode_descriptor(0x4000 | 1), None);
    }

    #[test]
    fn request_framing() {
        let packet = encode_request(Command::ReadBlock);
        assert_eq!(packet.len(), HEADER_LEN);
        assert_eq!(&packet[..4], &0x4000u32.to_be_bytes());
        assert_eq!(packet[4], 0);

        let block: Block = [0xab; BLOCK_SIZE];
        let packet = encode_write_request(&block);
        assert_eq!(packet.len(), HEADER_LEN + BLOCK_SIZE);
        assert_eq!(&packet[..4], &0x5000u32.to_be_bytes());
        assert_eq!(packet[4], PacketFlags::PAYLOAD.bits());
        assert_eq!(&packet[HEADER_LEN..], &block[..]);
    }

    #[test]
    fn response_header_flags() {
        let mut header = [0u8; HEADER_LEN];
        header[..4].copy_from_slice(&0x4000u32.to_be_bytes());
        header[4] = 0b10;
        let resp = decode_response_header(&header);
        assert_eq!(resp.descriptor, 0x4000);
        assert!(resp.has_payload());
        assert!(!resp.is_error());

        header[4] = 0b01;
        let resp = decode_response_header(&header);
        assert!(resp.is_error());
        assert!(!resp.has_payload());
    }
}
