use std::fmt;

use crate::net::protocol::Command;

/// 卷客户端错误类型
#[derive(Debug)]
pub enum VolumeError {
    Io(std::io::Error),      // 底层传输错误（socket 读写失败、响应残缺）
    Connect(std::io::Error), // 建立连接失败（解析地址、connect 调用）
    NotConnected,            // 尚未连接控制器
    Controller(Command),     // 控制器响应携带错误位，附出错的命令
    TransferTooLarge(usize), // 单次传输超过上限
    OutOfRange { offset: u32, len: usize }, // 请求范围超出线性地址空间
    NotMounted,              // 阵列未挂载
    NotWritable,             // 未获得写权限
    // 写操作中途失败；committed 是已成功提交的前缀长度
    Partial {
        committed: u32,
        source: Box<VolumeError>,
    },
}

impl From<std::io::Error> for VolumeError {
    fn from(e: std::io::Error) -> Self {
        VolumeError::Io(e)
    }
}

// 实现 Display trait，用于打印错误信息
impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Transport I/O error: {}", e),
            Self::Connect(e) => write!(f, "Failed to connect to controller: {}", e),
            Self::NotConnected => write!(f, "Not connected to a controller"),
            Self::Controller(cmd) => write!(f, "Controller rejected command: {:?}", cmd),
            Self::TransferTooLarge(len) => write!(f, "Transfer of {} bytes exceeds limit", len),
            Self::OutOfRange { offset, len } => {
                let end = *offset as u64 + *len as u64;
                write!(f, "Range {}..{} exceeds volume capacity", offset, end)
            }
            Self::NotMounted => write!(f, "Array is not mounted"),
            Self::NotWritable => write!(f, "Write permission not granted"),
            Self::Partial { committed, source } => {
                write!(f, "Write aborted after {} bytes: {}", committed, source)
            }
        }
    }
}

// 支持链式错误，方便追踪底层原因
impl std::error::Error for VolumeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::Connect(e) => Some(e),
            Self::Partial { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// 卷客户端统一结果类型
pub type Result<T> = std::result::Result<T, VolumeError>;
