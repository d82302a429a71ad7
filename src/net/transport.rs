use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::volume::error::{Result, VolumeError};

/// 与远程阵列控制器之间的 TCP 连接。
/// 连接状态由持有者管理，不存在进程级的全局 socket。
#[derive(Debug, Default)]
pub struct Connection {
    stream: Option<TcpStream>,
    timeout: Option<Duration>, // 单次读/写的超时；None 表示无限等待
}

impl Connection {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            stream: None,
            timeout,
        }
    }

    /// 建立到控制器的连接；已连接时先断开再重连
    pub fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        if self.stream.is_some() {
            self.disconnect();
        }
        let stream = TcpStream::connect((host, port)).map_err(VolumeError::Connect)?;
        stream
            .set_read_timeout(self.timeout)
            .map_err(VolumeError::Connect)?;
        stream
            .set_write_timeout(self.timeout)
            .map_err(VolumeError::Connect)?;
        self.stream = Some(stream);
        Ok(())
    }

    /// 关闭连接；重复调用安全（drop socket 即关闭）
    pub fn disconnect(&mut self) {
        self.stream = None;
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn stream(&mut self) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or(VolumeError::NotConnected)
    }

    /// 把整个缓冲区写入 socket，短写在内部循环补足
    pub fn send(&mut self, buf: &[u8]) -> Result<()> {
        self.stream()?.write_all(buf)?;
        Ok(())
    }

    /// 精确读满整个缓冲区；对端提前关闭（读到 0 字节）报 UnexpectedEof，
    /// 而不是原地空转
    pub fn recv(&mut self, buf: &mut [u8]) -> Result<()> {
        self.stream()?.read_exact(buf)?;
        Ok(())
    }
}
