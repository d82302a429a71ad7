use std::io;
use std::time::Duration;

use crate::net::protocol::{self, Command, HEADER_LEN};
use crate::net::transport::Connection;
use crate::net::types::{Block, BLOCK_SIZE};
use crate::volume::error::{Result, VolumeError};

/// 同步请求/响应客户端：同一时刻只有一个在途请求，
/// 每次 execute 都阻塞到收齐完整响应为止。
#[derive(Debug)]
pub struct ArrayClient {
    conn: Connection,
}

impl ArrayClient {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            conn: Connection::new(timeout),
        }
    }

    pub fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        self.conn.connect(host, port)
    }

    pub fn disconnect(&mut self) {
        self.conn.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// 发送一条命令并等待它的响应。
    /// WriteBlock 从 block 取待写数据；ReadBlock 的返回数据拷入 block。
    pub fn execute(&mut self, cmd: Command, block: Option<&mut Block>) -> Result<()> {
        if !self.conn.is_connected() {
            return Err(VolumeError::NotConnected);
        }

        let request = if cmd.carries_payload() {
            match block.as_deref() {
                Some(data) => protocol::encode_write_request(data),
                None => {
                    return Err(VolumeError::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "write-block command without a data block",
                    )))
                }
            }
        } else {
            protocol::encode_request(cmd)
        };
        self.conn.send(&request)?;

        let mut header = [0u8; HEADER_LEN];
        self.conn.recv(&mut header)?;
        let response = protocol::decode_response_header(&header);

        // 数据块紧跟在响应头之后；先收完数据再判错，保证流不脱帧。
        // 不足 256 字节由 recv 报 UnexpectedEof，按传输失败处理。
        if response.has_payload() {
            let mut payload: Block = [0; BLOCK_SIZE];
            self.conn.recv(&mut payload)?;
            if let Some(out) = block {
                out.copy_from_slice(&payload);
            }
        }

        if response.is_error() {
            return Err(VolumeError::Controller(cmd));
        }
        Ok(())
    }
}
