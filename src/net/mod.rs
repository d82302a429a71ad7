pub mod client;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::ArrayClient;
pub use protocol::Command;
pub use types::{Block, BLOCKS_PER_DISK, BLOCK_SIZE, CAPACITY, DISK_COUNT, DISK_SIZE, MAX_TRANSFER};
