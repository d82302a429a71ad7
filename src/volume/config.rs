use std::time::Duration;

/// 卷会话的可调参数
#[derive(Debug, Clone, Default)]
pub struct VolumeConfig {
    /// 单次往返的读写超时；None 表示无限等待（与参考实现一致）
    pub timeout: Option<Duration>,
    /// 控制器报错时的额外重试次数；传输错误不重试（流状态不可知）
    pub retries: u32,
}
