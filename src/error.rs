//! # 错误类型
//!
//! 编解码过程中可能出现的所有错误。

use thiserror::Error;

/// 隐写编解码错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 图像格式不在允许列表中。
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// 即使每个样本替换 8 位，消息仍然无法放入图像。
    #[error(
        "message does not fit in the image: {required_bits} bits required, {available_bits} bits available"
    )]
    CapacityExceeded {
        required_bits: u64,
        available_bits: u64,
    },

    /// 头部数据与缓冲区大小不一致。
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// 恢复的字节不是合法的 UTF-8。
    #[error("recovered payload is not valid UTF-8")]
    InvalidPayload(#[from] std::string::FromUtf8Error),
}

impl StegoError {
    /// 图像中是否没有可读的隐藏文本。
    ///
    /// 对从未隐写过的图像解码时，头部通常无法通过校验，
    /// 或者载荷不是合法的 UTF-8，两种情况对调用者而言含义相同。
    pub fn is_no_payload(&self) -> bool {
        matches!(self, Self::MalformedHeader(_) | Self::InvalidPayload(_))
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;
