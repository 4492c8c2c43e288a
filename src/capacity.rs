//! # 位深度选择模块
//!
//! 根据消息长度与图像可用样本数，选择能容纳全部载荷的最小 `nbits`。
//! 替换的低位越少，图像的可见失真越小。

use crate::constants::{BITS_PER_BYTE, MAX_BITS_PER_SAMPLE};
use crate::error::{Result, StegoError};

/// 位深度选择的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepth {
    /// 每个载荷样本替换的低位数。
    pub nbits: usize,
    /// 头部之后可用于载荷的样本数。
    pub usable_samples: usize,
}

impl BitDepth {
    /// 可用样本是否将被完全覆盖 (`nbits == 8`)。
    pub fn is_full_overwrite(&self) -> bool {
        self.nbits == MAX_BITS_PER_SAMPLE
    }
}

/// 选择满足 `usable_samples * nbits >= message_len * 8` 的最小 `nbits` (1..=8)。
///
/// # Errors
///
/// 头部本身放不下，或 `nbits = 8` 时仍不足以容纳消息，返回 `CapacityExceeded`。
pub fn select_bit_depth(
    message_len: usize,
    total_samples: usize,
    header_size: usize,
) -> Result<BitDepth> {
    let required_bits = message_len as u64 * BITS_PER_BYTE as u64;
    let exceeded = |usable: usize| StegoError::CapacityExceeded {
        required_bits,
        available_bits: usable as u64 * MAX_BITS_PER_SAMPLE as u64,
    };

    let Some(usable_samples) = total_samples.checked_sub(header_size) else {
        return Err(exceeded(0));
    };

    (1..=MAX_BITS_PER_SAMPLE)
        .find(|&nbits| usable_samples as u64 * nbits as u64 >= required_bits)
        .map(|nbits| BitDepth {
            nbits,
            usable_samples,
        })
        .ok_or_else(|| exceeded(usable_samples))
}

/// 在给定位深度下，`usable_samples` 个样本最多能容纳的消息字节数。
pub fn max_message_len(usable_samples: usize, nbits: usize) -> usize {
    usable_samples * nbits / BITS_PER_BYTE
}
