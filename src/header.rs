//! # 头部编解码模块
//!
//! 头部占据样本缓冲区的前 `header_size` 个样本，每个样本的低 4 位承载一个字段：
//!
//! * 第 0 个样本：每个载荷样本替换的位数 `nbits` (1..=8)。
//! * 其余样本：载荷单元数量，按大端序拼接，左侧补零至 `4 * (header_size - 1)` 位。
//!
//! 头部大小只取决于样本总数，因此解码端无需任何额外信息即可定位头部。

use crate::bits::{bit_length, pack_rows, unpack_value};
use crate::constants::{HEADER_FIELD_BITS, MAX_BITS_PER_SAMPLE};
use crate::error::{Result, StegoError};

const FIELD_MASK: u8 = (1 << HEADER_FIELD_BITS) - 1;

/// 计算 `total_samples` 个样本的图像所需的头部大小 (样本数)。
///
/// `header_size = 1 + ceil(bit_length(total_samples) / 4)`，
/// 保证载荷单元数量 (不超过 `total_samples`) 总能放入长度字段。
pub fn header_size(total_samples: usize) -> usize {
    1 + bit_length(total_samples).div_ceil(HEADER_FIELD_BITS)
}

/// 写入图像中的头部信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// 每个载荷样本替换的低位数。
    pub nbits: usize,
    /// 载荷单元数量，即载荷占用的样本数。
    pub unit_count: usize,
}

impl Header {
    /// 将头部写入 `samples` 的前 `header_size` 个样本。
    ///
    /// 先清除这些样本的低 4 位，再写入各字段，与 `nbits` 无关。
    ///
    /// # Errors
    ///
    /// * 缓冲区容纳不下头部与载荷时返回 `CapacityExceeded`。
    /// * `nbits` 不在 `1..=8` 内时返回 `MalformedHeader`。
    pub fn write(&self, samples: &mut [u8]) -> Result<()> {
        let size = header_size(samples.len());
        let usable = samples.len().saturating_sub(size);

        if size > samples.len() || self.unit_count > usable {
            return Err(StegoError::CapacityExceeded {
                required_bits: ((size + self.unit_count) * MAX_BITS_PER_SAMPLE) as u64,
                available_bits: (samples.len() * MAX_BITS_PER_SAMPLE) as u64,
            });
        }
        if !(1..=MAX_BITS_PER_SAMPLE).contains(&self.nbits) {
            return Err(StegoError::MalformedHeader(format!(
                "bit depth {} is outside 1..={}",
                self.nbits, MAX_BITS_PER_SAMPLE
            )));
        }

        let count_bits: Vec<bool> =
            unpack_value(self.unit_count as u64, field_width(size)).collect();
        let fields = std::iter::once(self.nbits as u64)
            .chain(pack_rows(&count_bits, HEADER_FIELD_BITS));

        for (sample, field) in samples[..size].iter_mut().zip(fields) {
            *sample = (*sample & !FIELD_MASK) + field as u8;
        }

        Ok(())
    }

    /// 从 `samples` 中读取头部，返回头部与头部大小。
    ///
    /// # Errors
    ///
    /// 缓冲区比头部还短、`nbits` 为 0 或大于 8、
    /// 或载荷单元数量超过可用样本数时，返回 `MalformedHeader`。
    pub fn read(samples: &[u8]) -> Result<(Self, usize)> {
        let size = header_size(samples.len());
        if size > samples.len() {
            return Err(StegoError::MalformedHeader(format!(
                "buffer of {} samples is shorter than its {}-sample header",
                samples.len(),
                size
            )));
        }

        let fields: Vec<u8> = samples[..size]
            .iter()
            .map(|&sample| sample & FIELD_MASK)
            .collect();

        let nbits = usize::from(fields[0]);
        if !(1..=MAX_BITS_PER_SAMPLE).contains(&nbits) {
            return Err(StegoError::MalformedHeader(format!(
                "bit depth {} is outside 1..={}",
                nbits, MAX_BITS_PER_SAMPLE
            )));
        }

        let count_bits: Vec<bool> = fields[1..]
            .iter()
            .flat_map(|&field| unpack_value(u64::from(field), HEADER_FIELD_BITS))
            .collect();
        let unit_count = pack_rows(&count_bits, field_width(size))[0];

        let usable = samples.len() - size;
        if unit_count > usable as u64 {
            return Err(StegoError::MalformedHeader(format!(
                "payload of {} units exceeds the {} usable samples",
                unit_count, usable
            )));
        }

        Ok((
            Self {
                nbits,
                unit_count: unit_count as usize,
            },
            size,
        ))
    }
}

/// 长度字段的总位数。
fn field_width(header_size: usize) -> usize {
    HEADER_FIELD_BITS * (header_size - 1)
}
