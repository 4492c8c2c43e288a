//! # 自适应位深度编解码模块
//!
//! 编码：选择位深度，清除可用区域的低位，写入头部，再把载荷单元逐个加入样本。
//! 解码：读取头部，屏蔽低位，还原位流并按 UTF-8 解码。

use crate::bits::{bits_to_bytes, bytes_to_bits, pack_rows, unpack_value};
use crate::capacity::select_bit_depth;
use crate::constants::BITS_PER_BYTE;
use crate::error::Result;
use crate::header::{Header, header_size};

/// 一次编码的结果摘要。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    /// 每个载荷样本替换的低位数。
    pub nbits: usize,
    /// 头部占用的样本数。
    pub header_size: usize,
    /// 载荷占用的样本数。
    pub unit_count: usize,
    /// 头部之后的样本数。
    pub usable_samples: usize,
    /// 消息字节数。
    pub message_len: usize,
    /// 可用样本是否被完全覆盖。
    pub full_overwrite: bool,
}

impl EncodeReport {
    /// 已用比率 (百分比)：消息字节数相对可用样本数。
    pub fn usage_rate(&self) -> f64 {
        if self.usable_samples == 0 {
            return 0.0;
        }
        self.message_len as f64 * 100.0 / self.usable_samples as f64
    }
}

/// 将 `message` 隐藏到 `samples` 中。
///
/// 头部之后的每个样本的低 `nbits` 位都会被清除，包括不承载载荷的尾部样本。
///
/// # Errors
///
/// 消息无法放入图像时返回 `CapacityExceeded`，此时 `samples` 保持不变。
pub fn encode(samples: &mut [u8], message: &[u8]) -> Result<EncodeReport> {
    let size = header_size(samples.len());
    let depth = select_bit_depth(message.len(), samples.len(), size)?;
    let nbits = depth.nbits;

    let mut payload = bytes_to_bits(message);
    payload.resize(payload.len().div_ceil(nbits) * nbits, false);
    let units = pack_rows(&payload, nbits);

    log::debug!(
        "encoding {} bytes as {} units of {} bits after a {}-sample header",
        message.len(),
        units.len(),
        nbits,
        size
    );

    let header = Header {
        nbits,
        unit_count: units.len(),
    };

    header.write(samples)?;

    let mask = low_mask(nbits);
    samples[size..]
        .iter_mut()
        .for_each(|sample| *sample &= !mask);

    samples[size..]
        .iter_mut()
        .zip(&units)
        .for_each(|(sample, &unit)| *sample += unit as u8);

    Ok(EncodeReport {
        nbits,
        header_size: size,
        unit_count: units.len(),
        usable_samples: depth.usable_samples,
        message_len: message.len(),
        full_overwrite: depth.is_full_overwrite(),
    })
}

/// 从 `samples` 中恢复隐藏的文本。
///
/// 重新打包后的字节序列末尾的所有零字节都会被去除，
/// 因此以 NUL 结尾的消息无法完整恢复。
///
/// # Errors
///
/// * 头部不合法时返回 `MalformedHeader`。
/// * 恢复的字节不是合法 UTF-8 时返回 `InvalidPayload`。
pub fn decode(samples: &[u8]) -> Result<String> {
    let (header, size) = Header::read(samples)?;
    let mask = low_mask(header.nbits);

    log::debug!(
        "decoding {} units of {} bits after a {}-sample header",
        header.unit_count,
        header.nbits,
        size
    );

    let payload: Vec<bool> = samples[size..size + header.unit_count]
        .iter()
        .flat_map(|&sample| unpack_value(u64::from(sample & mask), header.nbits))
        .collect();

    let mut bytes = bits_to_bytes(&payload);
    let trimmed = bytes.iter().rposition(|&byte| byte != 0).map_or(0, |i| i + 1);
    if trimmed < bytes.len() {
        log::debug!("stripped {} trailing zero bytes", bytes.len() - trimmed);
    }
    bytes.truncate(trimmed);

    Ok(String::from_utf8(bytes)?)
}

/// 低 `nbits` 位全为 1 的掩码。
fn low_mask(nbits: usize) -> u8 {
    ((1u16 << nbits) - 1) as u8
}

/// 计算 `message_len` 字节的消息编码后占用的样本数。
pub fn unit_count(message_len: usize, nbits: usize) -> usize {
    (message_len * BITS_PER_BYTE).div_ceil(nbits)
}
