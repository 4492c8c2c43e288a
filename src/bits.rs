//! # 位分组原语
//!
//! 将按行排列的位矩阵打包为整数 (每行一个)，以及其逆操作。
//! 所有转换均为大端序：每行最左侧的位是最高有效位。
//! 头部的 4 位字段与载荷的 `nbits` 位分组共用这一套实现。

/// 将行宽为 `width` 的位矩阵 (按行展平) 打包为整数序列，每行一个整数。
///
/// # Panics
///
/// `width` 必须位于 `1..=64`，且 `bits.len()` 必须是 `width` 的整数倍。
pub fn pack_rows(bits: &[bool], width: usize) -> Vec<u64> {
    assert!((1..=64).contains(&width), "row width must be within 1..=64");
    assert!(
        bits.len() % width == 0,
        "bit matrix length must be a multiple of the row width"
    );

    bits.chunks_exact(width)
        .map(|row| row.iter().fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
        .collect()
}

/// 将 `value` 展开为 `width` 位的大端位序列，高位补零。
///
/// # Panics
///
/// `width` 必须位于 `1..=64`，且 `value` 必须能用 `width` 位表示。
pub fn unpack_value(value: u64, width: usize) -> impl Iterator<Item = bool> {
    assert!((1..=64).contains(&width), "bit width must be within 1..=64");
    assert!(
        width == 64 || value >> width == 0,
        "value does not fit in the requested bit width"
    );

    (0..width).rev().map(move |shift| (value >> shift) & 1 == 1)
}

/// 将字节序列展开为位序列，每个字节高位在前。
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| unpack_value(u64::from(byte), 8))
        .collect()
}

/// 将位序列重新打包为字节，每个字节高位在前。
/// 末尾不足 8 位的部分在右侧补零。
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            let byte = chunk
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit));
            byte << (8 - chunk.len())
        })
        .collect()
}

/// `value` 的二进制位数，`0` 的位数为 0。
pub fn bit_length(value: usize) -> usize {
    (usize::BITS - value.leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn pack_rows_reads_each_row_big_endian() {
        let matrix = bits("000110101111");
        assert_eq!(pack_rows(&matrix, 4), vec![1, 10, 15]);
    }

    #[test]
    fn pack_rows_handles_odd_widths() {
        assert_eq!(pack_rows(&bits("011100"), 3), vec![3, 4]);
        assert_eq!(pack_rows(&bits("10110"), 1), vec![1, 0, 1, 1, 0]);
    }

    #[test]
    fn unpack_value_pads_on_the_left() {
        assert_eq!(unpack_value(16, 12).collect::<Vec<_>>(), bits("000000010000"));
        assert_eq!(unpack_value(5, 3).collect::<Vec<_>>(), bits("101"));
        assert_eq!(unpack_value(0, 4).collect::<Vec<_>>(), bits("0000"));
    }

    #[test]
    fn unpack_is_inverse_of_pack_for_every_width() {
        for width in 1..=8 {
            for value in 0..(1u64 << width) {
                let row: Vec<bool> = unpack_value(value, width).collect();
                assert_eq!(pack_rows(&row, width), vec![value], "width {width}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn unpack_value_rejects_oversized_values() {
        let _ = unpack_value(16, 4).count();
    }

    #[test]
    fn bytes_and_bits_are_msb_first() {
        assert_eq!(bytes_to_bits(b"h"), bits("01101000"));
        assert_eq!(bits_to_bytes(&bits("01101000")), b"h".to_vec());
    }

    #[test]
    fn bits_to_bytes_pads_the_final_byte() {
        assert_eq!(bits_to_bytes(&bits("0110100001")), vec![0x68, 0x40]);
        assert!(bits_to_bytes(&[]).is_empty());
    }

    #[test]
    fn bit_length_matches_binary_representation() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(5), 3);
        assert_eq!(bit_length(1000), 10);
        assert_eq!(bit_length(1024), 11);
    }
}
