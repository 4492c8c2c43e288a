use image::ImageFormat;

/// 头部中每个样本承载的位数。
/// 头部字段宽度固定为 4 bits，与载荷的位深度无关。
pub const HEADER_FIELD_BITS: usize = 4;

/// 每个样本最多可被替换的低位数。
/// 达到该值时，可用区域中的样本将被完全覆盖。
pub const MAX_BITS_PER_SAMPLE: usize = 8;

/// 每个字节的位数。
pub const BITS_PER_BYTE: usize = 8;

/// 允许作为载体的无损图像格式。
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Pnm,
    ImageFormat::Tga,
];

/// 隐写后图像的默认文件名前缀。
pub const ENCODED_PREFIX: &str = "code_";

/// 恢复文本的默认文件名前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
