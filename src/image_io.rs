//! # 图像读写模块
//!
//! 负责格式检查、将图像解码为扁平的 8 位样本缓冲区，以及按原格式重新编码保存。

use crate::constants::SUPPORTED_FORMATS;
use crate::error::StegoError;
use anyhow::{Context, Result};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// 解码后的载体图像：尺寸、颜色类型、原始格式与扁平样本。
#[derive(Debug, Clone)]
pub struct Carrier {
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
    pub format: ImageFormat,
    pub samples: Vec<u8>,
}

impl Carrier {
    /// 读取并解码 `path` 处的图像。
    ///
    /// 格式优先根据文件内容判断，无法判断时使用扩展名。
    /// 每通道超过 8 位的图像会被降为 8 位。
    ///
    /// # Errors
    ///
    /// * 无法打开或解码文件。
    /// * 格式不在允许列表中 (`UnsupportedFormat`)。
    pub fn load(path: &Path) -> Result<Self> {
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .with_context(|| format!("Unable to open image file: {}", path.display()))?;

        let format = match reader.format() {
            Some(format) if SUPPORTED_FORMATS.contains(&format) => format,
            Some(format) => {
                return Err(StegoError::UnsupportedFormat(format!("{format:?}")).into());
            }
            None => return Err(StegoError::UnsupportedFormat("unknown".to_owned()).into()),
        };

        let image = reader
            .decode()
            .with_context(|| format!("Unable to decode image file: {}", path.display()))?;
        let image = to_eight_bit(image);

        log::debug!(
            "loaded {:?} image {}x{} ({:?})",
            format,
            image.width(),
            image.height(),
            image.color()
        );

        Ok(Self {
            width: image.width(),
            height: image.height(),
            color: image.color(),
            format,
            samples: image.into_bytes(),
        })
    }

    /// 以原尺寸、颜色类型和格式将样本重新编码并写入 `path`。
    pub fn save(&self, path: &Path) -> Result<()> {
        image::save_buffer_with_format(
            path,
            &self.samples,
            self.width,
            self.height,
            self.color,
            self.format,
        )
        .with_context(|| format!("Unable to encode image file: {}", path.display()))
    }
}

fn to_eight_bit(image: DynamicImage) -> DynamicImage {
    let color = image.color();
    if matches!(
        color,
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
    ) {
        return image;
    }

    log::warn!("reducing {color:?} image to 8 bits per channel");
    match color {
        ColorType::L16 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::La16 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb16 | ColorType::Rgb32F => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_flattens_rgb_samples() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("rgb.png");
        ImageBuffer::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 7])).save(&path)?;

        let carrier = Carrier::load(&path)?;
        assert_eq!((carrier.width, carrier.height), (3, 2));
        assert_eq!(carrier.color, ColorType::Rgb8);
        assert_eq!(carrier.format, ImageFormat::Png);
        assert_eq!(carrier.samples.len(), 3 * 2 * 3);
        assert_eq!(&carrier.samples[..6], &[0, 0, 7, 1, 0, 7]);
        Ok(())
    }

    #[test]
    fn save_keeps_format_and_samples() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("pixels.bmp");
        ImageBuffer::from_fn(4, 4, |x, y| Rgb([(x * 16 + y) as u8, 200, 13])).save(&path)?;

        let mut carrier = Carrier::load(&path)?;
        carrier.samples.iter_mut().for_each(|s| *s ^= 1);
        let out = dir.path().join("out.bmp");
        carrier.save(&out)?;

        let reloaded = Carrier::load(&out)?;
        assert_eq!(reloaded.format, ImageFormat::Bmp);
        assert_eq!(reloaded.samples, carrier.samples);
        Ok(())
    }

    #[test]
    fn content_wins_over_extension() -> Result<()> {
        let dir = tempdir()?;
        let png = dir.path().join("real.png");
        ImageBuffer::from_fn(2, 2, |_, _| Rgb([1u8, 2, 3])).save(&png)?;
        let disguised = dir.path().join("disguised.tga");
        fs::copy(&png, &disguised)?;

        assert_eq!(Carrier::load(&disguised)?.format, ImageFormat::Png);
        Ok(())
    }

    #[test]
    fn rejects_formats_outside_allow_list() -> Result<()> {
        let dir = tempdir()?;
        let gif = dir.path().join("anim.gif");
        fs::write(&gif, b"GIF89a\x01\x00\x01\x00\x00\x00\x00;")?;
        let text = dir.path().join("notes.txt");
        fs::write(&text, "plain text")?;

        for path in [gif, text] {
            let err = Carrier::load(&path).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<StegoError>(),
                Some(StegoError::UnsupportedFormat(_))
            ));
        }
        Ok(())
    }
}
