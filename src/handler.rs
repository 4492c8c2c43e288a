//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心编解码算法以及向用户报告结果。

use crate::capacity::max_message_len;
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::codec::{decode, encode};
use crate::constants::{ENCODED_PREFIX, MAX_BITS_PER_SAMPLE, RECOVERED_PREFIX};
use crate::error::StegoError;
use crate::header::header_size;
use crate::image_io::Carrier;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、选择位深度并隐藏文本，报告所用位深度与已用比率，
/// 最后以原格式将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件，或文本不是合法的 UTF-8。
/// * 图像格式不受支持。
/// * 目标文件已存在且未指定 `--force`。
/// * 即使替换全部 8 位，图像也没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let text = match (&args.text, args.message) {
        (Some(path), _) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, Some(message)) => message,
        (None, None) => anyhow::bail!("No text to hide. \nUse --text or --message."),
    };

    let dest = args
        .dest
        .unwrap_or_else(|| default_encoded_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let mut carrier = Carrier::load(&args.image).with_context(|| {
        format!(
            "Unable to use image file as a carrier: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let report = match encode(&mut carrier.samples, text.as_bytes()) {
        Err(StegoError::CapacityExceeded {
            required_bits,
            available_bits,
        }) => anyhow::bail!(
            "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
            required_bits.to_string().red().bold(),
            available_bits.to_string().green().bold()
        ),
        other => other?,
    };

    log::info!(
        "hid {} bytes in {} samples of {}",
        report.message_len,
        report.unit_count,
        args.image.display()
    );

    if report.full_overwrite {
        let rule = "*".repeat(60);
        eprintln!("{}", rule.yellow());
        eprintln!(
            "{}",
            "Warning: the sizes are compatible but the image will be completely overwritten by the text. \nFor best results, choose a larger image."
                .yellow()
                .bold()
        );
        eprintln!("{}", rule.yellow());
    }

    println!(
        "Number of replaced bits per sample: {}",
        report.nbits.to_string().green().bold()
    );
    println!(
        "Used bits rate: {} %",
        format!("{:.2}", report.usage_rate()).green().bold()
    );

    carrier.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、解析头部并恢复文本，
/// 最后将文本写入目标文件或打印到标准输出。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件，或格式不受支持。
/// * 图像中没有可读的隐藏文本。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = match (args.print, args.text) {
        (true, _) => None,
        (false, Some(path)) => Some(path),
        (false, None) => Some(default_recovered_path(&args.image)),
    };
    if let Some(dest) = &dest {
        ensure_writable(dest, args.force)?;
    }

    let carrier = Carrier::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let text = match decode(&carrier.samples) {
        Ok(text) => text,
        Err(err) if err.is_no_payload() => {
            return Err(anyhow::Error::new(err).context(format!(
                "This image does not contain a hidden message or the message is unreadable: {}",
                args.image.to_string_lossy().red().bold()
            )));
        }
        Err(err) => return Err(err.into()),
    };

    log::info!(
        "recovered {} bytes from {}",
        text.len(),
        args.image.display()
    );

    let Some(dest) = dest else {
        println!("{text}");
        return Ok(());
    };

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 报告图像的样本总数、头部大小，以及每种位深度下可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = Carrier::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let total = carrier.samples.len();
    let header = header_size(total);
    let usable = total.saturating_sub(header);

    println!(
        "{} ({:?}, {}x{}, {:?})",
        args.image.to_string_lossy().green().bold(),
        carrier.format,
        carrier.width,
        carrier.height,
        carrier.color
    );
    println!("Samples: {total}, header: {header}, usable: {usable}");

    for nbits in 1..=MAX_BITS_PER_SAMPLE {
        let line = format!(
            "{nbits} bit(s) per sample: up to {} bytes",
            max_message_len(usable, nbits)
        );
        if nbits == MAX_BITS_PER_SAMPLE {
            println!("{}", line.yellow());
        } else {
            println!("{line}");
        }
    }

    Ok(())
}

/// 隐写图像的默认输出路径：与输入同目录的 `code_<文件名>`。
pub fn default_encoded_path(image: &Path) -> PathBuf {
    let name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    image.with_file_name(format!("{ENCODED_PREFIX}{name}"))
}

/// 恢复文本的默认输出路径：与图像同目录的 `recovered_<文件名>.txt`。
pub fn default_recovered_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    image.with_file_name(format!("{RECOVERED_PREFIX}{stem}.txt"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_sit_next_to_the_image() {
        let image = Path::new("shots/holiday.png");
        assert_eq!(
            default_encoded_path(image),
            PathBuf::from("shots/code_holiday.png")
        );
        assert_eq!(
            default_recovered_path(Path::new("shots/code_holiday.png")),
            PathBuf::from("shots/recovered_code_holiday.txt")
        );
    }
}
