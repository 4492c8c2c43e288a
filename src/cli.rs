//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// 一款自适应位深度的 LSB (最低有效位) 隐写工具，根据文本长度自动选择每个样本替换的位数，
/// 在无损格式图像 (如 PNG, BMP, TIFF) 中隐藏或恢复 UTF-8 文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款自适应位深度的 LSB (最低有效位) 隐写工具，根据文本长度自动选择每个样本替换的位数，在无损格式图像 (如 PNG, BMP, TIFF) 中隐藏或恢复 UTF-8 文本。"
)]
pub struct Cli {
    /// 输出详细的调试日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像在各位深度下可容纳的最大文本长度。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "message"])))]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 默认为输入图像所在目录下的 `code_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 默认为图像所在目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long, conflicts_with = "print")]
    pub text: Option<PathBuf>,

    /// 将恢复的文本打印到标准输出，而不是写入文件。
    #[arg(short, long)]
    pub print: bool,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要分析的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hide_requires_a_text_source() {
        assert!(Cli::try_parse_from(["lsb_depth", "hide", "-i", "a.png"]).is_err());
        assert!(
            Cli::try_parse_from(["lsb_depth", "hide", "-i", "a.png", "-t", "a.txt", "-m", "x"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["lsb_depth", "hide", "-i", "a.png", "-m", "hello"]).unwrap();
        match cli.command {
            Commands::Hide(args) => {
                assert_eq!(args.message.as_deref(), Some("hello"));
                assert!(args.dest.is_none());
                assert!(!args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn recover_print_conflicts_with_text() {
        assert!(
            Cli::try_parse_from(["lsb_depth", "recover", "-i", "a.png", "-t", "o.txt", "-p"])
                .is_err()
        );
        let cli = Cli::try_parse_from(["lsb_depth", "-v", "recover", "-i", "a.png", "-p"]).unwrap();
        assert!(cli.verbose);
    }
}
