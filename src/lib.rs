//! # lsb_depth 库
//!
//! 本库包含自适应位深度 LSB 隐写工具的核心逻辑：
//! 根据文本长度选择每个样本替换的低位数，将位深度与载荷长度写入图像自身的头部，
//! 并在解码时据此无损地还原文本。

// 声明库包含的所有模块。

pub mod bits;
pub mod capacity;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod handler;
pub mod header;
pub mod image_io;

pub use codec::{EncodeReport, decode, encode};
pub use error::StegoError;
