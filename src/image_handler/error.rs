//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 缩放链路中的所有失败（读取、识别、解码、编码、资源上限）统一收敛到 `ImageError`。
//! 回调路径上这些错误只记录日志、不回调；`try_resize` 则把它们原样交给调用方。

/// 图片缩放统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl ImageError {
    /// 稳定的错误分类码，用于日志与 CLI 退出信息。
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileSystem(_) => "read",
            Self::InvalidFormat(_) => "format",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::ResourceLimit(_) => "limit",
        }
    }
}
