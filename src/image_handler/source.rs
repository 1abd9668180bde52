//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` / `SourceFile` 表示用户选择的文件
//! - `BoundingBox` 表示单次调用的尺寸约束
//! - `RawImageData` 表示已读取但未解码的字节
//! - `EncodedImage` 表示交付给调用方的结果

/// 用户选择的文件：原始字节与声明的媒体类型。
///
/// 媒体类型只做记录，不做校验。
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub bytes: Vec<u8>,
    pub media_type: Option<String>,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, media_type: Option<String>) -> Self {
        Self { bytes, media_type }
    }
}

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 内存中的文件内容。
    Blob(SourceFile),
    /// 本地文件路径。
    FilePath(String),
    /// Data URI（`data:<type>;base64,<payload>`）。
    DataUri(String),
}

impl ImageSource {
    pub(crate) fn hint(&self) -> &'static str {
        match self {
            Self::Blob(_) => "blob",
            Self::FilePath(_) => "file",
            Self::DataUri(_) => "data-uri",
        }
    }
}

impl From<SourceFile> for ImageSource {
    fn from(file: SourceFile) -> Self {
        Self::Blob(file)
    }
}

/// 单次调用的边界框。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub max_width: u32,
    pub max_height: u32,
}

impl BoundingBox {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

/// 读取阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 声明或探测到的媒体类型，仅用于日志。
    pub(crate) media_type: Option<String>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 缩放结果。
///
/// `payload` 为 PNG 的标准 Base64 文本，不含 `data:image/png;base64,` 前缀。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub payload: String,
}

impl EncodedImage {
    pub fn into_payload(self) -> String {
        self.payload
    }
}
