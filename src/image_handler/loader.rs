//! # 读取模块（第一阶段）
//!
//! ## 设计思路
//!
//! 把用户选择的文件完整读入内存，是链路中的第一个挂起点。
//! 这里不校验媒体类型，也不判断内容是否为图片：无法解码的内容留给第二阶段失败。
//!
//! ## 实现思路
//!
//! - 内存文件：直接透传。
//! - 文件路径：`tokio::fs` 异步读取 + metadata 体积限制。
//! - Data URI：解析前缀 + 预估解码体积 + Base64 解码。
//! - 未声明媒体类型时用 `infer` 探测，只用于日志。

use base64::{Engine as _, engine::general_purpose};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::source::{ImageSource, RawImageData, SourceFile};
use super::{ImageConfig, ImageError, ImageHandler};

/// 与上传页一致的 Data URI 前缀匹配。
static DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/\w+;base64,").expect("data uri prefix regex"));

impl ImageHandler {
    /// 按来源读取原始字节。
    pub(super) async fn read_source(
        &self,
        source: ImageSource,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        let hint = source.hint();
        let raw = match source {
            ImageSource::Blob(file) => Self::load_from_blob(file, config)?,
            ImageSource::FilePath(path) => Self::load_from_file(&path, config).await?,
            ImageSource::DataUri(data) => Self::load_from_data_uri(&data, config)?,
        };

        log::debug!(
            "📥 读取完成 - 来源: {} 大小: {} 字节 类型: {}",
            hint,
            raw.bytes.len(),
            raw.media_type.as_deref().unwrap_or("unknown")
        );

        Ok(raw)
    }

    fn load_from_blob(file: SourceFile, config: &ImageConfig) -> Result<RawImageData, ImageError> {
        Self::check_file_size(file.bytes.len() as u64, config)?;

        let media_type = file
            .media_type
            .or_else(|| Self::sniff_media_type(&file.bytes).map(str::to_string));

        Ok(RawImageData {
            bytes: file.bytes,
            media_type,
            source_hint: "blob",
        })
    }

    async fn load_from_file(path: &str, config: &ImageConfig) -> Result<RawImageData, ImageError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path);

        let file_path = Path::new(path);
        let metadata = tokio::fs::metadata(file_path)
            .await
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}：{}", path, e)))?;
        Self::check_file_size(metadata.len(), config)?;

        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;

        let media_type = Self::sniff_media_type(&bytes).map(str::to_string);

        Ok(RawImageData {
            bytes,
            media_type,
            source_hint: "file",
        })
    }

    fn load_from_data_uri(data: &str, config: &ImageConfig) -> Result<RawImageData, ImageError> {
        let (media_type, payload) = split_data_uri(data)?;

        if let Some(max_file_size) = config.max_file_size {
            let estimated_len = estimate_base64_decoded_upper_bound_len(payload)?;
            if estimated_len > max_file_size {
                return Err(ImageError::ResourceLimit(format!(
                    "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                    estimated_len as f64 / 1024.0 / 1024.0,
                    max_file_size as f64 / 1024.0 / 1024.0
                )));
            }
        }

        let bytes = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))?;

        Ok(RawImageData {
            bytes,
            media_type: Some(media_type.to_string()),
            source_hint: "data-uri",
        })
    }

    fn check_file_size(len: u64, config: &ImageConfig) -> Result<(), ImageError> {
        let Some(max_file_size) = config.max_file_size else {
            return Ok(());
        };

        if len > max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }

    fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
        infer::get(bytes).map(|kind| kind.mime_type())
    }
}

/// 拆分 Data URI，返回 `(媒体类型, Base64 负载)`。
pub(crate) fn split_data_uri(data: &str) -> Result<(&str, &str), ImageError> {
    let normalized = data.trim();
    let rest = normalized
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::InvalidFormat("缺少 data: 前缀".to_string()))?;
    let marker = rest
        .find(";base64,")
        .ok_or_else(|| ImageError::InvalidFormat("缺少 base64 标记".to_string()))?;

    Ok((&rest[..marker], &rest[marker + 8..]))
}

/// 组装 Data URI。
pub(crate) fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// 去掉 `data:image/<type>;base64,` 前缀，只保留负载。
///
/// 前缀不匹配时原样返回。
pub(crate) fn strip_data_uri_prefix(data_uri: &str) -> String {
    DATA_URI_PREFIX.replace(data_uri, "").into_owned()
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, ImageError> {
    let len = base64_data.trim().len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| ImageError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| ImageError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn split_data_uri_extracts_media_type_and_payload() {
        let (media_type, payload) =
            split_data_uri("data:image/png;base64,iVBORw0KGgo=").expect("split failed");

        assert_eq!(media_type, "image/png");
        assert_eq!(payload, "iVBORw0KGgo=");
    }

    #[test]
    fn split_data_uri_rejects_plain_text() {
        assert!(matches!(
            split_data_uri("iVBORw0KGgo="),
            Err(ImageError::InvalidFormat(_))
        ));
        assert!(matches!(
            split_data_uri("data:image/png,raw"),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn strip_prefix_keeps_only_payload() {
        assert_eq!(strip_data_uri_prefix("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri_prefix("data:image/jpeg;base64,BBBB"), "BBBB");
        assert_eq!(strip_data_uri_prefix("data:,"), "data:,");
    }

    #[test]
    fn to_data_uri_round_trips_through_strip() {
        let uri = to_data_uri("image/png", b"hello");

        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
        assert_eq!(strip_data_uri_prefix(&uri), "aGVsbG8=");
    }

    #[test]
    fn data_uri_over_limit_is_rejected_before_decode() {
        let mut config = ImageConfig::default();
        config.max_file_size = Some(32);
        let huge = format!("data:image/png;base64,{}", "A".repeat(1024 * 1024));

        let result = ImageHandler::load_from_data_uri(&huge, &config);

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn blob_without_media_type_is_sniffed() {
        let png_signature = vec![137_u8, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];
        let raw = ImageHandler::load_from_blob(
            SourceFile::new(png_signature, None),
            &ImageConfig::default(),
        )
        .expect("blob load failed");

        assert_eq!(raw.media_type.as_deref(), Some("image/png"));
        assert_eq!(raw.source_hint, "blob");
    }

    #[test]
    fn blob_keeps_declared_media_type_without_validation() {
        let raw = ImageHandler::load_from_blob(
            SourceFile::new(b"not an image".to_vec(), Some("image/gif".to_string())),
            &ImageConfig::default(),
        )
        .expect("blob load failed");

        assert_eq!(raw.media_type.as_deref(), Some("image/gif"));
    }

    #[tokio::test]
    async fn missing_file_is_a_filesystem_error() {
        let result =
            ImageHandler::load_from_file("/definitely/not/here.png", &ImageConfig::default())
                .await;

        assert!(matches!(result, Err(ImageError::FileSystem(_))));
    }

    #[tokio::test]
    async fn file_over_limit_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file failed");
        file.write_all(&[0u8; 128]).expect("write temp file failed");

        let mut config = ImageConfig::default();
        config.max_file_size = Some(64);
        let path = file.path().to_string_lossy().into_owned();

        let result = ImageHandler::load_from_file(&path, &config).await;

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }
}
