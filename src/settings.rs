//! 设置文件模块
//!
//! # 设计思路
//!
//! 缩放参数可以通过一个 JSON 文件覆盖默认值。文件中的字段都是可选的，
//! 缺省字段沿用 `ImageConfig::default()`，文件不存在时等同于空设置。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::image_handler::{BoundingBox, ImageConfig, ImagePerformanceProfile};

/// 设置文件内容。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeSettings {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub profile: Option<String>,
    pub max_file_size: Option<u64>,
    pub max_decoded_pixels: Option<u64>,
    pub max_decoded_bytes: Option<u64>,
}

impl ResizeSettings {
    /// 将设置叠加到给定配置上。
    pub fn apply_to(&self, mut config: ImageConfig) -> Result<ImageConfig, AppError> {
        config.default_bounds = BoundingBox::new(
            self.max_width.unwrap_or(config.default_bounds.max_width),
            self.max_height.unwrap_or(config.default_bounds.max_height),
        );

        if let Some(profile) = &self.profile {
            config.apply_performance_profile(ImagePerformanceProfile::parse(profile)?);
        }
        if self.max_file_size.is_some() {
            config.max_file_size = self.max_file_size;
        }
        if self.max_decoded_pixels.is_some() {
            config.max_decoded_pixels = self.max_decoded_pixels;
        }
        if self.max_decoded_bytes.is_some() {
            config.max_decoded_bytes = self.max_decoded_bytes;
        }

        Ok(config)
    }
}

/// 读取设置文件，文件不存在时返回 `None`。
pub fn load_settings(path: &Path) -> Result<Option<ResizeSettings>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let parsed = serde_json::from_str::<ResizeSettings>(&content)
        .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;

    Ok(Some(parsed))
}

/// 读取设置文件并生成最终配置。
pub fn load_config(path: &Path) -> Result<ImageConfig, AppError> {
    match load_settings(path)? {
        Some(settings) => {
            log::info!("⚙️ 已加载设置文件: {}", path.display());
            settings.apply_to(ImageConfig::default())
        }
        None => {
            log::debug!("设置文件不存在，使用默认配置: {}", path.display());
            Ok(ImageConfig::default())
        }
    }
}

/// 将设置写回文件（格式化 JSON）。
pub fn save_settings(path: &Path, settings: &ResizeSettings) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_handler::ImageError;

    #[test]
    fn missing_file_yields_default_config() {
        let dir = tempfile::tempdir().expect("create temp dir failed");
        let config = load_config(&dir.path().join("settings.json")).expect("load failed");

        assert_eq!(config.default_bounds, BoundingBox::square(400));
    }

    #[test]
    fn partial_settings_overlay_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir failed");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "maxWidth": 800, "profile": "speed" }"#).expect("write failed");

        let config = load_config(&path).expect("load failed");

        assert_eq!(config.default_bounds, BoundingBox::new(800, 400));
        assert_eq!(config.performance_profile(), ImagePerformanceProfile::Speed);
        assert_eq!(config.max_file_size, None);
        assert_eq!(config.max_decoded_pixels, None);
    }

    #[test]
    fn resource_limits_are_opt_in() {
        let dir = tempfile::tempdir().expect("create temp dir failed");
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "maxFileSize": 1048576, "maxDecodedPixels": 4000000, "maxDecodedBytes": 1600 }"#,
        )
        .expect("write failed");

        let config = load_config(&path).expect("load failed");

        assert_eq!(config.max_file_size, Some(1_048_576));
        assert_eq!(config.max_decoded_pixels, Some(4_000_000));
        assert_eq!(config.max_decoded_bytes, Some(1_600));
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let settings = ResizeSettings {
            profile: Some("ultra".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            settings.apply_to(ImageConfig::default()),
            Err(AppError::Image(ImageError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn malformed_json_is_a_settings_error() {
        let dir = tempfile::tempdir().expect("create temp dir failed");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write failed");

        assert!(matches!(load_settings(&path), Err(AppError::Settings(_))));
    }

    #[test]
    fn saved_settings_can_be_loaded_back() {
        let dir = tempfile::tempdir().expect("create temp dir failed");
        let path = dir.path().join("settings.json");
        let settings = ResizeSettings {
            max_height: Some(600),
            max_decoded_pixels: Some(1_000_000),
            ..Default::default()
        };

        save_settings(&path, &settings).expect("save failed");

        assert_eq!(load_settings(&path).expect("load failed"), Some(settings));
    }
}
