//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责流程编排与配置管理。单次缩放的链路固定为：
//! 1. 读取配置快照
//! 2. 读取原始字节（第一个挂起点）
//! 3. 在阻塞线程池中解码、缩放、编码（第二个挂起点）
//! 4. 交付结果
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ImageConfig>>` 支持运行时切档。
//! - 单次请求内使用同一配置快照，避免处理中途配置漂移。
//! - `try_resize` 返回 `Result`，供需要错误信息的调用方使用。
//! - `resize` 是回调式入口：成功时恰好回调一次，失败时只记录日志、不回调。
//! - 记录 `read/decode/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::source::{BoundingBox, EncodedImage};
use super::{ImageConfig, ImageError, ImagePerformanceProfile, ImageSource};

/// 图片缩放处理器。
pub struct ImageHandler {
    pub(super) config: Arc<RwLock<ImageConfig>>,
}

impl ImageHandler {
    /// 根据初始配置创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use recipe_uploads::image_handler::{ImageConfig, ImageHandler};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default());
    /// assert_eq!(handler.config_snapshot()?.default_bounds.max_width, 400);
    /// # Ok::<(), recipe_uploads::image_handler::ImageError>(())
    /// ```
    pub fn new(config: ImageConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置快照。
    pub fn config_snapshot(&self) -> Result<ImageConfig, ImageError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 设置性能档位。
    pub fn set_performance_profile(
        &self,
        profile: ImagePerformanceProfile,
    ) -> Result<(), ImageError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ImageError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_performance_profile(profile);

        log::info!(
            "⚙️ 已切换图片性能档位：{:?}（filter={:?}）",
            profile,
            config.resize_filter
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn get_performance_profile(&self) -> Result<ImagePerformanceProfile, ImageError> {
        let config = self
            .config
            .read()
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.performance_profile())
    }

    /// 缩放主入口，失败时返回错误。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use recipe_uploads::image_handler::{BoundingBox, ImageConfig, ImageHandler, ImageSource};
    ///
    /// # async fn demo() -> Result<(), recipe_uploads::image_handler::ImageError> {
    /// let handler = ImageHandler::new(ImageConfig::default());
    /// let encoded = handler
    ///     .try_resize(ImageSource::FilePath("/tmp/cake.jpg".into()), BoundingBox::square(400))
    ///     .await?;
    /// println!("{}x{}", encoded.width, encoded.height);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn try_resize(
        &self,
        source: ImageSource,
        bounds: BoundingBox,
    ) -> Result<EncodedImage, ImageError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let read_start = Instant::now();
        let raw = self.read_source(source, &config).await?;
        let read_elapsed = read_start.elapsed();

        let decode_start = Instant::now();
        let encoded =
            tokio::task::spawn_blocking(move || Self::decode_and_encode(raw, bounds, &config))
                .await
                .map_err(|e| ImageError::Decode(format!("解码任务异常退出：{}", e)))??;
        let decode_elapsed = decode_start.elapsed();

        log::info!(
            "✅ 图片处理完成 - read={}ms decode={}ms total={}ms",
            read_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(encoded)
    }

    /// 回调式入口：`resize(source, max_width, max_height, on_complete)`。
    ///
    /// 成功时以无前缀的 Base64 PNG 回调恰好一次；任何失败都不回调，只记录 `warn` 日志。
    pub async fn resize<F>(
        &self,
        source: ImageSource,
        max_width: u32,
        max_height: u32,
        on_complete: F,
    ) where
        F: FnOnce(String),
    {
        let hint = source.hint();
        match self
            .try_resize(source, BoundingBox::new(max_width, max_height))
            .await
        {
            Ok(encoded) => on_complete(encoded.into_payload()),
            Err(err) => {
                log::warn!("⚠️ 图片缩放失败（{}，来源: {}）：{}", err.code(), hint, err);
            }
        }
    }

    /// 使用配置中的默认边界框缩放。
    pub async fn resize_with_default_bounds<F>(&self, source: ImageSource, on_complete: F)
    where
        F: FnOnce(String),
    {
        let bounds = match self.config_snapshot() {
            Ok(config) => config.default_bounds,
            Err(err) => {
                log::warn!("⚠️ 读取默认边界框失败：{}", err);
                return;
            }
        };

        self.resize(source, bounds.max_width, bounds.max_height, on_complete)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_handler::SourceFile;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;
    use std::sync::Mutex;

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, 128, 255])
        });

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn blob(bytes: Vec<u8>) -> ImageSource {
        ImageSource::Blob(SourceFile::new(bytes, Some("image/png".to_string())))
    }

    #[tokio::test]
    async fn try_resize_reports_output_dimensions() {
        let handler = ImageHandler::new(ImageConfig::default());

        let encoded = handler
            .try_resize(blob(create_png_bytes(1600, 900)), BoundingBox::square(400))
            .await
            .expect("resize should succeed");

        assert_eq!((encoded.width, encoded.height), (400, 225));
    }

    #[tokio::test]
    async fn try_resize_surfaces_decode_errors() {
        let handler = ImageHandler::new(ImageConfig::default());

        let result = handler
            .try_resize(blob(b"garbage".to_vec()), BoundingBox::square(400))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn resize_invokes_callback_exactly_once() {
        let handler = ImageHandler::new(ImageConfig::default());
        let calls = Mutex::new(Vec::new());

        handler
            .resize(blob(create_png_bytes(200, 200)), 400, 400, |payload| {
                calls.lock().expect("lock poisoned").push(payload);
            })
            .await;

        let calls = calls.into_inner().expect("lock poisoned");
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].starts_with("data:"));
    }

    #[tokio::test]
    async fn resize_is_silent_on_failure() {
        let handler = ImageHandler::new(ImageConfig::default());
        let mut called = false;

        handler
            .resize(blob(b"garbage".to_vec()), 400, 400, |_| called = true)
            .await;

        assert!(!called);
    }

    #[tokio::test]
    async fn default_bounds_follow_config() {
        let mut config = ImageConfig::default();
        config.default_bounds = BoundingBox::square(100);
        let handler = ImageHandler::new(config);
        let mut payload = None;

        handler
            .resize_with_default_bounds(blob(create_png_bytes(300, 150)), |p| payload = Some(p))
            .await;

        let payload = payload.expect("callback should fire");
        let bytes = {
            use base64::{Engine as _, engine::general_purpose};
            general_purpose::STANDARD.decode(payload).expect("base64")
        };
        let img = image::load_from_memory(&bytes).expect("png");
        assert_eq!((img.width(), img.height()), (100, 50));
    }

    #[test]
    fn performance_profile_can_be_switched() {
        let handler = ImageHandler::new(ImageConfig::default());

        handler
            .set_performance_profile(ImagePerformanceProfile::Speed)
            .expect("set profile failed");

        assert_eq!(
            handler.get_performance_profile().expect("get profile failed"),
            ImagePerformanceProfile::Speed
        );
    }
}
