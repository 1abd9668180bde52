//! # 解码、绘制与编码流水线（第二阶段）
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → 离屏画布 → PNG → Base64”的过程集中管理，并在解码前做资源上限检查。
//! 整个阶段是 CPU 密集的同步代码，由 `handler` 放到阻塞线程池执行。
//!
//! ## 实现思路
//!
//! 1. 读取 header 尺寸，按像素/内存上限快速拒绝
//! 2. 完整解码
//! 3. 计算目标尺寸（见 `geometry`）
//! 4. 在 RGBA 画布上绘制缩放结果
//! 5. 编码为 PNG，生成 Data URI 并去掉前缀

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;

use super::geometry::fit_within_bounds;
use super::loader::{strip_data_uri_prefix, to_data_uri};
use super::source::{BoundingBox, EncodedImage, RawImageData};
use super::{ImageConfig, ImageError, ImageHandler};

const OUTPUT_MEDIA_TYPE: &str = "image/png";

impl ImageHandler {
    /// 第二阶段入口：解码、缩放并编码为无前缀的 Base64 PNG。
    pub(super) fn decode_and_encode(
        raw: RawImageData,
        bounds: BoundingBox,
        config: &ImageConfig,
    ) -> Result<EncodedImage, ImageError> {
        let decoded = Self::decode_image(&raw, config)?;
        let (raw_width, raw_height) = decoded.dimensions();
        let (width, height) = fit_within_bounds(raw_width, raw_height, bounds);

        let surface = Self::render_surface(decoded, width, height, config.resize_filter)?;
        let payload = Self::encode_surface(surface)?;

        log::info!(
            "✅ 图片缩放成功 - 来源: {} 原始尺寸: {}x{} 输出尺寸: {}x{} 边界: {}x{}",
            raw.source_hint,
            raw_width,
            raw_height,
            width,
            height,
            bounds.max_width,
            bounds.max_height
        );

        Ok(EncodedImage {
            width,
            height,
            payload,
        })
    }

    fn decode_image(raw: &RawImageData, config: &ImageConfig) -> Result<DynamicImage, ImageError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        // 上限只由配置决定，不使用解码器自带的默认内存限制。
        let mut reader = ImageReader::new(Cursor::new(raw.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;
        reader.no_limits();

        reader
            .decode()
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let Some(max_decoded_pixels) = config.max_decoded_pixels else {
            return Ok(());
        };

        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let Some(max_decoded_bytes) = config.max_decoded_bytes else {
            return Ok(());
        };

        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    /// 把解码结果绘制到目标尺寸的离屏 RGBA 画布上。
    fn render_surface(
        image: DynamicImage,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, ImageError> {
        if width == 0 || height == 0 {
            return Ok(RgbaImage::new(width, height));
        }

        if image.dimensions() == (width, height) {
            return Ok(image.to_rgba8());
        }

        match Self::resize_with_fast_image_resize(&image, width, height, filter) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}",
                    err
                );
                Ok(image.resize_exact(width, height, filter).to_rgba8())
            }
        }
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        target_width: u32,
        target_height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, ImageError> {
        let src = image.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image =
            fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(
            Self::to_fast_filter(filter),
        ));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
            target_width,
            target_height,
            dst_image.into_vec(),
        )
        .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    fn to_fast_filter(filter: FilterType) -> fr::FilterType {
        match filter {
            FilterType::Nearest => fr::FilterType::Box,
            FilterType::Triangle => fr::FilterType::Bilinear,
            FilterType::CatmullRom => fr::FilterType::CatmullRom,
            FilterType::Gaussian => fr::FilterType::Mitchell,
            FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }

    /// 画布编码为 PNG 并输出无前缀的 Base64。
    ///
    /// 空画布无法编码为 PNG，返回空字符串。
    fn encode_surface(surface: RgbaImage) -> Result<String, ImageError> {
        if surface.width() == 0 || surface.height() == 0 {
            log::warn!(
                "⚠️ 输出尺寸退化为 {}x{}，返回空负载",
                surface.width(),
                surface.height()
            );
            return Ok(String::new());
        }

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(surface)
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;

        let data_uri = to_data_uri(OUTPUT_MEDIA_TYPE, &cursor.into_inner());
        Ok(strip_data_uri_prefix(&data_uri))
    }
}
