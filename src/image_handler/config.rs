//! # 配置模块
//!
//! ## 设计思路
//!
//! 将缩放链路的可调策略集中到 `ImageConfig`：默认边界框、读取与解码上限、缩放滤镜。
//! 性能档位（quality / balanced / speed）作为高层语义，映射到具体滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供上传页使用的配置（边界框 400x400，平衡档位）。
//! - 资源上限默认关闭（`None`），只有显式配置后才会拒绝超限输入。
//! - `ImagePerformanceProfile` 负责档位字符串解析与反向输出。

use image::imageops::FilterType;

use super::ImageError;
use super::source::BoundingBox;

/// 上传页默认的边界框边长（像素）。
pub const IMAGE_SIZE: u32 = 400;

/// 图片缩放配置。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 调用方未显式给出边界框时使用的默认值。
    pub default_bounds: BoundingBox,
    /// 读取原始字节时允许的最大文件体积（字节），`None` 表示不限制。
    pub max_file_size: Option<u64>,
    /// 解码后的像素上限（`width * height`），`None` 表示不限制。
    pub max_decoded_pixels: Option<u64>,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节），`None` 表示不限制。
    pub max_decoded_bytes: Option<u64>,
    /// 缩放滤镜。
    pub resize_filter: FilterType,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_bounds: BoundingBox::square(IMAGE_SIZE),
            max_file_size: None,
            max_decoded_pixels: None,
            max_decoded_bytes: None,
            resize_filter: FilterType::Triangle,
        }
    }
}

/// 缩放性能档位。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与性能平衡
/// - `Speed`：优先速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePerformanceProfile {
    Quality,
    Balanced,
    Speed,
}

impl ImagePerformanceProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use recipe_uploads::image_handler::ImagePerformanceProfile;
    ///
    /// let p = ImagePerformanceProfile::parse("Balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), recipe_uploads::image_handler::ImageError>(())
    /// ```
    pub fn parse(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知性能档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl ImageConfig {
    /// 基于当前滤镜反推性能档位。
    pub fn performance_profile(&self) -> ImagePerformanceProfile {
        match self.resize_filter {
            FilterType::Nearest => ImagePerformanceProfile::Speed,
            FilterType::CatmullRom | FilterType::Lanczos3 | FilterType::Gaussian => {
                ImagePerformanceProfile::Quality
            }
            FilterType::Triangle => ImagePerformanceProfile::Balanced,
        }
    }

    /// 应用指定性能档位到实际参数。
    pub fn apply_performance_profile(&mut self, profile: ImagePerformanceProfile) {
        self.resize_filter = match profile {
            ImagePerformanceProfile::Quality => FilterType::CatmullRom,
            ImagePerformanceProfile::Balanced => FilterType::Triangle,
            ImagePerformanceProfile::Speed => FilterType::Nearest,
        };
    }
}
