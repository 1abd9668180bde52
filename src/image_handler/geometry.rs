//! # 尺寸计算模块
//!
//! ## 设计思路
//!
//! 只检查原图较长（宽高相等时取宽）的那一边：
//! - 宽 >= 高：宽超过 `max_width` 时按 `max_width / width` 等比缩放，否则保持原尺寸
//! - 高 > 宽：对称地使用 `max_height`
//!
//! 另一边不会被单独校正，例如 300x1000 的图在 500x200 的边界框中只检查高度。
//! 这是上传页一直以来的行为，这里保持一致。

use super::source::BoundingBox;

/// 计算缩放后的目标尺寸。
///
/// 被约束的一边精确等于边界值，另一边按比例四舍五入。
///
/// # 示例
/// ```rust
/// use recipe_uploads::image_handler::{fit_within_bounds, BoundingBox};
///
/// assert_eq!(fit_within_bounds(1600, 900, BoundingBox::square(400)), (400, 225));
/// assert_eq!(fit_within_bounds(200, 200, BoundingBox::square(400)), (200, 200));
/// ```
pub fn fit_within_bounds(width: u32, height: u32, bounds: BoundingBox) -> (u32, u32) {
    if width >= height {
        if width > bounds.max_width {
            let scale = bounds.max_width as f64 / width as f64;
            return (bounds.max_width, scale_dimension(height, scale));
        }
    } else if height > bounds.max_height {
        let scale = bounds.max_height as f64 / height as f64;
        return (scale_dimension(width, scale), bounds.max_height);
    }

    (width, height)
}

fn scale_dimension(value: u32, scale: f64) -> u32 {
    (value as f64 * scale).round() as u32
}
