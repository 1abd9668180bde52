//! # 图片缩放模块（image_handler）
//!
//! ## 设计思路
//!
//! 上传菜谱图片前，先在本地把图片缩到边界框内并统一转成 PNG，
//! 再以 Base64 文本（不含 `data:` 前缀）交给表单提交。
//! 按职责拆分为多个子模块：
//!
//! - `service`：并发入口，每次调用一个独立任务
//! - `handler`：编排整条处理链路（回调式与 `Result` 式两种入口）
//! - `loader`：读取阶段（内存文件 / 本地路径 / Data URI）
//! - `geometry`：目标尺寸计算
//! - `pipeline`：解码、离屏绘制、PNG 编码
//! - `config/error/source`：配置、错误、数据模型
//!
//! ## 调用链
//!
//! ```text
//! ResizeService::resize（派生任务）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（读取，挂起点 1）
//!    └─ pipeline.rs（spawn_blocking 解码/缩放/编码，挂起点 2）
//!         └─ geometry.rs（只检查较长边）
//!    ↓
//! on_complete(payload) —— 失败时不回调
//! ```

mod config;
mod error;
mod geometry;
mod handler;
mod loader;
mod pipeline;
mod service;
mod source;

pub use config::{IMAGE_SIZE, ImageConfig, ImagePerformanceProfile};
pub use error::ImageError;
pub use geometry::fit_within_bounds;
pub use handler::ImageHandler;
pub use service::ResizeService;
pub use source::{BoundingBox, EncodedImage, ImageSource, SourceFile};
