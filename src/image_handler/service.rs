//! # 服务层（并发入口）
//!
//! ## 设计思路
//!
//! 上传页的调用方式是“发起后不管”：每次选择文件触发一次缩放，结果通过回调送回。
//! `ResizeService` 为每次调用派生一个独立的 tokio 任务，多次调用互不影响，
//! 回调的先后顺序也不保证与调用顺序一致。
//!
//! ## 实现思路
//!
//! - 内部持有 `Arc<ImageHandler>`，任务之间只共享配置（每次读取快照）。
//! - 返回 `JoinHandle`，调用方可以等待任务结束，但无法取消正在进行的读取或解码。

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::source::{BoundingBox, EncodedImage};
use super::{ImageConfig, ImageError, ImageHandler, ImagePerformanceProfile, ImageSource};

/// 图片缩放服务。
#[derive(Clone)]
pub struct ResizeService {
    handler: Arc<ImageHandler>,
}

impl ResizeService {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            handler: Arc::new(ImageHandler::new(config)),
        }
    }

    /// 派生一次缩放任务，成功时回调无前缀的 Base64 PNG。
    ///
    /// 必须在 tokio 运行时内调用。
    pub fn resize<F>(
        &self,
        source: ImageSource,
        max_width: u32,
        max_height: u32,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(String) + Send + 'static,
    {
        let handler = Arc::clone(&self.handler);
        tokio::spawn(async move {
            handler
                .resize(source, max_width, max_height, on_complete)
                .await;
        })
    }

    /// 派生一次缩放任务，并通过任务结果暴露错误。
    pub fn spawn_try_resize(
        &self,
        source: ImageSource,
        bounds: BoundingBox,
    ) -> JoinHandle<Result<EncodedImage, ImageError>> {
        let handler = Arc::clone(&self.handler);
        tokio::spawn(async move { handler.try_resize(source, bounds).await })
    }

    pub fn set_performance_profile(
        &self,
        profile: ImagePerformanceProfile,
    ) -> Result<(), ImageError> {
        self.handler.set_performance_profile(profile)
    }

    pub fn get_performance_profile(&self) -> Result<ImagePerformanceProfile, ImageError> {
        self.handler.get_performance_profile()
    }
}

impl Default for ResizeService {
    fn default() -> Self {
        Self::new(ImageConfig::default())
    }
}
