//! # 菜谱上传辅助库 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            上传页 / 菜谱表单（调用方）                     │
//! │   选择图片 ── 填写配料 ── 点击导航按钮                      │
//! └───────┬───────────────┬──────────────┬───────────────────┘
//!         ↓               ↓              ↓
//! ┌───────┼───────────────┼──────────────┼───────────────────┐
//! │  ┌─ image_handler ── 读取 → 解码 → 缩放 → PNG → Base64    │
//! │  │                                                       │
//! │  ├─ validators ───── 非空 / 最小长度 / 用量格式            │
//! │  ├─ nav ──────────── 抽屉开关状态                          │
//! │  ├─ settings ─────── JSON 设置文件 → ImageConfig          │
//! │  └─ error ────────── AppError (统一错误类型)               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`image_handler`] | 图片等比缩放到边界框内，输出无前缀的 Base64 PNG |
//! | [`validators`] | 表单字段即时校验 |
//! | [`nav`] | 导航抽屉状态与 CSS 类变更 |
//! | [`settings`] | 设置文件的读取、叠加与保存 |
//! | [`error`] | 统一错误类型 `AppError` |

pub mod error;
pub mod image_handler;
pub mod nav;
pub mod settings;
pub mod validators;
