//! 导航抽屉状态模块
//!
//! # 设计思路
//!
//! 抽屉只有“打开 / 关闭”两种状态，由渲染抽屉的组件独占持有，
//! 每次点击按钮或抽屉本身都切换一次。状态切换的结果表达为一组 CSS 类变更，
//! 由调用方应用到 DOM 上，本模块不接触具体的 UI 实现。
//!
//! # 实现思路
//!
//! - `NavDrawer` 持有单个布尔状态，`toggle` 返回本次要执行的 `ClassChange`。
//! - 宽屏（视口宽度 > 768）初始化时把高度类从 `h-0` 换成 `h-auto`。

/// 宽屏断点（像素），超过时抽屉默认展开高度。
pub const WIDE_VIEWPORT_BREAKPOINT: u32 = 768;

const CLOSED_CLASS: &str = "-translate-x-full";
const OPEN_CLASS: &str = "translate-x-0";

/// 一次 CSS 类变更：先移除 `remove`，再添加 `add`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassChange {
    pub remove: &'static str,
    pub add: &'static str,
}

/// 导航抽屉状态。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavDrawer {
    open: bool,
}

impl NavDrawer {
    /// 新建抽屉，初始为关闭状态。
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// 切换抽屉状态，返回需要应用的类变更。
    ///
    /// # 示例
    /// ```rust
    /// use recipe_uploads::nav::NavDrawer;
    ///
    /// let mut drawer = NavDrawer::new();
    /// let change = drawer.toggle();
    /// assert_eq!(change.add, "translate-x-0");
    /// assert!(drawer.is_open());
    /// ```
    pub fn toggle(&mut self) -> ClassChange {
        let change = if self.open {
            ClassChange {
                remove: OPEN_CLASS,
                add: CLOSED_CLASS,
            }
        } else {
            ClassChange {
                remove: CLOSED_CLASS,
                add: OPEN_CLASS,
            }
        };
        self.open = !self.open;
        change
    }

    /// 页面加载时按视口宽度决定的高度类变更，窄屏返回 `None`。
    pub fn initial_height(viewport_width: u32) -> Option<ClassChange> {
        (viewport_width > WIDE_VIEWPORT_BREAKPOINT).then_some(ClassChange {
            remove: "h-0",
            add: "h-auto",
        })
    }
}
