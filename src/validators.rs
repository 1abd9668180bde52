//! 表单输入校验模块
//!
//! # 设计思路
//!
//! 菜谱表单只需要几个极简单的即时校验：字段非空、最小长度、配料用量格式。
//! 每个校验都是无状态的纯函数，返回 `bool`，由调用方决定如何提示。
//! 长度按 UTF-8 字节计，与服务端表单校验保持一致。
//!
//! # 实现思路
//!
//! - 用量格式使用预编译正则：整数、小数（`1.5`）或简单分数（`1/2`）。
//! - 正则通过 `once_cell::sync::Lazy` 在首次调用时编译，后续零成本复用。

use once_cell::sync::Lazy;
use regex::Regex;

/// 配料用量：`n/m` 分数，或整数/小数。
static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+/\d+$|^\d+(\.\d+)?$").expect("amount regex"));

/// 字段是否有内容（长度大于 0，空白也算内容）。
pub fn has(input: &str) -> bool {
    !input.is_empty()
}

/// 字段长度（按 UTF-8 字节计）是否不少于 `length`。
pub fn min_length(input: &str, length: usize) -> bool {
    input.len() >= length
}

/// 配料用量是否合法。
///
/// # 示例
/// ```rust
/// use recipe_uploads::validators::valid_amount;
///
/// assert!(valid_amount("1/2"));
/// assert!(valid_amount("2.25"));
/// assert!(!valid_amount("two"));
/// ```
pub fn valid_amount(amount: &str) -> bool {
    AMOUNT_PATTERN.is_match(amount)
}
