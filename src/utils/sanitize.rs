// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;

/// 清理用户输入中的标记
///
/// 解析为 HTML 片段后只保留文本节点，标签被剥离而内部文本保留，结果去除首尾空白
pub fn sanitize_input(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Fast path: nothing that could open a tag
    if !text.contains('<') {
        return text.trim().to_string();
    }

    let fragment = Html::parse_fragment(text);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
