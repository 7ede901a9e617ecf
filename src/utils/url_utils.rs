// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 为缺少协议的URL补全 `https://`
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// 规范化追踪域名
///
/// 去掉协议前缀、`www.` 以及首尾的 `/`
pub fn clean_domain(domain: &str) -> String {
    domain
        .replace("https://", "")
        .replace("http://", "")
        .replace("www.", "")
        .trim_matches('/')
        .to_string()
}
