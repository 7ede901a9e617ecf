// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日志订阅器
///
/// `RUST_LOG` 优先；未设置时使用 `info,rankscope=debug`。`json` 为 true 时输出结构化 JSON 日志
pub fn init_telemetry(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,rankscope=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    // try_init: tests may install a subscriber more than once
    if json {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init();
    } else {
        let _ = registry.with(tracing_subscriber::fmt::layer()).try_init();
    }
}
