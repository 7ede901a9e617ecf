// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use crate::config::settings::MetricsSettings;

/// 初始化指标系统
///
/// 未启用时不安装记录器，指标宏调用为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::warn!("Invalid metrics address {}: {}", settings.listen_addr, e);
            return;
        }
    };

    // Port may already be taken in development
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!("seo_analyses_total", "Total number of SEO analyses performed");
    describe_histogram!("seo_analysis_score", "Distribution of SEO analysis scores");
    describe_counter!("keyword_queries_total", "Total number of keyword research queries");
    describe_counter!("rank_checks_total", "Total number of ranking observations recorded");
    describe_counter!(
        "billing_webhook_events_total",
        "Total number of verified billing webhook events"
    );

    info!("Metrics exporter listening on {}", addr);
}
