// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::IpAddr;
use tokio::net::lookup_host;
use url::Url;

/// 验证 URL 是否安全 (防止 SSRF)
///
/// 只允许 http/https，并检查解析后的 IP 是否为私有地址或环回地址
pub async fn validate_url(url_str: &str) -> anyhow::Result<()> {
    let url = Url::parse(url_str)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow::anyhow!("Unsupported scheme: {}", url.scheme()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("Missing host"))?;

    if host == "localhost" {
        return Err(anyhow::anyhow!("SSRF protection: localhost is not allowed"));
    }

    let port = url.port_or_known_default().unwrap_or(80);
    // IPv6 literals keep their brackets in host_str
    let addrs = lookup_host(format!("{}:{}", host, port)).await?;

    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(anyhow::anyhow!(
                "SSRF protection: Private IP access is not allowed: {}",
                addr.ip()
            ));
        }
    }

    Ok(())
}

fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private()
                || ipv4.is_loopback()
                || ipv4.is_link_local()
                || ipv4.is_multicast()
                || ipv4.is_unspecified()
                || ipv4.is_broadcast()
        }
        IpAddr::V6(ipv6) => {
            if let Some(mapped) = ipv6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(mapped));
            }
            let first = ipv6.segments()[0];
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // fc00::/7
                || (first & 0xfe00) == 0xfc00
                // fe80::/10
                || (first & 0xffc0) == 0xfe80
                // ff00::/8
                || (first & 0xff00) == 0xff00
        }
    }
}
