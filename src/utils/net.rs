// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::HeaderMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// 解析客户端IP
///
/// 依次使用 `X-Forwarded-For` 的第一项、`X-Real-IP`、套接字对端地址
///
/// # 参数
///
/// * `headers` - 请求头
/// * `peer` - 套接字对端地址，测试或无连接信息时为空
///
/// # 返回值
///
/// 客户端IP字符串，全部缺失时为 `None`
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = real_ip {
        return Some(ip.to_string());
    }

    peer.map(|addr| addr.ip().to_string())
}

/// 检查IP是否在允许列表中
///
/// 列表项可以是单个地址或 CIDR；空列表允许所有地址，
/// 无法解析的客户端IP在非空列表下一律拒绝
pub fn is_ip_allowed(ip: Option<&str>, allowlist: &[String]) -> bool {
    if allowlist.is_empty() {
        return true;
    }
    let Some(ip) = ip.and_then(|raw| raw.trim().parse::<IpAddr>().ok()) else {
        return false;
    };

    allowlist.iter().map(|entry| entry.trim()).any(|entry| {
        if entry.contains('/') {
            is_ip_in_cidr(&ip, entry)
        } else {
            entry.parse::<IpAddr>().is_ok_and(|allowed| allowed == ip)
        }
    })
}

/// 检查IP是否在 CIDR 网段内
pub fn is_ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };

    match (ip, network.parse::<IpAddr>()) {
        (IpAddr::V4(ip), Ok(IpAddr::V4(network))) => ipv4_in_network(ip, &network, prefix),
        (IpAddr::V6(ip), Ok(IpAddr::V6(network))) => ipv6_in_network(ip, &network, prefix),
        _ => false,
    }
}

fn ipv4_in_network(ip: &Ipv4Addr, network: &Ipv4Addr, prefix: u8) -> bool {
    if prefix > 32 {
        return false;
    }
    let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
    (u32::from(*ip) & mask) == (u32::from(*network) & mask)
}

fn ipv6_in_network(ip: &Ipv6Addr, network: &Ipv6Addr, prefix: u8) -> bool {
    if prefix > 128 {
        return false;
    }
    let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
    (u128::from(*ip) & mask) == (u128::from(*network) & mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_precedence() {
        let peer: SocketAddr = "192.0.2.10:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("192.0.2.10"));
        assert_eq!(client_ip(&headers, None), None);

        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("198.51.100.4"));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_cidr_matching() {
        let ip: IpAddr = "192.168.1.100".parse().unwrap();
        assert!(is_ip_in_cidr(&ip, "192.168.1.0/24"));
        assert!(!is_ip_in_cidr(&ip, "192.168.2.0/24"));
        assert!(is_ip_in_cidr(&ip, "0.0.0.0/0"));
        assert!(!is_ip_in_cidr(&ip, "192.168.1.0/33"));

        let ip: IpAddr = "2001:db8::1".parse().unwrap();
        assert!(is_ip_in_cidr(&ip, "2001:db8::/32"));
        assert!(!is_ip_in_cidr(&ip, "2001:db9::/32"));
        assert!(!is_ip_in_cidr(&ip, "10.0.0.0/8"));
    }

    #[test]
    fn test_allowlist() {
        let allowlist = vec!["10.0.0.0/8".to_string(), "127.0.0.1".to_string()];
        assert!(is_ip_allowed(Some("10.20.30.40"), &allowlist));
        assert!(is_ip_allowed(Some("127.0.0.1"), &allowlist));
        assert!(!is_ip_allowed(Some("192.168.0.1"), &allowlist));
        assert!(!is_ip_allowed(None, &allowlist));
        assert!(!is_ip_allowed(Some("not-an-ip"), &allowlist));
        assert!(is_ip_allowed(None, &[]));
    }
}
