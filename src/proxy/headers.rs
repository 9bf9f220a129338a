//! Forwarding header rewrite.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Point `Host` at the routed backend
//! - Append the caller to `X-Forwarded-For`, fill `X-Forwarded-Host` / `-Proto`
//! - Build the upstream URI from the backend base URL and the inbound path/query

use std::net::IpAddr;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::Uri;

use crate::load_balancer::Backend;
use crate::proxy::error::ProxyError;

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any named by `Connection` (RFC 7230 §6.1).
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| HeaderName::from_bytes(name.as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Rewrite inbound request headers for the chosen backend.
pub fn rewrite_request_headers(
    headers: &mut HeaderMap,
    backend: &Backend,
    client_ip: Option<IpAddr>,
    inbound_scheme: &'static str,
) -> Result<(), ProxyError> {
    let original_host = headers.get(header::HOST).cloned();

    strip_hop_by_hop(headers);

    let host = HeaderValue::from_str(&backend.authority())
        .map_err(|e| ProxyError::MalformedRequest(format!("backend authority: {e}")))?;
    headers.insert(header::HOST, host);

    if let Some(ip) = client_ip {
        let value = append_forwarded_for(headers, ip)?;
        headers.insert(X_FORWARDED_FOR, value);
    }

    if let Some(original_host) = original_host {
        if !headers.contains_key(&X_FORWARDED_HOST) {
            headers.insert(X_FORWARDED_HOST, original_host);
        }
    }
    if !headers.contains_key(&X_FORWARDED_PROTO) {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static(inbound_scheme));
    }

    Ok(())
}

/// Fold every prior `X-Forwarded-For` line into one list and append `ip`.
///
/// Prior values are kept as raw bytes so non-UTF-8 hops survive.
fn append_forwarded_for(headers: &HeaderMap, ip: IpAddr) -> Result<HeaderValue, ProxyError> {
    let mut forwarded: Vec<u8> = Vec::new();
    for prior in headers.get_all(&X_FORWARDED_FOR) {
        let prior = prior.as_bytes().trim_ascii();
        if prior.is_empty() {
            continue;
        }
        forwarded.extend_from_slice(prior);
        forwarded.extend_from_slice(b", ");
    }
    forwarded.extend_from_slice(ip.to_string().as_bytes());

    HeaderValue::from_bytes(&forwarded)
        .map_err(|e| ProxyError::MalformedRequest(format!("x-forwarded-for: {e}")))
}

/// Combine the backend base URL with the inbound path and query.
///
/// The backend path is joined with the request path with exactly one slash
/// between them; queries from both sides are concatenated with `&`.
pub fn upstream_uri(backend: &Backend, inbound: &Uri) -> Result<Uri, ProxyError> {
    let base = backend.url();

    let path = join_paths(base.path(), inbound.path());
    let query = match (base.query().filter(|q| !q.is_empty()), inbound.query()) {
        (Some(b), Some(r)) => Some(format!("{b}&{r}")),
        (Some(b), None) => Some(b.to_string()),
        (None, Some(r)) => Some(r.to_string()),
        (None, None) => None,
    };

    let mut target = format!("{}://{}{}", base.scheme(), backend.authority(), path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(&query);
    }

    target
        .parse::<Uri>()
        .map_err(|e| ProxyError::MalformedRequest(format!("upstream uri '{target}': {e}")))
}

fn join_paths(base: &str, request: &str) -> String {
    match (base.ends_with('/'), request.starts_with('/')) {
        (true, true) => format!("{}{}", base, &request[1..]),
        (false, false) => format!("{base}/{request}"),
        _ => format!("{base}{request}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::BackendRegistry;

    fn backend(address: &str) -> Backend {
        BackendRegistry::load(&[address]).unwrap()[0].clone()
    }

    #[test]
    fn strips_connection_listed_and_standard_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-secret"));
        headers.insert("x-secret", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        strip_hop_by_hop(&mut headers);

        assert!(headers.get("x-secret").is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn rewrites_host_and_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("gateway.local:8000"));
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"));

        rewrite_request_headers(
            &mut headers,
            &backend("http://127.0.0.1:8080"),
            Some("192.168.1.5".parse().unwrap()),
            "http",
        )
        .unwrap();

        assert_eq!(headers[header::HOST], "127.0.0.1:8080");
        assert_eq!(headers[&X_FORWARDED_FOR], "10.0.0.1, 192.168.1.5");
        assert_eq!(headers[&X_FORWARDED_HOST], "gateway.local:8000");
        assert_eq!(headers[&X_FORWARDED_PROTO], "http");
    }

    #[test]
    fn forwarded_for_keeps_every_prior_line() {
        let mut headers = HeaderMap::new();
        headers.append(X_FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"));
        headers.append(X_FORWARDED_FOR, HeaderValue::from_static("10.0.0.2"));
        headers.append(X_FORWARDED_FOR, HeaderValue::from_bytes(b"\xffhop").unwrap());

        rewrite_request_headers(
            &mut headers,
            &backend("http://127.0.0.1:8080"),
            Some("192.168.1.5".parse().unwrap()),
            "http",
        )
        .unwrap();

        let values: Vec<&[u8]> = headers
            .get_all(&X_FORWARDED_FOR)
            .iter()
            .map(HeaderValue::as_bytes)
            .collect();
        assert_eq!(values, vec![&b"10.0.0.1, 10.0.0.2, \xffhop, 192.168.1.5"[..]]);
    }

    #[test]
    fn upgrade_headers_are_not_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("Upgrade"));
        headers.insert(header::UPGRADE, HeaderValue::from_static("websocket"));
        headers.insert("sec-websocket-key", HeaderValue::from_static("dGhlIHNhbXBsZQ=="));

        rewrite_request_headers(&mut headers, &backend("http://127.0.0.1:8080"), None, "http")
            .unwrap();

        assert!(headers.get(header::UPGRADE).is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get(&X_FORWARDED_FOR).is_none());
    }

    #[test]
    fn forwarded_for_starts_fresh_without_prior_value() {
        let mut headers = HeaderMap::new();
        rewrite_request_headers(
            &mut headers,
            &backend("http://127.0.0.1:8080"),
            Some("::1".parse().unwrap()),
            "https",
        )
        .unwrap();

        assert_eq!(headers[&X_FORWARDED_FOR], "::1");
        assert_eq!(headers[&X_FORWARDED_PROTO], "https");
        assert!(headers.get(&X_FORWARDED_HOST).is_none());
    }

    #[test]
    fn upstream_uri_keeps_path_and_query() {
        let uri: Uri = "/widgets?x=1".parse().unwrap();
        let target = upstream_uri(&backend("http://127.0.0.1:8080"), &uri).unwrap();
        assert_eq!(target.to_string(), "http://127.0.0.1:8080/widgets?x=1");
    }

    #[test]
    fn upstream_uri_joins_base_path_and_query() {
        let uri: Uri = "/v1/items?page=2".parse().unwrap();
        let target = upstream_uri(&backend("https://api.example.com/base?key=abc"), &uri).unwrap();
        assert_eq!(
            target.to_string(),
            "https://api.example.com/base/v1/items?key=abc&page=2"
        );

        let target = upstream_uri(&backend("http://h:1/base/"), &"/x".parse().unwrap()).unwrap();
        assert_eq!(target.path(), "/base/x");
    }

    #[test]
    fn join_paths_uses_single_slash() {
        assert_eq!(join_paths("/", "/a"), "/a");
        assert_eq!(join_paths("/api", "/a"), "/api/a");
        assert_eq!(join_paths("/api/", "/a"), "/api/a");
        assert_eq!(join_paths("/api", "a"), "/api/a");
    }
}
