//! Matching dashboard values against what the manifest declares

use std::collections::BTreeMap;

/// Host assumed for a dashboard URI scheme that names none, e.g. `myapp://`
pub const DEFAULT_URI_HOST: &str = "open";

/// Scheme and host of a URI, parsed the lenient way Android's `Uri` does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkUri<'a> {
    pub scheme: Option<&'a str>,
    pub host: Option<&'a str>,
}

pub fn parse_deep_link_uri(uri: &str) -> DeepLinkUri<'_> {
    let uri = uri.trim();
    let scheme_end = uri
        .find(|c: char| matches!(c, ':' | '/' | '?' | '#'))
        .filter(|&i| uri[i..].starts_with(':') && i > 0);

    let Some(scheme_end) = scheme_end else {
        return DeepLinkUri {
            scheme: None,
            host: None,
        };
    };

    let rest = &uri[scheme_end + 1..];
    let host = rest.strip_prefix("//").and_then(|after| {
        let authority = after
            .split(|c: char| matches!(c, '/' | '?' | '#'))
            .next()
            .unwrap_or_default();
        let host_port = authority.rsplit('@').next().unwrap_or_default();
        let host = host_port.split(':').next().unwrap_or_default();
        Some(host).filter(|h| !h.is_empty())
    });

    DeepLinkUri {
        scheme: Some(&uri[..scheme_end]),
        host,
    }
}

/// Whether the declared schemes accept the dashboard URI scheme.
///
/// The URI's scheme must equal a declared scheme exactly. A scheme declared
/// without hosts accepts any host; otherwise the URI's host, or `"open"`
/// when it has none, must be among the declared hosts.
pub fn uri_scheme_matches(declared: &BTreeMap<String, Vec<String>>, uri: &str) -> bool {
    let parsed = parse_deep_link_uri(uri);
    let Some(scheme) = parsed.scheme else {
        return false;
    };
    let host = parsed.host.unwrap_or(DEFAULT_URI_HOST);

    match declared.get(scheme) {
        Some(hosts) if hosts.is_empty() => true,
        Some(hosts) => hosts.iter().any(|h| h == host),
        None => false,
    }
}

/// Exact, case-sensitive membership of a link domain in the declared hosts
pub fn domain_matches(declared_hosts: &[String], domain: &str) -> bool {
    !domain.is_empty() && declared_hosts.iter().any(|h| h == domain)
}
