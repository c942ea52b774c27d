//! Image URL normalization.
//!
//! Every image reference that ends up in the document passes through
//! [`normalize`]. The output is always one of:
//!
//! | Input | Output |
//! |---|---|
//! | `data:` / `blob:` URI | unchanged |
//! | URL on the proxy host | unchanged |
//! | `//host/x` | proxied `https://host/x` |
//! | `/x`, `x` | proxied `{origin}/x` |
//! | `localhost`, `127.*`, `10.*`, `192.168.*`, `172.16-31.*`, `*.local` | proxied, host swapped for the origin's |
//! | any other absolute URL | proxied |
//!
//! Proxied means `{proxy_base}?url={encoded}&w={max_width}&q={quality}&il&fit={fit}`,
//! with the scheme stripped from the encoded URL. Because proxy URLs pass
//! through untouched, `normalize(normalize(u)) == normalize(u)`.

use crate::config::ProxyConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// `encodeURIComponent` leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` unescaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Normalizer bound to one proxy configuration.
#[derive(Debug, Clone)]
pub struct ImageUrlNormalizer {
    config: ProxyConfig,
    proxy_host: String,
    origin_host: String,
}

impl ImageUrlNormalizer {
    pub fn new(config: ProxyConfig) -> Self {
        let proxy_host = host_of(&config.proxy_base).unwrap_or_default();
        let origin_host = host_of(&config.origin).unwrap_or_default();
        Self {
            config,
            proxy_host,
            origin_host,
        }
    }

    /// Safe, proxied form of `url`; `None` only for blank input.
    pub fn normalize(&self, url: &str) -> Option<String> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("data:") || lower.starts_with("blob:") {
            return Some(trimmed.to_string());
        }

        let absolute = if let Some(rest) = trimmed.strip_prefix("//") {
            format!("https://{rest}")
        } else if has_scheme(trimmed) {
            trimmed.to_string()
        } else {
            let origin = self.config.origin.trim_end_matches('/');
            format!("{origin}/{}", trimmed.trim_start_matches('/'))
        };

        let host = host_of(&absolute).unwrap_or_default();
        if !self.proxy_host.is_empty() && host == self.proxy_host {
            return Some(absolute);
        }

        let absolute = if is_private_host(&host) {
            let tail = after_authority(&absolute);
            format!("https://{}{tail}", self.origin_host)
        } else {
            absolute
        };

        Some(self.proxied(&absolute))
    }

    fn proxied(&self, absolute: &str) -> String {
        let without_scheme = strip_http_scheme(absolute);
        let encoded = utf8_percent_encode(without_scheme, COMPONENT);
        format!(
            "{}?url={}&w={}&q={}&il&fit={}",
            self.config.proxy_base, encoded, self.config.max_width, self.config.quality, self.config.fit
        )
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// One-shot normalization without keeping a normalizer around.
pub fn normalize(url: &str, config: &ProxyConfig) -> Option<String> {
    ImageUrlNormalizer::new(config.clone()).normalize(url)
}

fn has_scheme(url: &str) -> bool {
    match url.find("://") {
        Some(pos) => url[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        None => false,
    }
}

fn strip_http_scheme(url: &str) -> &str {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if lower.starts_with("https://") {
        &url[8..]
    } else if lower.starts_with("http://") {
        &url[7..]
    } else {
        url
    }
}

/// Everything after `scheme://authority`, including the leading `/`.
fn after_authority(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(pos) => &url[pos + 3..],
        None => url,
    };
    match rest.find(['/', '?', '#']) {
        Some(pos) => &rest[pos..],
        None => "",
    }
}

/// Lowercased host without userinfo or port.
fn host_of(url: &str) -> Option<String> {
    let rest = &url[url.find("://")? + 3..];
    let authority = match rest.find(['/', '?', '#']) {
        Some(pos) => &rest[..pos],
        None => rest,
    };
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = if host_port.starts_with('[') {
        host_port.split(']').next().map(|h| format!("{h}]"))?
    } else {
        host_port.split(':').next().unwrap_or(host_port).to_string()
    };
    Some(host.to_ascii_lowercase())
}

fn is_private_host(host: &str) -> bool {
    if host == "localhost" || host.ends_with(".localhost") || host.ends_with(".local") {
        return true;
    }
    if host == "[::1]" || host == "0.0.0.0" {
        return true;
    }
    let octets: Vec<u8> = host.split('.').filter_map(|part| part.parse().ok()).collect();
    if octets.len() != 4 || host.split('.').count() != 4 {
        return false;
    }
    match (octets[0], octets[1]) {
        (127, _) | (10, _) | (192, 168) => true,
        (172, second) => (16..=31).contains(&second),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> ImageUrlNormalizer {
        ImageUrlNormalizer::new(ProxyConfig::default())
    }

    const SUFFIX: &str = "&w=2400&q=90&il&fit=inside";

    #[test]
    fn blank_input_is_none() {
        assert_eq!(normalizer().normalize(""), None);
        assert_eq!(normalizer().normalize("   \n"), None);
    }

    #[test]
    fn data_and_blob_pass_through() {
        let n = normalizer();
        assert_eq!(n.normalize(" data:image/png;base64,AAAA ").as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(n.normalize("blob:https://x/1").as_deref(), Some("blob:https://x/1"));
    }

    #[test]
    fn absolute_url_is_proxied() {
        let out = normalizer().normalize("https://cdn.example.com/a b/photo.jpg?x=1").unwrap();
        assert_eq!(
            out,
            format!("https://images.weserv.nl/?url=cdn.example.com%2Fa%20b%2Fphoto.jpg%3Fx%3D1{SUFFIX}")
        );
    }

    #[test]
    fn proxy_urls_pass_through() {
        let proxied = "https://images.weserv.nl/?url=example.com%2Fa.jpg&w=800";
        assert_eq!(normalizer().normalize(proxied).as_deref(), Some(proxied));
        let upper = "HTTPS://Images.Weserv.NL/?url=x";
        assert_eq!(normalizer().normalize(upper).as_deref(), Some(upper));
    }

    #[test]
    fn protocol_relative_gets_https() {
        let out = normalizer().normalize("//cdn.example.com/p.jpg").unwrap();
        assert!(out.contains("url=cdn.example.com%2Fp.jpg"));
    }

    #[test]
    fn root_relative_resolves_against_origin() {
        let out = normalizer().normalize("/uploads/p.jpg").unwrap();
        assert!(out.contains("url=metravel.by%2Fuploads%2Fp.jpg"));
    }

    #[test]
    fn bare_relative_resolves_against_origin() {
        let out = normalizer().normalize("uploads/p.jpg").unwrap();
        assert!(out.contains("url=metravel.by%2Fuploads%2Fp.jpg"));
    }

    #[test]
    fn development_hosts_are_rewritten_to_origin() {
        let n = normalizer();
        for url in [
            "http://localhost:8000/media/p.jpg",
            "http://127.0.0.1/media/p.jpg",
            "http://192.168.1.20:3000/media/p.jpg",
            "http://10.0.0.5/media/p.jpg",
            "http://172.20.1.1/media/p.jpg",
            "http://devbox.local/media/p.jpg",
        ] {
            let out = n.normalize(url).unwrap();
            assert!(out.contains("url=metravel.by%2Fmedia%2Fp.jpg"), "{url} -> {out}");
        }
    }

    #[test]
    fn public_lookalike_hosts_are_not_private() {
        assert!(!is_private_host("172.32.0.1"));
        assert!(!is_private_host("10.example.com"));
        assert!(!is_private_host("192.169.0.1"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = normalizer();
        for url in [
            "https://cdn.example.com/a.jpg",
            "//cdn.example.com/a.jpg",
            "/a.jpg",
            "a.jpg",
            "http://localhost/a.jpg",
            "data:image/png;base64,AA",
            "blob:x",
            "ftp://files.example.com/a.jpg",
            "mailto:someone",
            "  https://x.y/z?q=1#frag  ",
            "https://images.weserv.nl/?url=a",
        ] {
            let once = n.normalize(url).unwrap();
            let twice = n.normalize(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {url}");
        }
    }

    #[test]
    fn custom_proxy_settings_are_used() {
        let config = ProxyConfig {
            origin: "https://example.org/".into(),
            proxy_base: "https://img.example.net/resize".into(),
            max_width: 1600,
            quality: 80,
            fit: "cover".into(),
        };
        let out = normalize("/a.jpg", &config).unwrap();
        assert_eq!(out, "https://img.example.net/resize?url=example.org%2Fa.jpg&w=1600&q=80&il&fit=cover");
    }

    #[test]
    fn host_of_strips_userinfo_and_port() {
        assert_eq!(host_of("https://user:pw@Example.COM:8080/x").as_deref(), Some("example.com"));
        assert_eq!(host_of("no-scheme"), None);
    }
}
