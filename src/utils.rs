use url::{Host, Url};

/// Parses and validates a user-supplied page URL.
///
/// Only absolute `http`/`https` URLs written with `://` are accepted. The
/// host must be `localhost`, a dotted domain name, or an IP address written
/// out in full. Surrounding whitespace is ignored.
pub fn parse_page_url(input: &str) -> Option<Url> {
    let trimmed = input.trim();
    let (scheme, rest) = trimmed.split_once("://")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    let url = Url::parse(trimmed).ok()?;
    let valid_host = match url.host()? {
        Host::Domain(domain) => is_valid_domain(domain),
        // The parser accepts shorthand such as `http://1` for 0.0.0.1.
        Host::Ipv4(addr) => raw_host(rest).eq_ignore_ascii_case(&addr.to_string()),
        Host::Ipv6(_) => true,
    };

    valid_host.then_some(url)
}

/// Host as typed: authority without userinfo and port
fn raw_host(after_scheme: &str) -> &str {
    let authority = after_scheme
        .split(['/', '?', '#', '\\'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    host_port.split_once(':').map_or(host_port, |(host, _)| host)
}

fn is_valid_domain(domain: &str) -> bool {
    if domain == "localhost" {
        return true;
    }
    let labels: Vec<&str> = domain.strip_suffix('.').unwrap_or(domain).split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

/// Convenience wrapper around [`parse_page_url`]
pub fn is_valid_url(input: &str) -> bool {
    parse_page_url(input).is_some()
}

/// Picks the page URL out of query parameters.
///
/// The first parameter whose name contains `url` wins, even when its value
/// is empty or invalid.
pub fn url_from_query<'a, I>(params: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    params
        .into_iter()
        .find(|(key, _)| key.contains("url"))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/a/b?c=d#e"));
        assert!(is_valid_url("  https://example.com/page  "));
        assert!(is_valid_url("https://localhost:8080/"));
        assert!(is_valid_url("HTTPS://Example.COM/"));
        assert!(is_valid_url("http://192.168.0.1:8080/status"));
        assert!(is_valid_url("http://user@10.0.0.1/"));
        assert!(is_valid_url("http://[::1]:3000/"));
        assert!(is_valid_url("https://sub.example.co.uk/path"));
    }

    #[test]
    fn test_parse_normalizes() {
        let url = parse_page_url(" https://Example.com/a ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("   "));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("file:///etc/passwd"));
        assert!(!is_valid_url("http:example.com"));
        assert!(!is_valid_url("https:/example.com"));
        assert!(!is_valid_url("http://1"));
        assert!(!is_valid_url("http://127.1/"));
        assert!(!is_valid_url("http://example"));
        assert!(!is_valid_url("http://example..com"));
        assert!(!is_valid_url("http://.example.com"));
        assert!(!is_valid_url("http://-bad.example.com"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("http:// example.com"));
    }

    #[test]
    fn test_url_from_query_first_match_wins() {
        let params = vec![
            ("level".to_string(), "h3".to_string()),
            ("page_url".to_string(), "https://first.example/".to_string()),
            ("url".to_string(), "https://second.example/".to_string()),
        ];
        assert_eq!(url_from_query(&params), Some("https://first.example/"));
    }

    #[test]
    fn test_url_from_query_missing() {
        let params = vec![("level".to_string(), "h2".to_string())];
        assert_eq!(url_from_query(&params), None);
    }
}
