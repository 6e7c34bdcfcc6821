//! Request URL construction.
//!
//! `<protocol>://<host>[:<port>]<path>?access_token=<token>`

use url::form_urlencoded;

use crate::config::{Endpoint, PortPolicy};

/// Query parameter carrying the access token
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Build the absolute URL a notification is POSTed to
pub fn build_url(endpoint: &Endpoint) -> String {
    let token: String = form_urlencoded::byte_serialize(endpoint.token.as_bytes()).collect();
    format!("{}?{}={}", base_url(endpoint), ACCESS_TOKEN_PARAM, token)
}

/// Same URL with the token masked, for logs and diagnostics
pub fn redacted_url(endpoint: &Endpoint) -> String {
    format!("{}?{}=***", base_url(endpoint), ACCESS_TOKEN_PARAM)
}

fn base_url(endpoint: &Endpoint) -> String {
    let elide = endpoint.port_policy == PortPolicy::ElideDefault
        && endpoint.default_port() == Some(endpoint.port);

    if elide {
        format!("{}://{}{}", endpoint.protocol, endpoint.host, endpoint.path)
    } else {
        format!(
            "{}://{}:{}{}",
            endpoint.protocol, endpoint.host, endpoint.port, endpoint.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn endpoint(protocol: &str, port: u16, policy: PortPolicy) -> Endpoint {
        Endpoint::new(protocol, "localhost", port, "/api/events", Some("abc"), policy).unwrap()
    }

    #[test]
    fn test_build_url_with_explicit_port() {
        assert_eq!(
            build_url(&endpoint("http", 9001, PortPolicy::ElideDefault)),
            "http://localhost:9001/api/events?access_token=abc"
        );
    }

    #[test]
    fn test_build_url_elides_default_ports() {
        assert_eq!(
            build_url(&endpoint("http", 80, PortPolicy::ElideDefault)),
            "http://localhost/api/events?access_token=abc"
        );
        assert_eq!(
            build_url(&endpoint("https", 443, PortPolicy::ElideDefault)),
            "https://localhost/api/events?access_token=abc"
        );
        // 443 is not canonical for http
        assert_eq!(
            build_url(&endpoint("http", 443, PortPolicy::ElideDefault)),
            "http://localhost:443/api/events?access_token=abc"
        );
    }

    #[test]
    fn test_build_url_always_policy_keeps_port() {
        assert_eq!(
            build_url(&endpoint("http", 80, PortPolicy::Always)),
            "http://localhost:80/api/events?access_token=abc"
        );
    }

    #[test]
    fn test_token_is_encoded() {
        let endpoint = Endpoint::new(
            "https",
            "notify.example.com",
            443,
            "/events",
            Some("a b&c=d"),
            PortPolicy::ElideDefault,
        )
        .unwrap();
        assert_eq!(
            build_url(&endpoint),
            "https://notify.example.com/events?access_token=a+b%26c%3Dd"
        );
    }

    #[test]
    fn test_url_with_ipv6_host_and_encoded_path_parses() {
        let endpoint = Endpoint::new(
            "http",
            "::1",
            9001,
            "/api events",
            Some("abc"),
            PortPolicy::ElideDefault,
        )
        .unwrap();
        let built = build_url(&endpoint);
        assert_eq!(built, "http://[::1]:9001/api%20events?access_token=abc");

        let parsed = url::Url::parse(&built).unwrap();
        let token = parsed
            .query_pairs()
            .find(|(k, _)| k == ACCESS_TOKEN_PARAM)
            .map(|(_, v)| v.into_owned());
        assert_eq!(token.as_deref(), Some("abc"));
        assert!(parsed.fragment().is_none());
    }

    #[test]
    fn test_redacted_url_hides_token() {
        let url = redacted_url(&endpoint("http", 9001, PortPolicy::ElideDefault));
        assert_eq!(url, "http://localhost:9001/api/events?access_token=***");
        assert!(!url.contains("abc"));
    }

    proptest! {
        #[test]
        fn property_port_omitted_exactly_when_canonical(
            https in any::<bool>(),
            port in 1u16..=65535u16,
            host in "[a-w][a-z0-9-]{0,15}(\\.[a-z]{2,6})?",
            path in "(/[a-z0-9_-]{1,10}){1,3}",
            token in "[A-Za-z0-9]{1,32}",
        ) {
            let protocol = if https { "https" } else { "http" };
            let canonical = if https { 443 } else { 80 };
            let endpoint = Endpoint::new(
                protocol, &host, port, &path, Some(&token), PortPolicy::ElideDefault,
            ).unwrap();

            let expected = if port == canonical {
                format!("{}://{}{}?access_token={}", protocol, host, path, token)
            } else {
                format!("{}://{}:{}{}?access_token={}", protocol, host, port, path, token)
            };
            prop_assert_eq!(build_url(&endpoint), expected);
        }

        #[test]
        fn property_always_policy_never_elides(
            https in any::<bool>(),
            port in 1u16..=65535u16,
        ) {
            let protocol = if https { "https" } else { "http" };
            let endpoint = Endpoint::new(
                protocol, "localhost", port, "/api", Some("t"), PortPolicy::Always,
            ).unwrap();
            let needle = format!(":{}/", port);
            prop_assert!(build_url(&endpoint).contains(&needle));
        }
    }
}
