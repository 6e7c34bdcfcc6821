//! Resolution of [`ClientOptions`] into a usable [`Configuration`].
//!
//! Exactly one mode is chosen per client:
//! 1. embedded, when `notifier` holds an in-process notifier
//! 2. single-URL, when `url` (or a connection-string `notifier`) is set
//! 3. discrete, when any of protocol/host/hostname/port/path is set
//! 4. otherwise the [`DefaultProfile`] decides between 2 and 3

use std::fmt;
use std::net::Ipv6Addr;
use std::sync::Arc;

use url::{Host, Url};

use crate::config::error::ConfigError;
use crate::config::settings::{
    ClientOptions, DEFAULT_HOST, DEFAULT_PATH, DEFAULT_PORT, DEFAULT_PROTOCOL, DEFAULT_URL,
    DefaultProfile, NotifierOption, PortPolicy,
};
use crate::notifications::Notifier;

/// Protocols the HTTP transport can speak
const SUPPORTED_PROTOCOLS: &[&str] = &["http", "https"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    Embedded,
    SingleUrl,
    Discrete,
}

/// A complete remote endpoint: every field is non-empty and the port is
/// non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub token: String,
    pub port_policy: PortPolicy,
}

/// Resolved configuration bound to a client instance
#[derive(Clone)]
pub enum Configuration {
    Remote(Endpoint),
    Embedded(Arc<dyn Notifier>),
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Configuration::Remote(endpoint) => f.debug_tuple("Remote").field(endpoint).finish(),
            Configuration::Embedded(n) => f.debug_tuple("Embedded").field(&n.name()).finish(),
        }
    }
}

/// Merges caller options over one of the built-in default profiles
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigResolver {
    profile: DefaultProfile,
}

impl ConfigResolver {
    pub fn new(profile: DefaultProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> DefaultProfile {
        self.profile
    }

    /// Decide which resolution mode the options select
    pub fn mode(&self, options: &ClientOptions) -> ResolutionMode {
        match &options.notifier {
            Some(NotifierOption::Embedded(_)) => return ResolutionMode::Embedded,
            Some(NotifierOption::Address(_)) => return ResolutionMode::SingleUrl,
            None => {}
        }

        if options.url.is_some() {
            ResolutionMode::SingleUrl
        } else if options.has_discrete_fields() {
            ResolutionMode::Discrete
        } else {
            match self.profile {
                DefaultProfile::SingleUrl => ResolutionMode::SingleUrl,
                DefaultProfile::Discrete => ResolutionMode::Discrete,
            }
        }
    }

    /// Resolve the options, failing with the first incomplete field
    pub fn resolve(&self, options: &ClientOptions) -> Result<Configuration, ConfigError> {
        match self.mode(options) {
            ResolutionMode::Embedded => match &options.notifier {
                Some(NotifierOption::Embedded(notifier)) => {
                    Ok(Configuration::Embedded(Arc::clone(notifier)))
                }
                _ => Err(ConfigError::missing("notifier")),
            },
            ResolutionMode::SingleUrl => self.resolve_url(options).map(Configuration::Remote),
            ResolutionMode::Discrete => self.resolve_discrete(options).map(Configuration::Remote),
        }
    }

    fn resolve_discrete(&self, options: &ClientOptions) -> Result<Endpoint, ConfigError> {
        let protocol = options.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL);
        let host = options
            .host
            .as_deref()
            .or(options.hostname.as_deref())
            .unwrap_or(DEFAULT_HOST);
        let port = options.port.unwrap_or(DEFAULT_PORT);
        let path = options.path.as_deref().unwrap_or(DEFAULT_PATH);

        Endpoint::new(protocol, host, port, path, options.token.as_deref(), options.port_policy)
    }

    fn resolve_url(&self, options: &ClientOptions) -> Result<Endpoint, ConfigError> {
        let raw = match (&options.url, &options.notifier) {
            (Some(url), _) => url.as_str(),
            (None, Some(NotifierOption::Address(address))) => address.as_str(),
            _ => DEFAULT_URL,
        };

        if raw.trim().is_empty() {
            return Err(ConfigError::missing("url"));
        }

        let parsed = Url::parse(raw).map_err(|e| ConfigError::invalid_url(raw, e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::missing("host"))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| ConfigError::missing("port"))?;

        // Any query on the supplied URL is dropped; the token is attached per request
        Endpoint::new(
            parsed.scheme(),
            host,
            port,
            parsed.path(),
            options.token.as_deref(),
            options.port_policy,
        )
    }
}

impl Endpoint {
    /// Build an endpoint, checking every field the remote modes require
    pub fn new(
        protocol: &str,
        host: &str,
        port: u16,
        path: &str,
        token: Option<&str>,
        port_policy: PortPolicy,
    ) -> Result<Self, ConfigError> {
        let protocol = required("protocol", Some(protocol))?.to_lowercase();
        if !SUPPORTED_PROTOCOLS.contains(&protocol.as_str()) {
            return Err(ConfigError::ValidationError {
                field: "protocol".to_string(),
                message: format!(
                    "Unsupported protocol '{}'. Expected one of: {}",
                    protocol,
                    SUPPORTED_PROTOCOLS.join(", ")
                ),
            });
        }

        let host = normalize_host(required("host", Some(host))?)?;
        if port == 0 {
            return Err(ConfigError::missing("port"));
        }
        let path = required("path", Some(path))?;
        let token = required("token", token)?;
        let path = normalize_path(&protocol, &host, port, path)?;

        Ok(Self {
            protocol,
            host,
            port,
            path,
            token: token.to_string(),
            port_policy,
        })
    }

    /// Canonical port of the endpoint's protocol
    pub fn default_port(&self) -> Option<u16> {
        match self.protocol.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        }
    }
}

/// Canonical host text; bare IPv6 literals are bracketed
fn normalize_host(host: &str) -> Result<String, ConfigError> {
    if let Ok(ip) = host.parse::<Ipv6Addr>() {
        return Ok(Host::<String>::Ipv6(ip).to_string());
    }

    Host::parse(host).map(|h| h.to_string()).map_err(|e| {
        ConfigError::validation("host".to_string(), format!("Invalid host '{}': {}", host, e))
    })
}

/// Percent-encoded absolute path. `?` and `#` are rejected since the token
/// query is appended after the path.
fn normalize_path(
    protocol: &str,
    host: &str,
    port: u16,
    path: &str,
) -> Result<String, ConfigError> {
    if path.contains(['?', '#']) {
        return Err(ConfigError::validation(
            "path".to_string(),
            format!("Path '{}' must not contain '?' or '#'", path),
        ));
    }

    let base = format!("{}://{}:{}", protocol, host, port);
    let mut url =
        Url::parse(&base).map_err(|e| ConfigError::invalid_url(base.as_str(), e.to_string()))?;
    url.set_path(path);
    Ok(url.path().to_string())
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::missing(field)),
    }
}
