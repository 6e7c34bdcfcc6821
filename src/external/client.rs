use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent with every notification
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client instance shared by every remote-mode notification client
///
/// Initialized lazily on first access. Clients constructed without an explicit
/// `reqwest::Client` reuse this one, so connections to the notification
/// service are pooled across clients.
///
/// # Features
/// - **Timeouts**: 10s connect timeout; the whole-request bound is applied per
///   dispatch from the client's `timeout_seconds`
/// - **Compression**: gzip, deflate, brotli and zstd response bodies
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
///
/// # Example
/// ```ignore
/// use notifier_client::external::HTTP_CLIENT;
///
/// let response = HTTP_CLIENT
///     .post("http://localhost:9001/api/events?access_token=abc")
///     .json(&serde_json::json!({"event": "signup"}))
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});
