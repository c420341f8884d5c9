use crate::config::Config;

/// Build the pooled client shared by every stage. Cloning it is cheap and clones share the
/// connection pool.
pub fn build_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(config.request_timeout())
        .build()
}
