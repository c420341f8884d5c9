use reqwest::Client;
use tracing::{debug, warn};

/// Expands redirecting share links to the page they point at
#[derive(Debug, Clone)]
pub struct ShortLinkResolver {
    client: Client,
    markers: Vec<String>,
}

impl ShortLinkResolver {
    pub fn new(client: Client, markers: Vec<String>) -> Self {
        Self { client, markers }
    }

    pub fn is_short_link(&self, url: &str) -> bool {
        self.markers.iter().any(|m| url.contains(m.as_str()))
    }

    /// Follow redirects and return the final URL. Best effort: on any failure the original URL
    /// is returned unchanged.
    pub async fn expand(&self, url: &str) -> String {
        if !self.is_short_link(url) {
            return url.to_owned();
        }

        match self.client.head(url).send().await {
            Ok(response) => {
                let expanded = response.url().as_str().to_owned();
                debug!(short = url, expanded = %expanded, "expanded short link");
                expanded
            }
            Err(e) => {
                warn!(short = url, error = %e, "could not expand short link, using it as is");
                url.to_owned()
            }
        }
    }
}
