//! Image prefetching.
//!
//! Fetches are fire-and-forget: no completion tracking, no retry, and
//! failures are only logged. Deduplication is left to the HTTP cache.

/// Assets every page needs.
pub const CRITICAL_IMAGES: &[&str] = &[
    "/images/logo.svg",
    "/images/hero-dashboard.webp",
    "/images/avatar-placeholder.png",
];

/// Assets worth warming before a route is visited.
pub const ROUTE_IMAGES: &[(&str, &[&str])] = &[
    (
        "dashboard",
        &["/images/charts/pipeline.svg", "/images/charts/revenue.svg"],
    ),
    (
        "clients.index",
        &["/images/empty-states/clients.svg"],
    ),
    (
        "deals.index",
        &["/images/empty-states/deals.svg", "/images/stages/board.svg"],
    ),
    (
        "communications.index",
        &["/images/empty-states/communications.svg"],
    ),
];

/// Issues a background image request.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, path: &str);
}

pub struct ImagePrefetcher<F> {
    fetcher: F,
}

impl<F: ImageFetcher> ImagePrefetcher<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn prefetch_critical(&self) -> &'static [&'static str] {
        for path in CRITICAL_IMAGES {
            self.fetcher.fetch(path);
        }
        CRITICAL_IMAGES
    }

    /// Fetch the images for `route`; unknown routes fetch nothing.
    pub fn prefetch_for_route(&self, route: &str) -> &'static [&'static str] {
        let paths = images_for_route(route);
        for path in paths {
            self.fetcher.fetch(path);
        }
        paths
    }
}

pub fn images_for_route(route: &str) -> &'static [&'static str] {
    ROUTE_IMAGES
        .iter()
        .find(|(name, _)| *name == route)
        .map(|(_, paths)| *paths)
        .unwrap_or(&[])
}

/// Fetches images over HTTP on the current tokio runtime.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImageFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, path: &str) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(path = %path, "No runtime; skipping prefetch");
            return;
        };

        let request = self.client.get(self.url_for(path));
        let path = path.to_string();
        handle.spawn(async move {
            match request.send().await {
                Ok(response) => {
                    tracing::trace!(path = %path, status = %response.status(), "Prefetched image")
                }
                Err(e) => tracing::debug!(path = %path, error = %e, "Image prefetch failed"),
            }
        });
    }
}
