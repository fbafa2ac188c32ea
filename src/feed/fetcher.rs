//! HTTP boundary of the article pipeline.
//!
//! One request, one response: no retry, no app-level timeout, no
//! cancellation. Every transport failure collapses into an empty article
//! list plus a `fetch_failed` flag for the display layer — the underlying
//! error never crosses this boundary.

use futures::StreamExt;
use thiserror::Error;

use crate::article::Article;

/// Feed endpoint the dashboard reads from. The endpoint is fixed
/// configuration, not a parameter of the parsing core.
pub const DEFAULT_FEED_URL: &str = "https://www.codecentric.de/feed";

/// Response bodies larger than this are rejected before parsing.
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Transport-level failures. Logged and collapsed at the boundary; see
/// [`load_articles`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("response too large")]
    ResponseTooLarge,
}

/// What the display layer gets back from a load: a (possibly empty) list
/// of articles and a flag saying whether the FETCH itself failed.
///
/// `fetch_failed` drives the user-visible "try again later" message. A
/// feed that downloads fine but fails to parse is NOT a fetch failure:
/// it yields empty articles with `fetch_failed: false`.
#[derive(Debug)]
pub struct FeedOutcome {
    pub articles: Vec<Article>,
    pub fetch_failed: bool,
}

/// Fetches the feed at `url` and runs it through the pipeline.
///
/// Total: never returns an error and never panics. Transport failures are
/// logged at error level and reported via [`FeedOutcome::fetch_failed`];
/// parse failures are handled further down in the parser.
pub async fn load_articles(client: &reqwest::Client, url: &str) -> FeedOutcome {
    match fetch_feed_text(client, url).await {
        Ok(raw) => FeedOutcome {
            articles: super::parse_articles(&raw),
            fetch_failed: false,
        },
        Err(error) => {
            tracing::error!(url = %url, error = %error, "feed fetch failed");
            FeedOutcome {
                articles: Vec::new(),
                fetch_failed: true,
            }
        }
    }
}

async fn fetch_feed_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    // Feeds occasionally lie about their encoding; a lossy decode keeps
    // the rest of the document usable instead of failing the whole load.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads a response body, enforcing `limit` while streaming so an
/// unbounded body cannot exhaust memory.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
