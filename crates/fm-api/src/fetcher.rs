use bytes::Bytes;
use flate2::read::GzDecoder;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION,
    CONTENT_ENCODING, HOST, REFERER, USER_AGENT,
};
use reqwest::{Client, Response, StatusCode, Url};
use std::io::Read;
use std::time::Duration;
use tracing::debug;

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const BROWSER_ACCEPT_ENCODING: &str = "gzip";
const BROWSER_ACCEPT_LANGUAGE: &str = "zh-cn,zh;q=0.8,en-us;q=0.5,en;q=0.3";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:12.0) Gecko/20100101 Firefox/12.0";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: StatusCode, url: String },
    #[error("Unable to decode gzip response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Plain HTTP GET access to the upstream API and media hosts.
///
/// Metadata requests are bounded by `request_timeout` as a whole, media
/// streams only by `idle_timeout` between two received chunks.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    request_timeout: Duration,
    idle_timeout: Duration,
}

impl Fetcher {
    pub fn create(request_timeout: Duration, idle_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(request_timeout)
            .build()
            .map_err(|error| FetchError::Transport {
                url: String::new(),
                source: error,
            })?;

        Ok(Self {
            client,
            request_timeout,
            idle_timeout,
        })
    }

    /// Fetches `url` with `query` merged into its query string and returns the
    /// (gzip-decoded) body of a `200 OK` response.
    pub async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>, FetchError> {
        let url = merge_query(url, query)?;
        let headers = browser_headers(&url)?;

        debug!(%url, "Fetching remote content");

        let response = self
            .client
            .get(url.clone())
            .headers(headers)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|error| FetchError::from_reqwest(&url, error))?;

        let response = check_status(&url, response)?;

        let is_gzip = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().eq_ignore_ascii_case("gzip"))
            .unwrap_or(false);

        let body = response
            .bytes()
            .await
            .map_err(|error| FetchError::from_reqwest(&url, error))?;

        if is_gzip {
            decode_gzip(&url, &body)
        } else {
            Ok(body.to_vec())
        }
    }

    pub async fn open_stream(&self, url: &str) -> Result<MediaStream, FetchError> {
        let url = merge_query(url, &[])?;

        debug!(%url, "Opening media stream");

        let request = self
            .client
            .get(url.clone())
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send();

        let response = match tokio::time::timeout(self.idle_timeout, request).await {
            Ok(result) => result.map_err(|error| FetchError::from_reqwest(&url, error))?,
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                })
            }
        };

        Ok(MediaStream {
            response: check_status(&url, response)?,
            url,
            idle_timeout: self.idle_timeout,
        })
    }
}

pub struct MediaStream {
    url: Url,
    response: Response,
    idle_timeout: Duration,
}

impl MediaStream {
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Returns the next body chunk, or `None` once the body is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, FetchError> {
        match tokio::time::timeout(self.idle_timeout, self.response.chunk()).await {
            Ok(Ok(chunk)) => Ok(chunk),
            Ok(Err(error)) => Err(FetchError::from_reqwest(&self.url, error)),
            Err(_) => Err(FetchError::Timeout {
                url: self.url.to_string(),
            }),
        }
    }
}

/// Caller-supplied query values replace values of the same key already
/// present in `url`.
pub(crate) fn merge_query(url: &str, query: &[(&str, &str)]) -> Result<Url, FetchError> {
    let mut parsed = Url::parse(url).map_err(|error| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: error.to_string(),
    })?;

    if query.is_empty() {
        return Ok(parsed);
    }

    let mut pairs = parsed
        .query_pairs()
        .filter(|(key, _)| !query.iter().any(|(name, _)| *name == &**key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect::<Vec<_>>();
    pairs.extend(
        query
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string())),
    );

    parsed.query_pairs_mut().clear().extend_pairs(pairs);

    Ok(parsed)
}

fn browser_headers(url: &Url) -> Result<HeaderMap, FetchError> {
    let invalid = |reason: &str| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => return Err(invalid("missing host")),
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static(BROWSER_ACCEPT_ENCODING),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        HOST,
        HeaderValue::from_str(&host).map_err(|_| invalid("host is not a valid header value"))?,
    );
    headers.insert(
        REFERER,
        HeaderValue::from_str(url.as_str())
            .map_err(|_| invalid("url is not a valid header value"))?,
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    Ok(headers)
}

fn check_status(url: &Url, response: Response) -> Result<Response, FetchError> {
    match response.status() {
        StatusCode::OK => Ok(response),
        status => Err(FetchError::HttpStatus {
            status,
            url: url.to_string(),
        }),
    }
}

fn decode_gzip(url: &Url, body: &[u8]) -> Result<Vec<u8>, FetchError> {
    let mut decoded = Vec::new();

    GzDecoder::new(body)
        .read_to_end(&mut decoded)
        .map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

    Ok(decoded)
}
