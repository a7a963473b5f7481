use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Request timeout in seconds.
const FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, TLS, timeout.
    Request(reqwest::Error),
    /// The server answered with a non-success status code.
    Status(u16),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request(e) => write!(f, "request failed: {}", e),
            FetchError::Status(code) => write!(f, "server returned status {}", code),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Request(e) => Some(e),
            FetchError::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Request(e)
    }
}

/// Fetch the markup document at `address` as text. Redirects follow
/// reqwest's default policy; anything outside the 2xx range is an
/// error.
pub fn fetch_markup(address: &str) -> Result<String, FetchError> {
    eprintln!("Fetching page: {}", address);

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;

    let response = client.get(address).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response.text()?;
    eprintln!("Fetched {} bytes from {}", body.len(), address);
    Ok(body)
}
