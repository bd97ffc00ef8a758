use super::CustomImageError;
use std::time::Duration;

pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Downloads the raw bytes of a user-supplied image.
pub async fn fetch(url: &str) -> Result<Vec<u8>, CustomImageError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CustomImageError::EmptyUrl);
    }

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(classify)?;

    let response = client.get(url).send().await.map_err(classify)?;
    let status = response.status();
    if !status.is_success() {
        return Err(CustomImageError::Http(status.to_string()));
    }

    let bytes = response.bytes().await.map_err(classify)?;
    log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

fn classify(e: reqwest::Error) -> CustomImageError {
    log::warn!("Image download failed: {}", e);
    if e.is_timeout() {
        return CustomImageError::Timeout;
    }
    if let Some(status) = e.status() {
        return CustomImageError::Http(status.to_string());
    }
    CustomImageError::Url(reason(&e))
}

fn reason(e: &reqwest::Error) -> String {
    let mut source: Option<&dyn std::error::Error> = std::error::Error::source(e);
    let mut innermost = None;
    while let Some(s) = source {
        innermost = Some(s.to_string());
        source = s.source();
    }
    innermost.unwrap_or_else(|| e.to_string())
}
