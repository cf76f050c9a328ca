use crate::model::FetchError;
use crate::scraper::Fetcher;

use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// How far into the body to look for a `<meta>` charset declaration.
const META_SNIFF_LIMIT: usize = 4096;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        debug!(%url, "request");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "non-success response");
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        let encoding = detect_charset(content_type.as_deref(), &bytes);
        let (body, _, had_errors) = encoding.decode(&bytes);
        debug!(
            %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            charset = encoding.name(),
            had_errors,
            "response"
        );
        Ok(body.into_owned())
    }
}

/// Charset from the `Content-Type` header, else from a `<meta>` tag, else UTF-8.
pub fn detect_charset(content_type: Option<&str>, body: &[u8]) -> &'static Encoding {
    content_type
        .and_then(charset_param)
        .or_else(|| meta_charset(body))
        .unwrap_or(UTF_8)
}

fn charset_param(value: &str) -> Option<&'static Encoding> {
    value.split(';').find_map(|param| {
        let (name, label) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(label.trim().trim_matches(|c| c == '"' || c == '\'').as_bytes())
    })
}

/// Handles both `<meta charset="gbk">` and the `http-equiv` form.
fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        if let Some(encoding) = charset_in_tag(&tag[..end]) {
            return Some(encoding);
        }
        rest = &tag[end..];
    }
    None
}

fn charset_in_tag(tag: &str) -> Option<&'static Encoding> {
    let after = &tag[tag.find("charset")? + "charset".len()..];
    let after = after.trim_start().strip_prefix('=')?;
    let label: String = after
        .trim_start()
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    Encoding::for_label(label.as_bytes())
}
