// Shared fakes and fixtures for unit tests
use crate::model::FetchError;
use crate::scraper::Fetcher;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

pub const LISTING_URL: &str = "http://www.gaoxiaojob.com/";

/// Serves canned pages; unknown URLs fail like a 404.
pub struct FakeFetcher {
    pub pages: HashMap<String, String>,
    pub hang: HashSet<String>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.clone()))
                .collect(),
            hang: HashSet::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.hang.contains(url.as_str()) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

/// Listing page linking to each of `hrefs`.
pub fn listing(hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(r#"<li><span><a href="/c">[c]</a><a href="{href}">job</a></span></li>"#)
        })
        .collect();
    format!(r#"<html><body><ul class="last_updated">{items}</ul></body></html>"#)
}

/// Detail page in category Education, province Beijing.
pub fn detail(title: &str, published: &str) -> String {
    format!(
        r#"<html><body class="articleview">
            <div class="position"><a>首页</a><a>Education</a></div>
            <div class="article_left border"><h1 class="title-a">{title}</h1>
              <ul class="article_fenlei"><li>所属省份：Beijing</li><li>发布时间：{published}</li></ul>
            </div>
            <div class="article_body">body</div>
        </body></html>"#
    )
}

/// Answers one HTTP request with `body` and hands back the raw request.
/// Returns the server's base URL (`http://127.0.0.1:<port>`).
pub async fn one_shot_server(content_type: &str, body: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        content_type,
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request_complete(&request) {
                break;
            }
        }
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base, handle)
}

/// Base URL of a port nobody listens on.
pub async fn dead_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    base
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}
