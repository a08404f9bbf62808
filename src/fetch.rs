//! Cover image resolution.
//!
//! Covers arrive as uploaded bytes, local files, or remote URLs. Every way of resolving one can
//! fail (unreachable host, 404, HTML error page, empty file, slow server), and none of those
//! failures may sink a publish: [`CoverFetcher::resolve`] turns them into a logged warning and a
//! package without a cover.
//!
//! Each request is bounded by the client's timeout; hitting it is treated like any other failed
//! fetch.

use crate::epub::CoverError;
use crate::publication::{CoverImage, CoverSource, ImageKind};
use std::time::Duration;

/// How long a cover download may take before it is abandoned.
pub const DEFAULT_COVER_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest cover accepted from a server or the filesystem, 20 MiB.
pub const MAX_COVER_BYTES: usize = 20 * 1024 * 1024;

/// Resolves [`CoverSource`]s to images, downloading remote covers with a bounded timeout.
#[derive(Debug, Clone)]
pub struct CoverFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl CoverFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::from_client(client))
    }

    /// Use an existing client; its timeout settings apply to cover downloads.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_bytes: MAX_COVER_BYTES,
        }
    }

    /// Reject covers larger than `max_bytes`.
    pub fn with_max_bytes(self, max_bytes: usize) -> Self {
        Self { max_bytes, ..self }
    }

    /// Resolve a cover, leaving it out (and logging why) if anything goes wrong.
    pub async fn resolve(&self, source: &CoverSource) -> Option<CoverImage> {
        match self.try_resolve(source).await {
            Ok(image) => {
                log::debug!(
                    "resolved cover {source} as {} ({} bytes)",
                    image.kind,
                    image.data.len()
                );
                Some(image)
            }
            Err(e) => {
                log::warn!("Leaving out cover {source}: {e}");
                None
            }
        }
    }

    pub async fn try_resolve(&self, source: &CoverSource) -> Result<CoverImage, CoverError> {
        match source {
            CoverSource::Bytes {
                data,
                media_type,
                file_name,
            } => image_from_bytes(data.clone(), media_type.as_deref(), file_name.as_deref()),
            CoverSource::Url(url) => self.fetch(url).await,
            CoverSource::Path(path) => {
                let len = tokio::fs::metadata(path).await?.len();
                if len > self.max_bytes as u64 {
                    return Err(CoverError::TooLarge(self.max_bytes));
                }
                let data = tokio::fs::read(path).await?;
                image_from_bytes(data, None, path.to_str())
            }
        }
    }

    /// Download a cover image. Non-2xx statuses, non-image responses and bodies over the size
    /// limit are errors.
    pub async fn fetch(&self, url: &str) -> Result<CoverImage, CoverError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoverError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = &content_type {
            check_content_type(content_type)?;
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(CoverError::TooLarge(self.max_bytes));
        }

        // the declared length can be missing or wrong, so count while reading
        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(request_error)? {
            if data.len() + chunk.len() > self.max_bytes {
                return Err(CoverError::TooLarge(self.max_bytes));
            }
            data.extend_from_slice(&chunk);
        }
        image_from_bytes(data, content_type.as_deref(), Some(url))
    }
}

/// Classify raw image bytes, using the declared media type and file name as hints.
pub fn image_from_bytes(
    data: Vec<u8>,
    media_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<CoverImage, CoverError> {
    if data.is_empty() {
        return Err(CoverError::Empty);
    }
    if let Some(media_type) = media_type {
        check_content_type(media_type)?;
    }

    let kind = ImageKind::detect(media_type, file_name, &data);
    Ok(CoverImage { data, kind })
}

/// Reject declared types that are clearly not a supported image. Generic binary types are let
/// through so the file name or the bytes can decide.
fn check_content_type(content_type: &str) -> Result<(), CoverError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "" | "application/octet-stream" | "binary/octet-stream" => Ok(()),
        _ if ImageKind::from_media_type(&essence).is_some() => Ok(()),
        _ => Err(CoverError::NotAnImage(content_type.to_string())),
    }
}

fn request_error(e: reqwest::Error) -> CoverError {
    if e.is_timeout() {
        CoverError::Timeout
    } else {
        CoverError::Request(e)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDRfake";

    /// A client that ignores proxy settings so requests reach the local test server.
    pub(crate) fn fetcher(timeout: Duration) -> CoverFetcher {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .expect("can build client");
        CoverFetcher::from_client(client)
    }

    /// Serve a single canned HTTP response on a random local port and return the base URL.
    pub(crate) async fn serve_once(
        status_line: &'static str,
        content_type: Option<&'static str>,
        body: Vec<u8>,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("can bind");
        let addr = listener.local_addr().expect("has address");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("can accept");

            // read the request head; the body of a GET is empty
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("can read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let mut head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n",
                body.len()
            );
            if let Some(content_type) = content_type {
                head.push_str(&format!("Content-Type: {content_type}\r\n"));
            }
            head.push_str("\r\n");

            socket.write_all(head.as_bytes()).await.expect("can write head");
            socket.write_all(&body).await.expect("can write body");
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_image_with_declared_type() {
        let base = serve_once("200 OK", Some("image/png"), PNG_BYTES.to_vec()).await;
        let image = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/covers/abc"))
            .await
            .expect("can fetch cover");

        assert_eq!(image.kind, ImageKind::Png);
        assert_eq!(image.data, PNG_BYTES);
    }

    #[tokio::test]
    async fn falls_back_to_url_extension() {
        let base = serve_once(
            "200 OK",
            Some("application/octet-stream"),
            b"RIFF\0\0\0\0WEBPVP8 ".to_vec(),
        )
        .await;
        let image = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/cover.webp?v=2"))
            .await
            .expect("can fetch cover");
        assert_eq!(image.kind, ImageKind::Webp);
    }

    #[tokio::test]
    async fn not_found_is_an_error() {
        let base = serve_once("404 Not Found", Some("text/plain"), b"missing".to_vec()).await;
        let err = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/cover.jpg"))
            .await
            .expect_err("404 is not a cover");
        assert!(matches!(err, CoverError::Status(404)));
    }

    #[tokio::test]
    async fn html_error_page_is_not_an_image() {
        let base = serve_once(
            "200 OK",
            Some("text/html; charset=utf-8"),
            b"<html>oops</html>".to_vec(),
        )
        .await;
        let err = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/cover.jpg"))
            .await
            .expect_err("html is not a cover");
        assert!(matches!(err, CoverError::NotAnImage(_)));
    }

    #[tokio::test]
    async fn empty_body_is_an_error() {
        let base = serve_once("200 OK", Some("image/jpeg"), Vec::new()).await;
        let err = fetcher(Duration::from_secs(5))
            .fetch(&format!("{base}/cover.jpg"))
            .await
            .expect_err("empty body is not a cover");
        assert!(matches!(err, CoverError::Empty));
    }

    #[tokio::test]
    async fn oversized_cover_is_an_error() {
        let base = serve_once("200 OK", Some("image/png"), vec![0x89; 4096]).await;
        let err = fetcher(Duration::from_secs(5))
            .with_max_bytes(1024)
            .fetch(&format!("{base}/cover.png"))
            .await
            .expect_err("cover is over the limit");
        assert!(matches!(err, CoverError::TooLarge(1024)));
    }

    #[tokio::test]
    async fn oversized_cover_without_length_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("can bind");
        let addr = listener.local_addr().expect("has address");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("can accept");
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let head = "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nConnection: close\r\n\r\n";
            socket.write_all(head.as_bytes()).await.expect("can write head");
            for _ in 0..8 {
                if socket.write_all(&[0x89; 1024]).await.is_err() {
                    break;
                }
            }
            let _ = socket.shutdown().await;
        });

        let err = fetcher(Duration::from_secs(5))
            .with_max_bytes(2048)
            .fetch(&format!("http://{addr}/cover.png"))
            .await
            .expect_err("cover is over the limit");
        assert!(matches!(err, CoverError::TooLarge(2048)));
    }

    #[tokio::test]
    async fn oversized_file_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("cover.png");
        std::fs::write(&path, vec![0x89; 4096]).expect("can write cover");

        let err = fetcher(Duration::from_secs(1))
            .with_max_bytes(1024)
            .try_resolve(&CoverSource::Path(path))
            .await
            .expect_err("cover is over the limit");
        assert!(matches!(err, CoverError::TooLarge(1024)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("can bind");
        let addr = listener.local_addr().expect("has address");
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.expect("can accept");
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = fetcher(Duration::from_millis(200))
            .fetch(&format!("http://{addr}/cover.jpg"))
            .await
            .expect_err("must time out");
        assert!(matches!(err, CoverError::Timeout));
    }

    #[tokio::test]
    async fn unreachable_host_resolves_to_no_cover() {
        // request to a guaranteed-closed port -> connection refused
        let source = CoverSource::Url("http://127.0.0.1:1/cover.jpg".to_string());
        let cover = fetcher(Duration::from_millis(500)).resolve(&source).await;
        assert!(cover.is_none());
    }

    #[tokio::test]
    async fn resolves_bytes_and_files() {
        let fetcher = fetcher(Duration::from_secs(1));

        let bytes = CoverSource::Bytes {
            data: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00],
            media_type: None,
            file_name: None,
        };
        let image = fetcher.resolve(&bytes).await.expect("bytes resolve");
        assert_eq!(image.kind, ImageKind::Jpeg);

        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("cover.png");
        std::fs::write(&path, PNG_BYTES).expect("can write cover");
        let image = fetcher
            .resolve(&CoverSource::Path(path))
            .await
            .expect("file resolves");
        assert_eq!(image.kind, ImageKind::Png);

        let missing = CoverSource::Path(dir.path().join("missing.png"));
        assert!(fetcher.resolve(&missing).await.is_none());
    }

    #[test]
    fn declared_types_are_checked() {
        assert!(check_content_type("image/jpeg").is_ok());
        assert!(check_content_type("binary/octet-stream").is_ok());
        assert!(matches!(
            check_content_type("image/svg+xml"),
            Err(CoverError::NotAnImage(_))
        ));
        assert!(matches!(
            check_content_type("image/avif"),
            Err(CoverError::NotAnImage(_))
        ));
        assert!(matches!(
            image_from_bytes(b"{}".to_vec(), Some("application/json"), None),
            Err(CoverError::NotAnImage(_))
        ));
    }
}
