use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries an async request while it fails with a connection or timeout error
///
/// # Parameters
/// - `label`: Name of the request, used in log output
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful response or the last error. Errors that retrying
/// can't fix (e.g. an invalid URL) are returned immediately.
pub async fn with_retry<F, Fut, T>(
    label: &str,
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                let transient = err.is_connect() || err.is_timeout() || err.is_request();
                if !transient || attempt > retries {
                    return Err(err);
                }
                debug!(
                    "{} attempt {}/{} failed: {}. Retrying...",
                    label, attempt, retries, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let attempts = AtomicUsize::new(0);
        let client = reqwest::Client::new();

        // Nothing listens on port 9 locally, so every attempt fails to connect
        let result = with_retry(
            "discard",
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                client.get("http://127.0.0.1:9/").send()
            },
            2,
            1,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_first_success() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = server.uri();
        let response = with_retry("ok", || client.get(&url).send(), 3, 1)
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
}
