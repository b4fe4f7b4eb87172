use reqwest::Client;
use std::time::Duration;

/// Build a `reqwest::Client` with a 10 s connect timeout and the given overall timeout.
///
/// Falls back to the default client if the builder fails.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Trim an error body before it goes into a log line or error message.
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
