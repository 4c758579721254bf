//! HTTP `date` header value management.
//!
//! Formatting an HTTP date per response is wasted work under load; this
//! service formats one in the background on a fixed interval and hands out
//! the cached value.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use bytes::Bytes;
use http::HeaderValue;
use once_cell::sync::Lazy;

/// Maintains the current HTTP date string, refreshed by a background task.
pub struct DateService {
    current: Arc<ArcSwap<Bytes>>,
    handle: tokio::task::JoinHandle<()>,
}

static DATE_SERVICE: Lazy<DateService> = Lazy::new(|| DateService::new_with_update_interval(Duration::from_millis(800)));

impl DateService {
    /// The shared instance.
    ///
    /// First use must happen inside a tokio runtime: the refresh task is
    /// spawned lazily.
    pub fn global() -> &'static DateService {
        &DATE_SERVICE
    }

    fn new_with_update_interval(update_interval: Duration) -> Self {
        let current = Arc::new(ArcSwap::from_pointee(format_date()));
        let current_arc = Arc::clone(&current);

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(update_interval).await;
                current_arc.store(Arc::new(format_date()));
            }
        });

        DateService { current, handle }
    }

    /// Hands the current date to `f` as a ready-made header value.
    pub(crate) fn with_http_date<F>(&self, mut f: F)
    where
        F: FnMut(HeaderValue),
    {
        let date = self.current.load().as_ref().clone();
        if let Ok(value) = HeaderValue::from_maybe_shared(date) {
            f(value);
        }
    }
}

fn format_date() -> Bytes {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    Bytes::from_owner(buf)
}

impl Drop for DateService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hands_out_a_valid_header_value() {
        let mut seen = None;
        DateService::global().with_http_date(|value| seen = Some(value));

        let value = seen.expect("a date value is always available");
        // IMF-fixdate is 29 bytes, e.g. `Thu, 07 Aug 2026 00:00:00 GMT`
        assert_eq!(value.as_bytes().len(), 29);
        assert!(value.as_bytes().ends_with(b"GMT"));
    }
}
