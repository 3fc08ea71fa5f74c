//! Retrying page fetcher that reports failure as "no data".

use crate::amazon::client::PageSource;
use crate::amazon::parser::check_for_errors;
use crate::retry::{retry, RetryPolicy};
use tracing::{debug, warn};

/// Fetches pages through a [`PageSource`], retrying failed attempts.
pub struct Fetcher<'a, S: PageSource + ?Sized> {
    source: &'a S,
    policy: RetryPolicy,
}

impl<'a, S: PageSource + ?Sized> Fetcher<'a, S> {
    /// Creates a fetcher over `source` with the given retry policy.
    pub fn new(source: &'a S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetches `url`, returning `None` once every attempt has failed.
    ///
    /// A 2xx response that turns out to be a CAPTCHA or error page counts as
    /// a failed attempt. `what` names the page in log messages.
    pub async fn fetch(&self, url: &str, what: &str) -> Option<String> {
        let source = self.source;

        let result = retry(&self.policy, what, move || async move {
            let html = source.get(url).await?;
            check_for_errors(&html)?;
            Ok(html)
        })
        .await;

        match result {
            Ok(html) => {
                debug!("Fetched {} ({} bytes)", what, html.len());
                Some(html)
            }
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        }
    }
}
