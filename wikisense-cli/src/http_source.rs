//! HTTP page source
//!
//! Downloads printable dictionary pages. Pages that come back with an error
//! status still carry markup (a missing word renders a "no entry" page with
//! language suggestions), so their bodies are returned like any other page.

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, warn};
use wikisense_core::config::expand_page_url;
use wikisense_core::{PageSource, ParseError};

const MAX_ATTEMPTS: u32 = 3;
const USER_AGENT: &str = concat!("wikisense/", env!("CARGO_PKG_VERSION"));

pub struct HttpPageSource {
    agent: ureq::Agent,
    url_template: String,
}

impl HttpPageSource {
    /// `url_template` takes `{lang}` and `{word}` placeholders.
    pub fn new(url_template: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            url_template: url_template.to_string(),
        }
    }

    fn request(&self, url: &str, old_id: Option<u64>) -> Result<String, ureq::Error> {
        let mut request = self.agent.get(url);
        if let Some(id) = old_id {
            request = request.query("oldid", &id.to_string());
        }
        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                debug!("{} answered {}, keeping the body", url, code);
                response
            }
            Err(err) => return Err(err),
        };
        response.into_string().map_err(ureq::Error::from)
    }
}

impl PageSource for HttpPageSource {
    fn fetch_markup(&self, word: &str, language_code: &str, old_id: Option<u64>) -> Result<String> {
        let url = expand_page_url(&self.url_template, language_code, word);
        let mut attempt = 1;
        loop {
            debug!("GET {} (attempt {})", url, attempt);
            match self.request(&url, old_id) {
                Ok(markup) => return Ok(markup),
                Err(err) if attempt < MAX_ATTEMPTS => {
                    warn!("Fetching '{}' failed, retrying: {}", word, err);
                    attempt += 1;
                }
                Err(err) => {
                    let error = ParseError::Fetch {
                        word: word.to_string(),
                        message: err.to_string(),
                    };
                    return Err(anyhow::Error::new(error).context(format!("GET {url}")));
                }
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
