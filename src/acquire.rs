//! Stateful portal client: per-lookup token bootstrap, challenge solving,
//! submission, and outcome classification with bounded retries.
//!
//! Both the session token and a solved challenge are valid for exactly one
//! submission, so every retry restarts from the token fetch. The portal also
//! rate-limits aggressively; a minimum spacing is enforced across every
//! outbound request the session issues, independent of retry backoff.

use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, REFERER};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::challenge::{ChallengeSolver, CHALLENGE_MIN_LENGTH};
use crate::error::{AcquireError, TransientError};
use crate::extract::{extract_case_details, ExtractOutcome, CASE_NOT_FOUND_MARKER};
use crate::model::{CaseRecord, Cnr};

pub const DEFAULT_BASE_URL: &str = "https://services.ecourts.gov.in/ecourtindia_v6/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const CHALLENGE_PATH: &str = "vendor/securimage/securimage_show.php";
const SEARCH_QUERY: &str = "?p=cnr_status/searchByCNR";

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const MIN_REQUEST_SPACING: Duration = Duration::from_millis(500);

/// Terminal result of one lookup: the candidate either has a record or the
/// portal explicitly reported it does not exist.
#[derive(Debug)]
pub enum LookupOutcome {
    Record(Box<CaseRecord>),
    NotFound,
}

/// Seam between the coordinator and the portal, so coordinator tests run
/// against a scripted double instead of the network.
pub trait CaseLookup {
    fn lookup(&mut self, cnr: &Cnr) -> Result<LookupOutcome, AcquireError>;
}

pub struct AcquisitionSession {
    client: Client,
    base_url: String,
    solver: Box<dyn ChallengeSolver>,
    last_request_at: Option<Instant>,
}

impl AcquisitionSession {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        solver: Box<dyn ChallengeSolver>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("failed to build portal http client")?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(Self {
            client,
            base_url,
            solver,
            last_request_at: None,
        })
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_request_at {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_SPACING {
                thread::sleep(MIN_REQUEST_SPACING - elapsed);
            }
        }
        self.last_request_at = Some(Instant::now());
    }

    fn fetch_token(&mut self) -> Result<String, TransientError> {
        self.pace();
        let response = self.client.get(&self.base_url).send()?;
        if !response.status().is_success() {
            return Err(TransientError::Status(response.status()));
        }
        let body = response.text()?;
        extract_app_token(&body).ok_or(TransientError::TokenMissing)
    }

    fn fetch_challenge(&mut self) -> Result<Vec<u8>, TransientError> {
        self.pace();
        let url = format!("{}{}", self.base_url, CHALLENGE_PATH);
        let response = self
            .client
            .post(&url)
            .header(REFERER, self.base_url.clone())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransientError::ChallengeFetch(format!("HTTP {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(TransientError::ChallengeFetch(format!(
                "unexpected content type {content_type:?}"
            )));
        }

        Ok(response.bytes()?.to_vec())
    }

    fn solve_challenge(&mut self, image: &[u8]) -> Result<String, TransientError> {
        match self.solver.solve(image) {
            Ok(Some(answer)) if answer.len() >= CHALLENGE_MIN_LENGTH => Ok(answer),
            Ok(_) => Err(TransientError::ChallengeUnsolved),
            Err(error) => {
                warn!(error = %error, "challenge solver failed");
                Err(TransientError::ChallengeUnsolved)
            }
        }
    }

    fn submit(
        &mut self,
        cnr: &Cnr,
        answer: &str,
        token: &str,
    ) -> Result<Value, TransientError> {
        self.pace();
        let url = format!("{}{}", self.base_url, SEARCH_QUERY);
        let response = self
            .client
            .post(&url)
            .header(REFERER, url.clone())
            .form(&[
                ("cino", cnr.as_str()),
                ("fcaptcha_code", answer),
                ("ajax_req", "true"),
                ("app_token", token),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransientError::Status(status));
        }

        Ok(response.json::<Value>()?)
    }

    fn attempt(&mut self, cnr: &Cnr) -> Result<LookupOutcome, TransientError> {
        let token = self.fetch_token()?;
        debug!(cnr = %cnr, "session token acquired");

        let image = self.fetch_challenge()?;
        let answer = self.solve_challenge(&image)?;
        debug!(cnr = %cnr, length = answer.len(), "challenge solved");

        let envelope = self.submit(cnr, &answer, &token)?;
        classify_envelope(cnr, &envelope)
    }
}

impl CaseLookup for AcquisitionSession {
    fn lookup(&mut self, cnr: &Cnr) -> Result<LookupOutcome, AcquireError> {
        let mut malformed_only = true;
        let mut attempt = 0;

        loop {
            attempt += 1;
            info!(cnr = %cnr, attempt, max_attempts = MAX_ATTEMPTS, "starting lookup attempt");

            match self.attempt(cnr) {
                Ok(LookupOutcome::Record(record)) => {
                    info!(cnr = %cnr, attempt, "case record acquired");
                    return Ok(LookupOutcome::Record(record));
                }
                Ok(LookupOutcome::NotFound) => {
                    info!(cnr = %cnr, attempt, "portal reports no such case");
                    return Ok(LookupOutcome::NotFound);
                }
                Err(error) => {
                    warn!(cnr = %cnr, attempt, error = %error, "lookup attempt failed");
                    if !error.is_malformed_page() {
                        malformed_only = false;
                    }
                    if attempt >= MAX_ATTEMPTS {
                        return Err(if malformed_only {
                            AcquireError::MalformedPage {
                                cnr: cnr.to_string(),
                                reason: error.to_string(),
                            }
                        } else {
                            AcquireError::Exhausted {
                                cnr: cnr.to_string(),
                                attempts: attempt,
                                last: error,
                            }
                        });
                    }
                    thread::sleep(RETRY_DELAY);
                }
            }
        }
    }
}

/// Classify the portal's JSON envelope. An `errormsg` field means the token
/// or challenge answer was rejected and the whole bootstrap must restart;
/// the explicit not-found marker is the only terminal not-found signal.
fn classify_envelope(cnr: &Cnr, envelope: &Value) -> Result<LookupOutcome, TransientError> {
    if let Some(message) = envelope.get("errormsg") {
        let rendered = message.as_str().unwrap_or_default().trim().to_string();
        let rendered = if rendered.is_empty() {
            "unspecified portal error".to_string()
        } else {
            rendered
        };
        return Err(TransientError::Rejected(rendered));
    }

    let fragment = envelope
        .get("casetype_list")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if fragment.contains(CASE_NOT_FOUND_MARKER) {
        return Ok(LookupOutcome::NotFound);
    }

    match extract_case_details(fragment) {
        ExtractOutcome::Record(mut record) => {
            if record.cnr.is_empty() {
                record.cnr = cnr.to_string();
            }
            Ok(LookupOutcome::Record(record))
        }
        ExtractOutcome::NotFound => Err(TransientError::MalformedPage(
            "extractor saw no details without the terminal marker".to_string(),
        )),
        ExtractOutcome::Malformed { reason } => Err(TransientError::MalformedPage(reason)),
    }
}

fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r#"(?:"app_token"\s*:\s*"|app_token=|name=["']app_token["'][^>]*value=["'])([0-9A-Za-z]{16,})"#,
        )
        .expect("app token regex")
    })
}

fn extract_app_token(body: &str) -> Option<String> {
    token_regex()
        .captures(body)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cnr() -> Cnr {
        Cnr::parse("KLKN220000012019").unwrap()
    }

    #[test]
    fn token_extracted_from_json_and_url_and_input_forms() {
        let token = "2469950d4e388c4e0f8f5a24725a8817";
        let json_body = format!(r#"var data = {{"app_token":"{token}"}};"#);
        let url_body = format!(r#"<a href="/?p=help&app_token={token}">help</a>"#);
        let input_body = format!(r#"<input type="hidden" name="app_token" value="{token}">"#);

        assert_eq!(extract_app_token(&json_body).as_deref(), Some(token));
        assert_eq!(extract_app_token(&url_body).as_deref(), Some(token));
        assert_eq!(extract_app_token(&input_body).as_deref(), Some(token));
        assert!(extract_app_token("<html>no token here</html>").is_none());
    }

    #[test]
    fn errormsg_field_classifies_as_rejected() {
        let envelope = json!({"errormsg": "Invalid Captcha"});
        let error = classify_envelope(&cnr(), &envelope).unwrap_err();
        assert!(matches!(error, TransientError::Rejected(message) if message == "Invalid Captcha"));
    }

    #[test]
    fn not_found_marker_in_fragment_is_terminal() {
        let envelope = json!({
            "casetype_list": format!("<span>{CASE_NOT_FOUND_MARKER}</span>")
        });
        assert!(matches!(
            classify_envelope(&cnr(), &envelope),
            Ok(LookupOutcome::NotFound)
        ));
    }

    #[test]
    fn fragment_without_structure_is_a_malformed_page() {
        let envelope = json!({"casetype_list": "<div>nothing recognizable</div>"});
        let error = classify_envelope(&cnr(), &envelope).unwrap_err();
        assert!(error.is_malformed_page());
    }

    #[test]
    fn well_formed_fragment_yields_record_with_cnr_backfill() {
        let envelope = json!({
            "casetype_list": "<div><h3>Case Details</h3>\
                <table class=\"case_details_table\">\
                <tr><td>Case Type</td><td>OP - ORIGINAL PETITION</td></tr>\
                </table></div>"
        });
        let Ok(LookupOutcome::Record(record)) = classify_envelope(&cnr(), &envelope) else {
            panic!("expected record");
        };
        assert_eq!(record.cnr, "KLKN220000012019");
        assert_eq!(record.case_type.as_deref(), Some("OP - ORIGINAL PETITION"));
    }
}
