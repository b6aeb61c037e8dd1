//! Deterministic identity client for tests
//!
//! Always authenticates tokens as `jdoe` in groups `foo` and `bar` and lists a
//! single project, `myproject`. Each operation can be made to fail, and every
//! call is counted so tests can observe when the cache short-circuits.

use async_trait::async_trait;
use rolegate_core::{ClientError, Identity, IdentityClient, PermissionCheck, Resource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const TOKEN: &str = "ignored";

#[derive(Debug, Default)]
pub struct TestIdentityClient {
    token_review_err: Mutex<Option<ClientError>>,
    subject_access_err: Option<ClientError>,
    projects_err: Mutex<Option<ClientError>>,
    /// Per-verb answers; verbs not listed are permitted unless `subject_access_err` is set
    sar_responses: HashMap<String, bool>,
    /// Simulated identity service latency
    latency: Duration,
    token_reviews: AtomicUsize,
    access_reviews: AtomicUsize,
    project_listings: AtomicUsize,
}

impl TestIdentityClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token_review_err(self, err: ClientError) -> Self {
        self.set_token_review_err(Some(err));
        self
    }

    pub fn with_subject_access_err(mut self, err: ClientError) -> Self {
        self.subject_access_err = Some(err);
        self
    }

    pub fn with_projects_err(self, err: ClientError) -> Self {
        self.set_projects_err(Some(err));
        self
    }

    pub fn with_sar_response(mut self, verb: &str, allowed: bool) -> Self {
        self.sar_responses.insert(verb.to_string(), allowed);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make token reviews start or stop failing
    pub fn set_token_review_err(&self, err: Option<ClientError>) {
        *self.token_review_err.lock().unwrap() = err;
    }

    pub fn set_projects_err(&self, err: Option<ClientError>) {
        *self.projects_err.lock().unwrap() = err;
    }

    pub fn token_reviews(&self) -> usize {
        self.token_reviews.load(Ordering::SeqCst)
    }

    pub fn access_reviews(&self) -> usize {
        self.access_reviews.load(Ordering::SeqCst)
    }

    pub fn project_listings(&self) -> usize {
        self.project_listings.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl IdentityClient for TestIdentityClient {
    async fn authenticate_token(&self, _token: &str) -> Result<Identity, ClientError> {
        self.token_reviews.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let err = self.token_review_err.lock().unwrap().clone();
        match err {
            Some(err) => Err(err),
            None => Ok(Identity::new(
                "jdoe",
                vec!["foo".to_string(), "bar".to_string()],
            )),
        }
    }

    async fn check_permission(&self, check: &PermissionCheck) -> Result<bool, ClientError> {
        self.access_reviews.fetch_add(1, Ordering::SeqCst);

        if let Some(allowed) = self.sar_responses.get(&check.verb) {
            return Ok(*allowed);
        }
        match &self.subject_access_err {
            Some(err) => Err(err.clone()),
            None => Ok(true),
        }
    }

    async fn list_accessible_resources(&self, _token: &str) -> Result<Vec<Resource>, ClientError> {
        self.project_listings.fetch_add(1, Ordering::SeqCst);

        let err = self.projects_err.lock().unwrap().clone();
        match err {
            Some(err) => Err(err),
            None => Ok(vec![Resource::new("myproject")]),
        }
    }
}
