//! Shared application state handed to every route.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{CredentialStore, JwtManager, TokenVerifier};
use crate::query::PageLimits;
use crate::store::DataStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Backend the resource routes query
    pub store: Arc<dyn DataStore>,

    /// Checks login credentials
    pub credentials: Arc<dyn CredentialStore>,

    /// Signs tokens issued at login
    pub tokens: Arc<JwtManager>,

    /// Checks bearer tokens on protected routes
    pub verifier: Arc<dyn TokenVerifier>,

    pub limits: PageLimits,

    /// Delay before list queries run; zero disables it
    pub list_delay: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DataStore>,
        credentials: Arc<dyn CredentialStore>,
        tokens: JwtManager,
    ) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            store,
            credentials,
            verifier: tokens.clone(),
            tokens,
            limits: PageLimits::default(),
            list_delay: Duration::ZERO,
        }
    }

    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = delay;
        self
    }

    /// Replace the bearer verifier, keeping the login token issuer
    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}
