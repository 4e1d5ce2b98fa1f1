//! Spam/ham decisions for individual comments.
//!
//! Classification fails open: whatever goes wrong talking to the reputation
//! service, the comment ends up in [`ClassificationState::CheckFailed`] with
//! `checked == false` so it can be retried or reviewed, and the caller never
//! sees an error.

use std::sync::Arc;

use marginalia_core::Environment;
use marginalia_types::{ClassificationState, Comment};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::client::{CommentParams, ReputationError};
use crate::manager::ClientManager;
use crate::store::{CommentStore, StoreError};

/// Outcome of one classification attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub state: ClassificationState,
    pub reason: String,
}

impl ClassificationResult {
    fn new(state: ClassificationState, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: reason.into(),
        }
    }
}

pub struct CommentClassifier {
    manager: Arc<ClientManager>,
    environment: Environment,
}

impl CommentClassifier {
    pub fn new(manager: Arc<ClientManager>, environment: Environment) -> Self {
        Self {
            manager,
            environment,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Decide whether `comment` is spam and record the answer on it.
    ///
    /// Outside production nothing is sent and the comment is treated as ham
    /// without being marked checked.
    pub async fn classify(&self, comment: &mut Comment) -> ClassificationResult {
        if comment.is_spam() {
            return ClassificationResult::new(
                ClassificationState::Spam,
                "already reported as spam",
            );
        }

        if !self.environment.is_production() {
            comment.state = ClassificationState::Ham;
            return ClassificationResult::new(
                ClassificationState::Ham,
                "skipped outside production",
            );
        }

        let params = CommentParams::from_comment(comment);
        match self.check(&params).await {
            Ok(spam) => {
                let state = if spam {
                    ClassificationState::Spam
                } else {
                    ClassificationState::Ham
                };
                comment.state = state;
                comment.checked = true;
                info!(author = comment.author(), %state, "comment classified");
                ClassificationResult::new(state, "reputation service verdict")
            }
            Err(err) => {
                error!(
                    permalink = %comment.entry_permalink,
                    error = %err,
                    "comment check failed"
                );
                comment.state = ClassificationState::CheckFailed;
                comment.checked = false;
                ClassificationResult::new(ClassificationState::CheckFailed, err.to_string())
            }
        }
    }

    /// Classify, then persist the comment
    pub async fn classify_and_save(
        &self,
        comment: &mut Comment,
        store: &dyn CommentStore,
    ) -> Result<ClassificationResult, StoreError> {
        let result = self.classify(comment).await;
        store.save(comment)?;
        Ok(result)
    }

    /// Mark `comment` as spam, tell the service about it, and persist it.
    ///
    /// A failed submission is logged; the comment is saved as spam anyway.
    pub async fn report_spam(
        &self,
        comment: &mut Comment,
        store: &dyn CommentStore,
    ) -> Result<(), StoreError> {
        comment.state = ClassificationState::Spam;

        let params = CommentParams::from_comment(comment);
        if let Err(err) = self.submit_spam(&params).await {
            warn!(
                permalink = %comment.entry_permalink,
                error = %err,
                "spam report was not delivered"
            );
        }

        store.save(comment)
    }

    /// Ask the service whether the configured key is accepted
    pub async fn verify_key(&self) -> Result<bool, ReputationError> {
        let handle = self.manager.current().await?;
        handle.client().verify_key().await
    }

    async fn check(&self, params: &CommentParams) -> Result<bool, ReputationError> {
        let handle = self.manager.current().await?;
        handle.client().check(params).await
    }

    async fn submit_spam(&self, params: &CommentParams) -> Result<(), ReputationError> {
        let handle = self.manager.current().await?;
        handle.client().submit_spam(params).await
    }
}
