use crate::application::ports::pending_queue::PendingQueue;
use crate::domain::value_objects::offline::IdentityScope;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    SignIn,
    SignOut,
}

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub stage: SessionStage,
    pub scope: IdentityScope,
}

impl SessionEvent {
    pub fn new(stage: SessionStage, scope: IdentityScope) -> Self {
        Self { stage, scope }
    }

    pub fn sign_in(scope: IdentityScope) -> Self {
        Self::new(SessionStage::SignIn, scope)
    }

    pub fn sign_out(scope: IdentityScope) -> Self {
        Self::new(SessionStage::SignOut, scope)
    }
}

/// Binds queue storage to the authenticated identity and purges it on sign-out.
pub struct SessionLifecycle {
    queue: Arc<dyn PendingQueue>,
    active: RwLock<Option<IdentityScope>>,
}

impl SessionLifecycle {
    pub fn new(queue: Arc<dyn PendingQueue>) -> Self {
        Self {
            queue,
            active: RwLock::new(None),
        }
    }

    pub async fn handle(&self, event: SessionEvent) -> Result<(), AppError> {
        match event.stage {
            SessionStage::SignIn => self.on_sign_in(event.scope).await,
            SessionStage::SignOut => self.on_sign_out(&event.scope).await.map(|_| ()),
        }
    }

    /// Records `scope` as active. A different scope still signed in is purged first.
    pub async fn on_sign_in(&self, scope: IdentityScope) -> Result<(), AppError> {
        let mut active = self.active.write().await;
        if let Some(previous) = active.as_ref().filter(|previous| *previous != &scope) {
            let removed = self.queue.purge_identity(previous).await?;
            info!(
                target: "offline::session",
                previous = %previous,
                removed,
                "purged previous identity before switching"
            );
        }
        debug!(target: "offline::session", identity = %scope, "identity signed in");
        *active = Some(scope);
        Ok(())
    }

    /// Deletes every queue key owned by `scope`. Returns the number of entries removed.
    ///
    /// The active scope is released only after the purge succeeds.
    pub async fn on_sign_out(&self, scope: &IdentityScope) -> Result<u64, AppError> {
        let mut active = self.active.write().await;
        let removed = self.queue.purge_identity(scope).await?;
        if active.as_ref() == Some(scope) {
            *active = None;
        }
        info!(
            target: "offline::session",
            identity = %scope,
            removed,
            "identity signed out, local queues purged"
        );
        Ok(removed)
    }

    pub async fn active_scope(&self) -> Option<IdentityScope> {
        self.active.read().await.clone()
    }

    pub async fn require_scope(&self) -> Result<IdentityScope, AppError> {
        self.active_scope()
            .await
            .ok_or_else(|| AppError::Unauthorized("No signed-in identity".to_string()))
    }
}
