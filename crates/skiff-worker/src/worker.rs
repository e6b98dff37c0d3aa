//! The worker event surface.

use std::sync::Arc;

use skiff_cache::{
    ActivateReport, CacheLifecycle, CacheStore, InstallError, InstallReport, StoreError,
};
use skiff_core::{ClientHub, Fetch, Request, Response};
use tracing::{debug, info};

use crate::classify::Classifier;
use crate::config::{ConfigError, WorkerConfig};
use crate::fallback::FallbackProvider;
use crate::notify::{resolve_action, NotificationClick};
use crate::strategy::FetchStrategies;

/// A host lifecycle or traffic event, delivered one at a time.
#[derive(Debug)]
pub enum WorkerEvent {
    /// The worker instance is being installed.
    Install,
    /// The worker instance is being activated.
    Activate,
    /// A request was intercepted.
    Fetch(Request),
    /// A notification was clicked.
    NotificationClick(NotificationClick),
}

/// Result of dispatching one event.
#[derive(Debug)]
pub enum EventOutcome {
    /// Install completed.
    Installed(InstallReport),
    /// Activation completed.
    Activated(ActivateReport),
    /// The response for an intercepted request.
    Responded(Response),
    /// The resolved notification action, already broadcast to clients.
    Notified(String),
}

/// Errors surfaced to the host from event dispatch.
///
/// Only lifecycle phases can fail; the fetch and notification paths always
/// produce an outcome.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// Install failed; the host may retry the whole phase later.
    #[error("install failed: {0}")]
    Install(#[from] InstallError),

    /// Activation failed while pruning stale partitions.
    #[error("activation failed: {0}")]
    Activate(#[from] StoreError),
}

/// The caching brain behind a request-intercepting worker.
///
/// Owns the classifier, strategies, fallback, and lifecycle. Every host
/// collaborator is injected at construction; nothing is ambient.
pub struct CacheWorker<S, F, C> {
    store: Arc<S>,
    fetcher: F,
    clients: C,
    classifier: Classifier,
    strategies: FetchStrategies<S>,
    lifecycle: CacheLifecycle,
}

impl<S, F, C> CacheWorker<S, F, C>
where
    S: CacheStore + 'static,
    F: Fetch,
    C: ClientHub,
{
    /// Build a worker from configuration and host collaborators.
    ///
    /// The store is shared because detached cache writes outlive the
    /// requests that spawn them.
    pub fn new(
        config: WorkerConfig,
        store: Arc<S>,
        fetcher: F,
        clients: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let version = config.cache_version()?;
        let classifier = Classifier::from_config(&config)?;
        let fallback = FallbackProvider::from_config(&config)?;
        let lifecycle = CacheLifecycle::new(version, config.offline_resources.clone());
        let strategies =
            FetchStrategies::new(Arc::clone(&store), fallback, lifecycle.resources_partition());

        info!(version = %lifecycle.version(), "worker ready");
        Ok(Self {
            store,
            fetcher,
            clients,
            classifier,
            strategies,
            lifecycle,
        })
    }

    /// The lifecycle manager driving install and activation.
    pub fn lifecycle(&self) -> &CacheLifecycle {
        &self.lifecycle
    }

    /// Populate the offline partition for this version.
    pub async fn handle_install(&self) -> Result<InstallReport, InstallError> {
        self.lifecycle
            .install(self.store.as_ref(), &self.fetcher)
            .await
    }

    /// Claim open clients and prune caches left by other versions.
    pub async fn handle_activate(&self) -> Result<ActivateReport, StoreError> {
        self.lifecycle
            .activate(self.store.as_ref(), &self.clients)
            .await
    }

    /// Answer one intercepted request.
    ///
    /// This never fails: every failure path terminates in a fallback
    /// response.
    pub async fn handle_fetch(&self, request: Request) -> Response {
        let classification = self.classifier.classify(&request);
        debug!(
            method = %request.method(),
            url = %request.url(),
            ?classification,
            "request intercepted"
        );
        self.strategies
            .run(classification, &self.fetcher, &request)
            .await
    }

    /// Resolve a notification click and broadcast the action to every
    /// controlled client. Returns the resolved action.
    pub async fn handle_notification_click(&self, click: NotificationClick) -> String {
        debug!(tag = %click.tag, action = %click.action, "notification clicked");
        let action = resolve_action(&click);
        self.clients.broadcast(&action).await;
        action
    }

    /// Dispatch one host event.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<EventOutcome, WorkerError> {
        match event {
            WorkerEvent::Install => Ok(EventOutcome::Installed(self.handle_install().await?)),
            WorkerEvent::Activate => Ok(EventOutcome::Activated(self.handle_activate().await?)),
            WorkerEvent::Fetch(request) => {
                Ok(EventOutcome::Responded(self.handle_fetch(request).await))
            }
            WorkerEvent::NotificationClick(click) => Ok(EventOutcome::Notified(
                self.handle_notification_click(click).await,
            )),
        }
    }
}
