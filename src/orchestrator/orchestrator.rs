use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio_stream::StreamExt;

use super::catalog::SessionCatalog;
use super::progress::ProgressSimulator;
use super::view::{ActiveView, Ticket};
use crate::core::analysis::{AnalysisOptions, AnalysisResult, QueryOverrides};
use crate::core::config::{AppConfig, ProgressConfig};
use crate::core::error::GatewayError;
use crate::core::gateway::{AnalysisGateway, SessionGateway};
use crate::core::message::{Message, NewMessage};
use crate::core::notifier::Notifier;
use crate::core::session::{Session, SessionSeed};

/// Knobs the orchestrator takes from [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct OrchestratorSettings {
    pub options: AnalysisOptions,
    pub progress: ProgressConfig,
    pub analysis_timeout: Option<Duration>,
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            options: config.analysis.clone(),
            progress: config.progress.clone(),
            analysis_timeout: config.analysis_timeout(),
        }
    }
}

/// What the progress indicator should show right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStatus {
    pub analyzing: bool,
    pub step: usize,
    pub total: usize,
}

/// Result of a `submit_query` call that got as far as having a session.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub session_id: String,
    /// `None` when the analysis itself failed
    pub analysis: Option<AnalysisResult>,
}

pub struct SessionOrchestrator {
    sessions: Arc<dyn SessionGateway>,
    analysis: Arc<dyn AnalysisGateway>,
    notifier: Arc<dyn Notifier>,
    catalog: Arc<SessionCatalog>,
    view: Arc<ActiveView>,
    options: RwLock<AnalysisOptions>,
    progress: ProgressConfig,
    analysis_timeout: Option<Duration>,
    status: watch::Sender<ProgressStatus>,
    /// Id of the latest analysis run; only that run may reset the status.
    progress_run: AtomicU64,
}

impl SessionOrchestrator {
    pub fn new(
        sessions: Arc<dyn SessionGateway>,
        analysis: Arc<dyn AnalysisGateway>,
        notifier: Arc<dyn Notifier>,
        settings: OrchestratorSettings,
    ) -> Self {
        let view = Arc::new(ActiveView::new());
        let catalog = Arc::new(SessionCatalog::new(
            Arc::clone(&sessions),
            Arc::clone(&notifier),
            Arc::clone(&view),
        ));
        let (status, _) = watch::channel(ProgressStatus {
            total: settings.progress.steps.len(),
            ..Default::default()
        });

        Self {
            sessions,
            analysis,
            notifier,
            catalog,
            view,
            options: RwLock::new(settings.options),
            progress: settings.progress,
            analysis_timeout: settings.analysis_timeout,
            status,
            progress_run: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &SessionCatalog {
        &self.catalog
    }

    pub async fn options(&self) -> AnalysisOptions {
        self.options.read().await.clone()
    }

    pub async fn set_options(&self, options: AnalysisOptions) {
        *self.options.write().await = options;
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.view.session().await
    }

    pub async fn current_session_id(&self) -> Option<String> {
        self.view.session_id().await
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.view.messages().await
    }

    pub fn step_labels(&self) -> &[String] {
        &self.progress.steps
    }

    pub fn is_analyzing(&self) -> bool {
        self.status.borrow().analyzing
    }

    pub fn current_step(&self) -> usize {
        self.status.borrow().step
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressStatus> {
        self.status.subscribe()
    }

    /// Leave the current session. Work still in flight for it keeps running
    /// but will no longer write into the visible log.
    pub async fn start_new(&self) {
        self.view.reset().await;
        self.status.send_replace(self.idle_status());
        tracing::debug!("started a new session view");
    }

    /// Replace the view with a session fetched from the backend. On failure
    /// the current view is left as it was.
    pub async fn load(&self, session_id: &str) -> Result<(), GatewayError> {
        match self.sessions.get(session_id).await {
            Ok(detail) => {
                tracing::debug!(session_id, messages = detail.messages.len(), "loaded session");
                if self.view.replace(detail).await {
                    self.status.send_replace(self.idle_status());
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session_id, error = %e, "failed to load session");
                self.notifier.error(&e.user_message("Failed to load session"));
                Err(e)
            }
        }
    }

    pub async fn submit_query(&self, query: &str) -> Option<QueryOutcome> {
        self.submit_query_with(query, QueryOverrides::default()).await
    }

    /// Run one ask-a-question exchange.
    ///
    /// Returns `None` for blank input or when no session could be created.
    /// Every other failure is reported through the notifier and degrades the
    /// outcome instead of aborting it.
    pub async fn submit_query_with(
        &self,
        query: &str,
        overrides: QueryOverrides,
    ) -> Option<QueryOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let options = overrides.apply(self.options().await);

        let (ticket, current) = self.view.begin().await;
        let session = match current {
            Some(session) => session,
            None => self.resolve_session(&ticket, &options).await?,
        };
        let session_id = session.id.clone();
        tracing::info!(session_id = %session_id, generation = ticket.generation, "submitting query");

        let user_msg = Message::optimistic_user(query);
        self.view.append(&ticket, &session_id, user_msg.clone()).await;
        self.persist(&session_id, &user_msg, "Failed to save message").await;

        let analysis = match self.run_analysis(&ticket, &session_id, query, &options).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "analysis failed");
                self.notifier.error(&e.user_message("Analysis failed"));
                self.sync_catalog(&ticket, &session, query, false).await;
                return Some(QueryOutcome {
                    session_id,
                    analysis: None,
                });
            }
        };

        let ai_msg = Message::optimistic_ai(query, &analysis);
        if !self.view.append(&ticket, &session_id, ai_msg.clone()).await {
            tracing::debug!(
                session_id = %session_id,
                generation = ticket.generation,
                "view moved on; result kept off screen"
            );
        }
        self.persist(&session_id, &ai_msg, "Failed to save AI message").await;
        self.sync_catalog(&ticket, &session, query, true).await;

        Some(QueryOutcome {
            session_id,
            analysis: Some(analysis),
        })
    }

    async fn resolve_session(&self, ticket: &Ticket, options: &AnalysisOptions) -> Option<Session> {
        let seed = SessionSeed::from(options);
        match self.sessions.create(&seed).await {
            Ok(session) => {
                if self.view.adopt(ticket, session.clone()).await {
                    tracing::debug!(session_id = %session.id, "created session");
                } else {
                    tracing::debug!(
                        session_id = %session.id,
                        "created session after the view moved on; continuing off screen"
                    );
                }
                Some(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to create session");
                self.notifier.error(&e.user_message("Failed to create session"));
                None
            }
        }
    }

    async fn persist(&self, session_id: &str, message: &Message, fallback: &str) {
        if let Err(e) = self
            .sessions
            .append_message(session_id, &NewMessage::from(message))
            .await
        {
            tracing::warn!(session_id, kind = ?message.kind, error = %e, "message not persisted");
            self.notifier.error(&e.user_message(fallback));
        }
    }

    /// Run the analysis alongside the progress indicator; resolves once both
    /// have finished. Ticks only reach the status while `ticket` is still on
    /// screen, and the closing idle status only when no newer run started.
    async fn run_analysis(
        &self,
        ticket: &Ticket,
        session_id: &str,
        query: &str,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult, GatewayError> {
        let simulator = ProgressSimulator::from_config(&self.progress);
        let total = simulator.total();
        let run = self.progress_run.fetch_add(1, Ordering::SeqCst) + 1;
        if self.view.is_current(ticket, session_id).await {
            self.status.send_replace(ProgressStatus {
                analyzing: true,
                step: 0,
                total,
            });
        }

        let progress = async {
            let mut ticks = simulator.ticks();
            while let Some(tick) = ticks.next().await {
                if !self.owns_progress(run) || !self.view.is_current(ticket, session_id).await {
                    tracing::trace!(session_id, step = tick.step, "stale progress tick dropped");
                    continue;
                }
                self.status.send_replace(ProgressStatus {
                    analyzing: true,
                    step: tick.step,
                    total,
                });
            }
        };
        let ((), result) = tokio::join!(progress, self.analyze(query, options));

        if self.owns_progress(run) {
            self.status.send_replace(self.idle_status());
        }
        result
    }

    fn owns_progress(&self, run: u64) -> bool {
        self.progress_run.load(Ordering::SeqCst) == run
    }

    async fn analyze(
        &self,
        query: &str,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult, GatewayError> {
        let request = self.analysis.analyze(query, options);
        match self.analysis_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or(Err(GatewayError::Timeout(limit.as_secs()))),
            None => request.await,
        }
    }

    async fn sync_catalog(&self, ticket: &Ticket, session: &Session, query: &str, analyzed: bool) {
        self.view
            .record_exchange(ticket, &session.id, query, analyzed)
            .await;
        self.catalog.record_exchange(session, query, analyzed).await;
    }

    fn idle_status(&self) -> ProgressStatus {
        ProgressStatus {
            analyzing: false,
            step: 0,
            total: self.progress.steps.len(),
        }
    }
}
