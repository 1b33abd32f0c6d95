use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::mpsc;

use getufit_api::{ApiError, CoachClient, PdfResponse, RetrievalClient};
use getufit_config::Config;
use getufit_core::chat::{self, ChatFlow, SendRejection};
use getufit_core::{fence, FitnessPlan, SessionRecord, UserProfile};
use getufit_session::{FileSessionStore, SessionStore};

use crate::form::OnboardingForm;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// Top-level views, in navigation-bar order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Onboarding,
    Plan,
    Chat,
    OwnBot,
    Files,
}

/// Transient, dismissible user notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    pub created: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
}

/// Completions reported back by spawned request tasks.
///
/// Every mount-scoped completion carries the generation of the view mount
/// that issued it; the app discards events whose generation no longer
/// matches, so a late response can never touch a newer mount's state.
#[derive(Debug)]
pub enum AppEvent {
    OnboardDone {
        generation: u64,
        result: Result<SessionRecord, ApiError>,
    },
    PlanLoaded {
        generation: u64,
        result: Result<(FitnessPlan, Value), ApiError>,
    },
    IngestDone {
        generation: u64,
        result: Result<(), ApiError>,
    },
    CoachReplied {
        generation: u64,
        result: Result<Option<String>, ApiError>,
    },
    PersonalReplied {
        generation: u64,
        result: Result<Option<String>, ApiError>,
    },
    PdfReady {
        generation: u64,
        result: Result<PdfResponse, ApiError>,
    },
}

/// Onboarding view: the form plus the Submitting flag that disables
/// repeat submission
#[derive(Debug, Default)]
pub struct OnboardingView {
    pub form: OnboardingForm,
    pub submitting: bool,
    pub generation: u64,
}

/// Plan view state for one mount
#[derive(Debug, Default)]
pub struct PlanView {
    pub loading: bool,
    pub plan: Option<FitnessPlan>,
    pub scroll: u16,
    pub generation: u64,
}

/// Chat view state for one mount (general and personal share the shape)
#[derive(Debug, Default)]
pub struct ChatView {
    pub flow: ChatFlow,
    pub input: String,
    pub scroll: u16,
    pub generation: u64,
}

/// File-export view state for one mount
#[derive(Debug, Default)]
pub struct FilesView {
    pub loading: bool,
    pub file_url: Option<String>,
    pub generation: u64,
}

pub struct App {
    pub coach: CoachClient,
    pub retrieval: RetrievalClient,
    pub store: FileSessionStore,
    pub session: Option<SessionRecord>,
    pub view: View,
    pub onboarding: OnboardingView,
    pub plan: PlanView,
    pub chat: ChatView,
    pub own_bot: ChatView,
    pub files: FilesView,
    pub toasts: VecDeque<Toast>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.services.timeout_seconds);
        let coach = CoachClient::with_timeout(&config.services.coach_url, timeout)?;
        let retrieval = RetrievalClient::with_timeout(&config.services.retrieval_url, timeout)?;

        let data_dir = config
            .storage
            .path
            .as_deref()
            .and_then(getufit_config::expand_tilde)
            .unwrap_or_else(getufit_session::default_data_dir);
        let store = FileSessionStore::new(data_dir);
        let session = store.read().await?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            coach,
            retrieval,
            store,
            session,
            view: View::Onboarding,
            onboarding: OnboardingView::default(),
            plan: PlanView::default(),
            chat: ChatView::default(),
            own_bot: ChatView::default(),
            files: FilesView::default(),
            toasts: VecDeque::new(),
            event_tx,
            event_rx,
        };

        // Returning users land on their plan; everyone else onboards first.
        if app.session.is_some() {
            app.navigate(View::Plan);
        }
        Ok(app)
    }

    // ---- navigation ----

    /// Switch views. Entering a view is a fresh mount: the previous mount's
    /// state is discarded and its generation retired.
    pub fn navigate(&mut self, view: View) {
        self.view = view;
        match view {
            View::Onboarding => {
                self.onboarding = OnboardingView {
                    generation: self.onboarding.generation + 1,
                    ..Default::default()
                };
            }
            View::Plan => self.mount_plan(),
            View::Chat => {
                self.chat = ChatView {
                    generation: self.chat.generation + 1,
                    ..Default::default()
                };
            }
            View::OwnBot => {
                self.own_bot = ChatView {
                    generation: self.own_bot.generation + 1,
                    ..Default::default()
                };
            }
            View::Files => self.mount_files(),
        }
    }

    fn mount_plan(&mut self) {
        self.plan = PlanView {
            generation: self.plan.generation + 1,
            ..Default::default()
        };

        let Some(user_id) = self.session.as_ref().map(|s| s.user_id().to_string()) else {
            self.toast_error("User not found. Please onboard again.");
            self.navigate(View::Onboarding);
            return;
        };

        self.plan.loading = true;
        let coach = self.coach.clone();
        let tx = self.event_tx.clone();
        let generation = self.plan.generation;
        tokio::spawn(async move {
            let result = fetch_plan(&coach, &user_id).await;
            let _ = tx.send(AppEvent::PlanLoaded { generation, result });
        });
    }

    fn mount_files(&mut self) {
        self.files = FilesView {
            generation: self.files.generation + 1,
            ..Default::default()
        };

        // No session: warn and show the absent-file state, no fetch.
        let Some(user_id) = self.session.as_ref().map(|s| s.user_id().to_string()) else {
            self.toast_warning("User not found. Please onboard again.");
            return;
        };

        self.files.loading = true;
        let coach = self.coach.clone();
        let tx = self.event_tx.clone();
        let generation = self.files.generation;
        tokio::spawn(async move {
            let result = coach.generate_pdf(&user_id).await;
            let _ = tx.send(AppEvent::PdfReady { generation, result });
        });
    }

    // ---- onboarding ----

    pub fn submit_onboarding(&mut self) {
        if self.onboarding.submitting {
            return;
        }
        let profile = match self.onboarding.form.to_profile() {
            Ok(profile) => profile,
            Err(message) => {
                self.toast_warning(message);
                return;
            }
        };

        self.onboarding.submitting = true;
        self.spawn_onboard(profile);
    }

    fn spawn_onboard(&self, profile: UserProfile) {
        let coach = self.coach.clone();
        let tx = self.event_tx.clone();
        let generation = self.onboarding.generation;
        tokio::spawn(async move {
            let result = coach.onboard(&profile).await;
            let _ = tx.send(AppEvent::OnboardDone { generation, result });
        });
    }

    // ---- chat ----

    pub fn send_chat(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user_id().to_string()) else {
            self.toast_warning("User not found. Please onboard again.");
            return;
        };

        let text = self.chat.input.clone();
        match self.chat.flow.begin_send(&text) {
            Ok(()) => {
                self.chat.input.clear();
                let query = chat::coach_query(&text);
                let coach = self.coach.clone();
                let tx = self.event_tx.clone();
                let generation = self.chat.generation;
                tokio::spawn(async move {
                    let result = coach
                        .chat(&user_id, &query)
                        .await
                        .map(|reply| reply.response);
                    let _ = tx.send(AppEvent::CoachReplied { generation, result });
                });
            }
            Err(SendRejection::EmptyMessage) => self.toast_warning("Please type a message!"),
            Err(SendRejection::AwaitingReply) => {}
        }
    }

    pub fn send_own_bot(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user_id().to_string()) else {
            self.toast_warning("User not found. Please onboard again.");
            return;
        };

        let text = self.own_bot.input.clone();
        match self.own_bot.flow.begin_send(&text) {
            Ok(()) => {
                self.own_bot.input.clear();
                let retrieval = self.retrieval.clone();
                let tx = self.event_tx.clone();
                let generation = self.own_bot.generation;
                tokio::spawn(async move {
                    let result = retrieval
                        .chat(&user_id, &text)
                        .await
                        .map(|reply| reply.response);
                    let _ = tx.send(AppEvent::PersonalReplied { generation, result });
                });
            }
            Err(SendRejection::EmptyMessage) => self.toast_warning("Please type a message!"),
            Err(SendRejection::AwaitingReply) => {}
        }
    }

    // ---- event processing ----

    /// Drain completions from spawned request tasks. Called from the draw
    /// loop on every iteration.
    pub async fn process_events(&mut self) {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        for event in events {
            self.handle_event(event).await;
        }
    }

    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::OnboardDone { generation, result } => {
                if self.view != View::Onboarding || generation != self.onboarding.generation {
                    log::debug!("Dropping stale onboarding response");
                    return;
                }
                self.onboarding.submitting = false;
                match result {
                    Ok(record) => {
                        if let Err(e) = self.store.write(&record).await {
                            log::error!("Failed to persist session record: {}", e);
                            self.toast_error("Failed to save your profile. Please try again.");
                            return;
                        }
                        self.session = Some(record);
                        self.toast_success("User onboarded successfully!");
                        self.navigate(View::Plan);
                    }
                    Err(e) => {
                        log::error!("Onboarding failed: {}", e);
                        self.toast_error(e.user_message());
                    }
                }
            }

            AppEvent::PlanLoaded { generation, result } => {
                if self.view != View::Plan || generation != self.plan.generation {
                    log::debug!("Dropping stale plan response");
                    return;
                }
                self.plan.loading = false;
                match result {
                    Ok((plan, raw)) => {
                        self.plan.plan = Some(plan);
                        self.spawn_ingest(raw, generation);
                    }
                    Err(e) => {
                        log::error!("Failed to load fitness plan: {}", e);
                        self.toast_error(e.user_message());
                    }
                }
            }

            AppEvent::IngestDone { generation, result } => {
                // Fire-and-forget side channel: never touches plan state,
                // only reports its own outcome for the owning mount.
                if self.view != View::Plan || generation != self.plan.generation {
                    log::debug!("Dropping stale ingestion result");
                    return;
                }
                match result {
                    Ok(()) => self.toast_success("Data added successfully!"),
                    Err(e) => {
                        log::error!("Plan ingestion failed: {}", e);
                        self.toast_error("Error adding data");
                    }
                }
            }

            AppEvent::CoachReplied { generation, result } => {
                if self.view != View::Chat || generation != self.chat.generation {
                    log::debug!("Dropping stale coach reply");
                    return;
                }
                match result {
                    Ok(Some(text)) => self.chat.flow.accept_reply(text),
                    Ok(None) | Err(_) => {
                        self.chat.flow.fail();
                        self.toast_error("Error sending message. Please try again.");
                    }
                }
            }

            AppEvent::PersonalReplied { generation, result } => {
                if self.view != View::OwnBot || generation != self.own_bot.generation {
                    log::debug!("Dropping stale personal-bot reply");
                    return;
                }
                match result {
                    Ok(Some(text)) => {
                        let rendered = chat::render_personal_reply(&text);
                        self.own_bot.flow.accept_reply(rendered);
                    }
                    Ok(None) => self.own_bot.flow.accept_reply(chat::MISSING_REPLY),
                    Err(e) => {
                        log::error!("Personal bot request failed: {}", e);
                        self.own_bot.flow.fail();
                        self.toast_error("Error sending message. Please try again.");
                    }
                }
            }

            AppEvent::PdfReady { generation, result } => {
                if self.view != View::Files || generation != self.files.generation {
                    log::debug!("Dropping stale PDF response");
                    return;
                }
                self.files.loading = false;
                match result {
                    Ok(pdf) => {
                        self.files.file_url = Some(pdf.pdf_url);
                        self.toast_success("File fetched successfully!");
                    }
                    Err(e) => {
                        log::error!("PDF export failed: {}", e);
                        self.toast_error(e.user_message());
                    }
                }
            }
        }
    }

    fn spawn_ingest(&self, document: Value, generation: u64) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user_id().to_string()) else {
            return;
        };
        let retrieval = self.retrieval.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = retrieval.ingest(&user_id, document).await;
            let _ = tx.send(AppEvent::IngestDone { generation, result });
        });
    }

    // ---- toasts ----

    pub fn toast_success(&mut self, text: impl Into<String>) {
        self.push_toast(ToastKind::Success, text.into());
    }

    pub fn toast_error(&mut self, text: impl Into<String>) {
        self.push_toast(ToastKind::Error, text.into());
    }

    pub fn toast_warning(&mut self, text: impl Into<String>) {
        self.push_toast(ToastKind::Warning, text.into());
    }

    fn push_toast(&mut self, kind: ToastKind, text: String) {
        self.toasts.push_back(Toast {
            kind,
            text,
            created: Instant::now(),
        });
        while self.toasts.len() > 3 {
            self.toasts.pop_front();
        }
    }

    /// Expire old toasts; called on every tick
    pub fn on_tick(&mut self) {
        self.toasts.retain(|t| t.created.elapsed() < TOAST_TTL);
    }

    // ---- input plumbing ----

    pub fn active_chat_mut(&mut self) -> Option<&mut ChatView> {
        match self.view {
            View::Chat => Some(&mut self.chat),
            View::OwnBot => Some(&mut self.own_bot),
            _ => None,
        }
    }
}

/// Fetch and de-fence the weekly plan.
///
/// Returns both the typed plan (for rendering) and the raw parsed value
/// (forwarded verbatim to ingestion). Any fence or JSON failure maps to a
/// recoverable contract error.
async fn fetch_plan(
    coach: &CoachClient,
    user_id: &str,
) -> Result<(FitnessPlan, Value), ApiError> {
    let response = coach.generate_plan(user_id).await?;
    let raw = fence::parse_fenced_value(&response.raw_ai_response)
        .map_err(|_| ApiError::contract("Failed to load activities"))?;
    let plan: FitnessPlan = serde_json::from_value(raw.clone())
        .map_err(|_| ApiError::contract("Failed to load activities"))?;
    Ok((plan, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use getufit_core::chat::CONNECTION_FALLBACK;
    use getufit_core::Sender;

    async fn test_app() -> (App, tempfile::TempDir) {
        let mut config = Config::default();
        // Unroutable endpoints: spawned requests fail fast and their
        // completions are ignored by the assertions below.
        config.services.coach_url = "http://127.0.0.1:9".to_string();
        config.services.retrieval_url = "http://127.0.0.1:9".to_string();
        let dir = tempfile::tempdir().unwrap();
        config.storage.path = Some(dir.path().to_string_lossy().into_owned());
        (App::new(&config).await.unwrap(), dir)
    }

    fn record(user_id: &str) -> SessionRecord {
        serde_json::from_value(serde_json::json!({
            "user_data": { "user_id": user_id }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_starts_on_onboarding_without_session() {
        let (app, _dir) = test_app().await;
        assert_eq!(app.view, View::Onboarding);
    }

    #[tokio::test]
    async fn test_plan_mount_without_session_redirects() {
        let (mut app, _dir) = test_app().await;
        app.navigate(View::Plan);
        assert_eq!(app.view, View::Onboarding);
        assert!(app.toasts.iter().any(|t| t.kind == ToastKind::Error));
    }

    #[tokio::test]
    async fn test_files_mount_without_session_blocks_fetch() {
        let (mut app, _dir) = test_app().await;
        app.navigate(View::Files);
        assert_eq!(app.view, View::Files);
        assert!(!app.files.loading);
        assert!(app.files.file_url.is_none());
    }

    #[tokio::test]
    async fn test_stale_plan_response_is_discarded() {
        let (mut app, _dir) = test_app().await;
        app.session = Some(record("u-42"));
        app.navigate(View::Plan);
        let old_generation = app.plan.generation;

        // Remount retires the old generation.
        app.navigate(View::Plan);
        app.handle_event(AppEvent::PlanLoaded {
            generation: old_generation,
            result: Ok((FitnessPlan::default(), serde_json::json!({}))),
        })
        .await;

        assert!(app.plan.plan.is_none());
        assert!(app.plan.loading);
    }

    #[tokio::test]
    async fn test_reply_for_unmounted_chat_is_discarded() {
        let (mut app, _dir) = test_app().await;
        app.session = Some(record("u-42"));
        app.navigate(View::Chat);
        app.chat.input = "hello".to_string();
        app.send_chat();
        let generation = app.chat.generation;

        app.navigate(View::Files);
        app.handle_event(AppEvent::CoachReplied {
            generation,
            result: Ok(Some("hi".to_string())),
        })
        .await;

        // Back on chat: fresh mount, empty transcript.
        app.navigate(View::Chat);
        assert!(app.chat.flow.messages().is_empty());
    }

    #[tokio::test]
    async fn test_chat_round_trip_appends_in_order() {
        let (mut app, _dir) = test_app().await;
        app.session = Some(record("u-42"));
        app.navigate(View::Chat);
        app.chat.input = "How many reps for squats?".to_string();
        app.send_chat();
        assert!(app.chat.flow.is_awaiting());
        assert!(app.chat.input.is_empty());

        app.handle_event(AppEvent::CoachReplied {
            generation: app.chat.generation,
            result: Ok(Some("3 sets of 12".to_string())),
        })
        .await;

        let messages = app.chat.flow.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "How many reps for squats?");
        assert_eq!(messages[1].text, "3 sets of 12");
    }

    #[tokio::test]
    async fn test_chat_failure_appends_fallback() {
        let (mut app, _dir) = test_app().await;
        app.session = Some(record("u-42"));
        app.navigate(View::OwnBot);
        app.own_bot.input = "what's my plan?".to_string();
        app.send_own_bot();

        app.handle_event(AppEvent::PersonalReplied {
            generation: app.own_bot.generation,
            result: Err(ApiError::Network("connection refused".to_string())),
        })
        .await;

        let messages = app.own_bot.flow.messages();
        assert_eq!(messages.last().unwrap().text, CONNECTION_FALLBACK);
        assert!(!app.own_bot.flow.is_awaiting());
    }

    #[tokio::test]
    async fn test_onboard_success_persists_and_navigates() {
        let (mut app, _dir) = test_app().await;
        app.onboarding.submitting = true;

        app.handle_event(AppEvent::OnboardDone {
            generation: app.onboarding.generation,
            result: Ok(record("u-42")),
        })
        .await;

        assert_eq!(app.view, View::Plan);
        assert_eq!(app.session.as_ref().unwrap().user_id(), "u-42");
        let persisted = app.store.read().await.unwrap().unwrap();
        assert_eq!(persisted.user_id(), "u-42");
    }

    #[tokio::test]
    async fn test_onboard_failure_keeps_form_state() {
        let (mut app, _dir) = test_app().await;
        app.onboarding.form.user_id = "u-42".to_string();
        app.onboarding.submitting = true;

        app.handle_event(AppEvent::OnboardDone {
            generation: app.onboarding.generation,
            result: Err(ApiError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        })
        .await;

        assert_eq!(app.view, View::Onboarding);
        assert!(!app.onboarding.submitting);
        assert_eq!(app.onboarding.form.user_id, "u-42");
        assert!(app.session.is_none());
        assert!(app.store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_plan_parse_failure_reaches_empty_state() {
        let (mut app, _dir) = test_app().await;
        app.session = Some(record("u-42"));
        app.navigate(View::Plan);

        app.handle_event(AppEvent::PlanLoaded {
            generation: app.plan.generation,
            result: Err(ApiError::contract("Failed to load activities")),
        })
        .await;

        assert!(!app.plan.loading);
        assert!(app.plan.plan.is_none());
        assert!(app.toasts.iter().any(|t| t.kind == ToastKind::Error));
    }
}
