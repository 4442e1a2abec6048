//! User-triggered dashboard workflows.
//!
//! Each workflow checks the session, validates local input, shows progress,
//! runs its backend call through the [`ErrorHandler`] and reports success.
//! Failures are surfaced once: validation and sign-in problems here, request
//! failures by the handler.

mod bookings;
mod trainer;

pub use bookings::{is_date_conflict, BOOKING_SAVED, CALENDAR_BOUND};
pub use trainer::{
    PronunciationFeedback, MISSING_TRAINER_INPUT, NO_SENTENCE, SENTENCE_GENERATED, SENTENCE_PLAYING,
    TRAINER_VOICE,
};

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::api::{
    ApiClient, AudioUpload, BookedRange, ChatReply, Credentials, LoginResponse, Transcription, Transfer,
};
use crate::context::AppContext;
use crate::error::ApiError;
use crate::media::{AudioCapture, CaptureError};
use crate::resilience::ErrorHandler;
use crate::ui::{ModalError, ProgressHandle, ProgressMode, ProgressReporter, Severity};
use crate::validation::{validate_file, validate_text, FileCandidate, FileRules, TextRules, ValidationError};

pub const LOGIN_REQUIRED: &str = "Please login or register to use this feature.";
pub const TRANSCRIPTION_DONE: &str = "Transcription completed!";
pub const SYNTHESIS_DONE: &str = "Speech synthesized successfully!";

const TRANSCRIPTION_PROGRESS: &str = "transcription-loading";
const CHAT_PROGRESS: &str = "chat-loading";
const SYNTHESIS_PROGRESS: &str = "tts-loading";

/// A dashboard feature card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Asr,
    Chat,
    Tts,
    Trainer,
}

impl Feature {
    pub const ALL: [Feature; 4] = [Feature::Asr, Feature::Chat, Feature::Tts, Feature::Trainer];

    pub fn modal_id(&self) -> &'static str {
        match self {
            Feature::Asr => "asr-modal",
            Feature::Chat => "chat-modal",
            Feature::Tts => "tts-modal",
            Feature::Trainer => "trainer-modal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feature::Asr => "ASR",
            Feature::Chat => "Chat",
            Feature::Tts => "TTS",
            Feature::Trainer => "Trainer",
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Please login to use {0}")]
    LoginRequired(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Modal(#[from] ModalError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("No sentence to play. Generate one first.")]
    NoSentence,

    #[error("Missing audio or sentence")]
    MissingTrainerInput,

    #[error("Dates are already booked: {requested}")]
    DateConflict {
        /// `check_in → check_out` of the rejected booking.
        requested: String,
        /// Overlapping bookings, empty when the lookup failed.
        booked: Vec<BookedRange>,
    },
}

impl From<ValidationError> for DashboardError {
    fn from(err: ValidationError) -> Self {
        DashboardError::Api(ApiError::Validation(err))
    }
}

/// Workflows bound to one application context.
pub struct Dashboard {
    ctx: AppContext,
    client: ApiClient,
    handler: ErrorHandler,
    conversation_id: Mutex<Option<u64>>,
    trainer_sentence: Mutex<Option<String>>,
}

impl Dashboard {
    pub fn new(ctx: AppContext) -> Result<Self, ApiError> {
        let client = ApiClient::new(&ctx.config.api, ctx.session.clone())?;
        let handler = ctx.error_handler();
        for feature in Feature::ALL {
            ctx.modals.register(feature.modal_id());
        }
        Ok(Self {
            ctx,
            client,
            handler,
            conversation_id: Mutex::new(None),
            trainer_sentence: Mutex::new(None),
        })
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn handler(&self) -> &ErrorHandler {
        &self.handler
    }

    pub fn conversation_id(&self) -> Option<u64> {
        *self.conversation_id.lock().expect("conversation mutex poisoned")
    }

    /// Forget the current conversation so the next message starts a new one.
    pub fn reset_conversation(&self) {
        *self.conversation_id.lock().expect("conversation mutex poisoned") = None;
    }

    /// Open a feature's modal, or send the user to sign in.
    pub fn open_feature(&self, feature: Feature) -> Result<(), DashboardError> {
        if !self.ctx.session.is_authenticated() {
            self.ctx.notifier.notify(LOGIN_REQUIRED, Severity::Error);
            self.ctx.navigator.redirect(&self.ctx.config.api.login_path, Duration::ZERO);
            return Err(DashboardError::LoginRequired(feature.label()));
        }
        self.ctx.modals.open(feature.modal_id())?;
        if feature == Feature::Trainer {
            self.reset_trainer();
        }
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, DashboardError> {
        let client = &self.client;
        client.ensure_csrf().await;
        let response = self.handler.handle_request(move || client.login(credentials)).await?;
        Ok(response)
    }

    pub async fn logout(&self) -> Result<(), DashboardError> {
        let result = self.client.logout().await;
        self.reset_conversation();
        if let Err(error) = &result {
            // The session is cleared either way.
            tracing::warn!(error = %error, "Logout request failed");
        }
        Ok(())
    }

    /// Validate and transcribe an audio file from disk.
    pub async fn transcribe_file(
        &self,
        path: &Path,
        language: Option<&str>,
    ) -> Result<Transcription, DashboardError> {
        self.require_login(Feature::Asr)?;

        let candidate = self.reject_invalid(FileCandidate::from_path(path))?;
        let rules = FileRules::from(&self.ctx.config.upload);
        self.reject_invalid(validate_file(&candidate, &rules))?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ValidationError::Unreadable(format!("Cannot read {}: {}", path.display(), e)));
        let bytes = self.reject_invalid(bytes)?;

        let upload = AudioUpload {
            file_name: candidate.name,
            mime: candidate.mime,
            bytes,
        };
        self.transcribe_upload(&upload, language).await
    }

    /// Transcribe a finished recording.
    pub async fn transcribe_recording(
        &self,
        recorder: &mut dyn AudioCapture,
        language: Option<&str>,
    ) -> Result<Transcription, DashboardError> {
        self.require_login(Feature::Asr)?;

        let upload = match recorder.on_complete() {
            Ok(upload) => upload,
            Err(error) => {
                self.ctx.notifier.notify(&error.to_string(), Severity::Error);
                return Err(error.into());
            }
        };
        self.transcribe_upload(&upload, language).await
    }

    async fn transcribe_upload(
        &self,
        upload: &AudioUpload,
        language: Option<&str>,
    ) -> Result<Transcription, DashboardError> {
        let progress = self.ctx.progress.show(TRANSCRIPTION_PROGRESS, ProgressMode::Indeterminate);

        let client = &self.client;
        let result = self
            .handler
            .handle_request(move || client.transcribe(upload, language))
            .await;
        progress.hide();

        let transcription = result?;
        self.ctx.notifier.notify(TRANSCRIPTION_DONE, Severity::Success);
        tracing::info!(chars = transcription.text.chars().count(), "Transcription received");
        Ok(transcription)
    }

    /// Send a chat message, continuing the current conversation.
    pub async fn send_message(&self, message: &str) -> Result<ChatReply, DashboardError> {
        self.require_login(Feature::Chat)?;

        let message = message.trim();
        let rules = TextRules::from(&self.ctx.config.text).named("Message");
        self.reject_invalid(validate_text(message, &rules))?;

        let conversation_id = self.conversation_id();
        let spinner = self.ctx.progress.show(CHAT_PROGRESS, ProgressMode::Indeterminate);

        let client = &self.client;
        let result = self
            .handler
            .handle_request(move || client.chat(message, conversation_id))
            .await;
        spinner.hide();

        let reply = result?;
        let mut current = self.conversation_id.lock().expect("conversation mutex poisoned");
        if current.is_none() {
            *current = Some(reply.conversation_id);
        }
        Ok(reply)
    }

    /// Synthesize speech for `text`, returning the audio bytes.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<Vec<u8>, DashboardError> {
        self.require_login(Feature::Tts)?;

        let text = text.trim();
        let rules = TextRules::from(&self.ctx.config.text);
        self.reject_invalid(validate_text(text, &rules))?;
        let voice = voice.filter(|v| !v.is_empty());

        let progress = Mutex::new(DownloadProgress::show(self.ctx.progress.clone()));
        let client = &self.client;
        let progress_ref = &progress;
        let result = self
            .handler
            .handle_request(move || {
                client.synthesize(text, voice, move |transfer| {
                    progress_ref
                        .lock()
                        .expect("progress mutex poisoned")
                        .update(transfer)
                })
            })
            .await;
        progress.into_inner().expect("progress mutex poisoned").hide();

        let audio = result?;
        self.ctx.notifier.notify(SYNTHESIS_DONE, Severity::Success);
        Ok(audio)
    }

    fn require_login(&self, feature: Feature) -> Result<(), DashboardError> {
        if self.ctx.session.is_authenticated() {
            return Ok(());
        }
        let err = DashboardError::LoginRequired(feature.label());
        self.ctx.notifier.notify(&err.to_string(), Severity::Error);
        self.ctx.navigator.redirect(&self.ctx.config.api.login_path, Duration::ZERO);
        Err(err)
    }

    /// Notify about a failed local check.
    fn reject_invalid<T>(&self, result: Result<T, ValidationError>) -> Result<T, DashboardError> {
        result.map_err(|err| {
            self.ctx.notifier.notify(&err.to_string(), Severity::Error);
            tracing::debug!(error = %err, "Input rejected");
            err.into()
        })
    }
}

/// Spinner that becomes a percentage bar once the download size is known.
struct DownloadProgress {
    reporter: Arc<dyn ProgressReporter>,
    handle: Box<dyn ProgressHandle>,
    determinate: bool,
}

impl DownloadProgress {
    fn show(reporter: Arc<dyn ProgressReporter>) -> Self {
        let handle = reporter.show(SYNTHESIS_PROGRESS, ProgressMode::Indeterminate);
        Self {
            reporter,
            handle,
            determinate: false,
        }
    }

    fn update(&mut self, transfer: Transfer) {
        let Some(percent) = transfer.percent() else {
            return;
        };
        if !self.determinate {
            let bar = self.reporter.show(SYNTHESIS_PROGRESS, ProgressMode::Determinate);
            std::mem::replace(&mut self.handle, bar).hide();
            self.determinate = true;
        }
        self.handle.update(percent);
    }

    fn hide(self) {
        self.handle.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::context::{Collaborators, Session};
    use crate::media::BufferedRecorder;
    use crate::ui::{DeferredNavigator, LogProgress, NotificationCenter, Notifier};

    struct Harness {
        dashboard: Dashboard,
        notifications: Arc<NotificationCenter>,
        redirects: Arc<Mutex<Vec<String>>>,
    }

    fn harness(token: Option<&str>) -> Harness {
        let notifications = Arc::new(NotificationCenter::new(Duration::from_secs(3600)));
        let redirects = Arc::new(Mutex::new(Vec::new()));
        let sink = redirects.clone();
        let notifier: Arc<dyn Notifier> = notifications.clone();

        let mut config = ClientConfig::default();
        // Nothing listens here; tests below must not reach the network.
        config.api.base_url = "http://127.0.0.1:9".into();

        let session = Arc::new(token.map(Session::with_token).unwrap_or_default());
        let ctx = AppContext::new(
            config,
            Collaborators {
                notifier,
                navigator: Arc::new(DeferredNavigator::new(move |path| {
                    sink.lock().unwrap().push(path.to_string())
                })),
                progress: Arc::new(LogProgress),
            },
        )
        .with_session(session);

        Harness {
            dashboard: Dashboard::new(ctx).unwrap(),
            notifications,
            redirects,
        }
    }

    #[test]
    fn test_open_feature_requires_login() {
        let h = harness(None);
        let err = h.dashboard.open_feature(Feature::Chat).unwrap_err();
        assert!(matches!(err, DashboardError::LoginRequired("Chat")));
        assert_eq!(h.notifications.active()[0].message, LOGIN_REQUIRED);
        assert_eq!(*h.redirects.lock().unwrap(), vec!["/api/auth/login/".to_string()]);
        assert_eq!(h.dashboard.context().modals.current(), None);
    }

    #[test]
    fn test_open_feature_opens_modal() {
        let h = harness(Some("tok"));
        h.dashboard.open_feature(Feature::Tts).unwrap();
        assert_eq!(h.dashboard.context().modals.current().as_deref(), Some("tts-modal"));
        assert!(h.notifications.active().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_rejected_before_request() {
        let h = harness(Some("tok"));
        let err = h.dashboard.send_message("   ").await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Api(ApiError::Validation(ValidationError::EmptyText { .. }))
        ));

        let shown = h.notifications.active();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Message cannot be empty.");
    }

    #[tokio::test]
    async fn test_long_text_rejected() {
        let h = harness(Some("tok"));
        let text = "a".repeat(5001);
        let err = h.dashboard.synthesize_speech(&text, None).await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Api(ApiError::Validation(ValidationError::TextTooLong { max: 5000, .. }))
        ));
    }

    #[tokio::test]
    async fn test_workflow_without_token_redirects() {
        let h = harness(None);
        let err = h.dashboard.synthesize_speech("hello", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Please login to use TTS");
        assert_eq!(h.notifications.active()[0].message, "Please login to use TTS");
        assert_eq!(h.redirects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_extension_rejected() {
        let h = harness(Some("tok"));
        let path = std::env::temp_dir().join(format!("{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"not audio").unwrap();

        let err = h.dashboard.transcribe_file(&path, None).await.unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            err,
            DashboardError::Api(ApiError::Validation(ValidationError::UnsupportedType { .. }))
        ));
        assert!(h.notifications.active()[0].message.starts_with("Unsupported file type."));
    }

    #[tokio::test]
    async fn test_empty_recording_rejected() {
        let h = harness(Some("tok"));
        let mut recorder = BufferedRecorder::new();
        let err = h
            .dashboard
            .transcribe_recording(&mut recorder, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Capture(CaptureError::Empty)));
        assert_eq!(h.notifications.active()[0].message, "Nothing was recorded");
    }

    #[tokio::test]
    async fn test_trainer_requires_login() {
        let h = harness(None);
        let err = h.dashboard.generate_sentence().await.unwrap_err();
        assert_eq!(err.to_string(), "Please login to use Trainer");
        assert_eq!(h.notifications.active()[0].message, "Please login to use Trainer");
    }

    #[tokio::test]
    async fn test_play_without_sentence_rejected() {
        let h = harness(Some("tok"));
        let err = h.dashboard.play_sentence().await.unwrap_err();
        assert!(matches!(err, DashboardError::NoSentence));
        assert_eq!(h.notifications.active()[0].message, NO_SENTENCE);
    }

    #[tokio::test]
    async fn test_analysis_needs_sentence_and_audio() {
        let h = harness(Some("tok"));
        let mut recorder = BufferedRecorder::new();
        recorder.start().unwrap();
        recorder.on_data(b"RIFF");
        recorder.stop();

        let err = h.dashboard.analyze_pronunciation(&mut recorder).await.unwrap_err();
        assert!(matches!(err, DashboardError::MissingTrainerInput));
        assert_eq!(h.notifications.active()[0].message, MISSING_TRAINER_INPUT);
    }

    #[test]
    fn test_opening_trainer_clears_sentence() {
        let h = harness(Some("tok"));
        *h.dashboard.trainer_sentence.lock().unwrap() = Some("Guten Morgen.".into());

        h.dashboard.open_feature(Feature::Chat).unwrap();
        assert_eq!(h.dashboard.trainer_sentence().as_deref(), Some("Guten Morgen."));

        h.dashboard.open_feature(Feature::Trainer).unwrap();
        assert_eq!(h.dashboard.trainer_sentence(), None);
        assert_eq!(h.dashboard.context().modals.current().as_deref(), Some("trainer-modal"));
    }
}
