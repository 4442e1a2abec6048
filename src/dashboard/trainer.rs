//! Pronunciation trainer.
//!
//! The assistant writes a German sentence, the user listens to it, records
//! an attempt, and the assistant grades the transcribed attempt.

use crate::api::AudioUpload;
use crate::error::ApiError;
use crate::media::AudioCapture;
use crate::ui::{ProgressHandle, ProgressMode, ProgressReporter, Severity};

use super::{Dashboard, DashboardError, Feature};

pub const SENTENCE_GENERATED: &str = "Sentence generated! Listen and then record your pronunciation.";
pub const SENTENCE_PLAYING: &str = "Playing German sentence...";
pub const NO_SENTENCE: &str = "No sentence to play. Generate one first.";
pub const MISSING_TRAINER_INPUT: &str = "Missing audio or sentence";

/// Voice used to read practice sentences.
pub const TRAINER_VOICE: &str = "de_DE/thorsten/medium";

const TRAINER_PROGRESS: &str = "trainer-loading";

const SENTENCE_PROMPT: &str = "Generate a simple German sentence for pronunciation practice. \
The sentence should be suitable for a beginner to intermediate learner. \
Respond ONLY with the German sentence, no explanations.";

fn evaluation_prompt(sentence: &str, recognized: &str) -> String {
    format!(
        "You are a German language teacher. A student tried to pronounce this German sentence: \"{sentence}\"

The speech recognition system transcribed what the student said as: \"{recognized}\"

Please provide:
1. Accuracy score (0-100): How close was the pronunciation?
2. Feedback: What was good and what needs improvement?
3. Tips: Specific pronunciation tips for this sentence

Format your response as:
SCORE: [number]/100
FEEDBACK: [your feedback]
TIPS: [your tips]"
    )
}

/// Graded attempt as returned by the assistant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PronunciationFeedback {
    /// 0 to 100, when the reply carried a readable score.
    pub score: Option<u8>,
    pub feedback: String,
    pub tips: String,
    /// What the recognizer heard.
    pub recognized: String,
    /// The full assistant reply.
    pub raw: String,
}

#[derive(Clone, Copy)]
enum Section {
    Feedback,
    Tips,
}

impl PronunciationFeedback {
    /// Read the `SCORE:`, `FEEDBACK:` and `TIPS:` sections of a reply.
    /// Sections may span several lines; text before the first marker is
    /// ignored.
    pub fn parse(reply: &str) -> Self {
        let mut parsed = Self {
            raw: reply.to_string(),
            ..Self::default()
        };
        let mut section = None;

        for line in reply.lines() {
            let trimmed = line.trim().trim_start_matches("**");
            if let Some(rest) = strip_marker(trimmed, "SCORE:") {
                parsed.score = parse_score(rest);
                section = None;
            } else if let Some(rest) = strip_marker(trimmed, "FEEDBACK:") {
                parsed.feedback = rest.to_string();
                section = Some(Section::Feedback);
            } else if let Some(rest) = strip_marker(trimmed, "TIPS:") {
                parsed.tips = rest.to_string();
                section = Some(Section::Tips);
            } else if let Some(current) = section {
                let target = match current {
                    Section::Feedback => &mut parsed.feedback,
                    Section::Tips => &mut parsed.tips,
                };
                if !target.is_empty() {
                    target.push('\n');
                }
                target.push_str(line.trim_end());
            }
        }

        parsed.feedback = parsed.feedback.trim().to_string();
        parsed.tips = parsed.tips.trim().to_string();
        parsed
    }
}

fn strip_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let head = line.get(..marker.len())?;
    if !head.eq_ignore_ascii_case(marker) {
        return None;
    }
    Some(line[marker.len()..].trim_start_matches('*').trim())
}

fn parse_score(text: &str) -> Option<u8> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().map(|n| n.min(100) as u8)
}

impl Dashboard {
    /// The sentence currently being practiced.
    pub fn trainer_sentence(&self) -> Option<String> {
        self.trainer_sentence.lock().expect("trainer mutex poisoned").clone()
    }

    /// Forget the practice sentence.
    pub fn reset_trainer(&self) {
        *self.trainer_sentence.lock().expect("trainer mutex poisoned") = None;
    }

    /// Ask the assistant for a new practice sentence.
    pub async fn generate_sentence(&self) -> Result<String, DashboardError> {
        self.require_login(Feature::Trainer)?;

        let spinner = self.ctx.progress.show(TRAINER_PROGRESS, ProgressMode::Indeterminate);
        let client = &self.client;
        let result = self
            .handler
            .handle_request(move || client.chat(SENTENCE_PROMPT, None))
            .await;
        spinner.hide();

        let sentence = result?.ai_message.content.trim().to_string();
        *self.trainer_sentence.lock().expect("trainer mutex poisoned") = Some(sentence.clone());
        self.ctx.notifier.notify(SENTENCE_GENERATED, Severity::Success);
        tracing::info!(chars = sentence.chars().count(), "Practice sentence generated");
        Ok(sentence)
    }

    /// Synthesize the practice sentence with the German voice.
    pub async fn play_sentence(&self) -> Result<Vec<u8>, DashboardError> {
        let Some(sentence) = self.trainer_sentence() else {
            self.ctx.notifier.notify(NO_SENTENCE, Severity::Error);
            return Err(DashboardError::NoSentence);
        };

        let client = &self.client;
        let text = sentence.as_str();
        let audio = self
            .handler
            .handle_request(move || client.synthesize(text, Some(TRAINER_VOICE), |_| {}))
            .await?;
        self.ctx.notifier.notify(SENTENCE_PLAYING, Severity::Info);
        Ok(audio)
    }

    /// Transcribe a recorded attempt and have the assistant grade it.
    pub async fn analyze_pronunciation(
        &self,
        recorder: &mut dyn AudioCapture,
    ) -> Result<PronunciationFeedback, DashboardError> {
        self.require_login(Feature::Trainer)?;

        let (Some(sentence), Ok(upload)) = (self.trainer_sentence(), recorder.on_complete()) else {
            self.ctx.notifier.notify(MISSING_TRAINER_INPUT, Severity::Error);
            return Err(DashboardError::MissingTrainerInput);
        };

        let spinner = self.ctx.progress.show(TRAINER_PROGRESS, ProgressMode::Indeterminate);
        let result = self.grade(&sentence, &upload).await;
        spinner.hide();

        let feedback = result?;
        tracing::info!(score = ?feedback.score, "Pronunciation graded");
        Ok(feedback)
    }

    async fn grade(
        &self,
        sentence: &str,
        upload: &AudioUpload,
    ) -> Result<PronunciationFeedback, ApiError> {
        let client = &self.client;
        let transcription = self
            .handler
            .handle_request(move || client.transcribe(upload, None))
            .await?;

        let prompt = evaluation_prompt(sentence, &transcription.text);
        let prompt = prompt.as_str();
        let reply = self
            .handler
            .handle_request(move || client.chat(prompt, None))
            .await?;

        Ok(PronunciationFeedback {
            recognized: transcription.text,
            ..PronunciationFeedback::parse(&reply.ai_message.content)
        })
    }
}
