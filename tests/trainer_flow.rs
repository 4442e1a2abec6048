//! Pronunciation trainer against a mock backend.

mod common;

use common::{start_programmable_backend, test_config, test_dashboard, MockResponse};
use dashboard_client::dashboard::{SENTENCE_GENERATED, SENTENCE_PLAYING, TRAINER_VOICE};
use dashboard_client::media::{AudioCapture, BufferedRecorder};
use dashboard_client::ui::Severity;

fn chat_reply(content: &str) -> String {
    serde_json::json!({
        "conversation_id": 3,
        "user_message": {"id": 1, "role": "user", "content": "prompt"},
        "ai_message": {"id": 2, "role": "assistant", "content": content}
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_play_and_grade() {
    let backend = start_programmable_backend(|req| match req.path.as_str() {
        "/api/llm/chat/" if req.json()["message"].as_str().is_some_and(|m| m.starts_with("Generate")) => {
            MockResponse::json(200, chat_reply("  Ich trinke gern Kaffee.\n"))
        }
        "/api/llm/chat/" => MockResponse::json(
            200,
            chat_reply("SCORE: 72/100\nFEEDBACK: Good rhythm.\nTIPS: Lengthen the a in Kaffee."),
        ),
        "/api/tts/synthesize/" => MockResponse::bytes(200, vec![1u8; 64], "audio/wav"),
        _ => MockResponse::json(200, r#"{"id": 4, "text": "ich trinke gern kafe"}"#),
    })
    .await;
    let t = test_dashboard(test_config(&backend.url()), Some("tok"));

    let sentence = t.dashboard.generate_sentence().await.unwrap();
    assert_eq!(sentence, "Ich trinke gern Kaffee.");
    let shown = t.notifications.active();
    assert_eq!(shown[0].message, SENTENCE_GENERATED);
    assert_eq!(shown[0].severity, Severity::Success);

    let generate = &backend.requests_to("/api/llm/chat/")[0];
    assert!(generate.json()["conversation_id"].is_null());
    assert!(generate.json()["message"]
        .as_str()
        .unwrap()
        .ends_with("Respond ONLY with the German sentence, no explanations."));

    let audio = t.dashboard.play_sentence().await.unwrap();
    assert_eq!(audio.len(), 64);
    let speak = &backend.requests_to("/api/tts/synthesize/")[0];
    assert_eq!(speak.json()["text"], "Ich trinke gern Kaffee.");
    assert_eq!(speak.json()["voice"], TRAINER_VOICE);
    let playing = t.notifications.active().pop().unwrap();
    assert_eq!(playing.message, SENTENCE_PLAYING);
    assert_eq!(playing.severity, Severity::Info);

    let mut recorder = BufferedRecorder::new();
    recorder.start().unwrap();
    recorder.on_data(b"RIFF");
    recorder.on_data(b"WAVE");
    recorder.stop();
    let feedback = t.dashboard.analyze_pronunciation(&mut recorder).await.unwrap();
    assert_eq!(feedback.score, Some(72));
    assert_eq!(feedback.feedback, "Good rhythm.");
    assert_eq!(feedback.tips, "Lengthen the a in Kaffee.");
    assert_eq!(feedback.recognized, "ich trinke gern kafe");

    let upload = &backend.requests_to("/api/asr/transcribe/")[0];
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains(r#"filename="recording.wav""#));
    assert!(body.contains("RIFFWAVE"));

    let evaluation = &backend.requests_to("/api/llm/chat/")[1];
    let prompt = evaluation.json()["message"].as_str().unwrap().to_string();
    assert!(prompt.contains("pronounce this German sentence: \"Ich trinke gern Kaffee.\""));
    assert!(prompt.contains("transcribed what the student said as: \"ich trinke gern kafe\""));
    assert!(evaluation.json()["conversation_id"].is_null());
}

#[tokio::test]
async fn test_trainer_does_not_touch_chat_conversation() {
    let backend = start_programmable_backend(|_| MockResponse::json(200, chat_reply("Wie geht's?"))).await;
    let t = test_dashboard(test_config(&backend.url()), Some("tok"));

    t.dashboard.generate_sentence().await.unwrap();
    assert_eq!(t.dashboard.conversation_id(), None);
}
