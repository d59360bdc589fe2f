use std::time::Duration;

use super::prompt::question_from_prompt;
use super::*;
use crate::constants::{DEFAULT_GENERATION_MODEL, GENERATION_TEMPERATURE};

#[test]
fn test_user_prompt_layout() {
    assert_eq!(
        build_user_prompt("The capital of Fredonia is Sylvania.", "Capital?"),
        "CONTEXTO:\nThe capital of Fredonia is Sylvania.\n\nPERGUNTA:\nCapital?"
    );
}

#[test]
fn test_question_from_prompt() {
    let prompt = build_user_prompt("ctx", "What is it?");
    assert_eq!(question_from_prompt(&prompt), "What is it?");
    assert_eq!(question_from_prompt("bare"), "bare");
}

#[test]
fn test_generation_error_transience() {
    assert!(
        GenerationError::Provider {
            message: "502".to_string()
        }
        .is_transient()
    );
    assert!(!GenerationError::EmptyResponse.is_transient());
}

#[test]
fn test_genai_generator_defaults() {
    let generator = GenaiGenerator::default();
    assert_eq!(generator.model(), DEFAULT_GENERATION_MODEL);
    assert_eq!(generator.temperature(), GENERATION_TEMPERATURE);
    assert_eq!(generator.with_temperature(0.7).temperature(), 0.7);
}

#[tokio::test]
async fn test_mock_fixed_reply_records_prompts() {
    let generator = MockGenerator::fixed("Sylvania");
    let answer = generator.generate("system", "user").await.unwrap();

    assert_eq!(answer, "Sylvania");
    assert_eq!(generator.call_count(), 1);
    assert_eq!(
        generator.last_prompts(),
        Some(("system".to_string(), "user".to_string()))
    );
}

#[tokio::test]
async fn test_mock_keeps_only_latest_prompts() {
    let generator = MockGenerator::fixed("ok");
    for i in 0..100 {
        generator.generate("system", &format!("user {i}")).await.unwrap();
    }

    assert_eq!(generator.call_count(), 100);
    assert_eq!(generator.last_user_prompt().as_deref(), Some("user 99"));
    assert_eq!(
        generator.last_prompts(),
        Some(("system".to_string(), "user 99".to_string()))
    );
}

#[tokio::test]
async fn test_mock_echo_reply_uses_question() {
    let generator = MockGenerator::echo();
    let prompt = build_user_prompt("ctx", "Why?");
    assert_eq!(
        generator.generate("s", &prompt).await.unwrap(),
        "Mock response for: Why?"
    );
    assert_eq!(generator.last_user_prompt().as_deref(), Some(prompt.as_str()));
}

#[tokio::test]
async fn test_mock_failing_reply() {
    let generator = MockGenerator::failing("quota exceeded");
    assert_eq!(
        generator.generate("s", "u").await,
        Err(GenerationError::Provider {
            message: "quota exceeded".to_string()
        })
    );
}

#[tokio::test]
async fn test_mock_fail_next_then_recovers() {
    let generator = MockGenerator::fixed("ok");
    generator.fail_next(1);

    assert!(generator.generate("s", "u").await.is_err());
    assert_eq!(generator.generate("s", "u").await.unwrap(), "ok");
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn test_mock_clones_share_state() {
    let generator = MockGenerator::fixed("x");
    let clone = generator.clone();
    clone.generate("s", "u").await.unwrap();
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_mock_delay() {
    let generator = MockGenerator::fixed("slow").with_delay(Duration::from_secs(5));
    let started = tokio::time::Instant::now();
    generator.generate("s", "u").await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(5));
}
