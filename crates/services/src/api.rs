use std::env;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::warn;

use lingo_core::model::{Activity, Credential, Lesson, LessonId};

use crate::backend::{LessonBackend, LoginGrant, SpeechGrade};
use crate::error::ApiError;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("LINGO_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".into());
        Self { base_url }
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// HTTP client for the learning backend.
///
/// Thin request plumbing only: JSON in, JSON out, `Token` credential header
/// on authenticated calls. No timeouts are applied; a hung request parks the
/// caller until the owning view is torn down.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}/", self.config.base_url.trim_end_matches('/'))
    }

    fn authed(&self, builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder.header(
            header::AUTHORIZATION,
            format!("Token {}", credential.token()),
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status if !status.is_success() => Err(ApiError::HttpStatus(status)),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl LessonBackend for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ApiError> {
        let response = self
            .client
            .post(self.endpoint("login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let body: LoginResponse = Self::check(response).await?.json().await?;
        Ok(LoginGrant {
            credential: Credential::new(body.token),
            experience: body.experience_points,
        })
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("register"))
            .json(&RegisterRequest {
                username,
                password,
                email,
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn lessons(&self, credential: &Credential) -> Result<Vec<Lesson>, ApiError> {
        let response = self
            .authed(self.client.get(self.endpoint("lessons")), credential)
            .send()
            .await?;
        let items: Vec<LessonItem> = Self::check(response).await?.json().await?;

        // Malformed snapshots are skipped, not fatal: the rest of the list
        // still renders.
        let mut lessons = Vec::with_capacity(items.len());
        for item in items {
            match item.into_lesson() {
                Ok(lesson) => lessons.push(lesson),
                Err(reason) => {
                    warn!(%reason, "skipping malformed lesson snapshot");
                }
            }
        }
        Ok(lessons)
    }

    async fn synthesize_speech(
        &self,
        credential: &Credential,
        text: &str,
    ) -> Result<String, ApiError> {
        let response = self
            .authed(
                self.client.post(self.endpoint("generate-gemini-audio")),
                credential,
            )
            .json(&AudioRequest { text })
            .send()
            .await?;
        let body: AudioResponse = Self::check(response).await?.json().await?;
        if body.audio_url.is_empty() {
            return Err(ApiError::MalformedResponse("empty audioUrl".into()));
        }
        Ok(body.audio_url)
    }

    async fn transcribe_speech(
        &self,
        credential: &Credential,
        audio_base64: &str,
        prompt: &str,
        platform: &str,
    ) -> Result<SpeechGrade, ApiError> {
        let response = self
            .authed(
                self.client.post(self.endpoint("transcribe-audio")),
                credential,
            )
            .json(&TranscribeRequest {
                audio_base64,
                prompt,
                platform,
            })
            .send()
            .await?;
        let body: TranscribeResponse = Self::check(response).await?.json().await?;
        Ok(SpeechGrade {
            transcribed_text: body.transcribed_text,
            is_correct: body.is_correct,
        })
    }

    async fn chat_turn(
        &self,
        credential: &Credential,
        message: &str,
        context: &Activity,
        lesson_title: &str,
    ) -> Result<String, ApiError> {
        let response = self
            .authed(self.client.post(self.endpoint("chat")), credential)
            .json(&ChatTurnRequest {
                message,
                context,
                lesson_title,
            })
            .send()
            .await?;
        let body: ChatTurnResponse = Self::check(response).await?.json().await?;
        body.reply
            .filter(|reply| !reply.trim().is_empty())
            .ok_or_else(|| ApiError::MalformedResponse("missing reply".into()))
    }

    async fn complete_lesson(
        &self,
        credential: &Credential,
        lesson_id: LessonId,
    ) -> Result<u32, ApiError> {
        let response = self
            .authed(
                self.client.post(self.endpoint("complete-lesson")),
                credential,
            )
            .json(&CompleteLessonRequest {
                lesson_id: lesson_id.value(),
            })
            .send()
            .await?;
        let body: CompleteLessonResponse = Self::check(response).await?.json().await?;
        Ok(body.total_experience_points)
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    experience_points: u32,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct LessonItem {
    id: u64,
    #[serde(default)]
    completed: bool,
    topics: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct LessonTopics {
    title: String,
    #[serde(default)]
    activities: Vec<Activity>,
}

impl LessonItem {
    fn into_lesson(self) -> Result<Lesson, String> {
        let topics: LessonTopics =
            serde_json::from_value(self.topics).map_err(|err| err.to_string())?;
        let lesson = Lesson::new(
            LessonId::new(self.id),
            topics.title,
            topics.activities,
            self.completed,
        );
        lesson.validate().map_err(|err| err.to_string())?;
        Ok(lesson)
    }
}

#[derive(Debug, Serialize)]
struct AudioRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AudioResponse {
    #[serde(rename = "audioUrl", default)]
    audio_url: String,
}

#[derive(Debug, Serialize)]
struct TranscribeRequest<'a> {
    audio_base64: &'a str,
    prompt: &'a str,
    platform: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    transcribed_text: String,
    is_correct: bool,
}

#[derive(Debug, Serialize)]
struct ChatTurnRequest<'a> {
    message: &'a str,
    context: &'a Activity,
    lesson_title: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatTurnResponse {
    reply: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompleteLessonRequest {
    lesson_id: u64,
}

#[derive(Debug, Deserialize)]
struct CompleteLessonResponse {
    total_experience_points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_item_parses_nested_topics() {
        let item = LessonItem {
            id: 3,
            completed: true,
            topics: serde_json::json!({
                "title": "Unit 3 - Animals",
                "activities": [
                    {
                        "type": "ORDERING",
                        "title": "Build the sentence",
                        "prompt": "I like dogs",
                        "words": ["dogs", "I", "like"]
                    }
                ]
            }),
        };

        let lesson = item.into_lesson().unwrap();
        assert_eq!(lesson.id(), LessonId::new(3));
        assert_eq!(lesson.title(), "Unit 3 - Animals");
        assert!(lesson.completed());
        assert_eq!(lesson.len(), 1);
    }

    #[test]
    fn lesson_item_rejects_invalid_payloads() {
        let item = LessonItem {
            id: 4,
            completed: false,
            topics: serde_json::json!({
                "title": "Broken",
                "activities": [
                    {
                        "type": "MATCHING",
                        "title": "Match",
                        "pairs": []
                    }
                ]
            }),
        };
        assert!(item.into_lesson().is_err());
    }

    #[test]
    fn lesson_item_rejects_missing_title() {
        let item = LessonItem {
            id: 5,
            completed: false,
            topics: serde_json::json!({ "activities": [] }),
        };
        assert!(item.into_lesson().is_err());
    }
}
