use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::NluConfig;
use crate::interpret::{Entity, Interpretation, TopIntent};

/// Client for the external conversation-analysis service. One request per
/// user turn. A hard network timeout keeps a slow deployment from
/// stalling the dialogue loop.
#[derive(Clone)]
pub struct NluClient {
    client: Client,
    config: NluConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    kind: &'static str,
    analysis_input: AnalysisInput,
    parameters: AnalyzeParameters,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisInput {
    conversation_item: ConversationItem,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversationItem {
    id: String,
    participant_id: String,
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeParameters {
    project_name: String,
    deployment_name: String,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    result: AnalyzeResult,
}

#[derive(Deserialize)]
struct AnalyzeResult {
    prediction: Prediction,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    top_intent: String,
    #[serde(default)]
    entities: Vec<WireEntity>,
}

#[derive(Deserialize)]
struct WireEntity {
    category: String,
    text: String,
}

impl NluClient {
    pub fn new(config: NluConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub async fn analyze(&self, utterance: &str) -> Result<Interpretation> {
        let body = AnalyzeRequest {
            kind: "Conversation",
            analysis_input: AnalysisInput {
                conversation_item: ConversationItem {
                    id: Uuid::new_v4().to_string(),
                    participant_id: "user".to_string(),
                    text: utterance.to_string(),
                },
            },
            parameters: AnalyzeParameters {
                project_name: self.config.project.clone(),
                deployment_name: self.config.deployment.clone(),
            },
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("analysis service error: {}", response.status()));
        }

        let parsed: AnalyzeResponse = response.json().await?;
        let prediction = parsed.result.prediction;
        Ok(Interpretation {
            top_intent: TopIntent::parse(&prediction.top_intent),
            entities: prediction
                .entities
                .into_iter()
                .map(|e| Entity {
                    category: e.category,
                    text: e.text,
                })
                .collect(),
        })
    }
}
