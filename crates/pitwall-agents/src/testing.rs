//! Generator doubles and fixtures shared by the agent tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pitwall_ai::PseudoEmbedder;
use pitwall_llm::{Generation, Generator};
use pitwall_store::{
    KnowledgeBase, PassageCorpusEntry, TelemetryIndex, TelemetryRecord, TextRetriever,
};
use serde_json::Map;

use crate::assistant::{AgentSettings, Assistant};

/// Replays one canned generation and records every prompt it receives.
pub struct ScriptedGenerator {
    reply: Generation,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn success(text: &str) -> Self {
        Self {
            reply: Generation::Success(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        Self {
            reply: Generation::fallback(""),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _max_output_tokens: u32) -> Generation {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Generation::Fallback(_) => Generation::fallback(prompt),
            success => success.clone(),
        }
    }
}

pub struct PanickingGenerator;

#[async_trait]
impl Generator for PanickingGenerator {
    async fn generate(&self, _prompt: &str, _max_output_tokens: u32) -> Generation {
        panic!("backend exploded");
    }
}

/// Never answers within any reasonable timeout.
pub struct StallingGenerator;

#[async_trait]
impl Generator for StallingGenerator {
    async fn generate(&self, prompt: &str, _max_output_tokens: u32) -> Generation {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Generation::Success(format!("too late for {prompt}"))
    }
}

fn passage(text: &str, source: &str) -> PassageCorpusEntry {
    PassageCorpusEntry {
        text: text.into(),
        source: Some(source.into()),
    }
}

fn lap(lap: i64, score: f64) -> TelemetryRecord {
    TelemetryRecord {
        lap: Some(lap),
        score: Some(score),
        meta: Map::new(),
        text: None,
        source: None,
    }
}

/// Small corpus plus telemetry for driver 44 on laps 10 and 30.
pub fn knowledge() -> KnowledgeBase {
    let passages = vec![
        passage("DRS opens a flap in the rear wing to cut drag.", "regs"),
        passage(
            "Hamilton pitted on lap 30 as tyre temperatures climbed.",
            "race_report",
        ),
        passage("Soft tyres are fast but degrade quickly.", "pirelli"),
        passage("Safety cars bunch the field up.", "race_report"),
    ];
    let telemetry = HashMap::from([("44".to_string(), vec![lap(10, 0.4), lap(30, 0.9)])]);
    KnowledgeBase::new(
        TextRetriever::new(passages, PseudoEmbedder::default()),
        TelemetryIndex::new(telemetry),
    )
}

pub fn assistant_with<G: Generator + 'static>(generator: G) -> Assistant {
    Assistant::new(
        Arc::new(knowledge()),
        Arc::new(generator),
        AgentSettings {
            generation_timeout: Duration::from_secs(5),
            ..AgentSettings::default()
        },
    )
}

/// Assistant plus a handle on the scripted generator, for prompt assertions.
pub fn scripted(generator: ScriptedGenerator) -> (Assistant, Arc<ScriptedGenerator>) {
    let generator = Arc::new(generator);
    let assistant = Assistant::new(
        Arc::new(knowledge()),
        Arc::clone(&generator) as Arc<dyn Generator>,
        AgentSettings::default(),
    );
    (assistant, generator)
}
