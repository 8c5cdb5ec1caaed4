pub mod dynamics;
pub mod extract;
pub mod prompts;
pub mod summary;
pub mod validate;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::error::{CompassError, Result};
use crate::ingest::{self, CommunicationType};
use crate::llm::{CompletionRequest, CompletionService};
use crate::models::{serialize_metadata, Message, TeamMetadata};

/// Model and sampling settings for the model-backed stages.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub model: String,
    pub leadership_temperature: f32,
    pub alignment_temperature: f32,
    pub synthesis_temperature: f32,
    /// Messages included verbatim in the leadership and alignment prompts.
    pub message_window: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            leadership_temperature: 0.3,
            alignment_temperature: 0.3,
            synthesis_temperature: 0.2,
            message_window: 25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    Initialized,
    DataProcessed,
    LeadershipAnalyzed,
    AlignmentAnalyzed,
    DashboardSynthesized,
    InsightsValidated,
    Error,
}

/// Everything the stages know about one run. Each stage takes the state by
/// value and returns the next one.
#[derive(Debug)]
pub struct PipelineState {
    pub raw_input: String,
    pub communication_type: Option<CommunicationType>,
    pub messages: Vec<Message>,
    pub team_metadata: Option<TeamMetadata>,
    pub leadership_analysis: Map<String, Value>,
    pub organizational_insights: Map<String, Value>,
    pub dashboard: Map<String, Value>,
    pub stage: ProcessingStage,
    pub error: Option<CompassError>,
}

impl PipelineState {
    pub fn new(raw_input: String, communication_type: Option<CommunicationType>) -> Self {
        Self {
            raw_input,
            communication_type,
            messages: Vec::new(),
            team_metadata: None,
            leadership_analysis: Map::new(),
            organizational_insights: Map::new(),
            dashboard: Map::new(),
            stage: ProcessingStage::Initialized,
            error: None,
        }
    }

    fn failed(mut self, stage: &'static str, err: CompassError) -> Self {
        error!("{stage} failed: {err}");
        self.error = Some(CompassError::stage(stage, err));
        self.stage = ProcessingStage::Error;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.stage == ProcessingStage::Error
    }
}

/// Final result of a run: complete success or one terminal error.
#[derive(Debug, Serialize)]
#[serde(tag = "status")]
pub enum AnalysisOutcome {
    #[serde(rename = "success")]
    Success {
        ceo_dashboard: Map<String, Value>,
        leadership_insights: Map<String, Value>,
        organizational_insights: Map<String, Value>,
        #[serde(serialize_with = "serialize_metadata")]
        team_metadata: Option<TeamMetadata>,
        executive_summary: String,
    },
    #[serde(rename = "analysis_failed")]
    Failed { error: String },
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success { .. })
    }
}

/// Runs normalize → leadership → alignment → synthesis → validation.
pub struct Pipeline<'a> {
    llm: &'a dyn CompletionService,
    settings: AnalysisSettings,
}

impl<'a> Pipeline<'a> {
    pub fn new(llm: &'a dyn CompletionService, settings: AnalysisSettings) -> Self {
        Self { llm, settings }
    }

    pub fn run(&self, raw_input: &str, communication_type: Option<CommunicationType>) -> AnalysisOutcome {
        info!(
            "Starting organizational analysis ({})",
            communication_type.map(|c| c.as_str()).unwrap_or("auto")
        );

        let state = PipelineState::new(raw_input.to_string(), communication_type);
        let state = self.process_data(state);
        let state = self.analyze_leadership(state);
        let state = self.analyze_alignment(state);
        let state = self.synthesize_dashboard(state);
        let state = if state.is_failed() {
            state
        } else {
            self.validate_insights(state)
        };

        finish(state)
    }

    /// Detect the type when needed, parse messages and compute team metadata.
    pub fn process_data(&self, mut state: PipelineState) -> PipelineState {
        if state.is_failed() {
            return state;
        }
        info!("Processing organizational communication data");

        let kind = state
            .communication_type
            .unwrap_or_else(|| CommunicationType::detect(&state.raw_input));
        let messages = ingest::parse_messages(&state.raw_input, kind);
        let team_metadata = dynamics::extract_team_dynamics(&messages);
        info!("Parsed {} messages as {kind}", messages.len());

        state.communication_type = Some(kind);
        state.messages = messages;
        state.team_metadata = team_metadata;
        state.stage = ProcessingStage::DataProcessed;
        state
    }

    pub fn analyze_leadership(&self, mut state: PipelineState) -> PipelineState {
        if state.is_failed() {
            return state;
        }
        info!("Analyzing leadership effectiveness");

        let prompt = prompts::leadership_prompt(
            &state.messages,
            &state.team_metadata,
            self.settings.message_window,
        );
        match self.ask(
            prompts::LEADERSHIP_PERSONA,
            prompt,
            self.settings.leadership_temperature,
        ) {
            Ok(analysis) => {
                state.leadership_analysis = analysis;
                state.stage = ProcessingStage::LeadershipAnalyzed;
                state
            }
            Err(e) => state.failed("Leadership analysis", e),
        }
    }

    pub fn analyze_alignment(&self, mut state: PipelineState) -> PipelineState {
        if state.is_failed() {
            return state;
        }
        info!("Analyzing organizational alignment");

        let prompt = prompts::alignment_prompt(
            &state.messages,
            &state.team_metadata,
            self.settings.message_window,
        );
        match self.ask(
            prompts::ALIGNMENT_PERSONA,
            prompt,
            self.settings.alignment_temperature,
        ) {
            Ok(insights) => {
                state.organizational_insights = insights;
                state.stage = ProcessingStage::AlignmentAnalyzed;
                state
            }
            Err(e) => state.failed("Alignment analysis", e),
        }
    }

    pub fn synthesize_dashboard(&self, mut state: PipelineState) -> PipelineState {
        if state.is_failed() {
            return state;
        }
        info!("Synthesizing CEO dashboard");

        let prompt = prompts::synthesis_prompt(
            &state.leadership_analysis,
            &state.organizational_insights,
            &state.team_metadata,
        );
        match self.ask(
            prompts::SYNTHESIS_PERSONA,
            prompt,
            self.settings.synthesis_temperature,
        ) {
            Ok(mut dashboard) => {
                dashboard.insert("analysis_metadata".into(), analysis_metadata(&state));
                state.dashboard = dashboard;
                state.stage = ProcessingStage::DashboardSynthesized;
                state
            }
            Err(e) => state.failed("Dashboard synthesis", e),
        }
    }

    pub fn validate_insights(&self, mut state: PipelineState) -> PipelineState {
        if state.is_failed() {
            return state;
        }
        info!("Validating CEO insights");

        match validate::validate_dashboard(&state.dashboard) {
            Ok(()) => {
                state.stage = ProcessingStage::InsightsValidated;
                state
            }
            Err(e) => state.failed("Insights validation", e),
        }
    }

    fn ask(&self, system: &str, prompt: String, temperature: f32) -> Result<Map<String, Value>> {
        let request = CompletionRequest {
            system: system.to_string(),
            prompt,
            model: self.settings.model.clone(),
            temperature,
        };
        let reply = self.llm.complete(&request)?;
        extract::extract_json_object(&reply)
    }
}

fn analysis_metadata(state: &PipelineState) -> Value {
    serde_json::json!({
        "analysis_id": uuid::Uuid::new_v4().to_string(),
        "analysis_timestamp": chrono::Utc::now().to_rfc3339(),
        "communication_type": state.communication_type.map(|c| c.as_str()).unwrap_or("unknown"),
        "participants_analyzed": state.team_metadata.as_ref().map(|t| t.total_participants).unwrap_or(0),
        "messages_processed": state.messages.len(),
        "leadership_participants": state.messages.iter().filter(|m| m.is_leadership).count(),
        "analysis_scope": "organizational_communication",
    })
}

fn finish(state: PipelineState) -> AnalysisOutcome {
    if let Some(err) = state.error {
        return AnalysisOutcome::Failed {
            error: err.to_string(),
        };
    }

    let executive_summary = summary::generate_executive_summary(
        &state.dashboard,
        state.communication_type,
        state.messages.len(),
        &state.team_metadata,
    );

    AnalysisOutcome::Success {
        ceo_dashboard: state.dashboard,
        leadership_insights: state.leadership_analysis,
        organizational_insights: state.organizational_insights,
        team_metadata: state.team_metadata,
        executive_summary,
    }
}
