//! The triage pipeline.
//!
//! One request moves through a fixed sequence of states:
//!
//! 1. **Received**: the message passed validation
//! 2. **Classified**: the intent classifier picked a branch
//! 3. **Resolved** (entity questions the knowledge base can answer) or
//!    **ContextBuilt** (everything the generator answers)
//! 4. **Generated** / **Formatted**: the reply text is final
//! 5. **Logged**: both turns were handed to the transcript store
//! 6. **Done**
//!
//! Validation is the only hard stop. After classification nothing aborts
//! the pipeline: generation failures come back as fixed fallback text and
//! persistence failures are logged and ignored.

use crate::classifier::IntentClassifier;
use crate::context::ContextAssembler;
use crate::extractor::EntityExtractor;
use crate::facility;
use crate::formatter::ResponseFormatter;
use crate::prompt;
use chrono::Utc;
use lifexia_config::{AppConfig, EntityAnswers};
use lifexia_core::error::{StoreError, ValidationError};
use lifexia_core::generation::{GenerationErrorKind, GenerationRequest, GenerationResult, Generator};
use lifexia_core::intent::{Intent, SourceTag};
use lifexia_core::knowledge::KnowledgeBase;
use lifexia_core::record::DrugRecord;
use lifexia_core::transcript::TranscriptStore;
use lifexia_core::turn::{ChatTurn, ConversationWindow};
use lifexia_providers::BoundedGenerator;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, debug, info, info_span, warn};

/// Generation time-box used unless configured otherwise.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Health-probe time-box used unless configured otherwise.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pipeline states, recorded in order on every reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageState {
    Received,
    Classified,
    Resolved,
    ContextBuilt,
    Generated,
    Formatted,
    Logged,
    Done,
}

/// What the caller gets back.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReply {
    pub text: String,
    pub source: SourceTag,
    pub intent: Intent,

    /// Name of the knowledge-base record the reply is about, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    /// Set when the generator failed and `text` is its fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<GenerationErrorKind>,

    pub states: Vec<TriageState>,
}

pub struct TriageOrchestrator {
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    assembler: ContextAssembler,
    formatter: ResponseFormatter,
    generator: Arc<dyn Generator>,
    knowledge: Arc<dyn KnowledgeBase>,
    transcript: Arc<dyn TranscriptStore>,
    window: usize,
    system_prompt: String,
    entity_answers: EntityAnswers,
    generation_timeout: Duration,
    health_timeout: Duration,
}

impl TriageOrchestrator {
    /// Wire the pipeline. The knowledge-base vocabulary is folded into the
    /// classifier and extractor once, here.
    pub fn new(
        generator: Arc<dyn Generator>,
        knowledge: Arc<dyn KnowledgeBase>,
        transcript: Arc<dyn TranscriptStore>,
    ) -> Self {
        let vocabulary = knowledge.vocabulary();
        Self {
            classifier: IntentClassifier::new().with_entity_terms(&vocabulary),
            extractor: EntityExtractor::new().with_vocabulary(&vocabulary),
            assembler: ContextAssembler::new(),
            formatter: ResponseFormatter::new(),
            generator,
            knowledge,
            transcript,
            window: ConversationWindow::DEFAULT_CAPACITY,
            system_prompt: prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
            entity_answers: EntityAnswers::default(),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Wire the pipeline and apply the configured window, prompt, answer
    /// mode and timeout.
    pub fn from_config(
        config: &AppConfig,
        generator: Arc<dyn Generator>,
        knowledge: Arc<dyn KnowledgeBase>,
        transcript: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self::new(generator, knowledge, transcript)
            .with_window(config.history.window)
            .with_system_prompt(prompt::system_prompt(config.generation.system_prompt.as_deref()))
            .with_entity_answers(config.triage.entity_answers)
            .with_generation_timeout(Duration::from_secs(config.generation.timeout_secs))
            .with_health_timeout(Duration::from_secs(config.generation.health_timeout_secs))
    }

    /// Number of prior turns carried into generation context (minimum 1).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_entity_answers(mut self, mode: EntityAnswers) -> Self {
        self.entity_answers = mode;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn knowledge(&self) -> &Arc<dyn KnowledgeBase> {
        &self.knowledge
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Answer `text` for `user_id` using caller-supplied history.
    ///
    /// `history` should hold the user's earlier turns; turns belonging to
    /// other users are ignored and only the newest `window` are used.
    pub async fn handle_message(
        &self,
        user_id: &str,
        text: &str,
        history: &[ChatTurn],
    ) -> Result<TriageReply, TriageError> {
        validate(user_id, text)?;

        let own: Vec<ChatTurn> = history.iter().filter(|t| t.user_id == user_id).cloned().collect();
        let window = ConversationWindow::from_turns(own, self.window);

        let span = info_span!("triage", user_id = %user_id);
        Ok(self.run(user_id, text, window).instrument(span).await)
    }

    /// Answer `text` for `user_id`, loading history from the transcript
    /// store. History is read before the new turn is written.
    pub async fn handle(&self, user_id: &str, text: &str) -> Result<TriageReply, TriageError> {
        validate(user_id, text)?;

        let span = info_span!("triage", user_id = %user_id);
        let reply = async {
            let history = match self.transcript.list_turns(user_id, self.window).await {
                Ok(turns) => turns,
                Err(e) => {
                    warn!(error = %e, "History unavailable, answering without it");
                    Vec::new()
                }
            };
            let window = ConversationWindow::from_turns(history, self.window);
            self.run(user_id, text, window).await
        }
        .instrument(span)
        .await;

        Ok(reply)
    }

    /// The user's most recent `limit` turns, oldest first.
    pub async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<ChatTurn>, TriageError> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::MissingUser.into());
        }
        Ok(self.transcript.list_turns(user_id, limit).await?)
    }

    /// Whether the generation backend answers its health probe in time.
    pub async fn generator_healthy(&self) -> bool {
        self.bounded().check_health().await
    }

    /// Models the generation backend reports.
    pub async fn available_models(&self) -> Vec<String> {
        self.bounded().list_models().await
    }

    async fn run(&self, user_id: &str, text: &str, window: ConversationWindow) -> TriageReply {
        let started = Instant::now();
        let received_at = Utc::now();
        let mut states = Vec::with_capacity(6);

        enter(&mut states, TriageState::Received);

        let intent = self.classifier.classify(text);
        enter(&mut states, TriageState::Classified);
        debug!(intent = %intent, history = window.len(), "Classified message");

        let (reply_text, source, record, error_kind) = match intent {
            Intent::FacilitySearch => {
                let guidance = facility::guidance(text);
                enter(&mut states, TriageState::Formatted);
                (guidance, SourceTag::FacilityGuidance, None, None)
            }
            _ => {
                let record = match intent {
                    Intent::EntityInfo => self.resolve(text),
                    _ => None,
                };
                if record.is_some() {
                    enter(&mut states, TriageState::Resolved);
                }

                match (record, self.entity_answers) {
                    (Some(record), EntityAnswers::Template) => {
                        let formatted = self.formatter.format(&record);
                        enter(&mut states, TriageState::Formatted);
                        (formatted, SourceTag::KnowledgeBase, Some(record.name), None)
                    }
                    (record, _) => {
                        let context = self.assembler.assemble(&window, record.as_ref(), intent);
                        enter(&mut states, TriageState::ContextBuilt);

                        let result = self.generate(text, context).await;
                        enter(&mut states, TriageState::Generated);
                        (
                            result.text,
                            SourceTag::Generation,
                            record.map(|r| r.name),
                            result.error_kind,
                        )
                    }
                }
            }
        };

        self.log_turns(user_id, text, &reply_text, received_at).await;
        enter(&mut states, TriageState::Logged);
        enter(&mut states, TriageState::Done);

        info!(
            intent = %intent,
            source = %source,
            record = record.as_deref().unwrap_or("-"),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Triage complete"
        );

        TriageReply {
            text: reply_text,
            source,
            intent,
            record,
            error_kind,
            states,
        }
    }

    /// First extractor candidate the knowledge base knows.
    fn resolve(&self, text: &str) -> Option<DrugRecord> {
        for candidate in self.extractor.candidates(text) {
            if let Some(record) = self.knowledge.find_by_name(&candidate) {
                debug!(candidate = %candidate, record = %record.name, "Resolved entity");
                return Some(record);
            }
            debug!(candidate = %candidate, "Candidate not in knowledge base");
        }
        None
    }

    async fn generate(&self, text: &str, context: String) -> GenerationResult {
        let request = GenerationRequest::new(text, self.system_prompt.as_str(), context);
        let result = self.bounded().generate(request).await;
        if let Some(kind) = result.error_kind {
            warn!(error_kind = %kind, backend = self.generator.name(), "Generation failed, using fallback text");
        }
        result
    }

    fn bounded(&self) -> BoundedGenerator {
        BoundedGenerator::new(Arc::clone(&self.generator), self.generation_timeout)
            .with_health_timeout(self.health_timeout)
    }

    /// Persist the exchange: the user turn (carrying the reply) then the
    /// assistant turn. Failures are logged, never returned.
    async fn log_turns(&self, user_id: &str, text: &str, reply: &str, received_at: chrono::DateTime<Utc>) {
        let user_turn = ChatTurn::user(user_id, text).with_response(reply).at(received_at);
        let assistant_turn = ChatTurn::assistant(user_id, reply).at(Utc::now().max(received_at));

        for turn in [&user_turn, &assistant_turn] {
            if let Err(e) = self.transcript.append_turn(turn).await {
                warn!(
                    turn_id = %turn.id,
                    role = turn.role.as_str(),
                    store = self.transcript.name(),
                    error = %e,
                    "Failed to persist turn"
                );
            }
        }
    }
}

fn validate(user_id: &str, text: &str) -> Result<(), ValidationError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::MissingUser);
    }
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(())
}

fn enter(states: &mut Vec<TriageState>, state: TriageState) {
    debug!(state = ?state, "Triage state");
    states.push(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::DISCLAIMER;
    use crate::test_helpers::{FailingTranscript, ScriptedGenerator, StallingGenerator};
    use lifexia_core::turn::Role;
    use lifexia_memory::{InMemoryTranscript, StaticKnowledgeBase};

    struct Harness {
        generator: Arc<ScriptedGenerator>,
        transcript: InMemoryTranscript,
        orchestrator: TriageOrchestrator,
    }

    fn harness(generator: ScriptedGenerator) -> Harness {
        let generator = Arc::new(generator);
        let transcript = InMemoryTranscript::new();
        let orchestrator = TriageOrchestrator::new(
            generator.clone(),
            Arc::new(StaticKnowledgeBase::seeded()),
            Arc::new(transcript.clone()),
        );
        Harness {
            generator,
            transcript,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn known_drug_answers_from_knowledge_base() {
        let h = harness(ScriptedGenerator::replying("unused"));
        let reply = h.orchestrator.handle_message("u1", "what is aspirin used for", &[]).await.unwrap();

        assert_eq!(reply.source, SourceTag::KnowledgeBase);
        assert_eq!(reply.intent, Intent::EntityInfo);
        assert_eq!(reply.record.as_deref(), Some("Aspirin"));
        assert!(reply.text.starts_with("Aspirin (Acetylsalicylic Acid)"));
        assert!(reply.text.ends_with(DISCLAIMER));
        assert!(!reply.text.contains("WARNING"));
        assert!(h.generator.requests().is_empty());
        assert_eq!(
            reply.states,
            vec![
                TriageState::Received,
                TriageState::Classified,
                TriageState::Resolved,
                TriageState::Formatted,
                TriageState::Logged,
                TriageState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn recalled_drug_leads_with_banner() {
        let h = harness(ScriptedGenerator::replying("unused"));
        let reply = h.orchestrator.handle_message("u1", "tell me about ranitidine", &[]).await.unwrap();
        assert!(reply.text.lines().next().unwrap().starts_with("WARNING: RANITIDINE HAS BEEN RECALLED"));
    }

    #[tokio::test]
    async fn noise_capture_does_not_hide_known_name() {
        let h = harness(ScriptedGenerator::replying("unused"));
        let reply = h
            .orchestrator
            .handle_message("u1", "what is the dosage of metformin", &[])
            .await
            .unwrap();
        assert_eq!(reply.record.as_deref(), Some("Metformin"));
        assert_eq!(reply.source, SourceTag::KnowledgeBase);
    }

    #[tokio::test]
    async fn unknown_drug_falls_through_to_generation() {
        let h = harness(ScriptedGenerator::replying("Paracetamol relieves pain."));
        let reply = h
            .orchestrator
            .handle_message("u1", "side effects of paracetamol", &[])
            .await
            .unwrap();

        assert_eq!(reply.intent, Intent::EntityInfo);
        assert_eq!(reply.source, SourceTag::Generation);
        assert_eq!(reply.text, "Paracetamol relieves pain.");
        assert!(reply.record.is_none());
        assert!(reply.states.contains(&TriageState::ContextBuilt));
        assert!(!reply.states.contains(&TriageState::Resolved));
    }

    #[tokio::test]
    async fn facility_search_is_deterministic_guidance() {
        let h = harness(ScriptedGenerator::replying("unused"));
        let reply = h
            .orchestrator
            .handle_message("u1", "I have chest pain emergency", &[])
            .await
            .unwrap();

        assert_eq!(reply.intent, Intent::FacilitySearch);
        assert_eq!(reply.source, SourceTag::FacilityGuidance);
        assert_eq!(reply.text, facility::guidance("I have chest pain emergency"));
        assert!(h.generator.requests().is_empty());
    }

    #[tokio::test]
    async fn medicine_specialty_request_gets_hospital_finder() {
        let h = harness(ScriptedGenerator::replying("unused"));
        let reply = h
            .orchestrator
            .handle_message("u1", "general medicine hospital near me", &[])
            .await
            .unwrap();

        assert_eq!(reply.intent, Intent::FacilitySearch);
        assert_eq!(reply.source, SourceTag::FacilityGuidance);
        assert!(reply.text.contains("find medicine hospitals near you"));
        assert!(h.generator.requests().is_empty());
    }

    #[tokio::test]
    async fn empty_message_is_rejected_without_side_effects() {
        let h = harness(ScriptedGenerator::replying("unused"));
        let err = h.orchestrator.handle_message("u1", "   ", &[]).await.unwrap_err();
        assert!(matches!(err, TriageError::Validation(ValidationError::EmptyMessage)));

        let err = h.orchestrator.handle("", "hello").await.unwrap_err();
        assert!(matches!(err, TriageError::Validation(ValidationError::MissingUser)));

        assert!(h.transcript.all().await.is_empty());
        assert!(h.generator.requests().is_empty());
    }

    #[tokio::test]
    async fn both_turns_are_persisted_in_order() {
        let h = harness(ScriptedGenerator::replying("Rest and fluids."));
        h.orchestrator.handle_message("u1", "I have a fever", &[]).await.unwrap();

        let turns = h.transcript.list_turns("u1", 10).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "I have a fever");
        assert_eq!(turns[0].response_text.as_deref(), Some("Rest and fluids."));
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].text, "Rest and fluids.");
    }

    #[tokio::test]
    async fn stored_history_excludes_the_turn_being_answered() {
        let h = harness(ScriptedGenerator::replying("ok"));
        h.orchestrator.handle("u1", "first question about a cough").await.unwrap();
        h.orchestrator.handle("u1", "second question about a cough").await.unwrap();

        let requests = h.generator.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].context.is_empty());

        let second = &requests[1].context;
        assert!(second.contains("User: first question about a cough"));
        assert!(second.contains("Assistant: ok"));
        assert!(!second.contains("second question"));
    }

    #[tokio::test]
    async fn window_is_bounded() {
        let h = harness(ScriptedGenerator::replying("ok"));
        let orchestrator = h.orchestrator.with_window(2);
        let base = Utc::now() - chrono::Duration::minutes(10);
        let history: Vec<ChatTurn> = (0..6)
            .map(|i| ChatTurn::user("u1", format!("old {i}")).at(base + chrono::Duration::seconds(i)))
            .chain(std::iter::once(ChatTurn::user("u2", "someone else").at(base)))
            .collect();

        orchestrator.handle_message("u1", "hello again", &history).await.unwrap();

        let context = &h.generator.requests()[0].context;
        assert!(context.contains("User: old 4\nUser: old 5"));
        assert!(!context.contains("old 3"));
        assert!(!context.contains("someone else"));
    }

    #[tokio::test]
    async fn generation_mode_sends_record_as_context() {
        let h = harness(ScriptedGenerator::replying("Aspirin thins the blood."));
        let orchestrator = h.orchestrator.with_entity_answers(EntityAnswers::Generation);
        let reply = orchestrator.handle_message("u1", "what is aspirin", &[]).await.unwrap();

        assert_eq!(reply.source, SourceTag::Generation);
        assert_eq!(reply.record.as_deref(), Some("Aspirin"));
        let request = &h.generator.requests()[0];
        assert!(request.context.starts_with("Drug Information:\n- Name: Aspirin"));
        assert_eq!(request.prompt, "what is aspirin");
        assert_eq!(request.system_prompt, prompt::DEFAULT_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn generator_failure_returns_fallback_text() {
        let h = harness(ScriptedGenerator::failing(GenerationErrorKind::QuotaExceeded));
        let reply = h.orchestrator.handle_message("u1", "hello", &[]).await.unwrap();
        assert_eq!(reply.text, GenerationErrorKind::QuotaExceeded.fallback_text());
        assert_eq!(reply.error_kind, Some(GenerationErrorKind::QuotaExceeded));
        assert_eq!(reply.source, SourceTag::Generation);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_generation_times_out_and_is_still_logged() {
        let transcript = InMemoryTranscript::new();
        let orchestrator = TriageOrchestrator::new(
            Arc::new(StallingGenerator),
            Arc::new(StaticKnowledgeBase::seeded()),
            Arc::new(transcript.clone()),
        )
        .with_generation_timeout(Duration::from_secs(5));

        let reply = orchestrator.handle_message("u1", "hello", &[]).await.unwrap();
        assert_eq!(reply.text, GenerationErrorKind::Timeout.fallback_text());
        assert_eq!(reply.source, SourceTag::Generation);

        let turns = transcript.all().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].text, GenerationErrorKind::Timeout.fallback_text());
    }

    #[tokio::test]
    async fn persistence_failure_does_not_change_the_reply() {
        let orchestrator = TriageOrchestrator::new(
            Arc::new(ScriptedGenerator::replying("still here")),
            Arc::new(StaticKnowledgeBase::seeded()),
            Arc::new(FailingTranscript),
        );
        let reply = orchestrator.handle("u1", "hello").await.unwrap();
        assert_eq!(reply.text, "still here");
        assert_eq!(reply.states.last(), Some(&TriageState::Done));

        assert!(matches!(orchestrator.history("u1", 5).await, Err(TriageError::Store(_))));
    }

    #[tokio::test]
    async fn health_and_models_come_from_the_generator() {
        let h = harness(ScriptedGenerator::replying("ok"));
        assert!(h.orchestrator.generator_healthy().await);
        assert_eq!(h.orchestrator.available_models().await, vec!["scripted-model".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_health_probe_is_unhealthy() {
        let orchestrator = TriageOrchestrator::new(
            Arc::new(StallingGenerator),
            Arc::new(StaticKnowledgeBase::seeded()),
            Arc::new(InMemoryTranscript::new()),
        );
        assert!(!orchestrator.generator_healthy().await);
    }
}
