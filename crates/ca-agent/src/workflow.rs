//! The orchestrator: an explicit state machine over one run

use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;
use tracing::Instrument;
use uuid::Uuid;

use ca_core::{DocumentStore, Error, LlmProvider, Result, Retrieval};
use ca_rag::format_chunk;

use crate::config::AgentConfig;
use crate::events::{Step, StepEvent};
use crate::generator::Generator;
use crate::grader::Grader;
use crate::policy::{Decision, DecisionPolicy};
use crate::rewriter::Rewriter;
use crate::state::RunState;

/// Sequences Retrieve, Grade, Rewrite and Generate for one question at a time
///
/// Cloning is cheap and clones share the model and store clients. Each call
/// to [`Orchestrator::run`] owns its own [`RunState`], so concurrent runs
/// never observe each other.
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn DocumentStore>,
    grader: Grader,
    rewriter: Rewriter,
    generator: Generator,
    policy: DecisionPolicy,
    config: AgentConfig,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn DocumentStore>,
        config: AgentConfig,
    ) -> Self {
        Self {
            store,
            grader: Grader::new(llm.clone()),
            rewriter: Rewriter::new(llm.clone()),
            generator: Generator::new(llm),
            policy: DecisionPolicy::from(&config),
            config,
        }
    }

    /// Answer a question from a fresh state
    pub async fn run(&self, question: &str) -> Result<RunState> {
        self.run_with_events(None, question, None).await
    }

    /// Answer a question, continuing from a prior state when given
    pub async fn run_from(&self, prior: Option<RunState>, question: &str) -> Result<RunState> {
        self.run_with_events(prior, question, None).await
    }

    /// Answer a question, reporting every completed step on `events`
    pub async fn run_with_events(
        &self,
        prior: Option<RunState>,
        question: &str,
        events: Option<&UnboundedSender<StepEvent>>,
    ) -> Result<RunState> {
        let state = match prior {
            Some(prior) => RunState::resume(prior, question)?,
            None => RunState::new(question)?,
        };

        let span = tracing::info_span!("run", run_id = %Uuid::new_v4());
        self.execute(state, events).instrument(span).await
    }

    /// Upper bound on executed steps. Reaching it means the policy failed
    /// to terminate the loop.
    fn step_ceiling(&self) -> usize {
        3 * (self.policy.max_retries as usize + 1) + 1
    }

    async fn execute(
        &self,
        mut state: RunState,
        events: Option<&UnboundedSender<StepEvent>>,
    ) -> Result<RunState> {
        let emit = |event: StepEvent| {
            if let Some(tx) = events {
                // A caller that stopped listening does not stop the run.
                let _ = tx.send(event);
            }
        };

        tracing::info!(question = state.question(), "Starting workflow");

        let ceiling = self.step_ceiling();
        let mut executed = 0;
        let mut step = Step::Retrieve;

        loop {
            if executed >= ceiling {
                return Err(Error::Other(format!(
                    "workflow did not terminate within {} steps",
                    ceiling
                )));
            }
            executed += 1;
            tracing::debug!(%step, executed, "Executing step");

            step = match step {
                Step::Retrieve => {
                    let retrieval = self.retrieve(state.question()).await;
                    let degraded = retrieval.is_degraded();
                    let documents: Vec<String> =
                        retrieval.into_chunks().iter().map(format_chunk).collect();
                    emit(StepEvent::Retrieved {
                        count: documents.len(),
                        degraded,
                    });
                    state.apply_retrieval(documents);
                    Step::Grade
                }
                Step::Grade => {
                    let grade = self
                        .bounded(
                            Step::Grade,
                            state.retry_count(),
                            self.grader.grade(state.question(), state.documents()),
                        )
                        .await?;
                    state.apply_grade(grade);

                    let decision = self.policy.decide(grade, state.retry_count());
                    tracing::info!(%grade, retry_count = state.retry_count(), ?decision, "Graded");
                    emit(StepEvent::Graded { grade, decision });

                    match decision {
                        Decision::Generate => Step::Generate,
                        Decision::Rewrite => Step::Rewrite,
                    }
                }
                Step::Rewrite => {
                    let rewrite = self
                        .bounded(
                            Step::Rewrite,
                            state.retry_count(),
                            self.rewriter.rewrite(&state),
                        )
                        .await?;
                    state.apply_rewrite(rewrite);
                    emit(StepEvent::Rewritten {
                        question: state.question().to_string(),
                        retry_count: state.retry_count(),
                    });
                    Step::Retrieve
                }
                Step::Generate => {
                    if !state.has_retrieved() {
                        return Err(Error::Other(
                            "generate reached before any retrieval".to_string(),
                        ));
                    }
                    let answer = self
                        .bounded(
                            Step::Generate,
                            state.retry_count(),
                            self.generator.generate(state.question(), state.documents()),
                        )
                        .await?;
                    state.apply_generation(answer);
                    emit(StepEvent::Generated {
                        answer: state.generation().to_string(),
                    });

                    tracing::info!(
                        retry_count = state.retry_count(),
                        steps = executed,
                        "Workflow complete"
                    );
                    return Ok(state);
                }
            };
        }
    }

    /// Retrieval never fails the run; a slow store counts as unavailable
    async fn retrieve(&self, query: &str) -> Retrieval {
        match timeout(
            self.config.step_timeout,
            self.store.search(query, self.config.chunk_limit),
        )
        .await
        {
            Ok(retrieval) => retrieval,
            Err(_) => {
                tracing::error!(timeout = ?self.config.step_timeout, "Retrieve step timed out");
                Retrieval::Unavailable(format!(
                    "retrieval timed out after {:?}",
                    self.config.step_timeout
                ))
            }
        }
    }

    /// Run a model-backed step under the per-step timeout
    async fn bounded<T>(
        &self,
        step: Step,
        retry_count: u32,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match timeout(self.config.step_timeout, fut).await {
            Ok(result) => result.inspect_err(|e| {
                tracing::error!(
                    %step,
                    retry_count,
                    rate_limited = e.is_rate_limited(),
                    error = %e,
                    "Step failed"
                )
            }),
            Err(_) => {
                tracing::error!(%step, retry_count, timeout = ?self.config.step_timeout, "Step timed out");
                Err(Error::Timeout(format!(
                    "{} step exceeded {:?}",
                    step, self.config.step_timeout
                )))
            }
        }
    }
}
