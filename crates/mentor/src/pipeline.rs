//! The asynchronous half of a move: engine analysis, then advice.
//!
//! A [`PipelineJob`] owns copies of everything it needs, so it can run on
//! another task while the [`crate::Mentor`] keeps accepting input. Its result
//! comes back tagged with the generation it was started for; the mentor drops
//! it if the position has changed since.

use std::fmt;
use std::sync::Arc;

use engine_session::{Analysis, Analyzer};
use mentor_advice::{advise_or_fallback, Advice, AdviceRequest, AdviceSource, Difficulty};
use tracing::debug;

/// Where the move pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    MoveProposed,
    MoveAccepted,
    MoveRejected,
    AnalysisPending,
    AdvicePending,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::MoveProposed => "move proposed",
            Stage::MoveAccepted => "move accepted",
            Stage::MoveRejected => "move rejected",
            Stage::AnalysisPending => "analyzing",
            Stage::AdvicePending => "writing advice",
        };
        f.write_str(name)
    }
}

/// Whether a finished job still described the live position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

/// Analysis + advice for one position.
pub struct PipelineJob {
    pub(crate) generation: u64,
    pub(crate) fen: String,
    pub(crate) history: Vec<String>,
    pub(crate) last_move: Option<String>,
    pub(crate) difficulty: Difficulty,
    pub(crate) language: String,
    /// Send `ucinewgame` before searching
    pub(crate) new_game: bool,
    pub(crate) engine: Arc<dyn Analyzer>,
    pub(crate) advisor: Arc<dyn AdviceSource>,
}

impl fmt::Debug for PipelineJob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PipelineJob")
            .field("generation", &self.generation)
            .field("fen", &self.fen)
            .field("difficulty", &self.difficulty)
            .field("new_game", &self.new_game)
            .finish_non_exhaustive()
    }
}

impl PipelineJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether this job opens a new game on the engine.
    pub fn starts_new_game(&self) -> bool {
        self.new_game
    }

    /// First suspension point: search at the tier's depth.
    ///
    /// A job started after a reset or load resets the engine first. That
    /// waits for any search still holding the engine, here on the job's
    /// task rather than on the caller's.
    pub async fn analyze(self) -> AdviceJob {
        if self.new_game {
            debug!(generation = self.generation, "engine new game");
            self.engine.new_game().await;
        }
        let depth = self.difficulty.depth();
        debug!(generation = self.generation, depth, "analysis started");
        let analysis = self.engine.analyze(&self.fen, depth).await;
        AdviceJob {
            job: self,
            analysis,
        }
    }

    /// Both stages back to back.
    pub async fn run(self) -> PipelineOutcome {
        self.analyze().await.advise().await
    }
}

/// A job whose analysis has settled.
#[derive(Debug)]
pub struct AdviceJob {
    job: PipelineJob,
    analysis: Analysis,
}

impl AdviceJob {
    pub fn generation(&self) -> u64 {
        self.job.generation
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn request(&self) -> AdviceRequest {
        AdviceRequest::new(
            self.job.fen.clone(),
            self.job.history.clone(),
            self.analysis.best_move.clone(),
            self.job.last_move.clone(),
            self.job.difficulty,
        )
        .with_language(self.job.language.clone())
    }

    /// Second suspension point. Never fails: errors become fallback advice.
    pub async fn advise(self) -> PipelineOutcome {
        let request = self.request();
        let advice = advise_or_fallback(self.job.advisor.as_ref(), &request).await;
        PipelineOutcome {
            generation: self.job.generation,
            analysis: self.analysis,
            advice,
        }
    }
}

/// Result of a finished job, handed to [`crate::Mentor::complete`].
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub generation: u64,
    pub analysis: Analysis,
    pub advice: Advice,
}
