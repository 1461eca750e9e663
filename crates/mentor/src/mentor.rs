//! The orchestration core.

use std::sync::Arc;

use chess_rules::{Game, IllegalMove, MoveProposal, Outcome, Position};
use engine_session::{Analysis, Analyzer};
use mentor_advice::{Advice, AdviceSource, Difficulty, Highlight};
use tracing::{debug, info};

use crate::error::{LoadError, SaveError};
use crate::persistence::{Snapshot, SnapshotStore, DEFAULT_SAVE_KEY};
use crate::pipeline::{Completion, PipelineJob, PipelineOutcome, Stage};
use crate::view::BoardView;

/// What the advice panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdviceSlot {
    #[default]
    Empty,
    Ready(Advice),
    GameOver(Outcome),
}

impl AdviceSlot {
    pub fn advice(&self) -> Option<&Advice> {
        match self {
            AdviceSlot::Ready(advice) => Some(advice),
            _ => None,
        }
    }
}

/// A move that made it onto the board.
#[derive(Debug)]
pub struct MoveAccepted {
    pub san: String,
    /// `None` when the move ended the game
    pub job: Option<PipelineJob>,
}

/// Owns the game and decides which asynchronous results are still relevant.
///
/// Every change of position bumps `generation` and clears the advice. Jobs
/// remember the generation they were started for, so [`Mentor::complete`] can
/// tell a current result from a stale one.
pub struct Mentor {
    game: Game,
    difficulty: Difficulty,
    advice: AdviceSlot,
    evaluation: Option<Analysis>,
    generation: u64,
    stage: Stage,
    /// The next job tells the engine a new game started
    engine_restart: bool,
    engine: Arc<dyn Analyzer>,
    advisor: Arc<dyn AdviceSource>,
    store: Box<dyn SnapshotStore>,
    save_key: String,
    language: String,
}

impl Mentor {
    pub fn new(
        engine: Arc<dyn Analyzer>,
        advisor: Arc<dyn AdviceSource>,
        store: Box<dyn SnapshotStore>,
    ) -> Self {
        Self {
            game: Game::new(),
            difficulty: Difficulty::default(),
            advice: AdviceSlot::Empty,
            evaluation: None,
            generation: 0,
            stage: Stage::Idle,
            engine_restart: false,
            engine,
            advisor,
            store,
            save_key: DEFAULT_SAVE_KEY.to_string(),
            language: "English".to_string(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_save_key(mut self, key: impl Into<String>) -> Self {
        self.save_key = key.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn position(&self) -> &Position {
        self.game.current()
    }

    pub fn history(&self) -> Vec<String> {
        self.game.history()
    }

    pub fn last_move(&self) -> Option<&str> {
        self.game.last_move().map(|m| m.san.as_str())
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn advice(&self) -> &AdviceSlot {
        &self.advice
    }

    pub fn evaluation(&self) -> Option<&Analysis> {
        self.evaluation.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn transition(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, generation = self.generation, "pipeline stage");
        self.stage = stage;
    }

    /// The position changed: drop everything computed for the old one.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.advice = AdviceSlot::Empty;
        self.evaluation = None;
        self.transition(Stage::Idle);
    }

    /// Start the pipeline for the live position, or end the game.
    fn schedule(&mut self) -> Option<PipelineJob> {
        if let Some(outcome) = self.game.outcome() {
            info!(%outcome, "game over");
            self.advice = AdviceSlot::GameOver(outcome);
            self.transition(Stage::Idle);
            return None;
        }
        self.transition(Stage::AnalysisPending);
        Some(PipelineJob {
            generation: self.generation,
            fen: self.position().to_fen(),
            history: self.history(),
            last_move: self.last_move().map(str::to_string),
            difficulty: self.difficulty,
            language: self.language.clone(),
            new_game: std::mem::take(&mut self.engine_restart),
            engine: self.engine.clone(),
            advisor: self.advisor.clone(),
        })
    }

    /// Validate and play a move. A rejected move changes nothing.
    pub fn propose_move(&mut self, proposal: &MoveProposal) -> Result<MoveAccepted, IllegalMove> {
        let previous = self.stage;
        self.transition(Stage::MoveProposed);
        let san = match self.game.apply(proposal) {
            Ok(played) => played.san.clone(),
            Err(e) => {
                self.transition(Stage::MoveRejected);
                self.transition(previous);
                return Err(e);
            }
        };
        self.transition(Stage::MoveAccepted);
        info!(%san, ply = self.game.ply_count(), "move accepted");
        self.invalidate();
        let job = self.schedule();
        Ok(MoveAccepted { san, job })
    }

    /// Take back the last ply. Does not ask for new analysis.
    pub fn undo(&mut self) -> bool {
        match self.game.undo() {
            Some(undone) => {
                info!(san = %undone.san, "move undone");
                self.invalidate();
                true
            }
            None => false,
        }
    }

    /// Back to the initial position; the difficulty is kept.
    ///
    /// The engine is not touched here. The next pipeline job sends it the
    /// new-game notice ahead of its search.
    pub fn reset(&mut self) {
        self.game = Game::new();
        self.engine_restart = true;
        info!("new game");
        self.invalidate();
    }

    /// Applies to pipelines started from now on.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(%difficulty, "difficulty changed");
        self.difficulty = difficulty;
    }

    /// Show the engine evaluation of the live position ahead of the advice.
    pub fn record_analysis(&mut self, generation: u64, analysis: &Analysis) -> Completion {
        if generation != self.generation {
            debug!(generation, current = self.generation, "stale analysis discarded");
            return Completion::Discarded;
        }
        self.evaluation = Some(analysis.clone());
        self.transition(Stage::AdvicePending);
        Completion::Applied
    }

    /// Accept a finished job's advice if it is still about the live position.
    pub fn complete(&mut self, outcome: PipelineOutcome) -> Completion {
        if outcome.generation != self.generation {
            info!(
                generation = outcome.generation,
                current = self.generation,
                "stale advice discarded"
            );
            return Completion::Discarded;
        }
        self.evaluation = Some(outcome.analysis);
        self.advice = AdviceSlot::Ready(outcome.advice);
        self.transition(Stage::Idle);
        Completion::Applied
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            fen: self.position().to_fen(),
            history: self.history(),
            difficulty: Some(self.difficulty),
        }
    }

    /// Store the game under the save key, replacing any earlier save.
    pub fn save(&self) -> Result<(), SaveError> {
        let json = self.snapshot().to_json()?;
        self.store.set(&self.save_key, &json)?;
        info!(key = %self.save_key, plies = self.game.ply_count(), "game saved");
        Ok(())
    }

    /// Restore the saved game. On any error the current game is untouched.
    ///
    /// Returns the job analyzing the restored position, or `None` when that
    /// position is already decided.
    pub fn load(&mut self) -> Result<Option<PipelineJob>, LoadError> {
        let json = self
            .store
            .get(&self.save_key)?
            .ok_or(LoadError::NothingSaved)?;
        let snapshot =
            Snapshot::from_json(&json).map_err(|e| LoadError::Corrupt(e.to_string()))?;
        let position =
            Position::from_fen(&snapshot.fen).map_err(|e| LoadError::Corrupt(e.to_string()))?;
        let game = Game::replay(&snapshot.history, &position)
            .map_err(|e| LoadError::Corrupt(e.to_string()))?;

        self.game = game;
        if let Some(difficulty) = snapshot.difficulty {
            self.difficulty = difficulty;
        }
        info!(key = %self.save_key, plies = self.game.ply_count(), difficulty = %self.difficulty, "game loaded");
        self.engine_restart = true;
        self.invalidate();
        Ok(self.schedule())
    }

    pub fn view(&self) -> BoardView {
        let position = self.position();
        let advice = self.advice.clone();
        let highlight: Option<Highlight> = advice.advice().and_then(|a| a.highlight.clone());
        BoardView {
            fen: position.to_fen(),
            history: self.history(),
            last_move: self.last_move().map(str::to_string),
            turn: position.turn(),
            is_check: position.is_check(),
            is_checkmate: position.is_checkmate(),
            is_draw: self.game.is_draw(),
            difficulty: self.difficulty,
            analyzing: matches!(self.stage, Stage::AnalysisPending | Stage::AdvicePending),
            stage: self.stage,
            highlight,
            evaluation: self.evaluation.clone(),
            advice,
        }
    }
}
