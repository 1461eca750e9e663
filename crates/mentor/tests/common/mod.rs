//! Scripted collaborators for driving a `Mentor` in tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chess_mentor::{MemoryStore, Mentor};
use chess_rules::MoveProposal;
use engine_session::{Analysis, Analyzer};
use mentor_advice::{Advice, AdviceError, AdviceRequest, AdviceSource, Highlight};
use tokio::sync::{Mutex as AsyncMutex, Notify};

/// Answers every search with the next queued analysis (or `e7e5`).
///
/// Like a real engine it does one thing at a time: a held search keeps
/// `new_game` waiting too.
#[derive(Default)]
pub struct FakeEngine {
    pub calls: Mutex<Vec<(String, u8)>>,
    journal: Mutex<Vec<&'static str>>,
    replies: Mutex<VecDeque<Analysis>>,
    busy: AsyncMutex<()>,
    hold: AtomicBool,
    release: Notify,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_with(&self, analysis: Analysis) {
        self.replies.lock().unwrap().push_back(analysis);
    }

    /// Make searches wait for [`FakeEngine::release_one`].
    pub fn hold(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release_one(&self) {
        self.release.notify_one();
    }

    pub fn calls(&self) -> Vec<(String, u8)> {
        self.calls.lock().unwrap().clone()
    }

    /// `"analyze"` and `"new_game"` in the order the engine took them.
    pub fn journal(&self) -> Vec<&'static str> {
        self.journal.lock().unwrap().clone()
    }

    /// Yield until `count` searches have reached the engine.
    pub async fn wait_for_searches(&self, count: usize) {
        for _ in 0..1000 {
            if self.calls.lock().unwrap().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("only {} searches started", self.calls().len());
    }
}

#[async_trait]
impl Analyzer for FakeEngine {
    async fn analyze(&self, fen: &str, depth: u8) -> Analysis {
        let _busy = self.busy.lock().await;
        self.journal.lock().unwrap().push("analyze");
        self.calls.lock().unwrap().push((fen.to_string(), depth));
        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Analysis {
            best_move: "e7e5".to_string(),
            score: 30,
            depth,
            mate: None,
        })
    }

    async fn new_game(&self) {
        let _busy = self.busy.lock().await;
        self.journal.lock().unwrap().push("new_game");
    }
}

/// Records requests and echoes the engine move back as advice.
#[derive(Default)]
pub struct FakeAdvisor {
    pub requests: Mutex<Vec<AdviceRequest>>,
    fail: AtomicBool,
}

impl FakeAdvisor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let advisor = Self::default();
        advisor.fail.store(true, Ordering::SeqCst);
        Arc::new(advisor)
    }

    pub fn requests(&self) -> Vec<AdviceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn advice_for(best_move: &str) -> Advice {
    Advice {
        text: format!("Play {best_move}."),
        best_move_san: best_move.to_string(),
        strategic_explanation: "Because the engine says so.".to_string(),
        is_checkmate_sequence: false,
        highlight: Highlight::from_coordinate_move(best_move),
    }
}

#[async_trait]
impl AdviceSource for FakeAdvisor {
    async fn request_advice(&self, request: &AdviceRequest) -> Result<Advice, AdviceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AdviceError::NoCandidates);
        }
        Ok(advice_for(&request.best_move))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub struct Harness {
    pub mentor: Mentor,
    pub engine: Arc<FakeEngine>,
    pub advisor: Arc<FakeAdvisor>,
    pub store: MemoryStore,
}

pub fn harness() -> Harness {
    harness_with(FakeEngine::new(), FakeAdvisor::new(), MemoryStore::new())
}

pub fn harness_with(engine: Arc<FakeEngine>, advisor: Arc<FakeAdvisor>, store: MemoryStore) -> Harness {
    let mentor = Mentor::new(engine.clone(), advisor.clone(), Box::new(store.clone()));
    Harness {
        mentor,
        engine,
        advisor,
        store,
    }
}

pub fn mv(text: &str) -> MoveProposal {
    text.parse().unwrap()
}

/// Play coordinate moves, dropping their pipeline jobs.
pub fn play(mentor: &mut Mentor, moves: &[&str]) {
    for m in moves {
        mentor.propose_move(&mv(m)).unwrap();
    }
}
