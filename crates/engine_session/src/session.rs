//! The UCI session state machine.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tokio::process::Child;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::protocol::{parse_line, EngineLine, InfoTracker};
use crate::{Analysis, Analyzer, Connector, EngineError, EngineReader, EngineWriter};

/// How long to wait for `bestmove` after sending `stop`.
const STOP_GRACE: Duration = Duration::from_millis(500);

/// How long a killed engine gets to be reaped.
const EXIT_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Busy,
    Failed,
    Terminated,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Uninitialized,
            1 => Self::Initializing,
            2 => Self::Ready,
            3 => Self::Busy,
            4 => Self::Failed,
            _ => Self::Terminated,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Initializing => 1,
            Self::Ready => 2,
            Self::Busy => 3,
            Self::Failed => 4,
            Self::Terminated => 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub init_timeout: Duration,
    pub search_timeout: Duration,
    /// Sent as `setoption name <k> value <v>` during the handshake
    pub options: Vec<(String, String)>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(30),
            options: Vec::new(),
        }
    }
}

/// Pipes to a handshaken engine.
struct Link {
    reader: EngineReader,
    writer: EngineWriter,
    /// Bytes of a line not yet terminated, kept across timed-out reads
    pending: Vec<u8>,
    usable: bool,
}

impl Link {
    async fn send(&mut self, command: &str) -> Result<(), EngineError> {
        debug!(command, "-> engine");
        self.writer.write_all(command.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    fn new(reader: EngineReader, writer: EngineWriter) -> Self {
        Self {
            reader,
            writer,
            pending: Vec::new(),
            usable: true,
        }
    }

    // `read_until` leaves partial input in `pending` when the future is
    // dropped, so a timeout never splits a line.
    async fn read_line(&mut self) -> Result<EngineLine, EngineError> {
        let read = self.reader.read_until(b'\n', &mut self.pending).await?;
        if read == 0 && self.pending.is_empty() {
            return Err(EngineError::Closed);
        }
        let raw = std::mem::take(&mut self.pending);
        let text = String::from_utf8_lossy(&raw);
        let line = text.trim();
        debug!(line, "<- engine");
        Ok(parse_line(line))
    }

    /// Say `quit` if the engine still listens, then drop both pipes.
    async fn close(&mut self) {
        self.usable = false;
        if let Ok(Err(e)) = tokio::time::timeout(EXIT_GRACE, self.send("quit")).await {
            debug!(error = %e, "engine did not take quit");
        }
        self.reader = Box::new(tokio::io::empty());
        self.writer = Box::new(tokio::io::sink());
        self.pending.clear();
    }

    /// Read until `wanted`, collecting the engine name on the way.
    async fn read_until(&mut self, wanted: EngineLine) -> Result<Option<String>, EngineError> {
        let mut name = None;
        loop {
            match self.read_line().await? {
                EngineLine::IdName(n) => name = Some(n),
                line if line == wanted => return Ok(name),
                _ => {}
            }
        }
    }

    async fn handshake(&mut self, options: &[(String, String)]) -> Result<Option<String>, EngineError> {
        self.send("uci").await?;
        let name = self.read_until(EngineLine::UciOk).await?;
        for (option, value) in options {
            self.send(&format!("setoption name {option} value {value}"))
                .await?;
        }
        self.sync().await?;
        Ok(name)
    }

    async fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready").await?;
        self.read_until(EngineLine::ReadyOk).await.map(|_| ())
    }

    async fn read_bestmove(&mut self, tracker: &mut InfoTracker) -> Result<Option<String>, EngineError> {
        loop {
            match self.read_line().await? {
                EngineLine::Info(info) => tracker.update(&info),
                EngineLine::BestMove(mv) => return Ok(mv),
                _ => {}
            }
        }
    }

    async fn search(&mut self, fen: &str, depth: u8, limit: Duration) -> Result<Analysis, EngineError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        let mut tracker = InfoTracker::default();
        let first = tokio::time::timeout(limit, self.read_bestmove(&mut tracker)).await;
        let best = match first {
            Ok(result) => result?,
            Err(_) => {
                warn!(?limit, "search timed out, stopping engine");
                self.send("stop").await?;
                match tokio::time::timeout(STOP_GRACE, self.read_bestmove(&mut tracker)).await {
                    Ok(result) => result?,
                    Err(_) => return Err(EngineError::Timeout(limit)),
                }
            }
        };
        Ok(tracker.finish(best, depth))
    }
}

/// A lazily started UCI engine.
///
/// The first `analyze` (or [`UciSession::warm_up`]) spawns and handshakes the
/// engine; concurrent callers wait for that one attempt. Searches queue on an
/// async mutex so the engine only ever sees one `go` at a time.
pub struct UciSession {
    connector: Box<dyn Connector>,
    config: SessionConfig,
    /// `None` once initialization has failed
    link: OnceCell<Option<Mutex<Link>>>,
    child: Mutex<Option<Child>>,
    engine_name: OnceCell<String>,
    state: AtomicU8,
    terminated: AtomicBool,
}

impl UciSession {
    pub fn new(connector: impl Connector + 'static, config: SessionConfig) -> Self {
        Self {
            connector: Box::new(connector),
            config,
            link: OnceCell::new(),
            child: Mutex::new(None),
            engine_name: OnceCell::new(),
            state: AtomicU8::new(SessionState::Uninitialized.as_u8()),
            terminated: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: SessionState) {
        // Terminated is final
        if !self.terminated.load(Ordering::SeqCst) || state == SessionState::Terminated {
            self.state.store(state.as_u8(), Ordering::SeqCst);
        }
    }

    /// Start the engine now rather than on the first search.
    pub async fn warm_up(&self) -> Result<(), EngineError> {
        self.link().await.map(|_| ())
    }

    async fn link(&self) -> Result<&Mutex<Link>, EngineError> {
        if self.terminated.load(Ordering::SeqCst) {
            return Err(EngineError::Terminated);
        }
        self.link
            .get_or_init(|| self.start())
            .await
            .as_ref()
            .ok_or(EngineError::Unavailable)
    }

    async fn start(&self) -> Option<Mutex<Link>> {
        self.set_state(SessionState::Initializing);
        let limit = self.config.init_timeout;
        let deadline = tokio::time::Instant::now() + limit;

        let mut link = match tokio::time::timeout_at(deadline, self.connect()).await {
            Ok(Ok(link)) => link,
            Ok(Err(e)) => {
                warn!(engine = %self.connector.describe(), error = %e, "engine failed to start");
                return self.abandon_start(None).await;
            }
            Err(_) => {
                warn!(engine = %self.connector.describe(), timeout = ?limit, "engine did not start in time");
                return self.abandon_start(None).await;
            }
        };

        let handshake = tokio::time::timeout_at(deadline, link.handshake(&self.config.options)).await;
        match handshake {
            Ok(Ok(name)) => {
                let name = name.unwrap_or_else(|| self.connector.describe());
                info!(engine = %name, "engine ready");
                let _ = self.engine_name.set(name);
                self.set_state(SessionState::Ready);
                Some(Mutex::new(link))
            }
            Ok(Err(e)) => {
                warn!(engine = %self.connector.describe(), error = %e, "engine failed to initialize");
                self.abandon_start(Some(link)).await
            }
            Err(_) => {
                warn!(engine = %self.connector.describe(), timeout = ?limit, "engine handshake timed out");
                self.abandon_start(Some(link)).await
            }
        }
    }

    async fn connect(&self) -> Result<Link, EngineError> {
        let io = self.connector.connect().await?;
        *self.child.lock().await = io.child;
        Ok(Link::new(io.reader, io.writer))
    }

    async fn abandon_start(&self, link: Option<Link>) -> Option<Mutex<Link>> {
        if let Some(mut link) = link {
            link.close().await;
        }
        self.release_process().await;
        self.set_state(SessionState::Failed);
        None
    }

    /// Kill and reap the engine process, if this session spawned one.
    async fn release_process(&self) {
        let Some(mut child) = self.child.lock().await.take() else {
            return;
        };
        if let Err(e) = child.start_kill() {
            debug!(error = %e, "engine already exited");
        }
        match tokio::time::timeout(EXIT_GRACE, child.wait()).await {
            Ok(Ok(status)) => debug!(%status, "engine process exited"),
            Ok(Err(e)) => debug!(error = %e, "could not reap engine process"),
            Err(_) => warn!("engine process did not exit after kill"),
        }
    }

    /// Give up on a link that can no longer be trusted.
    async fn abandon_link(&self, link: &mut Link) {
        link.close().await;
        self.release_process().await;
        self.set_state(SessionState::Failed);
    }

    /// Like [`Analyzer::analyze`] but reports why no analysis was produced.
    pub async fn try_analyze(&self, fen: &str, depth: u8) -> Result<Analysis, EngineError> {
        let mut link = self.link().await?.lock().await;
        if self.terminated.load(Ordering::SeqCst) {
            return Err(EngineError::Terminated);
        }
        if !link.usable {
            return Err(EngineError::Unavailable);
        }

        self.set_state(SessionState::Busy);
        debug!(fen, depth, "search requested");
        let result = link.search(fen, depth, self.config.search_timeout).await;
        if result.is_ok() {
            self.set_state(SessionState::Ready);
        } else {
            self.abandon_link(&mut link).await;
        }

        if self.terminated.load(Ordering::SeqCst) {
            return Err(EngineError::Terminated);
        }
        result
    }

    /// Send `ucinewgame` and wait until the engine is ready again.
    pub async fn try_new_game(&self) -> Result<(), EngineError> {
        let mut link = self.link().await?.lock().await;
        if !link.usable {
            return Err(EngineError::Unavailable);
        }
        let result = async {
            link.send("ucinewgame").await?;
            tokio::time::timeout(self.config.init_timeout, link.sync())
                .await
                .map_err(|_| EngineError::Timeout(self.config.init_timeout))?
        }
        .await;
        if result.is_err() {
            self.abandon_link(&mut link).await;
        }
        result
    }
}

#[async_trait]
impl Analyzer for UciSession {
    async fn analyze(&self, fen: &str, depth: u8) -> Analysis {
        match self.try_analyze(fen, depth).await {
            Ok(analysis) => {
                debug!(best = %analysis.best_move, score = analysis.score, depth = analysis.depth, "search finished");
                analysis
            }
            Err(e) => {
                warn!(error = %e, "no engine analysis");
                Analysis::unavailable()
            }
        }
    }

    async fn new_game(&self) {
        if let Err(e) = self.try_new_game().await {
            debug!(error = %e, "ucinewgame skipped");
        }
    }

    async fn terminate(&self) {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return;
        }
        self.set_state(SessionState::Terminated);

        // An in-flight search holds the lock; killing the process ends it.
        if let Some(Some(link)) = self.link.get() {
            if let Ok(mut link) = link.try_lock() {
                link.close().await;
            }
        }
        self.release_process().await;
        info!("engine session terminated");
    }

    fn name(&self) -> String {
        self.engine_name
            .get()
            .cloned()
            .unwrap_or_else(|| self.connector.describe())
    }
}
