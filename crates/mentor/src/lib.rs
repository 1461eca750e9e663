//! Chess mentor: the orchestration core.
//!
//! A [`Mentor`] owns the game. Moves are validated and applied synchronously;
//! each accepted move yields a [`PipelineJob`] that asks the engine for the
//! best move at the current [`Difficulty`] depth and then asks the advice
//! source to explain it. Finished jobs are handed back through
//! [`Mentor::complete`], which ignores any that no longer match the board.
//!
//! ```ignore
//! let accepted = mentor.propose_move(&"e2e4".parse()?)?;
//! if let Some(job) = accepted.job {
//!     let outcome = job.run().await;
//!     mentor.complete(outcome);
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod mentor;
pub mod persistence;
pub mod pipeline;
pub mod view;

pub use command::{parse_move_text, Command, CommandError};
pub use config::*;
pub use error::*;
pub use mentor::*;
pub use persistence::*;
pub use pipeline::*;
pub use view::{format_history, BoardView};

pub use mentor_advice::Difficulty;
