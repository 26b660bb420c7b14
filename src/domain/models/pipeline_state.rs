//! Pipeline lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the question-answering pipeline.
///
/// `Uninitialized → Loading → Ready ⇄ Answering`, with `Failed` reachable
/// from `Loading` only. There is no way back from `Ready` to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Uninitialized,
    Loading,
    Ready,
    Answering,
    Failed,
}

impl PipelineState {
    /// Whether `self → next` is a legal transition
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Loading)
                | (Self::Loading, Self::Ready | Self::Failed)
                | (Self::Ready, Self::Answering)
                | (Self::Answering, Self::Ready)
        )
    }

    /// `Failed` is the only terminal state
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Answering => "answering",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
