//! Bounded undo/redo history over [`GraphState`] snapshots.
//!
//! [`GraphHistory`] wraps the graph reducer with three extra commands (undo,
//! redo, reset) and a wholesale `Replace` used for preset loads and
//! hydration from storage. Snapshots are shared through [`Arc`], so moving a
//! state between stacks never copies the graph.
//!
//! Recording rules:
//!
//! - tracked graph actions push the old present onto `past` and clear
//!   `future`, unless the action was rejected or changed nothing
//! - untracked actions and navigation (`SelectNode`) replace the present only
//! - `Replace { track_history: false }` clears `future` and leaves `past` alone
//! - both stacks are bounded; overflow evicts the oldest entry

#[cfg(not(feature = "std"))]
use alloc::{collections::VecDeque, sync::Arc};
#[cfg(feature = "std")]
use std::{collections::VecDeque, sync::Arc};

use crate::graph::{GraphAction, GraphState};

/// Default depth of the undo and redo stacks.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// A command for [`GraphHistory::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    /// Applies a graph mutation.
    Graph {
        /// The mutation.
        action: GraphAction,
        /// Whether the change should be undoable.
        track_history: bool,
    },
    /// Steps back one snapshot.
    Undo,
    /// Steps forward one snapshot.
    Redo,
    /// Replaces the present with a default graph (undoable). Keeps the node limit.
    Reset,
    /// Replaces the present wholesale.
    Replace {
        /// The new present.
        state: GraphState,
        /// Whether the replacement should be undoable.
        track_history: bool,
    },
}

/// Undo/redo state machine around a present [`GraphState`].
#[derive(Debug, Clone)]
pub struct GraphHistory {
    past: VecDeque<Arc<GraphState>>,
    present: Arc<GraphState>,
    future: VecDeque<Arc<GraphState>>,
    limit: usize,
}

impl Default for GraphHistory {
    fn default() -> Self {
        Self::new(GraphState::default())
    }
}

impl GraphHistory {
    /// Creates a history with empty stacks and the default depth.
    pub fn new(initial: GraphState) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a history with a custom stack depth (at least 1).
    pub fn with_limit(initial: GraphState, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: Arc::new(initial.without_error()),
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// The current snapshot.
    pub fn present(&self) -> &GraphState {
        &self.present
    }

    /// The current snapshot as a shared handle.
    pub fn present_arc(&self) -> Arc<GraphState> {
        Arc::clone(&self.present)
    }

    /// Number of undoable steps.
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redoable steps.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Returns `true` if [`HistoryAction::Undo`] would do something.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns `true` if [`HistoryAction::Redo`] would do something.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Stack depth limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Applies a history command.
    pub fn apply(&mut self, action: HistoryAction) {
        match action {
            HistoryAction::Graph {
                action,
                track_history,
            } => self.apply_graph(&action, track_history),
            HistoryAction::Undo => {
                self.undo();
            }
            HistoryAction::Redo => {
                self.redo();
            }
            HistoryAction::Reset => self.reset(),
            HistoryAction::Replace {
                state,
                track_history,
            } => self.replace(state, track_history),
        }
    }

    /// Applies a tracked graph mutation.
    pub fn dispatch(&mut self, action: GraphAction) {
        self.apply_graph(&action, true);
    }

    fn apply_graph(&mut self, action: &GraphAction, track_history: bool) {
        let next = self.present.apply(action);

        if next.last_error().is_some() || !track_history || action.is_navigation() {
            self.present = Arc::new(next);
            return;
        }
        if next.same_graph(&self.present) {
            if self.present.last_error().is_some() {
                self.present = Arc::new(next);
            }
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("history_push: {} (depth {})", action.name(), self.past.len() + 1);

        let previous = core::mem::replace(&mut self.present, Arc::new(next));
        self.push_past(previous);
        self.future.clear();
    }

    /// Steps back one snapshot. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = core::mem::replace(&mut self.present, previous);
        self.future.push_front(Self::settled(current));
        self.future.truncate(self.limit);
        true
    }

    /// Steps forward one snapshot. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = core::mem::replace(&mut self.present, next);
        self.push_past(current);
        true
    }

    /// Replaces the present with a default graph, keeping the node limit.
    pub fn reset(&mut self) {
        let fresh = GraphState::new(self.present.node_limit());
        let current = core::mem::replace(&mut self.present, Arc::new(fresh));
        self.push_past(current);
        self.future.clear();
    }

    /// Replaces the present wholesale.
    ///
    /// Untracked replacement (hydration from storage) creates no undo step
    /// but still drops the redo stack.
    pub fn replace(&mut self, state: GraphState, track_history: bool) {
        let current = core::mem::replace(&mut self.present, Arc::new(state.without_error()));
        if track_history {
            self.push_past(current);
        }
        self.future.clear();
    }

    fn push_past(&mut self, state: Arc<GraphState>) {
        self.past.push_back(Self::settled(state));
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    /// Stacked snapshots never carry a stale error.
    fn settled(state: Arc<GraphState>) -> Arc<GraphState> {
        if state.last_error().is_some() {
            Arc::new(state.without_error())
        } else {
            state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphErrorCode, NodeKind};

    fn add(kind: NodeKind) -> GraphAction {
        GraphAction::AddNode {
            kind,
            x: 0.0,
            y: 0.0,
            id: None,
        }
    }

    #[test]
    fn tracked_action_is_undoable() {
        let mut history = GraphHistory::default();
        history.dispatch(add(NodeKind::Delay));
        assert_eq!(history.present().nodes().len(), 3);
        assert_eq!(history.past_len(), 1);

        assert!(history.undo());
        assert_eq!(history.present().nodes().len(), 2);
        assert_eq!(history.future_len(), 1);

        assert!(history.redo());
        assert_eq!(history.present().nodes().len(), 3);
        assert!(!history.redo());
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_noops() {
        let mut history = GraphHistory::default();
        let before = history.present().clone();
        history.apply(HistoryAction::Undo);
        history.apply(HistoryAction::Redo);
        assert_eq!(history.present(), &before);
    }

    #[test]
    fn rejected_action_sets_error_without_history() {
        let mut history = GraphHistory::default();
        history.dispatch(GraphAction::RemoveNode {
            node_id: "input".into(),
        });
        assert_eq!(
            history.present().last_error(),
            Some(GraphErrorCode::IoNodeRequired)
        );
        assert_eq!(history.past_len(), 0);
    }

    #[test]
    fn selection_is_never_recorded() {
        let mut history = GraphHistory::default();
        history.dispatch(GraphAction::SelectNode {
            node_id: Some("input".into()),
        });
        assert_eq!(history.present().selected_node_id(), Some("input"));
        assert_eq!(history.past_len(), 0);
    }

    #[test]
    fn untracked_action_keeps_future() {
        let mut history = GraphHistory::default();
        history.dispatch(add(NodeKind::Delay));
        history.undo();
        history.apply(HistoryAction::Graph {
            action: GraphAction::MoveNode {
                node_id: "input".into(),
                x: 1.0,
                y: 1.0,
            },
            track_history: false,
        });
        assert_eq!(history.past_len(), 0);
        assert_eq!(history.future_len(), 1);
    }

    #[test]
    fn tracked_action_clears_future() {
        let mut history = GraphHistory::default();
        history.dispatch(add(NodeKind::Delay));
        history.undo();
        history.dispatch(add(NodeKind::Reverb));
        assert_eq!(history.future_len(), 0);
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn reset_is_undoable_and_keeps_limit() {
        let mut history = GraphHistory::new(GraphState::new(12));
        history.dispatch(add(NodeKind::Chorus));
        history.apply(HistoryAction::Reset);
        assert_eq!(history.present().nodes().len(), 2);
        assert_eq!(history.present().node_limit(), 12);
        assert_eq!(history.past_len(), 2);
        history.undo();
        assert_eq!(history.present().nodes().len(), 3);
    }

    #[test]
    fn untracked_replace_creates_no_undo_step() {
        let mut history = GraphHistory::default();
        history.dispatch(add(NodeKind::Chorus));
        history.dispatch(add(NodeKind::Delay));
        history.undo();

        let loaded = GraphState::default().add_node(NodeKind::Eq, 0.0, 0.0);
        history.replace(loaded.clone(), false);
        assert_eq!(history.present(), &loaded);
        assert_eq!(history.past_len(), 1);
        assert_eq!(history.future_len(), 0);

        history.replace(GraphState::default(), true);
        assert_eq!(history.past_len(), 2);
    }

    #[test]
    fn stacks_are_bounded() {
        let mut history = GraphHistory::with_limit(GraphState::new(16), 3);
        for i in 0..6 {
            history.dispatch(GraphAction::MoveNode {
                node_id: "input".into(),
                x: i as f32 + 1.0,
                y: 0.0,
            });
        }
        assert_eq!(history.past_len(), 3);
        while history.undo() {}
        assert_eq!(history.present().node("input").map(|n| n.x), Some(3.0));
    }

    #[test]
    fn identical_tracked_result_is_noop() {
        let mut history = GraphHistory::default();
        history.dispatch(GraphAction::MoveNode {
            node_id: "input".into(),
            x: 80.0,
            y: 120.0,
        });
        assert_eq!(history.past_len(), 0);
    }
}
