use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::State;

/// What caused a state assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionCause {
    /// An action was toggled and its task's state re-derived
    Toggle { action: String },
    /// `update_state` called by an adapter
    Direct,
    /// First completed action moved the workflow out of `Pending`
    Progress,
    /// A transition rule fired; `index` is its registration position
    Rule { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub component: String,
    pub from: State,
    pub to: State,
    pub cause: TransitionCause,
    /// 0 for the directly requested change, +1 per rule hop
    pub depth: usize,
    pub timestamp: DateTime<Utc>,
}

/// Bounded audit trail of applied state changes
#[derive(Debug, Clone)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    limit: usize,
    enabled: bool,
}

impl TransitionHistory {
    pub fn new(enabled: bool, limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
            enabled,
        }
    }

    pub(crate) fn record(&mut self, record: TransitionRecord) {
        if !self.enabled || self.limit == 0 {
            return;
        }
        if self.records.len() == self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    /// Records touching one component, oldest first
    pub fn for_component<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a TransitionRecord> + 'a {
        self.records.iter().filter(move |r| r.component == component)
    }
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::new(true, 256)
    }
}
