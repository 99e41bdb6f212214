// Text and JSON rendering of a workflow store

use anyhow::Result;
use std::fmt::Write as _;

use crate::workflow::{State, WorkflowStore};

fn state_marker(state: State) -> &'static str {
    match state {
        State::Pending => "⏳",
        State::InProgress => "🔄",
        State::Completed => "✅",
    }
}

/// Human-readable checklist view
pub fn render_text(store: &WorkflowStore) -> String {
    let progress = store.progress();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "📋 {} [{}] {} {}",
        store.workflow_name(),
        store.workflow_id(),
        state_marker(store.workflow_state()),
        store.workflow_state()
    );
    let _ = writeln!(
        out,
        "   {}/{} actions, {}/{} tasks ({}%)",
        progress.completed_actions,
        progress.total_actions,
        progress.completed_tasks,
        progress.total_tasks,
        progress.percent()
    );
    out.push('\n');

    let snapshot = store.snapshot();
    for task in &snapshot.tasks {
        let lock = if task.available { "" } else { " 🔒 locked" };
        let _ = writeln!(
            out,
            "{}. {} [{}] {} {}{}",
            task.rank,
            task.name,
            task.id,
            state_marker(task.state),
            task.state,
            lock
        );
        for action in &task.actions {
            let check = if action.completed { "[x]" } else { "[ ]" };
            let _ = writeln!(out, "   {} {} {}", check, action.id, action.name);
        }
    }

    if store.workflow_state() == State::Completed {
        out.push_str("\n🎉 Workflow complete\n");
    }
    out
}

pub fn render_json(store: &WorkflowStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&store.snapshot())?)
}

pub fn render(store: &WorkflowStore, json: bool) -> Result<String> {
    if json {
        render_json(store)
    } else {
        Ok(render_text(store))
    }
}
