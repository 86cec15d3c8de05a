//! Terminal rendering of results, history, completions and state changes

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use lsp_types::{CompletionItem, CompletionItemKind};
use querybench_core::QueryResult;
use querybench_query::{CANCELLED_MESSAGE, QueryHistoryEntry, SessionId, SessionSnapshot};
use std::sync::Arc;

const SQL_PREVIEW_CHARS: usize = 60;

/// Something worth telling the user after the published state changed
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Running(SessionId),
    Result(Arc<QueryResult>),
    Failed(String),
    Cancelled,
}

/// Compare two consecutive snapshots and list what the user should see
pub fn notices(previous: &SessionSnapshot, next: &SessionSnapshot) -> Vec<Notice> {
    let mut notices = Vec::new();

    if let Some(id) = next.active_session {
        if previous.active_session != Some(id) {
            notices.push(Notice::Running(id));
        }
    }

    if let Some(result) = &next.current_result {
        let unchanged = previous
            .current_result
            .as_ref()
            .is_some_and(|prev| Arc::ptr_eq(prev, result));
        if !unchanged {
            notices.push(Notice::Result(result.clone()));
        }
    }

    if let Some(error) = &next.current_error {
        if previous.current_error.as_ref() != Some(error) || history_grew(previous, next) {
            if error == CANCELLED_MESSAGE {
                notices.push(Notice::Cancelled);
            } else {
                notices.push(Notice::Failed(error.clone()));
            }
        }
    }

    notices
}

// The same error text twice in a row is still two failures.
fn history_grew(previous: &SessionSnapshot, next: &SessionSnapshot) -> bool {
    match (previous.history.first(), next.history.first()) {
        (Some(prev), Some(next)) => prev.id != next.id,
        (None, Some(_)) => true,
        _ => false,
    }
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Running(id) => format!("running query {}", id),
        Notice::Result(result) => render_result(result),
        Notice::Failed(error) => format!("error: {}", error),
        Notice::Cancelled => CANCELLED_MESSAGE.to_string(),
    }
}

pub fn render_result(result: &QueryResult) -> String {
    let summary = format!(
        "{} row{} in {} ms",
        result.total_rows,
        if result.total_rows == 1 { "" } else { "s" },
        result.execution_time_ms
    );

    if result.columns.is_empty() {
        return summary;
    }

    let mut table = new_table();
    table.set_header(result.columns.clone());
    for row in &result.rows {
        table.add_row(row.iter().map(cell_text).collect::<Vec<_>>());
    }

    format!("{}\n{}", table, summary)
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn render_history(entries: &[QueryHistoryEntry]) -> String {
    if entries.is_empty() {
        return "history is empty".to_string();
    }

    let mut table = new_table();
    table.set_header(vec!["#", "executed", "duration", "rows", "status", "sql"]);
    for (idx, entry) in entries.iter().enumerate() {
        let status = match &entry.error_message {
            Some(error) if !entry.success => format!("error: {}", preview(error)),
            _ => "ok".to_string(),
        };
        table.add_row(vec![
            (idx + 1).to_string(),
            entry.executed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{} ms", entry.duration_ms),
            entry
                .row_count
                .map(|count| count.to_string())
                .unwrap_or_default(),
            status,
            preview(&entry.sql),
        ]);
    }
    table.to_string()
}

pub fn render_completions(items: &[CompletionItem]) -> String {
    if items.is_empty() {
        return "no suggestions".to_string();
    }

    items
        .iter()
        .map(|item| {
            let kind = match item.kind {
                Some(CompletionItemKind::KEYWORD) => "keyword",
                Some(CompletionItemKind::CLASS) => "table",
                Some(CompletionItemKind::FIELD) => "column",
                _ => "",
            };
            match &item.detail {
                Some(detail) => format!("{:<8} {}  ({})", kind, item.label, detail),
                None => format!("{:<8} {}", kind, item.label),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_list(title: &str, values: &[String]) -> String {
    if values.is_empty() {
        return format!("no {}", title);
    }
    values.join("\n")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn preview(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > SQL_PREVIEW_CHARS {
        let cut: String = single_line.chars().take(SQL_PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        single_line
    }
}
