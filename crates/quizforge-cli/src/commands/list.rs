//! The `quizforge list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde_json::{json, Value};

use quizforge_core::extract::question_set_from_value;

use crate::commands::open_store;
use crate::store::TestRecord;

const INVALID_PAYLOAD: &str = "invalid questions payload";

pub fn execute(as_json: bool, config_path: Option<PathBuf>, store: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path.as_deref(), store)?;
    let tests = store.list()?;

    if as_json {
        let entries: Vec<Value> = tests.iter().map(to_json).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if tests.is_empty() {
        println!("No tests stored yet. Create one with `quizforge generate`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Questions", "Created"]);
    for test in &tests {
        let questions = match question_count(test) {
            Some(n) => n.to_string(),
            None => INVALID_PAYLOAD.to_string(),
        };
        table.add_row(vec![
            Cell::new(test.id),
            Cell::new(&test.title),
            Cell::new(questions),
            Cell::new(test.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn question_count(test: &TestRecord) -> Option<usize> {
    let value: Value = serde_json::from_str(&test.questions).ok()?;
    question_set_from_value(&value)
        .ok()
        .map(|set| set.questions.len())
}

/// Stored text is parsed back into JSON; unreadable payloads are flagged
/// instead of failing the whole listing.
fn to_json(test: &TestRecord) -> Value {
    let questions = serde_json::from_str::<Value>(&test.questions)
        .unwrap_or_else(|_| json!({ "error": INVALID_PAYLOAD }));
    json!({
        "id": test.id,
        "title": test.title,
        "questions": questions,
        "created_at": test.created_at,
    })
}
