//! The `quizforge delete` command.

use std::path::PathBuf;

use anyhow::Result;

use crate::commands::open_store;

pub fn execute(id: u64, config_path: Option<PathBuf>, store: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path.as_deref(), store)?;
    anyhow::ensure!(store.delete(id)?, "test {id} not found");
    println!("Test {id} deleted");
    Ok(())
}
