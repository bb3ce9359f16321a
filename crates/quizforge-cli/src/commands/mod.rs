pub mod delete;
pub mod evaluate;
pub mod generate;
pub mod init;
pub mod list;
pub mod providers;
pub mod update;

use std::path::{Path, PathBuf};

use anyhow::Result;

use quizforge_providers::config::load_config_from;

use crate::store::TestStore;

/// Open the store named on the command line, or the configured one.
pub(crate) fn open_store(config_path: Option<&Path>, store: Option<PathBuf>) -> Result<TestStore> {
    let path = match store {
        Some(path) => path,
        None => load_config_from(config_path)?.store_path,
    };
    Ok(TestStore::open(path))
}
