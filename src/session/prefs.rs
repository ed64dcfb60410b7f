//! Key/value preference storage.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{SharecardError, SharecardResult};

/// Persistent string preferences.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> SharecardResult<Option<String>>;
    fn store(&mut self, key: &str, value: &str) -> SharecardResult<()>;
}

/// In-process store; nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self, key: &str) -> SharecardResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> SharecardResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object on disk.
#[derive(Clone, Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> SharecardResult<BTreeMap<String, String>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read preferences '{}'", self.path.display()))
                    .into());
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse preferences '{}'", self.path.display()))
            .map_err(SharecardError::from)
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn load(&self, key: &str) -> SharecardResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn store(&mut self, key: &str, value: &str) -> SharecardResult<()> {
        // A corrupt file is replaced rather than blocking the new value.
        let mut all = self.read_all().unwrap_or_default();
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create preferences dir '{}'", parent.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(&all).context("serialize preferences")?;
        std::fs::write(&tmp, body)
            .with_context(|| format!("write preferences '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace preferences '{}'", self.path.display()))?;
        Ok(())
    }
}
