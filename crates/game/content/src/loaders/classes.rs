//! Class roster loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::ClassDefinition;
use crate::loaders::{LoadResult, read_file};

/// Class roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRoster {
    pub classes: Vec<ClassDefinition>,
}

/// Loader for the class roster from RON files.
pub struct ClassLoader;

impl ClassLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ClassDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ClassDefinition>> {
        let roster: ClassRoster = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse class roster RON: {}", e))?;

        for class in &roster.classes {
            if class.stats.max_hp == 0 {
                anyhow::bail!("Class '{}' must have positive max_hp", class.id);
            }
        }

        Ok(roster.classes)
    }
}
