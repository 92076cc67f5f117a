use serde::{Deserialize, Serialize};

use crate::utils::{ControlsError, Result};

/// One playable entry of a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Display label, e.g. "EP01"
    pub label: String,
    pub url: String,
}

/// Ordered episodes of a catalog item.
///
/// Catalog entries carry their sources packed into one string of the form
/// `label$url#label$url#...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeList {
    episodes: Vec<Episode>,
}

impl EpisodeList {
    pub fn new(episodes: Vec<Episode>) -> Self {
        Self { episodes }
    }

    pub fn parse(packed: &str) -> Result<Self> {
        let episodes = packed
            .split('#')
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (label, url) = entry
                    .split_once('$')
                    .ok_or_else(|| ControlsError::MalformedEpisode(entry.to_string()))?;
                if url.is_empty() {
                    return Err(ControlsError::MalformedEpisode(entry.to_string()));
                }
                Ok(Episode {
                    label: label.to_string(),
                    url: url.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { episodes })
    }

    pub fn get(&self, index: usize) -> Result<&Episode> {
        self.episodes
            .get(index)
            .ok_or(ControlsError::EpisodeOutOfRange {
                index,
                len: self.episodes.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter()
    }

    /// Whether an episode follows `index`
    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.episodes.len()
    }
}
