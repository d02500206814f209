use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DeckSource};

pub const DEFAULT_PAIRS: usize = 8;
pub const DEFAULT_RESOLVE_DELAY_MS: u64 = 1000;
pub const DEFAULT_HIGH_SCORE_KEY: &str = "hiscore";

/// Settings for a [`Controller`](crate::Controller), usually read from a
/// JSON file and then overridden from the command line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of pairs, [`DEFAULT_PAIRS`] when absent.
    pub pairs: Option<usize>,
    /// How long two face-up cards stay visible before they are compared.
    pub resolve_delay_ms: u64,
    /// RNG seed. A random seed is picked when absent.
    pub seed: Option<u64>,
    /// Play with these labels instead of random colors.
    pub labels: Option<Vec<String>>,
    pub high_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pairs: None,
            resolve_delay_ms: DEFAULT_RESOLVE_DELAY_MS,
            seed: None,
            labels: None,
            high_score_key: String::from(DEFAULT_HIGH_SCORE_KEY),
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    pub fn resolve_delay(&self) -> Duration {
        Duration::from_millis(self.resolve_delay_ms)
    }

    /// Validates the deck settings.
    ///
    /// With labels, `pairs` must either be absent or agree with the number
    /// of labels.
    pub fn deck_source(&self) -> Result<DeckSource, ConfigError> {
        match (&self.labels, self.pairs) {
            (Some(labels), Some(pairs)) if pairs != labels.len() => {
                Err(ConfigError::PairsDisagreeWithLabels {
                    pairs,
                    labels: labels.len(),
                })
            }
            (Some(labels), _) => Ok(DeckSource::labels(labels.clone())?),
            (None, pairs) => Ok(DeckSource::random_colors(pairs.unwrap_or(DEFAULT_PAIRS))?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeckError;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: GameConfig = serde_json::from_str(r#"{ "pairs": 4 }"#).unwrap();
        assert_eq!(config.pairs, Some(4));
        assert_eq!(config.resolve_delay(), Duration::from_millis(1000));
        assert_eq!(config.high_score_key, "hiscore");
        assert_eq!(config.deck_source().unwrap().pair_count(), 4);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<GameConfig>(r#"{ "pears": 4 }"#).is_err());
    }

    #[test]
    fn labels_decide_the_pair_count() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "labels": ["sun", "moon", "star"] }"#).unwrap();
        assert_eq!(config.deck_source().unwrap().pair_count(), 3);

        let agreeing = GameConfig {
            pairs: Some(3),
            ..config.clone()
        };
        assert_eq!(agreeing.deck_source().unwrap().pair_count(), 3);

        for pairs in [5, DEFAULT_PAIRS] {
            let config = GameConfig {
                pairs: Some(pairs),
                ..config.clone()
            };
            assert_eq!(
                config.deck_source(),
                Err(ConfigError::PairsDisagreeWithLabels { pairs, labels: 3 })
            );
        }
    }

    #[test]
    fn missing_pairs_means_the_default() {
        let config = GameConfig::default();
        assert_eq!(config.pairs, None);
        assert_eq!(config.deck_source().unwrap().pair_count(), DEFAULT_PAIRS);
    }

    #[test]
    fn invalid_decks_are_reported() {
        let config = GameConfig {
            pairs: Some(0),
            ..GameConfig::default()
        };
        assert_eq!(
            config.deck_source(),
            Err(ConfigError::InvalidDeck(DeckError::NoPairs))
        );
    }
}
