//! Ordered, index-addressed collection of bot configurations.
//!
//! The account service stores configurations as a positional list:
//! removing entry `i` shifts every later entry down by one. This wrapper
//! makes that contract explicit and turns out-of-range access into a typed
//! error instead of a panic. Callers must re-read indices after any
//! mutation rather than holding them across a delete.

use serde::{Deserialize, Serialize};

use super::config::BotConfig;
use crate::error::Error;

/// The user's configurations, addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotRoster {
    configs: Vec<BotConfig>,
}

impl BotRoster {
    pub fn new(configs: Vec<BotConfig>) -> Self {
        Self { configs }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&BotConfig, Error> {
        self.configs.get(index).ok_or(Error::IndexOutOfRange(index))
    }

    /// Append a configuration; it becomes addressable at `len() - 1`.
    pub fn push(&mut self, config: BotConfig) {
        self.configs.push(config);
    }

    /// Replace the configuration at `index` wholesale.
    pub fn replace(&mut self, index: usize, config: BotConfig) -> Result<(), Error> {
        match self.configs.get_mut(index) {
            Some(slot) => {
                *slot = config;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange(index)),
        }
    }

    /// Remove the configuration at `index`. Every entry after it shifts
    /// down by one position.
    pub fn remove(&mut self, index: usize) -> Result<BotConfig, Error> {
        if index >= self.configs.len() {
            return Err(Error::IndexOutOfRange(index));
        }
        Ok(self.configs.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BotConfig> {
        self.configs.iter()
    }

    pub fn as_slice(&self) -> &[BotConfig] {
        &self.configs
    }
}

impl IntoIterator for BotRoster {
    type Item = BotConfig;
    type IntoIter = std::vec::IntoIter<BotConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.configs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::StrategyType;

    fn roster() -> BotRoster {
        BotRoster::new(vec![
            BotConfig::default_for(StrategyType::Grid),
            BotConfig::default_for(StrategyType::MacdRsi),
            BotConfig::default_for(StrategyType::EmaScalping),
        ])
    }

    #[test]
    fn test_remove_shifts_later_indices() {
        let mut r = roster();
        let removed = r.remove(1).unwrap();
        assert_eq!(removed.strategy_type(), StrategyType::MacdRsi);

        // What used to live at index 2 is now at index 1.
        assert_eq!(r.len(), 2);
        assert_eq!(
            r.get(1).unwrap().strategy_type(),
            StrategyType::EmaScalping
        );
    }

    #[test]
    fn test_stale_index_is_rejected() {
        let mut r = roster();
        r.remove(2).unwrap();
        assert!(matches!(r.remove(2), Err(Error::IndexOutOfRange(2))));
        assert!(matches!(r.get(5), Err(Error::IndexOutOfRange(5))));
    }

    #[test]
    fn test_replace_in_place() {
        let mut r = roster();
        let toggled = r.get(0).unwrap().toggle_mode();
        r.replace(0, toggled).unwrap();
        assert!(r.get(0).unwrap().is_automated());

        let config = BotConfig::default_for(StrategyType::Grid);
        assert!(matches!(
            r.replace(3, config),
            Err(Error::IndexOutOfRange(3))
        ));
    }
}
