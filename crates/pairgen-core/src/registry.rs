//! Name → strategy lookup table.
//!
//! Built once by explicit registration and read-only afterwards, so a shared
//! `&'static StrategyRegistry` can be read from any thread without locking.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::ConfigError;
use crate::strategies::all_strategies;
use crate::strategy::PairStrategy;

/// Registered strategies keyed by their stable name.
pub struct StrategyRegistry {
    strategies: BTreeMap<&'static str, Box<dyn PairStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Create a registry holding every built-in strategy.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for strategy in all_strategies() {
            if let Err(e) = registry.register(strategy) {
                log::error!("skipping built-in strategy: {e}");
            }
        }
        registry
    }

    /// Register a strategy under its `info().name`.
    pub fn register(&mut self, strategy: Box<dyn PairStrategy>) -> Result<(), ConfigError> {
        let name = strategy.name();
        if self.strategies.contains_key(name) {
            return Err(ConfigError::DuplicateStrategy(name.to_string()));
        }
        log::debug!("registered strategy '{name}'");
        self.strategies.insert(name, strategy);
        Ok(())
    }

    /// Look up a strategy. Unknown names are a configuration error; there is
    /// no default.
    pub fn get(&self, name: &str) -> Result<&dyn PairStrategy, ConfigError> {
        self.strategies
            .get(name)
            .map(|s| &**s)
            .ok_or_else(|| ConfigError::UnknownStrategy(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn PairStrategy> {
        self.strategies.values().map(|s| &**s)
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide registry of built-in strategies, built on first use.
pub fn registry() -> &'static StrategyRegistry {
    static REGISTRY: OnceLock<StrategyRegistry> = OnceLock::new();
    REGISTRY.get_or_init(StrategyRegistry::with_builtin)
}
