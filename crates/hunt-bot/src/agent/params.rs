use crate::policy::Strategy;

pub const DEFAULT_MAX_ACTIONS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentParams {
    pub strategy: Strategy,
    /// Movements plus examinations allowed before the hunt is abandoned.
    pub max_actions: u64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }
}

impl AgentParams {
    pub const fn new(strategy: Strategy, max_actions: u64) -> Self {
        Self {
            strategy,
            max_actions,
        }
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base = Self::default();
        let strategy = read("HUNT_STRATEGY")
            .and_then(|raw| raw.parse::<Strategy>().ok())
            .unwrap_or(base.strategy);
        let max_actions = read("HUNT_MAX_ACTIONS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(base.max_actions);

        Self {
            strategy,
            max_actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn reader(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AgentParams::from_reader(|_| None), AgentParams::default());
    }

    #[test]
    fn reads_overrides() {
        let params = AgentParams::from_reader(reader(&[
            ("HUNT_STRATEGY", "detection"),
            ("HUNT_MAX_ACTIONS", " 500 "),
        ]));
        assert_eq!(params, AgentParams::new(Strategy::Detection, 500));
    }

    #[test]
    fn ignores_invalid_values() {
        let params = AgentParams::from_reader(reader(&[
            ("HUNT_STRATEGY", "teleport"),
            ("HUNT_MAX_ACTIONS", "0"),
        ]));
        assert_eq!(params, AgentParams::default());
    }
}
