pub const DEFAULT_MEMORY_CELLS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Number of memory cells shared by globals, frames and the stack.
    pub memory_capacity: usize,
    /// Upper bound on executed instructions; `None` runs unbounded.
    pub step_limit: Option<u64>,
    /// Record a [`crate::TraceStep`] per executed instruction.
    pub trace: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            memory_capacity: DEFAULT_MEMORY_CELLS,
            step_limit: None,
            trace: false,
        }
    }
}

impl VmConfig {
    /// Defaults overridden by `LPDVM_MEMORY`, `LPDVM_MAX_STEPS` and `LPDVM_TRACE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            memory_capacity: get("LPDVM_MEMORY")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(d.memory_capacity),
            step_limit: get("LPDVM_MAX_STEPS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .or(d.step_limit),
            trace: get("LPDVM_TRACE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "on"))
                .unwrap_or(d.trace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| m.get(k).cloned()
    }

    #[test]
    fn empty_env_gives_defaults() {
        assert_eq!(VmConfig::from_lookup(lookup(&[])), VmConfig::default());
    }

    #[test]
    fn env_values_override() {
        let cfg = VmConfig::from_lookup(lookup(&[
            ("LPDVM_MEMORY", "64"),
            ("LPDVM_MAX_STEPS", "1000"),
            ("LPDVM_TRACE", "on"),
        ]));
        assert_eq!(cfg.memory_capacity, 64);
        assert_eq!(cfg.step_limit, Some(1000));
        assert!(cfg.trace);
    }

    #[test]
    fn garbage_falls_back() {
        let cfg = VmConfig::from_lookup(lookup(&[
            ("LPDVM_MEMORY", "lots"),
            ("LPDVM_MAX_STEPS", "-3"),
            ("LPDVM_TRACE", "maybe"),
        ]));
        assert_eq!(cfg.memory_capacity, DEFAULT_MEMORY_CELLS);
        assert_eq!(cfg.step_limit, None);
        assert!(!cfg.trace);
    }
}
