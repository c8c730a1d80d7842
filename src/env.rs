// ABOUTME: Flat environment with call-boundary snapshot/restore semantics

use crate::value::Value;
use std::collections::HashMap;

/// A single flat mapping from identifier to value.
///
/// rx has no lexical closures: a function call snapshots the caller's
/// environment, binds its parameters, runs, and restores the snapshot on
/// return — including any shadowing that happened inside the body. This
/// type makes that discipline explicit via `snapshot`/`restore` rather than
/// a parent-chain of scopes.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Creates or overwrites a binding (used by both `new` and bare `=`,
    /// which rx treats identically — see design notes).
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Captures the full state of this environment for later restoration.
    pub fn snapshot(&self) -> Environment {
        self.clone()
    }

    /// Restores a previously captured snapshot in place.
    pub fn restore(&mut self, snapshot: Environment) {
        *self = snapshot;
    }
}

/// Side-channel key-value store consulted before the environment during
/// identifier lookup (the `Save`/`Message` statements).
#[derive(Debug, Default, Clone)]
pub struct SaveSlots {
    slots: HashMap<String, Value>,
}

impl SaveSlots {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Creates the slot if absent, with an empty-string payload. A no-op if
    /// the slot already exists.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.slots.entry(name.into()).or_insert_with(|| Value::String(String::new()));
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.slots.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_get() {
        let mut env = Environment::new();
        env.bind("x", Value::Number(42.0));
        assert_eq!(env.get("x"), Some(&Value::Number(42.0)));
    }

    #[test]
    fn test_undefined_is_none() {
        let env = Environment::new();
        assert_eq!(env.get("missing"), None);
    }

    #[test]
    fn test_snapshot_restore_discards_new_bindings() {
        let mut env = Environment::new();
        env.bind("x", Value::Number(1.0));
        let snap = env.snapshot();

        env.bind("x", Value::Number(99.0));
        env.bind("y", Value::Number(2.0));

        env.restore(snap);
        assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_save_slot_declare_is_idempotent() {
        let mut slots = SaveSlots::new();
        slots.declare("result");
        slots.set("result", Value::Number(5.0));
        slots.declare("result");
        assert_eq!(slots.get("result"), Some(&Value::Number(5.0)));
    }
}
