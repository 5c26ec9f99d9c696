//! Scoped variable storage
//!
//! One global scope plus a stack of local scopes. Lookup searches locals
//! innermost-to-outermost, then globals. Writes follow the same precedence;
//! a name bound nowhere is created in the innermost local scope
//! (permissive-create, the documented choice for the multi-scope model).

use indexmap::{IndexMap, IndexSet};

use crate::error::{Error, Result};
use crate::value::Value;

/// Scoped key-value storage for script variables
#[derive(Debug)]
pub struct VariableStore {
    globals: IndexMap<String, Value>,
    /// Innermost scope last. Starts with a single placeholder frame; the
    /// current system never pushes or pops further scopes.
    locals: Vec<IndexMap<String, Value>>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self {
            globals: IndexMap::new(),
            locals: vec![IndexMap::new()],
        }
    }

    /// Seed the global scope from a program's template.
    pub fn seed_globals(&mut self, template: &IndexMap<String, Value>) {
        for (name, value) in template {
            self.globals.insert(name.clone(), value.clone());
        }
    }

    /// Resolve a name, locals innermost-first then globals.
    pub fn load(&self, name: &str) -> Result<&Value> {
        self.lookup(name).ok_or_else(|| Error::unbound(name))
    }

    /// Batched resolution for template expansion. If any names miss, the
    /// error lists every unresolved name.
    pub fn load_many(&self, names: &IndexSet<String>) -> Result<IndexMap<String, Value>> {
        let mut resolved = IndexMap::new();
        let mut missing = Vec::new();
        for name in names {
            match self.lookup(name) {
                Some(value) => {
                    resolved.insert(name.clone(), value.clone());
                }
                None => missing.push(name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(Error::UnboundVariable { names: missing })
        }
    }

    /// Write a value. Precedence: innermost local binding, then globals,
    /// then create in the innermost local scope.
    pub fn save(&mut self, name: &str, value: Value) {
        for scope in self.locals.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return;
            }
        }
        if let Some(slot) = self.globals.get_mut(name) {
            *slot = value;
            return;
        }
        // Unbound anywhere: new binding in the innermost local scope.
        let innermost = self
            .locals
            .last_mut()
            .expect("store invariant: at least one local scope");
        innermost.insert(name.to_string(), value);
    }

    /// Read-only view of the global scope.
    pub fn globals(&self) -> &IndexMap<String, Value> {
        &self.globals
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.locals
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(pairs: &[(&str, Value)]) -> VariableStore {
        let mut store = VariableStore::new();
        let template: IndexMap<String, Value> =
            pairs.iter().map(|(n, v)| (n.to_string(), v.clone())).collect();
        store.seed_globals(&template);
        store
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = VariableStore::new();
        store.save("mood", Value::from("wary"));
        assert_eq!(store.load("mood").unwrap(), &Value::from("wary"));
    }

    #[test]
    fn test_template_globals_visible_before_write() {
        let store = seeded(&[("coins", Value::Integer(5))]);
        assert_eq!(store.load("coins").unwrap(), &Value::Integer(5));
    }

    #[test]
    fn test_write_prefers_existing_global() {
        let mut store = seeded(&[("coins", Value::Integer(5))]);
        store.save("coins", Value::Integer(7));
        assert_eq!(store.globals().get("coins"), Some(&Value::Integer(7)));
    }

    #[test]
    fn test_unbound_write_creates_local_not_global() {
        let mut store = VariableStore::new();
        store.save("scratch", Value::Boolean(true));
        assert_eq!(store.load("scratch").unwrap(), &Value::Boolean(true));
        assert!(store.globals().get("scratch").is_none());
    }

    #[test]
    fn test_local_shadows_global_on_read() {
        let mut store = seeded(&[("coins", Value::Integer(5))]);
        // A local binding with the same name wins on lookup.
        store.save("scratch", Value::Integer(0));
        store.locals.last_mut().unwrap().insert("coins".to_string(), Value::Integer(99));
        assert_eq!(store.load("coins").unwrap(), &Value::Integer(99));
    }

    #[test]
    fn test_load_miss() {
        let store = VariableStore::new();
        let err = store.load("ghost").unwrap_err();
        assert!(matches!(err, Error::UnboundVariable { names } if names == vec!["ghost"]));
    }

    #[test]
    fn test_load_many_lists_every_miss() {
        let store = seeded(&[("coins", Value::Integer(5))]);
        let names: IndexSet<String> = ["coins", "ghost", "wraith"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = store.load_many(&names).unwrap_err();
        match err {
            Error::UnboundVariable { names } => assert_eq!(names, vec!["ghost", "wraith"]),
            other => panic!("expected UnboundVariable, got {other:?}"),
        }
    }
}
