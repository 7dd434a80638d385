//! Declared accessor tables.

use crate::context::ExecutionContext;
use crate::errors::{BindingError, ChainError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Whether an accessor reads from or writes to the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Takes no argument, returns the stored value.
    Read,
    /// Takes one value, returns nothing.
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// One declared accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Accessor name, e.g. `get_credit_result`.
    pub accessor: String,
    /// Scratch key it reads or writes.
    pub key: String,
    /// Direction.
    pub direction: Direction,
}

/// A validated set of accessor bindings for one handler.
#[derive(Debug, Clone)]
pub struct BindingTable {
    owner: String,
    bindings: HashMap<String, Binding>,
}

impl BindingTable {
    /// Starts declaring bindings for `owner`.
    #[must_use]
    pub fn builder(owner: impl Into<String>) -> BindingTableBuilder {
        BindingTableBuilder {
            owner: owner.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the owning handler name.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the binding for an accessor.
    #[must_use]
    pub fn get(&self, accessor: &str) -> Option<&Binding> {
        self.bindings.get(accessor)
    }

    /// Returns the number of bound accessors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound. Built tables are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the keys read by this handler.
    #[must_use]
    pub fn read_keys(&self) -> Vec<&str> {
        self.keys_with(Direction::Read)
    }

    /// Returns the keys written by this handler.
    #[must_use]
    pub fn write_keys(&self) -> Vec<&str> {
        self.keys_with(Direction::Write)
    }

    fn keys_with(&self, direction: Direction) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .values()
            .filter(|b| b.direction == direction)
            .map(|b| b.key.as_str())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    fn lookup(&self, accessor: &str, requested: Direction) -> Result<&Binding, BindingError> {
        let binding = self.bindings.get(accessor).ok_or_else(|| BindingError::Unknown {
            accessor: accessor.to_string(),
        })?;

        if binding.direction != requested {
            return Err(BindingError::WrongDirection {
                accessor: accessor.to_string(),
                declared: binding.direction.to_string(),
                requested: requested.to_string(),
            });
        }

        Ok(binding)
    }

    /// Invokes a read accessor.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Binding` if the accessor is unknown or is a
    /// write, and `ChainError::Serialization` if the stored value has the
    /// wrong shape.
    pub fn read<T, D>(&self, ctx: &ExecutionContext<D>, accessor: &str) -> Result<Option<T>, ChainError>
    where
        T: DeserializeOwned,
    {
        let binding = self.lookup(accessor, Direction::Read)?;
        ctx.read_raw(&binding.key)
    }

    /// Invokes a write accessor.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Binding` if the accessor is unknown or is a
    /// read, and `ChainError::Serialization` if `value` can't be serialized.
    pub fn write<T, D>(
        &self,
        ctx: &mut ExecutionContext<D>,
        accessor: &str,
        value: T,
    ) -> Result<(), ChainError>
    where
        T: Serialize,
    {
        let binding = self.lookup(accessor, Direction::Write)?;
        ctx.write_raw(&binding.key, &value)
    }
}

/// Builder for [`BindingTable`].
#[derive(Debug, Clone)]
pub struct BindingTableBuilder {
    owner: String,
    entries: Vec<Binding>,
}

impl BindingTableBuilder {
    /// Declares a read accessor for `key`.
    #[must_use]
    pub fn read(self, accessor: impl Into<String>, key: impl Into<String>) -> Self {
        self.declare(accessor, key, Direction::Read)
    }

    /// Declares a write accessor for `key`.
    #[must_use]
    pub fn write(self, accessor: impl Into<String>, key: impl Into<String>) -> Self {
        self.declare(accessor, key, Direction::Write)
    }

    fn declare(mut self, accessor: impl Into<String>, key: impl Into<String>, direction: Direction) -> Self {
        self.entries.push(Binding {
            accessor: accessor.into(),
            key: key.into(),
            direction,
        });
        self
    }

    /// Validates the declarations and builds the table.
    ///
    /// # Errors
    ///
    /// - `BindingError::Empty` if nothing was declared
    /// - `BindingError::Invalid` for a blank accessor name or key
    /// - `BindingError::Conflict` if an accessor is both a read and a write
    /// - `BindingError::Duplicate` if an accessor is declared twice
    pub fn build(self) -> Result<BindingTable, BindingError> {
        if self.entries.is_empty() {
            return Err(BindingError::Empty { owner: self.owner });
        }

        let mut bindings: HashMap<String, Binding> = HashMap::with_capacity(self.entries.len());
        for entry in self.entries {
            if entry.accessor.trim().is_empty() {
                return Err(BindingError::Invalid {
                    reason: format!("blank accessor name in '{}'", self.owner),
                });
            }
            if entry.key.trim().is_empty() {
                return Err(BindingError::Invalid {
                    reason: format!("accessor '{}' has a blank context key", entry.accessor),
                });
            }

            if let Some(existing) = bindings.get(&entry.accessor) {
                return Err(if existing.direction == entry.direction {
                    BindingError::Duplicate {
                        accessor: entry.accessor,
                    }
                } else {
                    BindingError::Conflict {
                        accessor: entry.accessor,
                    }
                });
            }

            bindings.insert(entry.accessor.clone(), entry);
        }

        Ok(BindingTable {
            owner: self.owner,
            bindings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn credit_table() -> BindingTable {
        BindingTable::builder("CreditHandlers")
            .write("set_credit_result", "creditResult")
            .read("get_credit_result", "creditResult")
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_table() {
        let table = credit_table();
        assert_eq!(table.owner(), "CreditHandlers");
        assert_eq!(table.len(), 2);
        assert_eq!(table.read_keys(), vec!["creditResult"]);
        assert_eq!(table.write_keys(), vec!["creditResult"]);
        assert_eq!(table.get("get_credit_result").unwrap().direction, Direction::Read);
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = BindingTable::builder("Nothing").build().unwrap_err();
        assert_eq!(err, BindingError::Empty { owner: "Nothing".to_string() });
    }

    #[test]
    fn test_read_and_write_conflict() {
        let err = BindingTable::builder("Broken")
            .read("score", "score")
            .write("score", "score")
            .build()
            .unwrap_err();

        assert_eq!(err, BindingError::Conflict { accessor: "score".to_string() });
    }

    #[test]
    fn test_duplicate_declaration() {
        let err = BindingTable::builder("Broken")
            .read("score", "a")
            .read("score", "b")
            .build()
            .unwrap_err();

        assert!(matches!(err, BindingError::Duplicate { .. }));
    }

    #[test]
    fn test_blank_key_rejected() {
        let err = BindingTable::builder("Broken")
            .read("score", "  ")
            .build()
            .unwrap_err();

        assert!(matches!(err, BindingError::Invalid { .. }));
    }

    #[test]
    fn test_write_then_read_through_table() {
        let table = credit_table();
        let mut ctx: ExecutionContext<()> = ExecutionContext::new();

        let before: Option<String> = table.read(&ctx, "get_credit_result").unwrap();
        assert_eq!(before, None);

        table.write(&mut ctx, "set_credit_result", "SUCCESS").unwrap();
        let after: Option<String> = table.read(&ctx, "get_credit_result").unwrap();
        assert_eq!(after, Some("SUCCESS".to_string()));
    }

    #[test]
    fn test_wrong_direction() {
        let table = credit_table();
        let mut ctx: ExecutionContext<()> = ExecutionContext::new();

        let err = table.write(&mut ctx, "get_credit_result", 1).unwrap_err();
        assert!(matches!(
            err,
            ChainError::Binding(BindingError::WrongDirection { .. })
        ));
    }

    #[test]
    fn test_unknown_accessor() {
        let table = credit_table();
        let ctx: ExecutionContext<()> = ExecutionContext::new();

        let err = table.read::<u32, _>(&ctx, "get_missing").unwrap_err();
        assert!(matches!(err, ChainError::Binding(BindingError::Unknown { .. })));
    }
}
