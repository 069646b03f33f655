//! The dispatch registry
//!
//! Maps `(operation name, signature)` to an implementation and resolves calls
//! by the runtime types of their arguments.
//!
//! # Lifecycle
//!
//! Backends populate the registry once at startup through
//! [`DispatchRegistry::install`]. Later registrations are still safe: the
//! table map lives behind `RwLock<Arc<..>>` and every write builds a new map
//! and swaps it in, so a reader either sees the table before or after a
//! registration, never half of one. [`DispatchRegistry::call`] holds the lock
//! only long enough to clone the `Arc`.
//!
//! # Selection
//!
//! Among the entries whose signature accepts the call, the registry picks the
//! unique entry that no other candidate outranks for the keywords the call
//! supplied (see [`crate::pattern`]). If there is more than one such entry
//! the call fails with [`Error::AmbiguousDispatch`]; declaration order is
//! never consulted.

use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::pattern::Signature;
use crate::value::{CallArgs, Returned, Value};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A registered implementation
pub type Implementation = Arc<dyn Fn(&CallArgs) -> Result<Returned> + Send + Sync>;

/// A backend that contributes implementations to a registry
pub trait Backend: Send + Sync {
    /// Name of this backend, used in logs
    fn backend_name(&self) -> &'static str;

    /// Register every implementation this backend provides
    fn register(&self, registry: &DispatchRegistry) -> Result<()>;
}

#[derive(Clone)]
struct Entry {
    signature: Signature,
    implementation: Implementation,
}

#[derive(Clone, Default)]
struct DispatchTable {
    entries: Vec<Entry>,
}

impl DispatchTable {
    fn select(&self, operation: &str, args: &CallArgs) -> Result<&Entry> {
        let candidates: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.signature.accepts(
                    args.positional().iter().map(Value::type_id),
                    args.keywords()
                        .iter()
                        .map(|(name, value)| (name.as_str(), value.type_id())),
                )
            })
            .collect();

        if candidates.is_empty() {
            return Err(Error::NoMatchingImplementation {
                operation: operation.to_string(),
                arguments: args.describe(),
            });
        }

        let supplied: BTreeSet<&str> = args.keywords().keys().map(String::as_str).collect();
        let maximal: Vec<&Entry> = candidates
            .iter()
            .filter(|entry| {
                !candidates
                    .iter()
                    .any(|other| other.signature.outranks(&entry.signature, &supplied))
            })
            .copied()
            .collect();

        match maximal.as_slice() {
            [entry] => Ok(entry),
            _ => {
                let candidates: Vec<String> =
                    maximal.iter().map(|e| e.signature.to_string()).collect();
                log::warn!(
                    "ambiguous dispatch for `{operation}` with ({}): {candidates:?}",
                    args.describe()
                );
                Err(Error::AmbiguousDispatch {
                    operation: operation.to_string(),
                    arguments: args.describe(),
                    candidates,
                })
            }
        }
    }
}

/// A pair of entries that some call would match with equal specificity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ambiguity {
    pub operation: String,
    pub first: String,
    pub second: String,
    /// Calls accepted by both entries
    pub overlap: String,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` entries {} and {} tie on {}",
            self.operation, self.first, self.second, self.overlap
        )
    }
}

type Tables = HashMap<String, Arc<DispatchTable>>;

/// Table of implementations keyed by operation name and signature
#[derive(Default)]
pub struct DispatchRegistry {
    tables: RwLock<Arc<Tables>>,
}

impl DispatchRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry populated by `backends`, in order
    ///
    /// Fails with [`Error::Configuration`] if the installed entries tie for
    /// any call, so conflicts surface at setup rather than at call time.
    pub fn with_backends(backends: &[&dyn Backend]) -> Result<Self> {
        let registry = Self::new();
        for backend in backends {
            registry.install(*backend)?;
        }
        let ambiguities = registry.ambiguities();
        if !ambiguities.is_empty() {
            let listed: Vec<String> = ambiguities.iter().map(ToString::to_string).collect();
            return Err(Error::Configuration(format!(
                "{} ambiguous registration(s): {}",
                listed.len(),
                listed.join("; ")
            )));
        }
        Ok(registry)
    }

    /// Let `backend` register its implementations
    pub fn install(&self, backend: &dyn Backend) -> Result<()> {
        let before = self.len();
        backend.register(self)?;
        log::debug!(
            "backend `{}` registered {} implementations",
            backend.backend_name(),
            self.len() - before
        );
        Ok(())
    }

    /// Associate `implementation` with `signature` under `operation`
    ///
    /// Fails with [`Error::DuplicateRegistration`] if an identical signature
    /// is already present, and with [`Error::InvalidRegistration`] if
    /// `operation` is a built-in whose arity differs from the signature's.
    pub fn register<F>(
        &self,
        operation: impl AsRef<str>,
        signature: Signature,
        implementation: F,
    ) -> Result<()>
    where
        F: Fn(&CallArgs) -> Result<Returned> + Send + Sync + 'static,
    {
        let name = operation.as_ref();
        if let Ok(op) = name.parse::<Operation>() {
            if op.arity() != signature.arity() {
                return Err(Error::InvalidRegistration {
                    operation: name.to_string(),
                    reason: format!(
                        "expected {} positional patterns, got {} in {signature}",
                        op.arity(),
                        signature.arity()
                    ),
                });
            }
        }

        let mut guard = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let mut table = guard
            .get(name)
            .map(|t| DispatchTable::clone(t))
            .unwrap_or_default();

        if table.entries.iter().any(|e| e.signature.same_as(&signature)) {
            return Err(Error::DuplicateRegistration {
                operation: name.to_string(),
                signature: signature.to_string(),
            });
        }

        log::debug!("registered `{name}` for {signature}");
        table.entries.push(Entry {
            signature,
            implementation: Arc::new(implementation),
        });

        let mut next = Tables::clone(&guard);
        next.insert(name.to_string(), Arc::new(table));
        *guard = Arc::new(next);
        Ok(())
    }

    /// Invoke the most specific implementation of `operation` for `args`
    pub fn call(&self, operation: impl AsRef<str>, args: &CallArgs) -> Result<Returned> {
        let name = operation.as_ref();
        let tables = self.snapshot();
        let table = tables
            .get(name)
            .ok_or_else(|| Error::NoMatchingImplementation {
                operation: name.to_string(),
                arguments: args.describe(),
            })?;
        let entry = table.select(name, args)?;
        log::trace!("dispatching `{name}` to {}", entry.signature);
        (entry.implementation)(args)
    }

    /// Signature that [`call`](Self::call) would select, without invoking it
    pub fn resolve(&self, operation: impl AsRef<str>, args: &CallArgs) -> Result<Signature> {
        let name = operation.as_ref();
        let tables = self.snapshot();
        let table = tables
            .get(name)
            .ok_or_else(|| Error::NoMatchingImplementation {
                operation: name.to_string(),
                arguments: args.describe(),
            })?;
        table.select(name, args).map(|e| e.signature.clone())
    }

    /// Names of all operations with at least one entry, sorted
    pub fn operations(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered signatures of `operation`, in registration order
    pub fn signatures(&self, operation: impl AsRef<str>) -> Vec<Signature> {
        self.snapshot()
            .get(operation.as_ref())
            .map(|t| t.entries.iter().map(|e| e.signature.clone()).collect())
            .unwrap_or_default()
    }

    /// Whether `operation` has at least one entry
    pub fn contains(&self, operation: impl AsRef<str>) -> bool {
        self.snapshot().contains_key(operation.as_ref())
    }

    /// Total number of entries across all operations
    pub fn len(&self) -> usize {
        self.snapshot().values().map(|t| t.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pairs of entries that would tie for some call
    ///
    /// Every combination of the pair's designated keywords is a possible call
    /// shape. Two entries conflict when, for some shape, they accept common
    /// calls, neither outranks the other, and no third entry accepts that
    /// whole overlap while outranking both. Run by
    /// [`with_backends`](Self::with_backends); call it again after adding
    /// entries by hand.
    pub fn ambiguities(&self) -> Vec<Ambiguity> {
        let tables = self.snapshot();
        let mut names: Vec<&String> = tables.keys().collect();
        names.sort();

        let mut found = Vec::new();
        for name in names {
            let entries = &tables[name].entries;
            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    if let Some(overlap) = unresolved_overlap(entries, &a.signature, &b.signature) {
                        found.push(Ambiguity {
                            operation: name.clone(),
                            first: a.signature.to_string(),
                            second: b.signature.to_string(),
                            overlap: overlap.to_string(),
                        });
                    }
                }
            }
        }
        found
    }

    fn snapshot(&self) -> Arc<Tables> {
        Arc::clone(&self.tables.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// First call shape on which `a` and `b` tie with nothing to break the tie
fn unresolved_overlap(entries: &[Entry], a: &Signature, b: &Signature) -> Option<Signature> {
    let designated: Vec<&'static str> = a.keyword_names(b).collect();
    (0..1usize << designated.len()).find_map(|mask| {
        let supplied: BTreeSet<&str> = designated
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, name)| *name)
            .collect();
        let overlap = a.intersect_for(b, &supplied)?;
        if a.outranks(b, &supplied) || b.outranks(a, &supplied) {
            return None;
        }
        let resolved = entries.iter().any(|c| {
            overlap.is_narrower_or_equal_for(&c.signature, &supplied)
                && c.signature.outranks(a, &supplied)
                && c.signature.outranks(b, &supplied)
        });
        (!resolved).then_some(overlap)
    })
}

impl fmt::Debug for DispatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.snapshot();
        let mut counts: Vec<(&String, usize)> =
            tables.iter().map(|(k, t)| (k, t.entries.len())).collect();
        counts.sort();
        f.debug_struct("DispatchRegistry")
            .field("operations", &counts)
            .finish()
    }
}
