//! Identity tokens for reference-opted instances.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Identity of one instance: its address plus its runtime type.
///
/// The type is part of the key so that a value and its first field, which
/// share an address, stay distinct. Zero-sized values have no identity:
/// distinct instances may share an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_id: TypeId,
}

impl Identity {
    pub fn of(instance: &dyn Any) -> Option<Self> {
        if std::mem::size_of_val(instance) == 0 {
            return None;
        }
        Some(Self {
            address: (instance as *const dyn Any).cast::<()>() as usize,
            type_id: Any::type_id(instance),
        })
    }
}

/// Assigns `i1`, `i2`, ... to instances in first-visit order.
#[derive(Debug, Default)]
pub struct ReferenceTracker {
    tokens: HashMap<Identity, String>,
}

impl ReferenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token assigned to `identity` on an earlier visit.
    pub fn token_of(&self, identity: &Identity) -> Option<&str> {
        self.tokens.get(identity).map(String::as_str)
    }

    /// Assigns the next token.
    ///
    /// # Panics
    ///
    /// If `identity` already has a token.
    pub fn assign(&mut self, identity: Identity) -> String {
        assert!(
            !self.tokens.contains_key(&identity),
            "instance {identity:?} already has a reference token"
        );
        let token = format!("i{}", self.tokens.len() + 1);
        self.tokens.insert(identity, token.clone());
        token
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}
