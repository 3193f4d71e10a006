use api::Address;
use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::config::CachePolicy;
use crate::session::{Session, SessionInner};
use crate::BindingError;

/// The kinds of native entity a handle can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Class,
    Type,
    Image,
    Field,
    GenericParam,
}

/// Shared identity behind every handle: the address plus a way back to the
/// session that resolved it.
pub struct HandleCell {
    address: Address,
    session: Weak<SessionInner>,
}

impl HandleCell {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn session(&self) -> Result<Session, BindingError> {
        self.session
            .upgrade()
            .map(Session::from_inner)
            .ok_or(BindingError::Detached)
    }
}

/// Capability shared by every handle type.
pub trait ForeignHandle: Clone + Sized {
    const KIND: HandleKind;

    fn address(&self) -> Address;

    #[doc(hidden)]
    fn from_cell(cell: Arc<HandleCell>) -> Self;
}

enum Slot {
    Strong(Arc<HandleCell>),
    Weak(Weak<HandleCell>),
}

impl Slot {
    fn live(&self) -> Option<Arc<HandleCell>> {
        match self {
            Slot::Strong(cell) => Some(cell.clone()),
            Slot::Weak(cell) => cell.upgrade(),
        }
    }
}

/// Smallest map size that triggers a sweep of dead weak slots.
const MIN_SWEEP_SIZE: usize = 64;

struct Slots {
    map: HashMap<(HandleKind, Address), Slot>,
    /// Size at which the next insert sweeps dead slots first.
    sweep_at: usize,
}

impl Slots {
    fn retain_live(&mut self) -> usize {
        let before = self.map.len();
        self.map.retain(|_, slot| slot.live().is_some());
        self.sweep_at = (self.map.len() * 2).max(MIN_SWEEP_SIZE);
        before - self.map.len()
    }
}

/// Maps `(kind, address)` to the one live handle for it.
pub struct Registry {
    policy: CachePolicy,
    slots: Mutex<Slots>,
}

impl Registry {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            slots: Mutex::new(Slots {
                map: HashMap::new(),
                sweep_at: MIN_SWEEP_SIZE,
            }),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the canonical handle for `address`, or `None` for null.
    pub(crate) fn resolve<H: ForeignHandle>(
        &self,
        session: &Weak<SessionInner>,
        address: Address,
    ) -> Option<H> {
        if address.is_null() {
            return None;
        }

        let key = (H::KIND, address);
        let mut slots = self.lock();
        if let Some(cell) = slots.map.get(&key).and_then(Slot::live) {
            return Some(H::from_cell(cell));
        }

        let cell = Arc::new(HandleCell {
            address,
            session: session.clone(),
        });
        let slot = match self.policy {
            CachePolicy::Strong => Slot::Strong(cell.clone()),
            CachePolicy::Weak => {
                // Dead weak slots only go away here, so sweep as the map grows.
                if slots.map.len() >= slots.sweep_at {
                    let removed = slots.retain_live();
                    trace!("Swept {} released handles", removed);
                }
                Slot::Weak(Arc::downgrade(&cell))
            }
        };
        slots.map.insert(key, slot);
        trace!("Registered {:?} handle at {}", H::KIND, address);
        Some(H::from_cell(cell))
    }

    pub fn contains(&self, kind: HandleKind, address: Address) -> bool {
        self.lock()
            .map
            .get(&(kind, address))
            .is_some_and(|slot| slot.live().is_some())
    }

    /// Number of handles that are still alive.
    pub fn len(&self) -> usize {
        self.lock()
            .map
            .values()
            .filter(|slot| slot.live().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in the map, including released weak slots not yet swept.
    pub fn slot_count(&self) -> usize {
        self.lock().map.len()
    }

    /// Drops entries whose handles have all been released. Returns how many
    /// were removed.
    pub fn purge(&self) -> usize {
        self.lock().retain_live()
    }

    pub fn clear(&self) {
        let mut slots = self.lock();
        slots.map.clear();
        slots.sweep_at = MIN_SWEEP_SIZE;
    }

    // Inserts are single map operations, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Declares a handle type backed by a registry cell.
macro_rules! foreign_handle {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(std::sync::Arc<$crate::registry::HandleCell>);

        impl $crate::registry::ForeignHandle for $name {
            const KIND: $crate::registry::HandleKind = $kind;

            fn address(&self) -> api::Address {
                self.0.address()
            }

            fn from_cell(cell: std::sync::Arc<$crate::registry::HandleCell>) -> Self {
                Self(cell)
            }
        }

        impl $name {
            pub fn address(&self) -> api::Address {
                self.0.address()
            }

            /// Wraps `address` in its canonical handle; `None` for null.
            pub fn from_address(session: &$crate::Session, address: api::Address) -> Option<Self> {
                session.resolve(address)
            }

            pub fn session(&self) -> Result<$crate::Session, $crate::BindingError> {
                self.0.session()
            }

            pub fn ptr_eq(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.ptr_eq(other)
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<S: std::hash::Hasher>(&self, state: &mut S) {
                std::hash::Hash::hash(&self.0.address(), state);
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0.address())
            }
        }
    };
}

pub(crate) use foreign_handle;
