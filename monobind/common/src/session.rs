use api::{Address, ForeignRuntime, NativeFunction, NativeValue, Scratch};
use log::{debug, info, warn};
use std::mem::size_of;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::config::SessionConfig;
use crate::iter::ForeignIter;
use crate::natives::{MONO_ERROR_CLEANUP, MONO_ERROR_GET_MESSAGE};
use crate::registry::{ForeignHandle, Registry};
use crate::{BindingError, ErrorDescriptor};

/// Size of the error object handed to checked lookups (`MonoError`).
const ERROR_SLOT_SIZE: usize = 13 * size_of::<usize>();

pub(crate) struct SessionInner {
    runtime: Arc<dyn ForeignRuntime>,
    registry: Registry,
    config: SessionConfig,
    attached: AtomicBool,
}

/// One attachment to a target runtime.
///
/// Owns the handle registry; every factory and getter goes through it.
/// Cheap to clone and safe to share between instrumentation callbacks.
#[derive(Clone)]
pub struct Session(Arc<SessionInner>);

impl Session {
    pub fn attach(runtime: Arc<dyn ForeignRuntime>, config: SessionConfig) -> Self {
        info!("Attaching session (cache policy {:?})", config.cache_policy);
        Self(Arc::new(SessionInner {
            registry: Registry::new(config.cache_policy),
            runtime,
            config,
            attached: AtomicBool::new(true),
        }))
    }

    pub(crate) fn from_inner(inner: Arc<SessionInner>) -> Self {
        Self(inner)
    }

    pub fn runtime(&self) -> &Arc<dyn ForeignRuntime> {
        &self.0.runtime
    }

    pub fn registry(&self) -> &Registry {
        &self.0.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.0.config
    }

    pub fn is_attached(&self) -> bool {
        self.0.attached.load(Ordering::SeqCst)
    }

    /// Drops every cached handle. Handles still held by callers fail with
    /// `Detached` from then on.
    pub fn detach(&self) {
        if self.0.attached.swap(false, Ordering::SeqCst) {
            let count = self.0.registry.len();
            self.0.registry.clear();
            info!("Session detached, released {} handles", count);
        }
    }

    /// Canonical handle for `address`. `None` for null, and for everything
    /// once the session is detached.
    pub fn resolve<H: ForeignHandle>(&self, address: Address) -> Option<H> {
        if !self.is_attached() {
            return None;
        }
        self.0.registry.resolve(&self.downgrade(), address)
    }

    fn downgrade(&self) -> Weak<SessionInner> {
        Arc::downgrade(&self.0)
    }

    /// Raw gateway call; no retries.
    pub fn invoke(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<NativeValue, BindingError> {
        if !self.is_attached() {
            return Err(BindingError::Detached);
        }
        Ok(self.0.runtime.call(function, args)?)
    }

    pub(crate) fn call_pointer(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<Address, BindingError> {
        Ok(self.invoke(function, args)?.into_pointer(function)?)
    }

    pub(crate) fn call_i32(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<i32, BindingError> {
        Ok(self.invoke(function, args)?.into_i32(function)?)
    }

    pub(crate) fn call_u32(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<u32, BindingError> {
        Ok(self.invoke(function, args)?.into_u32(function)?)
    }

    pub(crate) fn call_bool(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<bool, BindingError> {
        Ok(self.invoke(function, args)?.into_bool(function)?)
    }

    pub(crate) fn call_handle<H: ForeignHandle>(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<Option<H>, BindingError> {
        let address = self.call_pointer(function, args)?;
        Ok(self.resolve(address))
    }

    pub(crate) fn call_text(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<String, BindingError> {
        let address = self.call_pointer(function, args)?;
        self.read_text(address)
    }

    /// Decodes a NUL-terminated UTF-8 string; null reads as empty.
    pub(crate) fn read_text(&self, address: Address) -> Result<String, BindingError> {
        if address.is_null() {
            return Ok(String::new());
        }
        // SAFETY: `address` is a non-null string returned by the runtime.
        Ok(unsafe { self.0.runtime.read_utf8(address) }?)
    }

    pub(crate) fn alloc_utf8(&self, text: &str) -> Result<Scratch, BindingError> {
        Ok(self.0.runtime.alloc_utf8(text)?)
    }

    /// Starts one enumeration pass with a fresh cursor.
    pub(crate) fn enumerate<H: ForeignHandle>(
        &self,
        function: &'static NativeFunction,
        parent: Address,
    ) -> Result<ForeignIter<H>, BindingError> {
        let cursor = self.0.runtime.alloc(size_of::<usize>())?;
        Ok(ForeignIter::new(self.clone(), function, parent, cursor))
    }

    /// Runs a lookup whose last argument is an error slot.
    ///
    /// A non-zero error code fails the lookup even if a result came back.
    /// A clean slot with a null result is an ordinary miss.
    pub(crate) fn checked_lookup<H: ForeignHandle>(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<Option<H>, BindingError> {
        let slot = self.0.runtime.alloc(ERROR_SLOT_SIZE)?;
        let mut call_args = args.to_vec();
        call_args.push(NativeValue::Pointer(slot.address()));

        let primary = self.call_pointer(function, &call_args)?;
        // SAFETY: the slot is live scratch memory of ERROR_SLOT_SIZE bytes.
        let head = unsafe { self.0.runtime.read_pointer(slot.address()) }?;
        // `MonoError` starts with a 16-bit error code followed by 16-bit flags.
        let head = head.value().to_ne_bytes();
        let code = u16::from_ne_bytes([head[0], head[1]]);
        if code != 0 {
            let descriptor = self.describe_error(&slot, code);
            warn!("{} failed: {}", function.name, descriptor);
            return Err(BindingError::LookupFailed(descriptor));
        }
        Ok(self.resolve(primary))
    }

    fn describe_error(&self, slot: &Scratch, code: u16) -> ErrorDescriptor {
        let mut message = None;
        if self.0.config.decode_lookup_errors {
            let slot_arg = [NativeValue::Pointer(slot.address())];
            match self.call_text(&MONO_ERROR_GET_MESSAGE, &slot_arg) {
                Ok(text) if !text.is_empty() => message = Some(text),
                Ok(_) => {}
                Err(e) => debug!("Could not decode lookup error: {}", e),
            }
            if let Err(e) = self.invoke(&MONO_ERROR_CLEANUP, &slot_arg) {
                debug!("Could not release lookup error: {}", e);
            }
        }
        ErrorDescriptor { code, message }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("attached", &self.is_attached())
            .field("handles", &self.0.registry.len())
            .field("config", &self.0.config)
            .finish()
    }
}
