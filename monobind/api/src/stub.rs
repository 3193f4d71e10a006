//! Scripted in-process runtime for tests and dry runs.
//!
//! Handlers are registered per native function name. Calls to names without
//! a handler fail the same way a missing export does on a real target.

use std::collections::HashMap;
use std::ffi::CString;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::trace;

use crate::{Address, ForeignRuntime, GatewayError, LocalMemory, NativeFunction, NativeValue};

type Handler = Arc<dyn Fn(&[NativeValue]) -> Result<NativeValue, GatewayError> + Send + Sync>;

#[derive(Default)]
pub struct StubRuntime {
    handlers: RwLock<HashMap<String, Handler>>,
    calls: Mutex<HashMap<String, usize>>,
    strings: Mutex<Vec<CString>>,
}

impl StubRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs (or replaces) the handler for `name`.
    pub fn on<F>(&self, name: &str, handler: F)
    where
        F: Fn(&[NativeValue]) -> Result<NativeValue, GatewayError> + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::new(handler));
    }

    pub fn returns(&self, name: &str, value: NativeValue) {
        self.on(name, move |_| Ok(value));
    }

    /// Keeps `text` alive for the lifetime of the stub and returns its address.
    pub fn intern(&self, text: &str) -> Result<Address, GatewayError> {
        let text = CString::new(text).map_err(|_| GatewayError::InvalidText)?;
        let address = Address::from_ptr(text.as_ptr());
        self.strings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
        Ok(address)
    }

    /// Makes `name` return `text`. Text with an interior NUL makes every call
    /// to `name` fail with `InvalidText` instead.
    pub fn returns_text(&self, name: &str, text: &str) {
        match self.intern(text) {
            Ok(address) => self.returns(name, NativeValue::Pointer(address)),
            Err(_) => self.on(name, |_| Err(GatewayError::InvalidText)),
        }
    }

    /// Serves `items` through the cursor protocol: the second argument is a
    /// pointer to a word holding the position, and null ends the sequence.
    pub fn sequence(&self, name: &str, items: Vec<Address>) {
        self.on(name, move |args| {
            let cursor = match args.get(1) {
                Some(NativeValue::Pointer(cursor)) if !cursor.is_null() => *cursor,
                _ => return Ok(NativeValue::Pointer(Address::NULL)),
            };
            // SAFETY: the cursor is scratch memory allocated for this call.
            let position = unsafe { LocalMemory::read_word(cursor) }.value();
            match items.get(position) {
                Some(item) => {
                    unsafe { LocalMemory::write_word(cursor, position + 1) };
                    Ok(NativeValue::Pointer(*item))
                }
                None => Ok(NativeValue::Pointer(Address::NULL)),
            }
        });
    }

    /// Returns `primary` and writes `descriptor` into the error slot passed as
    /// the last argument.
    pub fn checked(&self, name: &str, primary: Address, descriptor: usize) {
        self.on(name, move |args| {
            if let Some(NativeValue::Pointer(slot)) = args.last() {
                if !slot.is_null() {
                    // SAFETY: the slot is scratch memory allocated for this call.
                    unsafe { LocalMemory::write_word(*slot, descriptor) };
                }
            }
            Ok(NativeValue::Pointer(primary))
        });
    }

    /// Number of calls made to `name` so far.
    pub fn calls(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }
}

impl ForeignRuntime for StubRuntime {
    fn call(
        &self,
        function: &NativeFunction,
        args: &[NativeValue],
    ) -> Result<NativeValue, GatewayError> {
        function.check_args(args)?;

        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(function.name)
            .cloned()
            .ok_or_else(|| GatewayError::UnresolvedSymbol(function.name.to_string()))?;

        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(function.name.to_string())
            .or_default() += 1;

        trace!("stub call {}({:?})", function.name, args);
        let result = handler(args)?;
        if result.kind() != function.ret {
            return Err(function.mismatch(format!("stub returned {:?}", result)));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NativeType, Scratch};

    const GET_NAME: NativeFunction =
        NativeFunction::new("mono_class_get_name", NativeType::Pointer, &[NativeType::Pointer]);
    const NEXT: NativeFunction = NativeFunction::new(
        "mono_class_get_interfaces",
        NativeType::Pointer,
        &[NativeType::Pointer, NativeType::Pointer],
    );

    #[test]
    fn test_unknown_function_is_unresolved() {
        let stub = StubRuntime::new();
        let result = stub.call(&GET_NAME, &[NativeValue::Pointer(Address::new(1))]);
        assert!(matches!(result, Err(GatewayError::UnresolvedSymbol(name)) if name == "mono_class_get_name"));
    }

    #[test]
    fn test_text_and_call_counting() {
        let stub = StubRuntime::new();
        stub.returns_text("mono_class_get_name", "Object");

        let result = stub.call(&GET_NAME, &[NativeValue::Pointer(Address::new(1))]).unwrap();
        let address = result.into_pointer(&GET_NAME).unwrap();
        assert_eq!(unsafe { stub.read_utf8(address) }.unwrap(), "Object");
        assert_eq!(stub.calls("mono_class_get_name"), 1);
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let stub = StubRuntime::new();
        assert!(matches!(stub.intern("Sys\0tem"), Err(GatewayError::InvalidText)));

        stub.returns_text("mono_class_get_name", "Obj\0ect");
        let result = stub.call(&GET_NAME, &[NativeValue::Pointer(Address::new(1))]);
        assert!(matches!(result, Err(GatewayError::InvalidText)));
    }

    #[test]
    fn test_sequence_uses_cursor_word() {
        let stub = StubRuntime::new();
        stub.sequence("mono_class_get_interfaces", vec![Address::new(0x10), Address::new(0x20)]);

        let cursor = Scratch::zeroed(std::mem::size_of::<usize>());
        let parent = NativeValue::Pointer(Address::new(1));
        let mut seen = Vec::new();
        loop {
            let next = stub
                .call(&NEXT, &[parent, NativeValue::Pointer(cursor.address())])
                .unwrap()
                .into_pointer(&NEXT)
                .unwrap();
            if next.is_null() {
                break;
            }
            seen.push(next);
        }
        assert_eq!(seen, vec![Address::new(0x10), Address::new(0x20)]);
        assert_eq!(cursor.first_word(), 2);
    }

    #[test]
    fn test_wrong_return_kind_is_mismatch() {
        let stub = StubRuntime::new();
        stub.returns("mono_class_get_name", NativeValue::I32(3));
        let result = stub.call(&GET_NAME, &[NativeValue::Pointer(Address::new(1))]);
        assert!(matches!(result, Err(GatewayError::TypeMismatch { .. })));
    }
}
