use api::{ForeignRuntime, GatewayError, NativeFunction, NativeValue};
use libloading::{Library, Symbol};
use log::{debug, trace};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::hosting::load_mono_library;
use crate::marshaling;
use crate::HostError;

/// Calls exports of a Mono runtime loaded into this process.
pub struct NativeRuntime {
    library: &'static Library,
    symbols: Mutex<HashMap<&'static str, usize>>,
}

impl NativeRuntime {
    pub fn new(library: &'static Library) -> Self {
        Self {
            library,
            symbols: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, HostError> {
        Ok(Self::new(load_mono_library(path)?))
    }

    /// Names from `functions` the loaded runtime does not export.
    pub fn missing_symbols(&self, functions: &[NativeFunction]) -> Vec<&'static str> {
        functions
            .iter()
            .filter(|function| self.symbol(function.name).is_err())
            .map(|function| function.name)
            .collect()
    }

    fn symbol(&self, name: &'static str) -> Result<usize, GatewayError> {
        let mut symbols = self.symbols.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(address) = symbols.get(name) {
            return Ok(*address);
        }

        let mut c_name = name.as_bytes().to_vec();
        c_name.push(0);
        // SAFETY: the symbol is only called through a signature declared for it.
        let symbol: Symbol<unsafe extern "C" fn()> = unsafe { self.library.get(&c_name) }
            .map_err(|e| {
                debug!("Failed to resolve {}: {}", name, e);
                GatewayError::UnresolvedSymbol(name.to_string())
            })?;
        let address = *symbol as usize;
        symbols.insert(name, address);
        trace!("Resolved {} at 0x{:X}", name, address);
        Ok(address)
    }
}

impl ForeignRuntime for NativeRuntime {
    fn call(&self, function: &NativeFunction, args: &[NativeValue]) -> Result<NativeValue, GatewayError> {
        function.check_args(args)?;
        let address = self.symbol(function.name)?;
        trace!("Calling {} with {:?}", function.name, args);
        // SAFETY: the export's C signature matches the declaration in `function`.
        unsafe { marshaling::invoke(address, function, args) }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use api::{Address, NativeType};

    fn this_process() -> &'static Library {
        Box::leak(Box::new(Library::from(libloading::os::unix::Library::this())))
    }

    #[test]
    fn test_missing_export() {
        let runtime = NativeRuntime::new(this_process());
        let function = NativeFunction::new("monobind_no_such_export", NativeType::Pointer, &[]);
        let result = runtime.call(&function, &[]);
        assert!(
            matches!(result, Err(GatewayError::UnresolvedSymbol(ref name)) if name == "monobind_no_such_export"),
            "Unexpected result: {:?}",
            result
        );
        assert_eq!(
            runtime.missing_symbols(&[function]),
            vec!["monobind_no_such_export"]
        );
    }

    #[test]
    fn test_arguments_checked_before_lookup() {
        let runtime = NativeRuntime::new(this_process());
        let function = NativeFunction::new(
            "monobind_no_such_export",
            NativeType::Pointer,
            &[NativeType::Pointer],
        );
        let result = runtime.call(&function, &[NativeValue::U32(1)]);
        assert!(matches!(result, Err(GatewayError::TypeMismatch { .. })));

        let result = runtime.call(&function, &[NativeValue::Pointer(Address::NULL)]);
        assert!(matches!(result, Err(GatewayError::UnresolvedSymbol(_))));
    }
}
