use api::NativeValue;
use log::debug;

use crate::natives::*;
use crate::registry::{foreign_handle, HandleKind};
use crate::{BindingError, MonoClass};

foreign_handle!(
    /// A `MonoType*`.
    MonoType,
    HandleKind::Type
);

impl MonoType {
    fn arg(&self) -> [NativeValue; 1] {
        [NativeValue::Pointer(self.address())]
    }

    /// Display name such as `System.Collections.Generic.List<System.Int32>`.
    pub fn name(&self) -> Result<String, BindingError> {
        let session = self.session()?;
        let address = session.call_pointer(&MONO_TYPE_GET_NAME, &self.arg())?;
        if address.is_null() {
            return Ok(String::new());
        }
        let name = session.read_text(address);
        // The runtime allocates this string for the caller.
        if let Err(e) = session.invoke(&MONO_FREE, &[address.into()]) {
            debug!("Could not free type name at {}: {}", address, e);
        }
        name
    }

    /// The `MONO_TYPE_*` element type code.
    pub fn type_code(&self) -> Result<i32, BindingError> {
        self.session()?.call_i32(&MONO_TYPE_GET_TYPE, &self.arg())
    }

    pub fn is_byref(&self) -> Result<bool, BindingError> {
        self.session()?.call_bool(&MONO_TYPE_IS_BYREF, &self.arg())
    }

    pub fn class(&self) -> Result<Option<MonoClass>, BindingError> {
        self.session()?.call_handle(&MONO_TYPE_GET_CLASS, &self.arg())
    }

    /// For enums, the integral type behind them; otherwise the type itself.
    pub fn underlying_type(&self) -> Result<Option<MonoType>, BindingError> {
        self.session()?
            .call_handle(&MONO_TYPE_GET_UNDERLYING_TYPE, &self.arg())
    }
}
