use api::NativeValue;

use crate::natives::*;
use crate::registry::{foreign_handle, HandleKind};
use crate::{BindingError, MonoClass, MonoType};

/// `FIELD_ATTRIBUTE_STATIC`
const FIELD_ATTRIBUTE_STATIC: u32 = 0x0010;

foreign_handle!(
    /// A `MonoClassField*`.
    MonoClassField,
    HandleKind::Field
);

impl MonoClassField {
    fn arg(&self) -> [NativeValue; 1] {
        [NativeValue::Pointer(self.address())]
    }

    pub fn name(&self) -> Result<String, BindingError> {
        self.session()?.call_text(&MONO_FIELD_GET_NAME, &self.arg())
    }

    pub fn type_(&self) -> Result<Option<MonoType>, BindingError> {
        self.session()?.call_handle(&MONO_FIELD_GET_TYPE, &self.arg())
    }

    /// The class that declares this field.
    pub fn parent(&self) -> Result<Option<MonoClass>, BindingError> {
        self.session()?.call_handle(&MONO_FIELD_GET_PARENT, &self.arg())
    }

    /// Byte offset inside an instance, including the object header.
    pub fn offset(&self) -> Result<u32, BindingError> {
        self.session()?.call_u32(&MONO_FIELD_GET_OFFSET, &self.arg())
    }

    pub fn flags(&self) -> Result<u32, BindingError> {
        self.session()?.call_u32(&MONO_FIELD_GET_FLAGS, &self.arg())
    }

    pub fn is_static(&self) -> Result<bool, BindingError> {
        Ok(self.flags()? & FIELD_ATTRIBUTE_STATIC != 0)
    }
}
