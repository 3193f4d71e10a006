use api::NativeValue;

use crate::natives::*;
use crate::registry::{foreign_handle, HandleKind};
use crate::{BindingError, MonoClass, Session};

/// `MONO_TABLE_TYPEDEF`
const TABLE_TYPEDEF: i32 = 2;
/// Table index in the top byte of a TypeDef token.
const TYPEDEF_TOKEN: u32 = 0x0200_0000;

foreign_handle!(
    /// A `MonoImage*`, one loaded assembly module.
    MonoImage,
    HandleKind::Image
);

impl MonoImage {
    fn arg(&self) -> [NativeValue; 1] {
        [NativeValue::Pointer(self.address())]
    }

    /// The image already loaded under `name`, e.g. `Assembly-CSharp`.
    pub fn loaded(session: &Session, name: &str) -> Result<Option<MonoImage>, BindingError> {
        let name = session.alloc_utf8(name)?;
        session.call_handle(&MONO_IMAGE_LOADED, &[name.address().into()])
    }

    pub fn corlib(session: &Session) -> Result<Option<MonoImage>, BindingError> {
        session.call_handle(&MONO_GET_CORLIB, &[])
    }

    pub fn name(&self) -> Result<String, BindingError> {
        self.session()?.call_text(&MONO_IMAGE_GET_NAME, &self.arg())
    }

    pub fn filename(&self) -> Result<String, BindingError> {
        self.session()?.call_text(&MONO_IMAGE_GET_FILENAME, &self.arg())
    }

    pub fn guid(&self) -> Result<String, BindingError> {
        self.session()?.call_text(&MONO_IMAGE_GET_GUID, &self.arg())
    }

    /// Rows in the TypeDef table, which includes the `<Module>` pseudo type.
    pub fn type_def_count(&self) -> Result<i32, BindingError> {
        self.session()?.call_i32(
            &MONO_IMAGE_GET_TABLE_ROWS,
            &[self.address().into(), TABLE_TYPEDEF.into()],
        )
    }

    /// Every class defined in this image, in TypeDef order. Rows the runtime
    /// cannot load are skipped.
    pub fn classes(
        &self,
    ) -> Result<impl Iterator<Item = Result<MonoClass, BindingError>>, BindingError> {
        let rows = self.type_def_count()?.max(0) as u32;
        let image = self.clone();
        Ok((1..=rows).filter_map(move |row| {
            MonoClass::get(&image, TYPEDEF_TOKEN | row).transpose()
        }))
    }

    pub fn class_from_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<MonoClass>, BindingError> {
        MonoClass::from_name(self, namespace, name)
    }
}
