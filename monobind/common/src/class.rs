use api::NativeValue;

use crate::iter::ForeignIter;
use crate::natives::*;
use crate::registry::{foreign_handle, HandleKind};
use crate::{BindingError, MonoClassField, MonoGenericParam, MonoImage, MonoType};

foreign_handle!(
    /// A `MonoClass*`. Every attribute is read from the runtime on access.
    MonoClass,
    HandleKind::Class
);

impl MonoClass {
    fn arg(&self) -> [NativeValue; 1] {
        [NativeValue::Pointer(self.address())]
    }

    pub fn namespace(&self) -> Result<String, BindingError> {
        self.session()?.call_text(&MONO_CLASS_GET_NAMESPACE, &self.arg())
    }

    pub fn name(&self) -> Result<String, BindingError> {
        self.session()?.call_text(&MONO_CLASS_GET_NAME, &self.arg())
    }

    /// `Namespace.Name`, with nested classes written as `Outer/Inner`.
    pub fn full_name(&self) -> Result<String, BindingError> {
        let name = self.name()?;
        if let Some(outer) = self.nesting_type()? {
            return Ok(format!("{}/{}", outer.full_name()?, name));
        }
        let namespace = self.namespace()?;
        if namespace.is_empty() {
            Ok(name)
        } else {
            Ok(format!("{}.{}", namespace, name))
        }
    }

    /// Size of an object instance in bytes.
    pub fn instance_size(&self) -> Result<i32, BindingError> {
        self.session()?.call_i32(&MONO_CLASS_INSTANCE_SIZE, &self.arg())
    }

    /// Bytes an element of this class takes when stored in an array.
    pub fn array_element_size(&self) -> Result<i32, BindingError> {
        self.session()?.call_i32(&MONO_CLASS_ARRAY_ELEMENT_SIZE, &self.arg())
    }

    /// Size of the static field area.
    pub fn data_size(&self) -> Result<i32, BindingError> {
        self.session()?.call_i32(&MONO_CLASS_DATA_SIZE, &self.arg())
    }

    pub fn type_(&self) -> Result<Option<MonoType>, BindingError> {
        self.session()?.call_handle(&MONO_CLASS_GET_TYPE, &self.arg())
    }

    pub fn type_token(&self) -> Result<u32, BindingError> {
        self.session()?.call_u32(&MONO_CLASS_GET_TYPE_TOKEN, &self.arg())
    }

    /// Underlying type of an enum; `None` for anything else.
    pub fn enum_basetype(&self) -> Result<Option<MonoType>, BindingError> {
        self.session()?.call_handle(&MONO_CLASS_ENUM_BASETYPE, &self.arg())
    }

    pub fn byref_type(&self) -> Result<Option<MonoType>, BindingError> {
        self.session()?.call_handle(&MONO_CLASS_GET_BYREF_TYPE, &self.arg())
    }

    /// The class this one is nested in; `None` when not nested.
    pub fn nesting_type(&self) -> Result<Option<MonoClass>, BindingError> {
        self.session()?.call_handle(&MONO_CLASS_GET_NESTING_TYPE, &self.arg())
    }

    pub fn parent(&self) -> Result<Option<MonoClass>, BindingError> {
        self.session()?.call_handle(&MONO_CLASS_GET_PARENT, &self.arg())
    }

    /// Number of array dimensions, zero for non-arrays.
    pub fn rank(&self) -> Result<i32, BindingError> {
        self.session()?.call_i32(&MONO_CLASS_GET_RANK, &self.arg())
    }

    /// TypeDef flags (`TYPE_ATTRIBUTE_*`).
    pub fn flags(&self) -> Result<u32, BindingError> {
        self.session()?.call_u32(&MONO_CLASS_GET_FLAGS, &self.arg())
    }

    pub fn element_class(&self) -> Result<Option<MonoClass>, BindingError> {
        self.session()?.call_handle(&MONO_CLASS_GET_ELEMENT_CLASS, &self.arg())
    }

    pub fn image(&self) -> Result<Option<MonoImage>, BindingError> {
        self.session()?.call_handle(&MONO_CLASS_GET_IMAGE, &self.arg())
    }

    /// Interfaces implemented directly by this class.
    pub fn interfaces(&self) -> Result<ForeignIter<MonoClass>, BindingError> {
        self.session()?
            .enumerate(&MONO_CLASS_GET_INTERFACES, self.address())
    }

    pub fn fields(&self) -> Result<ForeignIter<MonoClassField>, BindingError> {
        self.session()?.enumerate(&MONO_CLASS_GET_FIELDS, self.address())
    }

    /// Computes sizes and layout that are not known at load time.
    ///
    /// Returns `false` if the type could not be loaded; that is not turned
    /// into an error.
    pub fn init(&self) -> Result<bool, BindingError> {
        self.session()?.call_bool(&MONO_CLASS_INIT, &self.arg())
    }

    pub fn implements_interface(&self, iface: &MonoClass) -> Result<bool, BindingError> {
        self.session()?.call_bool(
            &MONO_CLASS_IMPLEMENTS_INTERFACE,
            &[self.address().into(), iface.address().into()],
        )
    }

    pub fn is_subclass_of(
        &self,
        parent: &MonoClass,
        check_interfaces: bool,
    ) -> Result<bool, BindingError> {
        self.session()?.call_bool(
            &MONO_CLASS_IS_SUBCLASS_OF,
            &[
                self.address().into(),
                parent.address().into(),
                check_interfaces.into(),
            ],
        )
    }

    /// `None` if the field token does not belong to this class.
    pub fn get_field(&self, field_token: u32) -> Result<Option<MonoClassField>, BindingError> {
        self.session()?.call_handle(
            &MONO_CLASS_GET_FIELD,
            &[self.address().into(), field_token.into()],
        )
    }

    /// Class with `type_token` in `image`.
    pub fn get(image: &MonoImage, type_token: u32) -> Result<Option<MonoClass>, BindingError> {
        image
            .session()?
            .call_handle(&MONO_CLASS_GET, &[image.address().into(), type_token.into()])
    }

    /// Looks a class up by namespace and name. Nested classes use `/`, e.g.
    /// `Foo/Bar`. A miss is `Ok(None)`.
    pub fn from_name(
        image: &MonoImage,
        namespace: &str,
        name: &str,
    ) -> Result<Option<MonoClass>, BindingError> {
        let session = image.session()?;
        let namespace = session.alloc_utf8(namespace)?;
        let name = session.alloc_utf8(name)?;
        session.call_handle(
            &MONO_CLASS_FROM_NAME,
            &[
                image.address().into(),
                namespace.address().into(),
                name.address().into(),
            ],
        )
    }

    /// Case-insensitive lookup that reports runtime errors as
    /// `LookupFailed`.
    pub fn from_name_case_checked(
        image: &MonoImage,
        namespace: &str,
        name: &str,
    ) -> Result<Option<MonoClass>, BindingError> {
        let session = image.session()?;
        let namespace = session.alloc_utf8(namespace)?;
        let name = session.alloc_utf8(name)?;
        session.checked_lookup(
            &MONO_CLASS_FROM_NAME_CASE_CHECKED,
            &[
                image.address().into(),
                namespace.address().into(),
                name.address().into(),
            ],
        )
    }

    pub fn from_mono_type(mono_type: &MonoType) -> Result<Option<MonoClass>, BindingError> {
        mono_type
            .session()?
            .call_handle(&MONO_CLASS_FROM_MONO_TYPE, &[mono_type.address().into()])
    }

    /// Class for a TypeRef token; `None` if it could not be loaded.
    pub fn from_typeref(image: &MonoImage, type_token: u32) -> Result<Option<MonoClass>, BindingError> {
        image.session()?.call_handle(
            &MONO_CLASS_FROM_TYPEREF,
            &[image.address().into(), type_token.into()],
        )
    }

    pub fn from_typeref_checked(
        image: &MonoImage,
        type_token: u32,
    ) -> Result<Option<MonoClass>, BindingError> {
        image.session()?.checked_lookup(
            &MONO_CLASS_FROM_TYPEREF_CHECKED,
            &[image.address().into(), type_token.into()],
        )
    }

    pub fn from_generic_parameter(
        _param: &MonoGenericParam,
    ) -> Result<Option<MonoClass>, BindingError> {
        Err(BindingError::Unimplemented("MonoClass::from_generic_parameter"))
    }
}
