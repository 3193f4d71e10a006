use crate::registry::{foreign_handle, HandleKind};

foreign_handle!(
    /// A `MonoGenericParam*`. Only identity is tracked; see
    /// `MonoClass::from_generic_parameter`.
    MonoGenericParam,
    HandleKind::GenericParam
);
