//! Native entry points used by the handle views.

use api::{NativeFunction, NativeType};

const P: NativeType = NativeType::Pointer;
const I32: NativeType = NativeType::I32;
const U32: NativeType = NativeType::U32;
const BOOL: NativeType = NativeType::Bool;
const VOID: NativeType = NativeType::Void;

// Class
pub const MONO_CLASS_GET: NativeFunction = NativeFunction::new("mono_class_get", P, &[P, U32]);
pub const MONO_CLASS_GET_FIELDS: NativeFunction = NativeFunction::new("mono_class_get_fields", P, &[P, P]);
pub const MONO_CLASS_FROM_NAME: NativeFunction = NativeFunction::new("mono_class_from_name", P, &[P, P, P]);
pub const MONO_CLASS_FROM_MONO_TYPE: NativeFunction = NativeFunction::new("mono_class_from_mono_type", P, &[P]);
pub const MONO_CLASS_FROM_NAME_CASE_CHECKED: NativeFunction =
    NativeFunction::new("mono_class_from_name_case_checked", P, &[P, P, P, P]);
pub const MONO_CLASS_FROM_TYPEREF: NativeFunction = NativeFunction::new("mono_class_from_typeref", P, &[P, U32]);
pub const MONO_CLASS_FROM_TYPEREF_CHECKED: NativeFunction =
    NativeFunction::new("mono_class_from_typeref_checked", P, &[P, U32, P]);
pub const MONO_CLASS_ARRAY_ELEMENT_SIZE: NativeFunction =
    NativeFunction::new("mono_class_array_element_size", I32, &[P]);
pub const MONO_CLASS_DATA_SIZE: NativeFunction = NativeFunction::new("mono_class_data_size", I32, &[P]);
pub const MONO_CLASS_ENUM_BASETYPE: NativeFunction = NativeFunction::new("mono_class_enum_basetype", P, &[P]);
pub const MONO_CLASS_GET_BYREF_TYPE: NativeFunction = NativeFunction::new("mono_class_get_byref_type", P, &[P]);
pub const MONO_CLASS_GET_ELEMENT_CLASS: NativeFunction =
    NativeFunction::new("mono_class_get_element_class", P, &[P]);
pub const MONO_CLASS_GET_FIELD: NativeFunction = NativeFunction::new("mono_class_get_field", P, &[P, U32]);
pub const MONO_CLASS_GET_FLAGS: NativeFunction = NativeFunction::new("mono_class_get_flags", U32, &[P]);
pub const MONO_CLASS_GET_IMAGE: NativeFunction = NativeFunction::new("mono_class_get_image", P, &[P]);
pub const MONO_CLASS_GET_INTERFACES: NativeFunction = NativeFunction::new("mono_class_get_interfaces", P, &[P, P]);
pub const MONO_CLASS_GET_NAME: NativeFunction = NativeFunction::new("mono_class_get_name", P, &[P]);
pub const MONO_CLASS_GET_NAMESPACE: NativeFunction = NativeFunction::new("mono_class_get_namespace", P, &[P]);
pub const MONO_CLASS_GET_NESTING_TYPE: NativeFunction = NativeFunction::new("mono_class_get_nesting_type", P, &[P]);
pub const MONO_CLASS_GET_PARENT: NativeFunction = NativeFunction::new("mono_class_get_parent", P, &[P]);
pub const MONO_CLASS_GET_RANK: NativeFunction = NativeFunction::new("mono_class_get_rank", I32, &[P]);
pub const MONO_CLASS_GET_TYPE: NativeFunction = NativeFunction::new("mono_class_get_type", P, &[P]);
pub const MONO_CLASS_GET_TYPE_TOKEN: NativeFunction = NativeFunction::new("mono_class_get_type_token", U32, &[P]);
pub const MONO_CLASS_IMPLEMENTS_INTERFACE: NativeFunction =
    NativeFunction::new("mono_class_implements_interface", BOOL, &[P, P]);
pub const MONO_CLASS_INIT: NativeFunction = NativeFunction::new("mono_class_init", BOOL, &[P]);
pub const MONO_CLASS_INSTANCE_SIZE: NativeFunction = NativeFunction::new("mono_class_instance_size", I32, &[P]);
pub const MONO_CLASS_IS_SUBCLASS_OF: NativeFunction =
    NativeFunction::new("mono_class_is_subclass_of", BOOL, &[P, P, BOOL]);

// Type
pub const MONO_TYPE_GET_NAME: NativeFunction = NativeFunction::new("mono_type_get_name", P, &[P]);
pub const MONO_TYPE_GET_TYPE: NativeFunction = NativeFunction::new("mono_type_get_type", I32, &[P]);
pub const MONO_TYPE_IS_BYREF: NativeFunction = NativeFunction::new("mono_type_is_byref", BOOL, &[P]);
pub const MONO_TYPE_GET_CLASS: NativeFunction = NativeFunction::new("mono_type_get_class", P, &[P]);
pub const MONO_TYPE_GET_UNDERLYING_TYPE: NativeFunction =
    NativeFunction::new("mono_type_get_underlying_type", P, &[P]);

// Image
pub const MONO_IMAGE_GET_NAME: NativeFunction = NativeFunction::new("mono_image_get_name", P, &[P]);
pub const MONO_IMAGE_GET_FILENAME: NativeFunction = NativeFunction::new("mono_image_get_filename", P, &[P]);
pub const MONO_IMAGE_GET_GUID: NativeFunction = NativeFunction::new("mono_image_get_guid", P, &[P]);
pub const MONO_IMAGE_GET_TABLE_ROWS: NativeFunction = NativeFunction::new("mono_image_get_table_rows", I32, &[P, I32]);
pub const MONO_IMAGE_LOADED: NativeFunction = NativeFunction::new("mono_image_loaded", P, &[P]);
pub const MONO_GET_CORLIB: NativeFunction = NativeFunction::new("mono_get_corlib", P, &[]);

// Field
pub const MONO_FIELD_GET_NAME: NativeFunction = NativeFunction::new("mono_field_get_name", P, &[P]);
pub const MONO_FIELD_GET_TYPE: NativeFunction = NativeFunction::new("mono_field_get_type", P, &[P]);
pub const MONO_FIELD_GET_PARENT: NativeFunction = NativeFunction::new("mono_field_get_parent", P, &[P]);
pub const MONO_FIELD_GET_OFFSET: NativeFunction = NativeFunction::new("mono_field_get_offset", U32, &[P]);
pub const MONO_FIELD_GET_FLAGS: NativeFunction = NativeFunction::new("mono_field_get_flags", U32, &[P]);

// Runtime support
pub const MONO_FREE: NativeFunction = NativeFunction::new("mono_free", VOID, &[P]);
pub const MONO_ERROR_GET_MESSAGE: NativeFunction = NativeFunction::new("mono_error_get_message", P, &[P]);
pub const MONO_ERROR_CLEANUP: NativeFunction = NativeFunction::new("mono_error_cleanup", VOID, &[P]);

// Embedding
pub const MONO_JIT_INIT: NativeFunction = NativeFunction::new("mono_jit_init", P, &[P]);

/// Every function above, for pre-flight symbol checks.
pub const ALL: &[NativeFunction] = &[
    MONO_CLASS_GET,
    MONO_CLASS_GET_FIELDS,
    MONO_CLASS_FROM_NAME,
    MONO_CLASS_FROM_MONO_TYPE,
    MONO_CLASS_FROM_NAME_CASE_CHECKED,
    MONO_CLASS_FROM_TYPEREF,
    MONO_CLASS_FROM_TYPEREF_CHECKED,
    MONO_CLASS_ARRAY_ELEMENT_SIZE,
    MONO_CLASS_DATA_SIZE,
    MONO_CLASS_ENUM_BASETYPE,
    MONO_CLASS_GET_BYREF_TYPE,
    MONO_CLASS_GET_ELEMENT_CLASS,
    MONO_CLASS_GET_FIELD,
    MONO_CLASS_GET_FLAGS,
    MONO_CLASS_GET_IMAGE,
    MONO_CLASS_GET_INTERFACES,
    MONO_CLASS_GET_NAME,
    MONO_CLASS_GET_NAMESPACE,
    MONO_CLASS_GET_NESTING_TYPE,
    MONO_CLASS_GET_PARENT,
    MONO_CLASS_GET_RANK,
    MONO_CLASS_GET_TYPE,
    MONO_CLASS_GET_TYPE_TOKEN,
    MONO_CLASS_IMPLEMENTS_INTERFACE,
    MONO_CLASS_INIT,
    MONO_CLASS_INSTANCE_SIZE,
    MONO_CLASS_IS_SUBCLASS_OF,
    MONO_TYPE_GET_NAME,
    MONO_TYPE_GET_TYPE,
    MONO_TYPE_IS_BYREF,
    MONO_TYPE_GET_CLASS,
    MONO_TYPE_GET_UNDERLYING_TYPE,
    MONO_IMAGE_GET_NAME,
    MONO_IMAGE_GET_FILENAME,
    MONO_IMAGE_GET_GUID,
    MONO_IMAGE_GET_TABLE_ROWS,
    MONO_IMAGE_LOADED,
    MONO_GET_CORLIB,
    MONO_FIELD_GET_NAME,
    MONO_FIELD_GET_TYPE,
    MONO_FIELD_GET_PARENT,
    MONO_FIELD_GET_OFFSET,
    MONO_FIELD_GET_FLAGS,
    MONO_FREE,
    MONO_ERROR_GET_MESSAGE,
    MONO_ERROR_CLEANUP,
    MONO_JIT_INIT,
];
