use api::stub::StubRuntime;
use api::NativeValue;
use common::{
    Address, BindingError, MonoClass, MonoGenericParam, MonoImage, MonoType, Session,
    SessionConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const CLASS: Address = Address::new(0x1000);
const PARENT: Address = Address::new(0x2000);
const IMAGE: Address = Address::new(0x3000);
const TYPE: Address = Address::new(0x4000);

fn attach() -> (Arc<StubRuntime>, Session) {
    let _ = env_logger::builder().is_test(true).try_init();
    let stub = Arc::new(StubRuntime::new());
    let session = Session::attach(stub.clone(), SessionConfig::default());
    (stub, session)
}

#[test]
fn test_scalar_and_text_attributes() {
    let (stub, session) = attach();
    stub.returns_text("mono_class_get_name", "List`1");
    stub.returns_text("mono_class_get_namespace", "System.Collections.Generic");
    stub.returns("mono_class_instance_size", NativeValue::I32(32));
    stub.returns("mono_class_array_element_size", NativeValue::I32(8));
    stub.returns("mono_class_data_size", NativeValue::I32(16));
    stub.returns("mono_class_get_type_token", NativeValue::U32(0x0200_0123));
    stub.returns("mono_class_get_rank", NativeValue::I32(0));
    stub.returns("mono_class_get_flags", NativeValue::U32(0x0010_2001));

    let class = MonoClass::from_address(&session, CLASS).unwrap();
    assert_eq!(class.name().unwrap(), "List`1");
    assert_eq!(class.namespace().unwrap(), "System.Collections.Generic");
    assert_eq!(class.instance_size().unwrap(), 32);
    assert_eq!(class.array_element_size().unwrap(), 8);
    assert_eq!(class.data_size().unwrap(), 16);
    assert_eq!(class.type_token().unwrap(), 0x0200_0123);
    assert_eq!(class.rank().unwrap(), 0);
    assert_eq!(class.flags().unwrap(), 0x0010_2001);
}

#[test]
fn test_null_text_reads_as_empty_string() {
    let (stub, session) = attach();
    stub.returns("mono_class_get_namespace", NativeValue::Pointer(Address::NULL));
    let class = MonoClass::from_address(&session, CLASS).unwrap();
    assert_eq!(class.namespace().unwrap(), "");
}

#[test]
fn test_child_handles_go_through_registry() {
    let (stub, session) = attach();
    stub.returns("mono_class_get_parent", NativeValue::Pointer(PARENT));
    stub.returns("mono_class_get_image", NativeValue::Pointer(IMAGE));
    stub.returns("mono_class_get_type", NativeValue::Pointer(TYPE));
    stub.returns("mono_class_get_byref_type", NativeValue::Pointer(Address::new(0x4100)));
    stub.returns("mono_class_get_element_class", NativeValue::Pointer(CLASS));

    let class = MonoClass::from_address(&session, CLASS).unwrap();
    let parent = class.parent().unwrap().unwrap();
    assert!(parent.ptr_eq(&MonoClass::from_address(&session, PARENT).unwrap()));

    let image = class.image().unwrap().unwrap();
    assert!(image.ptr_eq(&MonoImage::from_address(&session, IMAGE).unwrap()));

    let mono_type = class.type_().unwrap().unwrap();
    assert!(mono_type.ptr_eq(&MonoType::from_address(&session, TYPE).unwrap()));
    assert_eq!(class.byref_type().unwrap().unwrap().address(), Address::new(0x4100));

    // A class resolved through an attribute is the same handle as the caller's.
    assert!(class.element_class().unwrap().unwrap().ptr_eq(&class));
}

#[test]
fn test_null_child_is_absent_not_error() {
    let (stub, session) = attach();
    stub.returns("mono_class_get_parent", NativeValue::Pointer(Address::NULL));
    stub.returns("mono_class_get_nesting_type", NativeValue::Pointer(Address::NULL));
    stub.returns("mono_class_enum_basetype", NativeValue::Pointer(Address::NULL));

    let class = MonoClass::from_address(&session, CLASS).unwrap();
    assert!(class.parent().unwrap().is_none());
    assert!(class.nesting_type().unwrap().is_none());
    assert!(class.enum_basetype().unwrap().is_none());
}

#[test]
fn test_attribute_reads_are_not_cached() {
    let (stub, session) = attach();
    let initialized = Arc::new(AtomicBool::new(false));

    let flag = initialized.clone();
    stub.on("mono_class_instance_size", move |_| {
        let size = if flag.load(Ordering::SeqCst) { 48 } else { 0 };
        Ok(NativeValue::I32(size))
    });
    let flag = initialized.clone();
    stub.on("mono_class_init", move |_| {
        flag.store(true, Ordering::SeqCst);
        Ok(NativeValue::Bool(true))
    });

    let class = MonoClass::from_address(&session, CLASS).unwrap();
    let before = class.instance_size().unwrap();
    assert!(class.init().unwrap());
    let after = class.instance_size().unwrap();

    assert_eq!(before, 0);
    assert_eq!(after, 48);
    assert_eq!(stub.calls("mono_class_instance_size"), 2, "one native call per read");
}

#[test]
fn test_failed_init_is_a_false_result() {
    let (stub, session) = attach();
    stub.returns("mono_class_init", NativeValue::Bool(false));
    let class = MonoClass::from_address(&session, CLASS).unwrap();
    assert!(!class.init().unwrap());
}

#[test]
fn test_operations_pass_both_addresses() {
    let (stub, session) = attach();
    stub.on("mono_class_implements_interface", |args| {
        Ok(NativeValue::Bool(
            args == [NativeValue::Pointer(CLASS), NativeValue::Pointer(PARENT)]
        ))
    });
    stub.on("mono_class_is_subclass_of", |args| {
        Ok(NativeValue::Bool(args[2] == NativeValue::Bool(true)))
    });
    stub.on("mono_class_get_field", |args| match args[1] {
        NativeValue::U32(0x0400_0001) => Ok(NativeValue::Pointer(Address::new(0x9100))),
        _ => Ok(NativeValue::Pointer(Address::NULL)),
    });

    let class = MonoClass::from_address(&session, CLASS).unwrap();
    let iface = MonoClass::from_address(&session, PARENT).unwrap();
    assert!(class.implements_interface(&iface).unwrap());
    assert!(!iface.implements_interface(&class).unwrap());
    assert!(class.is_subclass_of(&iface, true).unwrap());
    assert!(!class.is_subclass_of(&iface, false).unwrap());

    let field = class.get_field(0x0400_0001).unwrap().unwrap();
    assert_eq!(field.address(), Address::new(0x9100));
    assert!(class.get_field(0x0400_0099).unwrap().is_none());
}

#[test]
fn test_full_name_handles_namespace_and_nesting() {
    let (stub, session) = attach();
    let inner = Address::new(0x1100);
    let names = [(CLASS, "Outer"), (inner, "Inner")];
    let name_ptrs: Vec<(Address, Address)> = names
        .iter()
        .map(|(class, name)| (*class, stub.intern(name).unwrap()))
        .collect();
    let namespace = stub.intern("Game.Logic").unwrap();

    stub.on("mono_class_get_name", move |args| {
        let found = name_ptrs.iter().find(|(class, _)| args[0] == NativeValue::Pointer(*class));
        Ok(NativeValue::Pointer(found.map(|(_, name)| *name).unwrap_or(Address::NULL)))
    });
    stub.returns("mono_class_get_namespace", NativeValue::Pointer(namespace));
    stub.on("mono_class_get_nesting_type", move |args| {
        if args[0] == NativeValue::Pointer(inner) {
            Ok(NativeValue::Pointer(CLASS))
        } else {
            Ok(NativeValue::Pointer(Address::NULL))
        }
    });

    let outer = MonoClass::from_address(&session, CLASS).unwrap();
    let nested = MonoClass::from_address(&session, inner).unwrap();
    assert_eq!(outer.full_name().unwrap(), "Game.Logic.Outer");
    assert_eq!(nested.full_name().unwrap(), "Game.Logic.Outer/Inner");
}

#[test]
fn test_generic_parameter_resolution_is_unimplemented() {
    let (stub, session) = attach();
    let param = MonoGenericParam::from_address(&session, Address::new(0xA000)).unwrap();
    let result = MonoClass::from_generic_parameter(&param);
    assert!(matches!(result, Err(BindingError::Unimplemented(_))));
    assert_eq!(stub.calls("mono_class_from_generic_parameter"), 0);
}

#[test]
fn test_missing_export_is_symbol_not_found() {
    let (_stub, session) = attach();
    let class = MonoClass::from_address(&session, CLASS).unwrap();
    match class.data_size() {
        Err(BindingError::SymbolNotFound(name)) => assert_eq!(name, "mono_class_data_size"),
        other => panic!("expected SymbolNotFound, got {:?}", other),
    }
    // The failure does not disturb the registry.
    assert!(MonoClass::from_address(&session, CLASS).unwrap().ptr_eq(&class));
}
