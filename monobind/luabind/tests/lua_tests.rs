use api::stub::StubRuntime;
use api::{GatewayError, LocalMemory, NativeValue};
use common::{Address, Session, SessionConfig};
use mlua::Lua;
use std::sync::Arc;

const IMAGE: usize = 0x1000;
const CLASS: usize = 0x2000;
const PARENT: usize = 0x3000;
const FIELD: usize = 0x4000;
const TYPE: usize = 0x5000;

fn ptr(value: usize) -> NativeValue {
    NativeValue::Pointer(Address::new(value))
}

fn setup() -> (Arc<StubRuntime>, Session, Lua) {
    let _ = env_logger::builder().is_test(true).try_init();
    let stub = Arc::new(StubRuntime::new());
    let session = Session::attach(stub.clone(), SessionConfig::default());
    let lua = Lua::new();
    luabind::register(&lua, session.clone()).expect("Failed to register mono table");
    (stub, session, lua)
}

fn stub_class(stub: &StubRuntime) {
    stub.returns("mono_get_corlib", ptr(IMAGE));
    stub.returns_text("mono_image_get_name", "mscorlib");
    stub.on("mono_class_from_name", |args| {
        let name = args[2].into_pointer(&common::natives::MONO_CLASS_FROM_NAME)?;
        let name = unsafe { LocalMemory::read_utf8(name) };
        Ok(if name == "String" { ptr(CLASS) } else { ptr(0) })
    });
    stub.returns_text("mono_class_get_name", "String");
    stub.returns_text("mono_class_get_namespace", "System");
    stub.returns("mono_class_get_nesting_type", ptr(0));
    stub.returns("mono_class_get_parent", ptr(PARENT));
    stub.returns("mono_class_instance_size", NativeValue::I32(20));
    stub.returns("mono_class_get_flags", NativeValue::U32(0x0010_2101));
}

#[test]
fn test_lookup_and_attributes() {
    let (stub, _session, lua) = setup();
    stub_class(&stub);

    lua.load(
        r#"
        local corlib = mono.corlib()
        assert(corlib.name == "mscorlib")
        local string = mono.class_from_name(corlib, "System", "String")
        assert(string ~= nil)
        assert(string.name == "String")
        assert(string.full_name == "System.String")
        assert(string.instance_size == 20)
        assert(string.flags == 0x00102101)
        assert(string.parent ~= nil)
        assert(string.nesting_type == nil)
        "#,
    )
    .exec()
    .expect("Lua assertions failed");
}

#[test]
fn test_missing_class_is_nil() {
    let (stub, _session, lua) = setup();
    stub_class(&stub);

    let found: bool = lua
        .load(r#"return mono.class_from_name(mono.corlib(), "System", "Nope") ~= nil"#)
        .eval()
        .unwrap();
    assert!(!found);
}

#[test]
fn test_identity_and_address() {
    let (stub, _session, lua) = setup();
    stub_class(&stub);

    let (same, address, text): (bool, i64, String) = lua
        .load(
            r#"
            local corlib = mono.corlib()
            local a = mono.class_from_name(corlib, "System", "String")
            local b = mono.class_from_address(a.address)
            return a == b, b.address, tostring(b)
            "#,
        )
        .eval()
        .unwrap();
    assert!(same, "handles for one address should compare equal");
    assert_eq!(address, CLASS as i64);
    assert_eq!(text, "MonoClass(0x2000)");

    let different: bool = lua
        .load(r#"return mono.class_from_address(0x2000) == mono.class_from_address(0x3000)"#)
        .eval()
        .unwrap();
    assert!(!different);

    let null: bool = lua.load("return mono.class_from_address(0) == nil").eval().unwrap();
    assert!(null);
}

#[test]
fn test_negative_address_raises() {
    let (_stub, session, lua) = setup();

    let err = lua
        .load("return mono.class_from_address(-1)")
        .exec()
        .expect_err("negative address should raise");
    assert!(err.to_string().contains("Invalid address -1"), "Unexpected error: {}", err);
    assert!(session.registry().is_empty());
}

#[test]
fn test_fields_as_array() {
    let (stub, _session, lua) = setup();
    stub.sequence(
        "mono_class_get_fields",
        vec![Address::new(FIELD), Address::new(FIELD + 0x10)],
    );
    stub.returns("mono_field_get_flags", NativeValue::U32(0x0010));
    stub.returns("mono_field_get_offset", NativeValue::U32(8));
    stub.returns("mono_field_get_type", ptr(TYPE));

    let (count, is_static, offset, has_type): (i64, bool, u32, bool) = lua
        .load(
            r#"
            local fields = mono.class_from_address(0x2000):fields()
            return #fields, fields[1].is_static, fields[2].offset, fields[1].type ~= nil
            "#,
        )
        .eval()
        .unwrap();
    assert_eq!(count, 2);
    assert!(is_static);
    assert_eq!(offset, 8);
    assert!(has_type);
}

#[test]
fn test_operations() {
    let (stub, _session, lua) = setup();
    stub.returns("mono_class_init", NativeValue::Bool(true));
    stub.on("mono_class_is_subclass_of", |args| {
        Ok(NativeValue::Bool(args[2] == NativeValue::Bool(true)))
    });

    let (init, with_ifaces, without): (bool, bool, bool) = lua
        .load(
            r#"
            local class = mono.class_from_address(0x2000)
            local parent = mono.class_from_address(0x3000)
            return class:init(), class:is_subclass_of(parent, true), class:is_subclass_of(parent)
            "#,
        )
        .eval()
        .unwrap();
    assert!(init);
    assert!(with_ifaces);
    assert!(!without);
}

#[test]
fn test_checked_lookup_raises() {
    let (stub, _session, lua) = setup();
    stub.returns("mono_get_corlib", ptr(IMAGE));
    let mut header = [0u8; std::mem::size_of::<usize>()];
    header[..2].copy_from_slice(&3u16.to_ne_bytes());
    stub.checked(
        "mono_class_from_name_case_checked",
        Address::NULL,
        usize::from_ne_bytes(header),
    );
    stub.returns_text("mono_error_get_message", "Could not load type");
    stub.returns("mono_error_cleanup", NativeValue::Void);

    let result = lua
        .load(r#"return mono.class_from_name_checked(mono.corlib(), "System", "string")"#)
        .exec();
    let err = result.expect_err("checked lookup should raise");
    assert!(
        err.to_string().contains("Could not load type"),
        "Unexpected error: {}",
        err
    );
}

#[test]
fn test_gateway_failure_raises() {
    let (stub, _session, lua) = setup();
    stub.on("mono_class_get_name", |_| {
        Err(GatewayError::UnsupportedSignature("mono_class_get_name".into()))
    });

    let err = lua
        .load("return mono.class_from_address(0x2000).name")
        .exec()
        .expect_err("gateway failure should raise");
    assert!(err.to_string().contains("mono_class_get_name"), "Unexpected error: {}", err);
}

#[test]
fn test_detached_session_raises() {
    let (stub, session, lua) = setup();
    stub.returns_text("mono_class_get_name", "String");

    lua.load("class = mono.class_from_address(0x2000)").exec().unwrap();
    session.detach();

    let err = lua
        .load("return class.name")
        .exec()
        .expect_err("detached handle should raise");
    assert!(err.to_string().contains("detached"), "Unexpected error: {}", err);
}
