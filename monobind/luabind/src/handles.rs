use common::{MonoClass, MonoClassField, MonoGenericParam, MonoImage, MonoType};
use mlua::{AnyUserData, ExternalResult, MetaMethod, UserData, UserDataFields, UserDataMethods};

/// Declares the userdata wrapper for a handle and its shared members.
macro_rules! lua_handle {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(pub $inner);

        impl $name {
            fn add_address_field<F: UserDataFields<Self>>(fields: &mut F) {
                fields.add_field_method_get("address", |_, this| {
                    Ok(this.0.address().value() as i64)
                });
            }

            fn add_identity_meta<M: UserDataMethods<Self>>(methods: &mut M) {
                methods.add_meta_method(MetaMethod::Eq, |_, this, other: AnyUserData| {
                    Ok(other
                        .borrow::<Self>()
                        .map(|other| this.0 == other.0)
                        .unwrap_or(false))
                });
                methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
                    Ok(format!("{:?}", this.0))
                });
            }
        }
    };
}

lua_handle!(Class, MonoClass);
lua_handle!(Type, MonoType);
lua_handle!(Image, MonoImage);
lua_handle!(Field, MonoClassField);
lua_handle!(GenericParam, MonoGenericParam);

fn wrap<T, U>(value: Result<Option<T>, common::BindingError>, f: fn(T) -> U) -> mlua::Result<Option<U>> {
    value.map(|v| v.map(f)).into_lua_err()
}

impl UserData for Class {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        Self::add_address_field(fields);
        fields.add_field_method_get("namespace", |_, this| this.0.namespace().into_lua_err());
        fields.add_field_method_get("name", |_, this| this.0.name().into_lua_err());
        fields.add_field_method_get("full_name", |_, this| this.0.full_name().into_lua_err());
        fields.add_field_method_get("instance_size", |_, this| this.0.instance_size().into_lua_err());
        fields.add_field_method_get("array_element_size", |_, this| {
            this.0.array_element_size().into_lua_err()
        });
        fields.add_field_method_get("data_size", |_, this| this.0.data_size().into_lua_err());
        fields.add_field_method_get("type", |_, this| wrap(this.0.type_(), Type));
        fields.add_field_method_get("type_token", |_, this| this.0.type_token().into_lua_err());
        fields.add_field_method_get("enum_basetype", |_, this| wrap(this.0.enum_basetype(), Type));
        fields.add_field_method_get("byref_type", |_, this| wrap(this.0.byref_type(), Type));
        fields.add_field_method_get("nesting_type", |_, this| wrap(this.0.nesting_type(), Class));
        fields.add_field_method_get("parent", |_, this| wrap(this.0.parent(), Class));
        fields.add_field_method_get("rank", |_, this| this.0.rank().into_lua_err());
        fields.add_field_method_get("flags", |_, this| this.0.flags().into_lua_err());
        fields.add_field_method_get("element_class", |_, this| wrap(this.0.element_class(), Class));
        fields.add_field_method_get("image", |_, this| wrap(this.0.image(), Image));
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        Self::add_identity_meta(methods);

        methods.add_method("init", |_, this, ()| this.0.init().into_lua_err());
        methods.add_method("implements_interface", |_, this, iface: mlua::UserDataRef<Class>| {
            this.0.implements_interface(&iface.0).into_lua_err()
        });
        methods.add_method(
            "is_subclass_of",
            |_, this, (parent, check_interfaces): (mlua::UserDataRef<Class>, Option<bool>)| {
                this.0
                    .is_subclass_of(&parent.0, check_interfaces.unwrap_or(false))
                    .into_lua_err()
            },
        );
        methods.add_method("get_field", |_, this, token: u32| wrap(this.0.get_field(token), Field));
        methods.add_method("interfaces", |_, this, ()| {
            this.0
                .interfaces()
                .into_lua_err()?
                .map(|r| r.map(Class))
                .collect::<Result<Vec<_>, _>>()
                .into_lua_err()
        });
        methods.add_method("fields", |_, this, ()| {
            this.0
                .fields()
                .into_lua_err()?
                .map(|r| r.map(Field))
                .collect::<Result<Vec<_>, _>>()
                .into_lua_err()
        });
    }
}

impl UserData for Type {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        Self::add_address_field(fields);
        fields.add_field_method_get("name", |_, this| this.0.name().into_lua_err());
        fields.add_field_method_get("type_code", |_, this| this.0.type_code().into_lua_err());
        fields.add_field_method_get("is_byref", |_, this| this.0.is_byref().into_lua_err());
        fields.add_field_method_get("class", |_, this| wrap(this.0.class(), Class));
        fields.add_field_method_get("underlying_type", |_, this| wrap(this.0.underlying_type(), Type));
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        Self::add_identity_meta(methods);
    }
}

impl UserData for Image {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        Self::add_address_field(fields);
        fields.add_field_method_get("name", |_, this| this.0.name().into_lua_err());
        fields.add_field_method_get("filename", |_, this| this.0.filename().into_lua_err());
        fields.add_field_method_get("guid", |_, this| this.0.guid().into_lua_err());
        fields.add_field_method_get("type_def_count", |_, this| this.0.type_def_count().into_lua_err());
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        Self::add_identity_meta(methods);

        methods.add_method("classes", |_, this, ()| {
            this.0
                .classes()
                .into_lua_err()?
                .map(|r| r.map(Class))
                .collect::<Result<Vec<_>, _>>()
                .into_lua_err()
        });
        methods.add_method("class_from_name", |_, this, (namespace, name): (String, String)| {
            wrap(this.0.class_from_name(&namespace, &name), Class)
        });
    }
}

impl UserData for Field {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        Self::add_address_field(fields);
        fields.add_field_method_get("name", |_, this| this.0.name().into_lua_err());
        fields.add_field_method_get("type", |_, this| wrap(this.0.type_(), Type));
        fields.add_field_method_get("parent", |_, this| wrap(this.0.parent(), Class));
        fields.add_field_method_get("offset", |_, this| this.0.offset().into_lua_err());
        fields.add_field_method_get("flags", |_, this| this.0.flags().into_lua_err());
        fields.add_field_method_get("is_static", |_, this| this.0.is_static().into_lua_err());
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        Self::add_identity_meta(methods);
    }
}

impl UserData for GenericParam {
    fn add_fields<F: UserDataFields<Self>>(fields: &mut F) {
        Self::add_address_field(fields);
    }

    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        Self::add_identity_meta(methods);
    }
}
