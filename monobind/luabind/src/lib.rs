//! Lua bindings for Mono class metadata

mod handles;

pub use handles::{Class, Field, GenericParam, Image, Type};

use common::{Address, MonoClass, MonoImage, Session};
use log::debug;
use mlua::{ExternalResult, Lua, UserDataRef};

/// Publishes the `mono` global table backed by `session`.
///
/// Lookups that find nothing return `nil`; runtime failures raise Lua
/// errors carrying the binding error text.
pub fn register(lua: &Lua, session: Session) -> mlua::Result<()> {
    let mono = lua.create_table()?;

    let s = session.clone();
    mono.set(
        "corlib",
        lua.create_function(move |_, ()| MonoImage::corlib(&s).map(|i| i.map(Image)).into_lua_err())?,
    )?;

    let s = session.clone();
    mono.set(
        "image_loaded",
        lua.create_function(move |_, name: String| {
            MonoImage::loaded(&s, &name).map(|i| i.map(Image)).into_lua_err()
        })?,
    )?;

    mono.set(
        "class_from_name",
        lua.create_function(
            |_, (image, namespace, name): (UserDataRef<Image>, String, String)| {
                MonoClass::from_name(&image.0, &namespace, &name)
                    .map(|c| c.map(Class))
                    .into_lua_err()
            },
        )?,
    )?;

    mono.set(
        "class_from_name_checked",
        lua.create_function(
            |_, (image, namespace, name): (UserDataRef<Image>, String, String)| {
                MonoClass::from_name_case_checked(&image.0, &namespace, &name)
                    .map(|c| c.map(Class))
                    .into_lua_err()
            },
        )?,
    )?;

    mono.set(
        "class_get",
        lua.create_function(|_, (image, token): (UserDataRef<Image>, u32)| {
            MonoClass::get(&image.0, token).map(|c| c.map(Class)).into_lua_err()
        })?,
    )?;

    let s = session;
    mono.set(
        "class_from_address",
        lua.create_function(move |_, address: i64| {
            let address = usize::try_from(address)
                .map_err(|_| mlua::Error::runtime(format!("Invalid address {}", address)))?;
            Ok(MonoClass::from_address(&s, Address::new(address)).map(Class))
        })?,
    )?;

    lua.globals().set("mono", mono)?;
    debug!("Registered mono table");
    Ok(())
}
