use common::{BindingError, MonoClass, MonoImage};
use log::warn;

pub fn dump_image(image: &MonoImage) -> Result<(), BindingError> {
    println!("{} ({})", image.name()?, image.filename()?);
    println!("  guid {}", image.guid()?);
    println!("  {} type definitions", image.type_def_count()?);
    Ok(())
}

pub fn dump_class(class: &MonoClass) -> Result<(), BindingError> {
    let full_name = class.full_name()?;
    if !class.init()? {
        warn!("{} could not be initialised, sizes may be zero", full_name);
    }

    println!("{} [token 0x{:08X}]", full_name, class.type_token()?);
    println!(
        "  flags 0x{:08X}, instance size {}, data size {}, rank {}",
        class.flags()?,
        class.instance_size()?,
        class.data_size()?,
        class.rank()?
    );
    if let Some(parent) = class.parent()? {
        println!("  extends {}", parent.full_name()?);
    }
    if let Some(base) = class.enum_basetype()? {
        println!("  enum of {}", base.name()?);
    }
    for iface in class.interfaces()? {
        println!("  implements {}", iface?.full_name()?);
    }
    for field in class.fields()? {
        let field = field?;
        let type_name = match field.type_()? {
            Some(field_type) => field_type.name()?,
            None => "?".to_string(),
        };
        let storage = if field.is_static()? { "static " } else { "" };
        println!(
            "  {}{} {} @ 0x{:X}",
            storage,
            type_name,
            field.name()?,
            field.offset()?
        );
    }
    Ok(())
}
