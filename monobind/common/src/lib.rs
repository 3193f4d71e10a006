pub use api::{Address, ForeignRuntime, GatewayError, NativeFunction, NativeType, NativeValue};

mod class;
pub mod config;
mod error;
mod field;
mod generic_param;
mod image;
mod iter;
mod mono_type;
pub mod natives;
mod registry;
mod session;

pub use class::MonoClass;
pub use config::{CachePolicy, SessionConfig};
pub use error::{BindingError, ErrorDescriptor};
pub use field::MonoClassField;
pub use generic_param::MonoGenericParam;
pub use image::MonoImage;
pub use iter::ForeignIter;
pub use mono_type::MonoType;
pub use registry::{ForeignHandle, HandleCell, HandleKind, Registry};
pub use session::Session;
