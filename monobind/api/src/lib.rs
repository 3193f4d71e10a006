mod memory;
pub mod stub;

pub use memory::{LocalMemory, Scratch};

use std::fmt;

/// A raw address inside the instrumented process.
///
/// Always kept at full pointer width so two distinct native objects can
/// never alias the same key.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(usize);

impl Address {
    pub const NULL: Address = Address(0);

    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    pub const fn value(self) -> usize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn as_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Primitive kinds a foreign call can take or return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Pointer,
    I32,
    U32,
    I64,
    /// C `mono_bool`, passed as a 32-bit integer.
    Bool,
    /// Return type only.
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeValue {
    Pointer(Address),
    I32(i32),
    U32(u32),
    I64(i64),
    Bool(bool),
    Void,
}

impl NativeValue {
    pub fn kind(&self) -> NativeType {
        match self {
            NativeValue::Pointer(_) => NativeType::Pointer,
            NativeValue::I32(_) => NativeType::I32,
            NativeValue::U32(_) => NativeType::U32,
            NativeValue::I64(_) => NativeType::I64,
            NativeValue::Bool(_) => NativeType::Bool,
            NativeValue::Void => NativeType::Void,
        }
    }

    pub fn into_pointer(self, function: &NativeFunction) -> Result<Address, GatewayError> {
        match self {
            NativeValue::Pointer(address) => Ok(address),
            other => Err(function.mismatch(format!("expected pointer result, got {:?}", other))),
        }
    }

    pub fn into_i32(self, function: &NativeFunction) -> Result<i32, GatewayError> {
        match self {
            NativeValue::I32(value) => Ok(value),
            other => Err(function.mismatch(format!("expected int32 result, got {:?}", other))),
        }
    }

    pub fn into_u32(self, function: &NativeFunction) -> Result<u32, GatewayError> {
        match self {
            NativeValue::U32(value) => Ok(value),
            other => Err(function.mismatch(format!("expected uint32 result, got {:?}", other))),
        }
    }

    pub fn into_bool(self, function: &NativeFunction) -> Result<bool, GatewayError> {
        match self {
            NativeValue::Bool(value) => Ok(value),
            other => Err(function.mismatch(format!("expected bool result, got {:?}", other))),
        }
    }
}

impl From<Address> for NativeValue {
    fn from(address: Address) -> Self {
        NativeValue::Pointer(address)
    }
}

impl From<u32> for NativeValue {
    fn from(value: u32) -> Self {
        NativeValue::U32(value)
    }
}

impl From<i32> for NativeValue {
    fn from(value: i32) -> Self {
        NativeValue::I32(value)
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Bool(value)
    }
}

/// A named native entry point together with its C signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFunction {
    pub name: &'static str,
    pub ret: NativeType,
    pub args: &'static [NativeType],
}

impl NativeFunction {
    pub const fn new(name: &'static str, ret: NativeType, args: &'static [NativeType]) -> Self {
        Self { name, ret, args }
    }

    /// Checks argument count and kinds against the declared signature.
    pub fn check_args(&self, args: &[NativeValue]) -> Result<(), GatewayError> {
        if args.len() != self.args.len() {
            return Err(self.mismatch(format!(
                "expected {} arguments, got {}",
                self.args.len(),
                args.len()
            )));
        }
        for (index, (expected, value)) in self.args.iter().zip(args).enumerate() {
            if *expected != value.kind() {
                return Err(self.mismatch(format!(
                    "argument {} should be {:?}, got {:?}",
                    index, expected, value
                )));
            }
        }
        Ok(())
    }

    pub fn mismatch(&self, detail: String) -> GatewayError {
        GatewayError::TypeMismatch {
            function: self.name.to_string(),
            detail,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Native symbol not found: {0}")]
    UnresolvedSymbol(String),
    #[error("Type mismatch calling {function}: {detail}")]
    TypeMismatch { function: String, detail: String },
    #[error("Unsupported call signature for {0}")]
    UnsupportedSignature(String),
    #[error("Text argument contains an interior NUL byte")]
    InvalidText,
    #[error("Failed to load native library: {0}")]
    LibraryLoad(String),
}

/// The only point of contact with the instrumented runtime.
///
/// Memory helpers default to the current process, which is where both the
/// native backend and the stub live.
pub trait ForeignRuntime: Send + Sync {
    fn call(&self, function: &NativeFunction, args: &[NativeValue])
        -> Result<NativeValue, GatewayError>;

    fn alloc(&self, size: usize) -> Result<Scratch, GatewayError> {
        Ok(Scratch::zeroed(size))
    }

    fn alloc_utf8(&self, text: &str) -> Result<Scratch, GatewayError> {
        Scratch::utf8(text)
    }

    /// Reads a NUL-terminated string.
    ///
    /// # Safety
    ///
    /// `address` must be null or point at a NUL-terminated string returned by
    /// this runtime that stays valid for the duration of the call.
    unsafe fn read_utf8(&self, address: Address) -> Result<String, GatewayError> {
        Ok(LocalMemory::read_utf8(address))
    }

    /// Reads one pointer-sized word.
    ///
    /// # Safety
    ///
    /// `address` must point at a readable, word-aligned word, such as
    /// scratch memory allocated by this runtime.
    unsafe fn read_pointer(&self, address: Address) -> Result<Address, GatewayError> {
        Ok(LocalMemory::read_word(address))
    }
}
