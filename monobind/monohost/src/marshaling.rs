use api::{Address, GatewayError, NativeFunction, NativeType, NativeValue};
use std::ffi::c_void;

type Ptr = *mut c_void;

/// Casts `$address` to the exact C function type and calls it.
macro_rules! native_call {
    ($address:expr, fn($($ty:ty),*) -> $ret:ty $(, $arg:expr)*) => {{
        let native = std::mem::transmute::<usize, unsafe extern "C" fn($($ty),*) -> $ret>($address);
        native($($arg),*)
    }};
}

fn pointer(function: &NativeFunction, args: &[NativeValue], index: usize) -> Result<Ptr, GatewayError> {
    match args.get(index) {
        Some(NativeValue::Pointer(address)) => Ok(address.as_ptr()),
        _ => Err(function.mismatch(format!("argument {} should be a pointer", index))),
    }
}

fn int32(function: &NativeFunction, args: &[NativeValue], index: usize) -> Result<i32, GatewayError> {
    match args.get(index) {
        Some(NativeValue::I32(value)) => Ok(*value),
        // C booleans (`mono_bool`) travel as 32-bit ints.
        Some(NativeValue::Bool(value)) => Ok(i32::from(*value)),
        _ => Err(function.mismatch(format!("argument {} should be a 32-bit integer", index))),
    }
}

fn uint32(function: &NativeFunction, args: &[NativeValue], index: usize) -> Result<u32, GatewayError> {
    match args.get(index) {
        Some(NativeValue::U32(value)) => Ok(*value),
        _ => Err(function.mismatch(format!("argument {} should be an unsigned 32-bit integer", index))),
    }
}

fn ret_pointer(value: Ptr) -> NativeValue {
    NativeValue::Pointer(Address::from_ptr(value))
}

/// Calls the C function at `address` with the layout `function` declares.
///
/// # Safety
///
/// `address` must point at a function whose real C signature matches
/// `function`, and every pointer argument must be valid for that function.
pub(crate) unsafe fn invoke(
    address: usize,
    function: &NativeFunction,
    args: &[NativeValue],
) -> Result<NativeValue, GatewayError> {
    use NativeType::{Bool, Pointer, Void, I32, U32};

    let f = function;
    let value = match (function.args, function.ret) {
        ([], Pointer) => ret_pointer(native_call!(address, fn() -> Ptr)),

        ([Pointer], Pointer) => ret_pointer(native_call!(address, fn(Ptr) -> Ptr, pointer(f, args, 0)?)),
        ([Pointer], I32) => NativeValue::I32(native_call!(address, fn(Ptr) -> i32, pointer(f, args, 0)?)),
        ([Pointer], U32) => NativeValue::U32(native_call!(address, fn(Ptr) -> u32, pointer(f, args, 0)?)),
        ([Pointer], Bool) => {
            NativeValue::Bool(native_call!(address, fn(Ptr) -> i32, pointer(f, args, 0)?) != 0)
        }
        ([Pointer], Void) => {
            native_call!(address, fn(Ptr) -> (), pointer(f, args, 0)?);
            NativeValue::Void
        }

        ([Pointer, U32], Pointer) => ret_pointer(native_call!(
            address,
            fn(Ptr, u32) -> Ptr,
            pointer(f, args, 0)?,
            uint32(f, args, 1)?
        )),
        ([Pointer, Pointer], Pointer) => ret_pointer(native_call!(
            address,
            fn(Ptr, Ptr) -> Ptr,
            pointer(f, args, 0)?,
            pointer(f, args, 1)?
        )),
        ([Pointer, Pointer], Bool) => NativeValue::Bool(
            native_call!(
                address,
                fn(Ptr, Ptr) -> i32,
                pointer(f, args, 0)?,
                pointer(f, args, 1)?
            ) != 0,
        ),
        ([Pointer, I32], I32) => NativeValue::I32(native_call!(
            address,
            fn(Ptr, i32) -> i32,
            pointer(f, args, 0)?,
            int32(f, args, 1)?
        )),

        ([Pointer, Pointer, Pointer], Pointer) => ret_pointer(native_call!(
            address,
            fn(Ptr, Ptr, Ptr) -> Ptr,
            pointer(f, args, 0)?,
            pointer(f, args, 1)?,
            pointer(f, args, 2)?
        )),
        ([Pointer, U32, Pointer], Pointer) => ret_pointer(native_call!(
            address,
            fn(Ptr, u32, Ptr) -> Ptr,
            pointer(f, args, 0)?,
            uint32(f, args, 1)?,
            pointer(f, args, 2)?
        )),
        ([Pointer, Pointer, Bool], Bool) => NativeValue::Bool(
            native_call!(
                address,
                fn(Ptr, Ptr, i32) -> i32,
                pointer(f, args, 0)?,
                pointer(f, args, 1)?,
                int32(f, args, 2)?
            ) != 0,
        ),

        ([Pointer, Pointer, Pointer, Pointer], Pointer) => ret_pointer(native_call!(
            address,
            fn(Ptr, Ptr, Ptr, Ptr) -> Ptr,
            pointer(f, args, 0)?,
            pointer(f, args, 1)?,
            pointer(f, args, 2)?,
            pointer(f, args, 3)?
        )),

        _ => return Err(GatewayError::UnsupportedSignature(function.name.to_string())),
    };
    Ok(value)
}
