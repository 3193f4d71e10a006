use std::cell::UnsafeCell;
use std::ffi::{CStr, CString};
use std::mem::size_of;

use crate::{Address, GatewayError};

const WORD: usize = size_of::<usize>();

/// Zeroed, word-aligned scratch memory handed to foreign calls.
///
/// Released when dropped, so it never outlives the call or iteration pass
/// that allocated it.
pub struct Scratch {
    words: Box<[UnsafeCell<usize>]>,
    size: usize,
}

impl Scratch {
    pub fn zeroed(size: usize) -> Self {
        let count = size.max(1).div_ceil(WORD);
        let words = (0..count).map(|_| UnsafeCell::new(0)).collect();
        Self { words, size }
    }

    /// Copies `text` into fresh scratch memory as a NUL-terminated C string.
    pub fn utf8(text: &str) -> Result<Self, GatewayError> {
        let text = CString::new(text).map_err(|_| GatewayError::InvalidText)?;
        let bytes = text.as_bytes_with_nul();
        let scratch = Self::zeroed(bytes.len());
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), scratch.as_mut_ptr(), bytes.len());
        }
        Ok(scratch)
    }

    pub fn address(&self) -> Address {
        Address::from_ptr(self.words.as_ptr())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Reads the first word, which is where cursors and error codes live.
    pub fn first_word(&self) -> usize {
        unsafe { *self.words[0].get() }
    }

    fn as_mut_ptr(&self) -> *mut u8 {
        UnsafeCell::raw_get(self.words.as_ptr()) as *mut u8
    }
}

impl std::fmt::Debug for Scratch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scratch")
            .field("address", &self.address())
            .field("size", &self.size)
            .finish()
    }
}

/// Raw reads and writes against the current process.
pub struct LocalMemory;

impl LocalMemory {
    /// # Safety
    /// `address` must be null or point at a readable NUL-terminated string.
    pub unsafe fn read_utf8(address: Address) -> String {
        if address.is_null() {
            return String::new();
        }
        CStr::from_ptr(address.as_ptr::<std::ffi::c_char>())
            .to_string_lossy()
            .into_owned()
    }

    /// # Safety
    /// `address` must point at a readable, aligned pointer-sized word.
    pub unsafe fn read_word(address: Address) -> Address {
        Address::new(std::ptr::read(address.as_ptr::<usize>()))
    }

    /// # Safety
    /// `address` must point at a writable, aligned pointer-sized word.
    pub unsafe fn write_word(address: Address, value: usize) {
        std::ptr::write(address.as_ptr::<usize>(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_rounds_up_to_words() {
        let scratch = Scratch::zeroed(3);
        assert_eq!(scratch.size(), 3);
        assert_eq!(scratch.first_word(), 0);
        assert_eq!(scratch.address().value() % WORD, 0);
    }

    #[test]
    fn test_utf8_is_nul_terminated() {
        let scratch = Scratch::utf8("System.Collections").unwrap();
        let text = unsafe { LocalMemory::read_utf8(scratch.address()) };
        assert_eq!(text, "System.Collections");
        assert!(matches!(Scratch::utf8("a\0b"), Err(GatewayError::InvalidText)));
    }

    #[test]
    fn test_words_written_by_foreign_code_are_visible() {
        let cursor = Scratch::zeroed(WORD);
        unsafe { LocalMemory::write_word(cursor.address(), 42) };
        assert_eq!(cursor.first_word(), 42);
        assert_eq!(unsafe { LocalMemory::read_word(cursor.address()) }, Address::new(42));
    }

    #[test]
    fn test_null_text_reads_empty() {
        assert_eq!(unsafe { LocalMemory::read_utf8(Address::NULL) }, "");
    }
}
