use api::{Address, NativeFunction, NativeValue, Scratch};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::registry::ForeignHandle;
use crate::{BindingError, Session};

/// Lazy walk over a native "call with a cursor until null" enumeration.
///
/// Each pass owns its cursor; the cursor is released as soon as the
/// sequence ends or the iterator is dropped.
pub struct ForeignIter<H> {
    session: Session,
    function: &'static NativeFunction,
    parent: Address,
    cursor: Option<Scratch>,
    _marker: PhantomData<fn() -> H>,
}

impl<H: ForeignHandle> ForeignIter<H> {
    pub(crate) fn new(
        session: Session,
        function: &'static NativeFunction,
        parent: Address,
        cursor: Scratch,
    ) -> Self {
        Self {
            session,
            function,
            parent,
            cursor: Some(cursor),
            _marker: PhantomData,
        }
    }

    /// Collects the remaining items, stopping at the first error.
    pub fn into_vec(self) -> Result<Vec<H>, BindingError> {
        self.collect()
    }
}

impl<H: ForeignHandle> Iterator for ForeignIter<H> {
    type Item = Result<H, BindingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_ref()?;
        let args = [
            NativeValue::Pointer(self.parent),
            NativeValue::Pointer(cursor.address()),
        ];
        match self.session.call_pointer(self.function, &args) {
            Ok(address) => match self.session.resolve(address) {
                Some(handle) => Some(Ok(handle)),
                None => {
                    self.cursor = None;
                    None
                }
            },
            Err(e) => {
                self.cursor = None;
                Some(Err(e))
            }
        }
    }
}

impl<H: ForeignHandle> FusedIterator for ForeignIter<H> {}
