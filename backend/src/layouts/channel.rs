use std::mem::ManuallyDrop;

use crate::{AcceleratorError, Backend};

/// Open communication path to an accelerator. Closed on drop.
///
/// Engines and transposes borrow the channel they were prepared through, so a
/// channel always outlives them.
pub struct Channel<'b, B: Backend> {
    backend: &'b B,
    handle: ManuallyDrop<B::Channel>,
}

impl<'b, B: Backend> Channel<'b, B> {
    pub fn open(backend: &'b B) -> Result<Self, AcceleratorError> {
        let handle: B::Channel = backend.open_channel()?;
        tracing::debug!(backend = backend.name(), "channel opened");
        Ok(Self {
            backend,
            handle: ManuallyDrop::new(handle),
        })
    }

    #[inline]
    pub fn backend(&self) -> &'b B {
        self.backend
    }

    #[inline]
    pub fn handle(&self) -> &B::Channel {
        &self.handle
    }

    /// Closes the channel now. Equivalent to dropping it.
    pub fn close(self) {}
}

impl<B: Backend> Drop for Channel<'_, B> {
    fn drop(&mut self) {
        // SAFETY: the handle is taken exactly once, here.
        let handle: B::Channel = unsafe { ManuallyDrop::take(&mut self.handle) };
        self.backend.close_channel(handle);
        tracing::debug!(backend = self.backend.name(), "channel closed");
    }
}
