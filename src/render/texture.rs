use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::foundation::error::MediaResult;
use crate::render::backend::{TextureBackend, TextureId};

/// Hand-off list between threads that drop GPU-backed images and the thread that owns the GPU.
///
/// Any thread may [`enqueue`](Self::enqueue); only the GPU-owning thread should act on the ids
/// returned by [`drain_all`](Self::drain_all). Both take the same lock, so a drain observes every
/// enqueue that completed before it and none is returned twice.
#[derive(Debug, Default)]
pub struct DeletionQueue {
    pending: Mutex<Vec<TextureId>>,
}

impl DeletionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `id` for deletion on the next sweep.
    pub fn enqueue(&self, id: TextureId) {
        self.lock().push(id);
    }

    /// Take every pending id, leaving the queue empty.
    pub fn drain_all(&self) -> Vec<TextureId> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of ids waiting for a sweep.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TextureId>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ownership token for one uploaded texture.
///
/// Dropping the lease enqueues the id; it does not call into the GPU.
#[derive(Debug)]
pub(crate) struct TextureLease {
    id: TextureId,
    queue: Arc<DeletionQueue>,
}

impl TextureLease {
    pub(crate) fn id(&self) -> TextureId {
        self.id
    }
}

impl Drop for TextureLease {
    fn drop(&mut self) {
        self.queue.enqueue(self.id);
    }
}

/// GPU resource manager: creates textures for [`crate::Image`] uploads and frees the ones whose
/// images are gone.
///
/// Lives on the GPU-owning thread. Call [`delete_pending`](Self::delete_pending) periodically
/// from that thread; pending deletions are also swept when the manager is dropped.
pub struct TextureManager<B: TextureBackend> {
    backend: B,
    queue: Arc<DeletionQueue>,
}

impl<B: TextureBackend> TextureManager<B> {
    /// Create a manager with a fresh deletion queue.
    pub fn new(backend: B) -> Self {
        Self::with_queue(backend, Arc::new(DeletionQueue::new()))
    }

    /// Create a manager that sweeps an existing queue.
    pub fn with_queue(backend: B, queue: Arc<DeletionQueue>) -> Self {
        Self { backend, queue }
    }

    /// Shared handle to the deletion queue.
    pub fn queue(&self) -> Arc<DeletionQueue> {
        Arc::clone(&self.queue)
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrow the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Free every texture whose last owning image has been dropped.
    ///
    /// Returns the number of textures deleted.
    pub fn delete_pending(&mut self) -> usize {
        let ids = self.queue.drain_all();
        for &id in &ids {
            self.backend.delete_texture(id);
        }
        if !ids.is_empty() {
            tracing::debug!(count = ids.len(), "deleted pending textures");
        }
        ids.len()
    }

    pub(crate) fn lease(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> MediaResult<TextureLease> {
        let id = self.backend.create_texture(width, height, rgba)?;
        Ok(TextureLease {
            id,
            queue: Arc::clone(&self.queue),
        })
    }
}

impl<B: TextureBackend> Drop for TextureManager<B> {
    fn drop(&mut self) {
        self.delete_pending();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/texture.rs"]
mod tests;
