use super::*;
use crate::render::backend::HeadlessBackend;

#[test]
fn dropping_lease_defers_deletion_until_sweep() {
    let mut mgr = TextureManager::new(HeadlessBackend::new());
    let lease = mgr.lease(1, 1, &[9, 9, 9, 255]).unwrap();
    let id = lease.id();
    assert!(mgr.backend().is_live(id));

    drop(lease);
    assert_eq!(mgr.queue().len(), 1);
    assert!(mgr.backend().is_live(id));

    assert_eq!(mgr.delete_pending(), 1);
    assert!(!mgr.backend().is_live(id));
    assert!(mgr.queue().is_empty());
    assert_eq!(mgr.delete_pending(), 0);
}

#[test]
fn failed_upload_enqueues_nothing() {
    let mut mgr = TextureManager::new(HeadlessBackend::new());
    assert!(mgr.lease(2, 2, &[0u8; 3]).is_err());
    assert!(mgr.queue().is_empty());
}

#[test]
fn shared_queue_is_swept_by_its_manager() {
    let queue = Arc::new(DeletionQueue::new());
    let mut mgr = TextureManager::with_queue(HeadlessBackend::new(), Arc::clone(&queue));
    let lease = mgr.lease(1, 1, &[0, 0, 0, 0]).unwrap();
    drop(lease);
    assert_eq!(queue.len(), 1);
    assert_eq!(mgr.delete_pending(), 1);
    assert!(queue.is_empty());
}

#[test]
fn concurrent_enqueue_and_drain_neither_lose_nor_duplicate() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 500;

    let queue = Arc::new(DeletionQueue::new());
    let producers: Vec<_> = (0..THREADS)
        .map(|t| {
            let q = Arc::clone(&queue);
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    q.enqueue(TextureId(t * PER_THREAD + i + 1));
                }
            })
        })
        .collect();

    let mut seen = Vec::new();
    while producers.iter().any(|h| !h.is_finished()) {
        seen.extend(queue.drain_all());
        std::thread::yield_now();
    }
    for h in producers {
        h.join().unwrap();
    }
    seen.extend(queue.drain_all());

    seen.sort();
    let before = seen.len();
    seen.dedup();
    assert_eq!(seen.len(), before, "an id was drained twice");
    assert_eq!(seen.len() as u64, THREADS * PER_THREAD);
    assert!(queue.is_empty());
}
