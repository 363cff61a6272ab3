// Event channel - bounded single-producer/single-consumer queue between the
// frame loop and the dispatcher. When full, the oldest event is evicted.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

struct Shared<T> {
    queue: Mutex<VecDeque<T>>,
    capacity: usize,
    dropped: AtomicU64,
    closed: AtomicBool,
}

impl<T> Shared<T> {
    // A panicking holder cannot leave the deque half-updated, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Create a bounded event channel. Capacity is clamped to at least 1.
pub fn event_channel<T>(capacity: usize) -> (EventSender<T>, EventReceiver<T>) {
    let capacity = capacity.max(1);
    let shared = Arc::new(Shared {
        queue: Mutex::new(VecDeque::with_capacity(capacity)),
        capacity,
        dropped: AtomicU64::new(0),
        closed: AtomicBool::new(false),
    });

    (
        EventSender {
            shared: Arc::clone(&shared),
        },
        EventReceiver { shared },
    )
}

/// Producer half. Pushing never blocks.
pub struct EventSender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> EventSender<T> {
    /// Enqueue an event, returning the evicted oldest event when the queue was full
    pub fn push(&self, event: T) -> Option<T> {
        let mut queue = self.shared.lock();

        let evicted = if queue.len() >= self.shared.capacity {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            queue.pop_front()
        } else {
            None
        };

        queue.push_back(event);
        evicted
    }

    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Events evicted so far
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

impl<T> Drop for EventSender<T> {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::Release);
    }
}

/// Consumer half
pub struct EventReceiver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> EventReceiver<T> {
    /// Take the oldest pending event without waiting
    pub fn poll(&self) -> Option<T> {
        self.shared.lock().pop_front()
    }

    /// Take every pending event, oldest first
    pub fn drain(&self) -> Vec<T> {
        self.shared.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the sender has been dropped. Pending events can still be drained.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let (tx, rx) = event_channel(8);
        tx.push(1);
        tx.push(2);
        tx.push(3);

        assert_eq!(rx.poll(), Some(1));
        assert_eq!(rx.drain(), vec![2, 3]);
        assert_eq!(rx.poll(), None);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let (tx, rx) = event_channel(3);
        for i in 0..3 {
            assert_eq!(tx.push(i), None);
        }

        assert_eq!(tx.push(3), Some(0));
        assert_eq!(tx.push(4), Some(1));
        assert_eq!(rx.dropped(), 2);
        assert_eq!(rx.drain(), vec![2, 3, 4]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let (tx, rx) = event_channel(0);
        assert_eq!(tx.capacity(), 1);

        tx.push("a");
        assert_eq!(tx.push("b"), Some("a"));
        assert_eq!(rx.poll(), Some("b"));
    }

    #[test]
    fn test_dropping_sender_closes_channel() {
        let (tx, rx) = event_channel(4);
        tx.push(7);
        assert!(!rx.is_closed());

        drop(tx);
        assert!(rx.is_closed());
        assert_eq!(rx.drain(), vec![7]);
    }

    #[test]
    fn test_cross_thread_delivery() {
        let (tx, rx) = event_channel(1000);

        let producer = std::thread::spawn(move || {
            for i in 0..500 {
                tx.push(i);
            }
        });
        producer.join().unwrap();

        let received = rx.drain();
        assert_eq!(received.len(), 500);
        assert!(received.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(rx.is_closed());
    }
}
