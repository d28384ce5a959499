//! Example that demonstrates the exact usage shown in the README.md file.
//!
//! This shows how to recycle byte buffers through the global registry and records through an
//! object pool.

use recycle_pool::{ObjectPool, PoolRegistry, Record};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Message {
    id: u64,
    priority: u8,
}

// SAFETY: Integers only, all-zero valid.
unsafe impl Record for Message {}

fn main() {
    println!("=== Recycle Pool README Example ===");

    // Buffers are served from the smallest power-of-two size class that fits.
    let registry = PoolRegistry::global();

    let mut buffer = registry.acquire_zeroed_sized(100);
    println!(
        "Buffer length: {}, capacity: {}",
        buffer.len(),
        buffer.capacity()
    );
    assert_eq!(buffer.len(), 100);
    assert_eq!(buffer.capacity(), 128);

    buffer.fill(0xEE);
    registry.release(buffer);

    // The same storage comes back, cleared.
    let buffer = registry.acquire_zeroed(100);
    assert!(buffer.iter().all(|b| *b == 0));
    registry.release(buffer);

    // Records are pooled per type.
    let pool = ObjectPool::<Message>::new().expect("Message is a valid record");

    let message = pool.acquire_with(true, |message| {
        message.id = 1;
        message.priority = 3;
    });

    let copy = pool.copy(&message, false);
    println!("Original: {:?}, copy: {:?}", *message, *copy);
    assert_eq!(*copy, *message);

    pool.release(copy);
    drop(message); // Retained, so this returns the record to the pool.

    println!("Free records: {}", pool.len());
    assert_eq!(pool.len(), 2);

    println!("Pool stats: {:?}", pool.stats());

    println!("README example completed successfully!");
}
