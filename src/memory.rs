//! Allocation statistics
//!
//! With the `memory_tracking` feature, [`TrackingAllocator`] wraps the
//! underlying allocator (mimalloc when enabled) and counts live and peak
//! bytes. The binary installs it as the global allocator; without the
//! feature every statistic reads 0.

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
pub use tracking::TrackingAllocator;

/// Live and peak allocated bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub allocated: usize,
    pub peak: usize,
}

#[cfg(feature = "memory_tracking")]
pub fn stats() -> MemoryStats {
    use std::sync::atomic::Ordering;
    MemoryStats {
        allocated: tracking::ALLOCATED.load(Ordering::SeqCst),
        peak: tracking::PEAK_ALLOCATED.load(Ordering::SeqCst),
    }
}

/// Returns the statistics before the reset; the peak restarts from the live size
#[cfg(feature = "memory_tracking")]
pub fn reset_peak() -> MemoryStats {
    use std::sync::atomic::Ordering;
    let allocated = tracking::ALLOCATED.load(Ordering::SeqCst);
    let peak = tracking::PEAK_ALLOCATED.swap(allocated, Ordering::SeqCst);
    MemoryStats { allocated, peak }
}

#[cfg(not(feature = "memory_tracking"))]
pub fn stats() -> MemoryStats {
    MemoryStats::default()
}

#[cfg(not(feature = "memory_tracking"))]
pub fn reset_peak() -> MemoryStats {
    MemoryStats::default()
}

pub fn is_tracking() -> bool {
    cfg!(feature = "memory_tracking")
}
