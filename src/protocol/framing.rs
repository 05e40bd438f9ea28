//! Single-slot line mailbox between the UART receive path and the control loop.
//!
//! ```text
//!  UART RX (producer)                         control loop (consumer)
//!  ──────────────────                         ───────────────────────
//!  push_byte ──▶ [ buf │ len ] ──▶ READY ──▶ take_line ──▶ FILLING
//!                 ▲                │
//!                 └── dropped ◀────┘  (bytes arriving while READY)
//! ```
//!
//! Exactly one line may be outstanding.  Bytes received while a completed
//! line waits are dropped, never queued.  A line that outgrows the buffer
//! is discarded and collection restarts from empty.  The state word is the
//! only permission gate: the producer writes `buf`/`len` only in
//! `FILLING`, the consumer reads them only after claiming `READY` →
//! `DRAINING`.  No lock is taken on either side, so `push_byte` is safe
//! to call from an ISR or a dedicated reader task.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, AtomicU32, AtomicUsize, Ordering};

/// Receive buffer size.  One byte is reserved, so the longest line is
/// `RX_BUFFER_SIZE - 1` bytes.
pub const RX_BUFFER_SIZE: usize = 128;

/// Owned copy of one completed line.
pub type LineBuf = heapless::Vec<u8, RX_BUFFER_SIZE>;

const FILLING: u8 = 0;
const READY: u8 = 1;
const DRAINING: u8 = 2;

/// What happened to a byte handed to [`LineMailbox::push_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Appended to the line being collected.
    Stored,
    /// Terminator that completed a line.
    LineReady,
    /// Terminator with nothing buffered.
    Ignored,
    /// A completed line is still waiting; byte discarded.
    Dropped,
    /// Buffer was full; collection restarted and the byte discarded.
    Reset,
}

/// Lock-free single-producer / single-consumer line mailbox.
pub struct LineMailbox<const N: usize = RX_BUFFER_SIZE> {
    buf: UnsafeCell<[u8; N]>,
    len: AtomicUsize,
    state: AtomicU8,
    dropped: AtomicU32,
    resets: AtomicU32,
}

// SAFETY: `buf` is only written by the producer while `state == FILLING`
// and only read by the consumer after it has moved `state` from READY to
// DRAINING.  The Release store that publishes READY orders the buffer
// writes before the consumer's Acquire claim; the Release store back to
// FILLING orders the consumer's reads before the producer's next write.
unsafe impl<const N: usize> Sync for LineMailbox<N> {}

impl<const N: usize> Default for LineMailbox<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineMailbox<N> {
    pub const fn new() -> Self {
        Self {
            buf: UnsafeCell::new([0; N]),
            len: AtomicUsize::new(0),
            state: AtomicU8::new(FILLING),
            dropped: AtomicU32::new(0),
            resets: AtomicU32::new(0),
        }
    }

    // ── Producer side ─────────────────────────────────────────

    /// Feed one received byte.  Producer only.
    pub fn push_byte(&self, byte: u8) -> PushOutcome {
        if self.state.load(Ordering::Acquire) != FILLING {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return PushOutcome::Dropped;
        }

        let len = self.len.load(Ordering::Relaxed);

        if byte == b'\r' || byte == b'\n' {
            if len == 0 {
                return PushOutcome::Ignored;
            }
            self.state.store(READY, Ordering::Release);
            return PushOutcome::LineReady;
        }

        if len + 1 < N {
            // SAFETY: state is FILLING, so the consumer is not reading
            // `buf`; `len < N - 1` keeps the index in bounds.
            unsafe {
                (*self.buf.get())[len] = byte;
            }
            self.len.store(len + 1, Ordering::Relaxed);
            PushOutcome::Stored
        } else {
            self.len.store(0, Ordering::Relaxed);
            self.resets.fetch_add(1, Ordering::Relaxed);
            PushOutcome::Reset
        }
    }

    /// Feed a chunk of received bytes.  Returns `true` if a line became
    /// ready during the chunk.
    pub fn push_bytes(&self, bytes: &[u8]) -> bool {
        let mut ready = false;
        for &b in bytes {
            if self.push_byte(b) == PushOutcome::LineReady {
                ready = true;
            }
        }
        ready
    }

    /// Receiver overrun: drop whatever was collected and re-arm.
    ///
    /// A pending line is discarded too.  If the consumer is mid-copy the
    /// reset is left to its own re-arm, which has the same effect.
    pub fn overrun(&self) {
        match self
            .state
            .compare_exchange(READY, FILLING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) | Err(FILLING) => self.len.store(0, Ordering::Relaxed),
            Err(_) => {}
        }
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    // ── Consumer side ─────────────────────────────────────────

    /// Copy the pending line into `out` and re-arm the mailbox.
    /// Returns `false` (leaving `out` untouched) if no line is waiting.
    pub fn take_line<const M: usize>(&self, out: &mut heapless::Vec<u8, M>) -> bool {
        if self
            .state
            .compare_exchange(READY, DRAINING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }

        let len = self.len.load(Ordering::Relaxed).min(N);
        out.clear();
        // SAFETY: state is DRAINING, the producer does not write `buf`.
        let line = unsafe { &(&*self.buf.get())[..len] };
        let _ = out.extend_from_slice(&line[..len.min(M)]);

        self.len.store(0, Ordering::Relaxed);
        self.state.store(FILLING, Ordering::Release);
        true
    }

    /// Whether a completed line is waiting.
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Whether the next received byte will be kept.
    pub fn is_accepting(&self) -> bool {
        self.state.load(Ordering::Acquire) == FILLING
    }

    /// Bytes discarded because a line was already waiting.
    pub fn dropped_bytes(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Buffer-full and overrun resets so far.
    pub fn resets(&self) -> u32 {
        self.resets.load(Ordering::Relaxed)
    }
}
