//!
//! irq.rs
//!
//! Hand-off from the ENC28J60 interrupt line to task context.
//!

use core::{
	pin::Pin,
	sync::atomic::{AtomicBool, Ordering},
	task::{Context, Poll}
};

use futures::{Stream, task::AtomicWaker};

/// Set from the interrupt handler, consumed by whoever runs the poll loop.
///
/// The chip's INT line is edge triggered on the host side, so one latch
/// covers any number of frames: the poll loop drains the whole ring.
pub struct EventLatch {
	pending: AtomicBool,
	waker: AtomicWaker
}

impl EventLatch {
	/// Creates a new, unsignalled `EventLatch`.
	pub const fn new() -> Self {
		Self {
			pending: AtomicBool::new(false),
			waker: AtomicWaker::new()
		}
	}

	/// Call from the interrupt handler. Never blocks.
	pub fn signal(&self) {
		self.pending.store(true, Ordering::Release);
		self.waker.wake();
	}

	/// Clears the latch, returning whether it was set.
	pub fn take(&self) -> bool {
		self.pending.swap(false, Ordering::AcqRel)
	}

	/// Whether an event is waiting, without clearing it.
	pub fn is_pending(&self) -> bool {
		self.pending.load(Ordering::Acquire)
	}

	/// A stream yielding once per signalled event, for async executors.
	pub fn events(&self) -> EventStream<'_> {
		EventStream {
			latch: self
		}
	}
}

impl Default for EventLatch {
	fn default() -> Self {
		Self::new()
	}
}

/// Stream of interrupt notifications from an [`EventLatch`].
pub struct EventStream<'a> {
	latch: &'a EventLatch
}

impl Stream for EventStream<'_> {
	type Item = ();

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<()>> {
		if self.latch.take() {
			return Poll::Ready(Some(()));
		}

		self.latch.waker.register(cx.waker());

		// the interrupt may have fired between the check and the register
		if self.latch.take() {
			self.latch.waker.take();
			Poll::Ready(Some(()))
		} else {
			Poll::Pending
		}
	}
}
