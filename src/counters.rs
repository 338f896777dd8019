//! Lookup counters shared by a runtime and the benchmark reading them.

use std::sync::atomic::{ AtomicU64, Ordering };
use std::time::Duration ;
use serde::Serialize ;



/// Accumulating lookup counters of a runtime. Times are kept in nanoseconds.
#[derive( Debug, Default )]
pub struct Counters {
	find_count: AtomicU64,
	find_time: AtomicU64,
	parent_delegation_time: AtomicU64,
	read_bytes_time: AtomicU64,
}

/// A point-in-time copy of [`Counters`].
#[derive( Debug, Clone, Copy, Default, PartialEq, Eq, Serialize )]
pub struct CounterSnapshot {
	/// Units a scope located in its own roots.
	pub find_count: u64,
	pub find_time: Duration,
	pub parent_delegation_time: Duration,
	pub read_bytes_time: Duration,
}

impl CounterSnapshot {
	/// Whether nothing at all was recorded.
	pub fn is_zero( &self ) -> bool { *self == Self::default() }
}

impl Counters {

	pub fn new() -> Self { Self::default() }

	pub fn reset( &self ) {
		[ &self.find_count, &self.find_time, &self.parent_delegation_time, &self.read_bytes_time ]
			.into_iter()
			.for_each(| counter | counter.store( 0, Ordering::Relaxed ));
	}

	/// Records one unit found by a scope in its own roots.
	pub fn record_find( &self, find_time: Duration, parent_delegation_time: Duration ) {
		self.find_count.fetch_add( 1, Ordering::Relaxed );
		self.find_time.fetch_add( nanos( find_time ), Ordering::Relaxed );
		self.parent_delegation_time.fetch_add( nanos( parent_delegation_time ), Ordering::Relaxed );
	}

	pub fn record_read( &self, read_time: Duration ) {
		self.read_bytes_time.fetch_add( nanos( read_time ), Ordering::Relaxed );
	}

	pub fn snapshot( &self ) -> CounterSnapshot {
		CounterSnapshot {
			find_count: self.find_count.load( Ordering::Relaxed ),
			find_time: Duration::from_nanos( self.find_time.load( Ordering::Relaxed )),
			parent_delegation_time: Duration::from_nanos( self.parent_delegation_time.load( Ordering::Relaxed )),
			read_bytes_time: Duration::from_nanos( self.read_bytes_time.load( Ordering::Relaxed )),
		}
	}

}

fn nanos( duration: Duration ) -> u64 { u64::try_from( duration.as_nanos() ).unwrap_or( u64::MAX )}
