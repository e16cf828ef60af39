//! # memsim - A Simulated Memory Allocator Library
//!
//! This crate simulates a **fixed-size addressable memory region** and
//! provides allocation/deallocation over it with pluggable hole-selection
//! strategies (best fit, worst fit, or your own). It is built for algorithm
//! study and for teaching allocator internals, not for production memory
//! management.
//!
//! ## Overview
//!
//! The store is tracked as an ordered, gapless list of blocks, each either a
//! hole or an allocation:
//!
//! ```text
//!   Block List over a 32-word store:
//!
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                      BACKING STORE                           │
//!   │                                                              │
//!   │   ┌──────────┬──────┬──────────────┬────────────────────┐    │
//!   │   │ Allocated│ Hole │  Allocated   │       Hole         │    │
//!   │   │  0..8    │ 8..12│   12..20     │      20..32        │    │
//!   │   └──────────┴──────┴──────────────┴────────────────────┘    │
//!   │        ▲         ▲                                           │
//!   │        │         └── candidate handed to the fit strategy    │
//!   │        └── pointer = base + offset × word size               │
//!   │                                                              │
//!   └──────────────────────────────────────────────────────────────┘
//!
//!   allocate: inventory the holes, let the strategy pick one, split it.
//!   free:     mark the block a hole, coalesce with both neighbors.
//! ```
//!
//! An offset index (block offset → position in the list) accelerates the
//! pointer-to-block lookup on `free` and is re-synchronized on every split
//! and merge.
//!
//! ## Crate Structure
//!
//! ```text
//!   memsim
//!   ├── words      - Byte-to-word conversion macro (words!)
//!   ├── block      - Block / Hole value types
//!   ├── fit        - FitStrategy trait, BestFit, WorstFit
//!   └── manager    - MemoryManager engine and inspectors
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use memsim::{BestFit, MemoryManager, WorstFit};
//!
//! // 8-byte words, best-fit hole selection.
//! let mut manager = MemoryManager::new(8, Box::new(BestFit));
//! manager.initialize(128).unwrap();
//!
//! let ptr = manager.allocate(64);
//! assert!(!ptr.is_null());
//!
//! // The pointer addresses real, writable bytes inside the store.
//! unsafe { ptr.write(42) };
//!
//! // Strategies can be swapped between allocations.
//! manager.set_allocator(Box::new(WorstFit));
//! let other = manager.allocate(24);
//!
//! manager.free(ptr);
//! manager.free(other);
//! assert_eq!(manager.holes().len(), 1);
//! ```
//!
//! ## Inspectors
//!
//! Several views of the store exist for diagnostics and tests:
//!
//! - [`MemoryManager::holes`] - the typed hole inventory fed to strategies
//! - [`MemoryManager::hole_list`] - the packed 16-bit interchange form
//! - [`MemoryManager::bitmap`] - one occupancy bit per word, LSB-first,
//!   behind a 2-byte little-endian length header
//! - [`MemoryManager::dump_memory_map`] - the inventory as text, written
//!   through POSIX `open`/`write`/`close`
//!
//! ## Limitations
//!
//! - **Single-threaded only**: every operation takes `&mut self`; callers
//!   wanting shared access must add their own locking
//! - **Fixed-size store**: the region never grows after `initialize`; the
//!   capacity ceiling is 65536 words, tied to the 16-bit interchange formats
//! - **Word granularity**: requests round up to whole words; there is no
//!   finer alignment
//! - **Simulation only**: no OS page tables, no persistence across restarts
//!
//! ## Failure Model
//!
//! No panics on documented inputs: `allocate` returns a null pointer when
//! nothing fits, `free` silently ignores addresses that do not start a
//! tracked block, and `initialize` reports an over-capacity request as an
//! error value.

pub mod words;

mod block;
mod fit;
mod manager;

pub use block::{Block, BlockState, Hole};
pub use fit::{BestFit, FitStrategy, WorstFit};
pub use manager::{InitError, MAX_WORDS, MemoryManager};
