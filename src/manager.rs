use std::collections::HashMap;
use std::ffi::CString;
use std::{fmt, io, ptr};

use log::debug;

use crate::block::{Block, BlockState, Hole};
use crate::fit::FitStrategy;

/// Hard ceiling on the store capacity, in words.
///
/// Tied to the 16-bit interchange formats: `hole_list` packs offsets and
/// lengths into `u16` fields, and `bitmap` carries a `u16` payload-length
/// header.
pub const MAX_WORDS: usize = 65536;

/// Rejection reasons for [`MemoryManager::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
  CapacityExceeded { requested: usize, max: usize },
  ByteCapacityOverflow { size_in_words: usize, word_size: usize },
}

impl fmt::Display for InitError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter,
  ) -> fmt::Result {
    match self {
      InitError::CapacityExceeded { requested, max } => {
        write!(f, "requested capacity of {requested} words exceeds the {max}-word ceiling")
      }
      InitError::ByteCapacityOverflow { size_in_words, word_size } => {
        write!(
          f,
          "a store of {size_in_words} words of {word_size} bytes overflows the address space"
        )
      }
    }
  }
}

impl std::error::Error for InitError {}

/// A simulated fixed-size memory region with pluggable hole selection.
///
/// The manager owns a byte arena and tracks it as an ordered, gapless list
/// of blocks, each a hole or an allocation. `allocate` hands the current
/// hole inventory to the active [`FitStrategy`] and splits the chosen hole;
/// `free` turns a block back into a hole and coalesces it with both
/// neighbors, so the list never contains two adjacent holes.
///
/// Failures are sentinel values, not panics: `allocate` returns a null
/// pointer, `free` ignores anything that is not a tracked block start.
///
/// Not safe for concurrent use; callers needing that must wrap it in their
/// own mutual exclusion.
pub struct MemoryManager {
  word_size: usize,
  strategy: Box<dyn FitStrategy>,
  store: Option<Box<[u8]>>,
  blocks: Vec<Block>,
  offset_index: HashMap<usize, usize>,
}

impl MemoryManager {
  /// Creates a manager with the given word size (alignment granularity in
  /// bytes) and initial fit strategy. No store exists until
  /// [`initialize`](Self::initialize) is called.
  ///
  /// # Panics
  ///
  /// Panics if `word_size` is zero.
  pub fn new(
    word_size: usize,
    strategy: Box<dyn FitStrategy>,
  ) -> Self {
    assert!(word_size > 0, "word size must be at least one byte");

    Self {
      word_size,
      strategy,
      store: None,
      blocks: Vec::new(),
      offset_index: HashMap::new(),
    }
  }

  /// (Re)creates the backing store as `size_in_words × word_size` zeroed
  /// bytes, with a single hole spanning it. Any previous store and block
  /// list are discarded.
  ///
  /// Requests above [`MAX_WORDS`] are rejected and leave the existing
  /// state untouched.
  pub fn initialize(
    &mut self,
    size_in_words: usize,
  ) -> Result<(), InitError> {
    if size_in_words > MAX_WORDS {
      return Err(InitError::CapacityExceeded {
        requested: size_in_words,
        max: MAX_WORDS,
      });
    }

    let size_in_bytes =
      size_in_words
        .checked_mul(self.word_size)
        .ok_or(InitError::ByteCapacityOverflow {
          size_in_words,
          word_size: self.word_size,
        })?;

    debug!("MemoryManager::initialize({size_in_words})");

    self.store = Some(vec![0u8; size_in_bytes].into_boxed_slice());
    self.blocks.clear();
    self.blocks.push(Block::new(0, size_in_words, BlockState::Hole));
    self.offset_index.clear();
    self.offset_index.insert(0, 0);

    Ok(())
  }

  /// Releases the store and clears all bookkeeping. Idempotent; the
  /// manager stays usable through a later `initialize`.
  pub fn shutdown(&mut self) {
    debug!("MemoryManager::shutdown()");

    self.store = None;
    self.blocks.clear();
    self.offset_index.clear();
  }

  /// Allocates `size_in_bytes` bytes, rounded up to whole words, from the
  /// hole picked by the active strategy.
  ///
  /// Returns a pointer into the store, or null when the request is zero,
  /// the store is uninitialized, no hole fits, or the strategy returned an
  /// offset that is not the start of a sufficiently large hole.
  pub fn allocate(
    &mut self,
    size_in_bytes: usize,
  ) -> *mut u8 {
    if size_in_bytes == 0 || self.store.is_none() {
      return ptr::null_mut();
    }

    // A request near usize::MAX would overflow the round-up to whole words.
    if size_in_bytes.checked_add(self.word_size - 1).is_none() {
      debug!("MemoryManager::allocate({size_in_bytes}): request overflows the word conversion");
      return ptr::null_mut();
    }

    let size_in_words = crate::words!(size_in_bytes, self.word_size);

    let holes = self.holes();
    let Some(offset) = self.strategy.select_hole(size_in_words, &holes) else {
      debug!("MemoryManager::allocate({size_in_bytes}): no fit for {size_in_words} words");
      return ptr::null_mut();
    };

    // A custom strategy may hand back an offset the block list no longer
    // tracks, or one that is not a large-enough hole. Both count as no fit.
    let Some(&position) = self.offset_index.get(&offset) else {
      return ptr::null_mut();
    };
    let block = self.blocks[position];
    if !block.is_hole() || block.len < size_in_words {
      return ptr::null_mut();
    }

    if block.len > size_in_words {
      self.split_block(position, size_in_words);
    } else {
      self.blocks[position].state = BlockState::Allocated;
    }

    debug!("MemoryManager::allocate({size_in_bytes}): {size_in_words} words at offset {offset}");

    match self.store.as_mut() {
      // In bounds: `offset` starts a tracked block, so it is below the
      // word capacity.
      Some(store) => unsafe { store.as_mut_ptr().add(offset * self.word_size) },
      None => ptr::null_mut(),
    }
  }

  /// Returns the block at `address` to the hole inventory and coalesces it
  /// with any adjacent hole on either side.
  ///
  /// Anything that is not the start of a currently allocated block (an
  /// address outside the store, one not on a word boundary, the interior
  /// of a block, or a second free of the same pointer) is ignored.
  pub fn free(
    &mut self,
    address: *mut u8,
  ) {
    let Some(store) = self.store.as_ref() else {
      return;
    };

    let base = store.as_ptr() as usize;
    let addr = address as usize;
    if addr < base || addr >= base + store.len() {
      debug!("MemoryManager::free({address:?}): outside the store");
      return;
    }

    let byte_offset = addr - base;
    if byte_offset % self.word_size != 0 {
      debug!("MemoryManager::free({address:?}): not on a word boundary");
      return;
    }

    let offset = byte_offset / self.word_size;
    let Some(&position) = self.offset_index.get(&offset) else {
      debug!("MemoryManager::free({address:?}): offset {offset} is not a block start");
      return;
    };
    if self.blocks[position].is_hole() {
      debug!("MemoryManager::free({address:?}): block at offset {offset} is already free");
      return;
    }

    self.blocks[position].state = BlockState::Hole;

    debug!(
      "MemoryManager::free({address:?}): {} words at offset {offset}",
      self.blocks[position].len,
    );

    self.merge_holes(position);
  }

  /// Swaps the active fit strategy. Affects subsequent `allocate` calls
  /// only; the block list is untouched.
  pub fn set_allocator(
    &mut self,
    strategy: Box<dyn FitStrategy>,
  ) {
    self.strategy = strategy;
  }

  /// Snapshot of every current hole in ascending-offset order. This is the
  /// inventory handed to fit strategies.
  pub fn holes(&self) -> Vec<Hole> {
    self
      .blocks
      .iter()
      .filter(|block| block.is_hole())
      .map(|block| Hole::new(block.offset, block.len))
      .collect()
  }

  /// The hole inventory in its packed 16-bit interchange form: a leading
  /// hole count, then an `(offset, len)` pair per hole in ascending-offset
  /// order.
  ///
  /// Values are truncated to the 16-bit field width; with the
  /// [`MAX_WORDS`] ceiling the only unrepresentable value is the length of
  /// a single hole spanning a full 65536-word store.
  pub fn hole_list(&self) -> Vec<u16> {
    let holes = self.holes();

    let mut list = Vec::with_capacity(1 + holes.len() * 2);
    list.push(holes.len() as u16);
    for hole in &holes {
      list.push(hole.offset as u16);
      list.push(hole.len as u16);
    }
    list
  }

  /// Packed occupancy bitmap: a 2-byte little-endian payload length, then
  /// one bit per word, `1` = allocated, `0` = hole.
  ///
  /// Canonical bit order: payload byte `i` covers words `8i..8i+8`, with
  /// word `8i + k` at bit `k` (LSB-first). Trailing pad bits in the last
  /// byte are zero.
  pub fn bitmap(&self) -> Vec<u8> {
    let total_words: usize = self.blocks.iter().map(|block| block.len).sum();
    let payload_len = crate::words!(total_words, 8);

    let mut out = vec![0u8; 2 + payload_len];
    out[..2].copy_from_slice(&(payload_len as u16).to_le_bytes());

    let mut word = 0;
    for block in &self.blocks {
      for _ in 0..block.len {
        if !block.is_hole() {
          out[2 + word / 8] |= 1 << (word % 8);
        }
        word += 1;
      }
    }
    out
  }

  /// Writes the hole inventory to `path` as text, one ` - `-separated
  /// `[offset, len]` pair per hole.
  ///
  /// The file is created (mode 0600) or truncated through POSIX
  /// `open`/`write`/`close`; any of them failing surfaces as the
  /// corresponding OS error.
  pub fn dump_memory_map(
    &self,
    path: &str,
  ) -> io::Result<()> {
    let text = self
      .holes()
      .iter()
      .map(|hole| format!("[{}, {}]", hole.offset, hole.len))
      .collect::<Vec<_>>()
      .join(" - ");

    let c_path = CString::new(path)
      .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"))?;

    unsafe {
      let fd = libc::open(
        c_path.as_ptr(),
        libc::O_CREAT | libc::O_WRONLY | libc::O_TRUNC,
        0o600,
      );
      if fd < 0 {
        return Err(io::Error::last_os_error());
      }

      let mut remaining = text.as_bytes();
      while !remaining.is_empty() {
        let written = libc::write(fd, remaining.as_ptr() as *const libc::c_void, remaining.len());
        if written < 0 {
          let err = io::Error::last_os_error();
          libc::close(fd);
          return Err(err);
        }
        remaining = &remaining[written as usize..];
      }

      if libc::close(fd) < 0 {
        return Err(io::Error::last_os_error());
      }
    }

    Ok(())
  }

  /// Word size in bytes, as configured at construction.
  pub fn word_size(&self) -> usize {
    self.word_size
  }

  /// Base address of the store, or null when uninitialized.
  ///
  /// Address queries only; writable pointers come from
  /// [`allocate`](Self::allocate).
  pub fn memory_start(&self) -> *mut u8 {
    match self.store.as_ref() {
      Some(store) => store.as_ptr() as *mut u8,
      None => ptr::null_mut(),
    }
  }

  /// Store capacity in bytes, or zero when uninitialized.
  pub fn memory_limit(&self) -> usize {
    self.store.as_ref().map_or(0, |store| store.len())
  }

  /// Replaces the hole at `position` with `[Allocated(size)][Hole(rest)]`.
  /// Caller guarantees the hole is strictly larger than `size_in_words`.
  fn split_block(
    &mut self,
    position: usize,
    size_in_words: usize,
  ) {
    let offset = self.blocks[position].offset;

    self
      .blocks
      .insert(position, Block::new(offset, size_in_words, BlockState::Allocated));

    let remainder = &mut self.blocks[position + 1];
    remainder.offset = offset + size_in_words;
    remainder.len -= size_in_words;

    debug!(
      "MemoryManager::split_block: {size_in_words} words at offset {offset}, remainder {} at {}",
      self.blocks[position + 1].len,
      self.blocks[position + 1].offset,
    );

    // The insertion shifted every later block by one position.
    self.offset_index.insert(offset, position);
    self.reindex_from(position + 1);
  }

  /// Coalesces the hole at `position` with its neighbors: absorb into a
  /// left-neighbor hole first, then absorb a right-neighbor hole. After
  /// this returns, the block list holds no two adjacent holes.
  fn merge_holes(
    &mut self,
    mut position: usize,
  ) {
    if position > 0 && self.blocks[position - 1].is_hole() {
      let freed = self.blocks.remove(position);
      self.offset_index.remove(&freed.offset);
      position -= 1;
      self.blocks[position].len += freed.len;

      debug!(
        "MemoryManager::merge_holes: absorbed into left hole at offset {}",
        self.blocks[position].offset,
      );
    }

    if position + 1 < self.blocks.len() && self.blocks[position + 1].is_hole() {
      let right = self.blocks.remove(position + 1);
      self.offset_index.remove(&right.offset);
      self.blocks[position].len += right.len;

      debug!("MemoryManager::merge_holes: absorbed right hole at offset {}", right.offset);
    }

    self.reindex_from(position + 1);
  }

  /// Re-syncs the offset index for every block at or after `position`.
  /// O(blocks), run after each structural change; acceptable at the block
  /// counts this simulator targets.
  fn reindex_from(
    &mut self,
    position: usize,
  ) {
    for (i, block) in self.blocks.iter().enumerate().skip(position) {
      self.offset_index.insert(block.offset, i);
    }
  }
}
