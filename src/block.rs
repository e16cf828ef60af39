/// Occupancy of a region in the block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
  Hole,
  Allocated,
}

/// One contiguous region of the simulated store.
///
/// `offset` and `len` are measured in words, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
  pub offset: usize,
  pub len: usize,
  pub state: BlockState,
}

impl Block {
  pub fn new(
    offset: usize,
    len: usize,
    state: BlockState,
  ) -> Self {
    Self { offset, len, state }
  }

  pub fn is_hole(&self) -> bool {
    self.state == BlockState::Hole
  }
}

/// A free region, as seen by a fit strategy.
///
/// Snapshot type: mutating the block list never invalidates an
/// already-built `Hole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hole {
  pub offset: usize,
  pub len: usize,
}

impl Hole {
  pub fn new(
    offset: usize,
    len: usize,
  ) -> Self {
    Self { offset, len }
  }
}
