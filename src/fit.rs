use crate::block::Hole;

/// Picks the hole an allocation goes into.
///
/// A strategy only reads the inventory snapshot it is handed; it never
/// mutates the block list. It returns the word offset of the chosen hole,
/// or `None` when no hole is large enough.
///
/// Any `Fn(usize, &[Hole]) -> Option<usize>` closure is a strategy too,
/// so callers can plug in custom selection logic without a new type:
///
/// ```rust
/// use memsim::{BestFit, Hole, MemoryManager};
///
/// // First fit: take the lowest-offset hole that is large enough.
/// let first_fit = |size_in_words: usize, holes: &[Hole]| {
///   holes
///     .iter()
///     .find(|hole| hole.len >= size_in_words)
///     .map(|hole| hole.offset)
/// };
///
/// let mut manager = MemoryManager::new(8, Box::new(BestFit));
/// manager.set_allocator(Box::new(first_fit));
/// ```
pub trait FitStrategy {
  fn select_hole(
    &self,
    size_in_words: usize,
    holes: &[Hole],
  ) -> Option<usize>;
}

impl<F> FitStrategy for F
where
  F: Fn(usize, &[Hole]) -> Option<usize>,
{
  fn select_hole(
    &self,
    size_in_words: usize,
    holes: &[Hole],
  ) -> Option<usize> {
    self(size_in_words, holes)
  }
}

/// Chooses the smallest hole that satisfies the request.
///
/// Ties keep the first hole encountered in ascending-offset order: the
/// running minimum is only replaced on a strictly smaller length.
pub struct BestFit;

impl FitStrategy for BestFit {
  fn select_hole(
    &self,
    size_in_words: usize,
    holes: &[Hole],
  ) -> Option<usize> {
    let mut best: Option<Hole> = None;

    for hole in holes {
      if hole.len >= size_in_words && best.is_none_or(|b| hole.len < b.len) {
        best = Some(*hole);
      }
    }

    best.map(|hole| hole.offset)
  }
}

/// Chooses the largest hole that satisfies the request.
///
/// Ties keep the first hole encountered, mirroring `BestFit`.
pub struct WorstFit;

impl FitStrategy for WorstFit {
  fn select_hole(
    &self,
    size_in_words: usize,
    holes: &[Hole],
  ) -> Option<usize> {
    let mut worst: Option<Hole> = None;

    for hole in holes {
      if hole.len >= size_in_words && worst.is_none_or(|w| hole.len > w.len) {
        worst = Some(*hole);
      }
    }

    worst.map(|hole| hole.offset)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // Holes of 10, 20, 5 and 30 words in ascending-offset order.
  fn inventory() -> Vec<Hole> {
    vec![
      Hole::new(0, 10),
      Hole::new(15, 20),
      Hole::new(40, 5),
      Hole::new(50, 30),
    ]
  }

  #[test]
  fn test_best_fit_picks_smallest_sufficient_hole() {
    let holes = inventory();

    assert_eq!(Some(0), BestFit.select_hole(8, &holes));
    assert_eq!(Some(40), BestFit.select_hole(3, &holes));
    assert_eq!(Some(50), BestFit.select_hole(25, &holes));
  }

  #[test]
  fn test_worst_fit_picks_largest_sufficient_hole() {
    let holes = inventory();

    assert_eq!(Some(50), WorstFit.select_hole(8, &holes));
    assert_eq!(Some(50), WorstFit.select_hole(3, &holes));
    assert_eq!(Some(50), WorstFit.select_hole(30, &holes));
  }

  #[test]
  fn test_no_fit_when_largest_hole_is_too_small() {
    let holes = inventory();

    assert_eq!(None, BestFit.select_hole(31, &holes));
    assert_eq!(None, WorstFit.select_hole(31, &holes));
    assert_eq!(None, BestFit.select_hole(1, &[]));
  }

  #[test]
  fn test_ties_keep_first_encountered_hole() {
    let holes = vec![Hole::new(0, 12), Hole::new(20, 12), Hole::new(40, 12)];

    assert_eq!(Some(0), BestFit.select_hole(4, &holes));
    assert_eq!(Some(0), WorstFit.select_hole(4, &holes));
  }

  #[test]
  fn test_closure_as_strategy() {
    let holes = inventory();

    let first_fit = |size_in_words: usize, holes: &[Hole]| {
      holes
        .iter()
        .find(|hole| hole.len >= size_in_words)
        .map(|hole| hole.offset)
    };

    assert_eq!(Some(0), first_fit.select_hole(8, &holes));
    assert_eq!(Some(15), first_fit.select_hole(12, &holes));
    assert_eq!(None, first_fit.select_hole(64, &holes));
  }
}
