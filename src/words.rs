/// Converts a byte count into a word count, rounding up.
///
/// A request that does not fill its last word still consumes it whole;
/// one word is the allocation granularity.
///
/// # Examples
///
/// ```rust
/// use memsim::words;
///
/// assert_eq!(words!(0, 8), 0);
/// assert_eq!(words!(1, 8), 1);
/// assert_eq!(words!(8, 8), 1);
/// assert_eq!(words!(9, 8), 2);
/// ```
#[macro_export]
macro_rules! words {
  ($bytes:expr, $word_size:expr) => {
    ($bytes + $word_size - 1) / $word_size
  };
}

#[cfg(test)]
mod tests {
  #[test]
  fn test_words() {
    for word_size in [1usize, 2, 4, 8, 16] {
      assert_eq!(0, words!(0, word_size));

      for i in 0..10 {
        let sizes = (word_size * i + 1)..=(word_size * (i + 1));

        let expected_words = i + 1;

        for size in sizes {
          assert_eq!(expected_words, words!(size, word_size));
        }
      }
    }
  }
}
