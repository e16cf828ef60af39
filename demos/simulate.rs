use std::io::Read;

use memsim::{BestFit, Hole, MemoryManager, WorstFit};

/// Waits until the user presses ENTER.
/// Useful when you want to compare the printed hole map and bitmap against
/// what you expect before letting the scenario advance.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the hole inventory and the occupancy bitmap payload.
fn print_state(
  label: &str,
  manager: &MemoryManager,
) {
  let holes: Vec<String> = manager
    .holes()
    .iter()
    .map(|hole| format!("[{}, {}]", hole.offset, hole.len))
    .collect();

  let bitmap = manager.bitmap();
  let payload: Vec<String> = bitmap[2..].iter().map(|byte| format!("{byte:08b}")).collect();

  println!("[{label}] holes   = {}", if holes.is_empty() { "(none)".into() } else { holes.join(" - ") });
  println!("[{label}] bitmap  = {} (LSB-first, 1 = allocated)", payload.join(" "));
}

/// Arguments: [word_size_bytes] [capacity_words] [best|worst], all optional.
fn parse_args() -> (usize, usize, &'static str) {
  let mut args = std::env::args().skip(1);

  let word_size = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(8);
  let capacity = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(32);
  let strategy = match args.next().as_deref() {
    Some("worst") => "worst",
    _ => "best",
  };

  (word_size, capacity, strategy)
}

fn main() {
  let (word_size, capacity, strategy) = parse_args();

  // The simulator under study. It holds:
  // - a fixed byte arena of `word_size * capacity` bytes
  // - an ordered block list of holes and allocations covering it
  // - an offset index mapping block starts to list positions
  let mut manager = MemoryManager::new(
    word_size,
    if strategy == "worst" {
      Box::new(WorstFit) as Box<dyn memsim::FitStrategy>
    } else {
      Box::new(BestFit)
    },
  );

  if let Err(err) = manager.initialize(capacity) {
    eprintln!("initialize({capacity}) failed: {err}");
    std::process::exit(1);
  }

  println!(
    "Simulating a {capacity}-word store ({} bytes, {word_size}-byte words, {strategy} fit)",
    manager.memory_limit(),
  );
  println!("Store base address = {:?}", manager.memory_start());
  print_state("start", &manager);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Carve the store into four allocations.
  // --------------------------------------------------------------------
  let quarter = capacity / 4 * word_size;
  let a = manager.allocate(quarter);
  let b = manager.allocate(quarter);
  let c = manager.allocate(quarter);
  let d = manager.allocate(quarter);
  println!("\n[1] Four allocations of {quarter} bytes each");
  println!("[1] a = {a:?}, b = {b:?}, c = {c:?}, d = {d:?}");
  print_state("1", &manager);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Free a and c: two separate holes appear, kept apart by b.
  // --------------------------------------------------------------------
  manager.free(a);
  manager.free(c);
  println!("\n[2] Freed a and c (b and d still live)");
  print_state("2", &manager);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Free b: the hole-allocated-hole sandwich collapses into a single
  //    hole in one step.
  // --------------------------------------------------------------------
  manager.free(b);
  println!("\n[3] Freed b (watch both neighbors coalesce)");
  print_state("3", &manager);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Ask for more than the largest hole: allocation fails with a null
  //    pointer even though the aggregate free space would suffice.
  // --------------------------------------------------------------------
  let oversized = manager.allocate(manager.memory_limit());
  println!("\n[4] Oversized request -> {oversized:?} (null means no fit)");
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Swap strategies on the fly: a custom first-fit closure.
  // --------------------------------------------------------------------
  manager.set_allocator(Box::new(|size_in_words: usize, holes: &[Hole]| {
    holes.iter().find(|hole| hole.len >= size_in_words).map(|hole| hole.offset)
  }));
  let e = manager.allocate(word_size);
  println!("\n[5] One-word allocation under a custom first-fit closure");
  println!("[5] e = {e:?}");
  print_state("5", &manager);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 6) Dump the hole map to a file, then shut down.
  // --------------------------------------------------------------------
  let path = std::env::temp_dir().join("memsim_map.txt");
  let path = path.to_string_lossy();
  match manager.dump_memory_map(&path) {
    Ok(()) => println!("\n[6] Hole map written to {path}"),
    Err(err) => println!("\n[6] dump_memory_map failed: {err}"),
  }

  manager.shutdown();
  println!("[6] Store released. The manager could be re-initialized from here.");
}
