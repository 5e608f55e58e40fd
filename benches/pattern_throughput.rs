/// Benchmark for LIKE pattern matching
///
/// Compares the Turbo Boyer-Moore substring path against the general
/// wildcard matcher on the same subjects.

use sqlcmp::collation;
use sqlcmp::pattern::DEFAULT_ESCAPE;
use sqlcmp::{LikePattern, TurboBoyerMoore};
use std::hint::black_box;
use std::time::Instant;

fn subjects(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| {
            let mut text = "lorem ipsum dolor sit amet ".repeat(8 + i % 5).into_bytes();
            if i % 10 == 0 {
                text.extend_from_slice(b"consectetur adipiscing");
            }
            text
        })
        .collect()
}

fn run(
    name: &str,
    iterations: usize,
    subjects: &[Vec<u8>],
    mut matches: impl FnMut(&[u8]) -> bool,
) {
    let start = Instant::now();
    let mut hits = 0usize;
    for i in 0..iterations {
        if matches(black_box(&subjects[i % subjects.len()])) {
            hits += 1;
        }
    }
    let duration = start.elapsed();
    println!("  {}", name);
    println!("    Matches: {}/{}", hits, iterations);
    println!("    Time: {:?}", duration);
    println!(
        "    Throughput: {:.0} subjects/sec",
        iterations as f64 / duration.as_secs_f64()
    );
}

fn main() {
    println!("=== LIKE Pattern Throughput Benchmark ===\n");

    let subjects = subjects(1000);
    let iterations = 200_000;

    let binary = collation::binary();
    let ci = collation::lookup("ascii_general_ci").expect("ascii_general_ci is built in");
    let utf8 = collation::lookup("utf8_general_ci").expect("utf8_general_ci is built in");

    println!("📊 Substring patterns:");
    let tbm = LikePattern::compile(b"%adipiscing%", DEFAULT_ESCAPE, binary.clone())
        .expect("Failed to compile pattern");
    assert!(tbm.uses_turbo_boyer_moore());
    run("binary, Turbo Boyer-Moore", iterations, &subjects, |s| {
        tbm.matches(s).unwrap_or(false)
    });

    let folded = LikePattern::compile(b"%ADIPISCING%", DEFAULT_ESCAPE, ci)
        .expect("Failed to compile pattern");
    run("ascii_general_ci, Turbo Boyer-Moore", iterations, &subjects, |s| {
        folded.matches(s).unwrap_or(false)
    });

    let wide = LikePattern::compile(b"%ADIPISCING%", DEFAULT_ESCAPE, utf8)
        .expect("Failed to compile pattern");
    run("utf8_general_ci, wildcard matcher", iterations, &subjects, |s| {
        wide.matches(s).unwrap_or(false)
    });
    println!();

    println!("📊 Wildcard patterns:");
    let wildcard = LikePattern::compile(b"lorem%sit_amet%adip%", DEFAULT_ESCAPE, binary)
        .expect("Failed to compile pattern");
    run("binary, wildcard matcher", iterations, &subjects, |s| {
        wildcard.matches(s).unwrap_or(false)
    });
    println!();

    println!("📊 Raw searcher vs naive scan:");
    let searcher = TurboBoyerMoore::new(b"adipiscing", None).expect("Failed to build tables");
    run("Turbo Boyer-Moore find", iterations, &subjects, |s| searcher.matches(s));
    run("naive windows scan", iterations, &subjects, |s| {
        s.windows(10).any(|w| w == b"adipiscing")
    });
    println!();

    println!("✅ Pattern benchmark complete");
}
