//! Result reporter: formats PASS/FAIL/SKIP lines and prints a summary.

use crate::contract::Contract;
use crate::runner::Outcome;

#[derive(Debug, Default)]
pub struct Reporter {
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, contract: &Contract, outcome: Outcome) {
        let label = format!("[{}/{}] {}", contract.area, contract.id, contract.description);
        match outcome {
            Outcome::Pass => {
                self.passed += 1;
                println!("PASS  {label}");
            }
            Outcome::Skip(reason) => {
                self.skipped += 1;
                println!("SKIP  {label}");
                println!("        {reason}");
            }
            Outcome::Fail(mismatches) => {
                self.failed += 1;
                println!("FAIL  {label}");
                for mismatch in &mismatches {
                    println!("        {mismatch}");
                }
            }
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("────────────────────────────────────────────────────");
        println!(
            "Results: {} passed, {} failed, {} skipped",
            self.passed, self.failed, self.skipped
        );
    }

    /// Skips do not count as failures.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
