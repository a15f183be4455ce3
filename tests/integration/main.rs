//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the service loop
//! against mock adapters on a simulated clock.  All tests run on the host
//! (x86_64) with no real hardware required.

mod cycle_tests;
mod mock_hw;
mod training_tests;
