//! Test fixtures: a mock GL behaviour provider, end-to-end scenarios and
//! property tests.

mod cases;
