// Platform abstraction layer for snodelist.
//
// This module provides abstractions over process environment access so that host sources can be
// mocked in tests. The pattern follows the three-layer approach: abstraction (trait) → facade
// (enum) → real implementation.

mod environment;

pub(crate) use environment::*;
