// Environment abstraction for snodelist.
//
// Provides a mockable interface over environment variables and nodelist file input.

mod abstractions;
mod facade;
mod real;

pub(crate) use abstractions::*;
pub(crate) use facade::*;
pub(crate) use real::*;
