#![forbid(unsafe_code)]

//! Library half of the colfit demo binary: CLI parsing and the scripted
//! resize session, kept here so both are testable.

pub mod cli;
pub mod session;
