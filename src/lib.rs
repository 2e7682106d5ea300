//! Core of a small bytecode-compiled scripting language: an on-demand
//! scanner, a single-pass Pratt compiler, and a stack-based VM, plus a
//! standalone open-addressed hash table. No garbage collector, closures,
//! functions, classes, control flow, or globals — see `DESIGN.md`.

pub mod chunk;
pub mod compiler;
pub mod debug;
pub mod errors;
pub mod objects;
pub mod scanner;
pub mod table;
pub mod value;
pub mod virtual_machine;

pub use virtual_machine::{InterpretResult, VirtualMachine};
