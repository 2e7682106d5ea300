//! The stack-based VM: a fetch-decode-execute loop over a `Chunk`'s bytes.

mod run;

use std::io::{self, Write};

use crate::chunk::Chunk;
use crate::compiler::Compiler;
use crate::errors::report_runtime_error;
use crate::objects::ObjectList;
use crate::value::Value;

pub const STACK_MAX: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
    Ok,
    CompileError,
    RuntimeError,
}

/// Owns every heap object allocated across the lifetime of the VM, so it
/// can `init`/`free` independently of any one script's `Chunk`.
pub struct VirtualMachine {
    objects: ObjectList,
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualMachine {
    pub fn new() -> Self {
        Self { objects: ObjectList::new() }
    }

    /// Compiles and runs `source` against this VM's object registry,
    /// writing `print` output to stdout.
    pub fn interpret(&mut self, source: &str) -> InterpretResult {
        self.interpret_to(source, &mut io::stdout())
    }

    /// Same as `interpret`, but `print` output goes to `out` instead of
    /// stdout. This is the hook integration tests use to assert on a
    /// script's exact printed output.
    pub fn interpret_to(&mut self, source: &str, out: &mut dyn Write) -> InterpretResult {
        let chunk = match Compiler::compile(source, &mut self.objects) {
            Ok(chunk) => chunk,
            Err(()) => return InterpretResult::CompileError,
        };

        if std::env::var_os("DEBUG_PRINT_CODE").is_some() {
            crate::debug::disassemble_chunk(&chunk, "code");
        }

        let mut frame = Frame::new(&chunk, &mut self.objects, out);
        match frame.run() {
            Ok(()) => InterpretResult::Ok,
            Err((kind, line)) => {
                report_runtime_error(kind, line);
                InterpretResult::RuntimeError
            }
        }
    }

    /// Releases every object this VM has allocated. Also runs on `Drop`, so
    /// callers don't have to remember to call it explicitly.
    pub fn free(&mut self) {
        self.objects.clear();
    }
}

impl Drop for VirtualMachine {
    fn drop(&mut self) {
        self.free();
    }
}

pub(crate) struct Frame<'a> {
    chunk: &'a Chunk,
    ip: usize,
    stack: Vec<Value>,
    objects: &'a mut ObjectList,
    out: &'a mut dyn Write,
}

impl<'a> Frame<'a> {
    fn new(chunk: &'a Chunk, objects: &'a mut ObjectList, out: &'a mut dyn Write) -> Self {
        Self { chunk, ip: 0, stack: Vec::with_capacity(STACK_MAX), objects, out }
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Value {
        self.stack.pop().expect("stack underflow: popped an empty VM stack")
    }

    fn peek(&self, distance: usize) -> &Value {
        &self.stack[self.stack.len() - 1 - distance]
    }

    fn read_byte(&mut self) -> u8 {
        let byte = self.chunk.get_byte(self.ip);
        self.ip += 1;
        byte
    }

    fn read_constant(&mut self) -> Value {
        let idx = self.read_byte() as usize;
        self.chunk.get_constant(idx).expect("constant index out of range").clone()
    }

    fn current_line(&self) -> usize {
        self.chunk.get_line(self.ip - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_releases_every_tracked_object() {
        let mut vm = VirtualMachine::new();
        vm.interpret(r#"print "hi" + " there";"#);
        assert!(vm.objects.len() > 0);
        vm.free();
        assert_eq!(vm.objects.len(), 0);
    }
}
