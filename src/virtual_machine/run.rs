//! The opcode dispatch loop. Kept in its own file per-instruction the way
//! the teacher splits a VM's state (`mod.rs`) from its execution (`run.rs`).

use std::io::Write;

use crate::chunk::op_codes::OpCode;
use crate::errors::RuntimeErrorKind;
use crate::objects::{Obj, StringObject};
use crate::value::Value;

use super::Frame;

impl<'a> Frame<'a> {
    pub(crate) fn run(&mut self) -> Result<(), (RuntimeErrorKind, usize)> {
        loop {
            if std::env::var_os("DEBUG_TRACE_EXECUTION").is_some() {
                self.trace();
            }

            let byte = self.read_byte();
            let instruction = OpCode::from_byte(byte)
                .unwrap_or_else(|| unreachable!("invalid opcode byte {:#04x}", byte));

            match instruction {
                OpCode::OP_CONSTANT => {
                    let value = self.read_constant();
                    self.push(value);
                }
                OpCode::OP_NIL => self.push(Value::Nil),
                OpCode::OP_TRUE => self.push(Value::Bool(true)),
                OpCode::OP_FALSE => self.push(Value::Bool(false)),
                OpCode::OP_POP => {
                    self.pop();
                }
                OpCode::OP_EQUAL => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(Value::Bool(a.equals(&b)));
                }
                OpCode::OP_GREATER => self.binary_compare(|a, b| a > b)?,
                OpCode::OP_LESS => self.binary_compare(|a, b| a < b)?,
                OpCode::OP_ADD => self.op_add()?,
                OpCode::OP_SUBTRACT => self.binary_numeric(|a, b| a - b)?,
                OpCode::OP_MULTIPLY => self.binary_numeric(|a, b| a * b)?,
                OpCode::OP_DIVIDE => self.binary_numeric(|a, b| a / b)?,
                OpCode::OP_NOT => {
                    let value = self.pop();
                    self.push(Value::Bool(value.is_falsey()));
                }
                OpCode::OP_NEGATE => match self.peek(0).as_number() {
                    Some(n) => {
                        self.pop();
                        self.push(Value::Number(-n));
                    }
                    None => {
                        return Err((RuntimeErrorKind::OperandMustBeNumber, self.current_line()))
                    }
                },
                OpCode::OP_PRINT => {
                    let value = self.pop();
                    let _ = writeln!(self.out, "{}", value);
                }
                OpCode::OP_RETURN => return Ok(()),
            }
        }
    }

    fn binary_numeric(
        &mut self,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<(), (RuntimeErrorKind, usize)> {
        let (a, b) = match (self.peek(1).as_number(), self.peek(0).as_number()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err((RuntimeErrorKind::OperandsMustBeNumbers, self.current_line())),
        };
        self.pop();
        self.pop();
        self.push(Value::Number(op(a, b)));
        Ok(())
    }

    fn binary_compare(
        &mut self,
        op: impl Fn(f64, f64) -> bool,
    ) -> Result<(), (RuntimeErrorKind, usize)> {
        let (a, b) = match (self.peek(1).as_number(), self.peek(0).as_number()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err((RuntimeErrorKind::OperandsMustBeNumbers, self.current_line())),
        };
        self.pop();
        self.pop();
        self.push(Value::Bool(op(a, b)));
        Ok(())
    }

    fn op_add(&mut self) -> Result<(), (RuntimeErrorKind, usize)> {
        if self.peek(1).is_string() && self.peek(0).is_string() {
            let b = self.pop();
            let a = self.pop();
            let mut joined = String::with_capacity(a.as_string().unwrap().len() + b.as_string().unwrap().len());
            joined.push_str(a.as_string().unwrap());
            joined.push_str(b.as_string().unwrap());
            let obj = self.objects.track(Obj::String(StringObject::take_string(joined)));
            self.push(Value::Obj(obj));
            return Ok(());
        }

        if let (Some(a), Some(b)) = (self.peek(1).as_number(), self.peek(0).as_number()) {
            self.pop();
            self.pop();
            self.push(Value::Number(a + b));
            return Ok(());
        }

        Err((RuntimeErrorKind::AddOperandsInvalid, self.current_line()))
    }

    fn trace(&self) {
        print!("          ");
        for value in &self.stack {
            print!("[ {} ]", value);
        }
        println!();
        crate::debug::disassemble_instruction(self.chunk, self.ip);
    }
}

#[cfg(test)]
mod tests {
    use crate::virtual_machine::{InterpretResult, VirtualMachine};

    fn run(src: &str) -> InterpretResult {
        let mut vm = VirtualMachine::new();
        vm.interpret(src)
    }

    #[test]
    fn arithmetic_precedence_is_respected() {
        // Printed output isn't captured here; this asserts the run completes
        // without a runtime error, which a type mismatch would trigger.
        assert_eq!(run("print 1 + 2 * 3;"), InterpretResult::Ok);
    }

    #[test]
    fn adding_a_number_to_a_string_is_a_runtime_error() {
        assert_eq!(run(r#"print 1 + "a";"#), InterpretResult::RuntimeError);
    }

    #[test]
    fn string_concatenation_succeeds() {
        assert_eq!(run(r#"print "foo" + "bar";"#), InterpretResult::Ok);
    }

    #[test]
    fn negating_a_string_is_a_runtime_error() {
        assert_eq!(run(r#"print -"a";"#), InterpretResult::RuntimeError);
    }

    #[test]
    fn strict_equality_rejects_cross_type_comparison() {
        assert_eq!(run("print 1 == true;"), InterpretResult::Ok);
    }
}
