//! A textual disassembler: turns a `Chunk`'s raw bytes back into
//! human-readable mnemonics. Used both for a one-shot post-compile dump
//! (`DEBUG_PRINT_CODE`) and to trace each instruction as it executes
//! (`DEBUG_TRACE_EXECUTION`).

use crate::chunk::{op_codes::OpCode, Chunk};

pub fn disassemble_chunk(chunk: &Chunk, name: &str) {
    println!("== {} ==", name);
    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset);
    }
}

pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> usize {
    print!("{:04} ", offset);

    if offset > 0 && chunk.get_line(offset) == chunk.get_line(offset - 1) {
        print!("   | ");
    } else {
        print!("{:4} ", chunk.get_line(offset));
    }

    let byte = chunk.get_byte(offset);
    match OpCode::from_byte(byte) {
        Some(OpCode::OP_CONSTANT) => constant_instruction("OP_CONSTANT", chunk, offset),
        Some(OpCode::OP_NIL) => simple_instruction("OP_NIL", offset),
        Some(OpCode::OP_TRUE) => simple_instruction("OP_TRUE", offset),
        Some(OpCode::OP_FALSE) => simple_instruction("OP_FALSE", offset),
        Some(OpCode::OP_POP) => simple_instruction("OP_POP", offset),
        Some(OpCode::OP_EQUAL) => simple_instruction("OP_EQUAL", offset),
        Some(OpCode::OP_GREATER) => simple_instruction("OP_GREATER", offset),
        Some(OpCode::OP_LESS) => simple_instruction("OP_LESS", offset),
        Some(OpCode::OP_ADD) => simple_instruction("OP_ADD", offset),
        Some(OpCode::OP_SUBTRACT) => simple_instruction("OP_SUBTRACT", offset),
        Some(OpCode::OP_MULTIPLY) => simple_instruction("OP_MULTIPLY", offset),
        Some(OpCode::OP_DIVIDE) => simple_instruction("OP_DIVIDE", offset),
        Some(OpCode::OP_NOT) => simple_instruction("OP_NOT", offset),
        Some(OpCode::OP_NEGATE) => simple_instruction("OP_NEGATE", offset),
        Some(OpCode::OP_PRINT) => simple_instruction("OP_PRINT", offset),
        Some(OpCode::OP_RETURN) => simple_instruction("OP_RETURN", offset),
        None => {
            println!("Unknown opcode {:#04x}", byte);
            offset + 1
        }
    }
}

fn simple_instruction(name: &str, offset: usize) -> usize {
    println!("{}", name);
    offset + 1
}

fn constant_instruction(name: &str, chunk: &Chunk, offset: usize) -> usize {
    let idx = chunk.get_byte(offset + 1) as usize;
    let value = chunk.get_constant(idx).expect("constant index should be in range");
    println!("{:-16} {:4} '{}'", name, idx, value);
    offset + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn constant_instruction_advances_past_its_operand() {
        let mut chunk = Chunk::new();
        chunk.add_constant(Value::Number(1.0));
        chunk.write_op(OpCode::OP_CONSTANT, 1);
        chunk.write_byte(0, 1);
        let next = disassemble_instruction(&chunk, 0);
        assert_eq!(next, 2);
    }
}
