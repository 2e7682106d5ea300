//! The instruction set the compiler emits and the VM executes.
//!
//! **NOTE:** the discriminant order here is load-bearing: `OpCode::from_byte`
//! decodes raw bytes positionally, so inserting or reordering a variant
//! breaks every chunk compiled against the old layout.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    OP_CONSTANT,
    OP_NIL,
    OP_TRUE,
    OP_FALSE,
    OP_POP,
    OP_EQUAL,
    OP_GREATER,
    OP_LESS,
    OP_ADD,
    OP_SUBTRACT,
    OP_MULTIPLY,
    OP_DIVIDE,
    OP_NOT,
    OP_NEGATE,
    OP_PRINT,
    OP_RETURN,
}

impl OpCode {
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        FromPrimitive::from_u8(byte)
    }
}
