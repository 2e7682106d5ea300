//! Runtime error formatting. Compile-time errors are reported inline by the
//! compiler (`compiler::Compiler::error_at`), matching clox's own
//! `errorAt`; this module covers the VM's side of the error contract.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    OperandMustBeNumber,
    OperandsMustBeNumbers,
    AddOperandsInvalid,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            RuntimeErrorKind::OperandMustBeNumber => "Operand must be a number.",
            RuntimeErrorKind::OperandsMustBeNumbers => "Operands must be numbers.",
            RuntimeErrorKind::AddOperandsInvalid => "Operands must be two numbers or two strings.",
        };
        write!(f, "{}", message)
    }
}

/// Prints a runtime error the way the language's external contract requires:
/// the message, then a one-line "in script" traceback naming the source line.
pub fn report_runtime_error(kind: RuntimeErrorKind, line: usize) {
    eprintln!("{}", kind);
    eprintln!("[line {}] in script", line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_external_contract() {
        assert_eq!(RuntimeErrorKind::OperandMustBeNumber.to_string(), "Operand must be a number.");
        assert_eq!(
            RuntimeErrorKind::AddOperandsInvalid.to_string(),
            "Operands must be two numbers or two strings."
        );
    }
}
