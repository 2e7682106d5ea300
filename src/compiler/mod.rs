//! A single-pass compiler: no intermediate AST is built. Each declaration is
//! scanned, parsed, and turned directly into bytecode in one pass, driven by
//! a Pratt (precedence-climbing) expression parser.

mod rules;

use rules::{get_rule, ParseFn, Precedence};

use crate::chunk::{op_codes::OpCode, Chunk, ConstantPos};
use crate::objects::{Obj, ObjectList, StringObject};
use crate::scanner::{Scanner, Token, TokenKind};
use crate::value::Value;

pub struct Compiler<'a> {
    scanner: Scanner<'a>,
    previous: Token<'a>,
    current: Token<'a>,
    had_error: bool,
    panic_mode: bool,
    chunk: Chunk,
}

impl<'a> Compiler<'a> {
    /// Compiles `source` into a `Chunk`, registering every string literal
    /// encountered onto `objects` so the VM can release it later. Returns
    /// `Err(())` if a syntax error was reported; callers should not attempt
    /// to run a chunk that failed to compile.
    pub fn compile(source: &'a str, objects: &mut ObjectList) -> Result<Chunk, ()> {
        let sentinel = Token { kind: TokenKind::Eof, lexeme: "", line: 0 };
        let mut compiler = Compiler {
            scanner: Scanner::new(source),
            previous: sentinel,
            current: sentinel,
            had_error: false,
            panic_mode: false,
            chunk: Chunk::new(),
        };

        compiler.advance();
        while !compiler.check(TokenKind::Eof) {
            compiler.declaration(objects);
        }
        compiler.emit_op(OpCode::OP_RETURN);

        if compiler.had_error {
            Err(())
        } else {
            Ok(compiler.chunk)
        }
    }

    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme.to_string();
            self.error_at_current(&message);
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line;
        self.chunk.write_byte(byte, line);
    }

    fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op as u8);
    }

    fn emit_ops(&mut self, a: OpCode, b: OpCode) {
        self.emit_op(a);
        self.emit_op(b);
    }

    fn emit_constant(&mut self, value: Value) {
        let idx = match self.chunk.add_constant(value) {
            ConstantPos::Pos(idx) => idx,
            ConstantPos::Overflow => {
                self.error("Too many constants in one chunk.");
                0
            }
        };
        self.emit_op(OpCode::OP_CONSTANT);
        self.emit_byte(idx);
    }

    fn declaration(&mut self, objects: &mut ObjectList) {
        self.statement(objects);
        if self.panic_mode {
            self.synchronize();
        }
    }

    fn statement(&mut self, objects: &mut ObjectList) {
        if self.matches(TokenKind::Print) {
            self.print_statement(objects);
        } else {
            self.expression_statement(objects);
        }
    }

    fn print_statement(&mut self, objects: &mut ObjectList) {
        self.expression(objects);
        self.consume(TokenKind::Semicolon, "Expect ';' after value.");
        self.emit_op(OpCode::OP_PRINT);
    }

    fn expression_statement(&mut self, objects: &mut ObjectList) {
        self.expression(objects);
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.");
        self.emit_op(OpCode::OP_POP);
    }

    fn expression(&mut self, objects: &mut ObjectList) {
        self.parse_precedence(Precedence::Assignment, objects);
    }

    fn parse_precedence(&mut self, precedence: Precedence, objects: &mut ObjectList) {
        self.advance();
        let prefix = get_rule(self.previous.kind).prefix;
        match prefix {
            Some(f) => self.call_parse_fn(f, objects),
            None => {
                self.error("Expect expression.");
                return;
            }
        }

        while precedence <= get_rule(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = get_rule(self.previous.kind).infix {
                self.call_parse_fn(infix, objects);
            }
        }
    }

    fn call_parse_fn(&mut self, f: ParseFn, objects: &mut ObjectList) {
        match f {
            ParseFn::Number => self.number(),
            ParseFn::String => self.string(objects),
            ParseFn::Literal => self.literal(),
            ParseFn::Grouping => self.grouping(objects),
            ParseFn::Unary => self.unary(objects),
            ParseFn::Binary => self.binary(objects),
        }
    }

    fn number(&mut self) {
        let value: f64 = self.previous.lexeme.parse().unwrap_or(0.0);
        self.emit_constant(Value::Number(value));
    }

    fn string(&mut self, objects: &mut ObjectList) {
        let raw = self.previous.lexeme;
        let text = &raw[1..raw.len() - 1];
        let obj = objects.track(Obj::String(StringObject::copy_string(text)));
        self.emit_constant(Value::Obj(obj));
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenKind::False => self.emit_op(OpCode::OP_FALSE),
            TokenKind::Nil => self.emit_op(OpCode::OP_NIL),
            TokenKind::True => self.emit_op(OpCode::OP_TRUE),
            _ => unreachable!("literal() called for a non-literal token"),
        }
    }

    fn grouping(&mut self, objects: &mut ObjectList) {
        self.expression(objects);
        self.consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self, objects: &mut ObjectList) {
        let operator = self.previous.kind;
        self.parse_precedence(Precedence::Unary, objects);
        match operator {
            TokenKind::Minus => self.emit_op(OpCode::OP_NEGATE),
            TokenKind::Bang => self.emit_op(OpCode::OP_NOT),
            _ => unreachable!("unary() called for a non-unary operator"),
        }
    }

    fn binary(&mut self, objects: &mut ObjectList) {
        let operator = self.previous.kind;
        let rule = get_rule(operator);
        self.parse_precedence(rule.precedence.next(), objects);

        match operator {
            TokenKind::Plus => self.emit_op(OpCode::OP_ADD),
            TokenKind::Minus => self.emit_op(OpCode::OP_SUBTRACT),
            TokenKind::Star => self.emit_op(OpCode::OP_MULTIPLY),
            TokenKind::Slash => self.emit_op(OpCode::OP_DIVIDE),
            TokenKind::EqualEqual => self.emit_op(OpCode::OP_EQUAL),
            TokenKind::BangEqual => self.emit_ops(OpCode::OP_EQUAL, OpCode::OP_NOT),
            TokenKind::Greater => self.emit_op(OpCode::OP_GREATER),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::OP_LESS, OpCode::OP_NOT),
            TokenKind::Less => self.emit_op(OpCode::OP_LESS),
            TokenKind::LessEqual => self.emit_ops(OpCode::OP_GREATER, OpCode::OP_NOT),
            _ => unreachable!("binary() called for a non-binary operator"),
        }
    }

    fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(token, message);
    }

    fn error(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        eprint!("[line {}] Error", token.line);
        match token.kind {
            TokenKind::Eof => eprint!(" at end"),
            TokenKind::Error => {}
            _ => eprint!(" at '{}'", token.lexeme),
        }
        eprintln!(": {}", message);
    }

    /// Discards tokens until a likely statement boundary, so one syntax
    /// error doesn't cascade into a flood of unrelated ones.
    fn synchronize(&mut self) {
        self.panic_mode = false;

        while self.current.kind != TokenKind::Eof {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }
            match self.current.kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(src: &str) -> Result<Chunk, ()> {
        let mut objects = ObjectList::new();
        Compiler::compile(src, &mut objects)
    }

    #[test]
    fn arithmetic_precedence_binds_factor_tighter_than_term() {
        let chunk = compile("1 + 2 * 3;").expect("should compile");
        let ops: Vec<OpCode> = chunk
            .code
            .iter()
            .filter_map(|b| OpCode::from_byte(*b))
            .collect();
        assert_eq!(
            ops,
            vec![
                OpCode::OP_CONSTANT,
                OpCode::OP_CONSTANT,
                OpCode::OP_CONSTANT,
                OpCode::OP_MULTIPLY,
                OpCode::OP_ADD,
                OpCode::OP_POP,
                OpCode::OP_RETURN,
            ]
        );
    }

    #[test]
    fn not_equal_desugars_to_equal_then_not() {
        let chunk = compile("1 != 2;").expect("should compile");
        let ops: Vec<OpCode> = chunk
            .code
            .iter()
            .filter_map(|b| OpCode::from_byte(*b))
            .collect();
        assert!(ops.windows(2).any(|w| w == [OpCode::OP_EQUAL, OpCode::OP_NOT]));
    }

    #[test]
    fn missing_semicolon_is_a_compile_error() {
        assert!(compile("1 + 2").is_err());
    }

    #[test]
    fn one_error_does_not_cascade_across_a_statement_boundary() {
        let mut objects = ObjectList::new();
        let result = Compiler::compile("print 1 + ; print 2;", &mut objects);
        assert!(result.is_err());
    }

    #[test]
    fn overflowing_the_constant_pool_reports_an_error_without_panicking() {
        // 257 distinct number literals overflow the 256-slot constant pool;
        // the compiler must report the error and keep compiling (emitting a
        // placeholder OP_CONSTANT 0) rather than panicking mid-chunk.
        let mut source = String::new();
        for i in 0..257 {
            source.push_str(&format!("{};\n", i));
        }
        assert!(compile(&source).is_err());
    }
}
