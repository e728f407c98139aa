//! Parser for `OpenQASM` 2 program text.
//!
//! Registers are flattened as they are declared: the first `qreg` occupies
//! qubits `0..n`, the next one continues from `n`, and likewise for `creg`.
//! Register-wide arguments broadcast as in `OpenQASM` 2 (`h q;`,
//! `measure q -> c;`, `cx q[0], r;`).

use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use crate::circuit::{Circuit, Gate, Op};
use crate::error::{SimError, SimResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse program text into a flattened [`Circuit`].
pub fn parse(source: &str) -> SimResult<Circuit> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// A register argument, either whole or indexed.
#[derive(Debug, Clone)]
enum Arg {
    Register(String),
    Indexed(String, usize),
}

#[derive(Debug, Clone, Copy)]
struct Register {
    offset: usize,
    size: usize,
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    qregs: FxHashMap<String, Register>,
    cregs: FxHashMap<String, Register>,
    circuit: Circuit,
}

impl Parser {
    fn new(source: &str) -> SimResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(SimError::LexerError {
                        position: span.start,
                        message,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            circuit: Circuit::default(),
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map_or(1, |t| t.line)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn unexpected(&self, expected: &str, found: &Token) -> SimError {
        SimError::UnexpectedToken {
            line: self.line(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn expect(&mut self, expected: Token) -> SimResult<()> {
        let found = self
            .advance()
            .ok_or_else(|| SimError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(self.unexpected(&expected.to_string(), &found));
        }
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_program(&mut self) -> SimResult<Circuit> {
        self.expect(Token::OpenQasm)?;
        self.parse_version()?;
        self.expect(Token::Semicolon)?;

        while !self.is_eof() {
            self.parse_statement()?;
        }

        Ok(std::mem::take(&mut self.circuit))
    }

    fn parse_version(&mut self) -> SimResult<()> {
        match self.advance() {
            Some(Token::FloatLiteral(v)) if v.trunc() == 2.0 => Ok(()),
            Some(Token::IntLiteral(2)) => Ok(()),
            Some(other) => Err(SimError::InvalidVersion(other.to_string())),
            None => Err(SimError::UnexpectedEof("version number".into())),
        }
    }

    fn parse_statement(&mut self) -> SimResult<()> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| SimError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qreg => self.parse_register(true),
            Token::Creg => self.parse_register(false),
            Token::Measure => self.parse_measure(),
            Token::Reset => self.parse_reset(),
            Token::Barrier => self.parse_barrier(),
            Token::Identifier(name) => {
                self.advance();
                self.parse_gate_call(&name)
            }
            other => Err(self.unexpected("statement", &other)),
        }
    }

    /// Includes are accepted and ignored; the gate set is built in.
    fn parse_include(&mut self) -> SimResult<()> {
        self.expect(Token::Include)?;
        match self.advance() {
            Some(Token::StringLiteral(_)) => {}
            Some(other) => return Err(self.unexpected("string literal", &other)),
            None => return Err(SimError::UnexpectedEof("include path".into())),
        }
        self.expect(Token::Semicolon)
    }

    fn parse_register(&mut self, quantum: bool) -> SimResult<()> {
        self.advance();
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_int_literal()? as usize;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;

        if self.qregs.contains_key(&name) || self.cregs.contains_key(&name) {
            return Err(SimError::DuplicateRegister(name));
        }
        if quantum {
            let offset = self.circuit.num_qubits;
            self.circuit.num_qubits += size;
            self.qregs.insert(name, Register { offset, size });
        } else {
            let offset = self.circuit.num_clbits;
            self.circuit.num_clbits += size;
            self.cregs.insert(name, Register { offset, size });
        }
        Ok(())
    }

    fn parse_measure(&mut self) -> SimResult<()> {
        self.expect(Token::Measure)?;
        let qarg = self.parse_arg()?;
        self.expect(Token::Arrow)?;
        let carg = self.parse_arg()?;
        self.expect(Token::Semicolon)?;

        let qubits = resolve(&self.qregs, &qarg)?;
        let clbits = resolve(&self.cregs, &carg)?;
        if qubits.len() != clbits.len() {
            return Err(SimError::RegisterSizeMismatch("measure".into()));
        }
        for (qubit, clbit) in qubits.into_iter().zip(clbits) {
            self.circuit.ops.push(Op::Measure { qubit, clbit });
        }
        Ok(())
    }

    fn parse_reset(&mut self) -> SimResult<()> {
        self.expect(Token::Reset)?;
        let arg = self.parse_arg()?;
        self.expect(Token::Semicolon)?;

        for qubit in resolve(&self.qregs, &arg)? {
            self.circuit.ops.push(Op::Reset(qubit));
        }
        Ok(())
    }

    fn parse_barrier(&mut self) -> SimResult<()> {
        self.expect(Token::Barrier)?;
        for arg in self.parse_arg_list()? {
            resolve(&self.qregs, &arg)?;
        }
        self.expect(Token::Semicolon)?;
        self.circuit.ops.push(Op::Barrier);
        Ok(())
    }

    fn parse_gate_call(&mut self, name: &str) -> SimResult<()> {
        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            Vec::new()
        };
        let gate = Gate::from_name(name, &params)?;

        let args = self.parse_arg_list()?;
        self.expect(Token::Semicolon)?;

        if args.len() != gate.num_qubits() {
            return Err(SimError::WrongQubitCount {
                gate: name.to_string(),
                expected: gate.num_qubits(),
                got: args.len(),
            });
        }

        let resolved = args
            .iter()
            .map(|arg| resolve(&self.qregs, arg).map(|q| (matches!(arg, Arg::Register(_)), q)))
            .collect::<SimResult<Vec<_>>>()?;

        // Whole registers broadcast; indexed qubits repeat.
        let mut width = None;
        for (is_register, qubits) in &resolved {
            if *is_register {
                match width {
                    None => width = Some(qubits.len()),
                    Some(w) if w != qubits.len() => {
                        return Err(SimError::RegisterSizeMismatch(name.to_string()));
                    }
                    Some(_) => {}
                }
            }
        }

        for i in 0..width.unwrap_or(1) {
            let qubits: Vec<usize> = resolved
                .iter()
                .map(|(is_register, q)| if *is_register { q[i] } else { q[0] })
                .collect();
            let mut seen = qubits.clone();
            seen.sort_unstable();
            seen.dedup();
            if seen.len() != qubits.len() {
                return Err(SimError::RepeatedQubit(name.to_string()));
            }
            self.circuit.ops.push(Op::Gate { gate, qubits });
        }
        Ok(())
    }

    fn parse_arg_list(&mut self) -> SimResult<Vec<Arg>> {
        let mut args = vec![self.parse_arg()?];
        while self.consume(&Token::Comma) {
            args.push(self.parse_arg()?);
        }
        Ok(args)
    }

    fn parse_arg(&mut self) -> SimResult<Arg> {
        let name = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()? as usize;
            self.expect(Token::RBracket)?;
            Ok(Arg::Indexed(name, index))
        } else {
            Ok(Arg::Register(name))
        }
    }

    // =========================================================================
    // Parameter expressions
    // =========================================================================

    fn parse_expression_list(&mut self) -> SimResult<Vec<f64>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression(0)?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression(0)?);
        }
        Ok(exprs)
    }

    /// Precedence climbing over `+ -`, `* /` and right-associative `^`.
    fn parse_expression(&mut self, min_prec: u8) -> SimResult<f64> {
        let mut left = self.parse_unary()?;

        loop {
            let (prec, right_assoc) = match self.peek() {
                Some(Token::Plus | Token::Minus) => (1, false),
                Some(Token::Star | Token::Slash) => (2, false),
                Some(Token::Caret) => (3, true),
                _ => break,
            };
            if prec < min_prec {
                break;
            }
            let Some(op) = self.advance() else { break };
            let next_min = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_expression(next_min)?;

            left = match op {
                Token::Plus => left + right,
                Token::Minus => left - right,
                Token::Star => left * right,
                Token::Slash => left / right,
                _ => left.powf(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> SimResult<f64> {
        if self.consume(&Token::Minus) {
            return Ok(-self.parse_unary()?);
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary();
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> SimResult<f64> {
        let token = self
            .advance()
            .ok_or_else(|| SimError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => Ok(v as f64),
            Token::FloatLiteral(v) => Ok(v),
            Token::Pi => Ok(PI),
            Token::LParen => {
                let value = self.parse_expression(0)?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Token::Identifier(func) => {
                self.expect(Token::LParen)?;
                let arg = self.parse_expression(0)?;
                self.expect(Token::RParen)?;
                match func.as_str() {
                    "sin" => Ok(arg.sin()),
                    "cos" => Ok(arg.cos()),
                    "tan" => Ok(arg.tan()),
                    "exp" => Ok(arg.exp()),
                    "ln" => Ok(arg.ln()),
                    "sqrt" => Ok(arg.sqrt()),
                    _ => Err(self.unexpected("expression", &Token::Identifier(func.clone()))),
                }
            }
            other => Err(self.unexpected("expression", &other)),
        }
    }

    fn parse_identifier(&mut self) -> SimResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(self.unexpected("identifier", &other)),
            None => Err(SimError::UnexpectedEof("identifier".into())),
        }
    }

    fn parse_int_literal(&mut self) -> SimResult<u64> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Ok(v),
            Some(other) => Err(self.unexpected("integer", &other)),
            None => Err(SimError::UnexpectedEof("integer".into())),
        }
    }
}

/// Absolute positions addressed by `arg` within `registers`.
fn resolve(registers: &FxHashMap<String, Register>, arg: &Arg) -> SimResult<Vec<usize>> {
    match arg {
        Arg::Register(name) => {
            let reg = registers
                .get(name)
                .ok_or_else(|| SimError::UndefinedRegister(name.clone()))?;
            Ok((reg.offset..reg.offset + reg.size).collect())
        }
        Arg::Indexed(name, index) => {
            let reg = registers
                .get(name)
                .ok_or_else(|| SimError::UndefinedRegister(name.clone()))?;
            if *index >= reg.size {
                return Err(SimError::IndexOutOfBounds {
                    register: name.clone(),
                    index: *index,
                    size: reg.size,
                });
            }
            Ok(vec![reg.offset + index])
        }
    }
}
