//! Reader for a textual subset of LLVM IR.
//!
//! Only function definitions are read. Module-level lines (`declare`,
//! `attributes`, metadata, globals, target triples) are skipped, as are
//! fast-math flags, parameter attributes, `tail` markers and trailing
//! `, align N` / `!dbg` decorations. Any instruction outside the supported
//! subset is kept as [`Opcode::Other`] so the translator can report it.

mod lexer;

use std::collections::HashMap;

use super::{
    Builder, FloatPredicate, Function, IntPredicate, Module, Opcode, Predicate, Type, ValueRef,
};
use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};

pub use lexer::{Lexer, Token};

type ParseResult<T> = Result<T, Diagnostic>;

/// Read every function definition in `source`.
pub fn parse_module(source: &str) -> Result<Module, Vec<Diagnostic>> {
    let (tokens, diagnostics) = Lexer::new(source).tokenize();
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }
    Parser::new(tokens).parse_module()
}

/// Read a source containing exactly one function definition.
pub fn parse_function(source: &str) -> Result<Function, Vec<Diagnostic>> {
    let mut module = parse_module(source)?;
    if module.functions.len() != 1 {
        return Err(vec![Diagnostic::error(
            format!(
                "expected exactly one function definition, found {}",
                module.functions.len()
            ),
            Span::dummy(),
        )]);
    }
    Ok(module.functions.remove(0))
}

/// Opcode, operands and result type of one parsed line.
struct Parsed {
    opcode: Opcode,
    operands: Vec<ValueRef>,
    ty: Type,
    predicate: Option<Predicate>,
}

impl Parsed {
    fn new(opcode: Opcode, operands: Vec<ValueRef>, ty: Type) -> Self {
        Self {
            opcode,
            operands,
            ty,
            predicate: None,
        }
    }

    fn effect(opcode: Opcode, operands: Vec<ValueRef>) -> Self {
        Self::new(opcode, operands, Type::Void)
    }
}

/// Per-function state: the builder and the `%name` → value map.
struct Scope<'f> {
    builder: Builder<'f>,
    locals: HashMap<String, ValueRef>,
}

const FAST_MATH_FLAGS: &[&str] = &[
    "fast", "nnan", "ninf", "nsz", "arcp", "contract", "afn", "reassoc",
];

fn type_word(word: &str) -> Option<Type> {
    match word {
        "double" => Some(Type::Double),
        "float" => Some(Type::Float),
        "void" => Some(Type::Void),
        "ptr" => Some(Type::Ptr),
        "label" => Some(Type::Label),
        _ => word
            .strip_prefix('i')
            .and_then(|bits| bits.parse::<u32>().ok())
            .filter(|&bits| bits > 0)
            .map(Type::Int),
    }
}

fn is_value_word(word: &str) -> bool {
    matches!(
        word,
        "true" | "false" | "null" | "undef" | "poison" | "zeroinitializer"
    )
}

struct Parser {
    tokens: Vec<Spanned<Token>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    fn new(tokens: Vec<Spanned<Token>>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    fn parse_module(mut self) -> Result<Module, Vec<Diagnostic>> {
        let mut module = Module::default();
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::Newline => {
                    self.advance();
                }
                Token::Word(w) if w == "define" => match self.parse_define() {
                    Ok(func) => module.functions.push(func),
                    Err(diag) => {
                        self.diagnostics.push(diag);
                        self.skip_past_body();
                    }
                },
                _ => self.skip_line(),
            }
        }
        if self.diagnostics.is_empty() {
            Ok(module)
        } else {
            Err(self.diagnostics)
        }
    }

    fn parse_define(&mut self) -> ParseResult<Function> {
        self.advance(); // define

        // Linkage, return attributes and return type up to the name
        let name = loop {
            match self.peek().clone() {
                Token::Global(name) => {
                    self.advance();
                    break name;
                }
                Token::Newline | Token::Eof | Token::LBrace => {
                    return Err(self.error_here("expected a function name after 'define'"));
                }
                _ => {
                    self.advance();
                }
            }
        };

        self.expect(&Token::LParen)?;
        let mut params: Vec<(Type, String)> = Vec::new();
        while !self.at(&Token::RParen) {
            if self.at(&Token::Ellipsis) {
                return Err(self.error_here("variadic functions are not supported"));
            }
            let ty = self.parse_type()?;
            let mut param_name = None;
            loop {
                match self.peek().clone() {
                    Token::Local(n) => {
                        self.advance();
                        param_name = Some(n);
                        break;
                    }
                    Token::Comma | Token::RParen => break,
                    Token::Newline | Token::Eof => {
                        return Err(self.error_here("unterminated parameter list"));
                    }
                    _ => {
                        self.advance();
                    }
                }
            }
            // Unnamed parameters are numbered like LLVM does: %0, %1, ...
            let param_name = param_name.unwrap_or_else(|| params.len().to_string());
            params.push((ty, param_name));
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;

        // Function attributes up to the body
        while !self.at(&Token::LBrace) {
            if matches!(self.peek(), Token::Newline | Token::Eof) {
                return Err(self.error_here("expected '{' to open the function body"));
            }
            self.advance();
        }
        self.advance();

        let mut func = Function::with_args(&name, &params);
        {
            let mut scope = Scope {
                builder: Builder::new(&mut func),
                locals: HashMap::new(),
            };
            for (i, (_, param)) in params.iter().enumerate() {
                let arg = scope.builder.arg(i);
                scope.locals.insert(param.clone(), arg);
            }
            self.parse_body(&mut scope)?;
        }
        Ok(func)
    }

    fn parse_body(&mut self, scope: &mut Scope<'_>) -> ParseResult<()> {
        loop {
            let label = match (self.peek(), self.peek_at(1)) {
                (Token::Word(name), Token::Colon) => Some(name.clone()),
                (Token::Int(n), Token::Colon) => Some(n.to_string()),
                (Token::Str(name), Token::Colon) => Some(name.clone()),
                _ => None,
            };
            if let Some(label) = label {
                self.advance();
                self.advance();
                scope.builder.label(&label);
                continue;
            }
            match self.peek() {
                Token::Newline => {
                    self.advance();
                }
                Token::RBrace => {
                    self.advance();
                    return Ok(());
                }
                Token::Eof => {
                    return Err(self.error_here("expected '}' at the end of the function body"));
                }
                _ => {
                    if let Err(diag) = self.parse_instruction(scope) {
                        self.diagnostics.push(diag);
                    }
                    self.skip_line();
                }
            }
        }
    }

    fn parse_instruction(&mut self, scope: &mut Scope<'_>) -> ParseResult<()> {
        let span = self.line_span();
        scope.builder.set_span(span);

        let result_name = match (self.peek(), self.peek_at(1)) {
            (Token::Local(name), Token::Equals) => {
                let name = name.clone();
                self.advance();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        let opcode = self.expect_word()?;
        let parsed = match opcode.node.as_str() {
            "alloca" => self.parse_alloca()?,
            "load" => self.parse_load(scope)?,
            "store" => self.parse_store(scope)?,
            "getelementptr" => self.parse_gep(scope)?,
            "fadd" => self.parse_float_binary(scope, Opcode::FAdd)?,
            "fsub" => self.parse_float_binary(scope, Opcode::FSub)?,
            "fmul" => self.parse_float_binary(scope, Opcode::FMul)?,
            "fdiv" => self.parse_float_binary(scope, Opcode::FDiv)?,
            "fneg" => self.parse_fneg(scope)?,
            "fcmp" => self.parse_fcmp(scope)?,
            "icmp" => self.parse_icmp(scope)?,
            "zext" => self.parse_zext(scope)?,
            "or" => self.parse_or(scope)?,
            "select" => self.parse_select(scope)?,
            "call" => self.parse_call(scope)?,
            "tail" | "musttail" | "notail" => {
                self.expect_keyword("call")?;
                self.parse_call(scope)?
            }
            "br" => self.parse_br(scope)?,
            "ret" => self.parse_ret(scope)?,
            other => self.parse_other(scope, other, result_name.is_some()),
        };

        let result = scope.builder.push(
            parsed.opcode,
            parsed.operands,
            parsed.ty,
            parsed.predicate,
            result_name.as_deref(),
        );
        if let Some(name) = result_name {
            match result {
                Some(v) => {
                    scope.locals.insert(name, v);
                }
                None => {
                    return Err(Diagnostic::error(
                        format!("'{}' does not produce a value", opcode.node),
                        opcode.span,
                    ));
                }
            }
        }
        Ok(())
    }

    // --- Instructions ---

    fn parse_alloca(&mut self) -> ParseResult<Parsed> {
        self.eat_keyword("inalloca");
        self.parse_type()?;
        Ok(Parsed::new(Opcode::Alloca, vec![], Type::Ptr))
    }

    fn parse_load(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.eat_keyword("atomic");
        self.eat_keyword("volatile");
        let ty = self.parse_type()?;
        self.expect(&Token::Comma)?;
        let ptr = self.parse_typed_value(scope)?.0;
        Ok(Parsed::new(Opcode::Load, vec![ptr], ty))
    }

    fn parse_store(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.eat_keyword("atomic");
        self.eat_keyword("volatile");
        let value = self.parse_typed_value(scope)?.0;
        self.expect(&Token::Comma)?;
        let ptr = self.parse_typed_value(scope)?.0;
        Ok(Parsed::effect(Opcode::Store, vec![value, ptr]))
    }

    fn parse_gep(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        while self.eat_keyword("inbounds") || self.eat_keyword("nuw") || self.eat_keyword("nusw")
        {}
        self.parse_type()?;
        let mut operands = Vec::new();
        while self.at(&Token::Comma) && !matches!(self.peek_at(1), Token::Meta(_)) {
            self.advance();
            operands.push(self.parse_typed_value(scope)?.0);
        }
        if operands.is_empty() {
            return Err(self.error_here("expected a base pointer"));
        }
        Ok(Parsed::new(Opcode::GetElementPtr, operands, Type::Ptr))
    }

    fn parse_float_binary(&mut self, scope: &mut Scope<'_>, opcode: Opcode) -> ParseResult<Parsed> {
        self.skip_fast_math_flags();
        let ty = self.parse_type()?;
        let lhs = self.parse_value(scope, &ty)?;
        self.expect(&Token::Comma)?;
        let rhs = self.parse_value(scope, &ty)?;
        Ok(Parsed::new(opcode, vec![lhs, rhs], ty))
    }

    fn parse_fneg(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.skip_fast_math_flags();
        let ty = self.parse_type()?;
        let operand = self.parse_value(scope, &ty)?;
        Ok(Parsed::new(Opcode::FNeg, vec![operand], ty))
    }

    fn parse_fcmp(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.skip_fast_math_flags();
        let pred = self.expect_word()?;
        let pred = FloatPredicate::from_name(&pred.node).ok_or_else(|| {
            Diagnostic::error(format!("unknown fcmp predicate '{}'", pred.node), pred.span)
        })?;
        let (lhs, rhs, _) = self.parse_operand_pair(scope)?;
        Ok(Parsed {
            predicate: Some(Predicate::Float(pred)),
            ..Parsed::new(Opcode::FCmp, vec![lhs, rhs], Type::Int(1))
        })
    }

    fn parse_icmp(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.eat_keyword("samesign");
        let pred = self.expect_word()?;
        let pred = IntPredicate::from_name(&pred.node).ok_or_else(|| {
            Diagnostic::error(format!("unknown icmp predicate '{}'", pred.node), pred.span)
        })?;
        let (lhs, rhs, _) = self.parse_operand_pair(scope)?;
        Ok(Parsed {
            predicate: Some(Predicate::Int(pred)),
            ..Parsed::new(Opcode::ICmp, vec![lhs, rhs], Type::Int(1))
        })
    }

    fn parse_zext(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.eat_keyword("nneg");
        let value = self.parse_typed_value(scope)?.0;
        self.expect_keyword("to")?;
        let ty = self.parse_type()?;
        Ok(Parsed::new(Opcode::ZExt, vec![value], ty))
    }

    fn parse_or(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.eat_keyword("disjoint");
        let (lhs, rhs, ty) = self.parse_operand_pair(scope)?;
        Ok(Parsed::new(Opcode::Or, vec![lhs, rhs], ty))
    }

    fn parse_select(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        self.skip_fast_math_flags();
        let cond = self.parse_typed_value(scope)?.0;
        self.expect(&Token::Comma)?;
        let (if_true, ty) = self.parse_typed_value(scope)?;
        self.expect(&Token::Comma)?;
        let if_false = self.parse_typed_value(scope)?.0;
        Ok(Parsed::new(Opcode::Select, vec![cond, if_true, if_false], ty))
    }

    fn parse_call(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        // Fast-math flags, calling convention and return attributes
        while let Token::Word(w) = self.peek() {
            if type_word(w).is_some() {
                break;
            }
            self.advance();
        }
        let ret = self.parse_type()?;
        if self.at(&Token::LParen) {
            // Explicit function type of a variadic callee
            self.skip_group(&Token::LParen, &Token::RParen);
        }
        let callee = match self.peek().clone() {
            Token::Global(name) => {
                self.advance();
                scope.builder.symbol(&name)
            }
            _ => return Err(self.error_here("expected a direct callee '@name'")),
        };

        self.expect(&Token::LParen)?;
        let mut operands = Vec::new();
        while !self.at(&Token::RParen) {
            let ty = self.parse_type()?;
            self.skip_param_attributes();
            operands.push(self.parse_value(scope, &ty)?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        operands.push(callee);
        Ok(Parsed::new(Opcode::Call, operands, ret))
    }

    fn parse_br(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        if self.eat_keyword("label") {
            let target = self.parse_value(scope, &Type::Label)?;
            return Ok(Parsed::effect(Opcode::Br, vec![target]));
        }
        let cond = self.parse_typed_value(scope)?.0;
        self.expect(&Token::Comma)?;
        let then_block = self.parse_typed_value(scope)?.0;
        self.expect(&Token::Comma)?;
        let else_block = self.parse_typed_value(scope)?.0;
        Ok(Parsed::effect(Opcode::Br, vec![cond, then_block, else_block]))
    }

    fn parse_ret(&mut self, scope: &mut Scope<'_>) -> ParseResult<Parsed> {
        if self.eat_keyword("void") {
            return Ok(Parsed::effect(Opcode::Ret, vec![]));
        }
        let value = self.parse_typed_value(scope)?.0;
        Ok(Parsed::effect(Opcode::Ret, vec![value]))
    }

    /// Best-effort reading of an unsupported instruction: known `%values`
    /// become operands, and the result type is the `to` type of a cast or
    /// else the first type on the line.
    fn parse_other(&mut self, scope: &mut Scope<'_>, opcode: &str, has_result: bool) -> Parsed {
        let mut operands = Vec::new();
        let mut first_ty = None;
        let mut cast_ty = None;
        while !matches!(self.peek(), Token::Newline | Token::Eof) {
            match self.peek().clone() {
                Token::Local(name) => {
                    if let Some(&v) = scope.locals.get(&name) {
                        operands.push(v);
                    }
                    self.advance();
                }
                Token::Word(w) if w == "to" => {
                    self.advance();
                    if let Ok(ty) = self.parse_type() {
                        cast_ty = Some(ty);
                    }
                }
                Token::Word(_) | Token::LBracket if first_ty.is_none() => {
                    let save = self.pos;
                    match self.parse_type() {
                        Ok(ty) => first_ty = Some(ty),
                        Err(_) => {
                            self.pos = save;
                            if self.at(&Token::LBracket) {
                                // e.g. the case list of a `switch`
                                self.skip_group(&Token::LBracket, &Token::RBracket);
                            } else {
                                self.advance();
                            }
                        }
                    }
                }
                Token::LBracket => self.skip_group(&Token::LBracket, &Token::RBracket),
                _ => {
                    self.advance();
                }
            }
        }
        let ty = if has_result {
            cast_ty.or(first_ty).unwrap_or(Type::Double)
        } else {
            Type::Void
        };
        Parsed::new(Opcode::Other(opcode.to_string()), operands, ty)
    }

    // --- Types and values ---

    fn parse_type(&mut self) -> ParseResult<Type> {
        let mut ty = match self.peek().clone() {
            Token::Word(w) => match type_word(&w) {
                Some(ty) => {
                    self.advance();
                    ty
                }
                None => return Err(self.error_here(&format!("expected a type, found '{}'", w))),
            },
            Token::LBracket => {
                self.advance();
                let len = self.expect_int()?;
                self.expect_keyword("x")?;
                let elem = self.parse_type()?;
                self.expect(&Token::RBracket)?;
                Type::Array(len, Box::new(elem))
            }
            other => {
                return Err(
                    self.error_here(&format!("expected a type, found {}", other.description()))
                );
            }
        };
        // Typed pointers: `double*`
        while self.eat(&Token::Star) {
            ty = Type::Ptr;
        }
        Ok(ty)
    }

    fn parse_typed_value(&mut self, scope: &mut Scope<'_>) -> ParseResult<(ValueRef, Type)> {
        let ty = self.parse_type()?;
        let value = self.parse_value(scope, &ty)?;
        Ok((value, ty))
    }

    /// `<ty> <a>, <b>` as used by binary instructions.
    fn parse_operand_pair(
        &mut self,
        scope: &mut Scope<'_>,
    ) -> ParseResult<(ValueRef, ValueRef, Type)> {
        let ty = self.parse_type()?;
        let lhs = self.parse_value(scope, &ty)?;
        self.expect(&Token::Comma)?;
        let rhs = self.parse_value(scope, &ty)?;
        Ok((lhs, rhs, ty))
    }

    fn parse_value(&mut self, scope: &mut Scope<'_>, ty: &Type) -> ParseResult<ValueRef> {
        let tok = self.tokens[self.pos].clone();
        let is_float = matches!(ty, Type::Double | Type::Float);
        let value = match tok.node {
            Token::Local(name) if ty.is_label() => scope.builder.label(&name),
            Token::Local(name) => match scope.locals.get(&name) {
                Some(&v) => v,
                None => {
                    return Err(Diagnostic::error(
                        format!("use of undefined value '%{}'", name),
                        tok.span,
                    ));
                }
            },
            Token::Global(name) => scope.builder.symbol(&name),
            Token::Float(x) if is_float => scope.builder.fconst(x),
            Token::Int(n) if is_float => scope.builder.fconst(n as i64 as f64),
            Token::Int(n) => match ty {
                Type::Int(bits) => scope.builder.iconst(*bits, n),
                _ => {
                    return Err(Diagnostic::error(
                        format!("integer literal used as a '{}' value", ty),
                        tok.span,
                    ));
                }
            },
            Token::Word(w) if (w == "true" || w == "false") && ty.is_int() => {
                scope.builder.iconst(1, u64::from(w == "true"))
            }
            Token::Word(w) if is_value_word(&w) => {
                return Err(Diagnostic::error(
                    format!("constant '{}' is not supported", w),
                    tok.span,
                ));
            }
            other => {
                return Err(Diagnostic::error(
                    format!("expected a value, found {}", other.description()),
                    tok.span,
                ));
            }
        };
        self.advance();
        Ok(value)
    }

    // --- Skipping ---

    fn skip_fast_math_flags(&mut self) {
        while let Token::Word(w) = self.peek() {
            if !FAST_MATH_FLAGS.contains(&w.as_str()) {
                break;
            }
            self.advance();
        }
    }

    /// Parameter attributes between a call argument's type and its value:
    /// `noundef`, `nonnull`, `align 8`, `dereferenceable(16)`, ...
    fn skip_param_attributes(&mut self) {
        while let Token::Word(w) = self.peek().clone() {
            if is_value_word(&w) {
                break;
            }
            self.advance();
            if self.at(&Token::LParen) {
                self.skip_group(&Token::LParen, &Token::RParen);
            } else if w == "align" && matches!(self.peek(), Token::Int(_)) {
                self.advance();
            }
        }
    }

    /// Skip a balanced `open ... close` group, newlines included.
    fn skip_group(&mut self, open: &Token, close: &Token) {
        let mut depth = 0usize;
        loop {
            if self.at(&Token::Eof) {
                return;
            }
            if self.at(open) {
                depth += 1;
            } else if self.at(close) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.advance();
                    return;
                }
            }
            self.advance();
        }
    }

    /// Skip to the end of the current line, leaving the newline.
    fn skip_line(&mut self) {
        while !matches!(self.peek(), Token::Newline | Token::Eof) {
            self.advance();
        }
    }

    /// Skip past the `}` that closes a function body after a header error.
    fn skip_past_body(&mut self) {
        loop {
            match self.peek() {
                Token::Eof => return,
                Token::RBrace if matches!(self.peek_at(1), Token::Newline | Token::Eof) => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // --- Utility methods ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].node
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].node
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Span from the current token to the last token on the line.
    fn line_span(&self) -> Span {
        let start = self.current_span();
        let mut end = start;
        for tok in &self.tokens[self.pos..] {
            if matches!(tok.node, Token::Newline | Token::Eof) {
                break;
            }
            end = tok.span;
        }
        start.merge(end)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn at(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Token::Word(w) if w == keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> ParseResult<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error_here(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            )))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error_here(&format!(
                "expected '{}', found {}",
                keyword,
                self.peek().description()
            )))
        }
    }

    fn expect_word(&mut self) -> ParseResult<Spanned<String>> {
        if let Token::Word(w) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Ok(Spanned::new(w, span))
        } else {
            Err(self.error_here(&format!(
                "expected an opcode or keyword, found {}",
                self.peek().description()
            )))
        }
    }

    fn expect_int(&mut self) -> ParseResult<u64> {
        if let Token::Int(n) = self.peek() {
            let n = *n;
            self.advance();
            Ok(n)
        } else {
            Err(self.error_here(&format!(
                "expected an integer, found {}",
                self.peek().description()
            )))
        }
    }

    fn error_here(&self, msg: &str) -> Diagnostic {
        Diagnostic::error(msg.to_string(), self.current_span())
    }
}
