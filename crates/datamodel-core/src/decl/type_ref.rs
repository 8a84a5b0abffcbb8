//! Type references in display-name syntax.
//!
//! ```text
//! type    := primary suffix*
//! suffix  := '?' | '[' ','* ']' | '*' | '&'
//! primary := IDENT ('<' type (',' type)* '>')?
//!          | '(' type (',' type)* ')'
//!          | '{' (IDENT ':' type (';' IDENT ':' type)* ';'?)? '}'
//! ```
//!
//! A parenthesized list of two or more types is a tuple; a single
//! parenthesized type is grouping.

use crate::host::{Field, HostTypeId};
use crate::registry::TypeRegistry;

use super::DeclError;
use super::lexer::{Token, TokenKind, lex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    Generic(String, Vec<TypeRef>),
    Tuple(Vec<TypeRef>),
    Anonymous(Vec<(String, TypeRef)>),
    Nullable(Box<TypeRef>),
    Array(Box<TypeRef>),
    MultiArray(Box<TypeRef>, u8),
    Pointer(Box<TypeRef>),
    ByRef(Box<TypeRef>),
}

impl TypeRef {
    pub fn parse(input: &str) -> Result<TypeRef, DeclError> {
        let tokens = lex(input).map_err(|offset| DeclError::Syntax {
            input: input.to_owned(),
            message: format!("unexpected character at offset {offset}"),
        })?;
        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
        };
        let ty = parser.parse_type()?;
        if let Some(tok) = parser.peek() {
            return Err(parser.error(format!("unexpected `{}` after type", tok.text)));
        }
        Ok(ty)
    }

    /// Resolve against a registry, interning any composite shapes.
    pub fn resolve(&self, registry: &mut TypeRegistry) -> Result<HostTypeId, DeclError> {
        Ok(match self {
            TypeRef::Named(name) => registry
                .lookup(name)
                .ok_or_else(|| DeclError::UnknownType(name.clone()))?,
            TypeRef::Generic(head, args) => resolve_generic(registry, head, args)?,
            TypeRef::Tuple(items) => {
                let ids = resolve_all(registry, items)?;
                registry.tuple(ids)
            }
            TypeRef::Anonymous(fields) => {
                let mut resolved = Vec::with_capacity(fields.len());
                for (name, ty) in fields {
                    resolved.push(Field::new(name.clone(), ty.resolve(registry)?));
                }
                registry.anonymous(resolved)
            }
            TypeRef::Nullable(inner) => {
                let inner = inner.resolve(registry)?;
                registry.nullable(inner)
            }
            TypeRef::Array(inner) => {
                let inner = inner.resolve(registry)?;
                registry.array(inner)
            }
            TypeRef::MultiArray(inner, rank) => {
                let inner = inner.resolve(registry)?;
                registry.multi_array(inner, *rank)
            }
            TypeRef::Pointer(inner) => {
                let inner = inner.resolve(registry)?;
                registry.pointer(inner)
            }
            TypeRef::ByRef(inner) => {
                let inner = inner.resolve(registry)?;
                registry.by_ref(inner)
            }
        })
    }
}

fn resolve_all(
    registry: &mut TypeRegistry,
    refs: &[TypeRef],
) -> Result<Vec<HostTypeId>, DeclError> {
    refs.iter().map(|r| r.resolve(registry)).collect()
}

fn resolve_generic(
    registry: &mut TypeRegistry,
    head: &str,
    args: &[TypeRef],
) -> Result<HostTypeId, DeclError> {
    let single = |expected: &'static str| {
        if args.len() == 1 {
            Ok(())
        } else {
            Err(DeclError::Arity {
                name: head.to_owned(),
                expected,
                found: args.len(),
            })
        }
    };
    match head {
        "List" => {
            single("1")?;
            let element = args[0].resolve(registry)?;
            Ok(registry.list(element))
        }
        "IEnumerable" => {
            single("1")?;
            let element = args[0].resolve(registry)?;
            Ok(registry.sequence(element))
        }
        "Nullable" => {
            single("1")?;
            let inner = args[0].resolve(registry)?;
            Ok(registry.nullable(inner))
        }
        "Expression" => {
            single("1")?;
            let inner = args[0].resolve(registry)?;
            Ok(registry.quoted(inner))
        }
        "Func" => {
            let mut ids = resolve_all(registry, args)?;
            let Some(result) = ids.pop() else {
                return Err(DeclError::Arity {
                    name: head.to_owned(),
                    expected: "at least 1",
                    found: 0,
                });
            };
            Ok(registry.function(ids, result))
        }
        "Tuple" => {
            let ids = resolve_all(registry, args)?;
            Ok(registry.tuple(ids))
        }
        _ => Err(DeclError::UnknownGeneric(head.to_owned())),
    }
}

struct Parser<'s> {
    input: &'s str,
    tokens: Vec<Token<'s>>,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos).copied()
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'s>, DeclError> {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                self.pos += 1;
                Ok(tok)
            }
            Some(tok) => Err(self.error(format!("expected {what}, found `{}`", tok.text))),
            None => Err(self.error(format!("expected {what}, found end of input"))),
        }
    }

    fn error(&self, message: String) -> DeclError {
        DeclError::Syntax {
            input: self.input.to_owned(),
            message,
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, DeclError> {
        let mut ty = self.parse_primary()?;
        loop {
            if self.eat(TokenKind::Question) {
                ty = TypeRef::Nullable(Box::new(ty));
            } else if self.eat(TokenKind::Star) {
                ty = TypeRef::Pointer(Box::new(ty));
            } else if self.eat(TokenKind::Amp) {
                ty = TypeRef::ByRef(Box::new(ty));
            } else if self.eat(TokenKind::BracketOpen) {
                let mut rank: u8 = 1;
                while self.eat(TokenKind::Comma) {
                    rank = rank.saturating_add(1);
                }
                self.expect(TokenKind::BracketClose, "`]`")?;
                ty = if rank == 1 {
                    TypeRef::Array(Box::new(ty))
                } else {
                    TypeRef::MultiArray(Box::new(ty), rank)
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<TypeRef, DeclError> {
        let Some(tok) = self.peek() else {
            return Err(self.error("expected a type, found end of input".into()));
        };
        match tok.kind {
            TokenKind::Ident => {
                self.pos += 1;
                if !self.eat(TokenKind::AngleOpen) {
                    return Ok(TypeRef::Named(tok.text.to_owned()));
                }
                let args = self.parse_list(TokenKind::AngleClose, "`>`")?;
                Ok(TypeRef::Generic(tok.text.to_owned(), args))
            }
            TokenKind::ParenOpen => {
                self.pos += 1;
                let mut items = self.parse_list(TokenKind::ParenClose, "`)`")?;
                if items.len() == 1 {
                    return Ok(items.remove(0));
                }
                Ok(TypeRef::Tuple(items))
            }
            TokenKind::BraceOpen => {
                self.pos += 1;
                let mut fields = Vec::new();
                while !self.eat(TokenKind::BraceClose) {
                    let name = self.expect(TokenKind::Ident, "a field name")?;
                    self.expect(TokenKind::Colon, "`:`")?;
                    let ty = self.parse_type()?;
                    fields.push((name.text.to_owned(), ty));
                    if !self.eat(TokenKind::Semicolon) {
                        self.expect(TokenKind::BraceClose, "`;` or `}`")?;
                        break;
                    }
                }
                Ok(TypeRef::Anonymous(fields))
            }
            _ => Err(self.error(format!("expected a type, found `{}`", tok.text))),
        }
    }

    /// Comma-separated types up to `close`. At least one is required.
    fn parse_list(&mut self, close: TokenKind, what: &str) -> Result<Vec<TypeRef>, DeclError> {
        let mut items = vec![self.parse_type()?];
        while self.eat(TokenKind::Comma) {
            items.push(self.parse_type()?);
        }
        self.expect(close, what)?;
        Ok(items)
    }
}
