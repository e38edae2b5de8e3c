// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parser for CQL type names (`frozen<map<int, list<text>>>`, `ks.address`, ...).
//!
//! Keywords and unquoted identifiers are case-insensitive; double-quoted
//! identifiers keep their case. UDT names resolve through a [`UdtRegistry`].

use super::{CqlType, PrimitiveKind};
use crate::config::MAX_TYPE_NESTING;
use crate::error::{CodecError, Result};
use crate::registry::UdtRegistry;

/// Parse a CQL type name. Unqualified UDT names resolve in `keyspace`.
pub fn parse_type(input: &str, keyspace: &str, registry: &dyn UdtRegistry) -> Result<CqlType> {
    let mut parser = TypeParser {
        input,
        pos: 0,
        depth: 0,
        keyspace,
        registry,
    };
    let ty = parser.parse()?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(ty)
}

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    keyspace: &'a str,
    registry: &'a dyn UdtRegistry,
}

impl<'a> TypeParser<'a> {
    fn error(&self, reason: impl Into<String>) -> CodecError {
        CodecError::Parse {
            input: self.input.to_string(),
            reason: format!("{} at offset {}", reason.into(), self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == want => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", want, c))),
            None => Err(self.error(format!("expected '{}', found end of input", want))),
        }
    }

    /// Identifier, lower-cased unless quoted. Returns (text, was_quoted).
    fn identifier(&mut self) -> Result<(String, bool)> {
        self.skip_ws();
        if self.peek() == Some('"') {
            self.pos += 1;
            let mut out = String::new();
            loop {
                match self.peek() {
                    Some('"') => {
                        self.pos += 1;
                        if self.peek() == Some('"') {
                            out.push('"');
                            self.pos += 1;
                        } else {
                            return Ok((out, true));
                        }
                    }
                    Some(c) => {
                        out.push(c);
                        self.pos += c.len_utf8();
                    }
                    None => return Err(self.error("unterminated quoted identifier")),
                }
            }
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok((self.input[start..self.pos].to_ascii_lowercase(), false))
    }

    fn parse(&mut self) -> Result<CqlType> {
        let (word, quoted) = self.identifier()?;
        if !quoted {
            match word.as_str() {
                "list" => {
                    let args = self.type_args(1)?;
                    return Ok(CqlType::list(first(args)));
                }
                "set" => {
                    let args = self.type_args(1)?;
                    return Ok(CqlType::set(first(args)));
                }
                "map" => {
                    let mut args = self.type_args(2)?.into_iter();
                    return match (args.next(), args.next()) {
                        (Some(k), Some(v)) => Ok(CqlType::map(k, v)),
                        _ => Err(self.error("map takes two type arguments")),
                    };
                }
                "frozen" => {
                    let args = self.type_args(1)?;
                    return Ok(CqlType::frozen(first(args)));
                }
                "tuple" => {
                    let args = self.type_args(0)?;
                    return Ok(CqlType::tuple(args));
                }
                _ => {}
            }
            self.skip_ws();
            if self.peek() != Some('.') {
                if let Some(kind) = PrimitiveKind::from_name(&word)? {
                    return Ok(CqlType::Primitive(kind));
                }
            }
        }
        self.skip_ws();
        let (keyspace, name) = if self.peek() == Some('.') {
            self.pos += 1;
            let (name, _) = self.identifier()?;
            (word, name)
        } else {
            (self.keyspace.to_string(), word)
        };
        let udt = self.registry.lookup(&keyspace, &name)?;
        Ok(CqlType::Udt(udt))
    }

    /// `<t1, t2, ...>`; `arity == 0` accepts any non-empty list.
    fn type_args(&mut self, arity: usize) -> Result<Vec<CqlType>> {
        self.expect('<')?;
        if self.depth >= MAX_TYPE_NESTING {
            return Err(self.error(format!("nesting deeper than {}", MAX_TYPE_NESTING)));
        }
        self.depth += 1;
        let args = self.type_arg_list(arity);
        self.depth -= 1;
        args
    }

    fn type_arg_list(&mut self, arity: usize) -> Result<Vec<CqlType>> {
        let mut args = vec![self.parse()?];
        loop {
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    args.push(self.parse()?);
                }
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("expected ',' or '>'")),
            }
        }
        if arity != 0 && args.len() != arity {
            return Err(self.error(format!(
                "expected {} type argument(s), found {}",
                arity,
                args.len()
            )));
        }
        Ok(args)
    }
}

fn first(args: Vec<CqlType>) -> CqlType {
    // type_args has already checked the arity, so there is exactly one.
    args.into_iter()
        .next()
        .unwrap_or(CqlType::Primitive(PrimitiveKind::Empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;

    fn registry() -> SchemaRegistry {
        let registry = SchemaRegistry::new();
        registry.register_all(
            &CqlType::udt("shop", "address")
                .with_field("street", CqlType::text())
                .build(),
        );
        registry.register_all(
            &CqlType::udt("other", "Point")
                .with_field("x", CqlType::int())
                .build(),
        );
        registry
    }

    #[test]
    fn test_parse_nested() {
        let reg = registry();
        let ty = parse_type("frozen<map<int, list<text>>>", "shop", &reg).expect("parse");
        assert_eq!(
            ty,
            CqlType::frozen(CqlType::map(CqlType::int(), CqlType::list(CqlType::text())))
        );
        assert_eq!(ty.cql_name(), "frozen<map<int, list<text>>>");
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        let reg = registry();
        let ty = parse_type(" SET < VarChar > ", "shop", &reg).expect("parse");
        assert_eq!(ty, CqlType::set(CqlType::text()));
    }

    #[test]
    fn test_parse_udt_names() {
        let reg = registry();
        let local = parse_type("frozen<address>", "shop", &reg).expect("parse");
        assert_eq!(local.as_udt().map(|u| u.name()), Some("address"));

        let qualified = parse_type("other.\"Point\"", "shop", &reg).expect("parse");
        assert_eq!(qualified.as_udt().map(|u| u.keyspace()), Some("other"));

        let tuple = parse_type("tuple<int, frozen<address>, text>", "shop", &reg).expect("parse");
        assert_eq!(tuple.children().len(), 3);
    }

    #[test]
    fn test_parse_errors() {
        let reg = registry();
        assert!(matches!(
            parse_type("missing", "shop", &reg),
            Err(CodecError::TypeNotRegistered { .. })
        ));
        assert!(matches!(
            parse_type("counter", "shop", &reg),
            Err(CodecError::UnsupportedType(_))
        ));
        assert!(matches!(
            parse_type("map<int>", "shop", &reg),
            Err(CodecError::Parse { .. })
        ));
        assert!(matches!(
            parse_type("list<int", "shop", &reg),
            Err(CodecError::Parse { .. })
        ));
        assert!(matches!(
            parse_type("int extra", "shop", &reg),
            Err(CodecError::Parse { .. })
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let reg = registry();
        for name in [
            "list<frozen<set<bigint>>>",
            "tuple<uuid, timeuuid, inet>",
            "map<text, frozen<address>>",
            "frozen<tuple<decimal, varint>>",
        ] {
            let ty = parse_type(name, "shop", &reg).expect("parse");
            assert_eq!(ty.cql_name(), name);
        }
    }

    #[test]
    fn test_nesting_limit() {
        let reg = registry();
        let deep = format!("{}int{}", "list<".repeat(200), ">".repeat(200));
        assert!(matches!(
            parse_type(&deep, "shop", &reg),
            Err(CodecError::Parse { .. })
        ));
        let ok = format!("{}int{}", "list<".repeat(8), ">".repeat(8));
        assert!(parse_type(&ok, "shop", &reg).is_ok());
    }
}
