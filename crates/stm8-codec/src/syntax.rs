//! Operand and statement syntax.
//!
//! Classifies STM8 operand text into [`Operand`] descriptors and splits a
//! source line into label, mnemonic and operands. Values are numbers or a
//! symbol with a constant addend; full expression evaluation is left to
//! callers that need it.
//!
//! | Text              | Category              |
//! |-------------------|-----------------------|
//! | `#v`              | immediate             |
//! | `v`               | direct memory         |
//! | `v.s`, `v.short`  | short direct memory   |
//! | `(X)`, `(Y)`      | indexed               |
//! | `(v,X)`, `(v,Y)`, `(v,SP)` | offset       |
//! | `[v]`, `[v.w]`    | near pointer          |
//! | `[v.e]`           | far pointer           |
//! | `([v],X)`, `([v.e],Y)`, ... | indexed pointer |

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{AsmError, Span};
use crate::ir::{Operand, OperandKind, Register, SymbolRef, Value};

/// Maximum number of operands of any STM8 instruction.
pub const MAX_OPERANDS: usize = 3;

// ─── Values ─────────────────────────────────────────────────────────────────

/// Parse a numeric literal: `0x1F`, `$1F`, `0b101`, `%101` or decimal.
pub fn parse_number(text: &str) -> Option<i64> {
    let t = text.trim();
    let (neg, t) = match t.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, t),
    };
    let (digits, radix) = if let Some(h) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        (h, 16)
    } else if let Some(h) = t.strip_prefix('$') {
        (h, 16)
    } else if let Some(b) = t.strip_prefix("0b").or_else(|| t.strip_prefix("0B")) {
        (b, 2)
    } else if let Some(b) = t.strip_prefix('%') {
        (b, 2)
    } else {
        (t, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix) || c == '_') {
        return None;
    }
    let v = i64::from_str_radix(&digits.replace('_', ""), radix).ok()?;
    Some(if neg { -v } else { v })
}

fn is_symbol(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '.' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
}

/// Case-insensitive `strip_suffix` for an ASCII suffix; `None` if nothing
/// would remain.
fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = text.len().checked_sub(suffix.len()).filter(|&cut| cut > 0)?;
    let tail = text.get(cut..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..cut])
}

/// Strip a `.s`/`.short` suffix, reporting whether one was present.
fn split_short(text: &str) -> (&str, bool) {
    let t = text.trim_end();
    [".short", ".s"]
        .iter()
        .find_map(|suffix| strip_suffix_ignore_case(t, suffix))
        .map_or((t, false), |head| (head.trim_end(), true))
}

/// Parse a value: a number, or a symbol followed by `+N`/`-N` terms.
///
/// A leading `-` applies to numbers only; `sym1+sym2` is rejected.
pub fn parse_value(text: &str) -> Option<Value> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    if let Some(v) = parse_number(t) {
        return Some(Value::Const(v));
    }

    // Split into signed terms at top-level +/-; a leading '-' belongs to the first term.
    let mut terms: Vec<(bool, &str)> = Vec::new();
    let mut start = 0;
    let mut neg = false;
    for (i, c) in t.char_indices() {
        if (c == '+' || c == '-') && i > 0 {
            terms.push((neg, &t[start..i]));
            neg = c == '-';
            start = i + 1;
        }
    }
    terms.push((neg, &t[start..]));

    let mut symbol: Option<&str> = None;
    let mut addend: i64 = 0;
    for (neg, term) in terms {
        let term = term.trim();
        if let Some(n) = parse_number(term) {
            addend = if neg {
                addend.checked_sub(n)?
            } else {
                addend.checked_add(n)?
            };
        } else if is_symbol(term) && !neg && symbol.is_none() {
            symbol = Some(term);
        } else {
            return None;
        }
    }
    Some(match symbol {
        Some(name) => Value::Symbol(SymbolRef {
            name: Rc::from(name),
            addend,
            short: false,
        }),
        None => Value::Const(addend),
    })
}

fn value_or_error(text: &str, span: Span) -> Result<Value, AsmError> {
    parse_value(text).ok_or_else(|| AsmError::Syntax {
        msg: format!("invalid value '{}'", text.trim()),
        span,
    })
}

/// Parse a value that may carry a `.s` suffix marking a page-zero symbol.
fn short_value(text: &str, span: Span) -> Result<Value, AsmError> {
    let (body, short) = split_short(text);
    let mut value = value_or_error(body, span)?;
    if let Value::Symbol(sym) = &mut value {
        sym.short = short;
    }
    Ok(value)
}

// ─── Operands ───────────────────────────────────────────────────────────────

/// Parse the inside of `[...]`: returns the value and whether the pointer is far.
fn pointer(inner: &str, span: Span) -> Result<(Value, bool), AsmError> {
    let t = inner.trim();
    if let Some(head) = strip_suffix_ignore_case(t, ".e") {
        return Ok((value_or_error(head, span)?, true));
    }
    if let Some(head) = strip_suffix_ignore_case(t, ".w") {
        return Ok((value_or_error(head, span)?, false));
    }
    Ok((short_value(t, span)?, false))
}

fn bracketed<'a>(text: &'a str, open: char, close: char) -> Option<&'a str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

/// Classify one operand.
///
/// Well-formed text that names no STM8 addressing form (`(A)`, `(5,A)`,
/// `([p],SP)`) is classified as [`OperandKind::Illegal`] so the resolver
/// reports it as a mismatch.
///
/// # Errors
///
/// Returns [`AsmError::Syntax`] for empty text, unbalanced brackets or an
/// unparsable value.
///
/// # Examples
///
/// ```
/// use stm8_codec::ir::{OperandKind, Value};
/// use stm8_codec::syntax::parse_operand;
/// use stm8_codec::Span;
///
/// let op = parse_operand("(0x10,Y)", Span::dummy())?;
/// assert_eq!(op.kind, OperandKind::OffsetY);
/// assert_eq!(op.value, Some(Value::Const(0x10)));
/// # Ok::<(), stm8_codec::AsmError>(())
/// ```
pub fn parse_operand(text: &str, span: Span) -> Result<Operand, AsmError> {
    let t = text.trim();
    if t.is_empty() {
        return Err(AsmError::Syntax {
            msg: String::from("missing operand"),
            span,
        });
    }
    let illegal = || Ok(Operand::illegal().with_span(span));

    if let Some(rest) = t.strip_prefix('#') {
        let value = value_or_error(rest, span)?;
        return Ok(Operand::new(OperandKind::Immediate, value).with_span(span));
    }

    if t.starts_with('[') {
        let inner = bracketed(t, '[', ']').ok_or_else(|| unbalanced(t, span))?;
        if Register::from_name(inner.trim()).is_some() {
            return illegal();
        }
        let (value, far) = pointer(inner, span)?;
        let kind = if far {
            OperandKind::PointerFar
        } else {
            OperandKind::PointerNear
        };
        return Ok(Operand::new(kind, value).with_span(span));
    }

    if t.starts_with('(') {
        let inner = bracketed(t, '(', ')').ok_or_else(|| unbalanced(t, span))?;
        let Some((base, index)) = inner.rsplit_once(',') else {
            return match Register::from_name(inner.trim()) {
                Some(reg @ (Register::X | Register::Y)) => {
                    Ok(Operand::indexed(reg).with_span(span))
                }
                Some(_) => illegal(),
                None => Err(AsmError::Syntax {
                    msg: format!("expected index register in '{}'", t),
                    span,
                }),
            };
        };
        let base = base.trim();
        let Some(index) = Register::from_name(index.trim()) else {
            return illegal();
        };

        if base.starts_with('[') {
            let inner = bracketed(base, '[', ']').ok_or_else(|| unbalanced(base, span))?;
            let (value, far) = pointer(inner, span)?;
            let kind = match (index, far) {
                (Register::X, false) => OperandKind::PointerNearX,
                (Register::Y, false) => OperandKind::PointerNearY,
                (Register::X, true) => OperandKind::PointerFarX,
                (Register::Y, true) => OperandKind::PointerFarY,
                _ => return illegal(),
            };
            return Ok(Operand::new(kind, value).with_span(span));
        }

        let kind = match index {
            Register::X => OperandKind::OffsetX,
            Register::Y => OperandKind::OffsetY,
            Register::Sp => OperandKind::OffsetSp,
            _ => return illegal(),
        };
        return Ok(Operand::new(kind, short_value(base, span)?).with_span(span));
    }

    if let Some(reg) = Register::from_name(t) {
        return Ok(Operand::register(reg).with_span(span));
    }

    let (body, short) = split_short(t);
    let value = value_or_error(body, span)?;
    let kind = if short {
        OperandKind::ShortDirectMemory
    } else {
        OperandKind::DirectMemory
    };
    Ok(Operand::new(kind, value).with_span(span))
}

fn unbalanced(text: &str, span: Span) -> AsmError {
    AsmError::Syntax {
        msg: format!("unbalanced brackets in '{}'", text),
        span,
    }
}

// ─── Lines ──────────────────────────────────────────────────────────────────

/// One source line, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// Labels defined on the line, with their spans.
    pub labels: Vec<(&'a str, Span)>,
    /// Mnemonic or directive, with its span.
    pub mnemonic: Option<(&'a str, Span)>,
    /// Operand text, with spans. Not yet classified, since directives take
    /// plain values.
    pub operands: Vec<(&'a str, Span)>,
}

impl<'a> Line<'a> {
    /// Classify the operands as instruction operands.
    ///
    /// # Errors
    ///
    /// See [`parse_operand`].
    pub fn instruction_operands(&self) -> Result<Vec<Operand>, AsmError> {
        self.operands
            .iter()
            .map(|(text, span)| parse_operand(text, *span))
            .collect()
    }
}

/// Split `line` into labels, mnemonic and operand text.
///
/// `line_no` is 1-based; `line_offset` is the byte offset of the line in
/// the whole source and only feeds the spans. Everything after `;` is a
/// comment. Operands are separated by commas outside `()` and `[]`.
///
/// # Errors
///
/// Returns [`AsmError::Syntax`] for unbalanced brackets, an empty operand
/// or more than [`MAX_OPERANDS`] operands.
pub fn parse_line(line: &str, line_no: u32, line_offset: usize) -> Result<Line<'_>, AsmError> {
    let span_of = |start: usize, len: usize| {
        Span::new(line_no, start as u32 + 1, line_offset + start, len)
    };
    let code = match line.find(';') {
        Some(i) => &line[..i],
        None => line,
    };

    let mut out = Line {
        labels: Vec::new(),
        mnemonic: None,
        operands: Vec::new(),
    };

    let mut pos = 0;
    loop {
        let rest = &code[pos..];
        let lead = rest.len() - rest.trim_start().len();
        let rest = rest.trim_start();
        let word_end = rest
            .find(|c: char| c.is_whitespace() || c == ':')
            .unwrap_or(rest.len());
        if rest[word_end..].starts_with(':') && is_symbol(&rest[..word_end]) {
            out.labels.push((&rest[..word_end], span_of(pos + lead, word_end)));
            pos += lead + word_end + 1;
            continue;
        }
        if rest.is_empty() {
            return Ok(out);
        }
        out.mnemonic = Some((&rest[..word_end], span_of(pos + lead, word_end)));
        pos += lead + word_end;
        break;
    }

    let args = &code[pos..];
    if args.trim().is_empty() {
        return Ok(out);
    }
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut pieces = Vec::new();
    for (i, c) in args.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push((start, i));
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err(AsmError::Syntax {
                msg: String::from("unbalanced brackets"),
                span: span_of(pos + i, 1),
            });
        }
    }
    if depth != 0 {
        return Err(AsmError::Syntax {
            msg: String::from("unbalanced brackets"),
            span: span_of(pos, args.len()),
        });
    }
    pieces.push((start, args.len()));

    for (s, e) in pieces {
        let raw = &args[s..e];
        let text = raw.trim();
        let lead = raw.len() - raw.trim_start().len();
        let span = span_of(pos + s + lead, text.len());
        if text.is_empty() {
            return Err(AsmError::Syntax {
                msg: String::from("empty operand"),
                span,
            });
        }
        out.operands.push((text, span));
    }
    if out.operands.len() > MAX_OPERANDS {
        return Err(AsmError::Syntax {
            msg: format!("too many operands ({})", out.operands.len()),
            span: out.operands[MAX_OPERANDS].1,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> OperandKind {
        parse_operand(text, Span::dummy()).unwrap().kind
    }

    fn value(text: &str) -> Option<Value> {
        parse_operand(text, Span::dummy()).unwrap().value
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("0x1F"), Some(0x1F));
        assert_eq!(parse_number("$1f"), Some(0x1F));
        assert_eq!(parse_number("0b101"), Some(5));
        assert_eq!(parse_number("%11"), Some(3));
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("-0x03"), Some(-3));
        assert_eq!(parse_number("1_000"), Some(1000));
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("12ab"), None);
    }

    #[test]
    fn symbol_values() {
        assert_eq!(parse_value("buf"), Some(Value::symbol("buf")));
        let Some(Value::Symbol(s)) = parse_value("buf + 4 - 1") else {
            panic!("expected symbol")
        };
        assert_eq!((&*s.name, s.addend), ("buf", 3));
        assert_eq!(parse_value("2+3"), Some(Value::Const(5)));
        assert_eq!(parse_value("a+b"), None);
        assert_eq!(parse_value("-sym"), None);
    }

    #[test]
    fn categories() {
        assert_eq!(kind("#0x10"), OperandKind::Immediate);
        assert_eq!(kind("0x5000"), OperandKind::DirectMemory);
        assert_eq!(kind("0x10.s"), OperandKind::ShortDirectMemory);
        assert_eq!(kind("var.short"), OperandKind::ShortDirectMemory);
        assert_eq!(kind("(X)"), OperandKind::IndexedX);
        assert_eq!(kind("( y )"), OperandKind::IndexedY);
        assert_eq!(kind("(0x10,X)"), OperandKind::OffsetX);
        assert_eq!(kind("(0x10, Y)"), OperandKind::OffsetY);
        assert_eq!(kind("(3,SP)"), OperandKind::OffsetSp);
        assert_eq!(kind("[0x10]"), OperandKind::PointerNear);
        assert_eq!(kind("[ptr.w]"), OperandKind::PointerNear);
        assert_eq!(kind("[ptr.e]"), OperandKind::PointerFar);
        assert_eq!(kind("([ptr],X)"), OperandKind::PointerNearX);
        assert_eq!(kind("([ptr.w],Y)"), OperandKind::PointerNearY);
        assert_eq!(kind("([ptr.e],X)"), OperandKind::PointerFarX);
        assert_eq!(kind("([ptr.e],Y)"), OperandKind::PointerFarY);
        assert_eq!(kind("a"), OperandKind::Register(Register::A));
        assert_eq!(kind("SP"), OperandKind::Register(Register::Sp));
    }

    #[test]
    fn meaningless_forms_are_illegal() {
        assert_eq!(kind("(A)"), OperandKind::Illegal);
        assert_eq!(kind("(5,A)"), OperandKind::Illegal);
        assert_eq!(kind("([p],SP)"), OperandKind::Illegal);
        assert_eq!(kind("[X]"), OperandKind::Illegal);
    }

    #[test]
    fn short_suffix_marks_symbols() {
        let Some(Value::Symbol(s)) = value("(tbl.s,X)") else {
            panic!("expected symbol")
        };
        assert!(s.short);
        let Some(Value::Symbol(s)) = value("[ptr]") else {
            panic!("expected symbol")
        };
        assert!(!s.short);
        assert_eq!(value("[0x10.s]"), Some(Value::Const(0x10)));
    }

    #[test]
    fn syntax_errors() {
        assert!(parse_operand("", Span::dummy()).is_err());
        assert!(parse_operand("(0x10,X", Span::dummy()).is_err());
        assert!(parse_operand("#", Span::dummy()).is_err());
        assert!(parse_operand("0x1G", Span::dummy()).is_err());
    }

    #[test]
    fn line_parts() {
        let line = parse_line("loop: ld A,([ptr],X) ; fetch", 7, 100).unwrap();
        assert_eq!(line.labels.len(), 1);
        assert_eq!(line.labels[0].0, "loop");
        assert_eq!(line.labels[0].1, Span::new(7, 1, 100, 4));
        let (mn, span) = line.mnemonic.unwrap();
        assert_eq!(mn, "ld");
        assert_eq!(span.col, 7);
        let texts: Vec<&str> = line.operands.iter().map(|(t, _)| *t).collect();
        assert_eq!(texts, ["A", "([ptr],X)"]);
        assert_eq!(line.operands[1].1.col, 12);
    }

    #[test]
    fn label_only_and_blank_lines() {
        let line = parse_line("  start:", 1, 0).unwrap();
        assert_eq!(line.labels[0].0, "start");
        assert!(line.mnemonic.is_none());
        let line = parse_line("   ; nothing", 1, 0).unwrap();
        assert!(line.labels.is_empty() && line.mnemonic.is_none());
    }

    #[test]
    fn line_errors() {
        assert!(parse_line("ld A,", 1, 0).is_err());
        assert!(parse_line("btjt a,b,c,d", 1, 0).is_err());
        assert!(parse_line("ld A,(0x10,X", 1, 0).is_err());
        assert!(parse_line("ld A,0x10)", 1, 0).is_err());
    }

    #[test]
    fn multibyte_suffixes_are_syntax_errors() {
        for text in ["a€", "€", "[p€]", "([p€],X)", "(0x10€,SP)", "x.é"] {
            assert!(
                matches!(parse_operand(text, Span::dummy()), Err(AsmError::Syntax { .. })),
                "{text}"
            );
        }
        assert_eq!(split_short("é.s"), ("é", true));
    }
}
