//! Compile-time assembly proc-macros for [`stm8-codec`](https://crates.io/crates/stm8-codec).
//!
//! Provides the [`stm8_bytes!`] macro that assembles STM8 source text at
//! compile time, producing a `&'static [u8]` constant with zero runtime
//! overhead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stm8_codec_macros::stm8_bytes;
//!
//! // Reset stub assembled at compile time
//! const RESET: &[u8] = stm8_bytes!(0x8000, "ldw X,#0x03FF\nldw SP,X\njpf 0x008080");
//!
//! // Peripheral addresses and bit numbers supplied as externals
//! const LED_ON: &[u8] = stm8_bytes!("bres PD_ODR,#LED", PD_ODR = 0x500F, LED = 0);
//! ```

use proc_macro::TokenStream;

/// Assemble STM8 source text at compile time, producing a `&'static [u8]`
/// byte slice.
///
/// # Syntax
///
/// ```rust,ignore
/// stm8_bytes!([BASE,] "assembly source" [, NAME = VALUE]*)
/// ```
///
/// `BASE` is the address of the first byte (default 0). Each `NAME = VALUE`
/// pair defines an external symbol.
///
/// # Examples
///
/// ```rust,ignore
/// use stm8_codec_macros::stm8_bytes;
///
/// // Single instruction
/// const NOP: &[u8] = stm8_bytes!("nop");
/// assert_eq!(NOP, &[0x9D]);
///
/// // Multi-instruction with labels
/// const SPIN: &[u8] = stm8_bytes!(0x8000, "
///     spin:
///         wfi
///         jra spin
/// ");
/// ```
///
/// # Compile-time errors
///
/// If the assembly source contains errors, or leaves a symbol undefined, the
/// macro emits a compile-time error with the full `AsmError` diagnostic
/// message.
#[proc_macro]
pub fn stm8_bytes(input: TokenStream) -> TokenStream {
    match stm8_bytes_impl(input) {
        Ok(ts) => ts,
        Err(err) => err.into_compile_error(),
    }
}

/// Assemble STM8 source text at compile time, producing a fixed-size array
/// `[u8; N]`.
///
/// Unlike [`stm8_bytes!`] which returns `&'static [u8]`, this macro returns
/// a `[u8; N]` value that can be used where a fixed-size array is needed.
///
/// # Examples
///
/// ```rust,ignore
/// use stm8_codec_macros::stm8_array;
///
/// const HALT: [u8; 1] = stm8_array!("halt");
/// ```
#[proc_macro]
pub fn stm8_array(input: TokenStream) -> TokenStream {
    match stm8_array_impl(input) {
        Ok(ts) => ts,
        Err(err) => err.into_compile_error(),
    }
}

// ─── Input parsing ──────────────────────────────────────────────────────────

struct MacroInput {
    base_addr: u32,
    source: String,
    externals: Vec<(String, u32)>,
    /// Where assembly errors are reported.
    source_span: proc_macro::Span,
}

type Tokens = std::iter::Peekable<proc_macro::token_stream::IntoIter>;

impl MacroInput {
    /// `[BASE,] "source" [, NAME = VALUE]* [,]`
    fn parse(input: TokenStream) -> Result<Self, MacroError> {
        let mut tokens = input.into_iter().peekable();

        let base_addr = match tokens.peek() {
            None => return Err(MacroError::new("expected assembly source string")),
            Some(proc_macro::TokenTree::Literal(lit))
                if lit.to_string().starts_with(|c: char| c.is_ascii_digit()) =>
            {
                let base = parse_u32(&mut tokens)?;
                punct(&mut tokens, ',')?;
                base
            }
            Some(_) => 0,
        };

        let (source, source_span) = parse_string_literal(&mut tokens)?;

        let mut externals = Vec::new();
        while tokens.peek().is_some() {
            punct(&mut tokens, ',')?;
            if tokens.peek().is_none() {
                break;
            }
            let name = ident(&mut tokens)?;
            punct(&mut tokens, '=')?;
            externals.push((name, parse_u32(&mut tokens)?));
        }

        Ok(Self {
            base_addr,
            source,
            externals,
            source_span,
        })
    }

    fn assemble(&self) -> Result<Vec<u8>, MacroError> {
        let externals: Vec<(&str, u32)> = self
            .externals
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        stm8_codec::assemble_with(&self.source, self.base_addr, &externals)
            .map_err(|err| MacroError::at(self.source_span, &format!("assembly error: {err}")))
    }
}

fn stm8_bytes_impl(input: TokenStream) -> Result<TokenStream, MacroError> {
    let bytes = MacroInput::parse(input)?.assemble()?;
    Ok(const_expr("&[u8]", "&", &bytes))
}

fn stm8_array_impl(input: TokenStream) -> Result<TokenStream, MacroError> {
    let bytes = MacroInput::parse(input)?.assemble()?;
    Ok(const_expr(&format!("[u8; {}]", bytes.len()), "", &bytes))
}

fn ident(tokens: &mut Tokens) -> Result<String, MacroError> {
    match tokens.next() {
        Some(proc_macro::TokenTree::Ident(id)) => Ok(id.to_string()),
        Some(other) => Err(MacroError::at(other.span(), "expected symbol name")),
        None => Err(MacroError::new("expected symbol name")),
    }
}

fn punct(tokens: &mut Tokens, want: char) -> Result<(), MacroError> {
    match tokens.next() {
        Some(proc_macro::TokenTree::Punct(p)) if p.as_char() == want => Ok(()),
        Some(other) => Err(MacroError::at(other.span(), &format!("expected `{want}`"))),
        None => Err(MacroError::new(&format!("expected `{want}`"))),
    }
}

/// Integer literal in any Rust radix, optionally `_`-separated or
/// `u32`-suffixed.
fn parse_u32(tokens: &mut Tokens) -> Result<u32, MacroError> {
    let tt = tokens
        .next()
        .ok_or_else(|| MacroError::new("expected integer literal"))?;
    let span = tt.span();
    let proc_macro::TokenTree::Literal(lit) = tt else {
        return Err(MacroError::at(span, "expected integer literal"));
    };
    let digits = lit.to_string().replace('_', "");
    let digits = digits.strip_suffix("u32").unwrap_or(digits.as_str());
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        _ => (10, digits),
    };
    u32::from_str_radix(body, radix).map_err(|_| MacroError::at(span, "invalid integer literal"))
}

fn parse_string_literal(
    tokens: &mut Tokens,
) -> Result<(String, proc_macro::Span), MacroError> {
    let tt = tokens
        .next()
        .ok_or_else(|| MacroError::new("expected assembly source string"))?;
    let span = tt.span();
    let proc_macro::TokenTree::Literal(lit) = tt else {
        return Err(MacroError::at(span, "expected assembly source string"));
    };
    let text = lit.to_string();
    if let Some(raw) = text.strip_prefix('r') {
        // r"..", r#".."#, r##".."## and so on
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = raw[hashes..]
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix(&raw[..hashes]))
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| MacroError::at(span, "malformed raw string"))?;
        return Ok((body.to_string(), span));
    }
    match text.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(body) => Ok((unescape(body), span)),
        None => Err(MacroError::at(span, "expected assembly source string")),
    }
}

/// Resolves the escapes a cooked string literal may carry.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            out.push('\\');
            break;
        };
        let resolved = match esc {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' | '"' | '\'' => esc,
            '\n' => {
                // `\` line continuation swallows the break and the indent
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                continue;
            }
            other => {
                out.push('\\');
                other
            }
        };
        out.push(resolved);
    }
    out
}

/// `{ const BYTES: <ty> = <amp>[..]; BYTES }`
fn const_expr(ty: &str, amp: &str, bytes: &[u8]) -> TokenStream {
    let list: Vec<String> = bytes.iter().map(|b| format!("0x{b:02X}u8")).collect();
    format!("{{ const BYTES: {ty} = {amp}[{}]; BYTES }}", list.join(", "))
        .parse()
        .expect("byte list is valid Rust")
}

// ─── Diagnostics ────────────────────────────────────────────────────────────
// The input grammar is small enough to walk `proc_macro` tokens directly,
// so errors are rendered as a spanned `compile_error!` by hand.

struct MacroError {
    message: String,
    span: Option<proc_macro::Span>,
}

impl MacroError {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            span: None,
        }
    }

    fn at(span: proc_macro::Span, message: &str) -> Self {
        Self {
            message: message.to_string(),
            span: Some(span),
        }
    }

    fn into_compile_error(self) -> TokenStream {
        let escaped = self.message.escape_default().to_string();
        let tokens: TokenStream = format!("compile_error!(\"{escaped}\")")
            .parse()
            .expect("compile_error! invocation is valid Rust");
        let Some(span) = self.span else {
            return tokens;
        };
        tokens
            .into_iter()
            .map(|mut tt| {
                tt.set_span(span);
                tt
            })
            .collect()
    }
}
