//! TLatex-style markup to shifted text runs.
//!
//! Handles the subset used by axis titles, legends and annotations:
//! `#name` symbols (Greek letters, arrows, relations), `_{..}` / `^{..}`
//! (single-character forms too), `{..}` grouping, accents (`#bar`, `#tilde`,
//! `#hat`, `#dot`) and font commands whose argument is kept as plain text
//! (`#bf{..}`, `#it{..}`). Nested scripts render at the outer script level.
//! Unknown `#words` without an argument are kept literally.

use std::iter::Peekable;
use std::str::Chars;

/// Vertical placement of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Normal,
    Sub,
    Super,
}

/// A run of text sharing one [`Shift`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub shift: Shift,
}

/// Parse TLatex markup into runs; adjacent runs never share a shift.
pub fn parse(src: &str) -> Vec<Span> {
    let mut out = Vec::new();
    parse_seq(&mut src.chars().peekable(), Shift::Normal, false, &mut out);
    out
}

/// The visible characters of `src`, shifts dropped.
pub fn to_plain(src: &str) -> String {
    parse(src).into_iter().map(|s| s.text).collect()
}

fn parse_seq(it: &mut Peekable<Chars<'_>>, shift: Shift, in_group: bool, out: &mut Vec<Span>) {
    while let Some(c) = it.next() {
        match c {
            '}' if in_group => return,
            '}' => {}
            '{' => parse_seq(it, shift, true, out),
            '_' | '^' => {
                let inner = match (shift, c) {
                    (Shift::Normal, '_') => Shift::Sub,
                    (Shift::Normal, _) => Shift::Super,
                    (s, _) => s,
                };
                match it.next() {
                    Some('{') => parse_seq(it, inner, true, out),
                    Some(n) => push(out, inner, n.encode_utf8(&mut [0; 4])),
                    None => push(out, shift, c.encode_utf8(&mut [0; 4])),
                }
            }
            '#' => command(it, shift, out),
            _ => push(out, shift, c.encode_utf8(&mut [0; 4])),
        }
    }
}

fn command(it: &mut Peekable<Chars<'_>>, shift: Shift, out: &mut Vec<Span>) {
    let mut word = String::new();
    while let Some(&n) = it.peek() {
        if !n.is_ascii_alphabetic() {
            break;
        }
        word.push(n);
        it.next();
    }
    if word.is_empty() {
        push(out, shift, "#");
        return;
    }
    if let Some(sym) = symbol(&word) {
        push(out, shift, sym);
        return;
    }
    if it.peek() != Some(&'{') {
        push(out, shift, "#");
        push(out, shift, &word);
        return;
    }
    it.next();
    match accent(&word) {
        Some(mark) => {
            let mut inner = Vec::new();
            parse_seq(it, shift, true, &mut inner);
            for span in inner {
                let mut marked = String::with_capacity(span.text.len() * 2);
                for ch in span.text.chars() {
                    marked.push(ch);
                    if !ch.is_whitespace() {
                        marked.push(mark);
                    }
                }
                push(out, span.shift, &marked);
            }
        }
        None => parse_seq(it, shift, true, out),
    }
}

fn push(out: &mut Vec<Span>, shift: Shift, text: &str) {
    match out.last_mut() {
        Some(last) if last.shift == shift => last.text.push_str(text),
        _ => out.push(Span { text: text.to_string(), shift }),
    }
}

fn accent(word: &str) -> Option<char> {
    Some(match word {
        "bar" => '\u{0305}',
        "tilde" => '\u{0303}',
        "hat" => '\u{0302}',
        "dot" => '\u{0307}',
        "vec" => '\u{20D7}',
        _ => return None,
    })
}

fn symbol(word: &str) -> Option<&'static str> {
    Some(match word {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" => "φ",
        "varphi" => "ϕ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Upsilon" => "Υ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        "rightarrow" => "→",
        "leftarrow" => "←",
        "leftrightarrow" => "↔",
        "pm" => "±",
        "mp" => "∓",
        "times" => "×",
        "cdot" => "·",
        "infty" => "∞",
        "approx" => "≈",
        "sim" => "∼",
        "leq" => "≤",
        "geq" => "≥",
        "neq" => "≠",
        "ell" => "ℓ",
        "partial" => "∂",
        "circ" => "°",
        "sqrt" => "√",
        _ => return None,
    })
}
