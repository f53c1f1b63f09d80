use std::collections::HashMap;
use std::io::{self, BufReader, Read};

use tracing::trace;

use crate::error::{CompileError, Result};
use crate::intern::Interner;
use crate::token::{Token, TokenKind};
use crate::types::Type;

/// Turns a byte stream into tokens on demand.
///
/// Reserved words are entered into the word table up front; an identifier is
/// interned the first time it is seen and every later occurrence yields the
/// same `Symbol`.
pub struct Lexer<R: Read> {
    bytes: io::Bytes<BufReader<R>>,
    peeked: Option<u8>,
    at_end: bool,
    line: usize,
    words: HashMap<String, TokenKind>,
    interner: Interner,
}

impl<'a> Lexer<&'a [u8]> {
    pub fn from_source(source: &'a str) -> Self { Lexer::new(source.as_bytes()) }
}

impl<R: Read> Lexer<R> {
    pub fn new(reader: R) -> Self {
        let mut lexer = Self {
            bytes: BufReader::new(reader).bytes(),
            peeked: None,
            at_end: false,
            line: 1,
            words: HashMap::new(),
            interner: Interner::new(),
        };
        lexer.reserve("if", TokenKind::If);
        lexer.reserve("else", TokenKind::Else);
        lexer.reserve("while", TokenKind::While);
        lexer.reserve("do", TokenKind::Do);
        lexer.reserve("break", TokenKind::Break);
        lexer.reserve("true", TokenKind::True);
        lexer.reserve("false", TokenKind::False);
        for ty in [Type::Int, Type::Char, Type::Bool, Type::Float] {
            lexer.reserve(&ty.to_string(), TokenKind::Basic(ty));
        }
        lexer
    }

    fn reserve(&mut self, word: &str, kind: TokenKind) { self.words.insert(word.to_owned(), kind); }

    pub fn line(&self) -> usize { self.line }

    pub fn interner(&self) -> &Interner { &self.interner }

    fn peek(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() && !self.at_end {
            match self.bytes.next() {
                Some(Ok(b)) => self.peeked = Some(b),
                Some(Err(e)) => return Err(CompileError::io(e, self.line)),
                None => self.at_end = true,
            }
        }
        Ok(self.peeked)
    }

    fn bump(&mut self) { self.peeked = None; }

    pub fn scan(&mut self) -> Result<Token> {
        loop {
            match self.peek()? {
                Some(b' ' | b'\t' | b'\r') => self.bump(),
                Some(b'\n') => {
                    self.line += 1;
                    self.bump();
                }
                _ => break,
            }
        }
        let line = self.line;
        let kind = match self.peek()? {
            None => TokenKind::Eof,
            Some(b'&') => self.pair(b'&', b'&', TokenKind::And)?,
            Some(b'|') => self.pair(b'|', b'|', TokenKind::Or)?,
            Some(b'=') => self.pair(b'=', b'=', TokenKind::Eq)?,
            Some(b'!') => self.pair(b'!', b'=', TokenKind::Ne)?,
            Some(b'<') => self.pair(b'<', b'=', TokenKind::Le)?,
            Some(b'>') => self.pair(b'>', b'=', TokenKind::Ge)?,
            Some(ch) if ch.is_ascii_digit() => self.number()?,
            Some(ch) if is_word_start(ch) => self.word()?,
            Some(ch) => {
                self.bump();
                TokenKind::Punct(ch)
            }
        };
        trace!(line, token = %kind, "scan");
        Ok(Token { kind, line })
    }

    // The byte after `first` is only consumed when it completes the pair.
    fn pair(&mut self, first: u8, second: u8, kind: TokenKind) -> Result<TokenKind> {
        self.bump();
        if self.peek()? == Some(second) {
            self.bump();
            Ok(kind)
        } else {
            Ok(TokenKind::Punct(first))
        }
    }

    fn number(&mut self) -> Result<TokenKind> {
        let mut value: i64 = 0;
        while let Some(ch @ b'0'..=b'9') = self.peek()? {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i64::from(ch - b'0')))
                .ok_or_else(|| CompileError::syntax("64-bit integer literal", "out-of-range literal", self.line))?;
            self.bump();
        }
        if self.peek()? != Some(b'.') {
            return Ok(TokenKind::Num(value));
        }
        self.bump();
        let mut real = value as f64;
        let mut scale = 10.0;
        while let Some(ch @ b'0'..=b'9') = self.peek()? {
            real += f64::from(ch - b'0') / scale;
            scale *= 10.0;
            self.bump();
        }
        Ok(TokenKind::Real(real))
    }

    fn word(&mut self) -> Result<TokenKind> {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek()? {
            if !is_word_start(ch) && !ch.is_ascii_digit() {
                break;
            }
            lexeme.push(char::from(ch));
            self.bump();
        }
        if let Some(kind) = self.words.get(&lexeme) {
            return Ok(kind.clone());
        }
        let kind = TokenKind::Ident(self.interner.intern(&lexeme));
        self.words.insert(lexeme, kind.clone());
        Ok(kind)
    }
}

fn is_word_start(ch: u8) -> bool { ch == b'_' || ch.is_ascii_alphabetic() }
