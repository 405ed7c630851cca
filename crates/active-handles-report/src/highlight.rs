//! ANSI source highlighting
//!
//! A small logos tokenizer colours keywords, literals and comments. Text the
//! tokenizer does not recognise is copied through unchanged, so highlighting
//! never loses source.

use active_handles::Highlight;
use logos::Logos;
use std::io::{self, Write};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};
use tracing::debug;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum SyntaxToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?")]
    Number,

    #[token("fn")]
    #[token("let")]
    #[token("mut")]
    #[token("move")]
    #[token("return")]
    #[token("if")]
    #[token("else")]
    #[token("match")]
    #[token("for")]
    #[token("while")]
    #[token("loop")]
    #[token("in")]
    #[token("async")]
    #[token("await")]
    #[token("function")]
    #[token("var")]
    #[token("const")]
    Keyword,

    #[token("true")]
    #[token("false")]
    #[token("None")]
    #[token("Some")]
    Literal,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[-+*/%=<>!&|^~?:;,.()\[\]{}@#$]")]
    Punct,

    #[regex(r"[^\x00-\x7F]+")]
    NonAscii,
}

impl SyntaxToken {
    fn color(self) -> Option<(Color, bool)> {
        match self {
            SyntaxToken::LineComment | SyntaxToken::BlockComment => Some((Color::Black, true)),
            SyntaxToken::Str => Some((Color::Yellow, false)),
            SyntaxToken::Number | SyntaxToken::Literal => Some((Color::Cyan, false)),
            SyntaxToken::Keyword => Some((Color::Blue, true)),
            SyntaxToken::Punct => Some((Color::White, false)),
            SyntaxToken::Ident | SyntaxToken::NonAscii => None,
        }
    }
}

/// Highlighter producing ANSI-coloured, line-numbered text.
#[derive(Debug, Clone, Copy)]
pub struct AnsiHighlighter {
    color: bool,
    line_numbers: bool,
}

impl AnsiHighlighter {
    /// Coloured output with line numbers
    pub fn new() -> Self {
        Self {
            color: true,
            line_numbers: true,
        }
    }

    /// Line numbers only, no escape codes
    pub fn plain() -> Self {
        Self {
            color: false,
            line_numbers: true,
        }
    }

    /// Toggle the line-number gutter
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    fn render(&self, source: &str) -> io::Result<String> {
        let buffer = if self.color {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };
        let width = source.lines().count().max(1).to_string().len();
        let mut out = Gutter {
            buffer,
            width,
            line: 0,
            at_line_start: true,
            numbered: self.line_numbers,
        };

        let mut lexer = SyntaxToken::lexer(source);
        let mut cursor = 0;
        while let Some(token) = lexer.next() {
            let span = lexer.span();
            out.write_text(&source[cursor..span.start], None)?;
            let color = token.ok().and_then(SyntaxToken::color);
            out.write_text(lexer.slice(), color)?;
            cursor = span.end;
        }
        out.write_text(&source[cursor..], None)?;

        String::from_utf8(out.buffer.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl Default for AnsiHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlight for AnsiHighlighter {
    fn highlight(&self, source: &str) -> String {
        match self.render(source) {
            Ok(highlighted) => highlighted,
            Err(err) => {
                debug!(error = %err, "highlighting failed, returning source unchanged");
                source.to_string()
            }
        }
    }
}

struct Gutter {
    buffer: Buffer,
    width: usize,
    line: usize,
    at_line_start: bool,
    numbered: bool,
}

impl Gutter {
    /// Write `text`, restarting colour after every line-number gutter
    fn write_text(&mut self, text: &str, color: Option<(Color, bool)>) -> io::Result<()> {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                if self.at_line_start {
                    self.gutter()?;
                }
                writeln!(self.buffer)?;
                self.at_line_start = true;
            }
            if piece.is_empty() {
                continue;
            }
            if self.at_line_start {
                self.gutter()?;
            }
            match color {
                Some((fg, intense)) => {
                    self.buffer
                        .set_color(ColorSpec::new().set_fg(Some(fg)).set_intense(intense))?;
                    write!(self.buffer, "{}", piece)?;
                    self.buffer.reset()?;
                }
                None => write!(self.buffer, "{}", piece)?,
            }
        }
        Ok(())
    }

    fn gutter(&mut self) -> io::Result<()> {
        self.line += 1;
        self.at_line_start = false;
        if self.numbered {
            self.buffer
                .set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
            write!(self.buffer, "{:>width$}: ", self.line, width = self.width)?;
            self.buffer.reset()?;
        }
        Ok(())
    }
}
