#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Word,
    Space,
    LineBreak,
}

impl TokenClass {
    fn of(c: char) -> Self {
        if c == '\n' {
            Self::LineBreak
        } else if c.is_whitespace() {
            Self::Space
        } else {
            Self::Word
        }
    }
}

/// Split `text` into reveal steps
///
/// Words and runs of blanks each form one token, every line break is a token
/// of its own. Delimiters are kept, so concatenating the tokens gives back
/// `text` byte for byte.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenClass> = None;

    for (idx, c) in text.char_indices() {
        let class = TokenClass::of(c);
        match current {
            Some(prev) if prev == class && class != TokenClass::LineBreak => {}
            Some(_) => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            None => {}
        }
        current = Some(class);
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}
