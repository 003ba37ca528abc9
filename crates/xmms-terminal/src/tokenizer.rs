//! Line tokenizer.
//!
//! Splits on runs of whitespace. A backslash takes the next character
//! literally. Double quotes group text and honour backslash escapes inside;
//! single quotes group text verbatim. Adjacent quoted and unquoted pieces
//! join into one argument (`a"b c"d` is `ab cd`).
//!
//! `$NAME` and `${NAME}` are replaced through a lookup function everywhere
//! except inside single quotes or after a backslash.

/// Arguments of one tokenized line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Unquoted, unescaped, variable-expanded arguments.
    pub args: Vec<String>,
    /// Original text of each argument, same indexing as `args`.
    pub raw: Vec<String>,
    /// `false` when a quote or escape was left open at end of line.
    pub completed: bool,
}

impl Tokens {
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Tokenize without variable expansion (every `$NAME` is empty).
pub fn tokenize(line: &str) -> Tokens {
    tokenize_with(line, |_| None)
}

/// Tokenize, resolving `$NAME`/`${NAME}` through `lookup`. Unknown names
/// expand to nothing.
pub fn tokenize_with<F>(line: &str, lookup: F) -> Tokens
where
    F: Fn(&str) -> Option<String>,
{
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut args = Vec::new();
    let mut raw = Vec::new();
    let mut completed = true;
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && chars[i].1.is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let start = chars[i].0;
        let mut arg = String::new();
        while i < chars.len() && !chars[i].1.is_whitespace() {
            match chars[i].1 {
                '\\' => match chars.get(i + 1) {
                    Some(&(_, c)) => {
                        arg.push(c);
                        i += 2;
                    },
                    None => {
                        completed = false;
                        i += 1;
                    },
                },
                quote @ ('"' | '\'') => {
                    i = dequote(&chars, i + 1, quote, &lookup, &mut arg, &mut completed);
                },
                '$' => i = expand_variable(&chars, i + 1, &lookup, &mut arg),
                c => {
                    arg.push(c);
                    i += 1;
                },
            }
        }

        let end = chars.get(i).map_or(line.len(), |&(offset, _)| offset);
        args.push(arg);
        raw.push(line[start..end].to_string());
    }

    Tokens {
        args,
        raw,
        completed,
    }
}

/// Consume a quoted span starting just after the opening quote. Returns the
/// index after the closing quote (or end of input).
fn dequote<F>(
    chars: &[(usize, char)],
    mut i: usize,
    quote: char,
    lookup: &F,
    arg: &mut String,
    completed: &mut bool,
) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    loop {
        let Some(&(_, c)) = chars.get(i) else {
            *completed = false;
            return i;
        };
        i += 1;
        if c == quote {
            return i;
        }
        if quote == '\'' {
            arg.push(c);
            continue;
        }
        match c {
            '\\' => match chars.get(i) {
                Some(&(_, escaped)) => {
                    arg.push(escaped);
                    i += 1;
                },
                None => {
                    *completed = false;
                    return i;
                },
            },
            '$' => i = expand_variable(chars, i, lookup, arg),
            _ => arg.push(c),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expand a variable reference whose `$` sits just before `i`. A `$` not
/// followed by a name (or an unclosed `${`) stays literal.
fn expand_variable<F>(chars: &[(usize, char)], i: usize, lookup: &F, arg: &mut String) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    if chars.get(i).map(|&(_, c)| c) == Some('{')
        && let Some(len) = chars[i + 1..].iter().position(|&(_, c)| c == '}')
    {
        let name: String = chars[i + 1..i + 1 + len].iter().map(|&(_, c)| c).collect();
        arg.push_str(&lookup(&name).unwrap_or_default());
        return i + len + 2;
    }

    let mut end = i;
    while end < chars.len() && is_name_char(chars[end].1) {
        end += 1;
    }
    if end == i {
        arg.push('$');
        return i;
    }
    let name: String = chars[i..end].iter().map(|&(_, c)| c).collect();
    arg.push_str(&lookup(&name).unwrap_or_default());
    end
}
