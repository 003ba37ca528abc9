//! Command-name completion for line editors.

use crate::registry::CommandRegistry;

/// Return the `state`-th completion for the word at `index` of `args`.
///
/// Only the first word (the command name) is completed; candidates are the
/// registry's sorted lookup names starting with the typed text, compared
/// case-insensitively. Returns `None` once candidates run out.
pub fn complete_command(
    registry: &CommandRegistry,
    args: &[String],
    index: usize,
    state: usize,
) -> Option<String> {
    if index != 0 {
        return None;
    }
    let typed = args.first().map_or("", String::as_str);
    registry
        .completions(typed)
        .get(state)
        .map(|name| name.to_string())
}

/// Split `line` into whitespace-separated words and find the word the cursor
/// at byte offset `pos` sits in. A cursor outside every word gets the index
/// one past the last word.
pub fn split_for_completion(line: &str, pos: usize) -> (Vec<String>, usize) {
    let mut words = Vec::new();
    let mut index = None;
    let mut start = None;
    for (i, c) in line.char_indices().chain(std::iter::once((line.len(), ' '))) {
        if !c.is_whitespace() {
            start.get_or_insert(i);
            continue;
        }
        if let Some(s) = start.take() {
            if index.is_none() && s <= pos && pos <= i {
                index = Some(words.len());
            }
            words.push(line[s..i].to_string());
        }
    }
    let index = index.unwrap_or(words.len());
    (words, index)
}

/// All completions for the cursor position, with the byte offset the
/// replacement starts at.
pub fn complete_line(registry: &CommandRegistry, line: &str, pos: usize) -> (usize, Vec<String>) {
    let head = line.get(..pos).unwrap_or(line);
    let word = head.rsplit(char::is_whitespace).next().unwrap_or("");
    let start = head.len() - word.len();

    let (mut args, index) = split_for_completion(head, head.len());
    if index >= args.len() {
        args.push(String::new());
    }
    let candidates = (0..)
        .map_while(|state| complete_command(registry, &args, index, state))
        .collect();
    (start, candidates)
}
