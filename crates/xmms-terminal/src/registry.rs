//! Command trait and the sorted command registry.

use std::rc::Rc;

use xmms_types::error::{Result, ShellError};

use crate::context::CommandContext;

/// Command may only run from an interactive session.
pub const FLAG_INTERACTIVE: u32 = 0x1;

/// A single executable command.
///
/// Documentation strings are plain text; the help command wraps them.
pub trait Command {
    /// Primary lookup name, lower case.
    fn name(&self) -> &str;

    /// Additional lookup names.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Heading the command is listed under in `help`.
    fn section(&self) -> &str {
        "General"
    }

    /// Usage string printed after a syntax error.
    fn syntax(&self) -> &str {
        "<not specified>"
    }

    /// One-line summary.
    fn synopsis(&self) -> &str {
        "<no synopsis specified>"
    }

    fn description(&self) -> &str {
        "<no description specified>"
    }

    /// Meaning of the result code.
    fn returns(&self) -> &str {
        "<not specified>"
    }

    fn flags(&self) -> u32 {
        0
    }

    fn is_interactive_only(&self) -> bool {
        self.flags() & FLAG_INTERACTIVE != 0
    }

    /// Run the command. Sets `ctx.result_code` and possibly `ctx.quit`.
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()>;
}

/// One lookup name bound to a command. Aliases get their own reference to
/// the same command.
#[derive(Clone)]
pub struct CommandReference {
    name: String,
    command: Rc<dyn Command>,
}

impl CommandReference {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &dyn Command {
        self.command.as_ref()
    }
}

/// Registry of commands, searchable by exact name or prefix.
///
/// Built once at startup: `register` every command, then `finalize` to sort.
#[derive(Default)]
pub struct CommandRegistry {
    refs: Vec<CommandReference>,
    finalized: bool,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command under its primary name and each alias.
    ///
    /// Fails if any of those names is already taken.
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<()> {
        let command: Rc<dyn Command> = Rc::from(command);
        let names: Vec<String> = std::iter::once(command.name())
            .chain(command.aliases().iter().copied())
            .map(str::to_string)
            .collect();
        for (i, name) in names.iter().enumerate() {
            if self.refs.iter().any(|r| r.name == *name) || names[..i].contains(name) {
                return Err(ShellError::Command(format!(
                    "duplicate command name: {name}"
                )));
            }
        }
        for name in names {
            self.refs.push(CommandReference {
                name,
                command: Rc::clone(&command),
            });
        }
        self.finalized = false;
        Ok(())
    }

    /// Sort the lookup names. Must run after registration, before lookups.
    pub fn finalize(&mut self) {
        self.refs.sort_by(|a, b| a.name.cmp(&b.name));
        self.finalized = true;
        log::debug!("registry finalized with {} names", self.refs.len());
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Resolve a typed command name.
    ///
    /// A case-insensitive exact match wins; otherwise the first name in
    /// sorted order that starts with `name` (case-insensitively). Empty
    /// input never matches.
    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        if name.is_empty() {
            return None;
        }
        self.refs
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .or_else(|| self.refs.iter().find(|r| has_prefix_ignore_case(&r.name, name)))
            .map(CommandReference::command)
    }

    /// Sorted snapshot of every lookup name.
    pub fn list(&self) -> &[CommandReference] {
        &self.refs
    }

    /// Sorted lookup names starting with `partial` (case-insensitive).
    pub fn completions(&self, partial: &str) -> Vec<&str> {
        self.refs
            .iter()
            .filter(|r| has_prefix_ignore_case(&r.name, partial))
            .map(CommandReference::name)
            .collect()
    }

    /// Number of lookup names (primary names plus aliases).
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

fn has_prefix_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static [&'static str]);

    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn aliases(&self) -> &[&str] {
            self.1
        }
        fn execute(&self, _ctx: &mut CommandContext<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn registry(cmds: &[(&'static str, &'static [&'static str])]) -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        for &(name, aliases) in cmds {
            reg.register(Box::new(Named(name, aliases))).unwrap();
        }
        reg.finalize();
        reg
    }

    fn same(a: &dyn Command, b: &dyn Command) -> bool {
        std::ptr::addr_eq(a as *const dyn Command, b as *const dyn Command)
    }

    #[test]
    fn exact_match_beats_prefix() {
        let reg = registry(&[("playlist", &[]), ("play", &[])]);
        assert_eq!(reg.lookup("play").unwrap().name(), "play");
        assert_eq!(reg.lookup("PLAY").unwrap().name(), "play");
    }

    #[test]
    fn prefix_picks_first_sorted() {
        let reg = registry(&[("playlist", &[]), ("play", &[])]);
        assert_eq!(reg.lookup("pla").unwrap().name(), "play");
        assert_eq!(reg.lookup("playl").unwrap().name(), "playlist");
    }

    #[test]
    fn prefix_can_resolve_through_alias() {
        let reg = registry(&[("next", &["forward"]), ("fade", &[])]);
        assert_eq!(reg.lookup("fo").unwrap().name(), "next");
        assert_eq!(reg.lookup("f").unwrap().name(), "fade");
    }

    #[test]
    fn unknown_and_empty_names() {
        let reg = registry(&[("play", &[])]);
        assert!(reg.lookup("stop").is_none());
        assert!(reg.lookup("").is_none());
        assert!(reg.lookup("playx").is_none());
    }

    #[test]
    fn aliases_share_one_command() {
        let reg = registry(&[("quit", &["exit"]), ("echo", &[])]);
        let quit = reg.lookup("quit").unwrap();
        let exit = reg.lookup("exit").unwrap();
        assert!(same(quit, exit));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn repeated_lookup_is_stable() {
        let reg = registry(&[("volume", &[]), ("version", &[])]);
        let first = reg.lookup("v").unwrap();
        for _ in 0..5 {
            assert!(same(first, reg.lookup("v").unwrap()));
        }
        assert_eq!(first.name(), "version");
    }

    #[test]
    fn list_is_sorted_by_lookup_name() {
        let reg = registry(&[("upvolume", &["+"]), ("balance", &[]), ("downvolume", &["-"])]);
        let names: Vec<&str> = reg.list().iter().map(CommandReference::name).collect();
        assert_eq!(names, ["+", "-", "balance", "downvolume", "upvolume"]);
        assert!(reg.is_finalized());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Named("quit", &["exit"]))).unwrap();
        assert!(reg.register(Box::new(Named("exit", &[]))).is_err());
        assert!(reg.register(Box::new(Named("stop", &["stop"]))).is_err());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn completions_case_insensitive() {
        let reg = registry(&[("play", &[]), ("pause", &[]), ("stop", &[])]);
        assert_eq!(reg.completions("P"), ["pause", "play"]);
        assert_eq!(reg.completions(""), ["pause", "play", "stop"]);
        assert!(reg.completions("x").is_empty());
    }

    #[test]
    fn defaults_for_documentation() {
        let cmd = Named("x", &[]);
        assert_eq!(cmd.section(), "General");
        assert_eq!(cmd.syntax(), "<not specified>");
        assert!(!cmd.is_interactive_only());
    }
}
