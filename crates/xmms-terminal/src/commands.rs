//! Built-in command set.

use xmms_types::error::Result;

use crate::registry::CommandRegistry;

/// Register every built-in command into `reg`.
///
/// The registry still needs [`CommandRegistry::finalize`] afterwards.
pub fn register_builtins(reg: &mut CommandRegistry) -> Result<()> {
    crate::register_general_commands(reg)?;
    crate::register_playback_commands(reg)?;
    crate::register_playlist_commands(reg)?;
    crate::register_volume_commands(reg)?;
    crate::register_window_commands(reg)?;
    crate::register_env_commands(reg)?;
    Ok(())
}

/// A finalized registry holding every built-in command.
pub fn builtin_registry() -> Result<CommandRegistry> {
    let mut reg = CommandRegistry::new();
    register_builtins(&mut reg)?;
    reg.finalize();
    Ok(reg)
}

/// Section headings used by the built-in commands.
pub mod section {
    pub const GENERAL: &str = "General";
    pub const PLAYBACK: &str = "Playback";
    pub const PLAYLIST: &str = "Playlist";
    pub const VOLUME: &str = "Volume Control";
    pub const WINDOW: &str = "Window Control";
    pub const ENVIRONMENT: &str = "Environment";
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_registers() {
        let reg = builtin_registry().unwrap();
        assert!(reg.is_finalized());
        for name in [
            "quit", "exit", "help", "?", "status", "version", "echo", "xmmsquit", "xmmsexit",
            "exec", "play", "pause", "stop", "fakepause", "repeat", "shuffle", "jump", "next",
            "forward", "previous", "backward", "clear", "list", "load", "save", "random-track",
            "randomtrack", "current-track", "currenttrack", "remove", "resetdevice", "fade",
            "volume", "upvolume", "+", "downvolume", "-", "balance", "preamp", "band", "window",
            "preferences", "eject", "set", "unset",
        ] {
            let cmd = reg.lookup(name).unwrap_or_else(|| panic!("{name} missing"));
            assert!(
                cmd.name() == name || cmd.aliases().contains(&name),
                "{name} resolved to {}",
                cmd.name()
            );
        }
    }

    #[test]
    fn names_are_sorted() {
        let reg = builtin_registry().unwrap();
        let names: Vec<&str> = reg.list().iter().map(|r| r.name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn every_builtin_is_documented() {
        let reg = builtin_registry().unwrap();
        for r in reg.list() {
            let cmd = r.command();
            assert!(!cmd.syntax().starts_with('<'), "{} lacks syntax", cmd.name());
            assert!(!cmd.synopsis().starts_with('<'), "{} lacks synopsis", cmd.name());
            assert!(!cmd.description().starts_with('<'), "{} lacks description", cmd.name());
            assert!(!cmd.returns().starts_with('<'), "{} lacks returns", cmd.name());
        }
    }

    #[test]
    fn registering_twice_fails() {
        let mut reg = builtin_registry().unwrap();
        assert!(register_builtins(&mut reg).is_err());
    }

    #[test]
    fn only_fakepause_is_interactive() {
        let reg = builtin_registry().unwrap();
        let interactive: Vec<&str> = reg
            .list()
            .iter()
            .filter(|r| r.command().is_interactive_only())
            .map(|r| r.name())
            .collect();
        assert_eq!(interactive, ["fakepause"]);
    }
}
