//! Session and documentation commands: quit, help, status, version, echo,
//! xmmsquit, exec.

use std::collections::BTreeMap;
use std::io::Write;

use xmms_remote::EQ_BANDS;
use xmms_types::ResultCode;
use xmms_types::error::{Result, ShellError};

use crate::commands::section;
use crate::context::CommandContext;
use crate::output::write_indented;
use crate::registry::{Command, CommandRegistry};

/// Register the general commands.
pub fn register_general_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(QuitCmd))?;
    reg.register(Box::new(HelpCmd))?;
    reg.register(Box::new(StatusCmd))?;
    reg.register(Box::new(VersionCmd))?;
    reg.register(Box::new(EchoCmd))?;
    reg.register(Box::new(XmmsQuitCmd))?;
    reg.register(Box::new(ExecCmd))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// quit
// ---------------------------------------------------------------------------

struct QuitCmd;
impl Command for QuitCmd {
    fn name(&self) -> &str {
        "quit"
    }
    fn aliases(&self) -> &[&str] {
        &["exit"]
    }
    fn section(&self) -> &str {
        section::GENERAL
    }
    fn syntax(&self) -> &str {
        "QUIT"
    }
    fn synopsis(&self) -> &str {
        "leave the shell"
    }
    fn description(&self) -> &str {
        "Ends the shell session right away with exit status 0. The player keeps \
         running; use XMMSQUIT to stop it as well."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.quit = true;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;

impl HelpCmd {
    /// Lookup names grouped by section, both levels sorted.
    fn sections(registry: &CommandRegistry) -> BTreeMap<&str, BTreeMap<&str, &dyn Command>> {
        let mut sections: BTreeMap<&str, BTreeMap<&str, &dyn Command>> = BTreeMap::new();
        for r in registry.list() {
            sections
                .entry(r.command().section())
                .or_default()
                .insert(r.name(), r.command());
        }
        sections
    }

    fn listing(ctx: &mut CommandContext<'_>) -> Result<()> {
        let registry = ctx.registry;
        for (i, (section, commands)) in Self::sections(registry).into_iter().enumerate() {
            if i > 0 {
                writeln!(ctx.out)?;
            }
            writeln!(ctx.out, "{section}:")?;
            for (name, command) in commands {
                write!(ctx.out, "  {name:<16.16} -")?;
                write_indented(ctx.out, command.synopsis(), 20, 21, 76)?;
                writeln!(ctx.out)?;
            }
        }
        Ok(())
    }

    fn detail(ctx: &mut CommandContext<'_>, command: &dyn Command) -> Result<()> {
        let out = &mut *ctx.out;
        let name = command.name();
        write!(out, "{name}: ")?;
        write_indented(out, command.synopsis(), name.len() + 2, name.len() + 2, 75)?;
        write!(out, "\n\nSyntax: ")?;
        write_indented(out, command.syntax(), 7, 7, 75)?;
        writeln!(out)?;
        if !command.aliases().is_empty() {
            writeln!(out, "Aliases: {}", command.aliases().join(" "))?;
        }
        writeln!(out)?;
        write_indented(out, command.description(), 0, 0, 75)?;
        write!(out, "\n\nReturns:")?;
        write_indented(out, command.returns(), 8, 9, 75)?;
        write!(out, "\n\n")?;
        Ok(())
    }

    fn html(ctx: &mut CommandContext<'_>) -> Result<()> {
        let registry = ctx.registry;
        let out = &mut *ctx.out;
        writeln!(out, "<a name=\"commands\"><h3>List of Commands</h3></a>")?;
        writeln!(out, "<ul>")?;
        for (section, commands) in Self::sections(registry) {
            writeln!(out, "<li><b>{}</b>\n<ul>", html_escape(section))?;
            for (name, command) in commands {
                writeln!(
                    out,
                    "<li><a href=\"#{}\">{}</a>",
                    html_anchor(command.name()),
                    html_escape(name)
                )?;
            }
            writeln!(out, "</ul>")?;
        }
        writeln!(out, "</ul>")?;

        let primaries: BTreeMap<&str, &dyn Command> = registry
            .list()
            .iter()
            .map(|r| (r.command().name(), r.command()))
            .collect();
        writeln!(out, "<dl>")?;
        for (name, command) in primaries {
            writeln!(
                out,
                "<dt><a name=\"{}\" href=\"#commands\">{}</a> - {}</dt>\n<dd>",
                html_anchor(name),
                html_escape(name),
                html_escape(command.synopsis())
            )?;
            writeln!(out, "<code>{}</code><p>", html_escape(command.syntax()))?;
            writeln!(out, "{}<p>", html_escape(command.description()))?;
            let aliases = command.aliases();
            if !aliases.is_empty() {
                let plural = if aliases.len() > 1 { "es" } else { "" };
                let list: Vec<String> = aliases.iter().map(|a| html_escape(a)).collect();
                writeln!(out, "<b>Alias{plural}</b>: {}<br>", list.join(", "))?;
            }
            writeln!(out, "<b>Returns</b>: {}\n</dd>", html_escape(command.returns()))?;
        }
        writeln!(out, "</dl>")?;
        Ok(())
    }
}

fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Anchor name: the alphanumeric characters of `s`.
fn html_anchor(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn aliases(&self) -> &[&str] {
        &["?"]
    }
    fn section(&self) -> &str {
        section::GENERAL
    }
    fn syntax(&self) -> &str {
        "HELP [command|html]"
    }
    fn synopsis(&self) -> &str {
        "list commands or describe one"
    }
    fn description(&self) -> &str {
        "With no argument, HELP lists every command by section together with a \
         one-line summary. Given a command name (or any prefix that selects it), \
         HELP prints its syntax, aliases, full description and the meaning of its \
         result code. HELP HTML writes the whole reference as an HTML fragment."
    }
    fn returns(&self) -> &str {
        "127 if the named command does not exist, 0 otherwise"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.result_code = ResultCode::SUCCESS;
        let Some(topic) = ctx.arg(1).map(str::to_string) else {
            return Self::listing(ctx);
        };
        if topic.eq_ignore_ascii_case("html") {
            return Self::html(ctx);
        }
        let registry = ctx.registry;
        match registry.lookup(&topic) {
            Some(command) => Self::detail(ctx, command),
            None => {
                writeln!(ctx.err, "Invalid help topic: `{topic}'")?;
                writeln!(ctx.err, "Type `help' alone to list the available topics")?;
                ctx.result_code = ResultCode::FAILURE;
                Ok(())
            },
        }
    }
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

struct StatusCmd;

/// `mm:ss.cc` for a millisecond count.
fn format_time(millis: i32) -> String {
    format!(
        "{:02}:{:02}.{:02}",
        millis / 60_000,
        (millis / 1000) % 60,
        (millis / 10) % 100
    )
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

impl Command for StatusCmd {
    fn name(&self) -> &str {
        "status"
    }
    fn section(&self) -> &str {
        section::GENERAL
    }
    fn syntax(&self) -> &str {
        "STATUS"
    }
    fn synopsis(&self) -> &str {
        "show what the player is doing"
    }
    fn description(&self) -> &str {
        "Prints the current track and playback progress followed by the repeat \
         and shuffle modes, balance, skin, channel volumes and, when the player \
         exposes them, the equalizer settings."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player = ctx.player;
        let pos = player.playlist_position()?;
        let len = player.playlist_length()?;
        let title = if (0..len).contains(&pos) {
            player.playlist_title(pos)?
        } else {
            String::new()
        };

        if player.is_playing()? {
            let info = player.playback_info()?;
            let shown = if title.is_empty() { "<no title>" } else { title.as_str() };
            writeln!(
                ctx.out,
                "Playing: {shown} ({} kbps, {} hz, {} channels)",
                info.rate / 1000,
                info.freq,
                info.channels
            )?;
            let paused = if player.is_paused()? { " (paused)" } else { "" };
            writeln!(ctx.out, "Time: {}{paused}", format_time(player.output_time()?))?;
        } else {
            let shown = if title.is_empty() { "<no track selected>" } else { title.as_str() };
            writeln!(ctx.out, "Current song: {shown}")?;
        }

        let (left, right) = player.volume()?;
        writeln!(ctx.out, "Repeat mode: {}", on_off(player.is_repeat()?))?;
        writeln!(ctx.out, "Shuffle mode: {}", on_off(player.is_shuffle()?))?;
        writeln!(ctx.out, "Balance: {}", player.balance()?)?;
        writeln!(ctx.out, "Skin: {}", player.skin()?)?;
        writeln!(ctx.out, "Left volume: {left}")?;
        writeln!(ctx.out, "Right volume: {right}")?;

        match player.eq_preamp() {
            Ok(preamp) => {
                writeln!(ctx.out, "Equalizer preamp: {preamp:.1}")?;
                write!(ctx.out, "Equalizer bands:")?;
                for band in 0..EQ_BANDS {
                    write!(ctx.out, "{band:>5}")?;
                }
                write!(ctx.out, "\n{:16}", "")?;
                for band in 0..EQ_BANDS {
                    write!(ctx.out, "{:>5.1}", player.eq_band(band)?)?;
                }
                writeln!(ctx.out)?;
            },
            Err(ShellError::Unsupported(what)) => log::debug!("status skips {what}"),
            Err(e) => return Err(e),
        }
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// version
// ---------------------------------------------------------------------------

struct VersionCmd;
impl Command for VersionCmd {
    fn name(&self) -> &str {
        "version"
    }
    fn section(&self) -> &str {
        section::GENERAL
    }
    fn syntax(&self) -> &str {
        "VERSION"
    }
    fn synopsis(&self) -> &str {
        "show shell and player versions"
    }
    fn description(&self) -> &str {
        "Prints the shell's own version and the protocol version reported by the \
         player, in hexadecimal."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let player_version = ctx.player.version()?;
        writeln!(ctx.out, "XMMS-Shell v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(ctx.out, "XMMS: {player_version:04X}")?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn section(&self) -> &str {
        section::GENERAL
    }
    fn syntax(&self) -> &str {
        "ECHO [str...]"
    }
    fn synopsis(&self) -> &str {
        "print the arguments"
    }
    fn description(&self) -> &str {
        "Prints its arguments separated by single spaces and ends the line. With \
         no arguments an empty line is printed."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        let text = ctx.args.get(1..).unwrap_or_default().join(" ");
        writeln!(ctx.out, "{text}")?;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// xmmsquit
// ---------------------------------------------------------------------------

struct XmmsQuitCmd;
impl Command for XmmsQuitCmd {
    fn name(&self) -> &str {
        "xmmsquit"
    }
    fn aliases(&self) -> &[&str] {
        &["xmmsexit"]
    }
    fn section(&self) -> &str {
        section::GENERAL
    }
    fn syntax(&self) -> &str {
        "XMMSQUIT"
    }
    fn synopsis(&self) -> &str {
        "shut down the player and the shell"
    }
    fn description(&self) -> &str {
        "Tells the player to exit, then ends the shell session. QUIT leaves the \
         player running."
    }
    fn returns(&self) -> &str {
        "Always 0"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.player.quit()?;
        log::info!("player on session {} asked to exit", ctx.session_id);
        ctx.quit = true;
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// exec
// ---------------------------------------------------------------------------

struct ExecCmd;
impl Command for ExecCmd {
    fn name(&self) -> &str {
        "exec"
    }
    fn section(&self) -> &str {
        section::GENERAL
    }
    fn syntax(&self) -> &str {
        "EXEC <command>"
    }
    fn synopsis(&self) -> &str {
        "run a system command"
    }
    fn description(&self) -> &str {
        "Hands the rest of the line, exactly as typed, to /bin/sh -c. Quoting and \
         variables are therefore interpreted by the system shell."
    }
    fn returns(&self) -> &str {
        "The exit status of the command, or 127 if it could not be started"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        if ctx.argc() == 0 {
            ctx.syntax_error();
            return Ok(());
        }
        let command_line = ctx.raw[1..].join(" ");
        log::debug!("exec: {command_line}");
        let output = match std::process::Command::new("sh")
            .arg("-c")
            .arg(&command_line)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                writeln!(ctx.err, "Unable to run `{command_line}': {e}")?;
                ctx.result_code = ResultCode::FAILURE;
                return Ok(());
            },
        };
        ctx.out.write_all(&output.stdout)?;
        ctx.err.write_all(&output.stderr)?;
        ctx.result_code = output
            .status
            .code()
            .map_or(ResultCode::FAILURE, ResultCode::from);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::run;
    use xmms_remote::{MemoryPlayer, Player};

    #[test]
    fn quit_and_exit() {
        let player = MemoryPlayer::new(0);
        for line in ["quit", "exit", "QU"] {
            let r = run(&player, line);
            assert!(r.quit, "{line}");
            assert_eq!(r.code, ResultCode::SUCCESS);
        }
        assert!(player.is_running().unwrap());
    }

    #[test]
    fn echo_joins_arguments() {
        let player = MemoryPlayer::new(0);
        assert_eq!(run(&player, "echo  a   'b c'").out, "a b c\n");
        assert_eq!(run(&player, "echo").out, "\n");
    }

    #[test]
    fn version_prints_hex_player_version() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "version");
        assert!(r.out.starts_with("XMMS-Shell v"));
        assert!(r.out.ends_with("XMMS: 1000\n"));
    }

    #[test]
    fn xmmsquit_stops_player_and_shell() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "xmmsexit");
        assert!(r.quit);
        assert!(!player.is_running().unwrap());
    }

    #[test]
    fn status_when_stopped() {
        let player = MemoryPlayer::with_playlist(0, &["/m/song.mp3"]);
        let r = run(&player, "status");
        assert_eq!(r.code, ResultCode::SUCCESS);
        let lines: Vec<&str> = r.out.lines().collect();
        assert_eq!(lines[0], "Current song: song");
        assert_eq!(lines[1], "Repeat mode: off");
        assert_eq!(lines[2], "Shuffle mode: off");
        assert_eq!(lines[3], "Balance: 0");
        assert_eq!(lines[4], "Skin: default");
        assert_eq!(lines[5], "Left volume: 50");
        assert_eq!(lines[6], "Right volume: 50");
        assert_eq!(lines[7], "Equalizer preamp: 0.0");
    }

    #[test]
    fn status_when_playing() {
        let player = MemoryPlayer::with_playlist(0, &["a.mp3"]);
        player.play().unwrap();
        player.pause().unwrap();
        player.update(|s| s.output_time = 83_456);
        let r = run(&player, "status");
        let lines: Vec<&str> = r.out.lines().collect();
        assert_eq!(lines[0], "Playing: a (128 kbps, 44100 hz, 2 channels)");
        assert_eq!(lines[1], "Time: 01:23.45 (paused)");
    }

    #[test]
    fn status_with_empty_playlist() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "status");
        assert!(r.out.starts_with("Current song: <no track selected>\n"));
    }

    #[test]
    fn status_reports_dead_player() {
        let player = MemoryPlayer::new(4);
        player.quit().unwrap();
        let r = run(&player, "status");
        assert_eq!(r.code, ResultCode::FAILURE);
        assert!(r.err.contains("not running under session 4"));
    }

    #[test]
    fn time_format() {
        assert_eq!(format_time(0), "00:00.00");
        assert_eq!(format_time(61_990), "01:01.99");
    }

    #[test]
    fn help_listing_groups_sections() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "help");
        assert_eq!(r.code, ResultCode::SUCCESS);
        let headings: Vec<&str> = r.out.lines().filter(|l| l.ends_with(':')).collect();
        assert_eq!(
            headings,
            [
                "Environment:",
                "General:",
                "Playback:",
                "Playlist:",
                "Volume Control:",
                "Window Control:"
            ]
        );
        assert!(r.out.contains("\n  echo             - print the arguments\n"));
        assert!(r.out.contains("\n  exit             - leave the shell\n"));
        assert!(r.out.lines().all(|l| l.chars().count() < 76));
    }

    #[test]
    fn help_detail() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "help exi");
        assert_eq!(r.code, ResultCode::SUCCESS);
        assert!(r.out.starts_with("quit: leave the shell\n\nSyntax: QUIT\nAliases: exit\n\n"));
        assert!(r.out.ends_with("Returns: Always 0\n\n"));
    }

    #[test]
    fn help_unknown_topic() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "? nosuch");
        assert_eq!(r.code, ResultCode::FAILURE);
        assert!(r.err.starts_with("Invalid help topic: `nosuch'\n"));
        assert!(r.out.is_empty());
    }

    #[test]
    fn help_html() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "help HTML");
        assert!(r.out.contains("<a href=\"#randomtrack\">random-track</a>"));
        assert!(r.out.contains("<code>JUMP &lt;position&gt;</code>"));
        assert!(!r.out.contains("<b>Aliases</b>: forward<br>"));
        assert!(r.out.contains("<b>Alias</b>: forward<br>"));
    }

    #[test]
    fn exec_requires_command() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "exec");
        assert_eq!(r.code, ResultCode::SYNTAX);
        assert_eq!(r.err, "Usage: EXEC <command>\n");
    }

    #[test]
    fn exec_passes_raw_text() {
        let player = MemoryPlayer::new(0);
        let r = run(&player, "exec echo 'a  b'; exec exit 3");
        assert_eq!(r.out, "a  b\n");
        assert_eq!(r.code, ResultCode(3));
    }

    #[test]
    fn html_helpers() {
        assert_eq!(html_escape("<a & b>"), "&lt;a &amp; b&gt;");
        assert_eq!(html_anchor("random-track"), "randomtrack");
    }
}
