//! Session variable commands: set, unset.

use std::io::Write;

use xmms_types::ResultCode;
use xmms_types::error::Result;

use crate::commands::section;
use crate::context::CommandContext;
use crate::registry::{Command, CommandRegistry};

/// Register the environment commands.
pub fn register_env_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(SetCmd))?;
    reg.register(Box::new(UnsetCmd))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

struct SetCmd;
impl Command for SetCmd {
    fn name(&self) -> &str {
        "set"
    }
    fn section(&self) -> &str {
        section::ENVIRONMENT
    }
    fn syntax(&self) -> &str {
        "SET [name[=value]...]"
    }
    fn synopsis(&self) -> &str {
        "show or assign session variables"
    }
    fn description(&self) -> &str {
        "With no arguments, prints every variable as name=value in name order. \
         Otherwise each argument of the form name=value assigns that variable; a \
         bare name assigns it the empty string. Variables are expanded in later \
         lines as $name or ${name}. PS1 and RUNNING_PS1 hold the interactive \
         prompts."
    }
    fn returns(&self) -> &str {
        "0, or 125 if an argument has an empty name"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        ctx.result_code = ResultCode::SUCCESS;
        if ctx.argc() == 0 {
            for (name, value) in ctx.env.iter() {
                writeln!(ctx.out, "{name}={value}")?;
            }
            return Ok(());
        }
        let assignments: Vec<(String, String)> = ctx.args[1..]
            .iter()
            .map(|arg| match arg.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (arg.clone(), String::new()),
            })
            .collect();
        if assignments.iter().any(|(name, _)| name.is_empty()) {
            ctx.syntax_error();
            return Ok(());
        }
        for (name, value) in assignments {
            log::debug!("set {name}={value}");
            ctx.env.set(name, value);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// unset
// ---------------------------------------------------------------------------

struct UnsetCmd;
impl Command for UnsetCmd {
    fn name(&self) -> &str {
        "unset"
    }
    fn section(&self) -> &str {
        section::ENVIRONMENT
    }
    fn syntax(&self) -> &str {
        "UNSET <name>..."
    }
    fn synopsis(&self) -> &str {
        "remove session variables"
    }
    fn description(&self) -> &str {
        "Removes each named variable. Names that are not set are ignored."
    }
    fn returns(&self) -> &str {
        "0, or 125 when no name is given"
    }
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<()> {
        if ctx.argc() == 0 {
            ctx.syntax_error();
            return Ok(());
        }
        for name in &ctx.args[1..] {
            ctx.env.unset(name);
        }
        ctx.result_code = ResultCode::SUCCESS;
        Ok(())
    }
}
