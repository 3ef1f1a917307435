//! GitHub Actions runner boundary: inputs, outputs and workflow commands.

use crate::error::{ActionError, Result};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable names an input may arrive under.
///
/// The runner exports `INPUT_<NAME>` with the name upper-cased and hyphens kept;
/// callers that set inputs by hand tend to use underscores, which win.
pub fn input_env_names(name: &str) -> [String; 2] {
    let upper = name.replace(' ', "_").to_uppercase();
    [format!("INPUT_{}", upper.replace('-', "_")), format!("INPUT_{}", upper)]
}

/// Read an action input; blank values count as missing.
pub fn get_input(name: &str) -> Option<String> {
    input_env_names(name)
        .iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub fn get_required_input(name: &str) -> Result<String> {
    get_input(name).ok_or_else(|| ActionError::missing_input(name))
}

/// Escape a workflow command message (`%`, CR and LF).
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn workflow_command(command: &str, message: &str) -> String {
    format!("::{}::{}", command, escape_data(message))
}

/// Emit a warning annotation
pub fn warning(message: &str) {
    println!("{}", workflow_command("warning", message));
}

/// Emit an error annotation
pub fn error(message: &str) {
    println!("{}", workflow_command("error", message));
}

/// Render one `$GITHUB_OUTPUT` entry; multi-line values use a heredoc delimiter.
pub fn format_output_entry(name: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{}={}\n", name, value);
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let delimiter = format!("ghadelimiter_{}_{}", std::process::id(), nanos);
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// Publish an output value for later workflow steps.
///
/// Appends to the file named by `GITHUB_OUTPUT`; outside a runner the legacy
/// `set-output` command is printed instead.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match env::var("GITHUB_OUTPUT").ok().filter(|p| !p.is_empty()) {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(format_output_entry(name, value).as_bytes())?;
        }
        None => println!("::set-output name={}::{}", name, escape_data(value)),
    }
    Ok(())
}

/// Messages of every layer of an error, deepest cause first.
pub fn error_chain(err: &anyhow::Error) -> Vec<String> {
    let mut chain: Vec<String> = err.chain().map(|cause| cause.to_string()).collect();
    chain.reverse();
    chain
}

/// Report each layer of an error as an error annotation, deepest cause first.
pub fn report_error(err: &anyhow::Error) {
    for message in error_chain(err) {
        error(&message);
    }
}
