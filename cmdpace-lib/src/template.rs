//! Command template parsing and rendering.
//!
//! A template is a program name plus an argument pattern containing the
//! literal placeholder `{}`. Each input line is substituted into the pattern
//! before the result is split into argv tokens, so a line containing spaces
//! expands to multiple arguments.

use crate::error::CmdPaceError;

/// The literal marker replaced with each input line's content.
pub const PLACEHOLDER: &str = "{}";

/// An immutable description of the program and argument pattern to run
/// per input line.
///
/// Validated once at construction: the pattern must contain [`PLACEHOLDER`]
/// at least once. Read-only for the process lifetime.
///
/// # Example
///
/// ```rust
/// use cmdpace_lib::CommandTemplate;
///
/// let template = CommandTemplate::new("grep", "-H {} notes.txt").unwrap();
/// assert_eq!(
///     template.render("TODO"),
///     vec!["-H".to_string(), "TODO".to_string(), "notes.txt".to_string()],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    /// Program name or path to execute
    program: String,

    /// Argument pattern; every `{}` is replaced with the input line
    args_pattern: String,
}

impl CommandTemplate {
    /// Create a template from a program name and argument pattern.
    ///
    /// # Errors
    ///
    /// Returns a template error if the program is empty or the pattern does
    /// not contain the `{}` placeholder.
    pub fn new<P: Into<String>, A: Into<String>>(
        program: P,
        args_pattern: A,
    ) -> Result<Self, CmdPaceError> {
        let program = program.into();
        let args_pattern = args_pattern.into();

        if program.is_empty() {
            return Err(CmdPaceError::template("You must specify the command"));
        }
        if !args_pattern.contains(PLACEHOLDER) {
            return Err(CmdPaceError::template(format!(
                "You must specify the argument placeholder '{}'",
                PLACEHOLDER
            )));
        }

        Ok(Self {
            program,
            args_pattern,
        })
    }

    /// Create a template from positional CLI arguments.
    ///
    /// The first element is the program; the rest are joined with single
    /// spaces to form the argument pattern.
    pub fn from_argv(argv: &[String]) -> Result<Self, CmdPaceError> {
        let Some((program, rest)) = argv.split_first() else {
            return Err(CmdPaceError::template("You must specify the command"));
        };
        Self::new(program.clone(), rest.join(" "))
    }

    /// The program name or path this template executes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Render the argument list for one input line.
    ///
    /// Every placeholder occurrence is replaced with the line (a single
    /// textual substitution, not per-word), and only then is the result
    /// split into whitespace-delimited tokens.
    pub fn render(&self, line: &str) -> Vec<String> {
        self.args_pattern
            .replace(PLACEHOLDER, line)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
