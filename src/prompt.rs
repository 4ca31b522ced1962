// src/prompt.rs

//! Interactive prompts for the install flow.
//!
//! Implements the classic "question + default answer" pattern: the user is
//! asked a yes/no question, an empty reply selects the default, and invalid
//! replies re-ask. When stdout is not a terminal every question silently
//! resolves to its default so scripted runs never hang on stdin.

use crate::error::Result;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// A yes/no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn is_yes(self) -> bool {
        self == Answer::Yes
    }
}

/// Prompt front-end, bound to a terminal or degraded to defaults.
pub struct Prompt {
    interactive: bool,
}

impl Prompt {
    /// Detect whether a terminal is attached.
    pub fn detect() -> Self {
        Self {
            interactive: io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Ask a yes/no question. `default` is taken on an empty reply; `None`
    /// forces the user to answer. Loops until a valid reply arrives.
    pub fn ask_yes_no(&self, question: &str, default: Option<Answer>) -> Result<Answer> {
        if !self.interactive {
            // Scripted runs take the conservative route.
            return Ok(default.unwrap_or(Answer::No));
        }

        let hint = match default {
            None => " [y/n] ",
            Some(Answer::Yes) => " [Y/n] ",
            Some(Answer::No) => " [y/N] ",
        };

        let mut stdout = io::stdout();
        loop {
            write!(stdout, "{question}{hint}")?;
            stdout.flush()?;

            let mut input = String::new();
            io::stdin().lock().read_line(&mut input)?;

            match parse_answer(&input, default) {
                Some(answer) => return Ok(answer),
                None => {
                    writeln!(stdout, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?;
                }
            }
        }
    }

    /// Ask for the install directory; an empty reply selects `default`.
    pub fn ask_install_dir(&self, product: &str, default: &Path) -> Result<PathBuf> {
        if !self.interactive {
            return Ok(default.to_path_buf());
        }

        let mut stdout = io::stdout();
        write!(
            stdout,
            "Enter directory in which to install {product}. Leave blank and\n\
             press 'Enter' to use the default [{}].\n\
             Install directory: ",
            default.display()
        )?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        let input = input.trim();
        if input.is_empty() {
            Ok(default.to_path_buf())
        } else {
            Ok(expand_user(input))
        }
    }
}

/// Parse one reply line. Returns `None` for input that needs re-asking.
fn parse_answer(input: &str, default: Option<Answer>) -> Option<Answer> {
    match input.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "ye" | "yes" => Some(Answer::Yes),
        "n" | "no" => Some(Answer::No),
        _ => None,
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_user(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                return home;
            }
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_accepts_short_forms() {
        assert_eq!(parse_answer("y\n", None), Some(Answer::Yes));
        assert_eq!(parse_answer("ye\n", None), Some(Answer::Yes));
        assert_eq!(parse_answer("YES\n", None), Some(Answer::Yes));
        assert_eq!(parse_answer("n\n", None), Some(Answer::No));
        assert_eq!(parse_answer("No\n", None), Some(Answer::No));
    }

    #[test]
    fn test_parse_answer_empty_takes_default() {
        assert_eq!(parse_answer("\n", Some(Answer::No)), Some(Answer::No));
        assert_eq!(parse_answer("  \n", Some(Answer::Yes)), Some(Answer::Yes));
        assert_eq!(parse_answer("\n", None), None);
    }

    #[test]
    fn test_parse_answer_garbage_reasks() {
        assert_eq!(parse_answer("maybe\n", Some(Answer::Yes)), None);
        assert_eq!(parse_answer("yep\n", None), None);
    }

    #[test]
    fn test_non_interactive_takes_defaults() {
        let prompt = Prompt::non_interactive();
        assert_eq!(
            prompt.ask_yes_no("Proceed?", Some(Answer::Yes)).unwrap(),
            Answer::Yes
        );
        // No default degrades to the conservative answer.
        assert_eq!(prompt.ask_yes_no("Proceed?", None).unwrap(), Answer::No);
        assert_eq!(
            prompt
                .ask_install_dir("Python Runtime", Path::new("/opt/pyrt"))
                .unwrap(),
            PathBuf::from("/opt/pyrt")
        );
    }

    #[test]
    fn test_expand_user_passthrough_without_tilde() {
        assert_eq!(expand_user("/opt/pyrt"), PathBuf::from("/opt/pyrt"));
    }

    #[test]
    fn test_expand_user_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_user("~"), home);
            assert_eq!(expand_user("~/runtime"), home.join("runtime"));
        }
    }
}
