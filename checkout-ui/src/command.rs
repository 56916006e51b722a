//! Line commands understood by the terminal driver.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line: redraw.
    Refresh,
    /// `<id>`: select a product.
    Select(i64),
    /// `field=value`: type into a field, then leave it.
    Edit { field: String, value: String },
    Next,
    Back,
    Confirm,
    /// "Start New Purchase" on the success view.
    StartOver,
    /// `step N`: click the indicator of the one-based step `N`.
    Step(u8),
    /// `go PATH`: open a route directly.
    Go(String),
    /// `log FILTER`: change the log filter, e.g. `log debug`.
    Log(String),
    Help,
    Quit,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Select(_) => "select",
            Self::Edit { .. } => "edit",
            Self::Next => "next",
            Self::Back => "back",
            Self::Confirm => "confirm",
            Self::StartOver => "start",
            Self::Step(_) => "step",
            Self::Go(_) => "go",
            Self::Log(_) => "log",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'; type 'help' for a list")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a step number")]
    InvalidStep(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);

        // Filter directives may contain '=' themselves.
        if let Some(("log" | "LOG" | "Log", rest)) =
            line.trim_start().split_once(char::is_whitespace)
        {
            let rest = rest.trim();
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("log"));
            }
            return Ok(Self::Log(rest.to_string()));
        }

        // Field values keep their spacing; rules decide what to trim.
        if let Some((field, value)) = line.split_once('=') {
            return Ok(Self::Edit {
                field: field.trim().to_string(),
                value: value.to_string(),
            });
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Refresh);
        }
        if let Ok(id) = line.parse::<i64>() {
            return Ok(Self::Select(id));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "next" | "n" | "continue" => Ok(Self::Next),
            "back" | "b" => Ok(Self::Back),
            "confirm" | "c" => Ok(Self::Confirm),
            "start" | "new" => Ok(Self::StartOver),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "step" | "s" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("step"));
                }
                rest.parse()
                    .map(Self::Step)
                    .map_err(|_| CommandError::InvalidStep(rest.to_string()))
            }
            "log" => Err(CommandError::MissingArgument("log")),
            "go" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("go"));
                }
                Ok(Self::Go(rest.to_string()))
            }
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  <id>          select the product with that id
  field=value   set a form field (by key or label) and validate it
  next          continue / submit the current step
  back          go to the previous step
  confirm       confirm the purchase
  start         start a new purchase after a successful one
  step N        jump to step N (1-4) if it has been reached
  go PATH       open a route, e.g. go /checkout/payment
  log FILTER    change the log filter, e.g. log debug
  help          show this list
  quit          exit";

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn bare_numbers_select_products() {
        assert_eq!(parse("2"), Ok(Command::Select(2)));
        assert_eq!(parse("  1  "), Ok(Command::Select(1)));
    }

    #[test]
    fn edits_keep_the_value_verbatim() {
        assert_eq!(
            parse("name=  John Doe"),
            Ok(Command::Edit {
                field: "name".to_string(),
                value: "  John Doe".to_string(),
            })
        );
        assert_eq!(
            parse("Street Address = 1=2 Rd\n"),
            Ok(Command::Edit {
                field: "Street Address".to_string(),
                value: " 1=2 Rd".to_string(),
            })
        );
    }

    #[test]
    fn words_and_aliases() {
        assert_eq!(parse("NEXT"), Ok(Command::Next));
        assert_eq!(parse("b"), Ok(Command::Back));
        assert_eq!(parse("confirm"), Ok(Command::Confirm));
        assert_eq!(parse("q"), Ok(Command::Quit));
        assert_eq!(parse(""), Ok(Command::Refresh));
    }

    #[test]
    fn step_and_go_take_arguments() {
        assert_eq!(parse("step 3"), Ok(Command::Step(3)));
        assert_eq!(
            parse("go /checkout/order"),
            Ok(Command::Go("/checkout/order".to_string()))
        );
        assert_eq!(parse("step"), Err(CommandError::MissingArgument("step")));
        assert_eq!(
            parse("step two"),
            Err(CommandError::InvalidStep("two".to_string()))
        );
    }

    #[test]
    fn log_takes_the_whole_filter() {
        assert_eq!(parse("log debug"), Ok(Command::Log("debug".to_string())));
        assert_eq!(
            parse("LOG info,checkout_core=trace"),
            Ok(Command::Log("info,checkout_core=trace".to_string()))
        );
        assert_eq!(parse("log"), Err(CommandError::MissingArgument("log")));
        assert_eq!(parse("log   "), Err(CommandError::MissingArgument("log")));
    }

    #[test]
    fn unknown_words_are_errors() {
        assert_eq!(
            parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
