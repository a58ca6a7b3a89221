//! Parsing of interactive input lines.

/// A parsed user command.
///
/// Any line that is not a recognized verb is treated as a place search, so
/// typing a city name just works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Recenter,
    List,
    Save(usize),
    Directions(usize),
    Show(usize),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. `None` for blank lines.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "search" if !rest.is_empty() => Some(Self::Search(rest.to_owned())),
            "recenter" if rest.is_empty() => Some(Self::Recenter),
            "list" if rest.is_empty() => Some(Self::List),
            "help" if rest.is_empty() => Some(Self::Help),
            "quit" | "exit" if rest.is_empty() => Some(Self::Quit),
            "save" | "dir" | "show" => match rest.parse::<usize>() {
                Ok(index) => Some(match verb {
                    "save" => Self::Save(index),
                    "dir" => Self::Directions(index),
                    _ => Self::Show(index),
                }),
                // Malformed index: show usage rather than searching for "save x".
                Err(_) => Some(Self::Help),
            },
            _ => Some(Self::Search(line.to_owned())),
        }
    }
}
