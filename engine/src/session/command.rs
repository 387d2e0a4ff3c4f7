//! Command parsing
//!
//! All control is in-band: a line starting with `/` and a recognized
//! keyword is a command, `exit`/`quit` end the session, and everything
//! else is a chat turn. Classification is pure; argument validation and
//! every side effect belong to the handlers.

/// One classified line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help` — reprint the command reference
    Help,

    /// `/stats` — session and store status
    Stats,

    /// `/search <query>` — show facts relevant to a query
    Search(String),

    /// `/add <text>` — manually store a fact candidate
    AddFact(String),

    /// `/clear` — delete every stored fact, after confirmation
    ClearAll,

    /// `/export` — snapshot all facts to a file
    Export,

    /// `/import <file>` — re-add facts from an exported snapshot
    Import(String),

    /// `/memories` — list all facts and assign aliases
    ListMemories,

    /// `/forget <alias>` — delete the fact behind a listed alias
    Forget(String),

    /// `exit` / `quit` — end the session
    Exit,

    /// A slash line whose keyword is not recognized.
    ///
    /// Reported as an error rather than forwarded to the completion
    /// service; a mistyped command is not a chat turn.
    Unknown(String),

    /// Plain conversation input
    Chat(String),
}

impl Command {
    /// Classify one trimmed, non-empty line of input.
    pub fn parse(line: &str) -> Command {
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Command::Exit;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Command::Chat(line.to_string());
        };

        let (keyword, argument) = match rest.split_once(char::is_whitespace) {
            Some((keyword, argument)) => (keyword, argument.trim()),
            None => (rest, ""),
        };

        match keyword {
            "help" => Command::Help,
            "stats" => Command::Stats,
            "search" => Command::Search(argument.to_string()),
            "add" => Command::AddFact(argument.to_string()),
            "clear" => Command::ClearAll,
            "export" => Command::Export,
            "import" => Command::Import(argument.to_string()),
            "memories" => Command::ListMemories,
            "forget" => Command::Forget(argument.to_string()),
            _ => Command::Unknown(keyword.to_string()),
        }
    }
}
