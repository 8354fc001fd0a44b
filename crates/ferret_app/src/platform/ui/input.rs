/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Follow link `number`; search items take the rest of the line as query.
    Follow { number: usize, query: Option<String> },
    Go(String),
    Back,
    Forward,
    Up,
    Reload,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str =
    "<n> follow link, <n> <words> search, g <url> go, b back, f forward, u up, r reload, q quit";

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    match line {
        "q" | "quit" => return Command::Quit,
        "b" | "back" => return Command::Back,
        "f" | "forward" => return Command::Forward,
        "u" | "up" => return Command::Up,
        "r" | "reload" => return Command::Reload,
        "h" | "help" | "?" => return Command::Help,
        _ => {}
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    if matches!(head, "g" | "go") && !rest.is_empty() {
        return Command::Go(rest.to_string());
    }
    if let Ok(number) = head.parse::<usize>() {
        let query = (!rest.is_empty()).then(|| rest.to_string());
        return Command::Follow { number, query };
    }
    if line.contains("://") || line.contains('.') {
        return Command::Go(line.to_string());
    }
    Command::Help
}
