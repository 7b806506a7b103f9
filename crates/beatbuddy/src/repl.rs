//! Interactive chat loop.

use anyhow::Result;
use beatchat::{Conversation, Message, Role};
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Session-level commands, recognised before anything is sent to the model.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Reset,
    History,
    Help,
    Say(&'a str),
    Empty,
}

fn parse(line: &str) -> Command<'_> {
    match line.trim() {
        "" => Command::Empty,
        "/quit" | "/exit" => Command::Quit,
        "/reset" => Command::Reset,
        "/history" => Command::History,
        "/help" => Command::Help,
        text => Command::Say(text),
    }
}

pub async fn run(conversation: Conversation) -> Result<()> {
    println!("{}", "🎵 Beat Buddy".bright_cyan().bold());
    println!("{}", "━".repeat(50).bright_black());
    println!("Tell me what you'd like to hear. /help for commands, /quit to leave.\n");

    let mut rl = DefaultEditor::new()?;
    let mut history: Vec<Message> = Vec::new();

    loop {
        let line = match rl.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        match parse(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Reset => {
                history.clear();
                println!("{}", "Conversation cleared.".bright_black());
            }
            Command::History => print_history(&history),
            Command::Help => print_help(),
            Command::Say(text) => {
                let _ = rl.add_history_entry(text);

                match conversation.send(text, &mut history).await {
                    Ok(reply) => println!("{} {}\n", "buddy>".bright_green().bold(), reply),
                    Err(e) => {
                        eprintln!("{} {}", "✗".bright_red(), e);
                        eprintln!("  {}\n", e.reason().to_string().bright_black());
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("  /history  show the conversation so far");
    println!("  /reset    start a new conversation (the playlist is kept)");
    println!("  /quit     leave");
}

fn print_history(history: &[Message]) {
    if history.is_empty() {
        println!("{}", "(empty)".bright_black());
        return;
    }

    for msg in history {
        let label = match msg.role {
            Role::User => "you".bright_yellow().to_string(),
            Role::Assistant => "buddy".bright_green().to_string(),
            Role::Function => format!("fn:{}", msg.name.as_deref().unwrap_or("?"))
                .bright_blue()
                .to_string(),
            Role::System => "system".bright_black().to_string(),
        };

        if let Some(call) = &msg.function_call {
            println!("{:>8} → {}({})", label, call.name, call.arguments);
        }
        if let Some(content) = msg.content.as_deref().filter(|c| !c.is_empty()) {
            println!("{:>8} {}", label, content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("  "), Command::Empty);
        assert_eq!(parse("/quit"), Command::Quit);
        assert_eq!(parse("/reset\n"), Command::Reset);
        assert_eq!(parse("/history"), Command::History);
        assert_eq!(
            parse("  something upbeat for running "),
            Command::Say("something upbeat for running")
        );
    }
}
