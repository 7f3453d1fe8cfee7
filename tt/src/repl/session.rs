//! Interactive chat + board session
//!
//! The terminal front end. It owns the chat session, the task store, and
//! the visible board, and it is the only place events become output: store
//! and session notifications drain into toast lines after every action.

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use taskboard::{Board, BoardEvent, COLUMNS, Column, Task, TaskStore};

use crate::chat::{ChatEvent, ChatMessage, ChatSession, SendOutcome};
use crate::config::Config;
use crate::llm::CompletionClient;

/// Interactive REPL session
pub struct ReplSession {
    chat: ChatSession,
    store: TaskStore,
    board: Board,
    chat_events: broadcast::Receiver<ChatEvent>,
    board_events: broadcast::Receiver<BoardEvent>,
}

/// What a slash command asks the loop to do next
enum SlashResult {
    Continue,
    Quit,
}

impl ReplSession {
    /// Create a new REPL session
    pub fn new(client: Arc<dyn CompletionClient>, config: &Config) -> Self {
        let chat = ChatSession::new(client, &config.assistant);
        let store = TaskStore::new();
        let chat_events = chat.subscribe_events();
        let board_events = store.subscribe();

        Self {
            chat,
            store,
            board: Board::new(),
            chat_events,
            board_events,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial_message: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(message) = initial_message {
            println!("{} {}", ">".bright_green(), message);
            self.process_input(&message).await;
            self.drain_events();
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => {}
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_input(input).await;
                    }
                    self.drain_events();
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Send free text to the assistant and render the reply
    async fn process_input(&mut self, input: &str) {
        match self.chat.send(input).await {
            SendOutcome::Replied => {
                if let Some(reply) = self.chat.messages().last() {
                    println!("{}", reply.text.bright_cyan());
                    if reply.has_suggestions() {
                        Self::print_suggestions(reply);
                    }
                }
            }
            SendOutcome::Busy => {
                println!("{}", "Still waiting on the previous message.".dimmed());
            }
            // empty input never reaches here; service failures surface as a notice
            SendOutcome::EmptyInput | SendOutcome::ServiceFailed => {}
        }
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "TaskTracker Assistant".bright_cyan().bold());
        println!("Ask me to create tasks, organize your board, or get suggestions.");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/board" | "/b" => {
                self.print_board();
                SlashResult::Continue
            }
            "/add" => {
                self.cmd_add(&parts[1..]);
                SlashResult::Continue
            }
            "/move" | "/mv" => {
                self.cmd_move(&parts[1..]);
                SlashResult::Continue
            }
            "/rm" => {
                self.cmd_remove(&parts[1..]);
                SlashResult::Continue
            }
            "/accept" => {
                self.cmd_accept();
                SlashResult::Continue
            }
            "/reject" => {
                self.cmd_reject();
                SlashResult::Continue
            }
            "/history" => {
                self.print_history();
                SlashResult::Continue
            }
            _ => {
                println!("Unknown command: {}. Type /help for commands.", cmd.yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!("{}", "Commands:".bold());
        println!("  {}              Show the board", "/board".yellow());
        println!("  {} <title>       Add a task to Not Started", "/add".yellow());
        println!("  {} <id> <column> Move a task (not-started, in-progress, done)", "/move".yellow());
        println!("  {} <id>           Remove a task", "/rm".yellow());
        println!("  {}            Accept the latest task suggestions", "/accept".yellow());
        println!("  {}            Dismiss the latest task suggestions", "/reject".yellow());
        println!("  {}           Show the conversation", "/history".yellow());
        println!("  {}              Exit", "/quit".yellow());
        println!("Anything else is sent to the assistant.");
    }

    /// Render the visible board, column by column
    fn print_board(&mut self) {
        self.board.replace(self.store.list(None));

        for column in COLUMNS {
            let tasks = self.board.column_tasks(column);
            println!("{} ({})", column.title().bold(), tasks.len());
            for task in tasks {
                let id_prefix: String = task.id.chars().take(6).collect();
                let mut line = format!("  [{}] {} ({})", id_prefix.dimmed(), task.title, task.priority);
                if let Some(field) = &task.field {
                    line.push_str(&format!(" #{}", field));
                }
                println!("{}", line);
            }
        }
    }

    fn cmd_add(&mut self, args: &[&str]) {
        if args.is_empty() {
            println!("Usage: /add <title>");
            return;
        }
        let title = args.join(" ");
        let task = Task::new(title);
        // ids are freshly generated, a duplicate here means a bug upstream
        if let Err(e) = self.store.add(task) {
            println!("{}", format!("Could not add task: {}", e).red());
        }
    }

    fn cmd_move(&mut self, args: &[&str]) {
        let (reference, column) = match args {
            [reference, column] => (*reference, *column),
            _ => {
                println!("Usage: /move <id> <column>");
                return;
            }
        };
        let column: Column = match column.parse() {
            Ok(column) => column,
            Err(e) => {
                println!("{}", e.red());
                return;
            }
        };
        let Some(id) = self.resolve_task_id(reference) else {
            return;
        };
        if let Err(e) = self.store.move_column(&id, column) {
            println!("{}", format!("{}", e).red());
        }
    }

    fn cmd_remove(&mut self, args: &[&str]) {
        let [reference] = args else {
            println!("Usage: /rm <id>");
            return;
        };
        let Some(id) = self.resolve_task_id(reference) else {
            return;
        };
        if let Err(e) = self.store.remove(&id) {
            println!("{}", format!("{}", e).red());
        }
    }

    /// Accept every suggestion on the most recent suggesting message
    fn cmd_accept(&mut self) {
        let Some(message) = self.chat.latest_suggestion_message() else {
            println!("{}", "No pending task suggestions.".dimmed());
            return;
        };
        let message_id = message.id.clone();
        let tasks = message.task_suggestions.clone().unwrap_or_default();

        for task in tasks {
            if let Err(e) = self.chat.accept_suggestion(&mut self.store, &message_id, task) {
                println!("{}", format!("{}", e).red());
            }
        }
        if let Some(confirmation) = self.chat.messages().last() {
            println!("{}", confirmation.text.bright_cyan());
        }
    }

    /// Dismiss the suggestions on the most recent suggesting message
    fn cmd_reject(&mut self) {
        let Some(message) = self.chat.latest_suggestion_message() else {
            println!("{}", "No pending task suggestions.".dimmed());
            return;
        };
        let message_id = message.id.clone();

        if let Err(e) = self.chat.reject_suggestion(&message_id) {
            println!("{}", format!("{}", e).red());
        } else if let Some(ack) = self.chat.messages().last() {
            println!("{}", ack.text.bright_cyan());
        }
    }

    fn print_history(&self) {
        for message in self.chat.messages() {
            if message.is_typing {
                continue;
            }
            let prefix = match message.sender {
                crate::llm::Sender::User => "you".bright_green(),
                crate::llm::Sender::Bot => "bot".bright_cyan(),
            };
            println!("{} [{}] {}", prefix, message.timestamp.format("%H:%M"), message.text);
        }
    }

    /// Resolve a task reference: exact id, id prefix, or slug fragment
    fn resolve_task_id(&self, reference: &str) -> Option<String> {
        let matches: Vec<&Task> = self
            .store
            .tasks()
            .iter()
            .filter(|t| t.id == reference || t.id.starts_with(reference) || t.id.contains(reference))
            .collect();

        match matches.len() {
            0 => {
                println!("{}", format!("No task matches '{}'", reference).red());
                None
            }
            1 => Some(matches[0].id.clone()),
            _ => {
                println!("'{}' is ambiguous:", reference);
                for task in matches {
                    println!("  {} - {}", task.id, task.title);
                }
                None
            }
        }
    }

    /// Print a suggestion card for an assistant message
    fn print_suggestions(message: &ChatMessage) {
        let Some(suggestions) = &message.task_suggestions else {
            return;
        };
        for task in suggestions {
            println!();
            println!("  {} {}", "suggested task:".bold(), task.title);
            if let Some(field) = &task.field {
                println!("  field:    {}", field);
            }
            println!("  priority: {}", task.priority);
            if let Some(deadline) = task.deadline {
                println!("  due:      {}", deadline.format("%b %-d"));
            }
            println!(
                "  {} to add it, {} to dismiss",
                "/accept".yellow(),
                "/reject".yellow()
            );
        }
    }

    /// Drain pending events into toast lines and board merges
    ///
    /// Accepted tasks arrive twice - once as a store TaskAdded and once as a
    /// session TaskAccepted - and the board merge dedups by id.
    fn drain_events(&mut self) {
        loop {
            match self.board_events.try_recv() {
                Ok(BoardEvent::TaskAdded { task }) => {
                    self.board.merge(std::slice::from_ref(&task));
                    println!("{}", format!("\"{}\" added to {}", task.title, task.column.title()).dimmed());
                }
                Ok(BoardEvent::TaskUpdated { task }) => {
                    self.board.replace(self.store.list(None));
                    println!(
                        "{}",
                        format!("\"{}\" moved to {}", task.title, task.column.to_string().replace('-', " ")).dimmed()
                    );
                }
                Ok(BoardEvent::TaskRemoved { task }) => {
                    self.board.replace(self.store.list(None));
                    println!("{}", format!("\"{}\" removed", task.title).dimmed());
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }

        loop {
            match self.chat_events.try_recv() {
                Ok(ChatEvent::TaskAccepted { task }) => {
                    self.board.merge(std::slice::from_ref(&task));
                }
                Ok(ChatEvent::Notice { message }) => {
                    println!("{}", message.yellow());
                }
                Ok(ChatEvent::SuggestionsRejected { .. }) => {}
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
    }
}
