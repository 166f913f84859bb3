//! REPL session management

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::format_parameters;
use crate::image::ImageGenerator;
use crate::llm::LlmClient;
use crate::session::{SessionError, SessionManager};

/// Parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Prompt,
    Narrate,
    Image,
    Params,
    New,
    Help,
    Quit,
    Unknown(String),
}

impl SlashCommand {
    pub fn parse(input: &str) -> Self {
        let cmd = input.split_whitespace().next().unwrap_or("");
        match cmd {
            "/prompt" | "/p" => SlashCommand::Prompt,
            "/narrate" => SlashCommand::Narrate,
            "/image" | "/i" => SlashCommand::Image,
            "/params" => SlashCommand::Params,
            "/new" | "/n" => SlashCommand::New,
            "/help" | "/h" => SlashCommand::Help,
            "/quit" | "/q" | "/exit" => SlashCommand::Quit,
            other => SlashCommand::Unknown(other.to_string()),
        }
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

/// Interactive planet design session
///
/// The first line describes a planet; every later line adds a feature to it.
pub struct ChatSession {
    manager: SessionManager,
    llm: Option<Arc<dyn LlmClient>>,
    images: Option<Arc<dyn ImageGenerator>>,
    session_id: String,
}

impl ChatSession {
    pub async fn new(
        manager: SessionManager,
        llm: Option<Arc<dyn LlmClient>>,
        images: Option<Arc<dyn ImageGenerator>>,
    ) -> Result<Self> {
        let session_id = manager.create_session().await?;
        Ok(Self {
            manager,
            llm,
            images,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            match rl.readline(&format!("{} ", ">".bright_green())) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await? {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await?;
                    }
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

        self.manager.remove_session(&self.session_id).await?;
        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Planet Generator".bright_cyan().bold());
        println!("Describe a planet to begin, then keep adding features to it.");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show the image prompt", "/prompt".yellow());
        println!("  {:14} Have the model write the image prompt", "/narrate".yellow());
        println!("  {:14} Generate an image from the prompt", "/image".yellow());
        println!("  {:14} Show the planet's parameters", "/params".yellow());
        println!("  {:14} Start over with a new planet", "/new".yellow());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit the REPL", "/quit".yellow());
        println!();
    }

    async fn handle_slash_command(&mut self, input: &str) -> Result<SlashResult> {
        match SlashCommand::parse(input) {
            SlashCommand::Help => self.print_help(),
            SlashCommand::Quit => return Ok(SlashResult::Quit),
            SlashCommand::Prompt => {
                let result = self.manager.finalize(&self.session_id).await;
                if let Some(prompt) = report(result)? {
                    println!("{}", prompt);
                }
            }
            SlashCommand::Narrate => match &self.llm {
                Some(llm) => {
                    let result = self.manager.narrate(&self.session_id, llm.as_ref()).await;
                    if let Some(prompt) = report(result)? {
                        println!("{}", prompt);
                    }
                }
                None => println!("{}", "Narration needs a language model.".yellow()),
            },
            SlashCommand::Image => self.generate_image().await?,
            SlashCommand::Params => match self.manager.parameters(&self.session_id).await? {
                Some(params) => println!("{}", format_parameters(&params)),
                None => println!("{}", "No planet yet. Describe one first.".dimmed()),
            },
            SlashCommand::New => {
                self.manager.remove_session(&self.session_id).await?;
                self.session_id = self.manager.create_session().await?;
                println!("{}", "Started over. Describe a new planet.".dimmed());
            }
            SlashCommand::Unknown(cmd) => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        Ok(SlashResult::Continue)
    }

    /// Start the planet on first input, add features afterwards
    async fn process_user_input(&mut self, input: &str) -> Result<()> {
        let active = self.manager.parameters(&self.session_id).await?.is_some();
        if active {
            if report(self.manager.continue_session(&self.session_id, input).await)?.is_some() {
                println!("{} {}", "Added:".bright_green(), input);
            }
        } else {
            println!("{}", "Classifying...".dimmed());
            if let Some(params) = report(self.manager.start(&self.session_id, input).await)? {
                println!("{}", format_parameters(&params));
            }
        }
        Ok(())
    }

    async fn generate_image(&self) -> Result<()> {
        let Some(images) = &self.images else {
            println!("{}", "Image generation is not configured.".yellow());
            return Ok(());
        };
        let Some(prompt) = report(self.manager.finalize(&self.session_id).await)? else {
            return Ok(());
        };

        println!("{}", "Generating image...".dimmed());
        match images.generate(&prompt).await {
            Ok(image) => {
                self.manager.record_image(&self.session_id, &prompt, &image);
                println!("{} {}", "Image:".bright_green(), image.url);
            }
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
        Ok(())
    }
}

/// Print conversation errors and keep going; channel failures end the REPL
fn report<T>(result: Result<T, SessionError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SessionError::ChannelError) => Err(eyre::eyre!("session manager stopped")),
        Err(e) => {
            println!("{} {}", "Error:".red(), e);
            Ok(None)
        }
    }
}
