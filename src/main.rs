use agrobot::config::{load_config, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use agrobot::image::ImageAttachment;
use agrobot::llm::{create_default_registry, AgroResponder, GeminiClient};
use agrobot::locale;
use agrobot::session::{ChatSession, TurnOutcome};
use agrobot::speech::{
    ListeningState, ReplayBackend, SpeechCapability, SpeechRecognizer, SpeechUpdate,
};
use agrobot::types::{ChatMessage, Language};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Conversation language (en or kn)
    #[arg(long, default_value = "en")]
    lang: Language,

    /// Gemini model name
    #[arg(long, env = "AGROBOT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Override the Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// JSON-lines recognizer script used as the voice input
    #[arg(long)]
    speech_replay: Option<PathBuf>,

    /// Skip the welcome screen
    #[arg(long)]
    start: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Start,
    Language(Option<Language>),
    Faq(usize),
    Menu(usize),
    Image(PathBuf, String),
    Mic,
    Help,
    Quit,
    Say(String),
    Unknown(String),
}

fn parse_command(line: &str, speech: SpeechCapability) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Say(line.to_string());
    };
    let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    let arg = arg.trim();

    match name {
        "start" => Command::Start,
        "lang" if arg.is_empty() => Command::Language(None),
        "lang" => match arg.parse() {
            Ok(lang) => Command::Language(Some(lang)),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "faq" => parse_index(arg).map_or(Command::Unknown(line.to_string()), Command::Faq),
        "menu" => parse_index(arg).map_or(Command::Unknown(line.to_string()), Command::Menu),
        "image" if !arg.is_empty() => {
            let (path, text) = arg.split_once(' ').unwrap_or((arg, ""));
            Command::Image(PathBuf::from(path), text.trim().to_string())
        }
        "mic" if speech == SpeechCapability::Supported => Command::Mic,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

#[derive(Debug, PartialEq)]
enum MicAction {
    Start,
    Stop,
    StillStarting,
}

/// `/mic` toggles; before the recognizer reports `Start` there is nothing to stop yet
fn mic_action(state: ListeningState) -> MicAction {
    match state {
        ListeningState::Idle => MicAction::Start,
        ListeningState::Starting => MicAction::StillStarting,
        ListeningState::Listening | ListeningState::Stopping => MicAction::Stop,
    }
}

/// Options are shown 1-based
fn parse_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok()?.checked_sub(1)
}

fn print_help(speech: SpeechCapability) {
    println!("Commands:");
    println!("  <text>                 ask AgroBot");
    println!("  /start                 start the chat");
    println!("  /lang [en|kn]          switch language (toggles without an argument)");
    println!("  /faq <n>               ask a welcome-screen question");
    println!("  /menu <n>              pick a starter menu option");
    println!("  /image <path> [text]   attach a crop or unit photo");
    if speech == SpeechCapability::Supported {
        println!("  /mic                   start or stop voice input");
    }
    println!("  /help                  show this list");
    println!("  /quit                  exit");
}

fn print_welcome(lang: Language) {
    let welcome = locale::welcome(lang);
    println!("\n{}", welcome.title);
    for line in welcome.info {
        println!("{}", line);
    }
    for (i, link) in welcome.faq_links.iter().enumerate() {
        println!("  /faq {}  {} {}", i + 1, link.icon, link.text);
    }
    println!(
        "\n{} (/start)   {} (/lang)",
        welcome.button,
        lang.toggled().native_name()
    );
}

fn print_message(message: &ChatMessage) {
    let speaker = if message.is_bot() {
        "🤖 AgroBot"
    } else {
        "🧑 You"
    };
    match &message.image {
        Some(image) => println!("{}: [🖼️ {}] {}", speaker, image.file_name, message.text),
        None => println!("{}: {}", speaker, message.text),
    }
}

fn print_menu(lang: Language) {
    for (i, option) in locale::menu_options(lang).iter().enumerate() {
        println!("  /menu {}  {} {}", i + 1, option.icon, option.text);
    }
    println!("{}", locale::call_to_action(lang));
}

/// Print the whole conversation after a reset
async fn render_conversation(session: &ChatSession) {
    let conversation = session.lock().await;
    println!();
    for message in conversation.messages() {
        print_message(message);
    }
    if conversation.show_menu() {
        print_menu(conversation.language());
    }
}

async fn send(session: &ChatSession, text: &str, image: Option<ImageAttachment>) {
    {
        let mut conversation = session.lock().await;
        if !conversation.has_started() {
            conversation.start();
            drop(conversation);
            render_conversation(session).await;
        }
    }

    println!("⏳ AgroBot is thinking...");
    match session.send_message(text, image).await {
        Ok(TurnOutcome::Delivered(reply)) => print_message(&reply),
        Ok(TurnOutcome::Discarded) => log::info!("Reply arrived after a reset; dropped"),
        Err(e) => println!("⚠️  {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("🚀 Initializing AgroBot");

    let mut api_config = load_config()
        .model(args.model.clone())
        .timeout(Duration::from_secs(args.timeout_secs));
    if let Some(base_url) = &args.base_url {
        api_config = api_config.base_url(base_url.clone());
    }

    let client = GeminiClient::new(api_config).context("Failed to create Gemini client")?;
    log::info!("🤖 Gemini client ready ({})", client.model());

    let responder = AgroResponder::new(Arc::new(client), create_default_registry());
    let session = ChatSession::new(responder, args.lang);

    let mut recognizer = match &args.speech_replay {
        Some(path) => {
            let (backend, events) = ReplayBackend::open(path)
                .with_context(|| format!("Failed to load speech script {}", path.display()))?;
            SpeechRecognizer::new(Box::new(backend), events)
        }
        None => {
            log::warn!("Speech recognition not supported on this host");
            SpeechRecognizer::unsupported()
        }
    };
    let speech = recognizer.capability();

    if args.start {
        session.start().await;
        render_conversation(&session).await;
    } else {
        print_welcome(args.lang);
    }
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.context("Failed to read stdin")?;
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }

                match parse_command(&line, speech) {
                    Command::Start => {
                        session.start().await;
                        render_conversation(&session).await;
                    }
                    Command::Language(target) => {
                        let (started, lang) = {
                            let mut conversation = session.lock().await;
                            match target {
                                Some(lang) => conversation.set_language(lang),
                                None => conversation.toggle_language(),
                            }
                            (conversation.has_started(), conversation.language())
                        };
                        if started {
                            render_conversation(&session).await;
                        } else {
                            print_welcome(lang);
                        }
                    }
                    Command::Faq(index) => {
                        let was_started = session.lock().await.has_started();
                        match session.send_faq(index).await {
                            Ok(TurnOutcome::Delivered(_)) if !was_started => {
                                render_conversation(&session).await;
                            }
                            Ok(TurnOutcome::Delivered(reply)) => {
                                if let Some(question) = session.lock().await.messages().iter().rev().nth(1) {
                                    print_message(question);
                                }
                                print_message(&reply);
                            }
                            Ok(TurnOutcome::Discarded) => {}
                            Err(e) => println!("⚠️  {}", e),
                        }
                    }
                    Command::Menu(index) => match session.choose_menu_option(index).await {
                        Ok(TurnOutcome::Delivered(reply)) => print_message(&reply),
                        Ok(TurnOutcome::Discarded) => {}
                        Err(e) => println!("⚠️  {}", e),
                    },
                    Command::Image(path, text) => {
                        send(&session, &text, Some(ImageAttachment::new(path))).await;
                    }
                    Command::Mic => {
                        let result = match mic_action(recognizer.state()) {
                            MicAction::Start => {
                                let lang = session.lock().await.language();
                                recognizer.start(lang)
                            }
                            MicAction::Stop => recognizer.stop(),
                            MicAction::StillStarting => {
                                println!("🎤 Microphone is still starting, try /mic again in a moment");
                                Ok(())
                            }
                        };
                        if let Err(e) = result {
                            log::error!("Speech recognition failed: {}", e);
                            println!("⚠️  {}", e);
                        }
                    }
                    Command::Help => print_help(speech),
                    Command::Quit => break,
                    Command::Say(text) => send(&session, &text, None).await,
                    Command::Unknown(line) => {
                        println!("Unknown command: {} (try /help)", line);
                    }
                }
            }

            update = recognizer.next_update(), if recognizer.is_active() => {
                match update {
                    SpeechUpdate::Started => println!("🎤 Listening... (/mic to stop)"),
                    SpeechUpdate::Transcript(text) => println!("🎤 {}", text),
                    SpeechUpdate::Ended(_) => {
                        let transcript = recognizer.take_transcript();
                        if !transcript.trim().is_empty() {
                            send(&session, &transcript, None).await;
                        }
                    }
                    SpeechUpdate::Failed(message) => println!("⚠️  Voice input stopped: {}", message),
                    SpeechUpdate::Ignored => {}
                }
            }

            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    println!("\n👋 Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mic_while_starting_is_not_a_silent_stop() {
        assert_eq!(mic_action(ListeningState::Starting), MicAction::StillStarting);
        assert_eq!(mic_action(ListeningState::Idle), MicAction::Start);
        assert_eq!(mic_action(ListeningState::Listening), MicAction::Stop);
        assert_eq!(mic_action(ListeningState::Stopping), MicAction::Stop);
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("/mic", SpeechCapability::Supported),
            Command::Mic
        );
        assert!(matches!(
            parse_command("/mic", SpeechCapability::Unsupported),
            Command::Unknown(_)
        ));
        assert_eq!(
            parse_command("  hello  ", SpeechCapability::Supported),
            Command::Say("hello".to_string())
        );
        assert_eq!(parse_index("1"), Some(0));
        assert_eq!(parse_index("0"), None);
    }
}
