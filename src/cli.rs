use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::Result;

use crate::config::Config;
use crate::generate::ActivityClient;
use crate::session::{ActivitySession, StateManager};
use crate::state::{Mood, PartnerDetails, Slot, LOVE_LANGUAGES};
use crate::store::StateStore;

fn open_session(data_dir: Option<PathBuf>) -> Result<(Config, ActivitySession)> {
    let config = Config::new(data_dir)?;
    let store = StateStore::new(config.state_file())?;
    Ok((config, ActivitySession::new(StateManager::new(store))))
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_required(label: &str) -> Result<String> {
    loop {
        let value = prompt_line(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("This one is required.");
    }
}

fn prompt_love_language() -> Result<String> {
    println!("Love language:");
    for (i, option) in LOVE_LANGUAGES.iter().enumerate() {
        println!("  [{}] {}", i + 1, option);
    }
    let choice = prompt_line("Pick a number (or leave empty)")?;
    Ok(choice
        .parse::<usize>()
        .ok()
        .and_then(|n| LOVE_LANGUAGES.get(n.wrapping_sub(1)))
        .map(|s| s.to_string())
        .unwrap_or_default())
}

fn prompt_partner(label: &str) -> Result<PartnerDetails> {
    println!("\n{}", label);
    let name = prompt_required("Name")?;
    let personality = prompt_line("Personality (e.g. Introverted, thoughtful)")?;
    let love_language = prompt_love_language()?;
    let interests = prompt_line("Interests (e.g. Cooking, Hiking, Sci-fi)")?;

    Ok(PartnerDetails {
        name,
        personality,
        love_language,
        interests,
    })
}

pub async fn handle_setup(data_dir: Option<PathBuf>) -> Result<()> {
    let (_config, mut session) = open_session(data_dir)?;

    println!("💞 Welcome to Duet");
    println!("Tell us a bit about you both so we can create meaningful moments.");

    for (slot, label) in [(Slot::A, "Partner A"), (Slot::B, "Partner B")] {
        let details = prompt_partner(label)?;
        session.manager_mut().set_partner(slot, details)?;
    }

    println!("\n✨ You're all set. Run `duet today` for today's activity.");
    Ok(())
}

pub async fn handle_mood(slot: String, mood: String, data_dir: Option<PathBuf>) -> Result<()> {
    let slot: Slot = slot.parse()?;
    let mood: Mood = mood.parse()?;

    let (_config, mut session) = open_session(data_dir)?;
    let signal = session.manager_mut().set_mood(slot, mood)?;

    let name = match session.manager().state().partner(slot).name.as_str() {
        "" => format!("Partner {}", slot),
        name => name.to_string(),
    };
    println!(
        "😊 {}'s mood is now {} (checked in {})",
        name,
        signal.mood,
        signal.timestamp.format("%H:%M UTC")
    );
    Ok(())
}

pub async fn handle_today(model: Option<String>, data_dir: Option<PathBuf>) -> Result<()> {
    let (config, mut session) = open_session(data_dir)?;

    if !session.manager().is_setup_complete() {
        println!("Both partner profiles need a name first. Run `duet setup`.");
        return Ok(());
    }

    let request = session.begin()?;
    let client = ActivityClient::new(config.generator(model)?);

    println!("✨ Creating your moment...");
    let outcome = client.generate(&request).await;

    let activity = match session.resolve(outcome) {
        Ok(activity) => activity,
        Err(e) => {
            eprintln!("❌ Something went wrong. Please try again. ({})", e);
            return Ok(());
        }
    };

    println!("\n💞 Today's bonding activity:\n");
    println!("  {}\n", activity);

    println!("How did it go?");
    println!("  [1] Wonderful  [2] Good  [3] Not for us today  [Enter] skip");
    let choice = prompt_line("Your pick")?;

    // The third button reads "Not for us today" but stores the sentiment
    // string "Maybe tomorrow".
    let feedback = match choice.as_str() {
        "1" => Some("Wonderful"),
        "2" => Some("Good"),
        "3" => Some("Maybe tomorrow"),
        _ => None,
    };

    if let Some(record) = session.complete(feedback)? {
        println!("📘 Saved to your shared history ({}).", record.date);
    }
    Ok(())
}

pub async fn handle_history(data_dir: Option<PathBuf>) -> Result<()> {
    let (_config, session) = open_session(data_dir)?;
    let history = &session.manager().state().history;

    if history.is_empty() {
        println!("Your journey starts here. Run `duet today`.");
        return Ok(());
    }

    println!("📘 Past moments ({}):", history.len());
    for record in history {
        println!("\n  {}", record.date);
        println!("  {}", record.activity);
        if let Some(feedback) = &record.feedback {
            println!("  Feedback: {}", feedback);
        }
        if let Some(moods) = &record.mood_at_time {
            println!("  Moods then: A {}, B {}", moods.a, moods.b);
        }
    }
    Ok(())
}

pub async fn handle_status(data_dir: Option<PathBuf>) -> Result<()> {
    let (_config, session) = open_session(data_dir)?;
    let state = session.manager().state();

    for (slot, details) in [(Slot::A, &state.partner_a), (Slot::B, &state.partner_b)] {
        let name = if details.name.is_empty() {
            "(not set up)"
        } else {
            &details.name
        };
        println!("Partner {}: {}", slot, name);
        if !details.love_language.is_empty() {
            println!("  Love language: {}", details.love_language);
        }
        println!("  Current mood: {}", state.current_moods.get(slot));
    }
    println!("History: {} of 30 moments kept", state.history.len());
    Ok(())
}
