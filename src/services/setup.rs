use crate::core::podcast::{GenerationRequest, PodcastStyle, MAX_SPEAKERS};
use crate::core::presets::{
    default_personalities, suggest_context, template_label, DEFAULT_DURATION, DURATIONS,
    EXPERT_PERSONALITIES, HOST_TEMPLATES, TOPIC_CATEGORIES,
};
use crate::services::auth::{validate_registration, AuthClient, AuthError, SignUpOutcome, UserProfile};
use anyhow::Result;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use log::warn;

const CUSTOM_TOPIC: &str = "Custom topic...";
const CUSTOM_PERSONALITY: &str = "Custom personality...";
const DONE: &str = "Done";
const MAX_LOGIN_ATTEMPTS: usize = 5;

/// Walks the user through the episode form.
pub fn prompt_request() -> Result<GenerationRequest> {
    let topic = prompt_topic()?;

    let context = Text::new("Context:")
        .with_default(&suggest_context(&topic))
        .with_help_message("What should the conversation cover? Enter keeps the suggestion.")
        .prompt()?;

    let personalities = prompt_personalities()?;

    let start = DURATIONS
        .iter()
        .position(|d| *d == DEFAULT_DURATION)
        .unwrap_or(0);
    let duration = Select::new("Duration (minutes):", DURATIONS.to_vec())
        .with_starting_cursor(start)
        .prompt()?;

    let style = Select::new("Podcast style:", style_options())
        .prompt()?;

    let request = GenerationRequest::new(&topic, &context, personalities, duration, style_name(&style))?;
    Ok(request)
}

fn prompt_topic() -> Result<String> {
    let mut categories: Vec<&str> = TOPIC_CATEGORIES.iter().map(|c| c.name).collect();
    categories.push(CUSTOM_TOPIC);
    let category = Select::new("Topic category:", categories).prompt()?;

    let topics = TOPIC_CATEGORIES
        .iter()
        .find(|c| c.name == category)
        .map(|c| c.topics.to_vec());
    match topics {
        Some(mut topics) => {
            topics.push(CUSTOM_TOPIC);
            match Select::new("Topic:", topics).prompt()? {
                CUSTOM_TOPIC => prompt_custom_topic(),
                topic => Ok(topic.to_string()),
            }
        }
        None => prompt_custom_topic(),
    }
}

fn prompt_custom_topic() -> Result<String> {
    Ok(Text::new("Topic:").prompt()?)
}

fn prompt_personalities() -> Result<Vec<String>> {
    let defaults = default_personalities();
    let keep_defaults = Confirm::new(&format!(
        "Use the default speakers ({} and a subject matter expert)?",
        template_label(&defaults[0])
    ))
    .with_default(true)
    .prompt()?;
    if keep_defaults {
        return Ok(defaults);
    }

    let mut personalities = Vec::new();
    while personalities.len() < MAX_SPEAKERS {
        let prompt = format!("Speaker {} of up to {}:", personalities.len() + 1, MAX_SPEAKERS);
        let choice = Select::new(&prompt, personality_options(!personalities.is_empty())).prompt()?;
        match choice.as_str() {
            DONE => break,
            CUSTOM_PERSONALITY => {
                let custom = Text::new("Describe the personality:").prompt()?;
                if !custom.trim().is_empty() {
                    personalities.push(custom);
                }
            }
            other => personalities.push(other.to_string()),
        }
    }
    Ok(personalities)
}

/// Host templates, then expert roles. `Done` is offered once a speaker
/// has been picked.
pub fn personality_options(allow_done: bool) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    if allow_done {
        options.push(DONE.to_string());
    }
    options.extend(HOST_TEMPLATES.iter().map(|s| s.to_string()));
    options.extend(EXPERT_PERSONALITIES.iter().map(|s| s.to_string()));
    options.push(CUSTOM_PERSONALITY.to_string());
    options
}

pub fn style_options() -> Vec<String> {
    PodcastStyle::ALL
        .iter()
        .map(|s| format!("{} - {}", s.name(), s.description()))
        .collect()
}

/// Inverse of the `"{name} - {description}"` option text.
pub fn style_name(option: &str) -> &str {
    option.split(" - ").next().unwrap_or(option)
}

/// Offers sign-in or registration. `None` means the user continues
/// without an account.
pub async fn run_account(auth: &dyn AuthClient) -> Result<Option<UserProfile>> {
    let options = vec!["Sign in", "Create account", "Continue without account"];
    match Select::new("Account:", options).prompt()? {
        "Sign in" => sign_in(auth).await,
        "Create account" => register(auth).await,
        _ => Ok(None),
    }
}

async fn sign_in(auth: &dyn AuthClient) -> Result<Option<UserProfile>> {
    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        let email = Text::new("Email:").prompt()?;
        let password = Password::new("Password:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()?;

        match auth.sign_in(&email, &password).await {
            Ok(session) => {
                println!("Login successful! Welcome back.");
                return Ok(Some(UserProfile::from_user(&session.user)));
            }
            Err(e) => {
                match e.downcast_ref::<AuthError>() {
                    Some(auth_err) => eprintln!("{}", auth_err),
                    None => eprintln!("Login failed: {:#}", e),
                }
                if attempt >= 3 {
                    println!("Tip: Make sure you've confirmed your email address.");
                }
            }
        }
    }
    warn!("Too many failed sign-in attempts, continuing without account");
    println!("Too many failed attempts. Continuing without an account.");
    Ok(None)
}

async fn register(auth: &dyn AuthClient) -> Result<Option<UserProfile>> {
    let name = Text::new("Full name:").prompt()?;
    let email = Text::new("Email:").prompt()?;
    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_custom_confirmation_error_message("Passwords do not match")
        .prompt()?;

    if let Err(e) = validate_registration(&name, &email, &password) {
        eprintln!("{}", e);
        return Ok(None);
    }

    match auth.sign_up(&email, &password, &name).await {
        Ok(SignUpOutcome::SignedIn(session)) => {
            println!("Account created successfully! Welcome aboard!");
            Ok(Some(UserProfile::from_user(&session.user)))
        }
        Ok(SignUpOutcome::ConfirmationRequired(_)) => {
            println!("Account created! Please check your email to verify your account, then sign in.");
            Ok(None)
        }
        Err(e) => {
            match e.downcast_ref::<AuthError>() {
                Some(auth_err) => eprintln!("{}", auth_err),
                None => eprintln!("Registration failed: {:#}", e),
            }
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_option_roundtrip() {
        for (option, style) in style_options().iter().zip(PodcastStyle::ALL) {
            assert_eq!(PodcastStyle::from_name(style_name(option)), Some(style));
        }
    }

    #[test]
    fn test_personality_options() {
        let first = personality_options(false);
        assert_eq!(first[0], HOST_TEMPLATES[0]);
        assert!(!first.iter().any(|o| o == DONE));
        assert_eq!(first.last().map(String::as_str), Some(CUSTOM_PERSONALITY));
        assert_eq!(
            first.len(),
            HOST_TEMPLATES.len() + EXPERT_PERSONALITIES.len() + 1
        );

        let later = personality_options(true);
        assert_eq!(later[0], DONE);
    }
}
