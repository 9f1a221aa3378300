//! Persona prompt and canned reply templates.

use crate::avatar::Avatar;

/// How many characters of the instructions the simulated reply quotes.
const INSTRUCTIONS_PREVIEW_CHARS: usize = 100;

/// Role-play prompt embedding every persona field and the verbatim user message.
pub fn build_persona_prompt(avatar: &Avatar, user_message: &str) -> String {
    let name = &avatar.name;
    format!(
        "You are {name}, an AI avatar with the following characteristics:\n\
         \n\
         Description: {description}\n\
         Personality: {personality}\n\
         Instructions: {instructions}\n\
         \n\
         Stay in character as {name} and follow your instructions. Keep the reply \
         natural and conversational, no longer than three short paragraphs.\n\
         \n\
         User message: {user_message}\n\
         \n\
         Respond as {name}:",
        description = avatar.description,
        personality = avatar.personality,
        instructions = avatar.instructions,
    )
}

/// Reply used when the provider call fails. Callers match on its phrasing.
pub fn fallback_reply(avatar: &Avatar, user_message: &str) -> String {
    format!(
        "Hi! I'm {}. {} You said: '{user_message}'. I'm experiencing some technical difficulties, \
         but I'm here to help! Can you tell me more about what you'd like to know?",
        avatar.name, avatar.personality
    )
}

/// Reply used when no provider is configured at all.
pub fn simulated_reply(avatar: &Avatar, user_message: &str) -> String {
    let preview: String = avatar
        .instructions
        .chars()
        .take(INSTRUCTIONS_PREVIEW_CHARS)
        .collect();
    format!(
        "Hi! I'm {}. {} You said: '{user_message}'. Here's my response based on my instructions: {preview}...",
        avatar.name, avatar.personality
    )
}
