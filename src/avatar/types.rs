//! Avatar record definitions.
//!
//! [`Avatar`] is the stored persona, [`NewAvatar`] the creation payload (all
//! fields required), and [`AvatarUpdate`] the partial payload where `None`
//! leaves the stored field untouched.

use serde::{Deserialize, Serialize};

/// An avatar persona, matching the `avatars` table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// UUID v7 primary key, assigned once at creation.
    pub id: String,
    pub name: String,
    /// Free-text description shown to users and fed to the prompt.
    pub description: String,
    pub personality: String,
    /// Behavioral instructions for the generation provider.
    pub instructions: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-modification timestamp; never earlier than `created_at`.
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAvatar {
    pub name: String,
    pub description: String,
    pub personality: String,
    pub instructions: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvatarUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub personality: Option<String>,
    pub instructions: Option<String>,
}

impl AvatarUpdate {
    /// Apply the provided fields onto `avatar`, leaving the rest as stored.
    pub fn apply_to(self, avatar: &mut Avatar) {
        if let Some(name) = self.name {
            avatar.name = name;
        }
        if let Some(description) = self.description {
            avatar.description = description;
        }
        if let Some(personality) = self.personality {
            avatar.personality = personality;
        }
        if let Some(instructions) = self.instructions {
            avatar.instructions = instructions;
        }
    }
}
