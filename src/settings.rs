//! Ancillary per-user state: sound settings and the friends list.

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::{Result, VestigiumError};
use crate::fields::Sound;

pub const MAX_VOLUME: u8 = 100;

/// Sound preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sound: Sound,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default)]
    pub muted: bool,
}

fn default_volume() -> u8 {
    70
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sound: Sound::default(),
            volume: default_volume(),
            muted: false,
        }
    }
}

impl Settings {
    /// Set the volume, rejecting values above [`MAX_VOLUME`].
    pub fn set_volume(&mut self, volume: u16) -> Result<()> {
        if volume > MAX_VOLUME as u16 {
            return Err(VestigiumError::InvalidVolume(volume));
        }
        self.volume = volume as u8;
        Ok(())
    }

    /// Volume actually applied, zero when muted.
    pub fn effective_volume(&self) -> u8 {
        if self.muted || self.sound == Sound::None {
            0
        } else {
            self.volume
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub name: String,
    pub since: DateKey,
}

/// Ordered friends list with case-insensitive unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Friends(Vec<Friend>);

impl Friends {
    pub fn iter(&self) -> impl Iterator<Item = &Friend> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.0.iter().position(|f| f.name.to_lowercase() == needle)
    }

    pub fn add(&mut self, name: &str, since: DateKey) -> Result<&Friend> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VestigiumError::EmptyFriendName);
        }
        if self.contains(name) {
            return Err(VestigiumError::DuplicateFriend(name.to_string()));
        }
        self.0.push(Friend { name: name.to_string(), since });
        Ok(&self.0[self.0.len() - 1])
    }

    pub fn remove(&mut self, name: &str) -> Result<Friend> {
        let idx = self
            .position(name)
            .ok_or_else(|| VestigiumError::FriendNotFound(name.trim().to_string()))?;
        Ok(self.0.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DateKey {
        DateKey::from_ymd(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_volume_bounds() {
        let mut s = Settings::default();
        s.set_volume(100).unwrap();
        assert_eq!(s.volume, 100);
        assert!(matches!(s.set_volume(101), Err(VestigiumError::InvalidVolume(101))));
        assert_eq!(s.volume, 100);
    }

    #[test]
    fn test_effective_volume_respects_mute() {
        let mut s = Settings::default();
        assert_eq!(s.effective_volume(), 70);
        s.muted = true;
        assert_eq!(s.effective_volume(), 0);
        s.muted = false;
        s.sound = Sound::None;
        assert_eq!(s.effective_volume(), 0);
    }

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        let s: Settings = serde_json::from_str(r#"{"muted": true}"#).unwrap();
        assert_eq!(s.volume, 70);
        assert_eq!(s.sound, Sound::Bell);
        assert!(s.muted);
    }

    #[test]
    fn test_friends_unique_case_insensitive() {
        let mut friends = Friends::default();
        friends.add(" Ana ", day()).unwrap();
        assert!(matches!(friends.add("ana", day()), Err(VestigiumError::DuplicateFriend(_))));
        assert!(matches!(friends.add("  ", day()), Err(VestigiumError::EmptyFriendName)));
        assert_eq!(friends.len(), 1);
        assert_eq!(friends.iter().next().unwrap().name, "Ana");
    }

    #[test]
    fn test_friends_remove() {
        let mut friends = Friends::default();
        friends.add("Luis", day()).unwrap();
        friends.add("Marta", day()).unwrap();
        let removed = friends.remove("LUIS").unwrap();
        assert_eq!(removed.name, "Luis");
        assert!(matches!(friends.remove("Luis"), Err(VestigiumError::FriendNotFound(_))));
        assert_eq!(friends.len(), 1);
    }
}
