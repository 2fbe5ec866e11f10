//! Screen and mode enumerations for the terminal user interface.

/// Top-level screens. Every screen change goes through an exhaustive match on this.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Home,
    Login,
    Register,
    Main(Section),
}

/// Sections reachable from the main tab bar once signed in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Section {
    Calendar,
    Notes,
    Rewards,
    Friends,
    Plans,
    Sounds,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Calendar,
        Section::Notes,
        Section::Rewards,
        Section::Friends,
        Section::Plans,
        Section::Sounds,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Calendar => "Calendar",
            Section::Notes => "Notes",
            Section::Rewards => "Rewards",
            Section::Friends => "Friends",
            Section::Plans => "Plans",
            Section::Sounds => "Sounds",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Section::Calendar => 0,
            Section::Notes => 1,
            Section::Rewards => 2,
            Section::Friends => 3,
            Section::Plans => 4,
            Section::Sounds => 5,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Field focus on the login screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoginField {
    Email,
    Password,
}

/// Field focus on the registration screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RegisterField {
    Name,
    Email,
    Password,
}

impl RegisterField {
    pub fn next(self) -> Self {
        match self {
            RegisterField::Name => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Name,
        }
    }
}

/// Mode of the day editor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EditorMode {
    Browse,
    Adding,
    Editing(u64),
}

/// Rows on the sounds screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundRow {
    Sound,
    Volume,
    Mute,
}

impl SoundRow {
    pub fn next(self) -> Self {
        match self {
            SoundRow::Sound => SoundRow::Volume,
            SoundRow::Volume => SoundRow::Mute,
            SoundRow::Mute => SoundRow::Mute,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SoundRow::Sound => SoundRow::Sound,
            SoundRow::Volume => SoundRow::Sound,
            SoundRow::Mute => SoundRow::Volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_cycle_covers_all() {
        let mut s = Section::Calendar;
        for expected in Section::ALL.iter().skip(1) {
            s = s.next();
            assert_eq!(s, *expected);
        }
        assert_eq!(s.next(), Section::Calendar);
        assert_eq!(Section::Calendar.prev(), Section::Sounds);
    }

    #[test]
    fn test_section_index_matches_order() {
        for (i, s) in Section::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }
}
