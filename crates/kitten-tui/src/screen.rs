//! Screen identifiers and the section controller's entry rules.

use std::fmt;

/// Identifies each console section, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard, // 1
    Lists,       // 2
    Rules,       // 3
    Settings,    // 4
    Diagnostics, // 5
    Logs,        // 6
}

/// One-shot fetch a section needs when it becomes active. Sections not
/// listed render straight from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRefresh {
    Diagnostics,
    Logs,
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 6] = [
        Self::Dashboard,
        Self::Lists,
        Self::Rules,
        Self::Settings,
        Self::Diagnostics,
        Self::Logs,
    ];

    /// Numeric key (1-6) for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Lists => 2,
            Self::Rules => 3,
            Self::Settings => 4,
            Self::Diagnostics => 5,
            Self::Logs => 6,
        }
    }

    /// Screen from a numeric key (1-6). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Lists => "Lists",
            Self::Rules => "Rules",
            Self::Settings => "Settings",
            Self::Diagnostics => "Diagnostics",
            Self::Logs => "Logs",
        }
    }

    /// Fetch to run on entering this section. Rules live inside the
    /// config aggregate and need none.
    pub fn entry_refresh(self) -> Option<EntryRefresh> {
        match self {
            Self::Diagnostics => Some(EntryRefresh::Diagnostics),
            Self::Logs => Some(EntryRefresh::Logs),
            Self::Dashboard | Self::Lists | Self::Rules | Self::Settings => None,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(7), None);
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Logs.next(), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev(), ScreenId::Logs);
        assert_eq!(ScreenId::Lists.next(), ScreenId::Rules);
    }

    #[test]
    fn only_diagnostics_and_logs_fetch_on_entry() {
        assert_eq!(
            ScreenId::Diagnostics.entry_refresh(),
            Some(EntryRefresh::Diagnostics)
        );
        assert_eq!(ScreenId::Logs.entry_refresh(), Some(EntryRefresh::Logs));
        assert_eq!(ScreenId::Rules.entry_refresh(), None);
        assert_eq!(ScreenId::Dashboard.entry_refresh(), None);
    }
}
