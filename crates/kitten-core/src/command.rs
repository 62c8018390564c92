// ── Command API ──
//
// Every operator mutation is a `Command`. The console validates it locally,
// sends it, then re-fetches the aggregate that owns the changed data.

use kitten_api::{ConfigUpdate, DomainMatching, FragmentMethod, ProxyStatus, Rule};
use strum::Display;

use crate::error::CoreError;

/// Server-side aggregate a command touches. Re-fetched after success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Aggregate {
    Config,
    Lists,
    Status,
    /// Throughput counters, fetched by the poll only.
    Stats,
    /// Side effects outside the console's view (e.g. opening a folder).
    None,
}

/// Advanced settings as edited in the settings panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsDraft {
    pub fragment_method: FragmentMethod,
    pub domain_matching: DomainMatching,
    pub auto_blacklist: bool,
    pub no_blacklist: bool,
}

impl SettingsDraft {
    /// Build the partial update. Disabling the blacklist entirely always
    /// clears automatic blacklisting, whatever the draft says.
    pub fn into_update(self) -> ConfigUpdate {
        ConfigUpdate {
            fragment_method: Some(self.fragment_method),
            domain_matching: Some(self.domain_matching),
            auto_blacklist: Some(self.auto_blacklist && !self.no_blacklist),
            no_blacklist: Some(self.no_blacklist),
            ..ConfigUpdate::default()
        }
    }
}

/// All write operations against the control plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Lists ────────────────────────────────────────────────────────
    ToggleList { name: String, enabled: bool },
    /// `domains` is newline-separated, as the server expects.
    CreateList { name: String, domains: String },
    EditList { name: String, domains: String },
    RemoveList { name: String },

    // ── Config ───────────────────────────────────────────────────────
    SaveSettings(SettingsDraft),
    SaveConnection { host: String, port: u16 },
    SaveLanguage(String),
    /// Newline-separated; blank lines are dropped.
    SaveCustomDomains(String),
    AddRule(Rule),
    /// Remove the rule the operator confirmed. `index` is where it was
    /// shown; if the rule set has shifted since, the rule is found by
    /// value instead.
    RemoveRule { index: usize, rule: Rule },

    // ── Engine ───────────────────────────────────────────────────────
    StartProxy,
    StopProxy,
    OpenUnlocked,
    OpenBlacklist,
}

impl Command {
    pub fn owner(&self) -> Aggregate {
        match self {
            Self::ToggleList { .. }
            | Self::CreateList { .. }
            | Self::EditList { .. }
            | Self::RemoveList { .. } => Aggregate::Lists,
            Self::SaveSettings(_)
            | Self::SaveConnection { .. }
            | Self::SaveLanguage(_)
            | Self::SaveCustomDomains(_)
            | Self::AddRule(_)
            | Self::RemoveRule { .. } => Aggregate::Config,
            Self::StartProxy | Self::StopProxy => Aggregate::Status,
            Self::OpenUnlocked | Self::OpenBlacklist => Aggregate::None,
        }
    }

    /// Aggregates to re-fetch after success. Creating, toggling or
    /// deleting a list also rewrites `selected_lists` in the config.
    pub fn refetch(&self) -> &'static [Aggregate] {
        match self {
            Self::ToggleList { .. } | Self::CreateList { .. } | Self::RemoveList { .. } => {
                &[Aggregate::Lists, Aggregate::Config]
            }
            Self::EditList { .. } => &[Aggregate::Lists],
            Self::StartProxy | Self::StopProxy => &[Aggregate::Status],
            Self::OpenUnlocked | Self::OpenBlacklist => &[],
            _ => &[Aggregate::Config],
        }
    }

    /// Reject input the server would refuse, before any request is made.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::ToggleList { name, .. }
            | Self::CreateList { name, .. }
            | Self::EditList { name, .. }
            | Self::RemoveList { name } => validate_list_name(name),
            Self::SaveConnection { host, port } => {
                if host.trim().is_empty() {
                    return Err(CoreError::validation("host", "must not be empty"));
                }
                if *port == 0 {
                    return Err(CoreError::validation("port", "must be between 1 and 65535"));
                }
                Ok(())
            }
            Self::SaveLanguage(lang) if lang.trim().is_empty() => {
                Err(CoreError::validation("language", "must not be empty"))
            }
            Self::AddRule(rule) if rule.pattern.trim().is_empty() => {
                Err(CoreError::validation("pattern", "must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Ok,
    /// Engine status reported by a start/stop request.
    Status(ProxyStatus),
}

// ── Input helpers ────────────────────────────────────────────────────

/// List names are restricted to `[A-Za-z0-9._-]+`.
pub fn validate_list_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::validation("name", "must not be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(CoreError::validation(
            "name",
            "only letters, digits, '.', '_' and '-' are allowed",
        ));
    }
    Ok(())
}

/// Parse a port typed by the operator.
pub fn parse_port(input: &str) -> Result<u16, CoreError> {
    match input.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(CoreError::validation("port", "must be between 1 and 65535")),
    }
}

/// Split newline-separated text into trimmed, non-empty entries.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use kitten_api::RuleAction;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn no_blacklist_clears_auto_blacklist() {
        let update = SettingsDraft {
            auto_blacklist: true,
            no_blacklist: true,
            ..SettingsDraft::default()
        }
        .into_update();
        assert_eq!(update.auto_blacklist, Some(false));
        assert_eq!(update.no_blacklist, Some(true));

        let update = SettingsDraft {
            auto_blacklist: true,
            no_blacklist: false,
            ..SettingsDraft::default()
        }
        .into_update();
        assert_eq!(update.auto_blacklist, Some(true));
    }

    #[test]
    fn settings_update_leaves_other_fields_unset() {
        let update = SettingsDraft::default().into_update();
        assert!(update.host.is_none());
        assert!(update.rules.is_none());
        assert!(update.custom_domains.is_none());
    }

    #[test]
    fn owners() {
        assert_eq!(Command::RemoveList { name: "x".into() }.owner(), Aggregate::Lists);
        let rule = Rule {
            pattern: "a.com".into(),
            action: kitten_api::RuleAction::Force,
            fragment_method: None,
        };
        assert_eq!(Command::RemoveRule { index: 0, rule }.owner(), Aggregate::Config);
        assert_eq!(Command::StartProxy.owner(), Aggregate::Status);
        assert_eq!(Command::OpenBlacklist.owner(), Aggregate::None);
    }

    #[test]
    fn list_membership_changes_refetch_config() {
        let toggle = Command::ToggleList {
            name: "news".into(),
            enabled: true,
        };
        assert_eq!(toggle.refetch(), &[Aggregate::Lists, Aggregate::Config]);
        let edit = Command::EditList {
            name: "news".into(),
            domains: String::new(),
        };
        assert_eq!(edit.refetch(), &[Aggregate::Lists]);
        assert_eq!(Command::StopProxy.refetch(), &[Aggregate::Status]);
        assert!(Command::OpenUnlocked.refetch().is_empty());
    }

    #[test]
    fn list_names() {
        assert!(validate_list_name("news").is_ok());
        assert!(validate_list_name("my-list_2.v1").is_ok());
        assert!(validate_list_name("").is_err());
        assert!(validate_list_name("a/b").is_err());
        assert!(validate_list_name("with space").is_err());
    }

    #[test]
    fn ports() {
        assert_eq!(parse_port(" 8881 ").ok(), Some(8881));
        assert!(parse_port("0").is_err());
        assert!(parse_port("65536").is_err());
        assert!(parse_port("abc").is_err());
    }

    #[test]
    fn validate_rejects_bad_input() {
        let empty_host = Command::SaveConnection {
            host: "  ".into(),
            port: 8881,
        };
        assert!(matches!(
            empty_host.validate(),
            Err(CoreError::Validation { ref field, .. }) if field == "host"
        ));

        let empty_rule = Command::AddRule(Rule {
            pattern: String::new(),
            action: RuleAction::Force,
            fragment_method: None,
        });
        assert!(empty_rule.validate().is_err());
        assert!(Command::StartProxy.validate().is_ok());
    }

    #[test]
    fn split_lines_trims_and_drops_blanks() {
        assert_eq!(
            split_lines(" a.com \n\n b.com\r\n"),
            vec!["a.com".to_owned(), "b.com".to_owned()]
        );
    }
}
