//! Decide whether the pipeline runs for a host invocation.

use std::collections::BTreeMap;

use crate::config::ExtensionConfig;

/// A host command as already parsed by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Command name, e.g. "install"
    pub command: String,
    /// Boolean options by long name, e.g. "no-dev" => true
    pub options: BTreeMap<String, bool>,
}

impl CommandInvocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            options: BTreeMap::new(),
        }
    }

    /// Set an option's value.
    pub fn option(mut self, name: impl Into<String>, active: bool) -> Self {
        self.options.insert(name.into(), active);
        self
    }
}

/// Check whether local repositories should be injected for this command.
///
/// Any active ignore option suppresses the pipeline; otherwise the command
/// must be one of the trigger commands.
pub fn should_run(
    command: &str,
    options: &BTreeMap<String, bool>,
    config: &ExtensionConfig,
) -> bool {
    let suppressed = options
        .iter()
        .any(|(name, active)| *active && config.ignore_options.contains(name));

    !suppressed && config.trigger_commands.contains(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(invocation: &CommandInvocation, config: &ExtensionConfig) -> bool {
        should_run(&invocation.command, &invocation.options, config)
    }

    #[test]
    fn test_trigger_commands_run() {
        let config = ExtensionConfig::default();
        assert!(check(&CommandInvocation::new("install"), &config));
        assert!(check(&CommandInvocation::new("update"), &config));
    }

    #[test]
    fn test_other_commands_do_not_run() {
        let config = ExtensionConfig::default();
        assert!(!check(&CommandInvocation::new("require"), &config));
        assert!(!check(&CommandInvocation::new("dump-autoload"), &config));
        assert!(!check(&CommandInvocation::new(""), &config));
    }

    #[test]
    fn test_active_ignore_option_suppresses() {
        let config = ExtensionConfig::default();
        let invocation = CommandInvocation::new("install").option("no-dev", true);
        assert!(!check(&invocation, &config));

        let invocation = CommandInvocation::new("update")
            .option("no-dev", false)
            .option("prefer-source", true);
        assert!(!check(&invocation, &config));
    }

    #[test]
    fn test_inactive_ignore_option_does_not_suppress() {
        let config = ExtensionConfig::default();
        let invocation = CommandInvocation::new("install")
            .option("no-dev", false)
            .option("prefer-source", false);
        assert!(check(&invocation, &config));
    }

    #[test]
    fn test_unrelated_active_option_does_not_suppress() {
        let config = ExtensionConfig::default();
        let invocation = CommandInvocation::new("install")
            .option("optimize-autoloader", true)
            .option("dry-run", true);
        assert!(check(&invocation, &config));
    }

    #[test]
    fn test_custom_config() {
        let config = ExtensionConfig {
            trigger_commands: ["require".to_string()].into(),
            ignore_options: ["prefer-dist".to_string()].into(),
            force_dev: true,
        };

        assert!(check(&CommandInvocation::new("require"), &config));
        assert!(!check(&CommandInvocation::new("install"), &config));
        // no-dev is no longer an ignore option
        assert!(check(
            &CommandInvocation::new("require").option("no-dev", true),
            &config
        ));
        assert!(!check(
            &CommandInvocation::new("require").option("prefer-dist", true),
            &config
        ));
    }

    #[test]
    fn test_exhaustive_against_definition() {
        let config = ExtensionConfig::default();
        let commands = ["install", "update", "require", "remove"];
        let option_names = ["no-dev", "prefer-source", "dry-run"];

        for command in commands {
            for mask in 0u8..(1 << option_names.len()) {
                let mut invocation = CommandInvocation::new(command);
                for (i, name) in option_names.iter().enumerate() {
                    invocation = invocation.option(*name, mask & (1 << i) != 0);
                }

                let any_ignored_active = invocation
                    .options
                    .iter()
                    .any(|(name, active)| *active && config.ignore_options.contains(name));
                let expected =
                    config.trigger_commands.contains(command) && !any_ignored_active;

                assert_eq!(
                    check(&invocation, &config),
                    expected,
                    "command={} options={:?}",
                    command,
                    invocation.options
                );
            }
        }
    }
}
