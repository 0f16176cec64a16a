//! Package manager detection for the install and dev-server steps

use std::fmt;
use std::str::FromStr;

/// Environment variable npm-compatible launchers set for child processes
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Supported JavaScript package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Detect from a launcher user agent such as `pnpm/8.0.0 npm/? node/?`
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("pnpm") {
            PackageManager::Pnpm
        } else if user_agent.contains("yarn") {
            PackageManager::Yarn
        } else if user_agent.contains("bun") {
            PackageManager::Bun
        } else {
            PackageManager::Npm
        }
    }

    /// Detect from the environment, defaulting to npm
    pub fn detect() -> Self {
        std::env::var(USER_AGENT_ENV)
            .map(|ua| Self::from_user_agent(&ua))
            .unwrap_or_default()
    }

    /// `<pm> install`
    pub fn install_command(&self) -> CommandSpec {
        CommandSpec::new(self.binary(), &["install"], OutputMode::Prefixed)
    }

    /// `<pm> run dev`
    pub fn dev_command(&self) -> CommandSpec {
        CommandSpec::new(self.binary(), &["run", "dev"], OutputMode::Inherit)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(format!(
                "unknown package manager '{}' (expected npm, pnpm, yarn or bun)",
                other
            )),
        }
    }
}

/// How a spawned command's output reaches the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Child shares our stdio (interactive dev servers)
    Inherit,
    /// Lines are captured and echoed with a gutter prefix
    Prefixed,
}

/// A program plus arguments, run inside the project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub output: OutputMode,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str], output: OutputMode) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            output,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_from_user_agent() {
        assert_eq!(
            PackageManager::from_user_agent("pnpm/8.0.0 npm/? node/?"),
            PackageManager::Pnpm
        );
        assert_eq!(
            PackageManager::from_user_agent("yarn/1.22.0 npm/? node/?"),
            PackageManager::Yarn
        );
        assert_eq!(PackageManager::from_user_agent("bun/1.0.0"), PackageManager::Bun);
        assert_eq!(PackageManager::from_user_agent("some-agent"), PackageManager::Npm);
        assert_eq!(PackageManager::from_user_agent(""), PackageManager::Npm);
    }

    #[test]
    fn test_commands_are_uniform() {
        for pm in [
            PackageManager::Npm,
            PackageManager::Pnpm,
            PackageManager::Yarn,
            PackageManager::Bun,
        ] {
            assert_eq!(pm.install_command().to_string(), format!("{} install", pm));
            assert_eq!(pm.dev_command().to_string(), format!("{} run dev", pm));
        }
    }

    #[test]
    fn test_parse_package_manager() {
        assert_eq!("PNPM".parse::<PackageManager>(), Ok(PackageManager::Pnpm));
        assert!("cargo".parse::<PackageManager>().is_err());
    }
}
