use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Optional. Connection profile to use. Default is 'default'.
    /// An unconfigured profile falls back to the default server address.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Server base URL
    /// Optional. Overrides the profile's server address for this session.
    #[clap(short = 's', long, help = "server base URL (overrides the profile)")]
    server: Option<String>,

    /// Verbose mode
    /// Optional. Log debug messages to the log file.
    #[clap(
        short = 'v',
        long,
        help = "Log verbose messages",
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    server: Option<String>,
    verbose: bool,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        let args = ClapArgs::parse();
        Self {
            profile: args.profile,
            server: args.server,
            verbose: args.verbose,
        }
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = ClapArgs::parse_from(itr);
        Self {
            profile: args.profile,
            server: args.server,
            verbose: args.verbose,
        }
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn server(&self) -> Option<&String> {
        self.server.as_ref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_args_profile_only() {
        let args = CommandLineArgs::parse_from(["program", "--profile", "test"]);
        assert_eq!(args.profile(), "test");
        assert_eq!(args.server(), None);
        assert!(!args.verbose());
    }

    #[test]
    fn test_parse_args_verbose() {
        let args = CommandLineArgs::parse_from(["program", "--verbose"]);
        assert_eq!(args.profile(), "default");
        assert!(args.verbose());
    }

    #[test]
    fn test_parse_args_server_override() {
        let args =
            CommandLineArgs::parse_from(["program", "--server", "http://10.0.0.5:8080/api"]);
        assert_eq!(args.server().unwrap(), "http://10.0.0.5:8080/api");
    }

    #[test]
    fn test_parse_args_short_flags() {
        let args = CommandLineArgs::parse_from(["program", "-p", "dev", "-v"]);
        assert_eq!(args.profile(), "dev");
        assert!(args.verbose());
    }

    #[test]
    fn test_default_values() {
        let args = CommandLineArgs::parse_from(["program"]);
        assert_eq!(args.profile(), "default");
        assert!(!args.verbose());
    }
}
