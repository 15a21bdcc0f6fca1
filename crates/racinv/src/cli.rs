//! Command-line arguments
//!
//! Every option is optional here; unset options fall back to the config file
//! and then to built-in defaults.

use std::path::PathBuf;

use clap::Parser;

/// Dump the hardware inventory of an iDRAC as JSON
#[derive(Parser, Debug, Default)]
#[command(name = "racinv", version)]
pub struct Args {
    /// Device types, "all" for all device types [default: NIC,FC]
    #[arg(short = 't', long, value_delimiter = ',')]
    pub types: Option<Vec<String>>,

    /// Fields to show, "all" for all fields [default: all]
    #[arg(short = 'f', long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// iDRAC FQDN/IP
    #[arg(short = 'i', long)]
    pub idrac: Option<String>,

    /// iDRAC user [default: root]
    #[arg(short, long)]
    pub user: Option<String>,

    /// iDRAC password [default: calvin]
    #[arg(short, long)]
    pub password: Option<String>,

    /// SSH port [default: 22]
    #[arg(long)]
    pub port: Option<u16>,

    /// Inventory command timeout in seconds [default: 60]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated_and_repeated_lists() {
        let args = Args::parse_from([
            "racinv", "-i", "10.0.0.5", "-t", "NIC,FC", "-t", "CPU", "--fields", "Model",
        ]);

        assert_eq!(args.types.unwrap(), ["NIC", "FC", "CPU"]);
        assert_eq!(args.fields.unwrap(), ["Model"]);
        assert_eq!(args.idrac.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn test_unset_options_are_none() {
        let args = Args::parse_from(["racinv"]);

        assert!(args.types.is_none());
        assert!(args.user.is_none());
        assert!(args.password.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_rejects_subcommands() {
        assert!(Args::try_parse_from(["racinv", "hosts"]).is_err());
    }
}
