use clap::Parser;
use rsys::cli::commands::auth::AuthCommands;
use rsys::cli::commands::campaign::CampaignCommands;
use rsys::cli::commands::program::ProgramCommands;
use rsys::cli::{Cli, Commands};
use rsys::CampaignType;
use std::path::PathBuf;

fn parse(args: &[&str]) -> Cli {
    // Keep credentials from the developer's shell out of the parse
    temp_env::with_vars_unset(["RSYS_USER_NAME", "RSYS_PASSWORD"], || {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    })
}

#[test]
fn test_parse_auth_login_with_global_flags() {
    let cli = parse(&[
        "rsys",
        "auth",
        "login",
        "--user-name",
        "jdoe",
        "--password",
        "hunter2",
        "--json",
    ]);

    assert!(cli.json);
    assert_eq!(cli.user_name.as_deref(), Some("jdoe"));
    assert_eq!(cli.password.as_deref(), Some("hunter2"));
    match cli.command {
        Commands::Auth(args) => assert!(matches!(args.command, AuthCommands::Login)),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_credentials_from_environment() {
    let cli = temp_env::with_vars(
        [
            ("RSYS_USER_NAME", Some("env-user")),
            ("RSYS_PASSWORD", Some("env-secret")),
        ],
        || Cli::try_parse_from(["rsys", "auth", "refresh"]).unwrap(),
    );

    assert_eq!(cli.user_name.as_deref(), Some("env-user"));
    assert_eq!(cli.password.as_deref(), Some("env-secret"));
    match cli.command {
        Commands::Auth(args) => assert!(matches!(args.command, AuthCommands::Refresh)),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_throttle_limits() {
    let cli = parse(&["rsys", "throttle-limits", "--config", "custom.yaml"]);

    assert!(matches!(cli.command, Commands::ThrottleLimits));
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    assert!(!cli.json);
}

#[test]
fn test_parse_campaign_show() {
    let cli = parse(&["rsys", "campaign", "show", "Spring Sale"]);

    match cli.command {
        Commands::Campaign(args) => match args.command {
            CampaignCommands::Show { name } => assert_eq!(name, "Spring Sale"),
            CampaignCommands::List { .. } => panic!("Wrong campaign command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_campaign_list_defaults() {
    let cli = parse(&["rsys", "campaign", "list"]);

    match cli.command {
        Commands::Campaign(args) => match args.command {
            CampaignCommands::List {
                limit,
                offset,
                campaign_type,
                all,
            } => {
                assert_eq!(limit, None);
                assert_eq!(offset, 0);
                assert_eq!(campaign_type, CampaignType::Email);
                assert!(!all);
            }
            CampaignCommands::Show { .. } => panic!("Wrong campaign command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_campaign_list_options() {
    let cli = parse(&[
        "rsys", "campaign", "list", "--limit", "50", "--offset", "100", "--type", "message-center",
        "--all",
    ]);

    match cli.command {
        Commands::Campaign(args) => match args.command {
            CampaignCommands::List {
                limit,
                offset,
                campaign_type,
                all,
            } => {
                assert_eq!(limit, Some(50));
                assert_eq!(offset, 100);
                assert_eq!(campaign_type, CampaignType::MessageCenter);
                assert!(all);
            }
            CampaignCommands::Show { .. } => panic!("Wrong campaign command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_invalid_campaign_type_is_rejected() {
    let result = temp_env::with_vars_unset(["RSYS_USER_NAME", "RSYS_PASSWORD"], || {
        Cli::try_parse_from(["rsys", "campaign", "list", "--type", "fax"])
    });
    assert!(result.is_err());
}

#[test]
fn test_parse_program_list() {
    let cli = parse(&["rsys", "program", "list", "--status", "RUNNING", "-a"]);

    match cli.command {
        Commands::Program(args) => {
            let ProgramCommands::List { status, all, .. } = args.command;
            assert_eq!(status.as_deref(), Some("RUNNING"));
            assert!(all);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_export() {
    let cli = parse(&[
        "rsys",
        "export",
        "--dir",
        "out",
        "--campaign-type",
        "sms",
        "--program-status",
        "RUNNING",
    ]);

    match cli.command {
        Commands::Export(args) => {
            assert_eq!(args.dir, PathBuf::from("out"));
            assert_eq!(args.campaign_type, CampaignType::Sms);
            assert_eq!(args.program_status.as_deref(), Some("RUNNING"));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_export_defaults_to_current_dir() {
    let cli = parse(&["rsys", "export"]);

    match cli.command {
        Commands::Export(args) => {
            assert_eq!(args.dir, PathBuf::from("."));
            assert_eq!(args.campaign_type, CampaignType::Email);
            assert!(args.program_status.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
