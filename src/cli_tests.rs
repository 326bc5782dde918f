use clap::Parser;

use super::{Cli, Commands, FundSubcommands, InvoiceSubcommands, ProjectSubcommands};

fn parse(args: &[&str]) -> Cli {
    Cli::parse_from(args)
}

#[test]
fn command_tree_is_well_formed() {
    super::styled_command().debug_assert();
}

#[test]
fn project_new_parses_with_options() {
    let cli = parse(&[
        "sbk", "project", "new", "Villa", "--client", "c1", "--budget", "50000", "--currency",
        "usd",
    ]);
    match cli.command {
        Commands::Project(args) => match args.command {
            ProjectSubcommands::New(new) => {
                assert_eq!(new.name, "Villa");
                assert_eq!(new.client_id.as_deref(), Some("c1"));
                assert_eq!(new.budget, Some(50_000.0));
                assert_eq!(new.currency.as_deref(), Some("usd"));
            }
            other => panic!("expected New, got {:?}", other),
        },
        other => panic!("expected Project, got {:?}", other),
    }
}

#[test]
fn project_list_alias_parses() {
    let cli = parse(&["sbk", "project", "list", "--status", "active"]);
    match cli.command {
        Commands::Project(args) => match args.command {
            ProjectSubcommands::Ls(ls) => assert_eq!(ls.status.as_deref(), Some("active")),
            other => panic!("expected Ls, got {:?}", other),
        },
        other => panic!("expected Project, got {:?}", other),
    }
}

#[test]
fn invoice_new_accepts_repeated_items() {
    let cli = parse(&[
        "sbk", "invoice", "new", "p1", "--item", "bricks:2:100", "--item", "sand:1:50", "--tax",
        "10",
    ]);
    match cli.command {
        Commands::Invoice(args) => match args.command {
            InvoiceSubcommands::New(new) => {
                assert_eq!(new.project_id, "p1");
                assert_eq!(new.items.len(), 2);
                assert_eq!(new.tax_rate, 10.0);
            }
            other => panic!("expected New, got {:?}", other),
        },
        other => panic!("expected Invoice, got {:?}", other),
    }
}

#[test]
fn fund_deposit_parses_positionals() {
    let cli = parse(&["sbk", "fund", "deposit", "p1", "100", "usd"]);
    match cli.command {
        Commands::Fund(args) => match args.command {
            FundSubcommands::Deposit(entry) => {
                assert_eq!(entry.project_id, "p1");
                assert_eq!(entry.amount, 100.0);
                assert_eq!(entry.currency, "usd");
            }
            other => panic!("expected Deposit, got {:?}", other),
        },
        other => panic!("expected Fund, got {:?}", other),
    }
}

#[test]
fn global_root_flag_parses_before_subcommand() {
    let cli = parse(&["sbk", "--root", "/tmp/site", "project", "ls"]);
    assert_eq!(
        cli.root.as_deref().map(|p| p.display().to_string()),
        Some("/tmp/site".to_string())
    );
    assert!(!cli.kv);
}

#[test]
fn kv_flag_parses() {
    let cli = parse(&["sbk", "--root", "/tmp/site.json", "--kv", "doctor"]);
    assert!(cli.kv);
    assert!(matches!(cli.command, Commands::Doctor(_)));
}
