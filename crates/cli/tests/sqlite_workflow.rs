use clap::Parser;
use quotedesk_cli::{App, Cli};
use quotedesk_store::{LedgerStore, SqliteBackend};

const SECRET: &str = "REF-123";

fn exec(db: &std::path::Path, args: &[&str]) -> anyhow::Result<String> {
    let store = LedgerStore::new(SqliteBackend::open(db)?);
    let app = App::new(store, SECRET);
    let cli = Cli::try_parse_from(std::iter::once("quotedesk").chain(args.iter().copied()))?;
    let mut buffer = Vec::new();
    app.run(cli.command, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[test]
fn ledger_persists_between_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");
    let logo = dir.path().join("logo.jpg");
    std::fs::write(&logo, b"\xFF\xD8\xFF\xE0jpeg bytes").unwrap();

    exec(
        &db,
        &[
            "register",
            "--company-name",
            "Acme Traders",
            "--email",
            "sales@acme.test",
            "--contact",
            "555-0100",
            "--logo",
            logo.to_str().unwrap(),
            "--referral-code",
            SECRET,
        ],
    )
    .unwrap();

    for client in ["Jane Doe", "Bob Roe"] {
        exec(
            &db,
            &[
                "quote",
                "new",
                "--client",
                client,
                "--client-contact",
                "555-0101",
                "--client-email",
                "client@example.com",
                "--item",
                "Chair:4:25",
            ],
        )
        .unwrap();
    }

    let history = exec(&db, &["history", "--sort", "oldest"]).unwrap();
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("QT-1001"));
    assert!(lines[1].starts_with("QT-1002"));

    let shown = exec(&db, &["quote", "show", "QT-1002"]).unwrap();
    assert!(shown.contains("Bob Roe"));
    assert!(shown.contains("100.00"));

    exec(&db, &["logout"]).unwrap();
    assert!(exec(&db, &["history"]).is_err());
}
