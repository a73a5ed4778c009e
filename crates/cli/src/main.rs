use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use quotedesk_cli::{App, Cli, Config};
use quotedesk_store::{KeyValueBackend, LedgerStore, MemoryBackend, SqliteBackend};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    quotedesk_observability::init(config.log_format);

    if config.uses_dev_referral_code() {
        tracing::warn!("QUOTEDESK_REFERRAL_CODE not set; using insecure dev default");
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let backend: Arc<dyn KeyValueBackend> = if cli.memory {
        tracing::info!("using in-memory ledger; nothing will be persisted");
        Arc::new(MemoryBackend::new())
    } else {
        let path = config.db_path()?;
        let backend = SqliteBackend::open(&path)
            .with_context(|| format!("failed to open ledger at {}", path.display()))?;
        Arc::new(backend)
    };

    let store = LedgerStore::new(backend).with_session_policy(config.session_policy());
    let app = App::new(store, config.referral_code);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run(cli.command, &mut out)
}
