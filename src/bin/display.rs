//! CoCon Vote Monitor - display client
//!
//! Connects to a running `vote-monitor`, renders every snapshot and raises a
//! print when a vote is stopped.
//!
//! ```bash
//! vote-display http://monitor:8000/             # auto-print on
//! vote-display http://monitor:8000/noautoprint  # auto-print off
//! ```

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use vote_monitor::display::{listen, DisplayTarget};
use vote_monitor::render::{
    CommandPrinter, Document, DomView, LogPrinter, Printer, Renderer, ViewField,
};
use vote_monitor::{DisplayArgs, DisplayConfig, MonitorResult, Snapshot, VoteOption};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = DisplayArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DisplayConfig::from_env(args);
    let result = match config.print_command.as_deref() {
        Some(command) => match CommandPrinter::from_command_line(command) {
            Ok(printer) => run(&config, printer.with_board_file(config.html_out.clone())).await,
            Err(e) => Err(e),
        },
        None => run(&config, LogPrinter).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Display stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run<P: Printer<DomView>>(config: &DisplayConfig, printer: P) -> MonitorResult<()> {
    let target = DisplayTarget::from_page_url(&config.page_url)?;
    log::info!(
        "Display for {} (auto-print {})",
        config.page_url,
        if target.auto_print { "on" } else { "off" }
    );

    let view = DomView::attach(Document::vote_board())?;
    let mut renderer = Renderer::new(view, printer, target.auto_print);

    listen(&target.ws_url, &mut renderer, |renderer, snapshot| {
        report(renderer.view(), snapshot);
        if let Some(path) = &config.html_out {
            if let Err(e) = fs::write(path, renderer.view().document().to_html()) {
                log::error!("Could not write {}: {}", path.display(), e);
            }
        }
    })
    .await
}

fn report(view: &DomView, snapshot: &Snapshot) {
    log::info!(
        "{} | {} | YES {} ABST {} NO {} | {}",
        view.text_of(ViewField::Agenda),
        if snapshot.voting_state().is_empty() { "-" } else { snapshot.voting_state() },
        view.text_of(ViewField::Counter(VoteOption::Yes)),
        view.text_of(ViewField::Counter(VoteOption::Abst)),
        view.text_of(ViewField::Counter(VoteOption::No)),
        view.text_of(ViewField::Datetime),
    );
}
