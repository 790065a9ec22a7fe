use std::fs;
use std::future::Future;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use tracker_core::{DashboardMsg, DraftField, JobStatus, Msg, PanelState};
use tracker_engine::{
    Dispatcher, JsonFileBackend, LocalBrowser, PageSnapshot, RecordStore, Storage,
};
use tracker_logging::{set_surface, tracker_info};
use uuid::Uuid;

use super::cli::{AddArgs, Cli, Command, ScanArgs};
use super::config::{load_config, TrackerConfig};
use super::dashboard::DashboardSurface;
use super::effects::EffectRunner;
use super::{logging, render};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    logging::initialize(config.log_destination, config.level_filter(), &config.data_dir);
    tracker_info!("job_tracker v{} data_dir={:?}", env!("CARGO_PKG_VERSION"), config.data_dir);

    let storage = Storage::open(JsonFileBackend::new(config.data_dir.clone()))
        .with_context(|| format!("opening storage in {}", config.data_dir.display()))?;
    let store = RecordStore::new(storage);

    match cli.command {
        Command::Scan(args) => block_on(scan(&config, store, args)),
        Command::Add(args) => block_on(add(&config, store, args)),
        Command::List { status } => list(store, status),
        Command::Show { id } => show(store, id),
        Command::Status { id, status } => change_status(store, id, status),
        Command::Remove { id, yes } => remove(store, id, yes),
    }
}

/// Panel flows run on a single-threaded runtime; they only wait on the page.
fn block_on(flow: impl Future<Output = anyhow::Result<()>>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting runtime")?;
    runtime.block_on(flow)
}

async fn scan(config: &TrackerConfig, store: RecordStore, args: ScanArgs) -> anyhow::Result<()> {
    set_surface("panel");
    let html = fs::read_to_string(&args.page)
        .with_context(|| format!("reading page {}", args.page.display()))?;
    let page = PageSnapshot::new(&args.url, html)?;

    let browser = LocalBrowser::new();
    browser.open_tab(page, config.attach_on_load);
    let dispatcher = Dispatcher::new(browser, config.dispatch_settings());
    let mut runner = EffectRunner::new(dispatcher, store);

    let mut state = runner.dispatch(panel(), Msg::ScanClicked).await;
    let mut edits = Vec::new();
    if let Some(title) = args.title {
        edits.push(DraftField::Title(title));
    }
    edits.extend(args.form.edits());
    for edit in edits {
        state = runner.dispatch(state, Msg::FieldEdited(edit)).await;
    }

    if !args.save {
        print!("{}", render::render_panel(&state.view()));
        return Ok(());
    }
    finish_save(&mut runner, state).await
}

async fn add(config: &TrackerConfig, store: RecordStore, args: AddArgs) -> anyhow::Result<()> {
    set_surface("panel");
    // No page is involved; the dispatcher only satisfies the runner's shape.
    let dispatcher = Dispatcher::new(LocalBrowser::new(), config.dispatch_settings());
    let mut runner = EffectRunner::new(dispatcher, store);

    let mut state = panel();
    let mut edits = vec![DraftField::Title(args.title), DraftField::Url(args.url)];
    edits.extend(args.form.edits());
    for edit in edits {
        state = runner.dispatch(state, Msg::FieldEdited(edit)).await;
    }
    finish_save(&mut runner, state).await
}

async fn finish_save(
    runner: &mut EffectRunner<LocalBrowser>,
    state: PanelState,
) -> anyhow::Result<()> {
    let state = runner.dispatch(state, Msg::SaveClicked).await;
    match runner.saved().last() {
        Some(record) => {
            println!("{}", render::render_saved(record));
            Ok(())
        }
        None => {
            print!("{}", render::render_panel(&state.view()));
            bail!(
                "{}",
                state.view().message.unwrap_or_else(|| "Failed to save job.".into())
            )
        }
    }
}

fn list(store: RecordStore, status: Option<JobStatus>) -> anyhow::Result<()> {
    set_surface("dashboard");
    let dashboard = DashboardSurface::open(store)?;
    print!("{}", render::render_dashboard(&dashboard.state().view(), status));
    Ok(())
}

fn show(store: RecordStore, id: Uuid) -> anyhow::Result<()> {
    set_surface("dashboard");
    let mut dashboard = DashboardSurface::open(store)?;
    ensure_known(&dashboard, id)?;
    dashboard.dispatch(DashboardMsg::JobSelected(id))?;
    if let Some(details) = render::render_details(&dashboard.state().view()) {
        print!("{details}");
    }
    dashboard.dispatch(DashboardMsg::DetailsClosed)?;
    Ok(())
}

fn change_status(store: RecordStore, id: Uuid, status: JobStatus) -> anyhow::Result<()> {
    set_surface("dashboard");
    let mut dashboard = DashboardSurface::open(store)?;
    ensure_known(&dashboard, id)?;
    dashboard.dispatch(DashboardMsg::StatusSelected { id, status })?;
    print!("{}", render::render_dashboard(&dashboard.state().view(), None));
    Ok(())
}

fn remove(store: RecordStore, id: Uuid, confirmed: bool) -> anyhow::Result<()> {
    set_surface("dashboard");
    let mut dashboard = DashboardSurface::open(store)?;
    ensure_known(&dashboard, id)?;
    dashboard.dispatch(DashboardMsg::DeleteRequested(id))?;
    if !confirmed {
        if let Some(prompt) = render::render_pending_delete(&dashboard.state().view()) {
            println!("{prompt}");
        }
        dashboard.dispatch(DashboardMsg::DeleteCancelled)?;
        return Ok(());
    }
    dashboard.dispatch(DashboardMsg::DeleteConfirmed)?;
    print!("{}", render::render_dashboard(&dashboard.state().view(), None));
    Ok(())
}

fn ensure_known(dashboard: &DashboardSurface, id: Uuid) -> anyhow::Result<()> {
    if !dashboard.state().records().iter().any(|record| record.id == id) {
        bail!("No job with id {id}");
    }
    Ok(())
}

fn panel() -> PanelState {
    PanelState::new(Utc::now().date_naive())
}
