// src/cli/handlers/browse.rs

// The interactive session: pick a region filter, pick a file, then view its content, run
// it, or look at its last output. Runs happen in the background so the menus stay usable.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::{Select, theme::ColorfulTheme};
use std::sync::Arc;

use crate::{
    cli::{
        dispatcher::AppContext,
        handlers::commons,
        session::{ExecutionLog, FileItem},
    },
    constants::ALL_SELECTOR,
    core::query::FilterCriteria,
    models::{TerragruntFile, Workspace},
    system::{
        dispatch::{DispatchError, ExecutionDispatcher, ExecutionEvent},
        executor::{ExecutionGateway, ExecutionRequest, TerragruntGateway},
    },
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Browses the workspace interactively (the default action)."
)]
struct BrowseArgs {
    /// Start with this region filter instead of asking for one.
    #[arg(long, short)]
    region: Option<String>,
}

/// Mutable state of one browse session.
struct Session<'a> {
    workspace: &'a Workspace,
    dispatcher: ExecutionDispatcher,
    log: ExecutionLog,
}

/// Runs the interactive session until the operator quits.
pub fn handle(context: &AppContext, args: Vec<String>) -> Result<()> {
    let browse_args = BrowseArgs::try_parse_from(&args)?;

    if context.workspace.is_empty() {
        println!("{}", t!("workspace.empty").yellow());
        return Ok(());
    }

    let gateway: Arc<dyn ExecutionGateway> =
        Arc::new(TerragruntGateway::from_config(&context.config.exec));
    let mut session = Session {
        workspace: &context.workspace,
        dispatcher: ExecutionDispatcher::new(gateway)?,
        log: ExecutionLog::new(),
    };

    let mut preset_region = browse_args.region;
    loop {
        let region = match preset_region.take() {
            Some(region) => region,
            None => match choose_region(session.workspace)? {
                Some(region) => region,
                None => break,
            },
        };
        session.browse_region(&region)?;
    }

    session.finish()
}

/// Asks for the region filter. `None` means the operator wants to quit.
fn choose_region(workspace: &Workspace) -> Result<Option<String>> {
    let mut items = vec![ALL_SELECTOR.to_string()];
    items.extend(workspace.region_names());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("browse.prompt.region"))
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(selection.and_then(|idx| items.get(idx).cloned()))
}

impl Session<'_> {
    /// Lists the files of one region until the operator goes back.
    fn browse_region(&mut self, region: &str) -> Result<()> {
        let workspace = self.workspace;
        let files = workspace.filter_files(&FilterCriteria::region(region));
        if files.is_empty() {
            println!(
                "{}",
                format!(t!("browse.info.no_files_in_region"), region = region).yellow()
            );
            return Ok(());
        }

        let prompt = format!(
            t!("browse.prompt.file"),
            region = region,
            count = files.len()
        );
        loop {
            self.collect_finished();
            match commons::choose_file(&files, &prompt)? {
                Some(file) => self.file_menu(file)?,
                None => return Ok(()),
            }
        }
    }

    fn file_menu(&mut self, file: &TerragruntFile) -> Result<()> {
        let item = FileItem::new(file);
        let actions = [
            t!("browse.action.view"),
            t!("browse.action.run"),
            t!("browse.action.last_output"),
            t!("browse.action.back"),
        ];

        loop {
            self.collect_finished();
            let prompt = format!("{} ({})", item.title(), item.description());
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .items(&actions)
                .default(0)
                .interact_opt()?;

            match choice {
                Some(0) => println!("\n{}", item.rendered_content()),
                Some(1) => self.start_run(file)?,
                Some(2) => println!("\n{}\n", self.last_output(file)),
                _ => return Ok(()),
            }
        }
    }

    fn start_run(&mut self, file: &TerragruntFile) -> Result<()> {
        match self.dispatcher.submit(ExecutionRequest::new(file.path())) {
            Ok(_) => {
                println!(
                    "{}",
                    format!(
                        t!("browse.info.started"),
                        stack = FileItem::new(file).title(),
                        dir = file.working_dir().display()
                    )
                    .cyan()
                );
                Ok(())
            }
            Err(DispatchError::AlreadyRunning { .. }) => {
                println!("{}", t!("browse.info.already_running").yellow());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn last_output(&self, file: &TerragruntFile) -> &str {
        if self.dispatcher.is_running(file.path()) {
            t!("browse.info.still_running")
        } else {
            self.log.last_output(file.path())
        }
    }

    /// Records every run that finished since the last call.
    fn collect_finished(&mut self) {
        while let Some(event) = self.dispatcher.try_next() {
            self.record(event);
        }
    }

    fn record(&mut self, event: ExecutionEvent) {
        let path = event.request.file_path.display().to_string();
        match &event.result {
            Ok(_) => println!(
                "{}",
                format!(t!("browse.info.finished_ok"), path = path).green()
            ),
            Err(e) => println!(
                "{}",
                format!(t!("browse.info.finished_err"), path = path, error = e).red()
            ),
        }
        self.log.record_result(&event.request.file_path, &event.result);
    }

    /// Waits for runs still in flight so their output files are complete before exiting.
    fn finish(mut self) -> Result<()> {
        self.collect_finished();
        if self.dispatcher.in_flight() > 0 {
            println!(
                "{}",
                format!(
                    t!("browse.info.waiting"),
                    count = self.dispatcher.in_flight()
                )
                .dimmed()
            );
        }
        while self.dispatcher.in_flight() > 0 {
            let event = self.dispatcher.wait_next()?;
            self.record(event);
        }
        Ok(())
    }
}
