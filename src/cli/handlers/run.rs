use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    cli::{dispatcher::AppContext, handlers::commons, session::FileItem},
    system::{
        dispatch::ExecutionDispatcher,
        executor::{ExecutionGateway, ExecutionRequest, TerragruntGateway},
    },
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Runs Terragrunt in the directory of a file and prints its output."
)]
struct RunArgs {
    /// A file path or a `project/region/stack` selector.
    selector: String,

    /// Run this command line instead of the configured one.
    #[arg(long)]
    command: Option<String>,
}

/// Runs the configured command for one selected file and waits for it.
pub fn handle(context: &AppContext, args: Vec<String>) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let file = commons::resolve_selector(&context.workspace, &run_args.selector)?;

    let mut exec_config = context.config.exec.clone();
    if let Some(command) = run_args.command {
        exec_config.command = command;
    }
    let gateway = TerragruntGateway::from_config(&exec_config);

    println!(
        "{}",
        format!(
            t!("run.info.starting"),
            command = gateway.command_line().cyan(),
            stack = FileItem::new(file).title().bold(),
            dir = file.working_dir().display()
        )
    );

    let gateway: Arc<dyn ExecutionGateway> = Arc::new(gateway);
    let mut dispatcher = ExecutionDispatcher::new(gateway)?;
    dispatcher.submit(ExecutionRequest::new(file.path()))?;
    let event = dispatcher.wait_next()?;

    match event.result {
        Ok(report) => {
            print!("{}", report.output);
            println!(
                "{}",
                format!(
                    t!("run.success.saved"),
                    path = report.output_file.display()
                )
                .green()
            );
            Ok(())
        }
        Err(e) => {
            if let Some(output) = e.captured_output() {
                print!("{}", output);
            }
            Err(e.into())
        }
    }
}
