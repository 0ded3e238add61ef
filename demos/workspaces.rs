use std::sync::Arc;

use briq::{
    CreateWorkspace, Description, EnvConfig, Pagination, RetryEvent, WorkspaceListParams,
    WorkspaceName,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let client = EnvConfig::from_env()?
        .into_builder()
        .observer(Arc::new(|event: &RetryEvent<'_>| {
            if let RetryEvent::Retrying { attempt, delay, .. } = event {
                eprintln!("attempt {attempt} failed, retrying in {delay:?}");
            }
        }))
        .build()?;

    if !client.test_connection().await {
        return Err("could not reach the Briq API with the configured key".into());
    }

    if let Ok(name) = std::env::var("BRIQ_WORKSPACE_NAME") {
        let request = CreateWorkspace::new(WorkspaceName::new(name)?)
            .with_description(Description::new("Created by the briq demo")?);
        let created = client.workspaces().create(&request).await?;
        if let Some(workspace) = created.data {
            println!("created workspace {} ({})", workspace.name, workspace.workspace_id);
        }
    }

    let params = WorkspaceListParams {
        pagination: Pagination::page(1, 20)?,
        search: None,
    };
    let page = client.workspaces().list(&params).await?;
    println!(
        "page {}/{} ({} total)",
        page.pagination.page, page.pagination.total_pages, page.pagination.total
    );
    for workspace in page.data {
        println!("- {} {}", workspace.workspace_id, workspace.name);
    }

    Ok(())
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,briq=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
