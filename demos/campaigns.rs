use std::io;

use briq::{
    BriqClient, CampaignId, CampaignListParams, CampaignName, CreateCampaign, LaunchDate,
    WorkspaceId,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let workspace_raw = std::env::var("BRIQ_WORKSPACE_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "BRIQ_WORKSPACE_ID environment variable is required",
        )
    })?;
    let workspace_id = WorkspaceId::new(workspace_raw)?;
    let client = BriqClient::from_env()?;

    if !client.workspaces().exists(&workspace_id).await? {
        return Err(format!("workspace {} does not exist", workspace_id.as_str()).into());
    }

    if let Ok(launch) = std::env::var("BRIQ_LAUNCH_DATE") {
        let request = CreateCampaign {
            name: CampaignName::new("briq demo campaign")?,
            description: None,
            workspace_id: workspace_id.clone(),
            launch_date: LaunchDate::parse(&launch)?,
        };
        let created = client.campaigns().create(&request).await?;
        if let Some(campaign) = created.data {
            println!("created campaign {} ({})", campaign.name, campaign.campaign_id);

            if std::env::var("BRIQ_DELETE_CREATED").is_ok() {
                let id = CampaignId::new(campaign.campaign_id)?;
                let deleted = client.campaigns().delete(&id).await?;
                println!("deleted: {:?}", deleted.data.map(|ack| ack.deleted));
            }
        }
    }

    let params = CampaignListParams {
        workspace_id: Some(workspace_id),
        ..CampaignListParams::default()
    };
    let page = client.campaigns().list(&params).await?;
    for campaign in page.data {
        println!(
            "- {} {} launch={}",
            campaign.campaign_id,
            campaign.name,
            campaign.launch_date.as_deref().unwrap_or("-")
        );
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
