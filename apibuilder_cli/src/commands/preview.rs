use anyhow::Result;
use apibuilder::ApiEndpoint;
use clap::Args;

use super::RequestArgs;
use crate::output::print_json;

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

/// Prints the resolved URL and transport init data without sending anything.
pub async fn run(args: &PreviewArgs, api: &ApiEndpoint) -> Result<()> {
    let params = args.request.call_params()?;
    let data = args.request.handle(api).request_data(params).await?;
    print_json(&data);
    Ok(())
}
