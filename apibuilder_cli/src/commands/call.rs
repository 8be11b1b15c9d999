use anyhow::Result;
use apibuilder::ApiEndpoint;
use clap::Args;

use super::RequestArgs;
use crate::output::{print_json, print_raw};

#[derive(Args)]
pub struct CallArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Print status and body text instead of parsed JSON
    #[arg(long)]
    pub raw: bool,
}

pub async fn run(args: &CallArgs, api: &ApiEndpoint) -> Result<()> {
    let params = args.request.call_params()?;
    let handle = args.request.handle(api);

    if args.raw {
        let response = handle.raw().call(params).await?;
        print_raw(&response);
        return Ok(());
    }

    let reply = handle.call(params).await?;
    print_json(&reply);
    Ok(())
}
