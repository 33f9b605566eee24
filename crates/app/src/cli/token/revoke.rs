use clap::Args;
use dishpatch_app::auth::PgAuthService;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// The raw bearer token to revoke
    #[arg(long, env = "DISHPATCH_TOKEN", hide_env_values = true)]
    token: String,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let revoked = PgAuthService::new(db)
        .revoke_api_token(&args.token)
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    if revoked {
        println!("token revoked");
    } else {
        println!("token was not active");
    }

    Ok(())
}
