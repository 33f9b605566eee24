use clap::Args;
use dishpatch_app::{auth::PgAuthService, users::UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User the token authenticates as
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let issued = PgAuthService::new(db)
        .issue_api_token(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.uuid);
    println!("user_uuid: {}", issued.user_uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
