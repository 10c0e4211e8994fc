use clap::Args;
use jiff::Timestamp;
use trolley_app::{auth::PgAuthService, database, domain::users::UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User the token authenticates as
    #[arg(long)]
    user_uuid: Uuid,

    /// Optional token expiration timestamp (RFC 3339)
    #[arg(long)]
    expires_at: Option<Timestamp>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    if let Some(expires_at) = args.expires_at
        && expires_at <= Timestamp::now()
    {
        return Err("expires-at must be in the future".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(UserUuid::from_uuid(args.user_uuid), args.expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_created_at: {}", issued.metadata.created_at);
    if let Some(expires_at) = issued.metadata.expires_at {
        println!("token_expires_at: {expires_at}");
    }
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
