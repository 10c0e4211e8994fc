use clap::Args;
use jiff::Timestamp;
use trolley_app::{auth::PgAuthService, database, domain::users::UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User whose tokens should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let tokens = PgAuthService::new(pool)
        .list_api_tokens(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    let now = Timestamp::now();

    for token in tokens {
        let status = match (token.is_active_at(now), token.revoked_at, token.expires_at) {
            (false, Some(revoked_at), _) => format!("revoked {revoked_at}"),
            (false, None, Some(expires_at)) => format!("expired {expires_at}"),
            (true, _, Some(expires_at)) => format!("active, expires {expires_at}"),
            _ => "active".to_string(),
        };

        let last_used = token
            .last_used_at
            .map_or_else(|| "never".to_string(), |value| value.to_string());

        println!(
            "{}  created {}  last used {last_used}  {status}",
            token.uuid, token.created_at
        );
    }

    Ok(())
}
