use gatehouse::application_impl::*;
use gatehouse::application_port::*;
use gatehouse::infra_memory::*;
use gatehouse::logger::*;
use gatehouse::settings::*;
use std::sync::Arc;
use std::time::Duration;

/// Walks the full token lifecycle against the in-memory adapters:
/// registration, login, header parse, rotation, replay rejection, logout.
///
/// $ cargo run --bin auth_demo -- --settings=settings/dev.toml
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_from_config(&LogConfig {
        filter: project_settings.log.filter.clone(),
    })?;

    let signer = Arc::new(JwtHs256Signer::new(SignerConfig {
        issuer: project_settings.auth.issuer.clone(),
        access_ttl: Duration::from_secs(project_settings.auth.access_ttl_secs),
        refresh_ttl: Duration::from_secs(project_settings.auth.refresh_ttl_secs),
        access_secret: project_settings.auth.access_secret.clone().into_bytes(),
        refresh_secret: project_settings.auth.refresh_secret.clone().into_bytes(),
    }));
    let tokens = Arc::new(SessionTokenService::new(
        signer,
        Arc::new(MemoryTokenStore::new()),
    ));
    let auth = RealAuthService::new(
        Arc::new(MemoryUserDirectory::new()),
        Arc::new(Argon2CredentialHasher),
        tokens,
    );

    let registered = auth
        .registration(RegistrationInput {
            email: "demo@example.com".to_string(),
            password: "correct horse battery staple".to_string(),
        })
        .await?;
    info!(user_id = %registered.user_id, "registered");
    println!("{}", serde_json::to_string_pretty(&registered.tokens)?);

    let login = auth
        .login(LoginInput {
            email: "demo@example.com".to_string(),
            password: "correct horse battery staple".to_string(),
        })
        .await?;

    let header = format!("Bearer {}", login.tokens.access_token.0);
    let who = auth.parse_authorization_header(&header).await?;
    info!(%who, "access token verified");

    let rotated = auth.refresh_access_token(&login.tokens.refresh_token).await?;
    info!("refresh token rotated");

    let replay = auth.refresh_access_token(&login.tokens.refresh_token).await;
    info!(replay_rejected = replay.is_err(), "pre-rotation token replay");

    auth.logout(&rotated.refresh_token).await?;
    let after_logout = auth.refresh_access_token(&rotated.refresh_token).await;
    info!(
        refresh_rejected = after_logout.is_err(),
        "session revoked by logout"
    );

    Ok(())
}
