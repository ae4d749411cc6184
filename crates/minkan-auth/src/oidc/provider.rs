//! OpenID Connect relying party using the authorization-code flow.

use async_trait::async_trait;
use moka::future::Cache;
use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointMaybeSet, EndpointNotSet,
    EndpointSet, IssuerUrl, Nonce, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope,
    TokenResponse,
};
use tracing::{info, warn};
use validator::Validate;

use minkan_core::AppResult;
use minkan_core::config::OidcConfig;
use minkan_core::error::{AppError, ErrorKind};

use super::{AuthorizationRequest, IdentityProvider, VerifiedIdentity};

/// Client shape produced by discovery: authorization endpoint known, token
/// and userinfo endpoints present only if the issuer advertises them.
type DiscoveredClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// Secrets that must survive between the redirect and the callback.
#[derive(Clone)]
struct PendingLogin {
    nonce: String,
    pkce_verifier: Option<String>,
}

/// Relying party for a single issuer.
///
/// Every authorization request parks its nonce and PKCE verifier in a TTL
/// cache keyed by `state`; the callback consumes the entry, so each `state`
/// is redeemable once.
pub struct OidcProvider {
    client: DiscoveredClient,
    http: openidconnect::reqwest::Client,
    pending: Cache<String, PendingLogin>,
    enable_pkce: bool,
}

impl OidcProvider {
    /// Fetch the issuer's discovery document and build the client.
    pub async fn discover(config: &OidcConfig) -> AppResult<Self> {
        if config.client_id.is_empty() {
            return Err(AppError::configuration("oidc.client_id is not set"));
        }
        config
            .validate()
            .map_err(|e| AppError::configuration(format!("Invalid oidc settings: {e}")))?;

        let http = openidconnect::reqwest::ClientBuilder::new()
            // Never follow redirects from the issuer.
            .redirect(openidconnect::reqwest::redirect::Policy::none())
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e))?;

        let issuer = IssuerUrl::new(config.issuer.clone()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid oidc.issuer", e)
        })?;
        let redirect = RedirectUrl::new(config.redirect_url.clone()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid oidc.redirect_url", e)
        })?;

        let metadata = CoreProviderMetadata::discover_async(issuer, &http)
            .await
            .map_err(|e| AppError::external(format!("OIDC discovery failed: {e}")))?;

        let client_secret = (!config.client_secret.is_empty())
            .then(|| ClientSecret::new(config.client_secret.clone()));

        let client = CoreClient::from_provider_metadata(
            metadata,
            ClientId::new(config.client_id.clone()),
            client_secret,
        )
        .set_redirect_uri(redirect);

        let pending = Cache::builder()
            .time_to_live(config.state_ttl())
            .build();

        info!(issuer = %config.issuer, pkce = config.enable_pkce, "OIDC provider ready");

        Ok(Self {
            client,
            http,
            pending,
            enable_pkce: config.enable_pkce,
        })
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    async fn authorization_request(&self) -> AppResult<AuthorizationRequest> {
        let mut request = self
            .client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()));

        let mut pkce_verifier = None;
        if self.enable_pkce {
            let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
            request = request.set_pkce_challenge(challenge);
            pkce_verifier = Some(verifier.secret().clone());
        }

        let (url, state, nonce) = request.url();
        let state = state.secret().clone();

        self.pending
            .insert(
                state.clone(),
                PendingLogin {
                    nonce: nonce.secret().clone(),
                    pkce_verifier,
                },
            )
            .await;

        Ok(AuthorizationRequest {
            url: url.to_string(),
            state,
        })
    }

    async fn exchange(&self, code: &str, state: &str) -> AppResult<VerifiedIdentity> {
        let Some(pending) = self.pending.remove(state).await else {
            warn!("Callback with unknown or expired state");
            return Err(AppError::authentication("Unknown or expired login state"));
        };

        let mut request = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| AppError::configuration(format!("Issuer has no token endpoint: {e}")))?;
        if let Some(verifier) = pending.pkce_verifier {
            request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier));
        }

        let token = request
            .request_async(&self.http)
            .await
            .map_err(|e| AppError::external(format!("Token exchange failed: {e}")))?;

        let id_token = token
            .id_token()
            .ok_or_else(|| AppError::external("Provider returned no ID token"))?;

        let verifier = self.client.id_token_verifier();
        let claims = id_token
            .claims(&verifier, &Nonce::new(pending.nonce))
            .map_err(|e| AppError::authentication(format!("ID token rejected: {e}")))?;

        let email = claims
            .email()
            .map(|e| e.as_str().to_owned())
            .unwrap_or_default();
        let display_name = claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.as_str().to_owned())
            .unwrap_or_else(|| email.clone());

        Ok(VerifiedIdentity {
            issuer: claims.issuer().as_str().to_owned(),
            subject: claims.subject().as_str().to_owned(),
            display_name,
            email,
            email_verified: claims.email_verified().unwrap_or(false),
        })
    }
}
