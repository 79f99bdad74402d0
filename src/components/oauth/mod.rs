mod client;
mod credential;
mod store;
mod token;

pub use client::{OAuthClient, CALENDAR_READONLY_SCOPE, CALLBACK_PATH};
pub use credential::UserCredential;
pub use store::CredentialFile;
pub use token::{GoogleTokenEndpoint, TokenEndpoint, TokenGrant};

/// Path that starts the authorization flow
pub const AUTHORIZE_PATH: &str = "/oauth2authorize";

/// Requests under this prefix belong to the authorization flow itself
pub const OAUTH_PATH_PREFIX: &str = "/oauth2";

/// Whether `path` is part of the authorization flow
pub fn is_oauth_flow(path: &str) -> bool {
    path.starts_with(OAUTH_PATH_PREFIX)
}
