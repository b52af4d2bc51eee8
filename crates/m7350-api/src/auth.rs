// Authenticator endpoints
//
// Login is a two-step handshake on `auth_cgi`:
//   1. `{"module":"authenticator","action":0}` returns a `nonce`
//   2. `{"module":"authenticator","action":1,"digest":md5(password:nonce)}`
//      returns the session `token` and the `authedIP`
// Every later request echoes the token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{M7350Client, Session, non_empty_str, result_of};
use crate::codes::{AuthResult, AuthenticatorAction, ModuleAction};
use crate::digest::login_digest;
use crate::error::Error;
use crate::models::LoginAttempts;

impl M7350Client {
    /// Authenticate with the stored admin password.
    ///
    /// Replaces any session already held.
    pub async fn login(&self) -> Result<(), Error> {
        debug!("requesting login nonce");
        let load = self
            .auth_call(AuthenticatorAction::Load, Map::new())
            .await?;

        let nonce = non_empty_str(&load, "nonce").ok_or_else(|| Error::Authentication {
            message: "device returned no login nonce".into(),
        })?;

        let digest = self.with_password(|password| login_digest(password, nonce));

        let mut payload = Map::new();
        payload.insert("digest".into(), Value::from(digest));

        let reply = self
            .auth_call(AuthenticatorAction::Login, payload)
            .await?;

        let Some(token) = non_empty_str(&reply, "token") else {
            let code = result_of(&reply).map_or(AuthResult::Failure, AuthResult::from_code);
            debug!(%code, "login rejected");
            return Err(Error::LoginRejected { code });
        };

        let authed_ip = non_empty_str(&reply, "authedIP").map(str::to_owned);
        self.set_session(Some(Session::new(token.to_owned(), authed_ip)));

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// A no-op when no session is held.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.is_logged_in() {
            return Ok(());
        }

        debug!("logging out");
        let reply = self
            .auth_call(AuthenticatorAction::Logout, Map::new())
            .await?;

        match result_of(&reply).map(AuthResult::from_code) {
            Some(AuthResult::Success) => {
                self.set_session(None);
                debug!("logout complete");
                Ok(())
            }
            Some(code) => Err(Error::AuthCgi {
                action: AuthenticatorAction::Logout.code(),
                code,
            }),
            None => Err(Error::MissingField { field: "result" }),
        }
    }

    /// Number of failed login attempts recorded by the device.
    ///
    /// Does not require a session.
    pub async fn login_attempts(&self) -> Result<LoginAttempts, Error> {
        let reply = self
            .auth_call(AuthenticatorAction::GetAttempts, Map::new())
            .await?;
        serde_json::from_value(reply.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: reply.to_string(),
        })
    }

    /// Change the admin password.
    ///
    /// The device invalidates the session on success, so it is dropped and
    /// the new password is used for the next login.
    pub async fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), Error> {
        let mut payload = Map::new();
        payload.insert(
            "password".into(),
            Value::from(old_password.expose_secret()),
        );
        payload.insert(
            "newPassword".into(),
            Value::from(new_password.expose_secret()),
        );

        debug!("changing admin password");
        self.execute(AuthenticatorAction::Update, payload).await?;

        self.set_password(new_password.clone());
        self.set_session(None);
        Ok(())
    }
}
