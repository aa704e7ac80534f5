//! Session state passed explicitly to the controllers
//!
//! `WalletSession`: connect -> usable -> disconnect clears the account.
//! `AuthSession`: sign in -> credential available -> sign out clears it.

use crate::logger::{self, LogTag};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    account: Option<String>,
    chain_id: Option<u64>,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(account: impl Into<String>, chain_id: u64) -> Self {
        let mut session = Self::default();
        session.connect(account, chain_id);
        session
    }

    pub fn connect(&mut self, account: impl Into<String>, chain_id: u64) {
        let account = account.into();
        logger::info(LogTag::Wallet, &format!("Wallet connected: {} on chain {}", account, chain_id));
        self.account = Some(account);
        self.chain_id = Some(chain_id);
    }

    pub fn disconnect(&mut self) {
        if let Some(account) = self.account.take() {
            logger::info(LogTag::Wallet, &format!("Wallet disconnected: {}", account));
        }
        self.chain_id = None;
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

/// Backend access credential for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    tokens: Option<AccessTokens>,
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(access_token: impl Into<String>) -> Self {
        let mut session = Self::default();
        session.sign_in(AccessTokens {
            access_token: access_token.into(),
            refresh_token: None,
        });
        session
    }

    pub fn sign_in(&mut self, tokens: AccessTokens) {
        self.tokens = Some(tokens);
    }

    pub fn sign_out(&mut self) {
        self.tokens = None;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_lifecycle() {
        let mut wallet = WalletSession::disconnected();
        assert!(!wallet.is_connected());

        wallet.connect("0xabc", 1_666_600_000);
        assert_eq!(wallet.account(), Some("0xabc"));
        assert_eq!(wallet.chain_id(), Some(1_666_600_000));

        wallet.disconnect();
        assert_eq!(wallet.account(), None);
        assert_eq!(wallet.chain_id(), None);
    }

    #[test]
    fn test_auth_lifecycle() {
        let mut auth = AuthSession::signed_in("jwt");
        assert_eq!(auth.access_token(), Some("jwt"));
        auth.sign_out();
        assert_eq!(auth.access_token(), None);
    }
}
