//! Login page object: credential entry, optional MFA, logout.

use std::time::Duration;

use tracing::{error, info};

use crate::config::FrameworkConfig;
use crate::driver::{LivePage, PageHandle};
use crate::error::Result;
use crate::mfa;
use crate::pages::sources;
use crate::repository::{LocatorRepository, Lookup};

/// How long to wait for the MFA prompt before deciding it is not required.
const MFA_PROMPT_TIMEOUT: Duration = Duration::from_secs(5);
/// Wait applied around navigation-heavy steps.
const NAV_TIMEOUT: Duration = Duration::from_secs(30);
/// Settle time before reading the post-login URL.
const POST_LOGIN_SETTLE: Duration = Duration::from_secs(6);
/// The login widgets finish wiring up shortly after first paint; filling
/// them earlier loses keystrokes.
const PRE_LOGIN_SETTLE: Duration = Duration::from_secs(3);

pub struct LoginPage<'a> {
    page: &'a PageHandle,
    repository: &'a LocatorRepository,
    config: &'a FrameworkConfig,
}

impl<'a> LoginPage<'a> {
    pub fn new(
        page: &'a PageHandle,
        repository: &'a LocatorRepository,
        config: &'a FrameworkConfig,
    ) -> Self {
        Self {
            page,
            repository,
            config,
        }
    }

    pub async fn is_forgot_pwd_link_visible(&self) -> Result<bool> {
        let selector = self.repository.require("lnkForgotPassword", sources::LOGIN)?;
        self.page.is_visible(&selector).await
    }

    pub async fn is_azure_ad_link_visible(&self) -> Result<bool> {
        let selector = self.repository.require("lnkAzureAd", sources::LOGIN)?;
        self.page.is_visible(&selector).await
    }

    /// Logs in with the given credentials, completing the MFA challenge when
    /// the application presents one.
    ///
    /// Returns whether the browser landed on the configured home URL.
    pub async fn login_with_mfa(&self, username: &str, password: &str) -> Result<bool> {
        info!(username, "logging in");

        let username_field = self.repository.require("txtUsername", sources::LOGIN)?;
        tokio::time::sleep(PRE_LOGIN_SETTLE).await;
        self.page.reload().await?;
        self.page.fill(&username_field, username).await?;

        let password_field = self.repository.require("txtPassword", sources::LOGIN)?;
        self.page.fill(&password_field, password).await?;

        let login_button = self.repository.require("btnLogin", sources::LOGIN)?;
        self.page.click(&login_button).await?;
        info!("login submitted");

        match self.mfa_prompt().await {
            Some(mfa_input) => {
                info!("MFA prompt detected, generating TOTP code");
                let secret_key = mfa::secret_key_for(username);
                let Some(secret) = self.config.auth.mfa_secrets.get(secret_key) else {
                    error!(username, secret_key, "MFA secret not configured");
                    return Ok(false);
                };
                let code = mfa::generate_code(secret)?;
                self.page.fill(&mfa_input, &code).await?;

                let submit = self.repository.require("btnMfaSubmit", sources::LOGIN)?;
                self.page.click(&submit).await?;
                info!("MFA code submitted");
            }
            None => info!("MFA not required"),
        }

        tokio::time::sleep(POST_LOGIN_SETTLE).await;
        let current_url = self.page.url().await?;
        info!(url = %current_url, "post-login URL");

        if current_url == self.config.app.home_url {
            info!("login successful");
            Ok(true)
        } else {
            error!(url = %current_url, "login unsuccessful; still on the login page");
            Ok(false)
        }
    }

    /// Logs out via the profile menu and confirms the login form is back.
    pub async fn logout(&self) -> Result<bool> {
        let profile_icon = self.repository.require("ico_Profile", sources::LANDING)?;

        // Dismiss the "remind me later" prompt when the working screen
        // shows one.
        let later_button = self.repository.require("btn_Later", sources::WORKING)?;
        if self.page.is_visible(&later_button).await? {
            self.page.click(&later_button).await?;
            self.page
                .wait_for_selector(&profile_icon, NAV_TIMEOUT)
                .await?;
        }

        self.page
            .wait_for_selector(&profile_icon, NAV_TIMEOUT)
            .await?;
        self.page.click(&profile_icon).await?;

        let logout_link = self.repository.require("lnk_Logout", sources::LANDING)?;
        self.page
            .wait_for_selector(&logout_link, NAV_TIMEOUT)
            .await?;
        self.page.click(&logout_link).await?;

        let username_field = self.repository.require("txtUsername", sources::LOGIN)?;
        self.page
            .wait_for_selector(&username_field, NAV_TIMEOUT)
            .await?;
        self.page.is_visible(&username_field).await
    }

    /// Waits briefly for the MFA code input; `None` means the application
    /// went straight through (MFA not enrolled or not required).
    async fn mfa_prompt(&self) -> Option<String> {
        let selector = match self.repository.resolve("txtMfaCode", sources::LOGIN) {
            Lookup::Found(selector) => selector,
            Lookup::KeyMissing | Lookup::SourceMissing => return None,
        };
        match self
            .page
            .wait_for_selector(&selector, MFA_PROMPT_TIMEOUT)
            .await
        {
            Ok(()) => Some(selector),
            Err(_) => None,
        }
    }
}
