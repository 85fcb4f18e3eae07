//! `tourmap token`

use chrono::Utc;
use clap::Args;
use std::fmt;
use tourmap::Credential;

#[derive(Clone, Args)]
pub(crate) struct TokenArgs {
    /// Bearer token to inspect
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub(crate) api_token: String,
}

impl fmt::Debug for TokenArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenArgs")
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

pub(crate) fn run(args: &TokenArgs) -> anyhow::Result<()> {
    let now = Utc::now();
    let info = Credential::new(args.api_token.as_str()).validate_at(now)?;

    println!("expires: {}", info.expires_at.to_rfc3339());
    if let Some(issued_at) = info.issued_at {
        println!("issued:  {}", issued_at.to_rfc3339());
    }
    let remaining = info.expires_at - now;
    println!(
        "valid for {}h {}m{}",
        remaining.num_hours(),
        remaining.num_minutes() % 60,
        if info.expires_soon(now) {
            " (expires soon)"
        } else {
            ""
        }
    );
    Ok(())
}
