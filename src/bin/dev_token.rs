//! Mints a bearer token for local testing against a dev server.
//!
//! Usage: `dev_token <user_id> [email] [ttl_secs]` with `JWT_SECRET` set.

use anyhow::{anyhow, Result};
use hotdog_oracle::auth::jwt::issue_token;
use std::env;

const DEFAULT_TTL_SECS: i64 = 60 * 60 * 24;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let secret = dotenvy::var("JWT_SECRET").map_err(|_| anyhow!("JWT_SECRET is not set"))?;

    let mut args = env::args().skip(1);
    let user_id = args
        .next()
        .ok_or_else(|| anyhow!("usage: dev_token <user_id> [email] [ttl_secs]"))?;
    let email = args.next();
    let ttl = match args.next() {
        Some(raw) => raw.parse()?,
        None => DEFAULT_TTL_SECS,
    };

    let token = issue_token(&secret, &user_id, email.as_deref(), ttl)?;
    println!("{token}");
    Ok(())
}
