use anyhow::{Context, Result, bail};
use serde_json::Value;

use sgms_auth::{Decision, Portal};
use sgms_client::{Console, PortalOutcome};
use sgms_core::Role;

pub async fn login(
    console: &Console,
    portal: Portal,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = password.context("password required: pass --password or set SGMS_PASSWORD")?;

    match console.portal_login().submit(portal, email, &password).await {
        PortalOutcome::Entered {
            portal,
            identity,
            redirect_to,
        } => {
            println!("{}", portal_banner(portal));
            println!("Logged in as {} ({})", identity.full_name, identity.role);
            println!("-> {redirect_to}");
            Ok(())
        }
        PortalOutcome::RoleMismatch {
            message,
            actual_role,
            actual_landing,
        } => {
            // Still logged in; the session is usable from the right portal.
            println!("Your dashboard: {actual_landing}");
            println!("{}", retry_hint(actual_role));
            bail!(message)
        }
        PortalOutcome::Failed { message, kind } => bail!("{message} ({kind})"),
    }
}

fn portal_banner(portal: Portal) -> String {
    format!("{} - {}", portal.title(), portal.description())
}

fn retry_hint(actual_role: Role) -> String {
    format!("Next time use: --portal {}", Portal::for_role(actual_role).name())
}

pub fn whoami(console: &Console) -> Result<()> {
    let Some(identity) = console.context().current_user() else {
        bail!("not logged in");
    };
    println!("{}", serde_json::to_string_pretty(&identity)?);
    Ok(())
}

pub fn logout(console: &Console) -> Result<()> {
    console.context().logout();
    println!("Logged out");
    Ok(())
}

pub fn check(console: &Console, path: &str) -> Result<()> {
    let decision = console.context().authorize_path(path);
    match &decision {
        Decision::Allow => println!("allow {path}"),
        Decision::RedirectTo { path: target, .. } => println!("redirect {path} -> {target}"),
    }
    println!("{}", decision.explain());
    Ok(())
}

pub fn parse_body(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("request body must be valid JSON")
}

pub fn print(payload: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
