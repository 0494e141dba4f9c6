use owo_colors::OwoColorize;
use serde_json::json;

use crate::auth::AuthSession;
use crate::error::Result;

use super::print_json;

/// Sign in and write the session marker
pub fn cmd_login(username: &str) -> Result<()> {
    let marker = AuthSession::default().login(username)?;
    println!("Signed in as {}", marker.username.cyan());
    Ok(())
}

/// Remove the session marker
pub fn cmd_logout() -> Result<()> {
    if AuthSession::default().logout()? {
        println!("Signed out");
    } else {
        println!("{}", "Not signed in".dimmed());
    }
    Ok(())
}

/// Show the signed-in user
pub fn cmd_whoami(output_json: bool) -> Result<()> {
    let marker = AuthSession::default().require()?;

    if output_json {
        return print_json(&json!({
            "username": marker.username,
            "signedInAt": marker.signed_in_at.to_string(),
        }));
    }

    println!(
        "{} (since {})",
        marker.username.cyan(),
        marker.signed_in_at.to_string().dimmed()
    );
    Ok(())
}
