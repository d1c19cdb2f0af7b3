//! Session commands — login, register, logout, whoami.

use anyhow::{Result, bail};
use console::style;
use dialoguer::{Input, Password};
use regex::Regex;
use std::sync::LazyLock;

use revq::api::models::{LoginRequest, RegisterRequest};
use revq::ui::icons::{LOCK, SPARKLE};
use revq::ui::render;

use super::Ctx;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid static regex")
});

const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn cmd_login(ctx: &Ctx, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    validate_email(&email)?;
    let password = Password::new().with_prompt("Password").interact()?;

    let token = ctx
        .client
        .login(&LoginRequest { email, password })
        .await?;
    println!(
        "{}Logged in as {}",
        LOCK,
        style(&token.user.name).bold()
    );
    Ok(())
}

pub async fn cmd_register(ctx: &Ctx) -> Result<()> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    validate_email(&email)?;
    let name: String = Input::new().with_prompt("Name").interact_text()?;
    if name.trim().is_empty() {
        bail!("Name cannot be empty");
    }
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    if password.len() < MIN_PASSWORD_LENGTH {
        bail!("Password must be at least {} characters", MIN_PASSWORD_LENGTH);
    }

    let token = ctx
        .client
        .register(&RegisterRequest {
            email,
            name,
            password,
        })
        .await?;
    println!(
        "{}Account created. Logged in as {}",
        SPARKLE,
        style(&token.user.name).bold()
    );
    Ok(())
}

pub async fn cmd_logout(ctx: &Ctx) -> Result<()> {
    if !ctx.client.credentials().is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    ctx.client.logout().await?;
    println!("Logged out.");
    Ok(())
}

pub async fn cmd_whoami(ctx: &Ctx) -> Result<()> {
    if !ctx.client.credentials().is_authenticated() {
        bail!("Not logged in. Run `revq login` first.");
    }
    let user = ctx.client.profile().await?;
    render::print_user(&user);
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        bail!("'{}' does not look like an email address", email);
    }
    Ok(())
}
