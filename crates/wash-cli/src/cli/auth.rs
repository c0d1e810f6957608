use super::explain;
use clap::Args;
use wash_cli::App;
use wash_core::{Account, AuthPurpose};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Mobile number, without the country code
    phone: String,

    /// Create a new account instead of logging in
    #[arg(long)]
    sign_up: bool,
}

#[derive(Debug, Args)]
pub(crate) struct VerifyArgs {
    /// Mobile number the code was sent to
    phone: String,

    /// 6-digit verification code
    code: String,

    /// Finish a sign-up instead of a login
    #[arg(long)]
    sign_up: bool,
}

fn purpose(sign_up: bool) -> AuthPurpose {
    if sign_up {
        AuthPurpose::SignUp
    } else {
        AuthPurpose::Login
    }
}

pub(crate) async fn login(app: &App, args: LoginArgs) -> anyhow::Result<()> {
    Account::new(app.ctx.clone())
        .request_otp(purpose(args.sign_up), &args.phone)
        .await
        .map_err(explain)?;
    println!("Run `carwash verify {} <code>` once the code arrives", args.phone.trim());
    Ok(())
}

pub(crate) async fn verify(app: &App, args: VerifyArgs) -> anyhow::Result<()> {
    Account::new(app.ctx.clone())
        .verify_otp(purpose(args.sign_up), &args.phone, &args.code)
        .await
        .map_err(explain)
}

pub(crate) fn logout(app: &App) -> anyhow::Result<()> {
    Account::new(app.ctx.clone()).logout().map_err(explain)
}
