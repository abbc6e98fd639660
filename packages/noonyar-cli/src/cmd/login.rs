//! Interactive phone login

use anyhow::Result;
use dialoguer::{Input, Select};
use otp_login::{
    CodeOutcome, Destination, HttpAccountsApi, LoginController, LoginDeps, LoginStep, Navigator,
    PhoneOutcome, ResendOutcome, SubmitOutcome, TimerService, CODE_LENGTH,
};
use std::sync::Arc;

use crate::context::CliContext;

/// Prints the page the browser client would open next
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: Destination) {
        let next = match destination {
            Destination::Signup => "Phone verified. Finish registration at",
            Destination::Dashboard => "Signed in. Continue at",
        };
        println!("{} {}", next, console::style(destination.path()).cyan());
    }
}

pub async fn run(ctx: &CliContext, phone: Option<String>) -> Result<()> {
    let deps = LoginDeps {
        accounts: Arc::new(HttpAccountsApi::from_config(&ctx.config)?),
        tokens: Arc::new(ctx.token_store()),
        navigator: Arc::new(TerminalNavigator),
    };
    let mut login = LoginController::new(deps, TimerService::default(), ctx.config.login_settings());

    ctx.print_header("Noonyar sign in");

    let mut pending_phone = phone;
    loop {
        match login.step() {
            LoginStep::PhoneEntry => {
                let raw = match pending_phone.take() {
                    Some(phone) => phone,
                    None => Input::<String>::with_theme(&ctx.theme())
                        .with_prompt("Phone number (09XXXXXXXXX)")
                        .interact_text_on(&ctx.term)?,
                };
                login.set_phone(&raw);

                match login.handle_submit().await {
                    SubmitOutcome::Phone(PhoneOutcome::CodeSent) => {
                        ctx.print_success(&format!("Code sent to {}", login.draft().phone));
                    }
                    _ => report_phone_error(ctx, &login),
                }
            }
            LoginStep::CodeVerification => {
                if !prompt_code_step(ctx, &mut login).await? {
                    return Ok(());
                }
            }
            LoginStep::SignupRequired | LoginStep::Authenticated => {
                ctx.print_info(&format!(
                    "Session saved to {}",
                    ctx.config.token_store_path.display()
                ));
                return Ok(());
            }
        }
    }
}

/// One round of the code step. Returns false when the user quits.
async fn prompt_code_step(ctx: &CliContext, login: &mut LoginController) -> Result<bool> {
    let resend_label = match login.countdown() {
        0 => "Resend code".to_string(),
        secs => format!("Resend code (available in {}:{:02})", secs / 60, secs % 60),
    };
    let items = [
        "Enter code".to_string(),
        resend_label,
        "Change phone number".to_string(),
        "Quit".to_string(),
    ];

    let selection = Select::with_theme(&ctx.theme())
        .with_prompt(format!("Code sent to {}", login.draft().phone))
        .items(&items)
        .default(0)
        .interact_on(&ctx.term)?;

    match selection {
        0 => {
            let entered: String = Input::with_theme(&ctx.theme())
                .with_prompt(format!("{}-digit code", CODE_LENGTH))
                .allow_empty(true)
                .interact_text_on(&ctx.term)?;
            type_code(login, &entered);

            if let SubmitOutcome::Code(CodeOutcome::Incomplete | CodeOutcome::Rejected) =
                login.handle_submit().await
            {
                if let Some(message) = login.draft().code_error_message() {
                    ctx.print_error(message);
                }
            }
        }
        1 => match login.resend_code().await {
            ResendOutcome::CoolingDown { remaining } => {
                ctx.print_warning(&format!("Please wait {} more seconds.", remaining));
            }
            ResendOutcome::Resent(PhoneOutcome::CodeSent) => {
                ctx.print_success("A new code is on its way.");
            }
            ResendOutcome::Resent(_) => report_phone_error(ctx, login),
        },
        2 => login.edit_phone(),
        _ => return Ok(false),
    }

    Ok(true)
}

/// Feed the entered text into the slots one at a time, as typing would.
fn type_code(login: &mut LoginController, entered: &str) {
    let digits: Vec<char> = entered.chars().filter(|c| !c.is_whitespace()).collect();
    for index in 0..CODE_LENGTH {
        let value = digits.get(index).map(|c| c.to_string()).unwrap_or_default();
        login.input_digit(index, &value);
    }
}

fn report_phone_error(ctx: &CliContext, login: &LoginController) {
    if let Some(message) = &login.draft().phone_error {
        ctx.print_error(message);
    }
}
