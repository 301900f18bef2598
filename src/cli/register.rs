// ABOUTME: CLI register command - the four-step registration wizard as line prompts
//
// Drives the same RegistrationState the TUI uses, so validation and submission
// behave identically. An empty answer keeps the value already entered.

use anyhow::{Result, bail};
use serde::Serialize;
use std::io::{self, BufRead, Write};

use super::{OutputFormat, print_json};
use crate::api::{PortalApiClient, RegistrationBackend};
use crate::components::registration::{FormField, RegistrationState, SubmitOutcome};
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
pub struct RegisterOutput {
    pub registered: bool,
    pub message: String,
}

/// Execute the register command
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<()> {
    let client = PortalApiClient::new(&config.api)?;
    let mut wizard = RegistrationState::new();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    // Prompts go to stderr so JSON output stays clean
    let mut prompts = io::stderr();

    let outcome = run_wizard(&mut wizard, &client, &mut input, &mut prompts).await?;

    let output = match outcome {
        SubmitOutcome::Registered => RegisterOutput {
            registered: true,
            message: "Registration successful! You can now sign in.".to_string(),
        },
        SubmitOutcome::Failed | SubmitOutcome::NotReady => RegisterOutput {
            registered: false,
            message: wizard
                .errors
                .general
                .clone()
                .unwrap_or_else(|| "Registration cancelled".to_string()),
        },
    };

    match format {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Text => println!("{}", output.message),
    }
    Ok(())
}

/// Walk the wizard until it registers or the user gives up
pub async fn run_wizard<B, R, W>(
    wizard: &mut RegistrationState,
    backend: &B,
    input: &mut R,
    output: &mut W,
) -> Result<SubmitOutcome>
where
    B: RegistrationBackend,
    R: BufRead,
    W: Write,
{
    loop {
        let step = wizard.current_step;
        writeln!(
            output,
            "\nStep {} of {}: {}\n{}",
            wizard.position(),
            wizard.total_steps(),
            step.title(),
            step.description()
        )?;

        for field in step.fields() {
            prompt_field(wizard, *field, input, output)?;
        }

        if !wizard.is_final_step() {
            if !wizard.next() {
                print_field_errors(wizard, output)?;
            }
            continue;
        }

        match wizard.submit(backend).await {
            SubmitOutcome::Registered => return Ok(SubmitOutcome::Registered),
            SubmitOutcome::NotReady => print_field_errors(wizard, output)?,
            SubmitOutcome::Failed => {
                if let Some(message) = &wizard.errors.general {
                    writeln!(output, "\n{message}")?;
                }
                if wizard.show_sign_in_link {
                    writeln!(output, "Already registered? Run 'ict-portal login --email <EMAIL>'.")?;
                }

                write!(output, "[Enter] retry, [b] back to an earlier step, [q] quit: ")?;
                output.flush()?;
                match read_answer(input)?.as_deref() {
                    None | Some("q") => return Ok(SubmitOutcome::Failed),
                    Some("b") => go_back(wizard, input, output)?,
                    Some(_) => {}
                }
            }
        }
    }
}

fn prompt_field<R: BufRead, W: Write>(
    wizard: &mut RegistrationState,
    field: FormField,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let current = wizard.form.value(field);
    let shown = if field.is_toggle() {
        let answer = if wizard.form.is_retaker { "y" } else { "n" };
        format!(" [y/N: {answer}]")
    } else if current.is_empty() {
        String::new()
    } else if field.is_secret() {
        " [keep]".to_string()
    } else {
        format!(" [{current}]")
    };

    write!(output, "{}{}: ", field.label(), shown)?;
    output.flush()?;

    let Some(answer) = read_answer(input)? else {
        bail!("Registration cancelled");
    };
    if answer.is_empty() {
        return Ok(());
    }

    if field.is_toggle() {
        wizard.set_is_retaker(matches!(answer.to_lowercase().as_str(), "y" | "yes"));
    } else {
        wizard.set_field(field, &answer);
    }
    Ok(())
}

fn go_back<R: BufRead, W: Write>(
    wizard: &mut RegistrationState,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    write!(output, "Go back to step (1-{}): ", wizard.position())?;
    output.flush()?;
    let target = read_answer(input)?
        .and_then(|a| a.parse::<usize>().ok())
        .unwrap_or(wizard.position());

    while wizard.position() > target.max(1) {
        wizard.previous();
    }
    Ok(())
}

fn print_field_errors<W: Write>(wizard: &RegistrationState, output: &mut W) -> Result<()> {
    writeln!(output, "\nPlease fix the following:")?;
    for field in wizard.current_step.fields() {
        if let Some(message) = wizard.errors.get(*field) {
            writeln!(output, "  {}: {}", field.label(), message)?;
        }
    }
    Ok(())
}

/// Next trimmed line, or `None` at end of input
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
