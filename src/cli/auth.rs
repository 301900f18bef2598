// ABOUTME: CLI login, logout and whoami commands
//
// login: validate like the sign-in form, call AUTH.LOGIN, persist the session
// logout: clear the session store
// whoami: print the restored session (text/JSON output)

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use std::io::{self, BufRead, Write};

use super::{LoginArgs, OutputFormat, print_json};
use crate::api::PortalApiClient;
use crate::components::sign_in::{SIGN_IN_FALLBACK_MESSAGE, SignInState};
use crate::config::AppConfig;
use crate::session::{self, Session, SessionStore};

/// JSON output structure for login and whoami
#[derive(Debug, Serialize)]
pub struct SessionOutput {
    pub signed_in: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub dashboard_url: Option<String>,
}

impl SessionOutput {
    pub fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self {
                signed_in: true,
                name: Some(session.user.display_name()),
                email: session.user.email.clone(),
                role: session.user.role.clone(),
                dashboard_url: Some(session.user.dashboard_url.clone()),
            },
            None => Self {
                signed_in: false,
                name: None,
                email: None,
                role: None,
                dashboard_url: None,
            },
        }
    }
}

/// Execute the login command
pub async fn login(args: LoginArgs, config: AppConfig, format: OutputFormat) -> Result<()> {
    let password = if args.password_stdin {
        read_line(&mut io::stdin().lock())?
    } else {
        print!("Password: ");
        io::stdout().flush()?;
        read_line(&mut io::stdin().lock())?
    };

    let mut client = PortalApiClient::new(&config.api)?;
    let store = session::store_from_config(&config.session)?;
    store.init().context("Failed to prepare session storage")?;

    let session = sign_in(&mut client, store.as_ref(), &args.email, &password).await?;

    match format {
        OutputFormat::Json => print_json(&SessionOutput::from_session(Some(&session)))?,
        OutputFormat::Text => {
            println!("Signed in as {}", session.user.display_name());
            println!("Dashboard: {}", session.user.dashboard_url);
        }
    }
    Ok(())
}

/// Sign in through the same checks the form applies and persist the session
pub async fn sign_in(
    client: &mut PortalApiClient,
    store: &dyn SessionStore,
    email: &str,
    password: &str,
) -> Result<Session> {
    let mut form = SignInState::new();
    form.email = email.to_string();
    form.password = password.to_string();

    let Some(request) = form.begin_submit() else {
        let problems: Vec<String> = [form.email_error, form.password_error]
            .into_iter()
            .flatten()
            .collect();
        bail!("{}", problems.join("\n"));
    };

    let data = client
        .login(&request)
        .await
        .map_err(|e| anyhow!(e.user_message(SIGN_IN_FALLBACK_MESSAGE)))?;

    let session = Session::new(data.token, data.user);
    store.save(&session).context("Failed to save session")?;
    client.set_token(Some(session.token.clone()));
    tracing::info!("CLI sign-in for {}", session.user.display_name());
    Ok(session)
}

/// Execute the logout command
pub fn logout(config: AppConfig) -> Result<()> {
    let store = session::store_from_config(&config.session)?;
    store.clear().context("Failed to clear session")?;
    println!("Signed out.");
    Ok(())
}

/// Execute the whoami command
pub fn whoami(config: AppConfig, format: OutputFormat) -> Result<()> {
    let store = session::store_from_config(&config.session)?;
    let restored = session::restore(store.as_ref());

    match format {
        OutputFormat::Json => print_json(&SessionOutput::from_session(restored.as_ref()))?,
        OutputFormat::Text => match restored {
            Some(session) => {
                println!("{}", session.user.display_name());
                if let Some(role) = &session.user.role {
                    println!("Role: {role}");
                }
                println!("Dashboard: {}", session.user.dashboard_url);
            }
            None => println!("Not signed in. Run 'ict-portal login --email <EMAIL>'."),
        },
    }
    Ok(())
}

/// Read one line without its trailing newline
pub(crate) fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
