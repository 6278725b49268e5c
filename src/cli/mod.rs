use crate::app::{
    CallbackFlow, SubmitBlocked, TripCreateModel, TripDetailModel, TripListModel, spawn_fetch,
};
use crate::domain::{
    CallbackOutcome, LoginRequest, RedirectParams, RegisterRequest, Route, TripForm, TripId,
};
use crate::infra::{
    ApiClient, Config, HttpError, LoadStorageError, ProviderSessionFile, SaveStorageError,
    SessionStore, UreqTransport,
};
use crate::ui::{render_dashboard, render_identity, render_trip_detail};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::channel;
use thiserror::Error;
use tracing::info;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Command(CliCommand),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CallbackSource {
    Redirect(String),
    ProviderSession(PathBuf),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    Register {
        username: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    WhoAmI,
    Callback(CallbackSource),
    Trips,
    Trip {
        trip_id: TripId,
    },
    Plan {
        form: TripForm,
    },
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("missing required flag: {0}")]
    MissingFlag(&'static str),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut iter = args.iter().skip(1);
    let Some(subcommand) = iter.next() else {
        return Ok(CliInvocation::Command(CliCommand::Trips));
    };

    let command = match subcommand.as_str() {
        "register" => {
            let mut username = None;
            let mut email = None;
            let mut password = None;
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--username" | "-u" => username = Some(next_value(&mut iter, "--username")?),
                    "--email" | "-e" => email = Some(next_value(&mut iter, "--email")?),
                    "--password" | "-p" => password = Some(next_value(&mut iter, "--password")?),
                    _ => return Err(unexpected(arg)),
                }
            }
            CliCommand::Register {
                username: username.ok_or(CliParseError::MissingFlag("--username"))?,
                email: email.ok_or(CliParseError::MissingFlag("--email"))?,
                password: password.ok_or(CliParseError::MissingFlag("--password"))?,
            }
        }
        "login" => {
            let mut email = None;
            let mut password = None;
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--email" | "-e" => email = Some(next_value(&mut iter, "--email")?),
                    "--password" | "-p" => password = Some(next_value(&mut iter, "--password")?),
                    _ => return Err(unexpected(arg)),
                }
            }
            CliCommand::Login {
                email: email.ok_or(CliParseError::MissingFlag("--email"))?,
                password: password.ok_or(CliParseError::MissingFlag("--password"))?,
            }
        }
        "logout" => {
            no_more_args(iter)?;
            CliCommand::Logout
        }
        "whoami" => {
            no_more_args(iter)?;
            CliCommand::WhoAmI
        }
        "callback" => {
            let mut source = None;
            while let Some(arg) = iter.next() {
                let next = match arg.as_str() {
                    "--provider-session" => CallbackSource::ProviderSession(PathBuf::from(
                        next_value(&mut iter, "--provider-session")?,
                    )),
                    // A bare `-` is stdin for --provider-session, never a flag here.
                    _ if arg.starts_with('-') && arg != "-" => {
                        return Err(CliParseError::UnknownFlag(arg.to_string()));
                    }
                    _ => CallbackSource::Redirect(arg.to_string()),
                };
                if source.is_some() {
                    return Err(CliParseError::UnexpectedArgument(arg.to_string()));
                }
                source = Some(next);
            }
            CliCommand::Callback(source.ok_or(CliParseError::MissingArgument("callback-url"))?)
        }
        "trips" | "dashboard" => {
            no_more_args(iter)?;
            CliCommand::Trips
        }
        "trip" => {
            let mut trip_id = None;
            for arg in iter {
                if arg.starts_with('-') {
                    return Err(CliParseError::UnknownFlag(arg.to_string()));
                }
                if trip_id.is_some() {
                    return Err(CliParseError::UnexpectedArgument(arg.to_string()));
                }
                trip_id = Some(arg.parse::<TripId>().map_err(|_| {
                    CliParseError::InvalidFlagValue {
                        flag: "trip-id".to_string(),
                        value: arg.to_string(),
                    }
                })?);
            }
            CliCommand::Trip {
                trip_id: trip_id.ok_or(CliParseError::MissingArgument("trip-id"))?,
            }
        }
        "plan" => {
            let mut form = TripForm::default();
            while let Some(arg) = iter.next() {
                let slot = match arg.as_str() {
                    "--start-city" | "--from" => &mut form.start_city,
                    "--start-date" => &mut form.start_date,
                    "--end-date" => &mut form.end_date,
                    "--travelers" => &mut form.number_of_travelers,
                    "--travel-type" => &mut form.travel_type,
                    "--budget" => &mut form.total_budget,
                    "--plan-type" => &mut form.plan_type,
                    _ => return Err(unexpected(arg)),
                };
                *slot = next_value(&mut iter, arg)?;
            }
            CliCommand::Plan { form }
        }
        other => return Err(CliParseError::UnknownSubcommand(other.to_string())),
    };

    Ok(CliInvocation::Command(command))
}

fn next_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<String, CliParseError> {
    iter.next()
        .cloned()
        .ok_or_else(|| CliParseError::MissingFlagValue(flag.to_string()))
}

fn no_more_args<'a>(mut iter: impl Iterator<Item = &'a String>) -> Result<(), CliParseError> {
    match iter.next() {
        Some(arg) => Err(unexpected(arg)),
        None => Ok(()),
    }
}

fn unexpected(arg: &str) -> CliParseError {
    if arg.starts_with('-') {
        CliParseError::UnknownFlag(arg.to_string())
    } else {
        CliParseError::UnexpectedArgument(arg.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    LoadStorage(#[from] LoadStorageError),

    #[error(transparent)]
    SaveStorage(#[from] SaveStorageError),

    #[error("request failed: {0}")]
    Request(#[from] HttpError),

    #[error(transparent)]
    InvalidPlan(#[from] SubmitBlocked),

    #[error("{0}")]
    CreateTrip(String),

    #[error("background fetch ended without a result")]
    WorkerDisconnected,
}

pub fn run(command: CliCommand, config: &Config) -> Result<(), CliRunError> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let mut store = SessionStore::open(&config.state_dir)?;
    let client = ApiClient::new(UreqTransport::new(&config.api_base_url, config.timeout));

    match command {
        CliCommand::Register {
            username,
            email,
            password,
        } => {
            let grant = client.register(
                &RegisterRequest {
                    username,
                    email,
                    password,
                },
                store.token(),
            )?;
            let session = grant.into_session();
            store.login(session.identity, &session.token)?;
            write_signed_in(&mut out, &store)?;
        }
        CliCommand::Login { email, password } => {
            let grant = client.login(&LoginRequest { email, password }, store.token())?;
            let session = grant.into_session();
            store.login(session.identity, &session.token)?;
            write_signed_in(&mut out, &store)?;
        }
        CliCommand::Logout => {
            store.logout()?;
            info!("signed out");
            write_line(&mut out, &Route::Login { error: None }.path())?;
        }
        CliCommand::WhoAmI => {
            write_lines(&mut out, &render_identity(store.current_user()))?;
        }
        CliCommand::Callback(source) => {
            let mut flow = CallbackFlow::new();
            let route = match source {
                CallbackSource::Redirect(input) => {
                    flow.resolve_redirect(&mut store, &RedirectParams::parse(&input))
                }
                CallbackSource::ProviderSession(path) => {
                    flow.resolve_provider(&mut store, &ProviderSessionFile::new(&path))
                }
            };
            if let Some(CallbackOutcome::Authenticated(session)) = flow.outcome() {
                write_line(&mut out, &format!("Signed in as {}", session.identity.username))?;
            }
            write_line(&mut out, &route.path())?;
        }
        CliCommand::Trips => {
            let mut model = TripListModel::new();
            let (tx, rx) = channel();
            let ticket = model.begin_load();
            let token = store.token().map(str::to_string);
            let worker_client = client.clone();
            spawn_fetch(ticket, tx, move |_| {
                worker_client.get_my_trips(token.as_deref())
            });

            let loaded = rx.recv().map_err(|_| CliRunError::WorkerDisconnected)?;
            model.apply(&loaded.ticket, loaded.result);
            write_lines(&mut out, &render_dashboard(&model, store.current_user()))?;
        }
        CliCommand::Trip { trip_id } => {
            let model = load_trip_detail(&client, &store, trip_id)?;
            write_lines(&mut out, &render_trip_detail(&model))?;
        }
        CliCommand::Plan { form } => {
            let mut model = TripCreateModel::new(form);
            let request = model.begin_submit()?;
            let result = client.create_trip(&request, store.token());
            match model.apply(result) {
                Some(Route::TripDetail(trip_id)) => {
                    info!(
                        trip_id,
                        start_city = %model.form().start_city,
                        "trip plan created"
                    );
                    write_line(&mut out, &Route::TripDetail(trip_id).path())?;
                    let detail = load_trip_detail(&client, &store, trip_id)?;
                    write_lines(&mut out, &render_trip_detail(&detail))?;
                }
                Some(route) => {
                    write_line(&mut out, &route.path())?;
                }
                None => {
                    let message = model.error().unwrap_or_default().to_string();
                    return Err(CliRunError::CreateTrip(message));
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn load_trip_detail(
    client: &ApiClient<UreqTransport>,
    store: &SessionStore,
    trip_id: TripId,
) -> Result<TripDetailModel, CliRunError> {
    let mut model = TripDetailModel::new();
    let (tx, rx) = channel();
    let ticket = model.begin_load(trip_id);
    let token = store.token().map(str::to_string);
    let worker_client = client.clone();
    spawn_fetch(ticket, tx, move |trip_id| {
        worker_client.get_trip(*trip_id, token.as_deref())
    });

    let loaded = rx.recv().map_err(|_| CliRunError::WorkerDisconnected)?;
    model.apply(&loaded.ticket, loaded.result);
    Ok(model)
}

fn write_signed_in(out: &mut impl Write, store: &SessionStore) -> io::Result<()> {
    if let Some(user) = store.current_user() {
        info!(username = %user.username, "signed in");
        if !write_line(out, &format!("Signed in as {}", user.username))? {
            return Ok(());
        }
    }
    write_line(out, &Route::Dashboard.path())?;
    Ok(())
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        if !write_line(out, line)? {
            break;
        }
    }
    Ok(())
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<bool> {
    match writeln!(out, "{line}") {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(error) => Err(error),
    }
}
