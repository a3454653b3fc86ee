use std::env;
use std::io::{self, stdin, stdout, BufRead, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::{App, Arg, ArgMatches};
use liner::{Completer, Context, Prompt};
use log::{debug, warn};
use thiserror::Error;

use livecalc::{
    eval_with_context, format_number, AngleMode, CalcError, EvalContext, EvalOutcome,
    JsonStore, Key, MemoryStore, Session, Snapshot, Store, StoreError,
};

const PROMPT: &str = "[]> ";
const STATE_FILE: &str = ".livecalc.json";

const HELP: &str = "\
Type an expression to evaluate it, or a command:
  :keys <id>...     press buttons, e.g. `:keys 2 ^ 1 0 =` or `:keys sin 3 0 )`
  :history          list recent calculations, newest first
  :replay <n>       load history entry n into the input
  :clear-history    forget all history entries
  :angle [rad|deg]  toggle or set the angle mode
  :theme            toggle between light and dark
  :mem              show the memory register
  exit              leave";

struct EmptyCompleter;

impl Completer for EmptyCompleter {
    fn completions(&mut self, _start: &str) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("livecalc: {0}")]
    Calc(#[from] CalcError),
    #[error("livecalc: {0}")]
    IO(#[from] io::Error),
    #[error("livecalc: {0}")]
    Store(#[from] StoreError),
    #[error("livecalc: {0} has no finite value")]
    NotFinite(String),
}

fn app() -> App<'static, 'static> {
    App::new("livecalc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scientific calculator with live evaluation")
        .arg(
            Arg::with_name("degrees")
                .short("d")
                .long("degrees")
                .conflicts_with("radians")
                .help("Interpret trigonometric angles in degrees"),
        )
        .arg(
            Arg::with_name("radians")
                .short("r")
                .long("radians")
                .help("Interpret trigonometric angles in radians"),
        )
        .arg(
            Arg::with_name("state")
                .short("s")
                .long("state")
                .takes_value(true)
                .value_name("FILE")
                .help("JSON file holding angle mode, theme, memory and history"),
        )
        .arg(
            Arg::with_name("no-state")
                .long("no-state")
                .conflicts_with("state")
                .help("Do not read or write a state file"),
        )
        .arg(
            Arg::with_name("expression")
                .multiple(true)
                .help("Expression to evaluate once; starts a prompt when omitted"),
        )
}

fn angle_override(matches: &ArgMatches) -> Option<AngleMode> {
    if matches.is_present("degrees") {
        Some(AngleMode::Degrees)
    } else if matches.is_present("radians") {
        Some(AngleMode::Radians)
    } else {
        None
    }
}

fn state_path(matches: &ArgMatches) -> PathBuf {
    match matches.value_of("state") {
        Some(path) => PathBuf::from(path),
        None => env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(STATE_FILE),
    }
}

fn open_store(matches: &ArgMatches) -> Box<dyn Store> {
    if matches.is_present("no-state") {
        Box::new(MemoryStore::default())
    } else {
        let store = JsonStore::new(state_path(matches));
        debug!("using state file {}", store.path().display());
        Box::new(store)
    }
}

fn load_session(store: &dyn Store) -> Session {
    match store.load() {
        Ok(Some(snapshot)) => Session::from_snapshot(snapshot),
        Ok(None) => Session::new(),
        Err(e) => {
            warn!("starting with a fresh session: {}", e);
            Session::new()
        }
    }
}

/// The snapshot to persist. `kept_angle` holds the stored angle mode while a
/// command-line override is in effect, so the override lasts for this run
/// only.
fn persisted_snapshot(session: &Session, kept_angle: Option<AngleMode>) -> Snapshot {
    let mut snapshot = session.snapshot();
    if let Some(angle_mode) = kept_angle {
        snapshot.angle_mode = angle_mode;
    }
    snapshot
}

fn changes_angle_mode(line: &str) -> bool {
    line.split_whitespace().next() == Some(":angle")
}

fn save_session(store: &mut dyn Store, session: &Session, kept_angle: Option<AngleMode>) {
    if let Err(e) = store.save(&persisted_snapshot(session, kept_angle)) {
        warn!("could not save session: {}", e);
    }
}

fn print_state<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    if session.is_second() {
        write!(out, "[2nd] ")?;
    }
    match session.result() {
        Some(result) => writeln!(out, "{}  = {}", session.display_input(), result),
        None => writeln!(out, "{}", session.display_input()),
    }
}

/// Handles one line of interactive input. Returns false when the user asks
/// to leave.
fn handle_line<W: Write>(line: &str, session: &mut Session, out: &mut W) -> io::Result<bool> {
    let mut words = line.split_whitespace();
    match words.next() {
        None => (),
        Some("exit") | Some("quit") => return Ok(false),
        Some(":help") => writeln!(out, "{}", HELP)?,
        Some(":keys") => {
            for id in words {
                match id.parse::<Key>() {
                    Ok(key) => session.press(key),
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            print_state(out, session)?;
        }
        Some(":history") => {
            for (index, entry) in session.history().iter().enumerate() {
                writeln!(out, "{:>2}: {} = {}", index, entry.expression, entry.result)?;
            }
        }
        Some(":replay") => {
            let index = words.next().and_then(|n| n.parse::<usize>().ok());
            match index {
                Some(index) if session.replay(index) => print_state(out, session)?,
                _ => writeln!(out, "no such history entry")?,
            }
        }
        Some(":clear-history") => session.clear_history(),
        Some(":angle") => {
            match words.next().map(str::parse::<AngleMode>) {
                None => session.toggle_angle_mode(),
                Some(Ok(angle_mode)) => session.set_angle_mode(angle_mode),
                Some(Err(e)) => writeln!(out, "{}", e)?,
            }
            writeln!(out, "{}", session.angle_mode())?;
        }
        Some(":theme") => {
            session.toggle_theme();
            writeln!(out, "{:?}", session.theme())?;
        }
        Some(":mem") => writeln!(out, "{}", format_number(session.memory()))?,
        Some(_) => {
            session.load_input(line.trim());
            match session.commit() {
                EvalOutcome::Value(_) => writeln!(out, "{}", session.input())?,
                EvalOutcome::Malformed(reason) => writeln!(out, "Error: {}", reason)?,
                EvalOutcome::Incomplete => writeln!(out, "Error: incomplete expression")?,
                EvalOutcome::DomainIssue => writeln!(out, "Error")?,
            }
        }
    }
    Ok(true)
}

fn interactive(
    session: &mut Session,
    store: &mut dyn Store,
    mut kept_angle: Option<AngleMode>,
) -> Result<(), RuntimeError> {
    let stdout = stdout();
    let mut stdout = stdout.lock();

    if atty::is(atty::Stream::Stdin) {
        let mut con = Context::new();
        loop {
            let line = match con.read_line(Prompt::from(PROMPT), None, &mut EmptyCompleter) {
                Ok(line) => line,
                Err(ref e)
                    if e.kind() == io::ErrorKind::UnexpectedEof
                        || e.kind() == io::ErrorKind::Interrupted =>
                {
                    break
                }
                Err(e) => return Err(e.into()),
            };
            let keep_going = handle_line(&line, session, &mut stdout)?;
            if changes_angle_mode(&line) {
                kept_angle = None;
            }
            save_session(store, session, kept_angle);
            if !keep_going {
                break;
            }
            con.history.push(line.into())?;
        }
    } else {
        for line in stdin().lock().lines() {
            let line = line?;
            let keep_going = handle_line(&line, session, &mut stdout)?;
            if changes_angle_mode(&line) {
                kept_angle = None;
            }
            save_session(store, session, kept_angle);
            if !keep_going {
                break;
            }
        }
    }
    Ok(())
}

pub fn calc(matches: &ArgMatches) -> Result<(), RuntimeError> {
    let mut store = open_store(matches);
    let mut session = load_session(store.as_ref());
    let mut kept_angle = None;
    if let Some(angle_mode) = angle_override(matches) {
        kept_angle = Some(session.angle_mode());
        session.set_angle_mode(angle_mode);
    }

    match matches.values_of("expression") {
        Some(words) => {
            let expression = words.collect::<Vec<_>>().join(" ");
            let ctx = EvalContext::new(session.angle_mode());
            let value = eval_with_context(&expression, &ctx)?;
            if !value.is_finite() {
                return Err(RuntimeError::NotFinite(expression));
            }
            let stdout = stdout();
            writeln!(stdout.lock(), "{}", format_number(value))?;
            Ok(())
        }
        None => interactive(&mut session, store.as_mut(), kept_angle),
    }
}

fn main() {
    env_logger::init();
    let matches = app().get_matches();
    let code = match calc(&matches) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };
    exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> (Session, String) {
        let mut session = Session::new();
        let mut out = Vec::new();
        for line in lines {
            handle_line(line, &mut session, &mut out).unwrap();
        }
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn expressions_commit() {
        let (session, out) = run(&["2^3^2", "1/0", "3*/2"]);
        assert_eq!(session.history().len(), 1);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "512");
        assert_eq!(lines[1], "Error");
        assert!(lines[2].starts_with("Error: malformed expression"));
    }

    #[test]
    fn keys_and_replay() {
        let (session, out) = run(&[":keys 8 / 2 =", ":keys ac", ":replay 0"]);
        assert_eq!(session.input(), "8/2");
        assert_eq!(out.lines().last(), Some("8÷2  = 4"));
    }

    #[test]
    fn angle_command() {
        let (session, out) = run(&[":angle", ":angle rad", ":angle deg", ":angle grad"]);
        assert_eq!(session.angle_mode(), AngleMode::Degrees);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, vec!["DEG", "RAD", "DEG", "unknown angle mode 'grad'", "DEG"]);
    }

    #[test]
    fn angle_override_is_not_persisted() {
        let mut session = Session::new();
        session.set_angle_mode(AngleMode::Degrees);
        let kept = Some(AngleMode::Radians);
        assert_eq!(persisted_snapshot(&session, kept).angle_mode, AngleMode::Radians);
        assert_eq!(persisted_snapshot(&session, None).angle_mode, AngleMode::Degrees);

        let mut store = MemoryStore::default();
        save_session(&mut store, &session, kept);
        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.angle_mode, AngleMode::Radians);

        assert!(changes_angle_mode(" :angle deg"));
        assert!(!changes_angle_mode(":anglex"));
        assert!(!changes_angle_mode("sin(30)"));
    }

    #[test]
    fn exit_stops() {
        let mut session = Session::new();
        let mut out = Vec::new();
        assert!(!handle_line("exit", &mut session, &mut out).unwrap());
        assert!(handle_line("", &mut session, &mut out).unwrap());
    }

    #[test]
    fn arguments() {
        let matches = app().get_matches_from(vec!["livecalc", "-d", "--no-state", "sin(", "90"]);
        assert_eq!(angle_override(&matches), Some(AngleMode::Degrees));
        assert!(matches.is_present("no-state"));
        let words: Vec<_> = matches.values_of("expression").unwrap().collect();
        assert_eq!(words, vec!["sin(", "90"]);
    }
}
