use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, warn};

use engine::EvaluatorUnavailable;

use crate::parse::{is_bestmove, parse_info, InfoLine};

const HANDSHAKE_BUDGET: Duration = Duration::from_secs(10);

/// Slack on top of the requested thinking time before a search is
/// declared lost.
const SEARCH_GRACE: Duration = Duration::from_secs(2);

/// A UCI engine subprocess. One position is loaded at a time, so a
/// handle must not be shared across threads without external
/// serialization (see [`crate::ScoreExtractor`]).
pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    multipv: usize,
    /// A `go` was issued whose `bestmove` has not been read yet. Set
    /// when a search is abandoned on timeout; the owed `bestmove` must
    /// be reclaimed before the next search or it terminates that
    /// search's read loop with stale slots.
    pending_search: bool,
}

impl UciEngine {
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                EvaluatorUnavailable::new(format!("failed to start engine {:?}: {}", path, err))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EvaluatorUnavailable::new("engine stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EvaluatorUnavailable::new("engine stdout not captured"))?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        let mut engine = Self {
            child,
            stdin,
            lines: rx,
            multipv: 1,
            pending_search: false,
        };

        engine.send("uci")?;
        engine.wait_for(|line| line == "uciok", HANDSHAKE_BUDGET)?;
        engine.send("isready")?;
        engine.wait_for(|line| line == "readyok", HANDSHAKE_BUDGET)?;

        Ok(engine)
    }

    /// Runs a bounded search on `fen`, reporting up to `breadth` lines.
    /// Returns the deepest info line seen per MultiPV slot, in slot
    /// order.
    pub fn analyse(&mut self, fen: &str, breadth: usize, budget: Duration) -> Result<Vec<InfoLine>> {
        self.reclaim()?;

        if breadth != self.multipv {
            self.send(&format!("setoption name MultiPV value {}", breadth))?;
            self.multipv = breadth;
        }

        self.send(&format!("position fen {}", fen))?;
        self.send(&format!("go movetime {}", budget.as_millis()))?;
        self.pending_search = true;

        let deadline = Instant::now() + budget + SEARCH_GRACE;
        let mut slots: Vec<Option<InfoLine>> = vec![None; breadth];

        loop {
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(remaining) => remaining,
                None => return Err(self.abandon("engine search timed out")),
            };
            let line = match self.lines.recv_timeout(remaining) {
                Ok(line) => line,
                Err(_) => return Err(self.abandon("engine stopped responding")),
            };

            if is_bestmove(&line) {
                self.pending_search = false;
                break;
            }

            if let Some(info) = parse_info(&line) {
                match info.multipv.checked_sub(1).and_then(|i| slots.get_mut(i)) {
                    Some(slot) => *slot = Some(info),
                    None => warn!("ignoring out-of-range multipv line: {}", line),
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Drops output left over from a previous search. An abandoned
    /// search still owes a `bestmove`; it has to be read past here so
    /// it cannot terminate the next search's read loop.
    fn reclaim(&mut self) -> Result<()> {
        while let Ok(line) = self.lines.try_recv() {
            if is_bestmove(&line) {
                self.pending_search = false;
            }
        }

        if self.pending_search {
            self.wait_for(is_bestmove, SEARCH_GRACE)?;
            self.pending_search = false;
        }

        Ok(())
    }

    /// Gives up on the in-flight search. `stop` makes the engine emit
    /// its `bestmove` promptly so [`Self::reclaim`] can resynchronize
    /// on the next call.
    fn abandon(&mut self, reason: &str) -> anyhow::Error {
        if self.send("stop").is_err() {
            warn!("engine pipe closed while abandoning a search");
        }

        EvaluatorUnavailable::new(reason).into()
    }

    fn send(&mut self, command: &str) -> Result<()> {
        debug!("uci> {}", command);

        writeln!(self.stdin, "{}", command)
            .and_then(|_| self.stdin.flush())
            .map_err(|err| EvaluatorUnavailable::new(format!("engine pipe closed: {}", err)).into())
    }

    fn wait_for(&mut self, accept: impl Fn(&str) -> bool, budget: Duration) -> Result<()> {
        let deadline = Instant::now() + budget;

        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or_else(|| EvaluatorUnavailable::new("engine handshake timed out"))?;
            let line = self
                .lines
                .recv_timeout(remaining)
                .map_err(|_| EvaluatorUnavailable::new("engine stopped responding"))?;

            if accept(&line) {
                return Ok(());
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
