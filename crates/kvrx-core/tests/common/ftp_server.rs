//! Minimal FTP server for integration tests.
//!
//! Speaks just enough of RFC 959 for libcurl: login, PWD/CWD/TYPE, passive
//! data channels (EPSV and PASV), STOR into memory and QUIT. Every control
//! command is recorded, and every control connection is counted.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct State {
    files: Mutex<HashMap<String, Vec<u8>>>,
    commands: Mutex<Vec<String>>,
    sessions: AtomicUsize,
}

pub struct FtpServer {
    pub port: u16,
    state: Arc<State>,
}

impl FtpServer {
    /// Starts a server accepting `login`/`password`. It runs until the process exits.
    pub fn start(login: &str, password: &str) -> FtpServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(State::default());
        let srv_state = Arc::clone(&state);
        let creds = Arc::new((login.to_string(), password.to_string()));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                srv_state.sessions.fetch_add(1, Ordering::SeqCst);
                let state = Arc::clone(&srv_state);
                let creds = Arc::clone(&creds);
                thread::spawn(move || {
                    let _ = session(stream, &state, &creds.0, &creds.1);
                });
            }
        });
        FtpServer { port, state }
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.state.files.lock().unwrap().get(name).cloned()
    }

    pub fn put(&self, name: &str, contents: &[u8]) {
        self.state
            .files
            .lock()
            .unwrap()
            .insert(name.to_string(), contents.to_vec());
    }

    pub fn sessions(&self) -> usize {
        self.state.sessions.load(Ordering::SeqCst)
    }

    /// Command verbs received so far, e.g. `["USER", "PASS", "PWD", ...]`.
    pub fn verbs(&self) -> Vec<String> {
        self.state.commands.lock().unwrap().clone()
    }

    /// Waits up to two seconds for `verb` to arrive.
    pub fn wait_for(&self, verb: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if self.verbs().iter().any(|v| v == verb) {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }
}

fn reply(out: &mut TcpStream, line: &str) -> std::io::Result<()> {
    out.write_all(format!("{}\r\n", line).as_bytes())?;
    out.flush()
}

fn session(stream: TcpStream, state: &State, login: &str, password: &str) -> std::io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    let mut out = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut data: Option<TcpListener> = None;
    let mut user = String::new();

    reply(&mut out, "220 kvrx test ftp ready")?;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end();
        let (verb, arg) = match line.split_once(' ') {
            Some((v, a)) => (v.to_ascii_uppercase(), a.to_string()),
            None => (line.to_ascii_uppercase(), String::new()),
        };
        state.commands.lock().unwrap().push(verb.clone());

        match verb.as_str() {
            "USER" => {
                user = arg;
                reply(&mut out, "331 password required")?;
            }
            "PASS" => {
                if user == login && arg == password {
                    reply(&mut out, "230 logged in")?;
                } else {
                    reply(&mut out, "530 login incorrect")?;
                }
            }
            "PWD" => reply(&mut out, "257 \"/\" is the current directory")?,
            "CWD" => reply(&mut out, "250 ok")?,
            "TYPE" => reply(&mut out, "200 type set")?,
            "SYST" => reply(&mut out, "215 UNIX Type: L8")?,
            "EPSV" => {
                let l = TcpListener::bind("127.0.0.1:0")?;
                let p = l.local_addr()?.port();
                data = Some(l);
                reply(&mut out, &format!("229 Entering Extended Passive Mode (|||{}|)", p))?;
            }
            "PASV" => {
                let l = TcpListener::bind("127.0.0.1:0")?;
                let p = l.local_addr()?.port();
                data = Some(l);
                reply(
                    &mut out,
                    &format!("227 Entering Passive Mode (127,0,0,1,{},{})", p >> 8, p & 0xff),
                )?;
            }
            "STOR" => {
                let Some(listener) = data.take() else {
                    reply(&mut out, "425 use EPSV or PASV first")?;
                    continue;
                };
                reply(&mut out, "150 ok to send data")?;
                let (mut conn, _) = listener.accept()?;
                let mut body = Vec::new();
                conn.read_to_end(&mut body)?;
                state.files.lock().unwrap().insert(arg, body);
                reply(&mut out, "226 transfer complete")?;
            }
            "QUIT" => {
                reply(&mut out, "221 bye")?;
                return Ok(());
            }
            _ => reply(&mut out, "502 command not implemented")?,
        }
    }
}
