//! FTP reply codes and the control-channel transcript libcurl reports.

/// True for 2xx replies (positive completion).
pub fn is_positive_completion(code: u32) -> bool {
    (200..300).contains(&code)
}

/// One control-channel line, as seen through libcurl's debug callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlLine {
    /// Sent by the server.
    Reply(String),
    /// Sent by us.
    Command(String),
}

/// Leading three-digit code of a reply line (`"230 Login successful."` -> 230).
pub fn reply_code(line: &str) -> Option<u32> {
    let code = line.get(..3)?;
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    code.parse().ok()
}

/// Codes of the greeting and of the login reply.
///
/// The greeting is the first server reply. The login reply is the first reply
/// after `PASS`, or after `USER` when the server accepted the user without a
/// password.
pub fn handshake_codes(transcript: &[ControlLine]) -> (Option<u32>, Option<u32>) {
    let mut greeting = None;
    let mut after_user = None;
    let mut after_pass = None;
    let mut last_command: Option<&str> = None;

    for line in transcript {
        match line {
            ControlLine::Command(cmd) => {
                let verb = cmd.split_whitespace().next().unwrap_or("");
                last_command = Some(verb);
            }
            ControlLine::Reply(text) => {
                let Some(code) = reply_code(text) else {
                    continue;
                };
                if greeting.is_none() {
                    greeting = Some(code);
                }
                match last_command {
                    Some(v) if v.eq_ignore_ascii_case("USER") && after_user.is_none() => {
                        after_user = Some(code);
                    }
                    Some(v) if v.eq_ignore_ascii_case("PASS") && after_pass.is_none() => {
                        after_pass = Some(code);
                    }
                    _ => {}
                }
            }
        }
    }

    (greeting, after_pass.or(after_user))
}
