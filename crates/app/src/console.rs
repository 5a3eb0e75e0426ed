use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use onboard_core::UserProfile;

/// Plain-text sink for accepted profiles.
///
/// Writes go through a mutex so the lines of one profile are never
/// interleaved with another request's.
#[derive(Clone)]
pub struct ProfileConsole {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ProfileConsole {
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn announce(&self, profile: &UserProfile) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("console writer poisoned"))?;

        writeln!(out, "Received new profile:")?;
        writeln!(out, "  Name: {}", profile.name)?;
        writeln!(out, "  Email: {}", profile.email)?;
        writeln!(out, "  Skills: {}", quoted_list(&profile.skills))?;
        out.flush()
    }
}

/// Renders `["a", "b"]` as `['a', 'b']`.
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// In-memory writer for asserting on console output.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedOutput {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().expect("capture lock poisoned");
        String::from_utf8(bytes.clone()).expect("console output is utf-8")
    }
}

#[cfg(test)]
impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("capture lock poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
