use crate::domain::Interpreter;
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(Debug)]
pub struct PythonInterpreter {
    program: String,
}

impl PythonInterpreter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PythonInterpreter {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl Interpreter for PythonInterpreter {
    fn program(&self) -> &str {
        &self.program
    }

    fn version(&self) -> Option<String> {
        let output = match Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!("{} not invokable: {}", self.program, e);
                return None;
            }
        };

        if !output.status.success() {
            debug!("{} --version exited with {:?}", self.program, output.status);
            return None;
        }

        // Older interpreters print the version on stderr.
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !stdout.is_empty() {
            return Some(stdout);
        }
        Some(String::from_utf8_lossy(&output.stderr).trim().to_string())
    }

    fn can_import(&self, package: &str) -> bool {
        Command::new(&self.program)
            .args(["-c", &format!("import {package}")])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_interpreter_has_no_version() {
        let python = PythonInterpreter::new("stackcheck-no-such-python");
        assert_eq!(python.version(), None);
        assert!(!python.can_import("json"));
    }

    #[test]
    fn program_is_reported() {
        assert_eq!(PythonInterpreter::default().program(), "python3");
    }
}
